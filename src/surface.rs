use egui::{Color32, ColorImage, Pos2};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The raster canvas everything is drawn onto.
///
/// Pixels are stored unmultiplied RGBA. Every mutation bumps `revision`
/// so the UI knows when the texture has to be uploaded again.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    revision: u64,
}

impl RasterSurface {
    /// Creates a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Returns the pixel at (x, y), or `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixels.get_pixel_checked(x, y).map(|p| {
            let [r, g, b, a] = p.0;
            Color32::from_rgba_unmultiplied(r, g, b, a)
        })
    }

    /// True when every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    /// Resets every pixel to transparent
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = TRANSPARENT;
        }
        self.touch();
    }

    /// Overwrites every pixel with `color`
    pub fn fill(&mut self, color: Color32) {
        let fill = Rgba(color.to_srgba_unmultiplied());
        for pixel in self.pixels.pixels_mut() {
            *pixel = fill;
        }
        self.touch();
    }

    /// Draws a round-capped segment of the given width.
    ///
    /// A pixel is covered when its center lies within `width / 2` of the
    /// segment. Covered pixels are blended source-over.
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, color: Color32, width: f32) {
        let half = (width * 0.5).max(0.5);
        let (w, h) = (self.width() as f32, self.height() as f32);

        let min_x = (from.x.min(to.x) - half).floor().max(0.0);
        let min_y = (from.y.min(to.y) - half).floor().max(0.0);
        let max_x = (from.x.max(to.x) + half).ceil().min(w);
        let max_y = (from.y.max(to.y) + half).ceil().min(h);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let src = color.to_srgba_unmultiplied();
        for y in min_y as u32..max_y as u32 {
            for x in min_x as u32..max_x as u32 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, from, to) <= half {
                    let dst = self.pixels.get_pixel_mut(x, y);
                    *dst = Rgba(blend_over(src, dst.0));
                }
            }
        }
        self.touch();
    }

    /// Clears the surface and draws `image` at the origin, clipped to the
    /// surface bounds
    pub fn replace_with(&mut self, image: &RgbaImage) {
        for (x, y, pixel) in self.pixels.enumerate_pixels_mut() {
            *pixel = image.get_pixel_checked(x, y).copied().unwrap_or(TRANSPARENT);
        }
        self.touch();
    }

    /// Converts the pixels into something egui can upload as a texture
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_new_surface_is_blank() {
        let surface = RasterSurface::new(40, 30);
        assert_eq!(surface.width(), 40);
        assert_eq!(surface.height(), 30);
        assert!(surface.is_blank());
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn test_fill_then_clear() {
        let mut surface = RasterSurface::new(8, 8);
        surface.fill(Color32::RED);
        assert_eq!(surface.pixel(3, 3), Some(Color32::RED));
        assert!(!surface.is_blank());

        surface.clear();
        assert!(surface.is_blank());
        assert_eq!(surface.revision(), 2);
    }

    #[test]
    fn test_stroke_covers_segment_only() {
        let mut surface = RasterSurface::new(64, 64);
        surface.stroke_segment(pos2(10.0, 10.0), pos2(50.0, 50.0), Color32::BLACK, 1.0);

        assert_eq!(surface.pixel(30, 30), Some(Color32::BLACK));
        assert_eq!(surface.pixel(10, 10), Some(Color32::BLACK));
        assert_eq!(surface.pixel(30, 10), Some(Color32::TRANSPARENT));
        assert_eq!(surface.pixel(60, 60), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_wide_stroke_has_round_caps() {
        let mut surface = RasterSurface::new(64, 64);
        surface.stroke_segment(pos2(20.0, 20.0), pos2(40.0, 20.0), Color32::BLUE, 10.0);

        // Inside the cap radius behind the start point
        assert_eq!(surface.pixel(16, 20), Some(Color32::BLUE));
        // Corner of the bounding box is outside the rounded cap
        assert_eq!(surface.pixel(15, 15), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_stroke_outside_bounds_is_ignored() {
        let mut surface = RasterSurface::new(16, 16);
        surface.stroke_segment(pos2(-50.0, -50.0), pos2(-20.0, -30.0), Color32::BLACK, 4.0);
        assert!(surface.is_blank());
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn test_translucent_stroke_blends_over_background() {
        let mut surface = RasterSurface::new(8, 8);
        surface.fill(Color32::WHITE);
        let half_black = Color32::from_rgba_unmultiplied(0, 0, 0, 128);
        surface.stroke_segment(pos2(0.0, 4.0), pos2(8.0, 4.0), half_black, 2.0);

        let blended = surface.pixel(4, 4).unwrap();
        assert_eq!(blended.a(), 255);
        assert!(blended.r() > 100 && blended.r() < 160);
    }

    #[test]
    fn test_replace_with_clips_and_clears() {
        let mut surface = RasterSurface::new(4, 4);
        surface.fill(Color32::GREEN);

        let small = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        surface.replace_with(&small);

        assert_eq!(surface.pixel(1, 1), Some(Color32::RED));
        assert_eq!(surface.pixel(3, 3), Some(Color32::TRANSPARENT));
    }
}
