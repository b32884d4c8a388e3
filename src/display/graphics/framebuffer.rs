//! In-memory RGB frame used to compose a full wallpaper frame before it is
//! blitted to the panel canvas.

use crate::display::driver::LedCanvas;

/// 24bpp row-major frame buffer.
///
/// The panel canvas is write-only, so translucent layers (background overlay,
/// scanline) are blended here where pixels can be read back.
#[derive(Clone)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Creates a black frame. Non-positive dimensions yield an empty frame.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 3) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn fill(&mut self, r: u8, g: u8, b: u8) {
        for chunk in self.pixels.chunks_exact_mut(3) {
            chunk[0] = r;
            chunk[1] = g;
            chunk[2] = b;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(((y * self.width + x) * 3) as usize)
    }

    /// Writes a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = r;
            self.pixels[i + 1] = g;
            self.pixels[i + 2] = b;
        }
    }

    /// Reads a pixel, `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        self.index(x, y)
            .map(|i| [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Darkens the whole frame by compositing black at the given alpha
    /// (0 = untouched, 255 = fully black).
    pub fn darken(&mut self, alpha: u8) {
        let keep = (255 - alpha) as u16;
        for value in self.pixels.iter_mut() {
            *value = ((*value as u16 * keep) / 255) as u8;
        }
    }

    /// Blends a color over one pixel at the given alpha (0 = untouched,
    /// 255 = fully the new color). Out-of-bounds writes are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 3], alpha: u8) {
        if let Some(i) = self.index(x, y) {
            let a = alpha as u16;
            let keep = 255 - a;
            for c in 0..3 {
                let old = self.pixels[i + c] as u16;
                self.pixels[i + c] = ((old * keep + color[c] as u16 * a) / 255) as u8;
            }
        }
    }

    /// Copies the frame onto a panel canvas.
    pub fn blit_to(&self, canvas: &mut dyn LedCanvas) {
        for y in 0..self.height {
            for x in 0..self.width {
                let i = ((y * self.width + x) * 3) as usize;
                canvas.set_pixel(
                    x as usize,
                    y as usize,
                    self.pixels[i],
                    self.pixels[i + 1],
                    self.pixels[i + 2],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_pixel() {
        let mut frame = FrameBuffer::new(4, 4);

        frame.set_pixel(1, 2, 10, 20, 30);
        assert_eq!(frame.pixel(1, 2), Some([10, 20, 30]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
    }

    #[test]
    fn out_of_bounds_pixel_is_ignored() {
        let mut frame = FrameBuffer::new(4, 4);

        frame.set_pixel(4, 0, 255, 255, 255);
        frame.set_pixel(0, 4, 255, 255, 255);
        frame.set_pixel(-1, 0, 255, 255, 255);
        assert_eq!(frame.pixel(4, 0), None);
        assert_eq!(frame.pixel(-1, 0), None);
        assert_eq!(frame.pixel(3, 3), Some([0, 0, 0]));
    }

    #[test]
    fn non_positive_dimensions_yield_empty_frame() {
        let frame = FrameBuffer::new(0, 16);
        assert_eq!(frame.size(), (0, 16));
        assert_eq!(frame.pixel(0, 0), None);

        let frame = FrameBuffer::new(-3, -1);
        assert_eq!(frame.size(), (0, 0));
    }

    #[test]
    fn fill_covers_every_pixel() {
        let mut frame = FrameBuffer::new(3, 2);

        frame.fill(7, 8, 9);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(frame.pixel(x, y), Some([7, 8, 9]));
            }
        }
    }

    #[test]
    fn darken_scales_toward_black() {
        let mut frame = FrameBuffer::new(1, 1);

        frame.set_pixel(0, 0, 200, 100, 0);
        frame.darken(255);
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));

        frame.set_pixel(0, 0, 200, 100, 0);
        frame.darken(0);
        assert_eq!(frame.pixel(0, 0), Some([200, 100, 0]));

        frame.set_pixel(0, 0, 255, 255, 255);
        frame.darken(100);
        // 255 * 155 / 255 = 155
        assert_eq!(frame.pixel(0, 0), Some([155, 155, 155]));
    }

    #[test]
    fn blend_pixel_mixes_colors() {
        let mut frame = FrameBuffer::new(1, 1);

        frame.set_pixel(0, 0, 0, 0, 0);
        frame.blend_pixel(0, 0, [255, 255, 255], 255);
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255]));

        // Blending a color onto itself changes nothing
        frame.set_pixel(0, 0, 0, 100, 200);
        frame.blend_pixel(0, 0, [0, 100, 200], 128);
        assert_eq!(frame.pixel(0, 0), Some([0, 100, 200]));

        frame.set_pixel(0, 0, 0, 0, 0);
        frame.blend_pixel(0, 0, [255, 255, 255], 128);
        // (0 * 127 + 255 * 128) / 255 = 128
        assert_eq!(frame.pixel(0, 0), Some([128, 128, 128]));

        // Out of bounds stays a no-op
        frame.blend_pixel(5, 5, [255, 255, 255], 255);
    }

}
