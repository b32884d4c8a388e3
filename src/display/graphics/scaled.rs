use super::framebuffer::FrameBuffer;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::{Rgb888, RgbColor},
    Pixel,
};

/// Draw target that maps every drawn pixel to a `scale x scale` block,
/// offset by `origin`. The mono fonts only exist at fixed sizes; drawing
/// through this target renders them at integer multiples.
pub struct ScaledCanvas<'a> {
    frame: &'a mut FrameBuffer,
    scale: i32,
    origin: Point,
}

impl<'a> ScaledCanvas<'a> {
    pub fn new(frame: &'a mut FrameBuffer, scale: i32, origin: Point) -> Self {
        Self {
            frame,
            scale: scale.max(1),
            origin,
        }
    }
}

impl<'a> DrawTarget for ScaledCanvas<'a> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels.into_iter() {
            let base_x = self.origin.x + point.x * self.scale;
            let base_y = self.origin.y + point.y * self.scale;
            for dy in 0..self.scale {
                for dx in 0..self.scale {
                    self.frame
                        .set_pixel(base_x + dx, base_y + dy, color.r(), color.g(), color.b());
                }
            }
        }
        Ok(())
    }
}

impl<'a> embedded_graphics::prelude::OriginDimensions for ScaledCanvas<'a> {
    fn size(&self) -> Size {
        let (width, height) = self.frame.size();
        Size::new(
            (width / self.scale).max(0) as u32,
            (height / self.scale).max(0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_expands_to_block_at_origin() {
        let mut frame = FrameBuffer::new(10, 10);
        {
            let mut scaled = ScaledCanvas::new(&mut frame, 3, Point::new(2, 2));
            scaled
                .draw_iter([Pixel(Point::new(1, 1), Rgb888::new(255, 0, 0))])
                .unwrap();
        }

        // Block covers (5,5)..=(7,7)
        for y in 5..=7 {
            for x in 5..=7 {
                assert_eq!(frame.pixel(x, y), Some([255, 0, 0]));
            }
        }
        assert_eq!(frame.pixel(4, 5), Some([0, 0, 0]));
        assert_eq!(frame.pixel(8, 5), Some([0, 0, 0]));
    }

    #[test]
    fn scale_is_clamped_to_one() {
        let mut frame = FrameBuffer::new(4, 4);
        {
            let mut scaled = ScaledCanvas::new(&mut frame, 0, Point::zero());
            scaled
                .draw_iter([Pixel(Point::new(2, 3), Rgb888::new(0, 255, 0))])
                .unwrap();
        }

        assert_eq!(frame.pixel(2, 3), Some([0, 255, 0]));
        assert_eq!(frame.pixel(3, 3), Some([0, 0, 0]));
    }
}
