use super::framebuffer::FrameBuffer;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Size,
    pixelcolor::{Rgb888, RgbColor},
    Pixel,
};

/// Adapts the frame buffer to the embedded-graphics draw target API.
pub struct FrameCanvas<'a> {
    frame: &'a mut FrameBuffer,
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut FrameBuffer) -> Self {
        Self { frame }
    }
}

impl<'a> DrawTarget for FrameCanvas<'a> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels.into_iter() {
            // Bounds are enforced by the frame buffer
            self.frame
                .set_pixel(point.x, point.y, color.r(), color.g(), color.b());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.fill(color.r(), color.g(), color.b());
        Ok(())
    }
}

impl<'a> embedded_graphics::prelude::OriginDimensions for FrameCanvas<'a> {
    fn size(&self) -> Size {
        let (width, height) = self.frame.size();
        Size::new(width as u32, height as u32)
    }
}
