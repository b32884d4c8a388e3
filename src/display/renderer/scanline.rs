//! Moving scanline bar for the CRT look.

use super::context::RenderContext;
use crate::display::graphics::framebuffer::FrameBuffer;
use crate::models::WallpaperSettings;

/// Blend strength of the bar over whatever is already on the frame.
const SCANLINE_ALPHA: u8 = 64;

/// A horizontal bar that sweeps down the display and wraps around.
///
/// The position advances by `scanline_speed` pixels per second and runs
/// over `viewport_height + bar_height` so the bar fully leaves the bottom
/// edge before re-entering at the top.
pub struct ScanlineRenderer {
    position: f32,
}

impl Default for ScanlineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanlineRenderer {
    pub fn new() -> Self {
        Self { position: 0.0 }
    }

    pub fn update(&mut self, dt: f32, viewport_height: i32, settings: &WallpaperSettings) {
        if !settings.scanline {
            return;
        }

        let cycle = (viewport_height + bar_height(viewport_height)) as f32;
        self.position = (self.position + settings.scanline_speed * dt) % cycle;
    }

    pub fn render(
        &self,
        frame: &mut FrameBuffer,
        ctx: &RenderContext,
        settings: &WallpaperSettings,
    ) {
        if !settings.scanline {
            return;
        }

        let bar = bar_height(frame.height());
        let top = self.position as i32 - bar;
        let color = ctx.apply_brightness(settings.text_color);

        for row in top..top + bar {
            for x in 0..frame.width() {
                frame.blend_pixel(x, row, color, SCANLINE_ALPHA);
            }
        }
    }
}

fn bar_height(viewport_height: i32) -> i32 {
    (viewport_height / 24).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ctx() -> RenderContext {
        RenderContext {
            display_width: 8,
            display_height: 48,
            brightness: 100,
            date: String::new(),
            time: String::new(),
            day: String::new(),
            battery_percent: 0,
            charging: false,
            timestamp: 0,
        }
    }

    fn scanline_settings() -> WallpaperSettings {
        WallpaperSettings {
            scanline: true,
            scanline_speed: 40.0,
            ..WallpaperSettings::default()
        }
    }

    fn lit_rows(frame: &FrameBuffer) -> Vec<i32> {
        let mut rows = Vec::new();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.pixel(x, y) != Some([0, 0, 0]) {
                    rows.push(y);
                    break;
                }
            }
        }
        rows
    }

    #[test]
    fn position_wraps_past_the_bottom_edge() {
        let settings = scanline_settings();
        let mut renderer = ScanlineRenderer::new();

        // 48px viewport, 2px bar: the cycle is 50px
        renderer.update(1.0, 48, &settings);
        assert!((renderer.position - 40.0).abs() < 1e-3);

        renderer.update(1.0, 48, &settings);
        assert!((renderer.position - 30.0).abs() < 1e-3);
    }

    #[test]
    fn update_is_frozen_when_disabled() {
        let mut settings = scanline_settings();
        settings.scanline = false;

        let mut renderer = ScanlineRenderer::new();
        renderer.update(1.0, 48, &settings);
        assert_eq!(renderer.position, 0.0);
    }

    #[test]
    fn bar_blends_over_the_frame() {
        let settings = scanline_settings();
        let mut renderer = ScanlineRenderer::new();
        renderer.position = 10.0;

        let mut frame = FrameBuffer::new(8, 48);
        renderer.render(&mut frame, &test_ctx(), &settings);

        assert_eq!(lit_rows(&frame), vec![8, 9]);
        // Green at alpha 64 over black
        assert_eq!(frame.pixel(0, 8), Some([0, 64, 0]));
        assert_eq!(frame.pixel(7, 9), Some([0, 64, 0]));
    }

    #[test]
    fn bar_clips_at_the_bottom_edge() {
        let settings = scanline_settings();
        let mut renderer = ScanlineRenderer::new();
        renderer.position = 49.0;

        let mut frame = FrameBuffer::new(8, 48);
        renderer.render(&mut frame, &test_ctx(), &settings);

        assert_eq!(lit_rows(&frame), vec![47]);
    }

    #[test]
    fn bar_is_hidden_before_it_enters() {
        let settings = scanline_settings();
        let renderer = ScanlineRenderer::new();

        let mut frame = FrameBuffer::new(8, 48);
        renderer.render(&mut frame, &test_ctx(), &settings);

        assert!(lit_rows(&frame).is_empty());
    }

    #[test]
    fn render_is_skipped_when_disabled() {
        let mut settings = scanline_settings();
        settings.scanline = false;

        let mut renderer = ScanlineRenderer::new();
        renderer.position = 10.0;

        let mut frame = FrameBuffer::new(8, 48);
        renderer.render(&mut frame, &test_ctx(), &settings);

        assert!(lit_rows(&frame).is_empty());
    }
}
