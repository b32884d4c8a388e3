//! Rendering of the templated text block.

use embedded_graphics::geometry::Point;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;

use super::context::RenderContext;
use super::template::render_template;
use super::typeface::Typeface;
use crate::display::graphics::embedded_graphics_support::FrameCanvas;
use crate::display::graphics::framebuffer::FrameBuffer;
use crate::display::graphics::scaled::ScaledCanvas;
use crate::models::WallpaperSettings;

/// Where the text ended: right edge of the last line, on its baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorAnchor {
    pub x: i32,
    pub baseline: i32,
}

/// Draw the rendered template, one line per row, centered on the display.
///
/// The first baseline sits at the vertical center plus the configured
/// offset; each further line moves down by 1.2 times the font size.
pub fn render_text(
    frame: &mut FrameBuffer,
    ctx: &RenderContext,
    settings: &WallpaperSettings,
) -> CursorAnchor {
    let lines = render_template(&settings.custom_text, ctx);
    let typeface = Typeface::for_size(settings.font_size);
    let line_height = (settings.font_size as f32 * 1.2).round() as i32;

    let center_x = frame.width() / 2 + settings.offset_x;
    let mut baseline_y = frame.height() / 2 + settings.offset_y;

    let color = ctx.apply_brightness(settings.text_color);

    let mut anchor = CursorAnchor {
        x: center_x,
        baseline: baseline_y,
    };

    for line in &lines {
        let width = typeface.text_width(line);
        let left = center_x - width / 2;
        let top = baseline_y - typeface.baseline_offset();

        if settings.text_shadow {
            draw_line(
                frame,
                &typeface,
                line,
                left + typeface.scale,
                top + typeface.scale,
                [0, 0, 0],
            );
        }
        draw_line(frame, &typeface, line, left, top, color);

        anchor = CursorAnchor {
            x: left + width,
            baseline: baseline_y,
        };
        baseline_y += line_height;
    }

    anchor
}

/// Draw the terminal cursor: a filled glyph cell after the last line of
/// text, lit on even seconds so it blinks once per second.
pub fn render_cursor(
    frame: &mut FrameBuffer,
    ctx: &RenderContext,
    settings: &WallpaperSettings,
    anchor: CursorAnchor,
) {
    if !settings.scanline || ctx.timestamp % 2 != 0 {
        return;
    }

    let typeface = Typeface::for_size(settings.font_size);
    let [r, g, b] = ctx.apply_brightness(settings.text_color);
    let top = anchor.baseline - typeface.baseline_offset();

    for dy in 0..typeface.glyph_height() {
        for dx in 0..typeface.advance() {
            frame.set_pixel(anchor.x + dx, top + dy, r, g, b);
        }
    }
}

fn draw_line(
    frame: &mut FrameBuffer,
    typeface: &Typeface,
    line: &str,
    left: i32,
    top: i32,
    color: [u8; 3],
) {
    if line.is_empty() {
        return;
    }

    let style = MonoTextStyle::new(typeface.font, Rgb888::new(color[0], color[1], color[2]));

    if typeface.scale > 1 {
        // Magnified sizes draw in glyph space and let the canvas expand
        // each pixel into a block
        let mut canvas = ScaledCanvas::new(frame, typeface.scale, Point::new(left, top));
        Text::with_baseline(line, Point::zero(), style, Baseline::Top)
            .draw(&mut canvas)
            .unwrap();
    } else {
        let mut canvas = FrameCanvas::new(frame);
        Text::with_baseline(line, Point::new(left, top), style, Baseline::Top)
            .draw(&mut canvas)
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ctx(width: i32, height: i32) -> RenderContext {
        RenderContext {
            display_width: width,
            display_height: height,
            brightness: 100,
            date: "22 Aug 2025".to_string(),
            time: "10:20:30".to_string(),
            day: "Friday".to_string(),
            battery_percent: 50,
            charging: false,
            timestamp: 2,
        }
    }

    fn test_settings(text: &str) -> WallpaperSettings {
        WallpaperSettings {
            custom_text: text.to_string(),
            font_size: 10,
            ..WallpaperSettings::default()
        }
    }

    fn lit_pixels(frame: &FrameBuffer) -> Vec<(i32, i32)> {
        pixels_not(frame, [0, 0, 0])
    }

    fn pixels_not(frame: &FrameBuffer, background: [u8; 3]) -> Vec<(i32, i32)> {
        let mut marked = Vec::new();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.pixel(x, y) != Some(background) {
                    marked.push((x, y));
                }
            }
        }
        marked
    }

    #[test]
    fn offsets_translate_the_text_block() {
        let ctx = test_ctx(64, 64);

        let mut base = FrameBuffer::new(64, 64);
        render_text(&mut base, &ctx, &test_settings("X"));

        let mut shifted_settings = test_settings("X");
        shifted_settings.offset_x = 5;
        shifted_settings.offset_y = -3;
        let mut shifted = FrameBuffer::new(64, 64);
        render_text(&mut shifted, &ctx, &shifted_settings);

        let expected: Vec<(i32, i32)> = lit_pixels(&base)
            .into_iter()
            .map(|(x, y)| (x + 5, y - 3))
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(lit_pixels(&shifted), expected);
    }

    #[test]
    fn lines_stack_at_fixed_spacing() {
        let ctx = test_ctx(64, 64);

        let mut single = FrameBuffer::new(64, 64);
        render_text(&mut single, &ctx, &test_settings("A"));
        let single_lit = lit_pixels(&single);

        let mut double = FrameBuffer::new(64, 64);
        render_text(&mut double, &ctx, &test_settings("A\nA"));

        // Second line repeats the first 12 rows lower (10px font times 1.2)
        let mut expected = single_lit.clone();
        expected.extend(single_lit.iter().map(|&(x, y)| (x, y + 12)));
        expected.sort();
        let mut actual = lit_pixels(&double);
        actual.sort();

        assert!(!single_lit.is_empty());
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_text_draws_nothing_and_anchors_at_center() {
        let ctx = test_ctx(64, 64);
        let mut frame = FrameBuffer::new(64, 64);
        let anchor = render_text(&mut frame, &ctx, &test_settings(""));

        assert!(lit_pixels(&frame).is_empty());
        assert_eq!(
            anchor,
            CursorAnchor {
                x: 32,
                baseline: 32
            }
        );
    }

    #[test]
    fn shadow_draws_a_black_copy_offset_by_one() {
        let ctx = test_ctx(64, 64);

        let mut plain = FrameBuffer::new(64, 64);
        plain.fill(255, 255, 255);
        render_text(&mut plain, &ctx, &test_settings("X"));
        let plain_marked = pixels_not(&plain, [255, 255, 255]);

        let mut shadow_settings = test_settings("X");
        shadow_settings.text_shadow = true;
        let mut shadowed = FrameBuffer::new(64, 64);
        shadowed.fill(255, 255, 255);
        render_text(&mut shadowed, &ctx, &shadow_settings);

        let mut expected: Vec<(i32, i32)> = plain_marked
            .iter()
            .flat_map(|&(x, y)| [(x, y), (x + 1, y + 1)])
            .collect();
        expected.sort();
        expected.dedup();
        let mut actual = pixels_not(&shadowed, [255, 255, 255]);
        actual.sort();

        assert!(!plain_marked.is_empty());
        assert_eq!(actual, expected);
    }

    #[test]
    fn anchor_sits_after_the_last_line() {
        let ctx = test_ctx(64, 64);
        let mut frame = FrameBuffer::new(64, 64);
        let anchor = render_text(&mut frame, &ctx, &test_settings("ab\ncdef"));

        let typeface = Typeface::for_size(10);
        let width = typeface.text_width("cdef");
        assert_eq!(
            anchor,
            CursorAnchor {
                x: 32 - width / 2 + width,
                baseline: 32 + 12
            }
        );
    }

    #[test]
    fn cursor_shows_on_even_seconds_in_scanline_mode() {
        let mut settings = test_settings("");
        settings.scanline = true;
        let anchor = CursorAnchor {
            x: 20,
            baseline: 30,
        };
        let typeface = Typeface::for_size(10);

        let mut ctx = test_ctx(64, 64);
        ctx.timestamp = 4;
        let mut frame = FrameBuffer::new(64, 64);
        render_cursor(&mut frame, &ctx, &settings, anchor);
        assert_eq!(
            lit_pixels(&frame).len(),
            (typeface.advance() * typeface.glyph_height()) as usize
        );
        assert_eq!(
            frame.pixel(20, 30 - typeface.baseline_offset()),
            Some([0, 255, 0])
        );

        ctx.timestamp = 5;
        let mut frame = FrameBuffer::new(64, 64);
        render_cursor(&mut frame, &ctx, &settings, anchor);
        assert!(lit_pixels(&frame).is_empty());
    }

    #[test]
    fn cursor_requires_scanline_mode() {
        let settings = test_settings("");
        let mut ctx = test_ctx(64, 64);
        ctx.timestamp = 4;

        let mut frame = FrameBuffer::new(64, 64);
        render_cursor(
            &mut frame,
            &ctx,
            &settings,
            CursorAnchor {
                x: 20,
                baseline: 30,
            },
        );
        assert!(lit_pixels(&frame).is_empty());
    }
}
