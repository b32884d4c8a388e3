use embedded_graphics::mono_font::{iso_8859_1 as fonts, MonoFont};

// Smallest to tallest glyph box
const LADDER: [&MonoFont<'static>; 7] = [
    &fonts::FONT_4X6,
    &fonts::FONT_5X8,
    &fonts::FONT_6X10,
    &fonts::FONT_7X13,
    &fonts::FONT_9X15,
    &fonts::FONT_9X18,
    &fonts::FONT_10X20,
];

/// A mono font together with an integer scale factor.
///
/// The built-in fonts only exist at fixed sizes; the configured font size is
/// approximated by the base font and scale whose effective glyph height gets
/// closest to it without going over.
#[derive(Clone, Copy)]
pub struct Typeface {
    pub font: &'static MonoFont<'static>,
    pub scale: i32,
}

impl Typeface {
    pub fn for_size(px: u32) -> Self {
        let px = px.max(1);

        let mut best: Option<Typeface> = None;
        for font in LADDER {
            let height = font.character_size.height;
            let scale = px / height;
            if scale == 0 {
                continue;
            }
            let candidate = Typeface {
                font,
                scale: scale as i32,
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    let (a, b) = (candidate.glyph_height(), current.glyph_height());
                    // Prefer the taller rendering; on ties the bigger base font
                    a > b || (a == b && height > current.font.character_size.height)
                }
            };
            if better {
                best = Some(candidate);
            }
        }

        // Sizes below the smallest glyph box fall back to it
        best.unwrap_or(Typeface {
            font: LADDER[0],
            scale: 1,
        })
    }

    /// Effective glyph box height in pixels.
    pub fn glyph_height(&self) -> i32 {
        self.font.character_size.height as i32 * self.scale
    }

    /// Horizontal advance per character in pixels.
    pub fn advance(&self) -> i32 {
        (self.font.character_size.width + self.font.character_spacing) as i32 * self.scale
    }

    /// Baseline offset from the top of the glyph box in pixels.
    pub fn baseline_offset(&self) -> i32 {
        self.font.baseline as i32 * self.scale
    }

    /// Rendered width of a string in pixels.
    pub fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance()
    }
}
