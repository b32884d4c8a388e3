mod background;
mod context;
mod scanline;
mod template;
mod text;
mod typeface;

pub use background::{
    fit_cover, render_background, BackgroundCache, BackgroundError, FittedBackground, ImageSource,
};
pub use context::RenderContext;
pub use scanline::ScanlineRenderer;
pub use template::{render_line, render_template};
pub use text::{render_cursor, render_text, CursorAnchor};
pub use typeface::Typeface;
