pub mod preview;
pub mod settings;

pub use preview::{PreviewModeState, PreviewRequest, SessionCheckRequest, SessionCheckResponse};
pub use settings::WallpaperSettings;
