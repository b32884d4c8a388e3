use serde::{Deserialize, Serialize};

use super::WallpaperSettings;

// Preview mode request carrying the settings to show and the editor session
// that owns the preview
#[derive(Deserialize)]
pub struct PreviewRequest {
    pub session_id: String,
    pub settings: WallpaperSettings,
}

// Preview mode state
#[derive(Serialize, Deserialize)]
pub struct PreviewModeState {
    pub active: bool,
}

#[derive(Deserialize)]
pub struct SessionCheckRequest {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct SessionCheckResponse {
    pub owner: bool,
}
