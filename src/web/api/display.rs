use axum::{extract::State, http::StatusCode, Json};
use log::info;
use serde::{Deserialize, Serialize};

use crate::web::api::CombinedState;

#[derive(Serialize)]
pub struct DisplayInfoResponse {
    pub width: i32,
    pub height: i32,
    pub power: bool,
}

#[derive(Deserialize)]
pub struct DisplayPowerRequest {
    pub on: bool,
}

pub async fn get_display_info(
    State(combined_state): State<CombinedState>,
) -> Json<DisplayInfoResponse> {
    let ((display, _storage), _events, update_loop) = combined_state;
    let display_guard = display.lock().await;
    let power = update_loop.lock().unwrap().is_running();

    Json(DisplayInfoResponse {
        width: display_guard.display_width,
        height: display_guard.display_height,
        power,
    })
}

// Handler for switching the panel on or off. Off stops all periodic work
// and blanks the panel; the cached background image is kept so switching
// back on is cheap.
pub async fn set_display_power(
    State(combined_state): State<CombinedState>,
    Json(request): Json<DisplayPowerRequest>,
) -> StatusCode {
    let ((display, _storage), event_state, update_loop) = combined_state;

    if request.on {
        let mut update_loop_guard = update_loop.lock().unwrap();
        if !update_loop_guard.is_running() {
            info!("Display switched on via API");
            update_loop_guard.start(display.clone(), event_state.clone());
        }
    } else {
        {
            let mut update_loop_guard = update_loop.lock().unwrap();
            if update_loop_guard.is_running() {
                info!("Display switched off via API");
                update_loop_guard.stop();
            }
        }

        // Blank after stopping so no in-flight frame repaints the panel
        let mut display_guard = display.lock().await;
        display_guard.blank_display();
    }

    StatusCode::OK
}
