use crate::models::{
    PreviewModeState, PreviewRequest, SessionCheckRequest, SessionCheckResponse, WallpaperSettings,
};
use crate::web::api::CombinedState;
use axum::{extract::State, http::StatusCode, response::Json};

// Handler for entering preview mode. The panel renders the submitted
// settings immediately; other clients get an editor lock event so two
// browsers don't fight over the display.
pub async fn start_preview_mode(
    State(combined_state): State<CombinedState>,
    Json(request): Json<PreviewRequest>,
) -> Json<WallpaperSettings> {
    let ((display, _), event_state, _) = combined_state;
    let mut display_guard = display.lock().await;
    display_guard.enter_preview_mode(request.settings, request.session_id.clone());

    let event_state_guard = event_state.lock().unwrap();
    event_state_guard.broadcast_editor_lock(true, Some(request.session_id));

    // Return the settings as the display renders them (after sanitizing)
    Json(display_guard.effective_settings().clone())
}

// Handler for updating the previewed settings within the same session
pub async fn update_preview(
    State(combined_state): State<CombinedState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<WallpaperSettings>, StatusCode> {
    let ((display, _), _, _) = combined_state;
    let mut display_guard = display.lock().await;

    if !display_guard.is_preview_session_owner(&request.session_id) {
        return Err(StatusCode::NOT_FOUND);
    }

    display_guard.update_preview_settings(request.settings);
    Ok(Json(display_guard.effective_settings().clone()))
}

// Handler for exiting preview mode; the display falls back to the active
// settings and the editor lock is released
pub async fn exit_preview_mode(State(combined_state): State<CombinedState>) -> StatusCode {
    let ((display, _), event_state, _) = combined_state;
    let mut display_guard = display.lock().await;
    display_guard.exit_preview_mode();

    let event_state_guard = event_state.lock().unwrap();
    event_state_guard.broadcast_editor_lock(false, None);

    StatusCode::OK
}

// Handler for checking preview mode status
pub async fn get_preview_mode_status(
    State(combined_state): State<CombinedState>,
) -> Json<PreviewModeState> {
    let ((display, _), _, _) = combined_state;
    let display_guard = display.lock().await;

    Json(PreviewModeState {
        active: display_guard.is_in_preview_mode(),
    })
}

// Handler for pinging preview mode to keep it active
pub async fn ping_preview_mode(State(combined_state): State<CombinedState>) -> StatusCode {
    let ((display, _), _, _) = combined_state;
    let mut display_guard = display.lock().await;

    if display_guard.update_preview_ping() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

// Handler for checking whether a session owns the active preview
pub async fn check_session_owner(
    State(combined_state): State<CombinedState>,
    Json(request): Json<SessionCheckRequest>,
) -> Json<SessionCheckResponse> {
    let ((display, _), _, _) = combined_state;
    let display_guard = display.lock().await;

    Json(SessionCheckResponse {
        owner: display_guard.is_preview_session_owner(&request.session_id),
    })
}
