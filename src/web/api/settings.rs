use crate::models::WallpaperSettings;
use crate::web::api::CombinedState;
use axum::extract::State;
use axum::Json;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

// Handler to get the active wallpaper settings
pub async fn get_settings(State(combined_state): State<CombinedState>) -> Json<WallpaperSettings> {
    let ((display, _), _, _) = combined_state;
    let display = display.lock().await;

    Json(display.settings().clone())
}

// Handler for updating settings - the display picks them up immediately,
// the filesystem write is debounced so slider drags don't hammer the disk
pub async fn update_settings(
    State(combined_state): State<CombinedState>,
    Json(settings): Json<WallpaperSettings>,
) -> Json<WallpaperSettings> {
    static LAST_UPDATE_TIME: AtomicI64 = AtomicI64::new(0);
    static SAVE_PENDING: AtomicBool = AtomicBool::new(false);
    static LATEST_TASK_ID: AtomicI64 = AtomicI64::new(0);

    // Destructure the state
    let ((display, storage), sse_state, _) = combined_state;

    // Get current timestamp in milliseconds
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64;

    // Always update the display immediately
    let mut display = display.lock().await;

    let previous = display.settings().clone();
    display.apply_settings(settings);
    let applied = display.settings().clone();

    LAST_UPDATE_TIME.store(now, Ordering::SeqCst);

    if previous != applied {
        SAVE_PENDING.store(true, Ordering::SeqCst);

        debug!("Wallpaper settings updated");

        // A replaced background image has no other references, so the
        // old file can go
        if let Some(old_image) = &previous.background_image {
            if applied.background_image.as_deref() != Some(old_image.as_str()) {
                info!("Background image changed, removing {}", old_image);
                storage.delete_image(old_image);
            }
        }

        // Broadcast the settings change via SSE
        let sse_state_guard = sse_state.lock().unwrap();
        sse_state_guard.broadcast_settings(applied.clone());

        // Clone what the save task needs
        let storage_clone = storage.clone();
        let settings_to_save = applied.clone();

        // Increment the task ID and get its value
        let task_id = LATEST_TASK_ID.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::spawn(async move {
            // Wait 1 second
            tokio::time::sleep(Duration::from_millis(1000)).await;

            // Check if there have been no updates during our waiting period
            let last_update = LAST_UPDATE_TIME.load(Ordering::SeqCst);
            let time_passed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as i64
                - last_update;

            // Only save if this is still the latest task and save is pending
            let is_latest = LATEST_TASK_ID.load(Ordering::SeqCst) == task_id;

            // If no updates for ~1 second, save is still pending, and this is the latest task
            if time_passed >= 950 && SAVE_PENDING.load(Ordering::SeqCst) && is_latest {
                // Reset pending flag
                SAVE_PENDING.store(false, Ordering::SeqCst);

                storage_clone.save_settings(&settings_to_save);
            }
        });
    }

    // Return the settings as applied after sanitization
    Json(applied)
}
