use crate::display::manager::WallpaperManager;
use crate::web::api::events::EventState;
use log::info;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;

// Preview timeout in seconds
const PREVIEW_TIMEOUT: u64 = 5;

/// Owns the two background tasks that drive the panel: a slow state tick
/// for clock and battery data and a frame tick that pushes pixels.
///
/// Stopping aborts both tasks. Aborts land at await points, so a frame
/// that is already being composed always completes before the task ends.
pub struct UpdateLoop {
    state_task: Option<JoinHandle<()>>,
    frame_task: Option<JoinHandle<()>>,
}

pub type SharedUpdateLoop = Arc<Mutex<UpdateLoop>>;

impl Default for UpdateLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateLoop {
    pub fn new() -> Self {
        Self {
            state_task: None,
            frame_task: None,
        }
    }

    pub fn start(
        &mut self,
        display: Arc<tokio::sync::Mutex<WallpaperManager>>,
        event_state: Arc<Mutex<EventState>>,
    ) {
        if self.is_running() {
            return;
        }

        info!("Starting display update loops");
        self.state_task = Some(tokio::spawn(state_loop(display.clone(), event_state)));
        self.frame_task = Some(tokio::spawn(frame_loop(display)));
    }

    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        info!("Stopping display update loops");
        if let Some(task) = self.state_task.take() {
            task.abort();
        }
        if let Some(task) = self.frame_task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.state_task.is_some() || self.frame_task.is_some()
    }
}

// Once-a-second state refresh: clock, battery, background and preview timeout
async fn state_loop(
    display: Arc<tokio::sync::Mutex<WallpaperManager>>,
    event_state: Arc<Mutex<EventState>>,
) {
    loop {
        {
            let mut display_guard = display.lock().await;

            // Check for preview mode timeout
            if display_guard.check_preview_timeout(PREVIEW_TIMEOUT).is_some() {
                // If preview timed out, broadcast the editor unlock event
                if let Ok(event_state_guard) = event_state.lock() {
                    event_state_guard.broadcast_editor_lock(false, None);
                }
            }

            display_guard.tick_state();
        }

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    }
}

// Frame composition loop; the sleep interval follows the current mode so
// enabling the scanline immediately raises the frame rate
async fn frame_loop(display: Arc<tokio::sync::Mutex<WallpaperManager>>) {
    let mut last_time = Instant::now();
    let mut frame_count = 0;
    let mut last_stats_time = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_time).as_secs_f32();
        last_time = now;

        let interval = {
            let mut display_guard = display.lock().await;
            display_guard.advance(dt);
            display_guard.render_frame();
            display_guard.frame_interval()
        };

        // Log performance stats periodically
        frame_count += 1;
        if now.duration_since(last_stats_time).as_secs() >= 60 {
            let fps = frame_count as f32 / now.duration_since(last_stats_time).as_secs_f32();
            info!("Display performance: {:.1} FPS", fps);
            frame_count = 0;
            last_stats_time = now;
        }

        tokio::time::sleep(interval).await;
    }
}
