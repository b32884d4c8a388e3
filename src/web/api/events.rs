use crate::models::WallpaperSettings;
use crate::web::api::CombinedState;
use axum::{
    extract::State,
    response::{sse::Event, Sse},
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast::{self, Sender};
use tokio_stream::StreamExt as _;

// Define event types for editor lock
#[derive(Clone, Serialize, Deserialize)]
pub struct EditorLockEvent {
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<String>,
}

// Singleton for managing all event types
pub struct EventState {
    settings_tx: Sender<WallpaperSettings>,
    editor_lock_tx: Sender<EditorLockEvent>,
}

impl EventState {
    pub fn new() -> Arc<Mutex<Self>> {
        let (settings_tx, _) = broadcast::channel(100);
        let (editor_lock_tx, _) = broadcast::channel(100);

        Arc::new(Mutex::new(Self {
            settings_tx,
            editor_lock_tx,
        }))
    }

    pub fn get_settings_sender(&self) -> Sender<WallpaperSettings> {
        self.settings_tx.clone()
    }

    pub fn broadcast_settings(&self, settings: WallpaperSettings) {
        let _ = self.settings_tx.send(settings);
    }

    pub fn get_editor_lock_sender(&self) -> Sender<EditorLockEvent> {
        self.editor_lock_tx.clone()
    }

    pub fn broadcast_editor_lock(&self, is_locked: bool, locked_by: Option<String>) {
        let event = EditorLockEvent {
            locked: is_locked,
            locked_by,
        };
        let _ = self.editor_lock_tx.send(event);
    }
}

pub type SharedEventState = Arc<Mutex<EventState>>;

// Handler for settings SSE events
pub async fn settings_events(
    State(combined_state): State<CombinedState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let settings_rx = {
        let (_, event_state, _) = &combined_state;
        let event_state = event_state.lock().unwrap();
        event_state.get_settings_sender().subscribe()
    };

    let stream = stream::unfold(settings_rx, |mut rx| async move {
        match rx.recv().await {
            Ok(settings) => {
                let payload = serde_json::to_string(&settings).unwrap();
                let event = Event::default().data(payload);
                Some((Ok(event), rx))
            }
            Err(_) => {
                // Keep connection alive with a comment
                let event = Event::default().event("ping").data("");
                Some((Ok(event), rx))
            }
        }
    });

    // Add keepalive logic
    let keepalive = stream::repeat_with(|| Event::default().event("ping").data(""))
        .map(Ok)
        .throttle(Duration::from_secs(30));

    Sse::new(stream.merge(keepalive)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive-text"),
    )
}

// Handler for editor lock SSE events
pub async fn editor_lock_events(
    State(combined_state): State<CombinedState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let lock_rx = {
        let (_, event_state, _) = &combined_state;
        let event_state = event_state.lock().unwrap();
        event_state.get_editor_lock_sender().subscribe()
    };

    let stream = stream::unfold(lock_rx, |mut rx| async move {
        match rx.recv().await {
            Ok(lock_event) => {
                let payload = serde_json::to_string(&lock_event).unwrap();
                let event = Event::default().data(payload);
                Some((Ok(event), rx))
            }
            Err(_) => {
                // Keep connection alive with a comment
                let event = Event::default().event("ping").data("");
                Some((Ok(event), rx))
            }
        }
    });

    // Add keepalive logic
    let keepalive = stream::repeat_with(|| Event::default().event("ping").data(""))
        .map(Ok)
        .throttle(Duration::from_secs(30));

    Sse::new(stream.merge(keepalive)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive-text"),
    )
}
