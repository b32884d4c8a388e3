use crate::display::manager::WallpaperManager;
use crate::display::update_loop::SharedUpdateLoop;
use crate::storage::app_storage::SharedStorage;
use crate::web::api::events::SharedEventState;
use std::sync::Arc;

pub mod display;
pub mod events;
pub mod images;
pub mod preview;
pub mod settings;

// Type aliases for our application state
pub type AppState = (Arc<tokio::sync::Mutex<WallpaperManager>>, SharedStorage);
pub type CombinedState = (AppState, SharedEventState, SharedUpdateLoop);
