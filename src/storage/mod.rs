pub mod app_storage;
pub mod manager;

pub use app_storage::{create_storage, AppStorage, SharedStorage};
pub use manager::StorageManager;
