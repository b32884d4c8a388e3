use std::io;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::display::renderer::ImageSource;
use crate::models::WallpaperSettings;
use crate::storage::manager::{paths, StorageManager};

// Unified storage for all persisted application state
pub struct AppStorage {
    storage_manager: StorageManager,
}

impl AppStorage {
    pub fn new(storage_manager: StorageManager) -> Self {
        Self { storage_manager }
    }

    pub fn load_settings(&self) -> Option<WallpaperSettings> {
        if !self.storage_manager.file_exists(paths::SETTINGS_FILE) {
            debug!("No settings file found");
            return None;
        }

        match self.storage_manager.read_file(paths::SETTINGS_FILE) {
            Ok(contents) => match serde_json::from_str::<WallpaperSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded persisted wallpaper settings");
                    Some(settings)
                }
                Err(e) => {
                    error!("Error parsing settings file: {}", e);
                    None
                }
            },
            Err(e) => {
                error!("Error reading settings file: {}", e);
                None
            }
        }
    }

    pub fn save_settings(&self, settings: &WallpaperSettings) -> bool {
        match serde_json::to_string_pretty(settings) {
            Ok(json) => match self.storage_manager.write_file(paths::SETTINGS_FILE, &json) {
                Ok(_) => {
                    debug!(
                        "Settings saved to: {:?}",
                        self.storage_manager.get_file_path(paths::SETTINGS_FILE)
                    );
                    true
                }
                Err(e) => {
                    error!("Error writing settings file: {}", e);
                    false
                }
            },
            Err(e) => {
                error!("Error serializing settings: {}", e);
                false
            }
        }
    }

    pub fn save_image(&self, image_id: &str, data: &[u8]) -> bool {
        match self.storage_manager.save_image_file(image_id, data) {
            Ok(path) => {
                info!("Stored background image at {:?}", path);
                true
            }
            Err(e) => {
                error!("Error writing image {}: {}", image_id, e);
                false
            }
        }
    }

    pub fn load_image(&self, image_id: &str) -> Option<Vec<u8>> {
        match self.storage_manager.read_image_file(image_id) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                error!("Error reading image {}: {}", image_id, e);
                None
            }
        }
    }

    pub fn delete_image(&self, image_id: &str) {
        if let Err(e) = self.storage_manager.delete_image_file(image_id) {
            warn!("Failed to delete image {}: {}", image_id, e);
        }
    }
}

impl ImageSource for AppStorage {
    fn open(&self, id: &str) -> io::Result<Vec<u8>> {
        self.storage_manager.read_image_file(id)
    }
}

// All operations are plain filesystem calls on shared references, so the
// storage is shared without a lock
pub type SharedStorage = Arc<AppStorage>;

pub fn create_storage(custom_dir: Option<String>) -> SharedStorage {
    let storage_manager = StorageManager::new(custom_dir);
    Arc::new(AppStorage::new(storage_manager))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> AppStorage {
        AppStorage::new(StorageManager::new(Some(
            dir.path().join("storage").display().to_string(),
        )))
    }

    #[test]
    fn settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert!(storage.load_settings().is_none());

        let mut settings = WallpaperSettings::default();
        settings.custom_text = "#time".to_string();
        settings.font_size = 24;
        assert!(storage.save_settings(&settings));

        assert_eq!(storage.load_settings(), Some(settings));
    }

    #[test]
    fn corrupt_settings_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage
            .storage_manager
            .write_file(paths::SETTINGS_FILE, "not json")
            .unwrap();
        assert!(storage.load_settings().is_none());
    }

    #[test]
    fn images_are_served_through_the_image_source() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert!(storage.load_image("bg").is_none());
        assert!(storage.save_image("bg", &[9, 9, 9]));
        assert_eq!(storage.load_image("bg"), Some(vec![9, 9, 9]));

        let source: &dyn ImageSource = &storage;
        assert_eq!(source.open("bg").unwrap(), vec![9, 9, 9]);
        assert!(source.open("missing").is_err());
    }
}
