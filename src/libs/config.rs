//! Application configuration.
//!
//! Settings live in `config.json` inside the data directory. A missing file
//! means defaults, and every field has a default, so a config written by an
//! older version keeps loading when new settings are added. Relative paths
//! in the config are resolved against the data directory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use piecekeeper::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("Store file: {}", config.database_path().display());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::DB_FILE_NAME;
use crate::libs::assets::{ImageBounds, IMAGES_DIR_NAME};
use crate::libs::audit::HISTORY_FILE_NAME;
use crate::libs::filter::PageWindow;
use crate::libs::import::MARKER_FILE_NAME;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Store file name or path.
    pub database: String,

    /// Managed image directory.
    pub images_dir: String,

    /// Modification history file.
    pub history_file: String,

    /// Marker written once the legacy spreadsheet import has been handled.
    pub import_marker: String,

    /// Rows per search page.
    pub page_size: u32,

    /// Bounding box stored images are downsized to.
    pub max_image_width: u32,
    pub max_image_height: u32,

    #[serde(skip)]
    storage: Option<DataStorage>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: DB_FILE_NAME.to_string(),
            images_dir: IMAGES_DIR_NAME.to_string(),
            history_file: HISTORY_FILE_NAME.to_string(),
            import_marker: MARKER_FILE_NAME.to_string(),
            page_size: PageWindow::DEFAULT_PAGE_SIZE,
            max_image_width: ImageBounds::STORAGE.width,
            max_image_height: ImageBounds::STORAGE.height,
            storage: None,
        }
    }
}

impl Config {
    /// Loads the config from the per-user data directory.
    pub fn read() -> Result<Config> {
        Self::read_from(DataStorage::new())
    }

    /// Loads the config from `storage`, falling back to defaults when no file exists.
    pub fn read_from(storage: DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        let mut config = if config_file_path.exists() {
            let config_str = fs::read_to_string(config_file_path)?;
            serde_json::from_str::<Config>(&config_str)?
        } else {
            Config::default()
        };
        config.storage = Some(storage);
        Ok(config)
    }

    /// Default settings rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Config {
            storage: Some(DataStorage::at(base_dir)),
            ..Config::default()
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = self.storage().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn storage(&self) -> DataStorage {
        self.storage.clone().unwrap_or_default()
    }

    pub fn base_dir(&self) -> PathBuf {
        self.storage().base_path().to_path_buf()
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage().resolve(&self.database)
    }

    pub fn images_path(&self) -> PathBuf {
        self.storage().resolve(&self.images_dir)
    }

    pub fn history_path(&self) -> PathBuf {
        self.storage().resolve(&self.history_file)
    }

    pub fn import_marker_path(&self) -> PathBuf {
        self.storage().resolve(&self.import_marker)
    }

    pub fn image_bounds(&self) -> ImageBounds {
        ImageBounds::new(self.max_image_width, self.max_image_height)
    }

    pub fn page_window(&self, page: u32) -> PageWindow {
        PageWindow::page(page, self.page_size.max(1))
    }
}
