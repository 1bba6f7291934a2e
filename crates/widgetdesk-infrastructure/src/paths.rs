//! Path management for widgetdesk configuration files.
//!
//! ```text
//! ~/.config/widgetdesk/        # Config directory (platform default via `dirs`)
//! └── config.toml              # Console configuration
//! ```

use std::path::PathBuf;
use widgetdesk_core::{DeskError, error::Result};

const APP_DIR: &str = "widgetdesk";
const CONFIG_FILE: &str = "config.toml";

pub struct DeskPaths;

impl DeskPaths {
    /// Returns the widgetdesk configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/widgetdesk/` on Linux
    /// - `Err(DeskError::Config)`: The platform has no config directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DeskError::config("Cannot determine the user config directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
