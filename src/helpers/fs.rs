//! File System Utilities
//!
//! Configuration and data directory management.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("de", "solar-configurator", "solar-configurator").ok_or_else(|| {
        Error::Invalid {
            message: "Could not determine project directories".to_string(),
        }
    })
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/solar-configurator/` or `$XDG_CONFIG_HOME/solar-configurator/`
/// - **macOS**: `~/Library/Application Support/de.solar-configurator.solar-configurator/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\solar-configurator\solar-configurator\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let config_dir = dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    Ok(config_dir.to_path_buf())
}

/// Get the data directory for snapshots and downloaded offers
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/solar-configurator/`
/// - **macOS**: `~/Library/Application Support/de.solar-configurator.solar-configurator/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\solar-configurator\solar-configurator\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let data_dir = dirs.data_dir();

    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    Ok(data_dir.to_path_buf())
}

/// Check if running in development mode
pub fn is_development() -> bool {
    cfg!(debug_assertions)
}
