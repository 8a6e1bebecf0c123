//! Storage initialization
//!
//! First-run setup: directories, default settings and empty data files.

use tracing::info;

use crate::config::paths::MealPoolPaths;
use crate::config::settings::Settings;
use crate::error::MealPoolError;

use super::file_io::write_json_atomic;
use super::members::MemberData;
use super::transactions::TransactionData;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running it twice is harmless.
pub fn initialize_storage(paths: &MealPoolPaths) -> Result<(), MealPoolError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }
    if !paths.members_file().exists() {
        write_json_atomic(paths.members_file(), &MemberData::default())?;
    }
    if !paths.transactions_file().exists() {
        write_json_atomic(paths.transactions_file(), &TransactionData::default())?;
    }

    info!(base_dir = %paths.base_dir().display(), "initialized storage");
    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &MealPoolPaths) -> bool {
    !paths.is_initialized()
}
