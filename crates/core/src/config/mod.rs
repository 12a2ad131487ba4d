//! Settings loading from the `.scanflow/` directory.
//!
//! A single `config.toml` controls engine-wide behavior. A missing file or
//! directory yields the defaults; a file that exists but cannot be read or
//! parsed is an error.

pub mod error;

pub use error::{ConfigError, ConfigResult};

use sf_protocol::config_models::StoreSettings;
use std::path::Path;
use tracing::debug;

/// Load engine settings from `<root>/.scanflow/config.toml`.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or has
/// invalid TOML syntax.
pub fn load_settings(root: &Path) -> ConfigResult<StoreSettings> {
    let config_path = root.join(".scanflow").join("config.toml");

    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(StoreSettings::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let settings: StoreSettings =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path,
            source,
        })?;

    Ok(settings)
}
