//! Command implementations.

pub mod check;
pub mod list;
pub mod new;
pub mod sync;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;

/// Load `folio.toml`, layering `FOLIO__*` environment overrides.
///
/// A missing file falls back to the default `docs` and `i18n` collections.
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!(?config_path, "No configuration file, using defaults");
    }

    Config::load_with_env(config_path).wrap_err("Failed to load configuration")
}
