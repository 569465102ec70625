//! Tuning file loading: optional TOML file, then `WALLET_ASSETS__*` overrides.

use config::{Config, Environment, File, FileFormat};
use core_logic::{ConfigError, TuningConfig};
use std::path::Path;

pub const ENV_PREFIX: &str = "WALLET_ASSETS";

/// Load timeout/retry tuning. Missing keys keep their defaults.
///
/// The API key is never taken from here; it only comes from the command line.
pub fn load_tuning(path: Option<&Path>) -> Result<TuningConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let location = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "environment".to_string());

    let settings = builder.build().map_err(|e| ConfigError::LoadFailed {
        path: location.clone(),
        msg: e.to_string(),
    })?;

    let tuning: TuningConfig = settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadFailed {
            path: location,
            msg: e.to_string(),
        })?;

    tuning.validate()?;
    Ok(tuning)
}
