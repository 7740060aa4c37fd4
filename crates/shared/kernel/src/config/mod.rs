use config::{Config, Environment, File, FileFormat, Map};
use optgate_domain::config::Settings;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings file looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "optgate";

/// Prefix of environment overrides (`OPTGATE__OUTPUT__FORMAT=json`).
pub const ENV_PREFIX: &str = "OPTGATE";

/// Custom error type for config loading.
#[optgate_derive::optgate_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, from lowest to highest precedence:
/// 1. **Defaults**: whatever `#[serde(default)]` on `T` provides.
/// 2. **File**: `path` when given (must exist), otherwise `optgate.{toml,json,...}` in the
///    working directory if present.
/// 3. **Environment**: variables prefixed with `OPTGATE__`, nested with double underscores
///    (e.g., `OPTGATE__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// This function will return an error if:
/// * An explicitly requested file cannot be found or parsed.
/// * The merged values do not match the structure of type `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with_env(path, None)
}

/// [`load_config`] with the environment layer read from `vars` instead of the process
/// environment when given. Keys keep their `OPTGATE__` form.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .try_parsing(true)
                .source(vars),
        );

    if required {
        info!("Loading settings from {}", effective_path.display());
    } else {
        debug!("Looking for optional settings file {}", effective_path.display());
    }

    let config = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<T>()
        .context("Failed to deserialize settings")?;

    Ok(config)
}

/// Loads the tool [`Settings`].
///
/// # Errors
/// See [`load_config`].
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<Settings, ConfigError> {
    load_config::<Settings>(path)
}

/// Parses settings from an in-memory TOML document, without environment overrides.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the document is malformed.
pub fn settings_from_toml(raw: &str) -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::from_str(raw, FileFormat::Toml))
        .build()
        .context("Failed to parse inline settings")?
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}
