use crate::UnknownVariant;
use serde::Deserialize;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Top-level tool settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsInner {
    pub logging: LoggingSettings,
    pub output: OutputSettings,
    pub catalog: CatalogSettings,
}

/// Thin Arc-wrapped settings for inexpensive cloning into subsystems.
///
/// Deserializes exactly like [`SettingsInner`], so loaders keep their type hints.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    inner: Arc<SettingsInner>,
}

impl Deref for Settings {
    type Target = SettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Settings {
    fn deref_mut(&mut self) -> &mut SettingsInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Console and file logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level directive (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Extra `EnvFilter` directives, e.g. `optgate_resolver=debug`.
    pub filter: Option<String>,
    /// Directory for rolling log files. Console only when unset.
    pub directory: Option<PathBuf>,
    pub max_files: usize,
    pub json: bool,
}

/// How resolved configurations are written out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Include-guard macro used when rendering a header.
    pub guard: String,
}

/// Where the flag registry comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Start from the built-in model catalog.
    pub builtin: bool,
    /// Additional TOML catalog layered on top.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `#define` / `#undef` header.
    #[default]
    Header,
    /// Ordered JSON object.
    Json,
    /// `-DNAME` compiler arguments.
    Defines,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Json => "json",
            Self::Defines => "defines",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" | "h" => Ok(Self::Header),
            "json" => Ok(Self::Json),
            "defines" | "cflags" => Ok(Self::Defines),
            _ => Err(UnknownVariant { kind: "output format", value: s.to_owned() }),
        }
    }
}

// --- Default ---

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "warn".to_owned(), filter: None, directory: None, max_files: 10, json: false }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { format: OutputFormat::Header, guard: "CPP_OPTIONS_H".to_owned() }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { builtin: true, path: None }
    }
}
