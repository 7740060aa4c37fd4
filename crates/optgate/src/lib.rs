//! Facade crate for `OptGate`.
//! Re-exports the domain, kernel and resolver crates and wires settings into a registry.
//! Keep this crate thin: it should compose other crates, not implement resolution logic.
//!
//! ## Usage
//! - Load [`domain::config::Settings`] with [`kernel::config::load_settings`].
//! - Build the registry with [`registry_from_settings`] and resolve through [`Emitter`].

pub use optgate_domain as domain;
pub use optgate_kernel as kernel;
pub use optgate_resolver as resolver;
pub use optgate_resolver::{Emitter, FlagRegistry, ResolveError, ResolvedConfig};

use optgate_domain::config::CatalogSettings;
use optgate_resolver::{RegistryBuilder, catalog};
use std::path::Path;

/// Builds the flag registry described by `settings`, with an optional extra catalog file.
///
/// The built-in flags come first (when enabled), then `settings.path`, then `extra`.
///
/// # Errors
/// Any registration, catalog decoding or I/O error of [`catalog::extend`].
pub fn registry_from_settings(
    settings: &CatalogSettings,
    extra: Option<&Path>,
) -> Result<FlagRegistry, ResolveError> {
    let mut builder =
        if settings.builtin { catalog::builtin_builder()? } else { RegistryBuilder::new() };

    for path in settings.path.as_deref().into_iter().chain(extra) {
        builder = catalog::extend(builder, path)?;
    }

    builder.build()
}
