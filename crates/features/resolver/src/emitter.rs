//! # Resolution Emitter
//!
//! Merges a configuration source onto registry defaults and validates the result.
//!
//! 1. Seed the mapping with every registered flag's default.
//! 2. Apply the source assertions in order; a later assertion for the same name wins.
//! 3. Validate the complete mapping (see [`crate::validator`]).
//! 4. Return the immutable [`ResolvedConfig`], or the validator's error unchanged.

use crate::error::ResolveError;
use crate::registry::FlagRegistry;
use crate::resolved::{FlagState, ResolvedConfig};
use crate::validator::{self, FlagMap};
use fxhash::FxHashMap;
use optgate_domain::source::ConfigSource;
use tracing::{debug, info, instrument, warn};

/// Resolves configuration sources against one frozen registry.
///
/// Holds no per-resolution state, so one emitter can serve concurrent resolutions.
#[derive(Debug, Clone)]
pub struct Emitter {
    registry: FlagRegistry,
}

impl Emitter {
    #[must_use]
    pub const fn new(registry: FlagRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    /// Steps 1 and 2: defaults overlaid with the source, not yet validated.
    #[must_use]
    pub fn merge(&self, source: &ConfigSource) -> FlagMap {
        let mut candidate = FlagMap::from_defaults(&self.registry);
        let mut asserted: FxHashMap<&str, (bool, Option<usize>)> = FxHashMap::default();

        for assertion in source {
            debug!(
                flag = %assertion.name,
                enabled = assertion.enabled,
                line = assertion.line,
                "apply"
            );

            let seen =
                asserted.insert(assertion.name.as_str(), (assertion.enabled, assertion.line));
            if let Some((previous, line)) = seen
                && previous != assertion.enabled
            {
                warn!(
                    flag = %assertion.name,
                    first_line = line,
                    line = assertion.line,
                    "Flag asserted with conflicting states, the later assertion wins"
                );
            }

            candidate.set(assertion.name.as_str(), assertion.enabled);
        }

        candidate
    }

    /// Resolves a single source.
    ///
    /// # Errors
    /// Returns the first violation found by [`validator::validate`].
    #[instrument(level = "debug", skip_all, fields(source = source.label()))]
    pub fn resolve(&self, source: &ConfigSource) -> Result<ResolvedConfig, ResolveError> {
        let candidate = self.merge(source);
        validator::validate(&self.registry, &candidate)?;

        let states = self
            .registry
            .iter()
            .map(|flag| FlagState {
                name: flag.name.clone(),
                category: flag.category,
                enabled: candidate.is_enabled(&flag.name),
                default: flag.default,
            })
            .collect();
        let resolved = ResolvedConfig::new(source.label(), states);

        info!(
            source = source.label(),
            enabled = resolved.enabled().count(),
            fingerprint = %resolved.fingerprint(),
            "Configuration resolved"
        );

        Ok(resolved)
    }

    /// Resolves the one authoritative source of a build.
    ///
    /// # Errors
    /// * [`ResolveError::MissingSource`] when `sources` is empty.
    /// * [`ResolveError::AmbiguousSource`] when more than one source is presented; no attempt
    ///   is made to merge or pick between them.
    /// * Any error of [`Emitter::resolve`].
    pub fn resolve_one(&self, sources: &[ConfigSource]) -> Result<ResolvedConfig, ResolveError> {
        match sources {
            [] => Err(ResolveError::MissingSource { context: None }),
            [source] => self.resolve(source),
            many => Err(ResolveError::AmbiguousSource {
                labels: many.iter().map(|s| s.label().to_owned()).collect(),
                context: None,
            }),
        }
    }

    /// Every violation of `source` instead of only the first.
    #[must_use]
    pub fn check(&self, source: &ConfigSource) -> Vec<ResolveError> {
        validator::validate_all(&self.registry, &self.merge(source))
    }
}
