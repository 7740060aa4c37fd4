use crate::error::ResolveError;
use fxhash::FxHashMap;
use optgate_domain::flag::Category;
use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// State of one registered flag after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagState {
    pub name: String,
    pub category: Category,
    pub enabled: bool,
    pub default: bool,
}

impl FlagState {
    /// True when the source moved this flag away from its registry default.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.enabled != self.default
    }
}

/// The validated, complete flag mapping handed to the build step.
///
/// Immutable once produced; clones share the same states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    source: Arc<str>,
    states: Arc<[FlagState]>,
    index: Arc<FxHashMap<String, usize>>,
}

impl ResolvedConfig {
    pub(crate) fn new(source: &str, states: Vec<FlagState>) -> Self {
        let index = states.iter().enumerate().map(|(i, s)| (s.name.clone(), i)).collect();
        Self { source: source.into(), states: states.into(), index: Arc::new(index) }
    }

    /// Label of the configuration source this was resolved from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolved state of `name`.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownFlag`] for a name outside the registry. An engine
    /// checking such a name has a flag the registry is missing.
    pub fn is_enabled(&self, name: &str) -> Result<bool, ResolveError> {
        self.get(name).ok_or_else(|| ResolveError::unknown(name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.index.get(name).map(|&i| self.states[i].enabled)
    }

    /// Every flag in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlagState> {
        self.states.iter()
    }

    /// Names of the enabled flags in registry order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|s| s.enabled).map(|s| s.name.as_str())
    }

    /// Flags whose resolved state differs from the registry default.
    pub fn overrides(&self) -> impl Iterator<Item = &FlagState> {
        self.iter().filter(|s| s.is_override())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Hex SHA-256 digest of the canonical `NAME=0|1` lines.
    ///
    /// Depends only on the flag states, not on the source label.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for state in self.iter() {
            hasher.update(state.name.as_bytes());
            hasher.update(if state.enabled { b"=1\n" } else { b"=0\n" });
        }
        hex::encode(hasher.finalize())
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = &'a FlagState;
    type IntoIter = std::slice::Iter<'a, FlagState>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serializes as an ordered `{ "NAME": bool }` map.
impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for state in self.iter() {
            map.serialize_entry(&state.name, &state.enabled)?;
        }
        map.end()
    }
}
