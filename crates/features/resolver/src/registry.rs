//! # Flag Registry
//!
//! The single source of truth for which flags exist.
//!
//! A [`RegistryBuilder`] collects definitions and enforces per-definition invariants as they
//! are registered. [`RegistryBuilder::build`] then checks that every `requires`/`excludes`
//! entry names a registered flag and freezes the set into a [`FlagRegistry`]: an
//! `Arc`-backed, read-only value that can be cloned into any number of concurrent
//! resolutions without locking.

use crate::error::ResolveError;
use fxhash::{FxHashMap, FxHashSet};
use optgate_domain::flag::{CategorySet, Flag};
use std::sync::Arc;
use tracing::debug;

/// Mutable registration phase of a [`FlagRegistry`].
#[derive(Debug, Default, Clone)]
pub struct RegistryBuilder {
    flags: Vec<Flag>,
    index: FxHashMap<String, usize>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag definition.
    ///
    /// Repeated entries inside `requires`/`excludes` are collapsed, keeping first-seen order.
    ///
    /// # Errors
    /// * [`ResolveError::DuplicateFlag`] if the name is already registered.
    /// * [`ResolveError::InvalidDefinition`] if the name is not a valid macro identifier, the
    ///   flag references itself, or it both requires and excludes the same flag.
    pub fn register(&mut self, mut flag: Flag) -> Result<&mut Self, ResolveError> {
        if !is_identifier(&flag.name) {
            return Err(ResolveError::invalid(flag.name, "name must be a C identifier"));
        }
        if self.index.contains_key(&flag.name) {
            return Err(ResolveError::DuplicateFlag { name: flag.name, context: None });
        }

        dedup_in_place(&mut flag.requires);
        dedup_in_place(&mut flag.excludes);

        if flag.requires.contains(&flag.name) {
            return Err(ResolveError::invalid(flag.name, "flag cannot require itself"));
        }
        if flag.excludes.contains(&flag.name) {
            return Err(ResolveError::invalid(flag.name, "flag cannot exclude itself"));
        }
        if let Some(both) = flag.requires.iter().find(|r| flag.excludes.contains(r)) {
            let message = format!("'{both}' is both required and excluded");
            return Err(ResolveError::invalid(flag.name, message));
        }

        self.index.insert(flag.name.clone(), self.flags.len());
        self.flags.push(flag);
        Ok(self)
    }

    /// Chaining form of [`RegistryBuilder::register`].
    ///
    /// # Errors
    /// See [`RegistryBuilder::register`].
    pub fn with(mut self, flag: Flag) -> Result<Self, ResolveError> {
        self.register(flag)?;
        Ok(self)
    }

    /// Registers every flag of `flags`, stopping at the first failure.
    ///
    /// # Errors
    /// See [`RegistryBuilder::register`].
    pub fn extend(&mut self, flags: impl IntoIterator<Item = Flag>) -> Result<(), ResolveError> {
        for flag in flags {
            self.register(flag)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.flags.len()
    }

    /// Freezes the registry.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownFlag`] when a relation names an unregistered flag; the
    /// context names the flag that holds the dangling reference.
    pub fn build(self) -> Result<FlagRegistry, ResolveError> {
        for flag in &self.flags {
            let relations = flag.requires.iter().map(|r| ("requires", r));
            let relations = relations.chain(flag.excludes.iter().map(|e| ("excludes", e)));
            for (relation, target) in relations {
                if !self.index.contains_key(target) {
                    return Err(ResolveError::UnknownFlag {
                        name: target.clone(),
                        context: Some(format!("{relation} of '{}'", flag.name).into()),
                    });
                }
            }
        }

        debug!(flags = self.flags.len(), "Flag registry frozen");

        Ok(FlagRegistry { inner: Arc::new(RegistryInner { flags: self.flags, index: self.index }) })
    }
}

#[derive(Debug)]
struct RegistryInner {
    flags: Vec<Flag>,
    index: FxHashMap<String, usize>,
}

/// A frozen, insertion-ordered set of flag definitions.
///
/// Cloning is cheap; all clones share the same definitions.
#[derive(Debug, Clone)]
pub struct FlagRegistry {
    inner: Arc<RegistryInner>,
}

impl FlagRegistry {
    /// Returns the definition of `name`.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownFlag`] if no such flag is registered.
    pub fn lookup(&self, name: &str) -> Result<&Flag, ResolveError> {
        self.get(name).ok_or_else(|| ResolveError::unknown(name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.inner.index.get(name).map(|&i| &self.inner.flags[i])
    }

    /// Registration position of `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.inner.index.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    /// All definitions in registration order.
    #[must_use]
    pub fn all(&self) -> &[Flag] {
        &self.inner.flags
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flag> {
        self.inner.flags.iter()
    }

    /// Definitions whose category is in `categories`, in registration order.
    pub fn filter(&self, categories: CategorySet) -> impl Iterator<Item = &Flag> {
        self.iter().filter(move |f| categories.includes(f.category))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.flags.is_empty()
    }
}

impl<'a> IntoIterator for &'a FlagRegistry {
    type Item = &'a Flag;
    type IntoIter = std::slice::Iter<'a, Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn dedup_in_place(names: &mut Vec<String>) {
    let mut seen = FxHashSet::default();
    names.retain(|n| seen.insert(n.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use optgate_domain::flag::Category;

    #[test]
    fn identifiers() {
        assert!(is_identifier("NONLIN_FRSURF"));
        assert!(is_identifier("_R4R8"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("3D_DIFFKR"));
        assert!(!is_identifier("ALLOW-SRCG"));
        assert!(!is_identifier("F(x)"));
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut builder = RegistryBuilder::new();
        builder.register(Flag::new("EXACT_CONSERV", Category::Formulation)).unwrap();
        let err = builder
            .register(Flag::new("EXACT_CONSERV", Category::Algorithm))
            .expect_err("duplicate");
        assert!(
            matches!(err, ResolveError::DuplicateFlag { ref name, .. } if name == "EXACT_CONSERV")
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn register_rejects_self_reference_and_overlap() {
        let mut builder = RegistryBuilder::new();

        let err = builder
            .register(Flag::new("A", Category::Algorithm).requires(["A"]))
            .expect_err("self require");
        assert!(matches!(err, ResolveError::InvalidDefinition { .. }));

        let err = builder
            .register(Flag::new("A", Category::Algorithm).excludes(["A"]))
            .expect_err("self exclude");
        assert!(matches!(err, ResolveError::InvalidDefinition { .. }));

        let err = builder
            .register(Flag::new("A", Category::Algorithm).requires(["B"]).excludes(["B"]))
            .expect_err("overlap");
        assert!(err.to_string().contains("'B' is both required and excluded"));

        assert!(!builder.contains("A"));
    }

    #[test]
    fn register_collapses_repeated_relations() {
        let mut flag = Flag::new("A", Category::Algorithm);
        flag.requires = vec!["B".to_owned(), "B".to_owned()];
        let registry = RegistryBuilder::new()
            .with(Flag::new("B", Category::Algorithm))
            .and_then(|b| b.with(flag))
            .and_then(RegistryBuilder::build)
            .unwrap();
        assert_eq!(registry.lookup("A").unwrap().requires, vec!["B".to_owned()]);
    }

    #[test]
    fn build_rejects_dangling_references() {
        let err = RegistryBuilder::new()
            .with(Flag::new("NONLIN_FRSURF", Category::Formulation).requires(["EXACT_CONSERV"]))
            .and_then(RegistryBuilder::build)
            .expect_err("dangling");
        assert!(matches!(
            err,
            ResolveError::UnknownFlag { ref name, context: Some(_) } if name == "EXACT_CONSERV"
        ));
    }

    #[test]
    fn lookup_and_order() {
        let registry = RegistryBuilder::new()
            .with(Flag::new("Z", Category::Diagnostic))
            .and_then(|b| b.with(Flag::new("A", Category::Forcing)))
            .and_then(RegistryBuilder::build)
            .unwrap();

        let names: Vec<_> = registry.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Z", "A"]);
        assert_eq!(registry.position("A"), Some(1));
        assert!(matches!(registry.lookup("a"), Err(ResolveError::UnknownFlag { .. })));

        let forcing: Vec<_> = registry.filter(CategorySet::FORCING).map(|f| &f.name).collect();
        assert_eq!(forcing, ["A"]);
    }
}
