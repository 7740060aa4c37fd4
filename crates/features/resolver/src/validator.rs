//! # Constraint Validator
//!
//! Checks a complete candidate mapping against the registry rules. Validation is total:
//! it looks at the whole mapping at once, so the order in which flags were asserted never
//! changes the verdict.
//!
//! Rules are checked in a fixed order and the first violation is reported:
//! 1. **Dependencies**: every `requires` entry of an enabled flag is enabled.
//! 2. **Exclusions**: no `excludes` entry of an enabled flag is enabled.
//! 3. **Membership**: every name in the candidate is registered.

use crate::error::ResolveError;
use crate::registry::FlagRegistry;
use fxhash::FxHashMap;

/// An ordered, mutable `name -> enabled` mapping under construction.
///
/// Setting an existing name overwrites it in place, so the first-insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: Vec<(String, bool)>,
    index: FxHashMap<String, usize>,
}

impl FlagMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the mapping with every registered flag's default, in registry order.
    #[must_use]
    pub fn from_defaults(registry: &FlagRegistry) -> Self {
        let mut map = Self::new();
        for flag in registry {
            map.set(flag.name.clone(), flag.default);
        }
        map
    }

    /// Sets `name`, returning the previous state if there was one.
    pub fn set(&mut self, name: impl Into<String>, enabled: bool) -> Option<bool> {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[i].1, enabled));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, enabled));
        None
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    /// `false` for names that are absent.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(n, on)| (n.as_str(), *on))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, enabled) in iter {
            map.set(name, enabled);
        }
        map
    }
}

/// Accepts the candidate or returns its first violation.
///
/// # Errors
/// * [`ResolveError::UnsatisfiedDependency`] listing every missing requirement of the first
///   enabled flag (registry order) whose requirements are not all enabled.
/// * [`ResolveError::MutualExclusion`] for the first enabled excluded pair.
/// * [`ResolveError::UnknownFlag`] for the first unregistered name (candidate order).
pub fn validate(registry: &FlagRegistry, candidate: &FlagMap) -> Result<(), ResolveError> {
    violations(registry, candidate).next().map_or(Ok(()), Err)
}

/// Every violation of the candidate, in the same order [`validate`] checks them.
///
/// A pair of flags that exclude each other is reported once.
#[must_use]
pub fn validate_all(registry: &FlagRegistry, candidate: &FlagMap) -> Vec<ResolveError> {
    violations(registry, candidate).collect()
}

fn violations<'a>(
    registry: &'a FlagRegistry,
    candidate: &'a FlagMap,
) -> impl Iterator<Item = ResolveError> + 'a {
    let enabled = move || registry.iter().filter(move |f| candidate.is_enabled(&f.name));

    let dependencies = enabled().filter_map(move |flag| {
        let missing: Vec<String> =
            flag.requires.iter().filter(|r| !candidate.is_enabled(r)).cloned().collect();
        (!missing.is_empty()).then(|| ResolveError::UnsatisfiedDependency {
            flag: flag.name.clone(),
            missing,
            context: None,
        })
    });

    let exclusions = enabled().flat_map(move |flag| {
        flag.excludes
            .iter()
            .filter(move |other| candidate.is_enabled(other))
            .filter(move |other| !reported_from_other_side(registry, &flag.name, other))
            .map(move |other| ResolveError::MutualExclusion {
                flag: flag.name.clone(),
                conflicting: other.clone(),
                context: None,
            })
    });

    let unknown = candidate
        .iter()
        .filter(move |(name, _)| !registry.contains(name))
        .map(|(name, _)| ResolveError::unknown(name));

    dependencies.chain(exclusions).chain(unknown)
}

/// True when `other` comes first in the registry and already declares the exclusion of `flag`.
fn reported_from_other_side(registry: &FlagRegistry, flag: &str, other: &str) -> bool {
    let Some(counterpart) = registry.get(other) else { return false };
    counterpart.excludes.iter().any(|e| e == flag)
        && registry.position(other) < registry.position(flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use optgate_domain::flag::{Category, Flag};

    fn registry() -> FlagRegistry {
        let mut builder = RegistryBuilder::new();
        builder
            .extend([
                Flag::new("EXACT_CONSERV", Category::Formulation),
                Flag::new("NONLIN_FRSURF", Category::Formulation).requires(["EXACT_CONSERV"]),
                Flag::new("SOLVE_DIAGONAL_LOWMEMORY", Category::Algorithm)
                    .excludes(["SOLVE_DIAGONAL_KINNER"]),
                Flag::new("SOLVE_DIAGONAL_KINNER", Category::Algorithm)
                    .excludes(["SOLVE_DIAGONAL_LOWMEMORY"]),
                Flag::new("ALLOW_3D_DIFFKR", Category::Algorithm)
                    .requires(["INCLUDE_CALC_DIFFUSIVITY_CALL", "EXACT_CONSERV"]),
                Flag::new("INCLUDE_CALC_DIFFUSIVITY_CALL", Category::Algorithm),
            ])
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn flag_map_overwrites_in_place() {
        let mut map = FlagMap::new();
        assert_eq!(map.set("A", true), None);
        map.set("B", false);
        assert_eq!(map.set("A", false), Some(true));
        assert_eq!(map.iter().collect::<Vec<_>>(), [("A", false), ("B", false)]);
        assert!(!map.is_enabled("missing"));
    }

    #[test]
    fn defaults_are_valid() {
        let registry = registry();
        assert!(validate(&registry, &FlagMap::from_defaults(&registry)).is_ok());
    }

    #[test]
    fn reports_all_missing_requirements() {
        let registry = registry();
        let mut candidate = FlagMap::from_defaults(&registry);
        candidate.set("ALLOW_3D_DIFFKR", true);

        let err = validate(&registry, &candidate).expect_err("missing requirements");
        match err {
            ResolveError::UnsatisfiedDependency { flag, missing, .. } => {
                assert_eq!(flag, "ALLOW_3D_DIFFKR");
                assert_eq!(missing, ["INCLUDE_CALC_DIFFUSIVITY_CALL", "EXACT_CONSERV"]);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn symmetric_exclusion_is_reported_once() {
        let registry = registry();
        let mut candidate = FlagMap::from_defaults(&registry);
        candidate.set("SOLVE_DIAGONAL_KINNER", true);
        candidate.set("SOLVE_DIAGONAL_LOWMEMORY", true);

        let all = validate_all(&registry, &candidate);
        assert_eq!(all.len(), 1);
        assert!(matches!(
            &all[0],
            ResolveError::MutualExclusion { flag, conflicting, .. }
                if flag == "SOLVE_DIAGONAL_LOWMEMORY" && conflicting == "SOLVE_DIAGONAL_KINNER"
        ));
    }

    #[test]
    fn dependency_is_checked_before_exclusion_and_membership() {
        let registry = registry();
        let mut candidate = FlagMap::from_defaults(&registry);
        candidate.set("ALLOW_MYSTERY_FLAG", true);
        candidate.set("SOLVE_DIAGONAL_KINNER", true);
        candidate.set("SOLVE_DIAGONAL_LOWMEMORY", true);
        candidate.set("NONLIN_FRSURF", true);

        let kinds: Vec<_> =
            validate_all(&registry, &candidate).iter().map(ResolveError::kind).collect();
        assert_eq!(kinds, ["unsatisfied-dependency", "mutual-exclusion", "unknown-flag"]);
        assert_eq!(validate(&registry, &candidate).unwrap_err().kind(), "unsatisfied-dependency");
    }

    #[test]
    fn unknown_names_fail_even_when_disabled() {
        let registry = registry();
        let mut candidate = FlagMap::from_defaults(&registry);
        candidate.set("ALLOW_MYSTERY_FLAG", false);

        assert!(matches!(
            validate(&registry, &candidate),
            Err(ResolveError::UnknownFlag { ref name, .. }) if name == "ALLOW_MYSTERY_FLAG"
        ));
    }
}
