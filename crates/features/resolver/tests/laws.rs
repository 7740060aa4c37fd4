mod fixtures;

use fixtures::{free_surface_registry, registry, solver_registry};
use optgate_domain::flag::{Category, Flag};
use optgate_domain::source::ConfigSource;
use optgate_resolver::*;
use proptest::collection::vec;
use proptest::prelude::*;

fn independent(defaults: &[bool]) -> FlagRegistry {
    registry(defaults.iter().enumerate().map(|(i, &on)| {
        let flag = Flag::new(format!("ALLOW_PKG_{i}"), Category::Algorithm);
        if on { flag.enabled_by_default() } else { flag }
    }))
}

fn assertions(max_flags: usize) -> impl Strategy<Value = Vec<(usize, bool)>> {
    vec((0..max_flags, any::<bool>()), 0..32)
}

fn indexed_source(label: &str, asserted: &[(usize, bool)]) -> ConfigSource {
    ConfigSource::from_pairs(label, asserted.iter().map(|&(i, on)| (format!("ALLOW_PKG_{i}"), on)))
}

proptest! {
    #[test]
    fn silent_source_yields_registry_defaults(defaults in vec(any::<bool>(), 1..12)) {
        let emitter = Emitter::new(independent(&defaults));
        let resolved = emitter.resolve(&ConfigSource::new("exp")).unwrap();

        let states: Vec<bool> = resolved.iter().map(|s| s.enabled).collect();
        prop_assert_eq!(states, defaults);
    }

    #[test]
    fn last_assertion_wins(defaults in vec(any::<bool>(), 8), asserted in assertions(8)) {
        let source = indexed_source("exp", &asserted);
        let resolved = Emitter::new(independent(&defaults)).resolve(&source).unwrap();

        for (i, &default) in defaults.iter().enumerate() {
            let expected =
                asserted.iter().rev().find(|(j, _)| *j == i).map_or(default, |&(_, on)| on);
            prop_assert_eq!(resolved.is_enabled(&format!("ALLOW_PKG_{i}")).unwrap(), expected);
        }
    }

    #[test]
    fn exclusion_fails_in_any_order(kinner_first in any::<bool>(), srcg in any::<bool>()) {
        let mut source = ConfigSource::new("exp").assert("ALLOW_SRCG", srcg);
        let order = if kinner_first {
            ["SOLVE_DIAGONAL_KINNER", "SOLVE_DIAGONAL_LOWMEMORY"]
        } else {
            ["SOLVE_DIAGONAL_LOWMEMORY", "SOLVE_DIAGONAL_KINNER"]
        };
        for name in order {
            source = source.define(name);
        }

        let err = Emitter::new(solver_registry()).resolve(&source).unwrap_err();
        let is_mutual_exclusion = matches!(err, ResolveError::MutualExclusion { .. });
        prop_assert!(is_mutual_exclusion);
    }

    #[test]
    fn enabled_flag_with_disabled_requirement_fails(noise in vec(any::<bool>(), 0..6)) {
        let mut source = ConfigSource::new("exp");
        for on in noise {
            source = source.assert("EXACT_CONSERV", on).assert("NONLIN_FRSURF", !on);
        }
        let source = source.define("NONLIN_FRSURF").undef("EXACT_CONSERV");

        let err = Emitter::new(free_surface_registry()).resolve(&source).unwrap_err();
        prop_assert!(
            matches!(
                err,
                ResolveError::UnsatisfiedDependency { ref flag, .. } if flag == "NONLIN_FRSURF"
            ),
            "unexpected error: {}", err
        );
    }

    #[test]
    fn resolution_is_deterministic(defaults in vec(any::<bool>(), 8), asserted in assertions(8)) {
        let emitter = Emitter::new(independent(&defaults));
        let source = indexed_source("exp", &asserted);

        let first = emitter.resolve(&source).unwrap();
        let second = emitter.resolve(&source).unwrap();
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn order_of_distinct_assertions_does_not_matter(states in vec(any::<bool>(), 8)) {
        let emitter = Emitter::new(independent(&[false; 8]));
        let mut pairs: Vec<_> = states.iter().copied().enumerate().collect();

        let forward = emitter.resolve(&indexed_source("a", &pairs)).unwrap();
        pairs.reverse();
        let backward = emitter.resolve(&indexed_source("b", &pairs)).unwrap();
        prop_assert_eq!(forward.fingerprint(), backward.fingerprint());
    }
}

#[test]
fn fingerprint_is_stable_and_ignores_label() {
    let emitter = Emitter::new(free_surface_registry());
    let resolved = emitter.resolve(&ConfigSource::new("a").define("EXACT_CONSERV")).unwrap();
    let relabelled = emitter.resolve(&ConfigSource::new("b").define("EXACT_CONSERV")).unwrap();
    let other = emitter.resolve(&ConfigSource::new("a")).unwrap();

    assert_eq!(resolved.fingerprint().len(), 64);
    assert_eq!(resolved.fingerprint(), relabelled.fingerprint());
    assert_ne!(resolved.fingerprint(), other.fingerprint());
}
