#![allow(dead_code)]

use optgate_domain::flag::{Category, Flag};
use optgate_resolver::{FlagRegistry, RegistryBuilder};

/// The options header shipped with the example experiment.
pub const EXPERIMENT_HEADER: &str = "\
#ifndef CPP_OPTIONS_H
#define CPP_OPTIONS_H

#define SHORTWAVE_HEATING       /* Surface forcing for simplicity */
#define NONLIN_FRSURF           /* Non-linear free surface (for wave propagation) */
#define EXACT_CONSERV           /* Ensure mass conservation */
#define INCLUDE_PHIHYD_CALCULATION_CODE

#endif /* CPP_OPTIONS_H */
";

/// Builds a registry from `flags`.
/// # Panics
/// * If the definitions are inconsistent.
#[must_use]
pub fn registry(flags: impl IntoIterator<Item = Flag>) -> FlagRegistry {
    let mut builder = RegistryBuilder::new();
    builder.extend(flags).expect("register fixture flags");
    builder.build().expect("freeze fixture registry")
}

/// `NONLIN_FRSURF` requiring `EXACT_CONSERV`, both off by default.
#[must_use]
pub fn free_surface_registry() -> FlagRegistry {
    registry([
        Flag::new("NONLIN_FRSURF", Category::Formulation).requires(["EXACT_CONSERV"]),
        Flag::new("EXACT_CONSERV", Category::Formulation),
    ])
}

/// Two tridiagonal solver variants that exclude each other.
#[must_use]
pub fn solver_registry() -> FlagRegistry {
    registry([
        Flag::new("SOLVE_DIAGONAL_LOWMEMORY", Category::Algorithm)
            .excludes(["SOLVE_DIAGONAL_KINNER"]),
        Flag::new("SOLVE_DIAGONAL_KINNER", Category::Algorithm),
        Flag::new("ALLOW_SRCG", Category::Algorithm).enabled_by_default(),
    ])
}
