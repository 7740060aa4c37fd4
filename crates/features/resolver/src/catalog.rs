//! # Catalog
//!
//! The flag set of the circulation model, and loading of additional flags from TOML.
//!
//! A catalog file is a list of `[[flag]]` tables:
//!
//! ```toml
//! [[flag]]
//! name = "ALLOW_TIDES"
//! category = "forcing"
//! default = false
//! requires = ["NONLIN_FRSURF"]
//! description = "Astronomical tidal forcing"
//! ```

use crate::error::{ResolveError, ResolveErrorExt};
use crate::registry::{FlagRegistry, RegistryBuilder};
use optgate_domain::flag::{Category, Flag};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "flag")]
    flags: Vec<Flag>,
}

/// Flag definitions of the model's main options header.
#[must_use]
pub fn builtin_flags() -> Vec<Flag> {
    use Category::{Algorithm, Diagnostic, Forcing, Formulation, Structural};

    vec![
        // Surface forcing
        Flag::new("SHORTWAVE_HEATING", Forcing)
            .describe("Penetrating shortwave radiation heats the water column"),
        Flag::new("ATMOSPHERIC_LOADING", Forcing)
            .enabled_by_default()
            .describe("Atmospheric pressure loading of the free surface"),
        Flag::new("ALLOW_BALANCE_FLUXES", Forcing)
            .describe("Remove the global mean of surface heat and freshwater fluxes"),
        Flag::new("ALLOW_ADDFLUID", Forcing)
            .describe("Mass source or sink of fluid in the interior"),
        Flag::new("ALLOW_FRICTION_HEATING", Forcing)
            .describe("Heating from the dissipation of kinetic energy"),
        // Free surface and conservation
        Flag::new("EXACT_CONSERV", Formulation)
            .enabled_by_default()
            .describe("Exact mass conservation of the free-surface update"),
        Flag::new("NONLIN_FRSURF", Formulation)
            .requires(["EXACT_CONSERV"])
            .describe("Non-linear free surface with time-varying layer thickness"),
        Flag::new("DISABLE_RSTAR_CODE", Formulation)
            .requires(["NONLIN_FRSURF"])
            .describe("Compile out the rescaled height coordinate of the non-linear free surface"),
        // Pressure
        Flag::new("INCLUDE_PHIHYD_CALCULATION_CODE", Formulation)
            .enabled_by_default()
            .describe("Hydrostatic pressure (geopotential anomaly) calculation"),
        Flag::new("ALLOW_NONHYDROSTATIC", Formulation)
            .requires(["INCLUDE_PHIHYD_CALCULATION_CODE"])
            .describe("Non-hydrostatic pressure solve"),
        Flag::new("ALLOW_SOLVE4_PS_AND_DRAG", Algorithm)
            .describe("Solve for surface pressure together with implicit bottom drag"),
        // Vertical mixing
        Flag::new("INCLUDE_CONVECT_CALL", Algorithm)
            .enabled_by_default()
            .describe("Convective adjustment"),
        Flag::new("INCLUDE_CALC_DIFFUSIVITY_CALL", Algorithm)
            .enabled_by_default()
            .describe("Vertical diffusivity calculation"),
        Flag::new("ALLOW_3D_DIFFKR", Algorithm)
            .requires(["INCLUDE_CALC_DIFFUSIVITY_CALL"])
            .describe("Three-dimensional vertical diffusivity field"),
        Flag::new("ALLOW_BL79_LAT_VARY", Algorithm)
            .requires(["INCLUDE_CALC_DIFFUSIVITY_CALL"])
            .describe("Latitude-dependent background diffusivity profile"),
        Flag::new("INCLUDE_IMPLVERTADV_CODE", Algorithm)
            .enabled_by_default()
            .describe("Implicit vertical advection"),
        // Time stepping
        Flag::new("ALLOW_ADAMSBASHFORTH_3", Algorithm)
            .describe("Third-order Adams-Bashforth time stepping"),
        Flag::new("ALLOW_QHYD_STAGGER_TS", Algorithm)
            .describe("Staggered time stepping of quasi- and non-hydrostatic terms"),
        // Linear solvers
        Flag::new("ALLOW_SRCG", Algorithm)
            .enabled_by_default()
            .describe("Single-reduction conjugate gradient solver"),
        Flag::new("SOLVE_DIAGONAL_LOWMEMORY", Algorithm)
            .excludes(["SOLVE_DIAGONAL_KINNER"])
            .describe("Tridiagonal solver variant that saves memory"),
        Flag::new("SOLVE_DIAGONAL_KINNER", Algorithm)
            .describe("Tridiagonal solver with the vertical loop innermost"),
        // Diagnostics
        Flag::new("ALLOW_DIAGNOSTICS", Diagnostic).describe("Diagnostics output package"),
        Flag::new("ALLOW_MONITOR", Diagnostic)
            .enabled_by_default()
            .describe("Periodic monitor statistics"),
        // Structural
        Flag::new("DISABLE_MULTIDIM_ADVECTION", Structural)
            .describe("Compile out multi-dimensional advection"),
        Flag::new("USE_OLD_MACROS_R4R8TORSRL", Structural)
            .describe("Legacy real-kind macros"),
    ]
}

/// Builder pre-populated with [`builtin_flags`].
///
/// # Errors
/// Fails only if the built-in definitions break a registry invariant.
pub fn builtin_builder() -> Result<RegistryBuilder, ResolveError> {
    let mut builder = RegistryBuilder::new();
    builder.extend(builtin_flags()).context("Built-in catalog")?;
    Ok(builder)
}

/// The frozen built-in registry.
///
/// # Errors
/// Fails only if the built-in definitions break a registry invariant.
pub fn builtin() -> Result<FlagRegistry, ResolveError> {
    builtin_builder()?.build()
}

/// Decodes the flags of a TOML catalog document.
///
/// # Errors
/// Returns [`ResolveError::Catalog`] for malformed TOML or unknown keys.
pub fn parse_catalog(raw: &str) -> Result<Vec<Flag>, ResolveError> {
    let file: CatalogFile = toml::from_str(raw)?;
    Ok(file.flags)
}

/// Registers the flags of the catalog file at `path` into `builder`.
///
/// # Errors
/// I/O, decoding, or registration errors; registration errors carry the path as context.
pub fn extend(
    mut builder: RegistryBuilder,
    path: impl AsRef<Path>,
) -> Result<RegistryBuilder, ResolveError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).context(format!("Reading catalog {}", path.display()))?;
    let flags = parse_catalog(&raw).context(format!("Decoding catalog {}", path.display()))?;

    debug!(path = %path.display(), flags = flags.len(), "Loading catalog");
    builder.extend(flags).context(format!("Registering catalog {}", path.display()))?;
    Ok(builder)
}

/// A registry made of the catalog file at `path` alone.
///
/// # Errors
/// See [`extend`] and [`RegistryBuilder::build`].
pub fn load_catalog(path: impl AsRef<Path>) -> Result<FlagRegistry, ResolveError> {
    extend(RegistryBuilder::new(), path)?.build()
}
