//! # Option Resolution
//!
//! This crate turns an experiment's options header into the validated, complete set of
//! compile-time flags the model build consumes.
//!
//! ## Architecture
//!
//! 1.  **Registry ([`registry`]):** The frozen catalog of every flag the engine recognises,
//!     with defaults and dependency/exclusion relations. [`catalog`] provides the model's
//!     built-in flag set and TOML catalogs.
//! 2.  **Parsing ([`parser`]):** Reads `#define`/`#undef` headers into a source of assertions.
//! 3.  **Validation ([`validator`]):** Checks a candidate mapping against the registry rules.
//! 4.  **Emission ([`emitter`]):** Defaults, then assertions (last one wins), then validation.
//!     The result is an immutable [`ResolvedConfig`], rendered by [`render`].
//!
//! ## Example
//!
//! ```
//! use optgate_resolver::{Emitter, catalog, parser};
//!
//! let registry = catalog::builtin()?;
//! let source = parser::parse_header("exp", "#define NONLIN_FRSURF\n")?;
//! let resolved = Emitter::new(registry).resolve(&source)?;
//!
//! assert!(resolved.is_enabled("NONLIN_FRSURF")?);
//! assert!(resolved.is_enabled("EXACT_CONSERV")?);
//! # Ok::<(), optgate_resolver::ResolveError>(())
//! ```

pub mod catalog;
pub mod emitter;
mod error;
pub mod parser;
pub mod registry;
pub mod render;
pub mod resolved;
pub mod validator;

pub use crate::emitter::Emitter;
pub use crate::error::{ResolveError, ResolveErrorExt};
pub use crate::registry::{FlagRegistry, RegistryBuilder};
pub use crate::resolved::{FlagState, ResolvedConfig};
pub use crate::validator::FlagMap;
