//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it owns layered settings loading.
//!
//! ## Settings loading
//! ```rust,no_run
//! use optgate_kernel::config::load_settings;
//!
//! let settings = load_settings(None::<&str>).unwrap();
//! assert!(settings.catalog.builtin);
//! ```
pub mod config;

pub use optgate_domain as domain;
