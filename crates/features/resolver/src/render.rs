//! Output forms of a [`ResolvedConfig`] for the downstream build.

use crate::error::ResolveError;
use crate::registry::is_identifier;
use crate::resolved::ResolvedConfig;
use optgate_domain::config::OutputFormat;
use std::fmt::Write as _;

/// Renders an options header with an include guard and one directive per registered flag.
///
/// The output is accepted by [`crate::parser::parse_header`].
///
/// # Errors
/// Returns [`ResolveError::InvalidGuard`] if `guard` is not a valid macro name.
pub fn to_header(resolved: &ResolvedConfig, guard: &str) -> Result<String, ResolveError> {
    if !is_identifier(guard) {
        return Err(ResolveError::InvalidGuard { name: guard.to_owned(), context: None });
    }

    let width = resolved.iter().map(|s| s.name.len()).max().unwrap_or_default();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "/* Resolved from {} */", resolved.source().replace("*/", "* /"));
    let _ = writeln!(out, "/* fingerprint sha256:{} */", resolved.fingerprint());
    let _ = writeln!(out, "#ifndef {guard}");
    let _ = writeln!(out, "#define {guard}");
    out.push('\n');

    for state in resolved {
        let directive = if state.enabled { "#define" } else { "#undef " };
        let _ = writeln!(out, "{directive} {:<width$} /* {} */", state.name, state.category);
    }

    out.push('\n');
    let _ = writeln!(out, "#endif /* {guard} */");
    Ok(out)
}

/// `-DNAME` compiler arguments for the enabled flags.
#[must_use]
pub fn to_defines(resolved: &ResolvedConfig) -> Vec<String> {
    resolved.enabled().map(|name| format!("-D{name}")).collect()
}

/// Pretty-printed ordered JSON object.
///
/// # Errors
/// Returns [`ResolveError::Json`] if serialization fails.
pub fn to_json(resolved: &ResolvedConfig) -> Result<String, ResolveError> {
    Ok(serde_json::to_string_pretty(resolved)?)
}

/// Renders `resolved` in the requested `format`; `guard` only applies to headers.
///
/// # Errors
/// See [`to_header`] and [`to_json`].
pub fn render(
    resolved: &ResolvedConfig,
    format: OutputFormat,
    guard: &str,
) -> Result<String, ResolveError> {
    match format {
        OutputFormat::Header => to_header(resolved, guard),
        OutputFormat::Json => to_json(resolved).map(|mut json| {
            json.push('\n');
            json
        }),
        OutputFormat::Defines => {
            let mut line = to_defines(resolved).join(" ");
            line.push('\n');
            Ok(line)
        },
    }
}
