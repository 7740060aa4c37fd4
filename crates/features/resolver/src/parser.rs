//! # Source Parser
//!
//! Reads preprocessor-style option headers into a [`ConfigSource`].
//!
//! Accepted content:
//! * `#define NAME` asserts `NAME = true`, `#undef NAME` asserts `NAME = false`.
//! * `/* ... */` (possibly spanning lines) and `// ...` comments, blank lines.
//! * One include guard: `#ifndef G` directly followed by `#define G`, closed by `#endif`.
//! * `#include` and `#pragma` lines, which carry no flag state.
//!
//! Everything else is rejected: conditional logic, valued or function-like macros, and
//! stray text cannot be represented as a flat list of assertions.

use crate::error::{ResolveError, ResolveErrorExt};
use crate::registry::is_identifier;
use optgate_domain::source::{Assertion, ConfigSource};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Parses an options header.
///
/// # Errors
/// Returns [`ResolveError::Parse`] with the 1-based line of the first offending construct.
pub fn parse_header(label: &str, text: &str) -> Result<ConfigSource, ResolveError> {
    let lines = strip_comments(text)
        .map_err(|line| parse_error(label, line, "unterminated block comment"))?;

    let mut source = ConfigSource::new(label);
    let mut guard = Guard::None;

    for (line_no, line) in lines.iter().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        if line.is_empty() {
            continue;
        }
        let Some(directive) = line.strip_prefix('#') else {
            return Err(parse_error(label, line_no, "expected a preprocessor directive"));
        };

        let mut tokens = directive.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let name = tokens.next();
        let extra = tokens.next();

        if let Guard::Opened { name: g, line } = &guard
            && !(keyword == "define" && name == Some(g.as_str()) && extra.is_none())
        {
            let message = format!("'#ifndef {g}' on line {line} is not an include guard");
            return Err(parse_error(label, *line, message));
        }

        match keyword {
            "define" | "undef" => {
                let name = macro_name(label, line_no, keyword, name, extra)?;
                if matches!(guard, Guard::Opened { .. }) {
                    trace!(guard = name, "include guard");
                    guard = Guard::Active(name.to_owned());
                    continue;
                }
                source.push(Assertion::new(name, keyword == "define").at_line(line_no));
            },
            "ifndef" => {
                if !matches!(guard, Guard::None) {
                    return Err(parse_error(
                        label,
                        line_no,
                        "conditional directives are not supported",
                    ));
                }
                let name = macro_name(label, line_no, keyword, name, extra)?;
                guard = Guard::Opened { name: name.to_owned(), line: line_no };
            },
            "endif" => {
                if !matches!(guard, Guard::Active(_)) {
                    return Err(parse_error(label, line_no, "'#endif' without an include guard"));
                }
                guard = Guard::Closed;
            },
            "include" | "pragma" => debug!(label, line = line_no, "ignoring #{keyword}"),
            "" => return Err(parse_error(label, line_no, "empty directive")),
            other => {
                let message = format!("'#{other}' is not supported in an options header");
                return Err(parse_error(label, line_no, message));
            },
        }
    }

    match guard {
        Guard::Opened { line, .. } => Err(parse_error(label, line, "'#ifndef' without a body")),
        Guard::Active(name) => {
            Err(parse_error(label, lines.len(), format!("include guard '{name}' is never closed")))
        },
        Guard::None | Guard::Closed => Ok(source),
    }
}

/// Reads and parses an options header file; the label is the path.
///
/// # Errors
/// [`ResolveError::Io`] if the file cannot be read, otherwise see [`parse_header`].
pub fn load_source(path: impl AsRef<Path>) -> Result<ConfigSource, ResolveError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    parse_header(&path.display().to_string(), &text)
}

enum Guard {
    None,
    /// `#ifndef` seen, waiting for the matching `#define`.
    Opened { name: String, line: usize },
    Active(String),
    Closed,
}

fn macro_name<'a>(
    label: &str,
    line: usize,
    keyword: &str,
    name: Option<&'a str>,
    extra: Option<&str>,
) -> Result<&'a str, ResolveError> {
    let Some(name) = name else {
        return Err(parse_error(label, line, format!("'#{keyword}' without a macro name")));
    };
    if !is_identifier(name) {
        return Err(parse_error(label, line, format!("'{name}' is not a valid macro name")));
    }
    if extra.is_some() {
        return Err(parse_error(
            label,
            line,
            format!("'{name}' has a value, only bare toggles are supported"),
        ));
    }
    Ok(name)
}

fn parse_error(label: &str, line: usize, message: impl Into<Cow<'static, str>>) -> ResolveError {
    ResolveError::Parse { label: label.to_owned(), line, message: message.into(), context: None }
}

/// Removes comments and returns the remaining text of every line.
///
/// Line count is preserved. Comment markers inside `"..."`, and inside `<...>` on an
/// `#include` line, are kept as text. On an unterminated block comment, returns the line it
/// opened on.
fn strip_comments(text: &str) -> Result<Vec<String>, usize> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut block_start: Option<usize> = None;
    let mut quote_end: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            lines.push(std::mem::take(&mut current));
            quote_end = None;
            continue;
        }
        if block_start.is_some() {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                block_start = None;
                current.push(' ');
            }
            continue;
        }
        if let Some(end) = quote_end {
            if c == end {
                quote_end = None;
            }
            current.push(c);
            continue;
        }
        match (c, chars.peek()) {
            ('/', Some('*')) => {
                chars.next();
                block_start = Some(lines.len() + 1);
            },
            ('/', Some('/')) => {
                while chars.next_if(|&n| n != '\n').is_some() {}
            },
            ('"', _) => {
                quote_end = Some('"');
                current.push(c);
            },
            ('<', _) if is_include(&current) => {
                quote_end = Some('>');
                current.push(c);
            },
            _ => current.push(c),
        }
    }
    lines.push(current);

    block_start.map_or(Ok(lines), Err)
}

fn is_include(line: &str) -> bool {
    line.trim_start()
        .strip_prefix('#')
        .is_some_and(|rest| rest.trim_start().starts_with("include"))
}
