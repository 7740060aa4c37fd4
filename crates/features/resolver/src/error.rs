use std::borrow::Cow;

/// Error types of flag registration, parsing and resolution.
///
/// Every variant is fatal to the operation that produced it: no partial configuration is
/// ever handed back alongside an error.
#[optgate_derive::optgate_error]
pub enum ResolveError {
    /// A registry was authored with the same flag name twice.
    #[error("Duplicate flag '{name}'{}", format_context(.context))]
    DuplicateFlag { name: String, context: Option<Cow<'static, str>> },

    /// A name that the registry does not know.
    #[error("Unknown flag '{name}'{}", format_context(.context))]
    UnknownFlag { name: String, context: Option<Cow<'static, str>> },

    /// A flag definition that breaks the registry invariants.
    #[error("Invalid definition of flag '{name}'{}: {message}", format_context(.context))]
    InvalidDefinition {
        name: String,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// An enabled flag whose required flags are not all enabled.
    #[error("Flag '{flag}' requires {}{}", .missing.join(", "), format_context(.context))]
    UnsatisfiedDependency {
        flag: String,
        missing: Vec<String>,
        context: Option<Cow<'static, str>>,
    },

    /// Two mutually exclusive flags are both enabled.
    #[error(
        "Flag '{flag}' cannot be enabled together with '{conflicting}'{}",
        format_context(.context)
    )]
    MutualExclusion { flag: String, conflicting: String, context: Option<Cow<'static, str>> },

    /// A resolution was requested without any configuration source.
    #[error("No configuration source given{}", format_context(.context))]
    MissingSource { context: Option<Cow<'static, str>> },

    /// More than one configuration source was presented to a single resolution.
    #[error(
        "Ambiguous configuration: {} sources presented ({}), exactly one must be authoritative{}",
        .labels.len(),
        .labels.join(", "),
        format_context(.context)
    )]
    AmbiguousSource { labels: Vec<String>, context: Option<Cow<'static, str>> },

    /// A configuration source document that cannot be read as flag assertions.
    #[error("Parse error at {label}:{line}{}: {message}", format_context(.context))]
    Parse {
        label: String,
        line: usize,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// An include-guard macro that is not a valid identifier.
    #[error("Invalid include guard '{name}'{}", format_context(.context))]
    InvalidGuard { name: String, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// A TOML catalog that does not decode into flag definitions.
    #[error("Catalog error{}: {source}", format_context(.context))]
    Catalog { source: toml::de::Error, context: Option<Cow<'static, str>> },

    #[error("JSON serialization error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

impl ResolveError {
    pub(crate) fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownFlag { name: name.into(), context: None }
    }

    pub(crate) fn invalid(name: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidDefinition { name: name.into(), message: message.into(), context: None }
    }

    /// Stable short identifier of the violated rule, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateFlag { .. } => "duplicate-flag",
            Self::UnknownFlag { .. } => "unknown-flag",
            Self::InvalidDefinition { .. } => "invalid-definition",
            Self::UnsatisfiedDependency { .. } => "unsatisfied-dependency",
            Self::MutualExclusion { .. } => "mutual-exclusion",
            Self::MissingSource { .. } => "missing-source",
            Self::AmbiguousSource { .. } => "ambiguous-source",
            Self::Parse { .. } => "parse",
            Self::InvalidGuard { .. } => "invalid-guard",
            Self::Io { .. } => "io",
            Self::Catalog { .. } => "catalog",
            Self::Json { .. } => "json",
        }
    }
}
