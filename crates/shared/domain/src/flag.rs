use crate::UnknownVariant;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FORCING: &str = "forcing";
pub const FORMULATION: &str = "formulation";
pub const ALGORITHM: &str = "algorithm";
pub const DIAGNOSTIC: &str = "diagnostic";
pub const STRUCTURAL: &str = "structural";

/// Semantic grouping of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Surface and body forcing terms (heating, loading, fluxes).
    Forcing,
    /// Choice of continuous formulation (free surface, conservation, hydrostatics).
    Formulation,
    /// Numerical schemes: time stepping, mixing, solvers.
    Algorithm,
    /// Monitoring and diagnostic output.
    Diagnostic,
    /// Build-structure switches with no physical meaning.
    Structural,
}

impl Category {
    pub const ALL: [Self; 5] =
        [Self::Forcing, Self::Formulation, Self::Algorithm, Self::Diagnostic, Self::Structural];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forcing => FORCING,
            Self::Formulation => FORMULATION,
            Self::Algorithm => ALGORITHM,
            Self::Diagnostic => DIAGNOSTIC,
            Self::Structural => STRUCTURAL,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant { kind: "category", value: s.to_owned() })
    }
}

bitflags! {
    /// Represents a set of categories, used to filter registry listings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CategorySet: u8 {
        const FORCING = 1 << 0;
        const FORMULATION = 1 << 1;
        const ALGORITHM = 1 << 2;
        const DIAGNOSTIC = 1 << 3;
        const STRUCTURAL = 1 << 4;

        const ALL = Self::FORCING.bits()
            | Self::FORMULATION.bits()
            | Self::ALGORITHM.bits()
            | Self::DIAGNOSTIC.bits()
            | Self::STRUCTURAL.bits();
    }
}

impl CategorySet {
    /// Parses a comma-separated list (`"forcing, algorithm"`, `"*"`).
    ///
    /// # Errors
    /// Returns [`UnknownVariant`] for the first entry that names no category.
    pub fn parse_list(list: &str) -> Result<Self, UnknownVariant> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .try_fold(Self::empty(), |set, entry| {
                let parsed = Self::from(entry);
                if parsed.is_empty() {
                    return Err(UnknownVariant { kind: "category", value: entry.to_owned() });
                }
                Ok(set | parsed)
            })
    }

    #[must_use]
    pub fn includes(self, category: Category) -> bool {
        self.contains(Self::from(category))
    }
}

impl From<Category> for CategorySet {
    fn from(category: Category) -> Self {
        match category {
            Category::Forcing => Self::FORCING,
            Category::Formulation => Self::FORMULATION,
            Category::Algorithm => Self::ALGORITHM,
            Category::Diagnostic => Self::DIAGNOSTIC,
            Category::Structural => Self::STRUCTURAL,
        }
    }
}

impl From<&str> for CategorySet {
    fn from(s: &str) -> Self {
        match s {
            "all" | "*" => Self::ALL,
            other => other.parse::<Category>().map_or_else(|_| Self::empty(), Self::from),
        }
    }
}

/// A named boolean build toggle and its static metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flag {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Flag {
    /// Creates a flag that is disabled unless a source enables it.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            default: false,
            requires: Vec::new(),
            excludes: Vec::new(),
            description: None,
        }
    }

    #[must_use]
    pub const fn enabled_by_default(mut self) -> Self {
        self.default = true;
        self
    }

    #[must_use]
    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.requires, names);
        self
    }

    #[must_use]
    pub fn excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.excludes, names);
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn extend_unique<I, S>(target: &mut Vec<String>, names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for name in names {
        let name = name.into();
        if !target.contains(&name) {
            target.push(name);
        }
    }
}
