use serde::{Deserialize, Serialize};

/// A single explicit `name -> state` statement from a configuration source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub name: String,
    pub enabled: bool,
    /// 1-based line in the originating document, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Assertion {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self { name: name.into(), enabled, line: None }
    }

    #[must_use]
    pub const fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// An ordered list of assertions authored for one experiment.
///
/// Order matters only for repeated names: the later assertion wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSource {
    label: String,
    assertions: Vec<Assertion>,
}

impl ConfigSource {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), assertions: Vec::new() }
    }

    /// Builds a source from `(name, enabled)` pairs, keeping their order.
    pub fn from_pairs<I, S>(label: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let assertions = pairs.into_iter().map(|(name, on)| Assertion::new(name, on)).collect();
        Self { label: label.into(), assertions }
    }

    /// Appends `#define name`.
    #[must_use]
    pub fn define(self, name: impl Into<String>) -> Self {
        self.assert(name, true)
    }

    /// Appends `#undef name`.
    #[must_use]
    pub fn undef(self, name: impl Into<String>) -> Self {
        self.assert(name, false)
    }

    #[must_use]
    pub fn assert(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.assertions.push(Assertion::new(name, enabled));
        self
    }

    pub fn push(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assertion> {
        self.assertions.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.assertions.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConfigSource {
    type Item = &'a Assertion;
    type IntoIter = std::slice::Iter<'a, Assertion>;

    fn into_iter(self) -> Self::IntoIter {
        self.assertions.iter()
    }
}
