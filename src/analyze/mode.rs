use crate::error::ConfigError;
use crate::extract::FieldPath;
use std::fmt;

/// How the results for one configured field turn into report columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    /// One `yes`/`no` column per resolved path
    Presence,
    /// A single `count: N` column named after the field path
    Count,
    /// One column per resolved path holding the value itself
    Raw,
}

impl AnalysisMode {
    /// Parse a mode tag, accepting the short legacy tags as aliases
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "presence" | "y/n" => Some(AnalysisMode::Presence),
            "count" | "nr" => Some(AnalysisMode::Count),
            "raw" | "data" => Some(AnalysisMode::Raw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Presence => "presence",
            AnalysisMode::Count => "count",
            AnalysisMode::Raw => "raw",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured field and the mode applied to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub path: FieldPath,
    pub mode: AnalysisMode,
}

impl FieldRule {
    pub fn new(path: FieldPath, mode: AnalysisMode) -> Self {
        FieldRule { path, mode }
    }

    /// Build a rule from its textual form, e.g. `("author.given", "count")`
    pub fn parse(path: &str, tag: &str) -> Result<Self, ConfigError> {
        let path = FieldPath::parse(path)?;
        let mode = AnalysisMode::from_tag(tag).ok_or_else(|| ConfigError::UnknownMode {
            field: path.to_string(),
            mode: tag.to_string(),
        })?;
        Ok(FieldRule { path, mode })
    }
}

/// The validated, ordered field table for a run
///
/// Built once at startup and shared read-only by every analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    rules: Vec<FieldRule>,
}

impl AnalysisConfig {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        AnalysisConfig { rules }
    }

    /// Build from `(path, mode tag)` pairs, keeping their order
    pub fn from_tags<'s, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let rules = pairs
            .into_iter()
            .map(|(path, tag)| FieldRule::parse(path, tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
