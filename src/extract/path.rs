use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A dotted key path such as `author.affiliation.name`
///
/// Segments are plain object keys. Array positions are never written in a
/// field path; the extractor adds them to the resolved paths it reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse and validate a dotted path
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason| ConfigError::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(invalid("path contains an empty segment"));
            }
            if segment.contains(['[', ']']) {
                return Err(invalid("array indices are not allowed in field paths"));
            }
            segments.push(segment.to_string());
        }

        Ok(FieldPath {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The path exactly as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment; always present for a parsed path
    pub fn head(&self) -> &str {
        &self.segments[0]
    }
}

impl FromStr for FieldPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let path = FieldPath::parse("author.affiliation.name").unwrap();
        assert_eq!(path.segments(), ["author", "affiliation", "name"]);
        assert_eq!(path.head(), "author");
        assert_eq!(path.to_string(), "author.affiliation.name");
    }

    #[test]
    fn test_keys_keep_punctuation() {
        let path: FieldPath = "relation.has-preprint.id-type".parse().unwrap();
        assert_eq!(path.segments(), ["relation", "has-preprint", "id-type"]);
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for raw in ["", "a..b", ".a", "a.", "author[0].given"] {
            assert!(
                matches!(FieldPath::parse(raw), Err(ConfigError::InvalidPath { .. })),
                "expected {raw:?} to be rejected"
            );
        }
    }
}
