use crate::extract::Extracted;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// One analyzed value, before it is rendered into the output table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// The path did not resolve; kept apart from an empty string
    Absent,
    /// Text produced by the analysis itself (`yes`, `count: 3`)
    Text(String),
    /// A record value passed through unchanged
    Value(Value),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// Render for a flat text table
    ///
    /// Strings are written bare, `null` as `null`, and arrays or objects as
    /// compact JSON.
    pub fn render<'a>(&'a self, absent_marker: &'a str) -> Cow<'a, str> {
        match self {
            Cell::Absent => Cow::Borrowed(absent_marker),
            Cell::Text(text) => Cow::Borrowed(text),
            Cell::Value(Value::String(s)) => Cow::Borrowed(s),
            Cell::Value(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl From<Extracted<'_>> for Cell {
    fn from(extracted: Extracted<'_>) -> Self {
        match extracted {
            Extracted::Present(value) => Cell::Value(value.clone()),
            Extracted::Absent => Cell::Absent,
        }
    }
}

/// Analyzed columns of a single record
pub type Row = BTreeMap<String, Cell>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render() {
        assert_eq!(Cell::Absent.render(""), "");
        assert_eq!(Cell::Absent.render("<absent>"), "<absent>");
        assert_eq!(Cell::text("count: 2").render(""), "count: 2");
        assert_eq!(Cell::Value(json!("1-10")).render(""), "1-10");
        assert_eq!(Cell::Value(json!("")).render("<absent>"), "");
        assert_eq!(Cell::Value(Value::Null).render(""), "null");
        assert_eq!(Cell::Value(json!(42)).render(""), "42");
        assert_eq!(Cell::Value(json!([[2020, 1]])).render(""), "[[2020,1]]");
    }

    #[test]
    fn test_from_extracted() {
        let value = json!(false);
        assert_eq!(Cell::from(Extracted::Present(&value)), Cell::Value(json!(false)));
        assert!(Cell::from(Extracted::Absent).is_absent());
    }
}
