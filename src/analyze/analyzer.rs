use crate::analyze::cell::{Cell, Row};
use crate::analyze::mode::{AnalysisConfig, AnalysisMode, FieldRule};
use crate::extract::{extract, Extracted};
use serde_json::Value;
use std::iter;

/// Applies the configured analysis modes to one record at a time
///
/// Stateless apart from its configuration, so a single analyzer can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Column/value pairs for a record, in field configuration order
    pub fn pairs<'a>(&'a self, record: &'a Value) -> impl Iterator<Item = (String, Cell)> + 'a {
        self.config
            .rules()
            .iter()
            .flat_map(move |rule| analyze_field(record, rule))
    }

    /// Analyze a record into a row
    ///
    /// Pairs are inserted in order, so a later field that resolves to the
    /// same column overwrites the earlier one.
    pub fn analyze(&self, record: &Value) -> Row {
        let mut row = Row::new();
        for (column, cell) in self.pairs(record) {
            row.insert(column, cell);
        }
        row
    }
}

fn analyze_field<'a>(
    record: &'a Value,
    rule: &'a FieldRule,
) -> Box<dyn Iterator<Item = (String, Cell)> + 'a> {
    let results = extract(record, &rule.path);

    match rule.mode {
        AnalysisMode::Presence => Box::new(results.map(|e| {
            let flag = if is_present(&e.value) { "yes" } else { "no" };
            (e.path, Cell::text(flag))
        })),
        AnalysisMode::Count => {
            // null is a resolved value here; only missing branches are skipped
            let count = results.filter(|e| !e.value.is_absent()).count();
            Box::new(iter::once((
                rule.path.to_string(),
                Cell::Text(format!("count: {count}")),
            )))
        }
        AnalysisMode::Raw => Box::new(results.map(|e| (e.path, Cell::from(e.value)))),
    }
}

/// Missing keys and explicit nulls both count as "not there"
fn is_present(value: &Extracted<'_>) -> bool {
    !matches!(value, Extracted::Absent | Extracted::Present(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyzer(pairs: &[(&str, &str)]) -> Analyzer {
        Analyzer::new(AnalysisConfig::from_tags(pairs.iter().copied()).unwrap())
    }

    #[test]
    fn test_presence() {
        let a = analyzer(&[("DOI", "presence")]);

        let row = a.analyze(&json!({"DOI": "10.1/x"}));
        assert_eq!(row.get("DOI"), Some(&Cell::text("yes")));

        let row = a.analyze(&json!({"title": "T"}));
        assert_eq!(row.get("DOI"), Some(&Cell::text("no")));

        let row = a.analyze(&json!({"DOI": null}));
        assert_eq!(row.get("DOI"), Some(&Cell::text("no")));
    }

    #[test]
    fn test_presence_is_not_truthiness() {
        let a = analyzer(&[("issue", "presence"), ("volume", "presence"), ("ISSN", "presence")]);
        let row = a.analyze(&json!({"issue": "", "volume": 0, "ISSN": []}));
        assert_eq!(row.get("issue"), Some(&Cell::text("yes")));
        assert_eq!(row.get("volume"), Some(&Cell::text("yes")));
        assert_eq!(row.get("ISSN"), Some(&Cell::text("yes")));
    }

    #[test]
    fn test_presence_per_resolved_path() {
        let a = analyzer(&[("relation.has-preprint.id", "presence")]);
        let row = a.analyze(&json!({
            "relation": {"has-preprint": [{"id": "10.1/pre"}, {"id-type": "doi"}]}
        }));
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("relation.has-preprint[0].id"), Some(&Cell::text("yes")));
        assert_eq!(row.get("relation.has-preprint[1].id"), Some(&Cell::text("no")));
    }

    #[test]
    fn test_count_includes_null() {
        let a = analyzer(&[("author.given", "count")]);
        let row = a.analyze(&json!({
            "author": [{"given": "A"}, {"given": null}, {}]
        }));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("author.given"), Some(&Cell::text("count: 2")));
    }

    #[test]
    fn test_count_missing_field() {
        let a = analyzer(&[("funder.name", "nr")]);
        let row = a.analyze(&json!({"DOI": "10.1/x"}));
        assert_eq!(row.get("funder.name"), Some(&Cell::text("count: 0")));
    }

    #[test]
    fn test_raw_passes_values_through() {
        let a = analyzer(&[("page", "raw"), ("assertion.value", "raw")]);
        let row = a.analyze(&json!({
            "page": "1-10",
            "assertion": [{"value": "2020"}, {"name": "x"}]
        }));
        assert_eq!(row.get("page"), Some(&Cell::Value(json!("1-10"))));
        assert_eq!(row.get("assertion[0].value"), Some(&Cell::Value(json!("2020"))));
        assert_eq!(row.get("assertion[1].value"), Some(&Cell::Absent));
    }

    #[test]
    fn test_collision_last_write_wins() {
        let a = analyzer(&[("DOI", "presence"), ("DOI", "raw")]);
        let pairs: Vec<_> = a.pairs(&json!({"DOI": "10.1/x"})).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("DOI".to_string(), Cell::text("yes")));

        let row = a.analyze(&json!({"DOI": "10.1/x"}));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("DOI"), Some(&Cell::Value(json!("10.1/x"))));

        let a = analyzer(&[("page", "presence"), ("page.x", "raw")]);
        let row = a.analyze(&json!({"page": {"x": 1}}));
        assert_eq!(row.get("page"), Some(&Cell::text("yes")));
        assert_eq!(row.get("page.x"), Some(&Cell::Value(json!(1))));
    }

    #[test]
    fn test_pairs_follow_config_order() {
        let a = analyzer(&[("title", "raw"), ("DOI", "presence"), ("author.given", "count")]);
        let columns: Vec<String> = a
            .pairs(&json!({"DOI": "d", "title": ["T"], "author": []}))
            .map(|(c, _)| c)
            .collect();
        assert_eq!(columns, ["title", "DOI", "author.given"]);
    }
}
