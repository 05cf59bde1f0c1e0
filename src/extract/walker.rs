use crate::extract::path::FieldPath;
use serde_json::Value;
use std::iter::{Enumerate, FusedIterator};
use std::slice;

/// The value found at the end of a resolved path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extracted<'a> {
    /// The path resolved; the value may be `null` or a nested structure
    Present(&'a Value),
    /// The path does not resolve in this record
    Absent,
}

impl<'a> Extracted<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Extracted::Absent)
    }

    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Extracted::Present(value) => Some(value),
            Extracted::Absent => None,
        }
    }
}

/// One result of walking a field path: the resolved path and what it hit
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<'a> {
    /// Field path with `[i]` inserted after every array hop
    pub path: String,
    pub value: Extracted<'a>,
}

impl<'a> Extraction<'a> {
    fn absent(path: String) -> Self {
        Extraction {
            path,
            value: Extracted::Absent,
        }
    }
}

/// Pending work on the traversal stack
enum Frame<'a> {
    /// Resolve `segments[next..]` against `value`
    Node {
        value: &'a Value,
        next: usize,
        parts: Vec<String>,
    },
    /// Remaining elements of an array being expanded
    Elements {
        items: Enumerate<slice::Iter<'a, Value>>,
        next: usize,
        parts: Vec<String>,
    },
}

/// Lazy depth-first walk of one field path over one JSON tree
///
/// Results come out in document order: object keys follow the parsed key
/// order and array elements are expanded left to right. Array elements are
/// only visited when the previous element's results have been consumed, so
/// counting results never materializes the paths of later branches.
pub struct Extractor<'a> {
    path: &'a FieldPath,
    stack: Vec<Frame<'a>>,
    root_miss: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(root: &'a Value, path: &'a FieldPath) -> Self {
        let head = path.head();
        let start = match root {
            Value::Object(map) => map.get(head),
            _ => None,
        };

        let stack = match start {
            Some(value) => vec![Frame::Node {
                value,
                next: 1,
                parts: vec![head.to_string()],
            }],
            None => Vec::new(),
        };

        Extractor {
            path,
            root_miss: start.is_none(),
            stack,
        }
    }

    /// Absent result for a branch that stopped at `segments[next]`
    fn unresolved(&self, mut parts: Vec<String>, next: usize) -> Extraction<'a> {
        parts.extend(self.path.segments()[next..].iter().cloned());
        Extraction::absent(parts.join("."))
    }
}

impl<'a> Iterator for Extractor<'a> {
    type Item = Extraction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.root_miss {
            // Unknown top-level field: report the configured path untouched
            self.root_miss = false;
            return Some(Extraction::absent(self.path.as_str().to_string()));
        }

        let path = self.path;
        let segments = path.segments();

        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Elements {
                    mut items,
                    next,
                    parts,
                } => {
                    if let Some((index, item)) = items.next() {
                        let mut indexed = parts.clone();
                        match indexed.last_mut() {
                            Some(last) => last.push_str(&format!("[{index}]")),
                            None => indexed.push(format!("[{index}]")),
                        }
                        self.stack.push(Frame::Elements { items, next, parts });
                        self.stack.push(Frame::Node {
                            value: item,
                            next,
                            parts: indexed,
                        });
                    }
                }
                Frame::Node {
                    value,
                    next,
                    mut parts,
                } => {
                    if next == segments.len() {
                        return Some(Extraction {
                            path: parts.join("."),
                            value: Extracted::Present(value),
                        });
                    }

                    match value {
                        Value::Object(map) => {
                            let key = &segments[next];
                            match map.get(key.as_str()) {
                                Some(child) => {
                                    parts.push(key.clone());
                                    self.stack.push(Frame::Node {
                                        value: child,
                                        next: next + 1,
                                        parts,
                                    });
                                }
                                None => return Some(self.unresolved(parts, next)),
                            }
                        }
                        // An empty array still answers for the field
                        Value::Array(items) if items.is_empty() => {
                            return Some(self.unresolved(parts, next));
                        }
                        Value::Array(items) => {
                            self.stack.push(Frame::Elements {
                                items: items.iter().enumerate(),
                                next,
                                parts,
                            });
                        }
                        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                            return Some(self.unresolved(parts, next));
                        }
                    }
                }
            }
        }

        None
    }
}

impl FusedIterator for Extractor<'_> {}

/// Walk `path` over `root`, yielding every resolved path it reaches
///
/// Always yields at least one result. Missing keys, scalars in the middle of
/// a path and empty arrays all produce [`Extracted::Absent`] rather than an
/// error.
pub fn extract<'a>(root: &'a Value, path: &'a FieldPath) -> Extractor<'a> {
    Extractor::new(root, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: &Value, path: &str) -> Vec<(String, Option<Value>)> {
        let path = FieldPath::parse(path).unwrap();
        extract(value, &path)
            .map(|e| (e.path, e.value.value().cloned()))
            .collect()
    }

    fn present(path: &str, value: Value) -> (String, Option<Value>) {
        (path.to_string(), Some(value))
    }

    fn absent(path: &str) -> (String, Option<Value>) {
        (path.to_string(), None)
    }

    #[test]
    fn test_simple_key() {
        let input = json!({"DOI": "10.1/x"});
        assert_eq!(run(&input, "DOI"), vec![present("DOI", json!("10.1/x"))]);
    }

    #[test]
    fn test_array_expansion() {
        let input = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
        assert_eq!(
            run(&input, "a.b.c"),
            vec![present("a.b[0].c", json!(1)), present("a.b[1].c", json!(2))]
        );
    }

    #[test]
    fn test_missing_nested_key() {
        let input = json!({"a": {}});
        assert_eq!(run(&input, "a.b"), vec![absent("a.b")]);
    }

    #[test]
    fn test_missing_key_reports_remaining_segments() {
        let input = json!({"author": [{"given": "A"}]});
        assert_eq!(
            run(&input, "author.affiliation.id.id"),
            vec![absent("author[0].affiliation.id.id")]
        );
    }

    #[test]
    fn test_root_miss_keeps_configured_path() {
        let input = json!({"title": ["T"]});
        assert_eq!(run(&input, "author.given"), vec![absent("author.given")]);

        let not_an_object = json!([{"author": {"given": "A"}}]);
        assert_eq!(
            run(&not_an_object, "author.given"),
            vec![absent("author.given")]
        );
        assert_eq!(run(&json!(null), "author"), vec![absent("author")]);
    }

    #[test]
    fn test_scalar_before_end_of_path() {
        let input = json!({"page": "1-10"});
        assert_eq!(run(&input, "page.first"), vec![absent("page.first")]);

        let input = json!({"funder": [{"name": "X"}, "loose"]});
        assert_eq!(
            run(&input, "funder.name"),
            vec![present("funder[0].name", json!("X")), absent("funder[1].name")]
        );
    }

    #[test]
    fn test_null_is_present() {
        let input = json!({"author": [{"given": "A"}, {"given": null}, {}]});
        assert_eq!(
            run(&input, "author.given"),
            vec![
                present("author[0].given", json!("A")),
                present("author[1].given", Value::Null),
                absent("author[2].given"),
            ]
        );
    }

    #[test]
    fn test_nested_arrays() {
        let input = json!({
            "author": [
                {"affiliation": [{"name": "U1"}, {"name": "U2"}]},
                {"affiliation": []},
                {"affiliation": [{"name": "U3"}]}
            ]
        });
        assert_eq!(
            run(&input, "author.affiliation.name"),
            vec![
                present("author[0].affiliation[0].name", json!("U1")),
                present("author[0].affiliation[1].name", json!("U2")),
                absent("author[1].affiliation.name"),
                present("author[2].affiliation[0].name", json!("U3")),
            ]
        );
    }

    #[test]
    fn test_array_of_arrays() {
        let input = json!({"accepted": {"date-parts": [[2020, 1, 5]]}});
        assert_eq!(
            run(&input, "accepted.date-parts"),
            vec![present("accepted.date-parts", json!([[2020, 1, 5]]))]
        );

        let input = json!({"grid": [[{"v": 1}], [{"v": 2}, {"v": 3}]]});
        assert_eq!(
            run(&input, "grid.v"),
            vec![
                present("grid[0][0].v", json!(1)),
                present("grid[1][0].v", json!(2)),
                present("grid[1][1].v", json!(3)),
            ]
        );
    }

    #[test]
    fn test_leaf_structure_returned_as_is() {
        let input = json!({"relation": {"has-preprint": [{"id": "x", "id-type": "doi"}]}});
        assert_eq!(
            run(&input, "relation.has-preprint"),
            vec![present(
                "relation.has-preprint",
                json!([{"id": "x", "id-type": "doi"}])
            )]
        );
    }

    #[test]
    fn test_order_is_stable() {
        let input = json!({
            "assertion": [
                {"name": "received", "value": "2020"},
                {"name": "accepted", "value": "2021"},
                {"name": "published"}
            ]
        });
        let first = run(&input, "assertion.value");
        for _ in 0..5 {
            assert_eq!(run(&input, "assertion.value"), first);
        }
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_lazy_first_result() {
        let many: Vec<Value> = (0..10_000).map(|i| json!({"c": i})).collect();
        let input = json!({"a": many});
        let path = FieldPath::parse("a.c").unwrap();
        let mut walker = extract(&input, &path);
        let first = walker.next().unwrap();
        assert_eq!(first.path, "a[0].c");
        assert_eq!(walker.count(), 9_999);
    }
}
