//! Key-path search over parsed documents.
//!
//! [`search`] walks a JSON tree and reports every place where an object has a given
//! key. A reported path points at the object *containing* the key, not at the key
//! itself, so `{"a": {"b": 1}}` searched for `"b"` yields `["a"]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step into a JSON tree: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A location in a JSON tree, from the root.
pub type Path = Vec<PathSegment>;

/// Returns the paths of every object under `value` that has `key` as a direct key.
///
/// `current_path` is the location of `value` itself; pass an empty slice for a root.
/// Scalars never match, even a string equal to `key`.
pub fn search(value: &Value, current_path: &[PathSegment], key: &str) -> Vec<Path> {
    let mut out = Vec::new();
    let mut path = current_path.to_vec();
    collect(value, &mut path, key, &mut out);
    out
}

fn collect(value: &Value, path: &mut Path, key: &str, out: &mut Vec<Path>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    out.push(path.clone());
                }
                path.push(PathSegment::Key(k.clone()));
                collect(v, path, key, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(i));
                collect(item, path, key, out);
                path.pop();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_key_reports_containing_path() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(search(&doc, &[], "b"), vec![vec![PathSegment::from("a")]]);
    }

    #[test]
    fn test_top_level_key_reports_root() {
        let doc = json!({"x": 1});
        assert_eq!(search(&doc, &[], "x"), vec![Vec::<PathSegment>::new()]);
    }

    #[test]
    fn test_empty_object_has_no_matches() {
        assert!(search(&json!({}), &[], "x").is_empty());
    }

    #[test]
    fn test_arrays_contribute_indices() {
        let doc = json!({"items": [{"id": 1}, {"name": "n"}, {"id": 2}]});
        let paths = search(&doc, &[], "id");
        assert_eq!(
            paths,
            vec![
                vec![PathSegment::from("items"), PathSegment::from(0)],
                vec![PathSegment::from("items"), PathSegment::from(2)],
            ]
        );
    }

    #[test]
    fn test_key_matching_at_several_depths() {
        let doc = json!({"k": {"k": {"k": null}}});
        let paths = search(&doc, &[], "k");
        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&vec![]));
        assert!(paths.contains(&vec![PathSegment::from("k")]));
        assert!(paths.contains(&vec![PathSegment::from("k"), PathSegment::from("k")]));
    }

    #[test]
    fn test_scalar_string_equal_to_key_is_not_a_match() {
        let doc = json!(["b", {"a": "b"}]);
        assert!(search(&doc, &[], "b").is_empty());
        assert!(search(&json!("b"), &[], "b").is_empty());
    }

    #[test]
    fn test_current_path_is_prefixed_and_not_mutated() {
        let prefix = vec![PathSegment::from("root")];
        let paths = search(&json!({"a": 1}), &prefix, "a");
        assert_eq!(paths, vec![vec![PathSegment::from("root")]]);
        assert_eq!(prefix, vec![PathSegment::from("root")]);
    }

    #[test]
    fn test_paths_serialize_as_mixed_arrays() {
        let path = vec![PathSegment::from("a"), PathSegment::from(3)];
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["a", 3]));
    }
}
