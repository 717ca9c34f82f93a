//! Dot-path navigation over JSON values.
//!
//! `data.user.name` walks object keys, numeric segments such as `items.0`
//! index into arrays, and `\.` keeps a literal dot inside a key
//! (`headers.content\.type`). An empty path resolves to the root.

use serde_json::Value;

/// Resolve `path` against `root`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    split_path(path)
        .iter()
        .try_fold(root, |node, segment| step(node, segment))
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Split on unescaped dots. A backslash escapes the following character.
fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_objects() {
        let value = json!({"data": {"hello": "world"}});
        assert_eq!(lookup(&value, "data.hello"), Some(&json!("world")));
    }

    #[test]
    fn indexes_arrays() {
        let value = json!({"data": {"items": [{"id": 1}, {"id": 2}]}});
        assert_eq!(lookup(&value, "data.items.1.id"), Some(&json!(2)));
        assert_eq!(lookup(&value, "data.items.5.id"), None);
        assert_eq!(lookup(&value, "data.items.first"), None);
    }

    #[test]
    fn empty_path_is_root() {
        let value = json!({"a": 1});
        assert_eq!(lookup(&value, ""), Some(&value));
    }

    #[test]
    fn escaped_dot_stays_in_key() {
        let value = json!({"meta": {"content.type": "json", "content": {"type": "nested"}}});
        assert_eq!(lookup(&value, r"meta.content\.type"), Some(&json!("json")));
        assert_eq!(lookup(&value, "meta.content.type"), Some(&json!("nested")));
    }

    #[test]
    fn missing_and_scalar_paths_resolve_to_none() {
        let value = json!({"data": {"count": 3}});
        assert_eq!(lookup(&value, "data.missing"), None);
        assert_eq!(lookup(&value, "data.count.deeper"), None);
        assert_eq!(lookup(&Value::Null, "data"), None);
    }
}
