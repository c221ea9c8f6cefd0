//! Dot/bracket nested path resolution
//!
//! Resolves addresses such as `user.address.city` or `items[2].email` against
//! a flat namespace of variables. Wildcards and slices belong to the query
//! language (see [`super::query`]); this resolver only walks single values.

use serde_json::{Map, Value};

/// Resolve a nested path against the root namespace.
///
/// The first segment names a root variable; each following segment is a
/// record key. Any segment may carry one or more `[<index>]` suffixes.
/// Returns `None` as soon as an intermediate value is missing, an index is
/// out of range, a key is missing, or a bracket suffix is malformed.
pub fn resolve_nested_path<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (first, rest) = match path.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (path, None),
    };

    let (name, indices) = parse_segment(first)?;
    let current = apply_indices(root.get(name)?, &indices)?;

    match rest {
        Some(rest) => walk(current, rest),
        None => Some(current),
    }
}

/// Walk `path` starting from an already-resolved value.
///
/// An empty path yields `value` itself; a segment consisting only of index
/// suffixes (`[0]`) indexes the current value directly.
pub(crate) fn resolve_in_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        Some(value)
    } else {
        walk(value, path)
    }
}

fn walk<'a>(mut current: &'a Value, path: &str) -> Option<&'a Value> {
    for segment in path.split('.') {
        let (key, indices) = parse_segment(segment)?;
        if !key.is_empty() || indices.is_empty() {
            current = child(current, key)?;
        }
        current = apply_indices(current, &indices)?;
    }

    Some(current)
}

/// Split `items[2][0]` into `("items", [2, 0])`.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };

    let key = &segment[..open];
    let mut rest = &segment[open..];
    let mut indices = Vec::new();

    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indices.push(inner[..close].trim().parse::<usize>().ok()?);
        rest = &inner[close + 1..];
    }

    Some((key, indices))
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn apply_indices<'a>(mut value: &'a Value, indices: &[usize]) -> Option<&'a Value> {
    for &index in indices {
        value = match value {
            Value::Array(items) => items.get(index)?,
            _ => return None,
        };
    }
    Some(value)
}
