//! Structural reference mining for ESDL trees.
//!
//! ESDL assets are AMF3 trees with a known (minified) schema: a base path
//! under `bH` and action/watch tables under `au`. References are composed as
//! `bH + suffix` from specific leaves rather than regex-scanned, which keeps
//! partial matches inside unrelated strings out of the crawl:
//!
//! ```text
//! au.*.g.*.i.*.b   form-state actions        au = forms, g = states,
//! au.*.m.*.b       dead-actions               i = actions, b = file path
//! au.*.i.*.b       stun-actions
//! au.*.k.*.b       wince-actions
//! au.*.h.*.i.*     watches; take watch[1] only when watch[0] == "T4"
//! bx               type; when bx[0] == "T1" take the leaves of bx[1].g
//! ```

use serde_json::Value;

const ACTION_SEARCHES: [&[&str]; 4] = [
    &["au", "*", "g", "*", "i", "*", "b"],
    &["au", "*", "m", "*", "b"],
    &["au", "*", "i", "*", "b"],
    &["au", "*", "k", "*", "b"],
];

/// Mines `bH`-composed references from a decoded ESDL document.
///
/// Returns `None` when the bytes are not JSON or the tree has no string
/// `bH`; the caller falls back to the generic scanner.
pub(crate) fn mine_references(decoded: &[u8]) -> Option<Vec<String>> {
    let root: Value = serde_json::from_slice(decoded).ok()?;
    let base = root.get("bH")?.as_str()?;

    let mut paths = Vec::new();
    let mut push_leaves = |node: &Value, paths: &mut Vec<String>| {
        for leaf in string_leaves(node) {
            paths.push(format!("{base}{leaf}"));
        }
    };

    for search_path in ACTION_SEARCHES {
        for node in search(&root, search_path) {
            push_leaves(node, &mut paths);
        }
    }

    // Watch entries: [discriminant, payload, ...]; only "T4" payloads name
    // files.
    for form in search(&root, &["au", "*", "h", "*", "i"]) {
        for watch in children(form) {
            if value_at(watch, "0").and_then(Value::as_str) == Some("T4") {
                if let Some(payload) = value_at(watch, "1") {
                    push_leaves(payload, &mut paths);
                }
            }
        }
    }

    // Type container: ["T1", {g: pre-action paths}] variants only.
    if let Some(type_container) = root.get("bx") {
        if value_at(type_container, "0").and_then(Value::as_str) == Some("T1") {
            for node in search(type_container, &["1", "g"]) {
                push_leaves(node, &mut paths);
            }
        }
    }

    Some(paths)
}

/// Walks `path` from `root`; `*` fans out over every child of an array or
/// object, other segments index objects by key and arrays by number.
fn search<'a>(root: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut current = vec![root];
    for segment in path {
        let mut next = Vec::new();
        for node in current {
            if *segment == "*" {
                next.extend(children(node));
            } else if let Some(child) = value_at(node, segment) {
                next.push(child);
            }
        }
        current = next;
    }
    current
}

fn children(node: &Value) -> Vec<&Value> {
    match node {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn value_at<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Collects every string leaf under `node`, depth-first; a bare string is
/// its own leaf.
fn string_leaves(node: &Value) -> Vec<&str> {
    let mut out = Vec::new();
    collect_leaves(node, &mut out);
    out
}

fn collect_leaves<'a>(node: &'a Value, out: &mut Vec<&'a str>) {
    match node {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        _ => {}
    }
}
