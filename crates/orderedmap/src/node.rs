use serde::ser::{Serialize, SerializeMap, Serializer};

/// A decoded ordered-map node.
///
/// Maps keep their entries in wire order; an unordered map type here would
/// silently shuffle tables the client reads positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// CSV leaf: rows of fields.
    Rows(Vec<Vec<String>>),
    /// CSV leaf collapsed row-major (the `flatten_csv` rendering).
    Flat(Vec<String>),
    /// Nested map in insertion order.
    Map(Vec<(String, Node)>),
}

impl Node {
    /// Looks up a direct child of a map node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Number of direct children (map entries or leaf rows/cells).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Node::Rows(rows) => rows.len(),
            Node::Flat(cells) => cells.len(),
            Node::Map(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Rows(rows) => rows.serialize(serializer),
            Node::Flat(cells) => cells.serialize(serializer),
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_serializes_in_insertion_order() {
        let node = Node::Map(vec![
            ("zeta".to_string(), Node::Flat(vec!["1".to_string()])),
            ("alpha".to_string(), Node::Rows(vec![])),
        ]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"zeta":["1"],"alpha":[]}"#);
    }

    #[test]
    fn get_walks_direct_children_only() {
        let node = Node::Map(vec![(
            "outer".to_string(),
            Node::Map(vec![("inner".to_string(), Node::Rows(vec![]))]),
        )]);
        assert!(node.get("outer").is_some());
        assert!(node.get("inner").is_none());
        assert!(node.get("outer").unwrap().get("inner").is_some());
    }
}
