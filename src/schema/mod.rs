//! Schema composition
//!
//! A [`Schema`] is an ordered, immutable table of [`SchemaNode`]s keyed by
//! field name. Schemas are built from developer-authored fragments through
//! explicit [`Schema::extend`] calls, each of which returns a new schema.

use serde::Serialize;

mod compose;
pub mod fragments;
mod node;

pub use compose::{compose, DisplayBase};
pub use node::{EnumChoice, LambdaParam, LambdaSignature, Presence, SchemaNode, ValueKind};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Schema {
    nodes: Vec<SchemaNode>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from nodes, merging duplicate keys in order
    pub fn from_nodes(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
        let mut schema = Self::new();
        for node in nodes {
            schema.merge_node(node);
        }
        schema
    }

    /// Return a new schema with `other` merged on top of this one
    ///
    /// A node in `other` replaces the node with the same key, keeping its
    /// original position, unless the existing node is locked.
    pub fn extend(&self, other: &Schema) -> Schema {
        let mut merged = self.clone();
        for node in &other.nodes {
            merged.merge_node(node.clone());
        }
        merged
    }

    fn merge_node(&mut self, node: SchemaNode) {
        match self.nodes.iter_mut().find(|n| n.key == node.key) {
            Some(existing) if existing.locked => {
                log::trace!("Keeping locked schema node '{}'", existing.key);
            }
            Some(existing) => {
                log::trace!("Overriding schema node '{}'", existing.key);
                *existing = node;
            }
            None => self.nodes.push(node),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.nodes.iter().map(|n| n.key)
    }

    pub fn required_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.nodes.iter().filter(|n| n.is_required()).map(|n| n.key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int(min: i64, max: i64) -> ValueKind {
        ValueKind::IntRange { min, max }
    }

    #[test]
    fn later_node_wins_and_keeps_position() {
        let base = Schema::from_nodes([
            SchemaNode::optional("a", int(0, 1)),
            SchemaNode::optional("b", ValueKind::Duration).with_default("1s"),
        ]);
        let overlay = Schema::from_nodes([
            SchemaNode::optional("b", ValueKind::Duration).with_default("60s"),
            SchemaNode::required("c", ValueKind::Boolean),
        ]);

        let merged = base.extend(&overlay);

        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(merged.get("b").unwrap().default, Some(json!("60s")));
        assert_eq!(merged.required_keys().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn locked_node_is_not_overridden() {
        let base = Schema::from_nodes([SchemaNode::required("id", ValueKind::IdReference).locked()]);
        let overlay = Schema::from_nodes([SchemaNode::optional("id", ValueKind::Boolean)]);

        let merged = base.extend(&overlay);

        let node = merged.get("id").unwrap();
        assert!(node.is_required());
        assert_eq!(node.kind, ValueKind::IdReference);
    }

    #[test]
    fn extend_leaves_inputs_untouched() {
        let base = Schema::from_nodes([SchemaNode::optional("a", int(0, 1))]);
        let overlay = Schema::from_nodes([SchemaNode::optional("a", int(5, 6))]);
        let _ = base.extend(&overlay);
        assert_eq!(base.get("a").unwrap().kind, int(0, 1));
    }

    #[test]
    fn duplicate_keys_in_one_fragment_collapse() {
        let schema = Schema::from_nodes([
            SchemaNode::optional("a", int(0, 1)),
            SchemaNode::optional("a", int(2, 3)),
        ]);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get("a").unwrap().kind, int(2, 3));
    }
}
