#![forbid(unsafe_code)]

//! The immutable snapshot tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Visibility;

/// Identity of a container or record instance within one snapshot.
///
/// Assigned in visit order starting at 1, so `#1` is always the first
/// composite instance encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIdentity(pub u32);

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Subkind of a scalar node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// A string.
    Str,
    /// An integer.
    Int,
    /// A float.
    Float,
    /// A boolean.
    Bool,
    /// Null.
    Null,
    /// Placeholder for a value the builder could not classify.
    Unknown,
}

/// The shape of one snapshot node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// A scalar with its text representation.
    Scalar {
        /// Which scalar.
        subkind: ScalarKind,
        /// Untruncated text; the type name for [`ScalarKind::Unknown`].
        text: String,
    },
    /// A resource handle.
    Resource {
        /// Resource kind.
        kind: String,
        /// Handle id.
        id: u64,
    },
    /// An ordered container.
    Container {
        /// Elements in order; empty for aliases.
        elements: Vec<ElementEntry>,
    },
    /// A structured record.
    Record {
        /// Most-derived type name.
        type_name: String,
        /// Fields in emission order; empty for aliases.
        fields: Vec<FieldEntry>,
    },
}

/// One node of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// The node shape.
    pub kind: NodeKind,
    /// Instance identity, for containers and records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<NodeIdentity>,
    /// Set when this node stands in for an instance captured earlier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<NodeIdentity>,
    /// Element count for containers, field count for records, 0 otherwise.
    #[serde(default)]
    pub instance_count: usize,
}

/// A container element in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    /// Rendered key.
    pub key: String,
    /// The element value.
    pub value: SnapshotNode,
}

/// A record field in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Field visibility.
    pub visibility: Visibility,
    /// Whether the field is static.
    pub is_static: bool,
    /// Declaring type, only when inherited from an ancestor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type_name: Option<String>,
    /// The field value.
    pub value: SnapshotNode,
}

impl SnapshotNode {
    /// A scalar node.
    pub fn scalar(subkind: ScalarKind, text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Scalar {
                subkind,
                text: text.into(),
            },
            identity: None,
            alias_of: None,
            instance_count: 0,
        }
    }

    /// Whether this node is a back-reference.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }

    /// Whether this node is a container or record.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Container { .. } | NodeKind::Record { .. }
        )
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match &self.kind {
            NodeKind::Container { elements } => elements.len(),
            NodeKind::Record { fields, .. } => fields.len(),
            _ => 0,
        }
    }

    /// The `index`-th direct child.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&SnapshotNode> {
        match &self.kind {
            NodeKind::Container { elements } => elements.get(index).map(|e| &e.value),
            NodeKind::Record { fields, .. } => fields.get(index).map(|f| &f.value),
            _ => None,
        }
    }

    /// Follow a path of child indices from this node.
    #[must_use]
    pub fn descend(&self, path: &[usize]) -> Option<&SnapshotNode> {
        path.iter().try_fold(self, |node, &i| node.child(i))
    }

    /// Depth-first pre-order walk calling `visit(node, depth)`.
    pub fn walk(&self, visit: &mut impl FnMut(&SnapshotNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at(&self, depth: usize, visit: &mut impl FnMut(&SnapshotNode, usize)) {
        visit(self, depth);
        for i in 0..self.child_count() {
            if let Some(child) = self.child(i) {
                child.walk_at(depth + 1, visit);
            }
        }
    }

    /// Path to the non-alias node carrying `identity`, if any.
    #[must_use]
    pub fn find_original(&self, identity: NodeIdentity) -> Option<Vec<usize>> {
        if self.identity == Some(identity) && !self.is_alias() {
            return Some(Vec::new());
        }
        for i in 0..self.child_count() {
            if let Some(child) = self.child(i)
                && let Some(mut path) = child.find_original(identity)
            {
                path.insert(0, i);
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(values: Vec<SnapshotNode>) -> SnapshotNode {
        let count = values.len();
        SnapshotNode {
            kind: NodeKind::Container {
                elements: values
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| ElementEntry {
                        key: i.to_string(),
                        value,
                    })
                    .collect(),
            },
            identity: Some(NodeIdentity(1)),
            alias_of: None,
            instance_count: count,
        }
    }

    #[test]
    fn descend_follows_indices() {
        let tree = container(vec![
            SnapshotNode::scalar(ScalarKind::Int, "1"),
            container(vec![SnapshotNode::scalar(ScalarKind::Str, "x")]),
        ]);
        let leaf = tree.descend(&[1, 0]).unwrap();
        assert_eq!(
            leaf.kind,
            NodeKind::Scalar {
                subkind: ScalarKind::Str,
                text: "x".into()
            }
        );
        assert!(tree.descend(&[0, 0]).is_none());
    }

    #[test]
    fn walk_reports_depth() {
        let tree = container(vec![container(vec![SnapshotNode::scalar(
            ScalarKind::Null,
            "null",
        )])]);
        let mut depths = Vec::new();
        tree.walk(&mut |_, d| depths.push(d));
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn identity_display() {
        assert_eq!(NodeIdentity(7).to_string(), "#7");
    }

    #[test]
    fn serializes_with_type_tag() {
        let node = SnapshotNode::scalar(ScalarKind::Int, "42");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""type":"scalar""#));
        assert!(json.contains(r#""subkind":"int""#));
        assert!(!json.contains("alias_of"));
        let back: SnapshotNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
