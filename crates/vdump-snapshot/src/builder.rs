#![forbid(unsafe_code)]

//! Structural snapshot builder.
//!
//! [`SnapshotBuilder::build`] walks a [`Value`] once and produces an
//! immutable [`SnapshotNode`] tree. Every container and record instance gets
//! a [`NodeIdentity`] the first time it is visited; any later encounter of the
//! same instance (a shared reference or a cycle) produces an alias node with
//! no children instead of descending again.
//!
//! The instance map lives only for one `build` call.
//!
//! # Record fields
//!
//! Layers are emitted most-derived first. Within a layer, static fields come
//! before instance fields and declaration order is otherwise kept. A field
//! whose `(is_static, declaring type, name)` was already emitted by an
//! earlier layer is skipped.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::node::{ElementEntry, FieldEntry, NodeIdentity, NodeKind, ScalarKind, SnapshotNode};
use crate::value::{ContainerRef, Field, RecordRef, Value};

/// Counters collected during one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    /// Nodes emitted, aliases included.
    pub nodes: usize,
    /// Alias nodes emitted.
    pub aliases: usize,
    /// Distinct composite instances captured.
    pub instances: usize,
    /// Deepest node depth (root is 0).
    pub max_depth: usize,
    /// Values that could not be classified.
    pub unknown: usize,
}

/// A finished snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Root of the tree.
    pub root: SnapshotNode,
    /// Build counters.
    pub stats: SnapshotStats,
}

/// Builds snapshots of [`Value`]s.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    visited: HashMap<InstanceKey, NodeIdentity>,
    next_identity: u32,
    stats: SnapshotStats,
}

/// Address of a composite instance, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum InstanceKey {
    Container(usize),
    Record(usize),
}

impl SnapshotBuilder {
    /// Snapshot `value`.
    pub fn build(value: &Value) -> Snapshot {
        let mut builder = SnapshotBuilder::default();
        let root = builder.node(value, 0);
        debug!(
            nodes = builder.stats.nodes,
            aliases = builder.stats.aliases,
            max_depth = builder.stats.max_depth,
            "snapshot built"
        );
        Snapshot {
            root,
            stats: builder.stats,
        }
    }

    fn node(&mut self, value: &Value, depth: usize) -> SnapshotNode {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        match value {
            Value::Null => SnapshotNode::scalar(ScalarKind::Null, "null"),
            Value::Bool(b) => SnapshotNode::scalar(ScalarKind::Bool, b.to_string()),
            Value::Int(i) => SnapshotNode::scalar(ScalarKind::Int, i.to_string()),
            Value::Float(f) => SnapshotNode::scalar(ScalarKind::Float, format_float(*f)),
            Value::Str(s) => SnapshotNode::scalar(ScalarKind::Str, s.clone()),
            Value::Resource { kind, id } => SnapshotNode {
                kind: NodeKind::Resource {
                    kind: kind.clone(),
                    id: *id,
                },
                identity: None,
                alias_of: None,
                instance_count: 0,
            },
            Value::Container(container) => self.container(container, depth),
            Value::Record(record) => self.record(record, depth),
            Value::Opaque { type_name } => {
                self.stats.unknown += 1;
                warn!(type_name = %type_name, "unclassifiable value in snapshot");
                SnapshotNode::scalar(ScalarKind::Unknown, type_name.clone())
            }
        }
    }

    /// Look up an instance, registering it when new.
    ///
    /// Returns `Err(identity)` when the instance was already visited.
    fn visit(&mut self, key: InstanceKey) -> Result<NodeIdentity, NodeIdentity> {
        if let Some(&identity) = self.visited.get(&key) {
            self.stats.aliases += 1;
            return Err(identity);
        }
        self.next_identity += 1;
        let identity = NodeIdentity(self.next_identity);
        self.visited.insert(key, identity);
        self.stats.instances += 1;
        Ok(identity)
    }

    fn container(&mut self, container: &ContainerRef, depth: usize) -> SnapshotNode {
        let count = container.len();
        let identity = match self.visit(InstanceKey::Container(container.address())) {
            Ok(identity) => identity,
            Err(original) => {
                return SnapshotNode {
                    kind: NodeKind::Container {
                        elements: Vec::new(),
                    },
                    identity: Some(original),
                    alias_of: Some(original),
                    instance_count: count,
                };
            }
        };
        let elements = container
            .elements()
            .iter()
            .map(|element| ElementEntry {
                key: element.key.to_string(),
                value: self.node(&element.value, depth + 1),
            })
            .collect();
        SnapshotNode {
            kind: NodeKind::Container { elements },
            identity: Some(identity),
            alias_of: None,
            instance_count: count,
        }
    }

    fn record(&mut self, record: &RecordRef, depth: usize) -> SnapshotNode {
        let type_name = record.type_name();
        let identity = match self.visit(InstanceKey::Record(record.address())) {
            Ok(identity) => identity,
            Err(original) => {
                return SnapshotNode {
                    kind: NodeKind::Record {
                        type_name,
                        fields: Vec::new(),
                    },
                    identity: Some(original),
                    alias_of: Some(original),
                    instance_count: emitted_fields(record).len(),
                };
            }
        };
        let fields: Vec<FieldEntry> = emitted_fields(record)
            .into_iter()
            .map(|(declaring, field)| FieldEntry {
                name: field.name.clone(),
                visibility: field.visibility,
                is_static: field.is_static,
                declaring_type_name: (declaring != type_name).then_some(declaring),
                value: self.node(&field.value, depth + 1),
            })
            .collect();
        SnapshotNode {
            instance_count: fields.len(),
            kind: NodeKind::Record { type_name, fields },
            identity: Some(identity),
            alias_of: None,
        }
    }
}

/// Fields of `record` in emission order, paired with their declaring type.
fn emitted_fields(record: &RecordRef) -> Vec<(String, Field)> {
    let record = record.borrow();
    let mut seen: HashSet<(bool, String, String)> = HashSet::new();
    let mut out = Vec::new();
    for layer in record.layers() {
        let (statics, instance): (Vec<&Field>, Vec<&Field>) =
            layer.fields.iter().partition(|f| f.is_static);
        for field in statics.into_iter().chain(instance) {
            let declaring = field
                .declared_in
                .clone()
                .unwrap_or_else(|| layer.type_name.clone());
            let key = (field.is_static, declaring.clone(), field.name.clone());
            if seen.insert(key) {
                out.push((declaring, field.clone()));
            }
        }
    }
    out
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}
