#![forbid(unsafe_code)]

//! Cycle-safe structural snapshots of runtime values.
//!
//! ```
//! use vdump_snapshot::{snapshot, NodeKind};
//!
//! let snap = snapshot(&vec![1, 2, 3]);
//! assert!(matches!(snap.root.kind, NodeKind::Container { .. }));
//! assert_eq!(snap.root.instance_count, 3);
//! ```

pub mod builder;
pub mod inspect;
pub mod node;
pub mod value;

pub use builder::{Snapshot, SnapshotBuilder, SnapshotStats};
pub use inspect::Inspect;
pub use node::{ElementEntry, FieldEntry, NodeIdentity, NodeKind, ScalarKind, SnapshotNode};
pub use value::{ContainerRef, Element, Field, Key, RecordRef, TypeLayer, Value, Visibility};

/// Snapshot anything that implements [`Inspect`].
pub fn snapshot<T: Inspect + ?Sized>(value: &T) -> Snapshot {
    SnapshotBuilder::build(&value.inspect())
}
