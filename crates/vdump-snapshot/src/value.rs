#![forbid(unsafe_code)]

//! The inspectable value model.
//!
//! A [`Value`] is what the snapshot builder walks. Scalars are stored inline;
//! containers and records are shared instances ([`ContainerRef`],
//! [`RecordRef`]) so the same instance can appear in several places, including
//! inside itself.
//!
//! ```
//! use vdump_snapshot::value::{RecordRef, Value};
//!
//! let node = RecordRef::new("Node");
//! node.set("name", Value::from("root"));
//! node.set("parent", Value::Record(node.clone()));
//! assert_eq!(node.field_count(), 2);
//! ```

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A runtime value to be inspected.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string, kept at full length.
    Str(String),
    /// A handle to an external resource (file, socket, stream).
    Resource {
        /// Resource kind, e.g. `stream`.
        kind: String,
        /// Numeric handle id.
        id: u64,
    },
    /// An ordered keyed collection.
    Container(ContainerRef),
    /// A structured record with typed fields.
    Record(RecordRef),
    /// A host value the classifier does not understand.
    Opaque {
        /// Name of the host type.
        type_name: String,
    },
}

impl Value {
    /// Short kind name used in logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Resource { .. } => "resource",
            Value::Container(_) => "array",
            Value::Record(_) => "object",
            Value::Opaque { .. } => "opaque",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<ContainerRef> for Value {
    fn from(v: ContainerRef) -> Self {
        Value::Container(v)
    }
}

impl From<RecordRef> for Value {
    fn from(v: RecordRef) -> Self {
        Value::Record(v)
    }
}

/// Key of a container element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Positional or integer key.
    Index(i64),
    /// String key.
    Name(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// One keyed entry of a container.
#[derive(Debug, Clone)]
pub struct Element {
    /// The key.
    pub key: Key,
    /// The value.
    pub value: Value,
}

/// A shared, mutable, ordered container instance.
///
/// Cloning the handle shares the instance; use [`ptr_eq`](Self::ptr_eq) to
/// compare identity.
#[derive(Clone, Default)]
pub struct ContainerRef(Rc<RefCell<Vec<Element>>>);

impl ContainerRef {
    /// A new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A list container with index keys `0..n`.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let container = Self::new();
        for value in values {
            container.push(value);
        }
        container
    }

    /// Append with the next integer key (one past the largest integer key).
    pub fn push(&self, value: Value) {
        let mut elements = self.0.borrow_mut();
        let next = elements
            .iter()
            .filter_map(|e| match e.key {
                Key::Index(i) => Some(i + 1),
                Key::Name(_) => None,
            })
            .max()
            .unwrap_or(0);
        elements.push(Element {
            key: Key::Index(next),
            value,
        });
    }

    /// Insert or replace the element stored under `key`.
    pub fn insert(&self, key: Key, value: Value) {
        let mut elements = self.0.borrow_mut();
        if let Some(existing) = elements.iter_mut().find(|e| e.key == key) {
            existing.value = value;
        } else {
            elements.push(Element { key, value });
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the container has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Borrow the elements.
    pub fn elements(&self) -> Ref<'_, Vec<Element>> {
        self.0.borrow()
    }

    /// Whether both handles point at the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ContainerRef {
    // Elements may refer back to this instance, so only the shape is printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerRef")
            .field("len", &self.len())
            .field("addr", &format_args!("{:#x}", self.address()))
            .finish()
    }
}

/// Field visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,
    /// Visible to the type and its descendants.
    Protected,
    /// Visible to the declaring type only.
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        })
    }
}

/// A field as discovered on one type of a record's type chain.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field visibility.
    pub visibility: Visibility,
    /// Whether the field belongs to the type rather than the instance.
    pub is_static: bool,
    /// Type that declares the field; `None` means the type of the layer that
    /// lists it.
    pub declared_in: Option<String>,
    /// Current value.
    pub value: Value,
}

impl Field {
    /// A public instance field.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            declared_in: None,
            value: value.into(),
        }
    }

    /// Set the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the field static.
    #[must_use]
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Record the declaring type.
    #[must_use]
    pub fn declared_in(mut self, type_name: impl Into<String>) -> Self {
        self.declared_in = Some(type_name.into());
        self
    }
}

/// The fields one type of the chain exposes, in declaration order.
#[derive(Debug, Clone)]
pub struct TypeLayer {
    /// The type name.
    pub type_name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl TypeLayer {
    /// An empty layer.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: append a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// A structured record: the most-derived layer first, then ancestors.
#[derive(Debug, Clone)]
pub struct Record {
    layers: Vec<TypeLayer>,
}

impl Record {
    /// The most-derived type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.layers[0].type_name
    }

    /// Layers, most-derived first.
    #[must_use]
    pub fn layers(&self) -> &[TypeLayer] {
        &self.layers
    }
}

/// A shared, mutable record instance.
#[derive(Clone)]
pub struct RecordRef(Rc<RefCell<Record>>);

impl RecordRef {
    /// A record of type `type_name` with no fields and no ancestors.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(Record {
            layers: vec![TypeLayer::new(type_name)],
        })))
    }

    /// The most-derived type name.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.0.borrow().type_name().to_string()
    }

    /// Set a public instance field on the most-derived type, replacing any
    /// field of that name listed there.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.add_field(Field::new(name, value));
    }

    /// Add or replace a field on the most-derived type.
    pub fn add_field(&self, field: Field) {
        let mut record = self.0.borrow_mut();
        let own = &mut record.layers[0];
        if let Some(existing) = own.fields.iter_mut().find(|f| {
            f.name == field.name && f.is_static == field.is_static && f.declared_in == field.declared_in
        }) {
            *existing = field;
        } else {
            own.fields.push(field);
        }
    }

    /// Append an ancestor layer (nearest ancestor first).
    pub fn add_ancestor(&self, layer: TypeLayer) {
        self.0.borrow_mut().layers.push(layer);
    }

    /// Total fields listed across all layers, before duplicate suppression.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.0.borrow().layers.iter().map(|l| l.fields.len()).sum()
    }

    /// Borrow the record.
    pub fn borrow(&self) -> Ref<'_, Record> {
        self.0.borrow()
    }

    /// Whether both handles point at the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("type", &self.type_name())
            .field("addr", &format_args!("{:#x}", self.address()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_uses_next_index() {
        let c = ContainerRef::new();
        c.insert(Key::Index(5), Value::Null);
        c.insert(Key::Name("x".into()), Value::Null);
        c.push(Value::Int(1));
        let keys: Vec<Key> = c.elements().iter().map(|e| e.key.clone()).collect();
        assert_eq!(
            keys,
            vec![Key::Index(5), Key::Name("x".into()), Key::Index(6)]
        );
    }

    #[test]
    fn insert_replaces_existing_key() {
        let c = ContainerRef::from_values([Value::Int(1), Value::Int(2)]);
        c.insert(Key::Index(0), Value::Int(9));
        assert_eq!(c.len(), 2);
        assert!(matches!(c.elements()[0].value, Value::Int(9)));
    }

    #[test]
    fn clones_share_identity() {
        let a = ContainerRef::new();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&ContainerRef::new()));
        b.push(Value::Null);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn self_referential_debug_terminates() {
        let c = ContainerRef::new();
        c.push(Value::Container(c.clone()));
        let text = format!("{c:?}");
        assert!(text.contains("len: 1"));

        let r = RecordRef::new("Loop");
        r.set("me", r.clone());
        assert!(format!("{r:?}").contains("Loop"));
    }

    #[test]
    fn set_replaces_same_field() {
        let r = RecordRef::new("User");
        r.set("name", "a");
        r.set("name", "b");
        assert_eq!(r.field_count(), 1);
    }

    #[test]
    fn ancestors_follow_own_layer() {
        let r = RecordRef::new("Child");
        r.add_ancestor(TypeLayer::new("Parent").with_field(Field::new("id", 1i64)));
        let record = r.borrow();
        assert_eq!(record.type_name(), "Child");
        assert_eq!(record.layers()[1].type_name, "Parent");
    }

    #[test]
    fn visibility_display() {
        assert_eq!(Visibility::Protected.to_string(), "protected");
    }
}
