#![forbid(unsafe_code)]

//! Conversion of Rust values into inspectable [`Value`]s.
//!
//! Every call to [`Inspect::inspect`] on a plain Rust collection creates a
//! fresh container instance. To show sharing or cycles, build the value from
//! [`ContainerRef`]/[`RecordRef`] handles directly; cloning a handle keeps its
//! identity.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use crate::value::{ContainerRef, Key, RecordRef, Value};

/// Types that can be turned into an inspectable [`Value`].
pub trait Inspect {
    /// Capture this value.
    fn inspect(&self) -> Value;
}

impl Inspect for Value {
    fn inspect(&self) -> Value {
        self.clone()
    }
}

impl Inspect for ContainerRef {
    fn inspect(&self) -> Value {
        Value::Container(self.clone())
    }
}

impl Inspect for RecordRef {
    fn inspect(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl Inspect for () {
    fn inspect(&self) -> Value {
        Value::Null
    }
}

impl Inspect for bool {
    fn inspect(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! inspect_signed {
    ($($t:ty),*) => {$(
        impl Inspect for $t {
            fn inspect(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        }
    )*};
}

inspect_signed!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! inspect_wide {
    ($($t:ty),*) => {$(
        impl Inspect for $t {
            fn inspect(&self) -> Value {
                i64::try_from(*self).map_or_else(|_| Value::Float(*self as f64), Value::Int)
            }
        }
    )*};
}

inspect_wide!(u64, usize, isize, i128, u128);

impl Inspect for f32 {
    fn inspect(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl Inspect for f64 {
    fn inspect(&self) -> Value {
        Value::Float(*self)
    }
}

impl Inspect for str {
    fn inspect(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Inspect for String {
    fn inspect(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Inspect for char {
    fn inspect(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Value {
        self.as_ref().map_or(Value::Null, Inspect::inspect)
    }
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Value {
        Value::Container(ContainerRef::from_values(self.iter().map(Inspect::inspect)))
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Value {
        self.as_slice().inspect()
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Value {
        self.as_slice().inspect()
    }
}

impl<K: Display, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value {
        keyed(self.iter().map(|(k, v)| (k.to_string(), v.inspect())))
    }
}

/// Keys are sorted by their text so output is stable across runs.
impl<K: Display, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn inspect(&self) -> Value {
        let mut entries: Vec<(String, Value)> =
            self.iter().map(|(k, v)| (k.to_string(), v.inspect())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        keyed(entries)
    }
}

impl Inspect for serde_json::Value {
    fn inspect(&self) -> Value {
        use serde_json::Value as Json;
        match self {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => items.as_slice().inspect(),
            Json::Object(map) => keyed(map.iter().map(|(k, v)| (k.clone(), v.inspect()))),
        }
    }
}

fn keyed(entries: impl IntoIterator<Item = (String, Value)>) -> Value {
    let container = ContainerRef::new();
    for (key, value) in entries {
        container.insert(Key::Name(key), value);
    }
    Value::Container(container)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_fit_or_widen() {
        assert!(matches!(7u8.inspect(), Value::Int(7)));
        assert!(matches!(u64::MAX.inspect(), Value::Float(_)));
        assert!(matches!((-3isize).inspect(), Value::Int(-3)));
    }

    #[test]
    fn option_none_is_null() {
        let none: Option<i32> = None;
        assert!(matches!(Inspect::inspect(&none), Value::Null));
        assert!(matches!(Inspect::inspect(&Some("x")), Value::Str(ref s) if s == "x"));
    }

    #[test]
    fn vec_becomes_indexed_container() {
        let Value::Container(c) = vec![1, 2, 3].inspect() else {
            panic!("expected container");
        };
        assert_eq!(c.len(), 3);
        assert_eq!(c.elements()[2].key, Key::Index(2));
    }

    #[test]
    fn hash_map_keys_are_sorted() {
        let mut map = HashMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        let Value::Container(c) = map.inspect() else {
            panic!("expected container");
        };
        let keys: Vec<String> = c.elements().iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, ["alpha", "zeta"]);
    }

    #[test]
    fn json_document() {
        let doc: serde_json::Value =
            serde_json::from_str(r#"{"n": 1, "f": 2.5, "list": [true, null], "s": "hi"}"#)
                .unwrap();
        let Value::Container(c) = doc.inspect() else {
            panic!("expected container");
        };
        assert_eq!(c.len(), 4);
        let elements = c.elements();
        let list = elements.iter().find(|e| e.key == Key::Name("list".into())).unwrap();
        assert!(matches!(&list.value, Value::Container(inner) if inner.len() == 2));
    }

    #[test]
    fn handles_keep_identity() {
        let c = ContainerRef::new();
        let Value::Container(again) = c.inspect() else {
            panic!("expected container");
        };
        assert!(again.ptr_eq(&c));
    }
}
