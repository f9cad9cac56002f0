#![forbid(unsafe_code)]

//! Built-in sample data.
//!
//! A small object graph that exercises every node kind: a record with an
//! inherited and a static field, shared instances, a cycle back to the root,
//! a long multi-line string, a resource handle and an unclassifiable value.

use std::time::Duration;

use vdump::{ContainerRef, Field, Key, RecordRef, TypeLayer, Value, Visibility};
use vdump::{StackFrame, Timing};

const POLICY: &str = "Members may borrow up to five items at a time.\n\
Loans run for three weeks and can be renewed twice unless another member has \
placed a hold.\nLate returns are charged per day.";

/// The sample object graph, rooted at a `Library` record.
pub fn library() -> Value {
    let library = RecordRef::new("Library");
    library.add_ancestor(
        TypeLayer::new("Institution")
            .with_field(Field::new("founded", 1921i64).visibility(Visibility::Protected))
            .with_field(Field::new("instances", 1i64).static_field()),
    );
    library.set("name", "Northside Branch");
    library.set("open", Value::Bool(true));
    library.set("rating", Value::Float(4.5));

    let shelves = ContainerRef::new();
    let fiction = shelf("fiction", &[("Dune", 1965), ("Solaris", 1961)]);
    let science = shelf("science", &[("Cosmos", 1980)]);
    shelves.insert(Key::Name("fiction".to_string()), Value::Record(fiction.clone()));
    shelves.insert(Key::Name("science".to_string()), Value::Record(science));
    library.set("shelves", shelves);

    // The featured shelf is the same instance as the fiction shelf.
    library.set("featured", Value::Record(fiction.clone()));
    fiction.set("library", Value::Record(library.clone()));

    library.add_field(
        Field::new("policy", POLICY)
            .visibility(Visibility::Private),
    );
    library.set(
        "log",
        Value::Resource {
            kind: "stream".to_string(),
            id: 3,
        },
    );
    library.set(
        "pool",
        Value::Opaque {
            type_name: "ConnectionPool".to_string(),
        },
    );
    library.set("closed_on", ContainerRef::from_values([Value::from("Sunday"), Value::Null]));
    Value::Record(library)
}

fn shelf(topic: &str, books: &[(&str, i64)]) -> RecordRef {
    let shelf = RecordRef::new("Shelf");
    shelf.set("topic", topic);
    let list = ContainerRef::new();
    for (title, year) in books {
        let book = RecordRef::new("Book");
        book.set("title", *title);
        book.set("year", *year);
        list.push(Value::Record(book));
    }
    shelf.set("books", list);
    shelf
}

/// A plausible call stack for the sample.
pub fn trace() -> Vec<StackFrame> {
    vec![
        StackFrame::new("Library::checkout").at("src/library.rs", 118),
        StackFrame::new("handle_request").at("src/server.rs", 42),
        StackFrame::new("main").at("src/main.rs", 9),
    ]
}

/// Timings shown in the profiler view.
pub fn timings() -> Vec<Timing> {
    vec![
        Timing::new("load catalog", Duration::from_micros(12_400)).with_detail("3 shelves"),
        Timing::new("render", Duration::from_micros(850)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump::snapshot;

    #[test]
    fn sample_has_cycle_and_sharing() {
        let snap = snapshot(&library());
        assert!(snap.stats.aliases >= 2);
        assert_eq!(snap.stats.unknown, 1);
    }

    #[test]
    fn sample_renders_plainly() {
        let text = vdump::dump_to_string(&library(), &vdump::InspectorConfig::default());
        assert!(text.starts_with("object(Library) #"));
        assert!(text.contains("[static public:instances:Institution] => int(1)"));
        assert!(text.contains("resource(stream) #3"));
        assert!(text.contains("unknown(ConnectionPool)"));
    }
}
