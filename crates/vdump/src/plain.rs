#![forbid(unsafe_code)]

//! Non-interactive rendering.
//!
//! Used when no terminal is attached: the whole tree is expanded and drawn
//! onto a capturing measurement canvas, and the captured rows become the
//! output text. Alias nodes stay single lines, so cycles terminate.

use vdump_core::config::InspectorConfig;
use vdump_render::canvas::LineAccumulator;
use vdump_snapshot::{Inspect, SnapshotNode, snapshot};
use vdump_widgets::{VarTree, ViewOptions};

/// Render `node` fully expanded as plain text, one row per line.
#[must_use]
pub fn render_plain(node: &SnapshotNode, config: &InspectorConfig) -> String {
    let mut tree = VarTree::new(node.clone(), ViewOptions::from(config));
    tree.expand_all();
    let mut canvas = LineAccumulator::capturing();
    tree.draw(&mut canvas, &|_| None);
    join_lines(canvas.into_lines())
}

/// Snapshot `value` and render it with [`render_plain`].
#[must_use]
pub fn dump_to_string<T: Inspect + ?Sized>(value: &T, config: &InspectorConfig) -> String {
    render_plain(&snapshot(value).root, config)
}

pub(crate) fn join_lines(lines: Vec<String>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_snapshot::{RecordRef, Value};

    #[test]
    fn nested_list() {
        let text = dump_to_string(&vec![vec![1, 2], vec![]], &InspectorConfig::default());
        assert_eq!(
            text,
            "array(2) {\n  [0] => array(2) {\n    [0] => int(1)\n    [1] => int(2)\n  }\n  [1] => array(0) {}\n}\n"
        );
    }

    #[test]
    fn cycle_renders_alias_once() {
        let node = RecordRef::new("Node");
        node.set("name", "root");
        node.set("next", Value::Record(node.clone()));
        let text = dump_to_string(&Value::Record(node), &InspectorConfig::default());
        assert_eq!(text.matches("*ALIAS*").count(), 1);
        assert!(text.starts_with("object(Node) #"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn indent_follows_config() {
        let config = InspectorConfig::default().with_indent(4);
        let text = dump_to_string(&vec![true], &config);
        assert!(text.contains("\n    [0] => bool(true)\n"));
    }

    #[test]
    fn long_strings_are_shown_in_full() {
        let long = "x".repeat(100);
        let text = dump_to_string(&long, &InspectorConfig::default());
        assert!(text.contains(&long));
    }
}
