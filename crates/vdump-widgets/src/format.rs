#![forbid(unsafe_code)]

//! Colorized text forms of snapshot nodes.
//!
//! Each node has a collapsed form and an expanded form. The expanded form is
//! split into header lines (drawn before the children) and footer lines
//! (drawn after them). All lines already carry the node's indentation and
//! positional prefix, so their widths are absolute.
//!
//! | Node                | Collapsed                         | Expanded              |
//! |---------------------|-----------------------------------|-----------------------|
//! | integer             | `int(42)`                         | -                     |
//! | short string        | `string(5) "hello"`               | -                     |
//! | long string         | `string(90) "first line..."`      | full text, many rows  |
//! | container           | `array(3) {...}`                  | `array(3) {` .. `}`   |
//! | record              | `object(User) #2 (4) {...}`       | `object(User) #2 (4) {` .. `}` |
//! | alias               | `object(User) #2 *ALIAS*`         | -                     |

use vdump_render::char_width;
use vdump_render::color::{Color, ColorTag};
use vdump_render::display_width;
use vdump_render::segment::Line;
use vdump_snapshot::{FieldEntry, NodeKind, ScalarKind, SnapshotNode};

use crate::options::ViewOptions;

/// Indentation and punctuation.
pub const PUNCT: ColorTag = Color::Default.tag();
/// Keys and field names in prefixes.
pub const KEY: ColorTag = Color::Cyan.tag();
/// Type keywords and counts (`int`, `array(3)`).
pub const TYPE: ColorTag = Color::Green.tag();
/// String contents.
pub const STRING: ColorTag = Color::Yellow.tag();
/// Numbers.
pub const NUMBER: ColorTag = Color::Blue.tag();
/// Booleans, null and unknown values.
pub const LITERAL: ColorTag = Color::Magenta.tag();
/// Instance ids (`#3`).
pub const IDENT: ColorTag = Color::White.tag();
/// The alias marker.
pub const ALIAS: ColorTag = Color::Red.tag();

const ELLIPSIS: &str = "...";

/// The text forms of one node.
#[derive(Debug, Clone, Default)]
pub struct Forms {
    /// Lines shown while collapsed.
    pub collapsed: Vec<Line>,
    /// Lines shown before the children while expanded.
    pub header: Vec<Line>,
    /// Lines shown after the children while expanded.
    pub footer: Vec<Line>,
    /// Whether the node can be expanded at all.
    pub expandable: bool,
}

/// Prefix for a container element: `[key] => `.
#[must_use]
pub fn element_prefix(key: &str) -> Line {
    Line::new()
        .with(PUNCT, "[")
        .with(KEY, key)
        .with(PUNCT, "] => ")
}

/// Prefix for a record field: `[static visibility:name:Declaring] => `.
#[must_use]
pub fn field_prefix(field: &FieldEntry) -> Line {
    let mut line = Line::new().with(PUNCT, "[");
    if field.is_static {
        line.push(PUNCT, "static ");
    }
    line.push(PUNCT, format!("{}:", field.visibility));
    line.push(KEY, field.name.clone());
    if let Some(declaring) = &field.declaring_type_name {
        line.push(PUNCT, format!(":{declaring}"));
    }
    line.push(PUNCT, "] => ");
    line
}

/// Truncate `text` to at most `max` display columns.
#[must_use]
pub fn truncate_to_width(text: &str, max: usize) -> &str {
    let mut width = 0;
    for (i, c) in text.char_indices() {
        width += char_width(c);
        if width > max {
            return &text[..i];
        }
    }
    text
}

/// Build the forms of `node` drawn at `depth` behind `prefix`.
#[must_use]
pub fn build_forms(node: &SnapshotNode, prefix: &Line, depth: usize, opts: &ViewOptions) -> Forms {
    let indent = " ".repeat(depth * opts.indent);
    let lead = || {
        let mut line = Line::new().with(PUNCT, indent.clone());
        for seg in prefix.segments() {
            line.push(seg.color, seg.text.clone());
        }
        line
    };

    if let Some(identity) = node.alias_of {
        let mut line = lead();
        match &node.kind {
            NodeKind::Record { type_name, .. } => {
                line.push(TYPE, "object(");
                line.push(KEY, type_name.clone());
                line.push(TYPE, ")");
            }
            _ => line.push(TYPE, format!("array({})", node.instance_count)),
        }
        line.push(IDENT, format!(" {identity}"));
        line.push(ALIAS, " *ALIAS*");
        return single(line);
    }

    match &node.kind {
        NodeKind::Scalar { subkind, text } => scalar_forms(*subkind, text, lead(), &indent, opts),
        NodeKind::Resource { kind, id } => single(
            lead()
                .with(TYPE, format!("resource({kind})"))
                .with(IDENT, format!(" #{id}")),
        ),
        NodeKind::Container { elements } => {
            let title = lead().with(TYPE, format!("array({})", node.instance_count));
            composite_forms(title, elements.is_empty(), &indent)
        }
        NodeKind::Record { type_name, fields } => {
            let mut title = lead().with(TYPE, "object(").with(KEY, type_name.clone()).with(TYPE, ")");
            if let Some(identity) = node.identity {
                title.push(IDENT, format!(" {identity}"));
            }
            title.push(TYPE, format!(" ({})", node.instance_count));
            composite_forms(title, fields.is_empty(), &indent)
        }
    }
}

fn single(line: Line) -> Forms {
    Forms {
        collapsed: vec![line.clone()],
        header: vec![line],
        footer: Vec::new(),
        expandable: false,
    }
}

fn composite_forms(title: Line, empty: bool, indent: &str) -> Forms {
    if empty {
        return single(title.with(PUNCT, " {}"));
    }
    Forms {
        collapsed: vec![title.clone().with(PUNCT, " {...}")],
        header: vec![title.with(PUNCT, " {")],
        footer: vec![Line::new().with(PUNCT, indent.to_string()).with(PUNCT, "}")],
        expandable: true,
    }
}

fn scalar_forms(
    subkind: ScalarKind,
    text: &str,
    lead: Line,
    indent: &str,
    opts: &ViewOptions,
) -> Forms {
    match subkind {
        ScalarKind::Str => string_forms(text, lead, indent, opts),
        ScalarKind::Int => single(lead.with(TYPE, "int(").with(NUMBER, text).with(TYPE, ")")),
        ScalarKind::Float => single(lead.with(TYPE, "float(").with(NUMBER, text).with(TYPE, ")")),
        ScalarKind::Bool => single(lead.with(TYPE, "bool(").with(LITERAL, text).with(TYPE, ")")),
        ScalarKind::Null => single(lead.with(LITERAL, "null")),
        ScalarKind::Unknown => {
            single(lead.with(TYPE, "unknown(").with(LITERAL, text).with(TYPE, ")"))
        }
    }
}

fn string_forms(text: &str, lead: Line, indent: &str, opts: &ViewOptions) -> Forms {
    let title = lead.with(TYPE, format!("string({})", text.chars().count()));
    let expandable = text.contains('\n') || display_width(text) > opts.string_preview_len;
    if !expandable {
        return single(title.with(STRING, format!(" \"{text}\"")));
    }

    let first = text.split('\n').next().unwrap_or_default();
    let preview = truncate_to_width(first, opts.string_preview_len);
    let collapsed = title
        .clone()
        .with(STRING, format!(" \"{preview}"))
        .with(PUNCT, ELLIPSIS)
        .with(STRING, "\"");

    let mut header = Vec::new();
    let mut lines = text.split('\n').peekable();
    let mut first_line = true;
    while let Some(part) = lines.next() {
        let closing = if lines.peek().is_none() { "\"" } else { "" };
        let line = if first_line {
            first_line = false;
            title.clone().with(STRING, format!(" \"{part}{closing}"))
        } else {
            Line::new()
                .with(PUNCT, indent.to_string())
                .with(STRING, format!("{part}{closing}"))
        };
        header.push(line);
    }

    Forms {
        collapsed: vec![collapsed],
        header,
        footer: Vec::new(),
        expandable: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_snapshot::{NodeIdentity, Visibility, snapshot};

    fn opts() -> ViewOptions {
        ViewOptions {
            string_preview_len: 10,
            ..ViewOptions::default()
        }
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::plain_text).collect()
    }

    #[test]
    fn scalars() {
        let forms = build_forms(&snapshot(&42).root, &Line::new(), 0, &opts());
        assert_eq!(texts(&forms.collapsed), ["int(42)"]);
        assert!(!forms.expandable);
        let forms = build_forms(&snapshot(&true).root, &Line::new(), 0, &opts());
        assert_eq!(texts(&forms.collapsed), ["bool(true)"]);
        let forms = build_forms(&snapshot(&()).root, &Line::new(), 0, &opts());
        assert_eq!(texts(&forms.collapsed), ["null"]);
    }

    #[test]
    fn short_string_single_line() {
        let forms = build_forms(&snapshot("hello").root, &element_prefix("k"), 1, &opts());
        assert_eq!(texts(&forms.collapsed), ["  [k] => string(5) \"hello\""]);
        assert!(!forms.expandable);
    }

    #[test]
    fn long_string_truncates_and_expands() {
        let forms = build_forms(&snapshot("abcdefghijklmnop").root, &Line::new(), 0, &opts());
        assert!(forms.expandable);
        assert_eq!(texts(&forms.collapsed), ["string(16) \"abcdefghij...\""]);
        assert_eq!(texts(&forms.header), ["string(16) \"abcdefghijklmnop\""]);
    }

    #[test]
    fn multi_line_string_spans_rows() {
        let forms = build_forms(&snapshot("one\ntwo\nthree").root, &Line::new(), 1, &opts());
        assert!(forms.expandable);
        assert_eq!(texts(&forms.collapsed), ["  string(13) \"one...\""]);
        assert_eq!(
            texts(&forms.header),
            ["  string(13) \"one", "  two", "  three\""]
        );
        assert!(forms.footer.is_empty());
    }

    #[test]
    fn container_forms() {
        let forms = build_forms(&snapshot(&vec![1, 2, 3]).root, &Line::new(), 0, &opts());
        assert_eq!(texts(&forms.collapsed), ["array(3) {...}"]);
        assert_eq!(texts(&forms.header), ["array(3) {"]);
        assert_eq!(texts(&forms.footer), ["}"]);
        let empty: Vec<i32> = Vec::new();
        let forms = build_forms(&snapshot(&empty).root, &Line::new(), 0, &opts());
        assert_eq!(texts(&forms.collapsed), ["array(0) {}"]);
        assert!(!forms.expandable);
    }

    #[test]
    fn alias_form() {
        let mut node = snapshot(&vec![1]).root;
        node.alias_of = Some(NodeIdentity(4));
        let forms = build_forms(&node, &Line::new(), 0, &opts());
        assert_eq!(texts(&forms.collapsed), ["array(1) #4 *ALIAS*"]);
        assert!(!forms.expandable);
    }

    #[test]
    fn field_prefix_variants() {
        let field = FieldEntry {
            name: "count".into(),
            visibility: Visibility::Protected,
            is_static: true,
            declaring_type_name: Some("Base".into()),
            value: snapshot(&1).root,
        };
        assert_eq!(
            field_prefix(&field).plain_text(),
            "[static protected:count:Base] => "
        );
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("abc", 5), "abc");
    }
}
