#![forbid(unsafe_code)]

//! Renderable node model over one snapshot.
//!
//! [`VarTree`] owns a [`SnapshotNode`] tree and an arena of renderable nodes
//! that mirror it. Renderable children are created lazily the first time a
//! node is expanded, so a huge snapshot costs nothing until it is opened.
//!
//! # Geometry
//!
//! Each node draws as its header lines, then (when expanded) its children,
//! then its footer lines. The height and width of each form are computed once
//! and memoized; forms never change after construction. The aggregate
//! `children_height`/`children_width` caches depend on expand state and are
//! cleared on the toggled node and every ancestor before the toggle returns,
//! so no geometry read can observe a value computed before the toggle.
//!
//! # Rows
//!
//! Row `r` of the rendered tree is located analytically from the cached
//! heights. The first header line of a node is its title row; any other line
//! of the node (string continuation lines, the closing footer) is a
//! continuation row whose primary row is the title row.
//!
//! # Invariants
//!
//! 1. `height(id) >= 1` for every node.
//! 2. Only expandable nodes are ever expanded; aliases are never expandable.
//! 3. An expanded node always has its children built.
//! 4. Collapsing is deep: every built descendant is collapsed too.

use std::cell::Cell;

use tracing::{debug, trace, warn};
use vdump_render::canvas::{Canvas, LineAccumulator};
use vdump_render::color::ColorTag;
use vdump_render::segment::Line;
use vdump_snapshot::{NodeIdentity, NodeKind, SnapshotNode};

use crate::format::{Forms, build_forms, element_prefix, field_prefix};
use crate::options::ViewOptions;

/// Index of a renderable node in its tree.
pub type NodeId = usize;

/// Location of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowInfo {
    /// Node that owns the row.
    pub node: NodeId,
    /// Line index within the node's own lines (header then footer).
    pub line: usize,
    /// Whether the row is a continuation of the node's title row.
    pub continuation: bool,
}

#[derive(Debug)]
struct Form {
    header: Vec<Line>,
    footer: Vec<Line>,
    geometry: Cell<Option<(usize, usize)>>,
}

impl Form {
    fn new(header: Vec<Line>, footer: Vec<Line>) -> Self {
        Self {
            header,
            footer,
            geometry: Cell::new(None),
        }
    }

    fn geometry(&self) -> (usize, usize) {
        if let Some(geometry) = self.geometry.get() {
            return geometry;
        }
        let height = (self.header.len() + self.footer.len()).max(1);
        let width = self
            .header
            .iter()
            .chain(&self.footer)
            .map(Line::width)
            .max()
            .unwrap_or(0);
        self.geometry.set(Some((height, width)));
        (height, width)
    }
}

#[derive(Debug)]
struct TreeNode {
    path: Vec<usize>,
    parent: Option<NodeId>,
    depth: usize,
    identity: Option<NodeIdentity>,
    alias_of: Option<NodeIdentity>,
    expandable: bool,
    expanded: bool,
    collapsed_form: Form,
    expanded_form: Form,
    children: Option<Vec<NodeId>>,
    children_height: Cell<Option<usize>>,
    children_width: Cell<Option<usize>>,
}

impl TreeNode {
    fn new(
        snap: &SnapshotNode,
        prefix: &Line,
        path: Vec<usize>,
        parent: Option<NodeId>,
        depth: usize,
        opts: &ViewOptions,
    ) -> Self {
        let Forms {
            collapsed,
            header,
            footer,
            expandable,
        } = build_forms(snap, prefix, depth, opts);
        Self {
            path,
            parent,
            depth,
            identity: snap.identity,
            alias_of: snap.alias_of,
            expandable,
            expanded: false,
            collapsed_form: Form::new(collapsed, Vec::new()),
            expanded_form: Form::new(header, footer),
            children: None,
            children_height: Cell::new(None),
            children_width: Cell::new(None),
        }
    }

    fn form(&self) -> &Form {
        if self.expanded {
            &self.expanded_form
        } else {
            &self.collapsed_form
        }
    }

    fn invalidate(&self) {
        self.children_height.set(None);
        self.children_width.set(None);
    }
}

/// The renderable tree of one dump.
#[derive(Debug)]
pub struct VarTree {
    snapshot: SnapshotNode,
    nodes: Vec<TreeNode>,
    opts: ViewOptions,
}

impl VarTree {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    /// Wrap a snapshot. Only the root is built; it starts collapsed.
    pub fn new(snapshot: SnapshotNode, opts: ViewOptions) -> Self {
        let root = TreeNode::new(&snapshot, &Line::new(), Vec::new(), None, 0, &opts);
        Self {
            snapshot,
            nodes: vec![root],
            opts,
        }
    }

    /// The wrapped snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &SnapshotNode {
        &self.snapshot
    }

    /// The snapshot node behind `id`.
    #[must_use]
    pub fn snapshot_node(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.nodes
            .get(id)
            .and_then(|node| self.snapshot.descend(&node.path))
    }

    /// Number of renderable nodes built so far.
    #[must_use]
    pub fn built_len(&self) -> usize {
        self.nodes.len()
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Depth of `id` (root is 0).
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, |node| node.depth)
    }

    /// Built children of `id` (empty until first expanded).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .and_then(|node| node.children.as_deref())
            .unwrap_or(&[])
    }

    /// Whether `id` can be expanded.
    #[must_use]
    pub fn is_expandable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.expandable)
    }

    /// Whether `id` is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.expanded)
    }

    /// Identity this node refers back to, if it is an alias.
    #[must_use]
    pub fn alias_target(&self, id: NodeId) -> Option<NodeIdentity> {
        self.nodes.get(id).and_then(|node| node.alias_of)
    }

    /// Identity of the instance behind `id`, for containers and records.
    #[must_use]
    pub fn identity(&self, id: NodeId) -> Option<NodeIdentity> {
        self.nodes.get(id).and_then(|node| node.identity)
    }

    /// Plain text of the title row of `id` in its current form.
    #[must_use]
    pub fn title_text(&self, id: NodeId) -> String {
        self.nodes
            .get(id)
            .and_then(|node| node.form().header.first())
            .map(Line::plain_text)
            .unwrap_or_default()
    }

    // ---- geometry -------------------------------------------------------

    /// Rows of the active form of `id`, children excluded.
    #[must_use]
    pub fn form_height(&self, id: NodeId) -> usize {
        self.nodes[id].form().geometry().0
    }

    /// Columns of the widest line of the active form of `id`.
    #[must_use]
    pub fn form_width(&self, id: NodeId) -> usize {
        self.nodes[id].form().geometry().1
    }

    /// Rows used by the children of `id`; 0 while collapsed.
    #[must_use]
    pub fn children_height(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        if !node.expanded {
            return 0;
        }
        if let Some(height) = node.children_height.get() {
            return height;
        }
        let height = self.children(id).iter().map(|&c| self.height(c)).sum();
        node.children_height.set(Some(height));
        height
    }

    /// Columns of the widest row drawn by the children of `id`.
    #[must_use]
    pub fn children_width(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        if !node.expanded {
            return 0;
        }
        if let Some(width) = node.children_width.get() {
            return width;
        }
        let width = self
            .children(id)
            .iter()
            .map(|&c| self.width(c))
            .max()
            .unwrap_or(0);
        node.children_width.set(Some(width));
        width
    }

    /// Total rows drawn by `id`, always at least 1.
    #[must_use]
    pub fn height(&self, id: NodeId) -> usize {
        self.form_height(id) + self.children_height(id)
    }

    /// Total columns drawn by `id`.
    #[must_use]
    pub fn width(&self, id: NodeId) -> usize {
        self.form_width(id).max(self.children_width(id))
    }

    /// Cached children height, without computing it.
    #[must_use]
    pub fn cached_children_height(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id).and_then(|node| node.children_height.get())
    }

    /// Rows of the whole rendered tree.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.height(Self::ROOT)
    }

    /// Clear the aggregate caches of `id` and all of its ancestors.
    fn notify_child_modification(&self, id: NodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &self.nodes[id];
            node.invalidate();
            current = node.parent;
        }
    }

    fn invalidate_all(&self) {
        for node in &self.nodes {
            node.invalidate();
        }
    }

    // ---- expand state ---------------------------------------------------

    fn ensure_children(&mut self, id: NodeId) {
        if self.nodes[id].children.is_some() {
            return;
        }
        let path = self.nodes[id].path.clone();
        let depth = self.nodes[id].depth + 1;
        let Some(snap) = self.snapshot.descend(&path) else {
            self.nodes[id].children = Some(Vec::new());
            return;
        };
        let mut built = Vec::new();
        let mut ids = Vec::new();
        let first_id = self.nodes.len();
        let mut push = |index: usize, prefix: Line, child: &SnapshotNode| {
            let mut child_path = path.clone();
            child_path.push(index);
            ids.push(first_id + built.len());
            built.push(TreeNode::new(
                child,
                &prefix,
                child_path,
                Some(id),
                depth,
                &self.opts,
            ));
        };
        match &snap.kind {
            NodeKind::Container { elements } => {
                for (i, element) in elements.iter().enumerate() {
                    push(i, element_prefix(&element.key), &element.value);
                }
            }
            NodeKind::Record { fields, .. } => {
                for (i, field) in fields.iter().enumerate() {
                    push(i, field_prefix(field), &field.value);
                }
            }
            NodeKind::Scalar { .. } | NodeKind::Resource { .. } => {}
        }
        trace!(node = id, children = ids.len(), "children built");
        self.nodes.extend(built);
        self.nodes[id].children = Some(ids);
    }

    /// Expand `id`. With `propagate_to_ancestors`, every ancestor is expanded
    /// as well so the node becomes visible.
    pub fn expand(&mut self, id: NodeId, propagate_to_ancestors: bool) {
        if id >= self.nodes.len() {
            return;
        }
        if self.nodes[id].expandable && !self.nodes[id].expanded {
            self.ensure_children(id);
            self.nodes[id].expanded = true;
            self.notify_child_modification(id);
        }
        if propagate_to_ancestors {
            let mut current = self.nodes[id].parent;
            while let Some(ancestor) = current {
                if !self.nodes[ancestor].expanded {
                    self.ensure_children(ancestor);
                    self.nodes[ancestor].expanded = true;
                    self.notify_child_modification(ancestor);
                }
                current = self.nodes[ancestor].parent;
            }
        }
    }

    /// Collapse `id` and every built descendant.
    pub fn collapse(&mut self, id: NodeId) {
        if id >= self.nodes.len() {
            return;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current];
            node.expanded = false;
            node.invalidate();
            if let Some(children) = &node.children {
                stack.extend(children.iter().copied());
            }
        }
        self.notify_child_modification(id);
    }

    /// Flip the expand state of `id`. Returns `false` for non-expandable nodes.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if !self.is_expandable(id) {
            return false;
        }
        if self.nodes[id].expanded {
            self.collapse(id);
            debug!(node = id, "collapsed");
        } else {
            self.expand(id, false);
            debug!(node = id, "expanded");
        }
        true
    }

    /// Expand every expandable node, building the whole tree.
    pub fn expand_all(&mut self) {
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            if !self.nodes[id].expandable {
                continue;
            }
            self.ensure_children(id);
            self.nodes[id].expanded = true;
            stack.extend(self.children(id).iter().copied());
        }
        self.invalidate_all();
    }

    /// Width of the fully expanded tree.
    ///
    /// Runs one measurement pass with everything expanded, then restores the
    /// previous expand state of every node.
    pub fn measure_max_width(&mut self) -> usize {
        let saved: Vec<bool> = self.nodes.iter().map(|node| node.expanded).collect();
        self.expand_all();
        let mut canvas = LineAccumulator::new();
        self.draw(&mut canvas, &|_| None);
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.expanded = saved.get(i).copied().unwrap_or(false);
        }
        self.invalidate_all();
        canvas.width()
    }

    /// Whether every ancestor of `id` is expanded.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if !self.nodes[ancestor].expanded {
                return false;
            }
            current = self.nodes[ancestor].parent;
        }
        id < self.nodes.len()
    }

    /// Renderable node for a snapshot path, building nodes along the way.
    pub fn node_for_path(&mut self, path: &[usize]) -> Option<NodeId> {
        let mut id = Self::ROOT;
        for &index in path {
            self.ensure_children(id);
            id = *self.children(id).get(index)?;
        }
        Some(id)
    }

    /// Renderable node of the non-alias instance carrying `identity`.
    pub fn find_original(&mut self, identity: NodeIdentity) -> Option<NodeId> {
        let Some(path) = self.snapshot.find_original(identity) else {
            warn!(%identity, "alias target not found");
            return None;
        };
        self.node_for_path(&path)
    }

    // ---- rows -----------------------------------------------------------

    /// Locate `row` in the rendered tree.
    #[must_use]
    pub fn locate(&self, row: usize) -> Option<RowInfo> {
        if row >= self.row_count() {
            return None;
        }
        let mut id = Self::ROOT;
        let mut row = row;
        'descend: loop {
            let node = &self.nodes[id];
            let form = node.form();
            if row < form.header.len() {
                return Some(RowInfo {
                    node: id,
                    line: row,
                    continuation: row > 0,
                });
            }
            row -= form.header.len();
            if node.expanded {
                for &child in self.children(id) {
                    let height = self.height(child);
                    if row < height {
                        id = child;
                        continue 'descend;
                    }
                    row -= height;
                }
            }
            return Some(RowInfo {
                node: id,
                line: form.header.len() + row,
                continuation: true,
            });
        }
    }

    /// Whether `row` is a continuation row.
    #[must_use]
    pub fn is_continuation(&self, row: usize) -> bool {
        self.locate(row).is_some_and(|info| info.continuation)
    }

    /// Title row of the node owning `row`.
    #[must_use]
    pub fn primary_row(&self, row: usize) -> Option<usize> {
        self.locate(row).map(|info| self.row_of(info.node))
    }

    /// Title row of `id`. Meaningful only when `id` is visible.
    #[must_use]
    pub fn row_of(&self, id: NodeId) -> usize {
        let mut row = 0;
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            row += self.nodes[parent].form().header.len();
            for &sibling in self.children(parent) {
                if sibling == current {
                    break;
                }
                row += self.height(sibling);
            }
            current = parent;
        }
        row
    }

    // ---- drawing --------------------------------------------------------

    /// Draw the tree onto `canvas`, one row per line.
    ///
    /// `recolor` may override the color of a node's own lines. Subtrees
    /// entirely outside the canvas window are skipped.
    pub fn draw(&self, canvas: &mut dyn Canvas, recolor: &dyn Fn(NodeId) -> Option<ColorTag>) {
        self.draw_node(Self::ROOT, canvas, recolor);
    }

    fn draw_node(
        &self,
        id: NodeId,
        canvas: &mut dyn Canvas,
        recolor: &dyn Fn(NodeId) -> Option<ColorTag>,
    ) -> bool {
        let window = canvas.window();
        if canvas.row() >= window.end {
            return false;
        }
        let total = self.height(id);
        if canvas.row() + total <= window.start {
            canvas.skip_rows(total);
            return true;
        }
        let node = &self.nodes[id];
        let form = node.form();
        let color = recolor(id);
        canvas.begin_element(id);
        for line in &form.header {
            draw_line(canvas, line, color);
        }
        if node.expanded {
            for &child in self.children(id) {
                if !self.draw_node(child, canvas, recolor) {
                    return false;
                }
            }
            canvas.begin_element(id);
        }
        for line in &form.footer {
            draw_line(canvas, line, color);
        }
        true
    }
}

fn draw_line(canvas: &mut dyn Canvas, line: &Line, color: Option<ColorTag>) {
    for seg in line.segments() {
        let tag = match color {
            Some(tag) if !seg.text.trim().is_empty() => tag,
            _ => seg.color,
        };
        canvas.print_segment(&seg.text, tag);
    }
    canvas.new_line();
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdump_snapshot::{ContainerRef, RecordRef, Value, snapshot};

    fn tree_of(value: &Value) -> VarTree {
        VarTree::new(
            vdump_snapshot::SnapshotBuilder::build(value).root,
            ViewOptions::default(),
        )
    }

    fn rendered(tree: &VarTree) -> Vec<String> {
        let mut canvas = LineAccumulator::capturing();
        tree.draw(&mut canvas, &|_| None);
        canvas.into_lines()
    }

    #[test]
    fn root_starts_collapsed() {
        let tree = VarTree::new(snapshot(&vec![1, 2, 3]).root, ViewOptions::default());
        assert!(!tree.is_expanded(VarTree::ROOT));
        assert_eq!(tree.row_count(), 1);
        assert_eq!(tree.built_len(), 1);
        assert_eq!(rendered(&tree), ["array(3) {...}"]);
    }

    #[test]
    fn expand_renders_children_and_footer() {
        let mut tree = VarTree::new(snapshot(&vec![1, 2]).root, ViewOptions::default());
        assert!(tree.toggle(VarTree::ROOT));
        assert_eq!(
            rendered(&tree),
            ["array(2) {", "  [0] => int(1)", "  [1] => int(2)", "}"]
        );
        assert_eq!(tree.children_height(VarTree::ROOT), 2);
        assert_eq!(tree.height(VarTree::ROOT), 4);
        assert_eq!(tree.width(VarTree::ROOT), 15);
    }

    #[test]
    fn scalars_do_not_toggle() {
        let mut tree = VarTree::new(snapshot(&5).root, ViewOptions::default());
        assert!(!tree.toggle(VarTree::ROOT));
        assert_eq!(tree.height(VarTree::ROOT), 1);
    }

    #[test]
    fn collapse_is_deep_expand_is_single_level() {
        let nested = vec![vec![1, 2], vec![3]];
        let mut tree = VarTree::new(snapshot(&nested).root, ViewOptions::default());
        tree.toggle(VarTree::ROOT);
        let first = tree.children(VarTree::ROOT)[0];
        tree.toggle(first);
        assert!(tree.is_expanded(first));

        tree.toggle(VarTree::ROOT);
        assert!(!tree.is_expanded(first));

        tree.toggle(VarTree::ROOT);
        assert!(tree.is_expanded(VarTree::ROOT));
        assert!(!tree.is_expanded(first));
        assert_eq!(tree.children_height(VarTree::ROOT), 2);
    }

    #[test]
    fn toggle_invalidates_ancestor_caches() {
        let nested = vec![vec![vec![1, 2, 3]]];
        let mut tree = VarTree::new(snapshot(&nested).root, ViewOptions::default());
        tree.toggle(VarTree::ROOT);
        let mid = tree.children(VarTree::ROOT)[0];
        tree.toggle(mid);
        let leaf = tree.children(mid)[0];
        let before = tree.children_height(VarTree::ROOT);
        assert_eq!(tree.cached_children_height(VarTree::ROOT), Some(before));

        tree.toggle(leaf);
        assert_eq!(tree.cached_children_height(VarTree::ROOT), None);
        assert_eq!(tree.cached_children_height(mid), None);
        assert_eq!(tree.children_height(VarTree::ROOT), before + 4);
    }

    #[test]
    fn multi_line_string_rows_are_continuations() {
        let list = vec!["a\nb\nc".to_string(), "z".to_string()];
        let mut tree = VarTree::new(snapshot(&list).root, ViewOptions::default());
        tree.toggle(VarTree::ROOT);
        let text = tree.children(VarTree::ROOT)[0];
        tree.toggle(text);
        assert_eq!(
            rendered(&tree),
            [
                "array(2) {",
                "  [0] => string(5) \"a",
                "  b",
                "  c\"",
                "  [1] => string(1) \"z\"",
                "}"
            ]
        );
        let continuation: Vec<bool> = (0..6).map(|r| tree.is_continuation(r)).collect();
        assert_eq!(continuation, [false, false, true, true, false, true]);
        assert_eq!(tree.primary_row(3), Some(1));
        assert_eq!(tree.primary_row(5), Some(0));
        assert_eq!(tree.row_of(tree.children(VarTree::ROOT)[1]), 4);
        assert!(tree.locate(6).is_none());
    }

    #[test]
    fn alias_is_not_expandable() {
        let shared = ContainerRef::from_values([Value::Int(1)]);
        let outer = ContainerRef::from_values([
            Value::Container(shared.clone()),
            Value::Container(shared),
        ]);
        let mut tree = tree_of(&Value::Container(outer));
        tree.toggle(VarTree::ROOT);
        let alias = tree.children(VarTree::ROOT)[1];
        assert!(tree.alias_target(alias).is_some());
        assert!(!tree.toggle(alias));
        assert!(tree.title_text(alias).ends_with("*ALIAS*"));
    }

    #[test]
    fn find_original_builds_path() {
        let inner = RecordRef::new("Inner");
        inner.set("v", 1i64);
        let outer = RecordRef::new("Outer");
        outer.set("deep", Value::Container(ContainerRef::from_values([Value::Record(inner.clone())])));
        outer.set("again", inner);
        let mut tree = tree_of(&Value::Record(outer));
        tree.toggle(VarTree::ROOT);
        let alias = tree.children(VarTree::ROOT)[1];
        let identity = tree.alias_target(alias).unwrap();
        let original = tree.find_original(identity).unwrap();
        assert!(!tree.is_visible(original));
        tree.expand(original, true);
        assert!(tree.is_visible(original));
        assert_eq!(tree.depth(original), 2);
        assert_eq!(tree.locate(tree.row_of(original)).unwrap().node, original);
    }

    #[test]
    fn measure_restores_state() {
        let nested = vec![vec!["x".repeat(100)]];
        let mut tree = VarTree::new(snapshot(&nested).root, ViewOptions::default());
        let width = tree.measure_max_width();
        assert!(width >= 100);
        assert!(!tree.is_expanded(VarTree::ROOT));
        assert_eq!(tree.row_count(), 1);
    }

    #[test]
    fn cyclic_expand_all_terminates() {
        let c = ContainerRef::new();
        c.push(Value::Container(c.clone()));
        let mut tree = tree_of(&Value::Container(c));
        tree.expand_all();
        assert_eq!(
            rendered(&tree),
            ["array(1) {", "  [0] => array(1) #1 *ALIAS*", "}"]
        );
    }

    #[test]
    fn recolor_applies_to_text_only() {
        let mut tree = VarTree::new(snapshot(&vec![1]).root, ViewOptions::default());
        tree.toggle(VarTree::ROOT);
        let child = tree.children(VarTree::ROOT)[0];
        let mut buf = vdump_render::buffer::Buffer::new(20, 3);
        {
            let mut canvas = vdump_render::canvas::PadCanvas::new(&mut buf, 0, 0);
            tree.draw(&mut canvas, &|id| (id == child).then_some(ColorTag::MATCH));
        }
        assert_eq!(buf.get(0, 1).unwrap().color, ColorTag::DEFAULT);
        assert_eq!(buf.get(2, 1).unwrap().color, ColorTag::MATCH);
        assert_ne!(buf.get(0, 0).unwrap().color, ColorTag::MATCH);
    }

    #[test]
    fn windowed_draw_skips_offscreen_rows() {
        let list: Vec<i32> = (0..100).collect();
        let mut tree = VarTree::new(snapshot(&list).root, ViewOptions::default());
        tree.toggle(VarTree::ROOT);
        let mut buf = vdump_render::buffer::Buffer::new(20, 2);
        {
            let mut canvas = vdump_render::canvas::PadCanvas::new(&mut buf, 50, 0);
            tree.draw(&mut canvas, &|_| None);
        }
        assert_eq!(buf.row_text(0), "  [49] => int(49)");
        assert_eq!(buf.row_text(1), "  [50] => int(50)");
    }
}
