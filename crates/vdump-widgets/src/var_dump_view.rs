#![forbid(unsafe_code)]

//! Interactive inspector over one rendered tree.
//!
//! The view is a small state machine:
//!
//! ```text
//!            '/'                    Enter
//! Browsing ───────▶ Searching{editing} ───────▶ Searching{committed}
//!    ▲                   │  Esc                    │  Esc
//!    └───────────────────┴─────────────────────────┘
//! ```
//!
//! Cursor movement works the same in every state and never lands on a
//! continuation row. While a query is being edited, printable keys go to the
//! query and the view captures all input.

use tracing::{debug, warn};
use vdump_core::event::{KeyCode, KeyEvent};
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::canvas::{Canvas, LineAccumulator};
use vdump_render::color::{Color, ColorTag};
use vdump_snapshot::SnapshotNode;

use crate::View;
use crate::options::ViewOptions;
use crate::scroll_view::{ScrollView, ViewportState};
use crate::search::{SearchCanvas, SearchState};
use crate::var_tree::{NodeId, VarTree};

/// Navigation state of a [`VarDumpView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    /// Plain navigation.
    #[default]
    Browsing,
    /// A search is active; `editing` while the query is being typed.
    Searching {
        /// Whether keystrokes currently go to the query.
        editing: bool,
    },
}

/// The interactive variable dump view.
#[derive(Debug)]
pub struct VarDumpView {
    label: String,
    tree: VarTree,
    scroll: ScrollView,
    mode: NavMode,
    search: SearchState,
    alias_jump: Option<(NodeId, NodeId)>,
    max_width: Option<usize>,
    opts: ViewOptions,
}

impl VarDumpView {
    /// Create a view over `snapshot`. The root starts expanded one level.
    pub fn new(label: impl Into<String>, snapshot: SnapshotNode, opts: ViewOptions) -> Self {
        let mut tree = VarTree::new(snapshot, opts);
        tree.expand(VarTree::ROOT, false);
        let mut view = Self {
            label: label.into(),
            tree,
            scroll: ScrollView::with_cursor(),
            mode: NavMode::Browsing,
            search: SearchState::new(),
            alias_jump: None,
            max_width: None,
            opts,
        };
        view.sync_extent();
        view
    }

    /// The rendered tree.
    #[must_use]
    pub fn tree(&self) -> &VarTree {
        &self.tree
    }

    /// Current navigation state.
    #[must_use]
    pub fn mode(&self) -> NavMode {
        self.mode
    }

    /// Current search state.
    #[must_use]
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Viewport state.
    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        self.scroll.state()
    }

    /// Cursor row.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.scroll.state().cursor_y
    }

    /// The (alias, original) pair highlighted after an alias jump.
    #[must_use]
    pub fn alias_highlight(&self) -> Option<(NodeId, NodeId)> {
        self.alias_jump
    }

    fn sync_extent(&mut self) {
        let width = match self.max_width {
            Some(width) => width,
            None => {
                let width = self.tree.measure_max_width();
                self.max_width = Some(width);
                width
            }
        };
        self.scroll.set_extent(self.tree.row_count(), width);
    }

    fn last_row(&self) -> usize {
        self.tree.row_count().saturating_sub(1)
    }

    // ---- cursor ---------------------------------------------------------

    fn move_up(&mut self) {
        let mut row = self.cursor();
        if row == 0 {
            return;
        }
        row -= 1;
        while row > 0 && self.tree.is_continuation(row) {
            row -= 1;
        }
        self.scroll.set_cursor(row);
    }

    fn move_down(&mut self) {
        let last = self.last_row();
        let mut row = self.cursor() + 1;
        while row <= last && self.tree.is_continuation(row) {
            row += 1;
        }
        if row <= last {
            self.scroll.set_cursor(row);
        }
    }

    fn page_down(&mut self) {
        let cursor = self.cursor();
        let page = self.scroll.state().viewport_height;
        let last = self.last_row();
        let target = (cursor + page).min(last);
        let landing = (target..=last)
            .find(|&row| !self.tree.is_continuation(row))
            .or_else(|| {
                (cursor + 1..target)
                    .rev()
                    .find(|&row| !self.tree.is_continuation(row))
            })
            .unwrap_or(cursor);
        self.scroll.page_down();
        self.scroll.set_cursor(landing);
    }

    fn page_up(&mut self) {
        let page = self.scroll.state().viewport_height;
        let target = self.cursor().saturating_sub(page);
        let landing = (0..=target)
            .rev()
            .find(|&row| !self.tree.is_continuation(row))
            .unwrap_or(0);
        self.scroll.page_up();
        self.scroll.set_cursor(landing);
    }

    // ---- expand / alias -------------------------------------------------

    fn activate(&mut self) {
        let Some(info) = self.tree.locate(self.cursor()) else {
            return;
        };
        let node = info.node;
        if let Some(identity) = self.tree.alias_target(node) {
            let Some(original) = self.tree.find_original(identity) else {
                warn!(%identity, "alias jump target missing");
                return;
            };
            self.tree.expand(original, true);
            self.sync_extent();
            self.scroll.set_cursor(self.tree.row_of(original));
            self.alias_jump = Some((node, original));
            debug!(alias = node, original, "alias jump");
            if self.search.is_active() {
                self.run_search();
            }
            return;
        }
        if !self.tree.toggle(node) {
            return;
        }
        self.sync_extent();
        let home = self.tree.row_of(node);
        while self.cursor() > home {
            let before = self.cursor();
            self.move_up();
            if self.cursor() == before {
                break;
            }
        }
        if self.search.is_active() {
            self.run_search();
        }
    }

    // ---- search ---------------------------------------------------------

    fn run_search(&mut self) {
        let mut canvas = LineAccumulator::new();
        let outcome = {
            let mut search = SearchCanvas::new(&mut canvas, self.search.query());
            self.tree.draw(&mut search, &|_| None);
            search.finish()
        };
        self.search.apply(outcome);
        debug!(
            query = self.search.query(),
            matches = self.search.match_count(),
            "search pass"
        );
    }

    fn match_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .search
            .matched()
            .iter()
            .filter(|&&id| self.tree.is_visible(id))
            .map(|&id| self.tree.row_of(id))
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    fn jump_to_match(&mut self, forward: bool, inclusive: bool) {
        let rows = self.match_rows();
        let cursor = self.cursor();
        let target = if forward {
            rows.iter()
                .copied()
                .find(|&r| r > cursor || (inclusive && r == cursor))
                .or_else(|| rows.first().copied())
        } else {
            rows.iter()
                .rev()
                .copied()
                .find(|&r| r < cursor)
                .or_else(|| rows.last().copied())
        };
        if let Some(row) = target {
            self.scroll.set_cursor(row);
        }
    }

    fn end_search(&mut self) {
        self.search.clear();
        self.mode = NavMode::Browsing;
        debug!("search cleared");
    }

    fn handle_editing(&mut self, key: &KeyEvent) -> Option<bool> {
        match key.code {
            KeyCode::Enter => {
                self.run_search();
                if self.search.is_active() {
                    self.mode = NavMode::Searching { editing: false };
                    self.jump_to_match(true, true);
                    debug!(query = self.search.query(), "search committed");
                } else {
                    self.end_search();
                }
                Some(true)
            }
            KeyCode::Escape => {
                self.end_search();
                Some(true)
            }
            KeyCode::Backspace => {
                if self.search.pop() {
                    self.run_search();
                }
                Some(true)
            }
            _ => {
                let c = key.printable()?;
                let mut text = [0u8; 4];
                if self.search.push_str(c.encode_utf8(&mut text)) {
                    self.run_search();
                }
                Some(true)
            }
        }
    }

    fn status_line(&self) -> String {
        match self.mode {
            NavMode::Browsing => String::new(),
            NavMode::Searching { editing: true } => format!("Search: {}_", self.search.query()),
            NavMode::Searching { editing: false } => format!(
                "Search: {} ({} matches)",
                self.search.query(),
                self.search.match_count()
            ),
        }
    }
}

impl View for VarDumpView {
    fn label(&self) -> &str {
        &self.label
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let (content, status) = match self.mode {
            NavMode::Browsing => (area, None),
            NavMode::Searching { .. } if area.height > 1 => {
                let (content, status) = area.split_bottom(1);
                (content, Some(status))
            }
            NavMode::Searching { .. } => (area, None),
        };
        if !self.scroll.is_measured() {
            self.sync_extent();
        }

        let Self {
            tree,
            scroll,
            search,
            alias_jump,
            ..
        } = self;
        let highlight = *alias_jump;
        let recolor = move |id: NodeId| -> Option<ColorTag> {
            match highlight {
                Some((alias, _)) if alias == id => Some(ColorTag::ALIAS_SOURCE),
                Some((_, original)) if original == id => Some(ColorTag::ALIAS_TARGET),
                _ => None,
            }
        };
        let query = search.is_active().then(|| search.query().to_string());
        scroll.render(content, buf, |canvas: &mut dyn Canvas| match &query {
            Some(query) => {
                let mut search = SearchCanvas::new(canvas, query);
                tree.draw(&mut search, &recolor);
                search.finish();
            }
            None => tree.draw(canvas, &recolor),
        });

        if let Some(status) = status {
            buf.fill(status, vdump_render::cell::Cell::BLANK);
            buf.print(
                status.x,
                status.y,
                &self.status_line(),
                Color::Yellow.tag(),
                status.right(),
            );
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.alias_jump = None;

        if self.mode == (NavMode::Searching { editing: true })
            && let Some(consumed) = self.handle_editing(&key)
        {
            return consumed;
        }

        if key.is_char(self.opts.search_key) {
            self.search.clear();
            self.mode = NavMode::Searching { editing: true };
            debug!("search started");
            return true;
        }
        if self.mode == (NavMode::Searching { editing: false }) {
            match key.code {
                KeyCode::Char('n') => {
                    self.jump_to_match(true, false);
                    return true;
                }
                KeyCode::Char('N') => {
                    self.jump_to_match(false, false);
                    return true;
                }
                KeyCode::Escape => {
                    self.end_search();
                    return true;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                self.scroll.handle_scroll_key(&key);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => return false,
        }
        true
    }

    fn hints(&self) -> String {
        format!("Enter:Toggle {}:Search n:Next match", self.opts.search_key)
    }

    fn captures_input(&self) -> bool {
        self.mode == NavMode::Searching { editing: true }
    }

    fn drop_cache(&mut self) {
        self.scroll.drop_cache();
        self.max_width = None;
    }

    fn deactivate(&mut self) {
        self.alias_jump = None;
        if self.mode != NavMode::Browsing {
            self.end_search();
        }
    }
}
