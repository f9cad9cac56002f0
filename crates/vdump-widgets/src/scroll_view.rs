#![forbid(unsafe_code)]

//! Reusable scrollable region.
//!
//! A [`ScrollView`] shows a window of a virtual canvas whose size is only
//! known by running the view's draw routine. The first render runs the
//! routine once against a [`LineAccumulator`] to learn the virtual extent,
//! then every render runs it against a [`PadCanvas`] covering exactly the
//! visible window and copies the pad into the frame.
//!
//! Scroll offsets are clamped to `[0, max(0, virtual - viewport)]` after
//! every operation, including resizes and re-measurement.

use vdump_core::event::{KeyCode, KeyEvent};
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::canvas::{Canvas, LineAccumulator, PadCanvas};
use vdump_render::cell::CellFlags;

/// Scroll position, cursor and extents of one scrollable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    /// First visible virtual row.
    pub scroll_y: usize,
    /// First visible virtual column.
    pub scroll_x: usize,
    /// Cursor row in virtual coordinates.
    pub cursor_y: usize,
    /// Visible rows (at least 1).
    pub viewport_height: usize,
    /// Visible columns (at least 1).
    pub viewport_width: usize,
    /// Rows of the virtual canvas.
    pub virtual_height: usize,
    /// Columns of the virtual canvas.
    pub virtual_width: usize,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scroll_y: 0,
            scroll_x: 0,
            cursor_y: 0,
            viewport_height: 1,
            viewport_width: 1,
            virtual_height: 0,
            virtual_width: 0,
        }
    }
}

impl ViewportState {
    /// Largest valid `scroll_y`.
    #[must_use]
    pub fn max_scroll_y(&self) -> usize {
        self.virtual_height.saturating_sub(self.viewport_height)
    }

    /// Largest valid `scroll_x`.
    #[must_use]
    pub fn max_scroll_x(&self) -> usize {
        self.virtual_width.saturating_sub(self.viewport_width)
    }

    /// Last virtual row, or 0 for empty content.
    #[must_use]
    pub fn last_row(&self) -> usize {
        self.virtual_height.saturating_sub(1)
    }

    /// Bring every offset back into range.
    pub fn clamp(&mut self) {
        self.viewport_height = self.viewport_height.max(1);
        self.viewport_width = self.viewport_width.max(1);
        self.scroll_y = self.scroll_y.min(self.max_scroll_y());
        self.scroll_x = self.scroll_x.min(self.max_scroll_x());
        self.cursor_y = self.cursor_y.min(self.last_row());
    }

    /// Scroll vertically so `row` is inside the viewport.
    pub fn ensure_visible(&mut self, row: usize) {
        if row < self.scroll_y {
            self.scroll_y = row;
        } else if row >= self.scroll_y + self.viewport_height {
            self.scroll_y = row + 1 - self.viewport_height;
        }
        self.clamp();
    }

    /// Whether `row` is currently on screen.
    #[must_use]
    pub fn is_row_visible(&self, row: usize) -> bool {
        row >= self.scroll_y && row < self.scroll_y + self.viewport_height
    }
}

/// A scrollable region with a lazily measured virtual canvas.
#[derive(Debug, Default)]
pub struct ScrollView {
    state: ViewportState,
    pad: Option<Buffer>,
    measured: bool,
    cursor: bool,
}

impl ScrollView {
    /// A scroll view without a cursor line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scroll view that highlights the cursor row.
    #[must_use]
    pub fn with_cursor() -> Self {
        Self {
            cursor: true,
            ..Self::default()
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Whether the virtual extent is known.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Whether a pad is currently allocated.
    #[must_use]
    pub fn has_pad(&self) -> bool {
        self.pad.is_some()
    }

    /// Set the visible extent. Zero extents are clamped to 1.
    ///
    /// With a cursor, a changed extent scrolls the cursor row back into view.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        let width = width.max(1);
        let height = height.max(1);
        if width != self.state.viewport_width || height != self.state.viewport_height {
            self.state.viewport_width = width;
            self.state.viewport_height = height;
            self.pad = None;
            if self.cursor {
                self.state.ensure_visible(self.state.cursor_y);
            }
        }
        self.state.clamp();
    }

    /// Set the virtual extent directly and mark it measured.
    pub fn set_extent(&mut self, height: usize, width: usize) {
        self.state.virtual_height = height;
        self.state.virtual_width = width;
        self.measured = true;
        self.state.clamp();
    }

    /// Run `draw` in measurement mode and record the extent it covers.
    pub fn measure(&mut self, draw: impl FnOnce(&mut dyn Canvas)) {
        let mut canvas = LineAccumulator::new();
        draw(&mut canvas);
        self.set_extent(canvas.height(), canvas.width());
    }

    /// Forget the pad and the measured extent; the next render re-measures.
    pub fn drop_cache(&mut self) {
        self.pad = None;
        self.measured = false;
    }

    /// Forget only the measured extent.
    pub fn invalidate_extent(&mut self) {
        self.measured = false;
    }

    // ---- scrolling ------------------------------------------------------

    /// Scroll up by `rows`.
    pub fn scroll_up(&mut self, rows: usize) {
        self.state.scroll_y = self.state.scroll_y.saturating_sub(rows);
        self.state.clamp();
    }

    /// Scroll down by `rows`.
    pub fn scroll_down(&mut self, rows: usize) {
        self.state.scroll_y = self.state.scroll_y.saturating_add(rows);
        self.state.clamp();
    }

    /// Scroll left by `cols`.
    pub fn scroll_left(&mut self, cols: usize) {
        self.state.scroll_x = self.state.scroll_x.saturating_sub(cols);
        self.state.clamp();
    }

    /// Scroll right by `cols`.
    pub fn scroll_right(&mut self, cols: usize) {
        self.state.scroll_x = self.state.scroll_x.saturating_add(cols);
        self.state.clamp();
    }

    /// Scroll up one viewport.
    pub fn page_up(&mut self) {
        self.scroll_up(self.state.viewport_height);
    }

    /// Scroll down one viewport.
    pub fn page_down(&mut self) {
        self.scroll_down(self.state.viewport_height);
    }

    /// Snap horizontal scroll to the left edge.
    pub fn home(&mut self) {
        self.state.scroll_x = 0;
    }

    /// Snap horizontal scroll to the right edge.
    pub fn end(&mut self) {
        self.state.scroll_x = self.state.max_scroll_x();
    }

    /// Move the cursor to `row` (clamped) and scroll it into view.
    pub fn set_cursor(&mut self, row: usize) {
        self.state.cursor_y = row.min(self.state.last_row());
        self.state.ensure_visible(self.state.cursor_y);
    }

    /// Scroll vertically so `row` is visible.
    pub fn ensure_visible(&mut self, row: usize) {
        self.state.ensure_visible(row);
    }

    /// Apply the standard scroll keys. Returns `true` if `key` was one.
    ///
    /// Arrows move one row or column, page keys one viewport, Home/End snap
    /// horizontally.
    pub fn handle_scroll_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Left => self.scroll_left(1),
            KeyCode::Right => self.scroll_right(1),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    // ---- rendering ------------------------------------------------------

    /// Render the visible window of the content drawn by `draw` into `area`.
    ///
    /// Measures first when the extent is unknown. The pad covers exactly the
    /// viewport; rows and columns outside it are discarded by the canvas.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, mut draw: impl FnMut(&mut dyn Canvas)) {
        if area.is_empty() {
            return;
        }
        self.set_viewport(usize::from(area.width), usize::from(area.height));
        if !self.measured {
            self.measure(&mut draw);
        }
        let state = self.state;
        let pad = self
            .pad
            .get_or_insert_with(|| Buffer::new(area.width, area.height));
        pad.clear();
        {
            let mut canvas = PadCanvas::new(pad, state.scroll_y, state.scroll_x);
            draw(&mut canvas);
        }
        if self.cursor && state.virtual_height > 0 && state.is_row_visible(state.cursor_y) {
            let y = u16::try_from(state.cursor_y - state.scroll_y).unwrap_or(u16::MAX);
            pad.add_row_flags(y, CellFlags::REVERSE);
        }
        buf.blit(pad, area.x, area.y, area);
    }
}
