#![forbid(unsafe_code)]

//! Inspector views for vdump.
//!
//! Every full-screen view implements [`View`]. The scrollable ones embed a
//! [`ScrollView`](scroll_view::ScrollView) and describe their content by
//! drawing onto a [`Canvas`](vdump_render::canvas::Canvas).

pub mod format;
pub mod options;
pub mod profile;
pub mod scroll_view;
pub mod search;
pub mod stack_trace;
pub mod table_view;
pub mod text_view;
pub mod var_dump_view;
pub mod var_tree;

pub use options::ViewOptions;
pub use profile::{ProfileRecord, Timing};
pub use scroll_view::{ScrollView, ViewportState};
pub use search::{SearchCanvas, SearchState};
pub use stack_trace::{StackFrame, StackTraceView};
pub use table_view::{TableRow, TableView};
pub use text_view::TextView;
pub use var_dump_view::{NavMode, VarDumpView};
pub use var_tree::{NodeId, RowInfo, VarTree};

use vdump_core::event::KeyEvent;
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;

/// A named full-screen view managed by the screen controller.
pub trait View {
    /// Label shown in the title bar and the view list.
    fn label(&self) -> &str;

    /// Whether the view takes part in view rotation.
    fn is_showable(&self) -> bool {
        true
    }

    /// Draw the view into `area` of `buf`.
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    /// Handle a key. Returns `true` if the key was consumed.
    fn handle_key(&mut self, key: KeyEvent) -> bool;

    /// View-specific key hints for the footer.
    fn hints(&self) -> String {
        String::new()
    }

    /// While true, every key goes to the view, global keys included.
    fn captures_input(&self) -> bool {
        false
    }

    /// Forget cached buffers and geometry; the next render re-measures.
    fn drop_cache(&mut self);

    /// Called when the screen switches away from this view.
    fn deactivate(&mut self) {}
}
