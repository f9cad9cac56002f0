#![forbid(unsafe_code)]

//! Diff computation between frames.
//!
//! `BufferDiff` records which cells changed between the previous and the next
//! frame with a row-major scan, then coalesces them into per-row runs so the
//! presenter positions the cursor once per run.
//!
//! ```
//! use vdump_render::buffer::Buffer;
//! use vdump_render::cell::Cell;
//! use vdump_render::diff::BufferDiff;
//!
//! let old = Buffer::new(20, 4);
//! let mut new = Buffer::new(20, 4);
//! new.set(5, 1, Cell::from_char('X'));
//! new.set(6, 1, Cell::from_char('Y'));
//!
//! let diff = BufferDiff::compute(&old, &new);
//! assert_eq!(diff.len(), 2);
//! assert_eq!(diff.runs().len(), 1);
//! ```

use crate::buffer::Buffer;

/// A contiguous run of changed cells on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    /// Row index.
    pub y: u16,
    /// Start column (inclusive).
    pub x0: u16,
    /// End column (inclusive).
    pub x1: u16,
}

impl ChangeRun {
    /// Create a run.
    #[inline]
    pub const fn new(y: u16, x0: u16, x1: u16) -> Self {
        debug_assert!(x0 <= x1);
        Self { y, x0, x1 }
    }

    /// Number of cells in the run.
    #[inline]
    pub const fn len(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    /// Always false for runs built by [`BufferDiff::runs`].
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0
    }
}

/// Positions of every changed cell, sorted by `(y, x)`.
#[derive(Debug, Clone, Default)]
pub struct BufferDiff {
    changes: Vec<(u16, u16)>,
}

impl BufferDiff {
    /// An empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the cells of `new` that differ from `old`.
    ///
    /// When the sizes differ (the terminal was resized) every cell of `new`
    /// is reported.
    pub fn compute(old: &Buffer, new: &Buffer) -> Self {
        if old.width() != new.width() || old.height() != new.height() {
            return Self::full(new);
        }

        let mut changes = Vec::new();
        for y in 0..new.height() {
            for x in 0..new.width() {
                if old.get(x, y) != new.get(x, y) {
                    changes.push((x, y));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(changes = changes.len(), "diff computed");

        Self { changes }
    }

    /// A diff covering every cell of `buffer`.
    pub fn full(buffer: &Buffer) -> Self {
        let mut changes = Vec::with_capacity(buffer.width() as usize * buffer.height() as usize);
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                changes.push((x, y));
            }
        }
        Self { changes }
    }

    /// Number of changed cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changed positions as `(x, y)`.
    #[inline]
    pub fn changes(&self) -> &[(u16, u16)] {
        &self.changes
    }

    /// Coalesce changes into per-row runs of consecutive columns.
    pub fn runs(&self) -> Vec<ChangeRun> {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < self.changes.len() {
            let (x0, y) = self.changes[i];
            let mut x1 = x0;
            i += 1;
            while i < self.changes.len() {
                let (x, yy) = self.changes[i];
                if yy != y || x != x1 + 1 {
                    break;
                }
                x1 = x;
                i += 1;
            }
            runs.push(ChangeRun::new(y, x0, x1));
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::color::Color;

    #[test]
    fn identical_buffers_have_empty_diff() {
        let a = Buffer::new(10, 10);
        let b = Buffer::new(10, 10);
        assert!(BufferDiff::compute(&a, &b).is_empty());
    }

    #[test]
    fn color_change_is_detected() {
        let mut a = Buffer::new(4, 1);
        let mut b = Buffer::new(4, 1);
        a.print(0, 0, "ab", Color::Red.tag(), 4);
        b.print(0, 0, "ab", Color::Green.tag(), 4);
        assert_eq!(BufferDiff::compute(&a, &b).len(), 2);
    }

    #[test]
    fn runs_split_on_gaps_and_rows() {
        let a = Buffer::new(10, 3);
        let mut b = Buffer::new(10, 3);
        b.set(1, 0, Cell::from_char('a'));
        b.set(2, 0, Cell::from_char('b'));
        b.set(5, 0, Cell::from_char('c'));
        b.set(0, 2, Cell::from_char('d'));
        let runs = BufferDiff::compute(&a, &b).runs();
        assert_eq!(
            runs,
            vec![
                ChangeRun::new(0, 1, 2),
                ChangeRun::new(0, 5, 5),
                ChangeRun::new(2, 0, 0)
            ]
        );
        assert_eq!(runs[0].len(), 2);
    }

    #[test]
    fn size_change_reports_everything() {
        let a = Buffer::new(2, 2);
        let b = Buffer::new(3, 2);
        assert_eq!(BufferDiff::compute(&a, &b).len(), 6);
    }
}
