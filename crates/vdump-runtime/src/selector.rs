#![forbid(unsafe_code)]

//! Modal view list.

use vdump_core::event::{KeyCode, KeyEvent};
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_render::cell::{Cell, CellFlags};
use vdump_render::color::{Color, ColorTag};
use vdump_render::display_width;

/// Result of a key sent to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorOutcome {
    /// Still open.
    Pending,
    /// The user picked the view with this registry index.
    Chosen(usize),
    /// Closed without a choice.
    Cancelled,
}

/// A centered list of views with its own cursor.
#[derive(Debug, Clone)]
pub struct ViewSelector {
    entries: Vec<(usize, String)>,
    selected: usize,
}

impl ViewSelector {
    /// Open over `(registry index, label)` entries with `current` preselected.
    pub fn new(entries: Vec<(usize, String)>, current: usize) -> Self {
        let selected = entries
            .iter()
            .position(|(index, _)| *index == current)
            .unwrap_or(0);
        Self { entries, selected }
    }

    /// Registry index under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.entries.get(self.selected).map(|(index, _)| *index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to pick.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handle one key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> SelectorOutcome {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                SelectorOutcome::Pending
            }
            KeyCode::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
                SelectorOutcome::Pending
            }
            KeyCode::Home => {
                self.selected = 0;
                SelectorOutcome::Pending
            }
            KeyCode::End => {
                self.selected = self.entries.len().saturating_sub(1);
                SelectorOutcome::Pending
            }
            KeyCode::Enter => match self.selected() {
                Some(index) => SelectorOutcome::Chosen(index),
                None => SelectorOutcome::Cancelled,
            },
            KeyCode::Escape => SelectorOutcome::Cancelled,
            _ => SelectorOutcome::Pending,
        }
    }

    /// Area of the overlay inside `screen`.
    #[must_use]
    pub fn area(&self, screen: Rect) -> Rect {
        let widest = self
            .entries
            .iter()
            .map(|(_, label)| display_width(label))
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 4).unwrap_or(u16::MAX);
        let height = u16::try_from(self.entries.len() + 2).unwrap_or(u16::MAX);
        screen.centered(width, height)
    }

    /// Draw the overlay centered in `screen`.
    pub fn render(&self, screen: Rect, buf: &mut Buffer) {
        let area = self.area(screen);
        if area.width < 2 || area.height < 2 {
            return;
        }
        let border = Color::Cyan.tag();
        buf.fill(area, Cell::BLANK);
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;
        for x in area.x..area.right() {
            buf.set(x, area.y, Cell::from_char('-').with_color(border));
            buf.set(x, bottom, Cell::from_char('-').with_color(border));
        }
        for y in area.y..area.bottom() {
            let ch = if y == area.y || y == bottom { '+' } else { '|' };
            buf.set(area.x, y, Cell::from_char(ch).with_color(border));
            buf.set(right, y, Cell::from_char(ch).with_color(border));
        }
        for (i, (_, label)) in self.entries.iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            let y = area.y + 1 + offset;
            if y >= bottom {
                break;
            }
            let flags = if i == self.selected {
                CellFlags::REVERSE
            } else {
                CellFlags::empty()
            };
            if i == self.selected {
                for x in area.x + 1..right {
                    buf.set(x, y, Cell::BLANK.with_flags(flags));
                }
            }
            buf.print_with_flags(area.x + 2, y, label, ColorTag::DEFAULT, flags, right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ViewSelector {
        ViewSelector::new(
            vec![(0, "Dump".into()), (2, "Stack".into()), (3, "Config".into())],
            2,
        )
    }

    #[test]
    fn preselects_current() {
        assert_eq!(selector().selected(), Some(2));
    }

    #[test]
    fn navigation_clamps() {
        let mut s = selector();
        for _ in 0..5 {
            s.handle_key(&KeyEvent::new(KeyCode::Down));
        }
        assert_eq!(s.selected(), Some(3));
        for _ in 0..5 {
            s.handle_key(&KeyEvent::new(KeyCode::Up));
        }
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn enter_and_escape() {
        let mut s = selector();
        assert_eq!(s.handle_key(&KeyEvent::new(KeyCode::Enter)), SelectorOutcome::Chosen(2));
        assert_eq!(s.handle_key(&KeyEvent::new(KeyCode::Escape)), SelectorOutcome::Cancelled);
        assert_eq!(s.handle_key(&KeyEvent::new(KeyCode::Char('x'))), SelectorOutcome::Pending);
    }

    #[test]
    fn renders_centered_box() {
        let s = selector();
        let mut buf = Buffer::new(20, 7);
        s.render(buf.bounds(), &mut buf);
        let area = s.area(buf.bounds());
        assert_eq!((area.width, area.height), (10, 5));
        assert_eq!(buf.row_text(area.y), format!("{}+--------+", " ".repeat(area.x as usize)));
        let stack_row = buf.row_text(area.y + 2);
        assert!(stack_row.contains("| Stack"));
        assert!(
            buf.get(area.x + 1, area.y + 2)
                .unwrap()
                .flags
                .contains(CellFlags::REVERSE)
        );
    }
}
