#![forbid(unsafe_code)]

//! Screen controller: view registry, global keys and chrome.
//!
//! # Key dispatch
//!
//! 1. While the view list is open, every key goes to it.
//! 2. While the current view captures input (a search query is being
//!    typed), every key goes to the view.
//! 3. Global keys: quit (`q`, F10), next view (Tab, F6), previous view
//!    (BackTab, F5), view list (`v`, F2).
//! 4. Anything else goes to the current view.
//!
//! View rotation wraps around and skips views that report
//! [`View::is_showable`] as false.

use tracing::{debug, info};
use vdump_core::config::KeyConfig;
use vdump_core::event::{Event, KeyCode, KeyEvent};
use vdump_core::geometry::Rect;
use vdump_render::buffer::Buffer;
use vdump_widgets::View;

use crate::chrome::{self, ChromeLayout};
use crate::selector::{SelectorOutcome, ViewSelector};

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    /// Keep running.
    Continue,
    /// Leave the session.
    Quit,
}

/// The set of named views and the chrome around them.
pub struct Screen {
    context: String,
    views: Vec<Box<dyn View>>,
    current: usize,
    selector: Option<ViewSelector>,
    keys: KeyConfig,
    legend: String,
    size: (u16, u16),
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("context", &self.context)
            .field("views", &self.labels())
            .field("current", &self.current)
            .field("selector_open", &self.selector.is_some())
            .field("size", &self.size)
            .finish()
    }
}

impl Screen {
    /// A screen titled with `context` (exception class, variable name, ...).
    pub fn new(context: impl Into<String>) -> Self {
        let keys = KeyConfig::default();
        Self {
            context: context.into(),
            views: Vec::new(),
            current: 0,
            selector: None,
            legend: chrome::key_legend(&keys),
            keys,
            size: (80, 24),
        }
    }

    /// Use custom character bindings for the global keys.
    #[must_use]
    pub fn with_keys(mut self, keys: KeyConfig) -> Self {
        self.legend = chrome::key_legend(&keys);
        self.keys = keys;
        self
    }

    /// Register a view. The first showable view becomes current.
    pub fn add_view(&mut self, view: Box<dyn View>) {
        self.views.push(view);
        let current_showable = self
            .views
            .get(self.current)
            .is_some_and(|view| view.is_showable());
        if !current_showable
            && let Some(index) = self.views.iter().position(|view| view.is_showable())
        {
            self.current = index;
        }
    }

    /// Builder form of [`add_view`](Self::add_view).
    #[must_use]
    pub fn with_view(mut self, view: Box<dyn View>) -> Self {
        self.add_view(view);
        self
    }

    /// Static title context.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Number of registered views.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Labels of all registered views.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.views.iter().map(|view| view.label()).collect()
    }

    /// Registry index of the current view.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Label of the current view, if any.
    #[must_use]
    pub fn current_label(&self) -> Option<&str> {
        self.views.get(self.current).map(|view| view.label())
    }

    /// Whether the view list overlay is open.
    #[must_use]
    pub fn selector_open(&self) -> bool {
        self.selector.is_some()
    }

    /// Current screen size.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    fn rotate(&mut self, forward: bool) {
        let count = self.views.len();
        if count == 0 {
            return;
        }
        for step in 1..=count {
            let index = if forward {
                (self.current + step) % count
            } else {
                (self.current + count - step % count) % count
            };
            if self.views[index].is_showable() {
                if index != self.current {
                    self.switch_to(index);
                    debug!(view = self.views[index].label(), "view switched");
                }
                return;
            }
        }
    }

    /// Make `index` current, letting the previous view reset its transient state.
    fn switch_to(&mut self, index: usize) {
        if index == self.current {
            return;
        }
        if let Some(previous) = self.views.get_mut(self.current) {
            previous.deactivate();
        }
        self.current = index;
    }

    /// Switch to the next showable view, wrapping around.
    pub fn next_view(&mut self) {
        self.rotate(true);
    }

    /// Switch to the previous showable view, wrapping around.
    pub fn previous_view(&mut self) {
        self.rotate(false);
    }

    /// Open the view list overlay.
    pub fn open_selector(&mut self) {
        let entries = self
            .views
            .iter()
            .enumerate()
            .filter(|(_, view)| view.is_showable())
            .map(|(index, view)| (index, view.label().to_string()))
            .collect();
        self.selector = Some(ViewSelector::new(entries, self.current));
        debug!("view list opened");
    }

    /// Apply a new terminal size: chrome is re-laid out on the next render
    /// and every view forgets its cached geometry.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width.max(1), height.max(1));
        for view in &mut self.views {
            view.drop_cache();
        }
        debug!(width = self.size.0, height = self.size.1, "screen resized");
    }

    /// Handle one input event.
    pub fn handle_event(&mut self, event: Event) -> ScreenAction {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize { width, height } => {
                self.resize(width, height);
                ScreenAction::Continue
            }
        }
    }

    /// Handle one key.
    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        if let Some(selector) = &mut self.selector {
            match selector.handle_key(&key) {
                SelectorOutcome::Pending => {}
                SelectorOutcome::Chosen(index) => {
                    self.selector = None;
                    if index < self.views.len() {
                        self.switch_to(index);
                        debug!(view = self.views[index].label(), "view chosen");
                    }
                }
                SelectorOutcome::Cancelled => self.selector = None,
            }
            return ScreenAction::Continue;
        }

        if let Some(view) = self.views.get_mut(self.current)
            && view.captures_input()
        {
            view.handle_key(key);
            return ScreenAction::Continue;
        }

        match key.code {
            KeyCode::F(10) => return self.quit(),
            KeyCode::Char(c) if c == self.keys.quit && !key.ctrl() => return self.quit(),
            KeyCode::Tab | KeyCode::F(6) => {
                self.next_view();
                return ScreenAction::Continue;
            }
            KeyCode::BackTab | KeyCode::F(5) => {
                self.previous_view();
                return ScreenAction::Continue;
            }
            KeyCode::F(2) => {
                self.open_selector();
                return ScreenAction::Continue;
            }
            KeyCode::Char(c) if c == self.keys.view_list && !key.ctrl() => {
                self.open_selector();
                return ScreenAction::Continue;
            }
            _ => {}
        }

        if let Some(view) = self.views.get_mut(self.current) {
            view.handle_key(key);
        }
        ScreenAction::Continue
    }

    fn quit(&self) -> ScreenAction {
        info!("quit requested");
        ScreenAction::Quit
    }

    /// Draw the whole screen into `buf`.
    pub fn render(&mut self, buf: &mut Buffer) {
        let screen = buf.bounds();
        let layout = ChromeLayout::new(screen);
        let label = self
            .views
            .get(self.current)
            .map(|view| view.label().to_string())
            .unwrap_or_default();
        chrome::render_title(buf, layout.title, &self.context, &label);

        let hints = match self.views.get_mut(self.current) {
            Some(view) => {
                if !layout.content.is_empty() {
                    view.render(layout.content, buf);
                }
                view.hints()
            }
            None => String::new(),
        };
        chrome::render_footer(buf, layout.footer, &self.legend, &hints);

        if let Some(selector) = &self.selector {
            selector.render(content_or(screen, layout.content), buf);
        }
    }
}

fn content_or(screen: Rect, content: Rect) -> Rect {
    if content.is_empty() { screen } else { content }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Stub {
        label: String,
        hidden: bool,
        capture: bool,
        keys: Rc<Cell<usize>>,
        drops: Rc<Cell<usize>>,
        deactivations: Rc<Cell<usize>>,
    }

    impl Stub {
        fn named(label: &str) -> Self {
            Self {
                label: label.to_string(),
                ..Self::default()
            }
        }
    }

    impl View for Stub {
        fn label(&self) -> &str {
            &self.label
        }

        fn is_showable(&self) -> bool {
            !self.hidden
        }

        fn render(&mut self, area: Rect, buf: &mut Buffer) {
            buf.print(area.x, area.y, &format!("<{}>", self.label), Default::default(), area.right());
        }

        fn handle_key(&mut self, _key: KeyEvent) -> bool {
            self.keys.set(self.keys.get() + 1);
            true
        }

        fn hints(&self) -> String {
            format!("{} hints", self.label)
        }

        fn captures_input(&self) -> bool {
            self.capture
        }

        fn drop_cache(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }

        fn deactivate(&mut self) {
            self.deactivations.set(self.deactivations.get() + 1);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn three_views() -> Screen {
        let hidden = Stub {
            hidden: true,
            ..Stub::named("Profiler")
        };
        Screen::new("ctx")
            .with_view(Box::new(Stub::named("Dump")))
            .with_view(Box::new(hidden))
            .with_view(Box::new(Stub::named("Stack")))
    }

    #[test]
    fn rotation_wraps_and_skips_hidden() {
        let mut screen = three_views();
        assert_eq!(screen.current_label(), Some("Dump"));
        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(screen.current_label(), Some("Stack"));
        screen.handle_key(key(KeyCode::F(6)));
        assert_eq!(screen.current_label(), Some("Dump"));
        screen.handle_key(key(KeyCode::BackTab));
        assert_eq!(screen.current_label(), Some("Stack"));
        screen.handle_key(key(KeyCode::F(5)));
        assert_eq!(screen.current_label(), Some("Dump"));
    }

    #[test]
    fn first_showable_view_is_current() {
        let hidden = Stub {
            hidden: true,
            ..Stub::named("Empty")
        };
        let screen = Screen::new("")
            .with_view(Box::new(hidden))
            .with_view(Box::new(Stub::named("Real")));
        assert_eq!(screen.current_label(), Some("Real"));
    }

    #[test]
    fn quit_keys() {
        let mut screen = three_views();
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), ScreenAction::Quit);
        assert_eq!(screen.handle_key(key(KeyCode::F(10))), ScreenAction::Quit);
        assert_eq!(screen.handle_key(key(KeyCode::Char('x'))), ScreenAction::Continue);
    }

    #[test]
    fn remapped_quit_key() {
        let keys = KeyConfig {
            quit: 'x',
            ..KeyConfig::default()
        };
        let mut screen = Screen::new("").with_keys(keys).with_view(Box::new(Stub::named("A")));
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), ScreenAction::Continue);
        assert_eq!(screen.handle_key(key(KeyCode::Char('x'))), ScreenAction::Quit);
    }

    #[test]
    fn other_keys_reach_the_view() {
        let stub = Stub::named("Dump");
        let keys = stub.keys.clone();
        let mut screen = Screen::new("").with_view(Box::new(stub));
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Char('n')));
        assert_eq!(keys.get(), 2);
    }

    #[test]
    fn capturing_view_receives_global_keys() {
        let stub = Stub {
            capture: true,
            ..Stub::named("Dump")
        };
        let keys = stub.keys.clone();
        let mut screen = Screen::new("")
            .with_view(Box::new(stub))
            .with_view(Box::new(Stub::named("Other")));
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), ScreenAction::Continue);
        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(keys.get(), 2);
        assert_eq!(screen.current_label(), Some("Dump"));
    }

    #[test]
    fn selector_replaces_dispatch_until_closed() {
        let mut screen = three_views();
        screen.handle_key(key(KeyCode::Char('v')));
        assert!(screen.selector_open());
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), ScreenAction::Continue);
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Enter));
        assert!(!screen.selector_open());
        assert_eq!(screen.current_label(), Some("Stack"));

        screen.handle_key(key(KeyCode::F(2)));
        screen.handle_key(key(KeyCode::Up));
        screen.handle_key(key(KeyCode::Escape));
        assert!(!screen.selector_open());
        assert_eq!(screen.current_label(), Some("Stack"));
    }

    #[test]
    fn switching_away_deactivates_previous_view() {
        let dump = Stub::named("Dump");
        let stack = Stub::named("Stack");
        let (left_dump, left_stack) = (dump.deactivations.clone(), stack.deactivations.clone());
        let mut screen = Screen::new("")
            .with_view(Box::new(dump))
            .with_view(Box::new(stack));
        screen.handle_key(key(KeyCode::Tab));
        assert_eq!((left_dump.get(), left_stack.get()), (1, 0));

        screen.handle_key(key(KeyCode::Char('v')));
        screen.handle_key(key(KeyCode::Up));
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.current_label(), Some("Dump"));
        assert_eq!((left_dump.get(), left_stack.get()), (1, 1));

        // Choosing the current view again is not a switch.
        screen.handle_key(key(KeyCode::Char('v')));
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!((left_dump.get(), left_stack.get()), (1, 1));
    }

    #[test]
    fn resize_drops_every_cache_even_unrendered() {
        let a = Stub::named("A");
        let b = Stub::named("B");
        let (da, db) = (a.drops.clone(), b.drops.clone());
        let mut screen = Screen::new("").with_view(Box::new(a)).with_view(Box::new(b));
        screen.handle_event(Event::Resize {
            width: 0,
            height: 0,
        });
        assert_eq!((da.get(), db.get()), (1, 1));
        assert_eq!(screen.size(), (1, 1));
    }

    #[test]
    fn render_draws_chrome_and_view() {
        let mut screen = three_views();
        let mut buf = Buffer::new(60, 5);
        screen.render(&mut buf);
        assert_eq!(buf.row_text(0), " ctx | Dump");
        assert_eq!(buf.row_text(1), "<Dump>");
        assert_eq!(
            buf.row_text(4),
            " q:Quit Tab:Next S-Tab:Prev v:Views  Dump hints"
        );
    }

    #[test]
    fn empty_screen_renders() {
        let mut screen = Screen::new("nothing");
        let mut buf = Buffer::new(20, 1);
        screen.render(&mut buf);
        screen.next_view();
        assert_eq!(screen.handle_key(key(KeyCode::Down)), ScreenAction::Continue);
        assert_eq!(buf.row_text(0), " nothing |");
    }
}
