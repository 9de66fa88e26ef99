//! Playback cursor and "currently sounding" highlight
//!
//! The playback engine calls `on_start`, `on_event` for every note/rest and
//! `on_finished`. All visible effects go through a `CursorSurface`, so the
//! state machine runs the same against the DOM and against a test double.

use serde::{Deserialize, Serialize};

use super::event::{CursorLine, TimingEvent};

/// Visual effects the controller needs
pub trait CursorSurface {
    /// Handle to the cursor line
    type Cursor;
    /// Handle to one rendered notation element
    type Element: Clone;

    /// Create and attach a new cursor; `None` if there is nowhere to put it
    fn create_cursor(&mut self) -> Option<Self::Cursor>;

    fn move_cursor(&mut self, cursor: &Self::Cursor, line: CursorLine);

    fn set_highlighted(&mut self, element: &Self::Element, highlighted: bool);
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

pub struct CursorController<S: CursorSurface> {
    surface: S,
    cursor: Option<S::Cursor>,
    highlighted: Vec<S::Element>,
    state: PlaybackState,
    cursor_offset: f64,
}

impl<S: CursorSurface> CursorController<S> {
    pub fn new(surface: S, cursor_offset: f64) -> Self {
        Self {
            surface,
            cursor: None,
            highlighted: Vec::new(),
            state: PlaybackState::Idle,
            cursor_offset,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> Option<&S::Cursor> {
        self.cursor.as_ref()
    }

    pub fn highlighted(&self) -> &[S::Element] {
        &self.highlighted
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Playback began: attach a fresh cursor at the origin
    pub fn on_start(&mut self) {
        self.state = PlaybackState::Playing;
        self.cursor = self.surface.create_cursor();

        match &self.cursor {
            Some(cursor) => self.surface.move_cursor(cursor, CursorLine::ZERO),
            None => log::debug!("No cursor root found, playing without cursor"),
        }
    }

    /// A note or rest was reached
    pub fn on_event(&mut self, event: &TimingEvent<S::Element>) {
        if event.is_tie_continuation() {
            return;
        }

        self.clear_highlight();

        for element in event.elements.iter().flatten() {
            self.surface.set_highlighted(element, true);
            self.highlighted.push(element.clone());
        }

        if let (Some(cursor), Some(line)) = (&self.cursor, event.cursor_line(self.cursor_offset)) {
            self.surface.move_cursor(cursor, line);
        }
    }

    /// Playback ended: drop the highlight and park the cursor
    pub fn on_finished(&mut self) {
        self.state = PlaybackState::Idle;
        self.clear_highlight();

        if let Some(cursor) = &self.cursor {
            self.surface.move_cursor(cursor, CursorLine::ZERO);
        }
    }

    fn clear_highlight(&mut self) {
        for element in self.highlighted.drain(..) {
            self.surface.set_highlighted(&element, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct RecordingSurface {
        has_root: bool,
        cursors: Vec<CursorLine>,
        lit: BTreeSet<&'static str>,
    }

    impl CursorSurface for RecordingSurface {
        type Cursor = usize;
        type Element = &'static str;

        fn create_cursor(&mut self) -> Option<usize> {
            self.has_root.then(|| {
                self.cursors.push(CursorLine::ZERO);
                self.cursors.len() - 1
            })
        }

        fn move_cursor(&mut self, cursor: &usize, line: CursorLine) {
            self.cursors[*cursor] = line;
        }

        fn set_highlighted(&mut self, element: &&'static str, highlighted: bool) {
            if highlighted {
                self.lit.insert(*element);
            } else {
                self.lit.remove(element);
            }
        }
    }

    fn controller() -> CursorController<RecordingSurface> {
        CursorController::new(
            RecordingSurface {
                has_root: true,
                ..Default::default()
            },
            2.0,
        )
    }

    #[test]
    fn test_event_moves_cursor_and_highlights_chord() {
        let mut ctl = controller();
        ctl.on_start();
        assert_eq!(ctl.state(), PlaybackState::Playing);

        ctl.on_event(&TimingEvent::at(10.0, 20.0, 30.0, vec![vec!["A", "B"]]));

        let surface = ctl.surface();
        assert_eq!(surface.cursors[0], CursorLine { x1: 8.0, y1: 20.0, x2: 8.0, y2: 50.0 });
        assert_eq!(surface.lit.iter().copied().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_next_event_replaces_highlight() {
        let mut ctl = controller();
        ctl.on_start();
        ctl.on_event(&TimingEvent::at(10.0, 20.0, 30.0, vec![vec!["A"], vec!["B"]]));
        ctl.on_event(&TimingEvent::at(40.0, 20.0, 30.0, vec![vec!["C"]]));

        assert_eq!(ctl.surface().lit.iter().copied().collect::<Vec<_>>(), vec!["C"]);
        assert_eq!(ctl.highlighted(), &["C"]);
    }

    #[test]
    fn test_event_without_geometry_keeps_cursor() {
        let mut ctl = controller();
        ctl.on_start();
        ctl.on_event(&TimingEvent::at(10.0, 20.0, 30.0, vec![vec!["A"]]));

        let mut rest = TimingEvent::empty();
        rest.elements = vec![vec!["R"]];
        ctl.on_event(&rest);

        assert_eq!(ctl.surface().cursors[0].x1, 8.0);
        assert!(ctl.surface().lit.contains("R"));
        assert!(!ctl.surface().lit.contains("A"));
    }

    #[test]
    fn test_missing_root_degrades_to_highlight_only() {
        let mut ctl = CursorController::new(RecordingSurface::default(), 2.0);
        ctl.on_start();
        ctl.on_event(&TimingEvent::at(10.0, 20.0, 30.0, vec![vec!["A"]]));

        assert!(ctl.cursor().is_none());
        assert!(ctl.surface().cursors.is_empty());
        assert!(ctl.surface().lit.contains("A"));
    }

    #[test]
    fn test_restart_creates_fresh_cursor() {
        let mut ctl = controller();
        ctl.on_start();
        ctl.on_finished();
        ctl.on_start();

        assert_eq!(ctl.cursor(), Some(&1));
        assert_eq!(ctl.state(), PlaybackState::Playing);
    }
}
