//! Timing events delivered by the playback engine

use serde::{Deserialize, Serialize};

/// One note/rest boundary during playback
///
/// Mirrors abcjs' `NoteTimingEvent`. Every field may be missing; `E` is the
/// engine's handle for a rendered notation element.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimingEvent<E> {
    /// `"event"` for notes and rests, `"end"` after the last one
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub milliseconds: Option<f64>,
    #[serde(default)]
    pub measure_start: bool,
    #[serde(default)]
    pub measure_number: Option<u32>,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub start_char: Option<usize>,
    #[serde(default)]
    pub end_char: Option<usize>,
    /// Element groups sounding at this point (one group per voice/chord)
    #[serde(default = "Vec::new")]
    pub elements: Vec<Vec<E>>,
}

impl<E> TimingEvent<E> {
    /// Event with only geometry and elements set
    pub fn at(left: f64, top: f64, height: f64, elements: Vec<Vec<E>>) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            height: Some(height),
            elements,
            ..Self::empty()
        }
    }

    pub fn empty() -> Self {
        Self {
            kind: None,
            milliseconds: None,
            measure_start: false,
            measure_number: None,
            left: None,
            top: None,
            height: None,
            start_char: None,
            end_char: None,
            elements: Vec::new(),
        }
    }

    /// Second half of a note tied across a bar line
    ///
    /// The engine reports it as a measure start with no position.
    pub fn is_tie_continuation(&self) -> bool {
        self.measure_start && self.left.is_none()
    }

    /// Vertical cursor line for this event, if the geometry is complete
    pub fn cursor_line(&self, offset: f64) -> Option<CursorLine> {
        let (left, top, height) = (self.left?, self.top?, self.height?);
        let x = left - offset;
        Some(CursorLine {
            x1: x,
            y1: top,
            x2: x,
            y2: top + height,
        })
    }
}

/// Endpoints of the cursor line in SVG user units
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct CursorLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CursorLine {
    /// Collapsed at the origin, which hides the line
    pub const ZERO: CursorLine = CursorLine {
        x1: 0.0,
        y1: 0.0,
        x2: 0.0,
        y2: 0.0,
    };
}
