//! Playback cursor
//!
//! - `event`: timing events from the playback engine
//! - `cursor`: the cursor/highlight state machine

pub mod cursor;
pub mod event;

pub use cursor::{CursorController, CursorSurface, PlaybackState};
pub use event::{CursorLine, TimingEvent};
