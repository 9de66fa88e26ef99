//! WASM API
//!
//! Everything here touches the browser (web-sys, abcjs, the editor). The
//! logic it wires together lives in the plain-Rust modules.
//!
//! - `helpers`: logging macros, serde and error conversion
//! - `browser`: address bar, alerts, timers
//! - `cursor`: `CursorControl` for abcjs playback
//! - `abcjs`: renderer, synth and diagnostic bridges, `loadAudioController`
//! - `exports`: free functions and the `ScoreUpdater`/`Debouncer` classes

pub mod helpers;
pub mod browser;
pub mod cursor;
pub mod abcjs;
pub mod exports;

pub use abcjs::load_audio_controller;
pub use browser::{element_by_id, AlertNotifier, BrowserLocation, TimeoutHandle, WindowTimer};
pub use cursor::{timing_event_from_js, CursorControl, DomCursorSurface};
pub use exports::{decode_score, encode_score, make_diagnostics, parse_message, Debouncer, ScoreUpdater};
