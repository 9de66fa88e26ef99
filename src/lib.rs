//! ABC Notation Pad WASM Module
//!
//! Glue between a text editor and the abcjs renderer: the score lives in the
//! page address, renderer warnings become editor diagnostics, and playback
//! drives a cursor over the rendered score.

pub mod config;
pub mod models;
pub mod codec;
pub mod text;
pub mod diagnostics;
pub mod playback;
pub mod session;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use config::EditorConfig;
pub use models::{ApplicationState, DEFAULT_SCORE};
pub use codec::ScoreCodec;
pub use diagnostics::{build_diagnostics, parse_warning, Diagnostic, DiagnosticSeverity, ParsedWarning};
pub use playback::{CursorController, CursorSurface, TimingEvent};
pub use session::ScoreSession;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("ABC notation pad WASM module initialized");
}
