//! Text layer
//!
//! Read-only view of the editor document used to turn (line, column)
//! positions into absolute offsets.

pub mod buffer;

pub use buffer::{LineSpan, LineTable, TextCore};
