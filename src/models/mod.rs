//! Data models for the notation pad

pub mod score;

pub use score::{ApplicationState, DEFAULT_SCORE};
