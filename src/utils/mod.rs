//! Utility modules

pub mod debounce;

pub use debounce::{Debounce, Timer};
