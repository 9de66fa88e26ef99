//! Application state carried between edits
//!
//! The score text is the only persisted state. It travels in the page
//! address as a token (see `codec`), but the state itself is a plain value.

use serde::{Deserialize, Serialize};

/// Score shown when the address carries no usable score
pub const DEFAULT_SCORE: &str = "X: 3
T:Happy Birthday to You
M:3/4
L:1/8
K:G
D>D | E2 D2 G2 | F4 D>D | E2 D2 A2 | G4 D>D | d2 B2 G2 | (F2 E2) c>c |
B2 G2 A2 | G6 |]
";

/// Current score text plus an edit counter
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ApplicationState {
    /// ABC source as typed in the editor
    pub score: String,

    /// Bumped on every accepted edit; not part of the serialized token
    pub version: u64,
}

impl ApplicationState {
    pub fn new(score: impl Into<String>) -> Self {
        Self {
            score: score.into(),
            version: 0,
        }
    }

    /// Replace the score text, returning the new version
    pub fn replace_score(&mut self, score: impl Into<String>) -> u64 {
        self.score = score.into();
        self.version += 1;
        self.version
    }
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE)
    }
}
