//! Diagnostics for the editor
//!
//! Turns renderer warnings into ranges the editor can underline. Each
//! warning marks a single character at the reported line and column.

pub mod warning;

pub use warning::{markup_to_text, parse_warning, ParsedWarning};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::TextCore;

/// Severity level for diagnostics
///
/// Renderer warnings are always surfaced as errors.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    #[default]
    Error,
}

/// A diagnostic range in editor offsets
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Absolute start offset (inclusive)
    pub from: usize,
    /// Absolute end offset (exclusive), always `from + 1`
    pub to: usize,
    pub severity: DiagnosticSeverity,
    /// Plain-text message
    pub message: String,
    /// Original markup, rendered as HTML in the tooltip
    pub markup: String,
}

impl Diagnostic {
    /// Place a parsed warning in `buffer`
    pub fn from_warning(warning: ParsedWarning, buffer: &impl TextCore) -> Result<Self, DiagnosticError> {
        let line = buffer
            .line(warning.line_number)
            .ok_or(DiagnosticError::LineOutOfRange {
                line: warning.line_number,
                line_count: buffer.line_count(),
            })?;

        // Column 0 would land on the previous line break. Columns past the
        // end of the line are not clamped.
        let from = line.from + warning.column.saturating_sub(1);

        Ok(Self {
            from,
            to: from + 1,
            severity: DiagnosticSeverity::Error,
            message: warning.message,
            markup: warning.markup,
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiagnosticError {
    /// The warning refers to a line the buffer does not have, usually
    /// because it came from a render of different text
    #[error("Warning refers to line {line} but the document has {line_count} lines")]
    LineOutOfRange { line: usize, line_count: usize },
}

/// Build the diagnostic set for one render
///
/// Unparseable warnings are dropped. Order follows `warnings`. A warning on a
/// line past the end of `buffer` fails the whole call.
pub fn build_diagnostics<W: AsRef<str>>(
    warnings: &[W],
    buffer: &impl TextCore,
) -> Result<Vec<Diagnostic>, DiagnosticError> {
    warnings
        .iter()
        .filter_map(|raw| parse_warning(raw.as_ref()))
        .map(|warning| Diagnostic::from_warning(warning, buffer))
        .collect()
}
