//! Score update orchestration
//!
//! One call per edit keeps the address, the rendered score, the playback
//! binding and the editor diagnostics in step. The external renderer, synth
//! and editor sit behind the traits below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{CodecError, Location, LocationError, Notifier, ScoreCodec};
use crate::diagnostics::{build_diagnostics, Diagnostic, DiagnosticError};
use crate::models::ApplicationState;
use crate::text::{LineTable, TextCore};

/// Output of one render call
#[derive(Debug, Clone)]
pub struct RenderedScore<T> {
    /// Engine handle for the rendered tune
    pub tune: T,
    /// Raw warning lines; empty when the engine reports none
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Rendering engine failed: {0}")]
    Engine(String),

    #[error("Rendering engine returned no tune")]
    NoTune,
}

/// Renders score text into a target
pub trait RenderEngine {
    type Target: ?Sized;
    type Tune;

    fn render(&mut self, target: &Self::Target, score: &str) -> Result<RenderedScore<Self::Tune>, RenderError>;
}

/// Loads a rendered tune into the synth for synchronized playback
///
/// Loading a new tune supersedes whatever was playing before.
pub trait PlaybackBinder<T> {
    fn bind(&mut self, tune: &T);
}

/// Receives the complete diagnostic set for the current text
pub trait DiagnosticSink {
    fn replace_diagnostics(&mut self, diagnostics: Vec<Diagnostic>);
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Diagnostics(#[from] DiagnosticError),
}

/// Summary of one update
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub version: u64,
    pub url: String,
    pub diagnostics: usize,
    /// Warnings that were not in the positional format
    pub dropped_warnings: usize,
}

pub struct ScoreSession<L, E, P, D> {
    codec: ScoreCodec,
    location: L,
    engine: E,
    playback: P,
    sink: D,
    state: ApplicationState,
}

impl<L, E, P, D> ScoreSession<L, E, P, D>
where
    L: Location,
    E: RenderEngine,
    P: PlaybackBinder<E::Tune>,
    D: DiagnosticSink,
{
    pub fn new(codec: ScoreCodec, location: L, engine: E, playback: P, sink: D) -> Self {
        let state = ApplicationState::new(codec.default_score());
        Self {
            codec,
            location,
            engine,
            playback,
            sink,
            state,
        }
    }

    /// Read the initial score from the address
    pub fn load(&mut self, notifier: &impl Notifier) -> &str {
        self.state = ApplicationState::new(self.codec.decode(&self.location, notifier));
        &self.state.score
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Apply an edit
    ///
    /// Steps run in order and are not rolled back: if rendering fails the
    /// address has already been rewritten. `buffer` must be the text that
    /// `score` came from, or the diagnostics may point past its end.
    pub fn update(
        &mut self,
        score: &str,
        target: &E::Target,
        buffer: &impl TextCore,
    ) -> Result<UpdateReport, UpdateError> {
        let version = self.state.replace_score(score);

        let url = self.codec.encode(&self.location, score)?;
        self.location.replace_url(&url)?;

        let rendered = self.engine.render(target, score)?;
        self.playback.bind(&rendered.tune);

        let diagnostics = build_diagnostics(&rendered.warnings, buffer)?;
        let report = UpdateReport {
            version,
            url,
            diagnostics: diagnostics.len(),
            dropped_warnings: rendered.warnings.len() - diagnostics.len(),
        };
        self.sink.replace_diagnostics(diagnostics);

        log::debug!(
            "Score v{} updated: {} diagnostics, {} unparsed warnings",
            report.version,
            report.diagnostics,
            report.dropped_warnings
        );

        Ok(report)
    }

    /// `update` with the score itself as the editor buffer
    pub fn update_text(&mut self, score: &str, target: &E::Target) -> Result<UpdateReport, UpdateError> {
        let buffer = LineTable::from_str(score);
        self.update(score, target, &buffer)
    }
}
