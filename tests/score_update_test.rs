// End-to-end update cycle with in-memory address, renderer, synth and editor

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use abc_pad_wasm::codec::{encode_token, Location, LocationError, Notifier, ScoreCodec};
use abc_pad_wasm::diagnostics::{Diagnostic, DiagnosticError};
use abc_pad_wasm::session::{
    DiagnosticSink, PlaybackBinder, RenderEngine, RenderError, RenderedScore, ScoreSession, UpdateError,
};
use abc_pad_wasm::text::LineTable;
use abc_pad_wasm::DEFAULT_SCORE;

type Journal = Rc<RefCell<Vec<String>>>;

struct MemoryLocation {
    base: String,
    params: RefCell<HashMap<String, String>>,
    journal: Journal,
}

impl Location for MemoryLocation {
    fn query_param(&self, name: &str) -> Option<String> {
        self.params.borrow().get(name).cloned()
    }

    fn with_query_param(&self, name: &str, value: &str) -> Result<String, LocationError> {
        Ok(format!("{}?{}={}", self.base, name, value))
    }

    fn replace_url(&self, url: &str) -> Result<(), LocationError> {
        self.journal.borrow_mut().push(format!("replace {}", url));
        let (_, query) = url.split_once('?').ok_or_else(|| LocationError::InvalidAddress(url.to_string()))?;
        let (name, value) = query.split_once('=').ok_or_else(|| LocationError::InvalidAddress(url.to_string()))?;
        self.params.borrow_mut().insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Produces one warning per line containing `?`
struct ScriptedEngine {
    journal: Journal,
    fail: bool,
    extra_warnings: Vec<String>,
}

impl RenderEngine for ScriptedEngine {
    type Target = str;
    type Tune = usize;

    fn render(&mut self, target: &str, score: &str) -> Result<RenderedScore<usize>, RenderError> {
        self.journal.borrow_mut().push(format!("render into {}", target));
        if self.fail {
            return Err(RenderError::Engine("abcjs exploded".to_string()));
        }

        let mut warnings: Vec<String> = score
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                line.find('?')
                    .map(|col| format!("Music Line:{}:{}: Unknown character <b>?</b>", i + 1, col + 1))
            })
            .collect();
        warnings.extend(self.extra_warnings.iter().cloned());

        Ok(RenderedScore {
            tune: score.len(),
            warnings,
        })
    }
}

struct RecordingSynth {
    journal: Journal,
}

impl PlaybackBinder<usize> for RecordingSynth {
    fn bind(&mut self, tune: &usize) {
        self.journal.borrow_mut().push(format!("bind tune {}", tune));
    }
}

struct RecordingEditor {
    journal: Journal,
    shown: Vec<Diagnostic>,
}

impl DiagnosticSink for RecordingEditor {
    fn replace_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.journal.borrow_mut().push(format!("diagnostics {}", diagnostics.len()));
        self.shown = diagnostics;
    }
}

struct SilentNotifier {
    alerts: RefCell<Vec<String>>,
}

impl Notifier for SilentNotifier {
    fn notify(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

type Session = ScoreSession<MemoryLocation, ScriptedEngine, RecordingSynth, RecordingEditor>;

fn session_with(params: &[(&str, &str)], fail: bool, extra_warnings: &[&str]) -> (Session, Journal) {
    let journal: Journal = Rc::default();
    let location = MemoryLocation {
        base: "https://pad.test/".to_string(),
        params: RefCell::new(
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        journal: Rc::clone(&journal),
    };
    let engine = ScriptedEngine {
        journal: Rc::clone(&journal),
        fail,
        extra_warnings: extra_warnings.iter().map(|w| w.to_string()).collect(),
    };
    let synth = RecordingSynth {
        journal: Rc::clone(&journal),
    };
    let editor = RecordingEditor {
        journal: Rc::clone(&journal),
        shown: Vec::new(),
    };

    let session = ScoreSession::new(ScoreCodec::default(), location, engine, synth, editor);
    (session, journal)
}

#[test]
fn test_update_runs_steps_in_order() {
    let (mut session, journal) = session_with(&[], false, &[]);
    let score = "X:1\nK:C\nCD?E|";

    let report = session.update_text(score, "#paper").unwrap();

    let url = format!("https://pad.test/?s={}", encode_token(score));
    assert_eq!(
        *journal.borrow(),
        vec![
            format!("replace {}", url),
            "render into #paper".to_string(),
            format!("bind tune {}", score.len()),
            "diagnostics 1".to_string(),
        ]
    );
    assert_eq!(report.url, url);
    assert_eq!(report.version, 1);
    assert_eq!(report.diagnostics, 1);
    assert_eq!(report.dropped_warnings, 0);
}

#[test]
fn test_diagnostics_replace_previous_set() {
    let (mut session, _) = session_with(&[], false, &[]);

    session.update_text("X:1\nK:C\n?C?|", "#paper").unwrap();
    let first = session.sink().shown.clone();
    assert_eq!(first.len(), 1, "one warning per line with a '?'");
    assert_eq!(first[0].from, 8);
    assert_eq!(first[0].message, "Unknown character ?");

    session.update_text("X:1\nK:C\nC|", "#paper").unwrap();
    assert!(session.sink().shown.is_empty());
    assert_eq!(session.state().version, 2);
}

#[test]
fn test_unparseable_warnings_are_counted_and_dropped() {
    let (mut session, _) = session_with(&[], false, &["No title given"]);

    let report = session.update_text("X:1\nK:C\n?|", "#paper").unwrap();

    assert_eq!(report.diagnostics, 1);
    assert_eq!(report.dropped_warnings, 1);
}

#[test]
fn test_render_failure_propagates_after_url_was_replaced() {
    let (mut session, journal) = session_with(&[], true, &[]);

    let err = session.update_text("X:1\nK:C\nC|", "#paper").unwrap_err();

    assert_eq!(err, UpdateError::Render(RenderError::Engine("abcjs exploded".to_string())));
    let journal = journal.borrow();
    assert_eq!(journal.len(), 2);
    assert!(journal[0].starts_with("replace "));
    assert!(session.location().query_param("s").is_some());
    assert!(session.sink().shown.is_empty());
}

#[test]
fn test_buffer_shorter_than_warnings_is_an_error() {
    let (mut session, journal) = session_with(&[], false, &[]);
    let stale_buffer = LineTable::from_str("X:1");

    let err = session.update("X:1\nK:C\n?|", "#paper", &stale_buffer).unwrap_err();

    assert_eq!(
        err,
        UpdateError::Diagnostics(DiagnosticError::LineOutOfRange { line: 3, line_count: 1 })
    );
    assert!(journal.borrow().iter().any(|entry| entry.starts_with("bind tune")));
}

#[test]
fn test_load_then_update_round_trips_through_address() {
    let score = "X:7\nT:Round trip\nK:Em\n|:E2B2|]";
    let (mut session, _) = session_with(&[], false, &[]);
    session.update_text(score, "#paper").unwrap();

    let token = session.location().query_param("s").unwrap();
    let (mut reloaded, _) = session_with(&[("s", &token)], false, &[]);
    let notifier = SilentNotifier {
        alerts: RefCell::new(Vec::new()),
    };

    assert_eq!(reloaded.load(&notifier), score);
    assert!(notifier.alerts.borrow().is_empty());
}

#[test]
fn test_load_without_param_uses_default() {
    let (mut session, _) = session_with(&[], false, &[]);
    let notifier = SilentNotifier {
        alerts: RefCell::new(Vec::new()),
    };

    assert_eq!(session.load(&notifier), DEFAULT_SCORE);
    assert!(notifier.alerts.borrow().is_empty());
}

#[test]
fn test_load_with_broken_param_alerts_once() {
    let (mut session, _) = session_with(&[("s", "!!!")], false, &[]);
    let notifier = SilentNotifier {
        alerts: RefCell::new(Vec::new()),
    };

    assert_eq!(session.load(&notifier), DEFAULT_SCORE);
    assert_eq!(notifier.alerts.borrow().len(), 1);
}
