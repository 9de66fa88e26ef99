//! JavaScript-facing entry points

use js_sys::Function;
use wasm_bindgen::prelude::*;

use super::abcjs::{diagnostics_to_js, JsDiagnosticSink, JsRenderEngine, JsSynthControl};
use super::browser::{AlertNotifier, BrowserLocation, WindowTimer};
use super::helpers::{deserialize, resolve_config, serialize, to_js_error};
use crate::codec::ScoreCodec;
use crate::diagnostics::{build_diagnostics, parse_warning};
use crate::session::ScoreSession;
use crate::text::LineTable;
use crate::utils::Debounce;

/// Score from the page address, or the default score
///
/// Shows an alert if the address holds a broken score.
#[wasm_bindgen(js_name = decodeScore)]
pub fn decode_score(config: JsValue) -> Result<String, JsValue> {
    let codec = ScoreCodec::from_config(&resolve_config(config)?);
    Ok(codec.decode(&BrowserLocation::new()?, &AlertNotifier))
}

/// Current address with the score encoded into it
#[wasm_bindgen(js_name = encodeScore)]
pub fn encode_score(score: &str, config: JsValue) -> Result<String, JsValue> {
    let codec = ScoreCodec::from_config(&resolve_config(config)?);
    codec.encode(&BrowserLocation::new()?, score).map_err(to_js_error)
}

/// Parse one renderer warning; `null` if it is not positional
#[wasm_bindgen(js_name = parseMessage)]
pub fn parse_message(raw: &str) -> Result<JsValue, JsValue> {
    match parse_warning(raw) {
        Some(parsed) => serialize(&parsed, "Warning serialization error"),
        None => Ok(JsValue::NULL),
    }
}

/// Diagnostics for `warnings` against the document text `doc`
#[wasm_bindgen(js_name = makeDiagnostics)]
pub fn make_diagnostics(warnings: JsValue, doc: &str) -> Result<JsValue, JsValue> {
    let warnings: Vec<String> = if warnings.is_undefined() || warnings.is_null() {
        Vec::new()
    } else {
        deserialize(warnings, "Warnings must be an array of strings")?
    };

    let diagnostics = build_diagnostics(&warnings, &LineTable::from_str(doc)).map_err(to_js_error)?;
    diagnostics_to_js(&diagnostics)
}

/// Keeps address, score, playback and diagnostics in step with the editor
#[wasm_bindgen]
pub struct ScoreUpdater {
    session: ScoreSession<BrowserLocation, JsRenderEngine, JsSynthControl, JsDiagnosticSink>,
}

#[wasm_bindgen]
impl ScoreUpdater {
    /// - `render_abc`: `abcjs.renderAbc`
    /// - `synth_control`: a loaded `SynthController`, or `null`
    /// - `set_diagnostics`: receives the diagnostic array after each update
    #[wasm_bindgen(constructor)]
    pub fn new(
        render_abc: Function,
        synth_control: JsValue,
        set_diagnostics: Function,
        config: JsValue,
    ) -> Result<ScoreUpdater, JsValue> {
        let config = resolve_config(config)?;
        let render_options = serialize(&config.render_options, "Render options serialization error")?;

        let session = ScoreSession::new(
            ScoreCodec::from_config(&config),
            BrowserLocation::new()?,
            JsRenderEngine::new(render_abc, render_options),
            JsSynthControl::new(synth_control, config.audio_selector.clone()),
            JsDiagnosticSink::new(set_diagnostics),
        );

        crate::wasm_info!("ScoreUpdater created (param '{}')", config.score_param);
        Ok(ScoreUpdater { session })
    }

    /// Score to seed the editor with
    #[wasm_bindgen(js_name = initialScore)]
    pub fn initial_score(&mut self) -> String {
        self.session.load(&AlertNotifier).to_string()
    }

    /// Re-render `score` into `target` and refresh everything derived from it
    pub fn update(&mut self, score: &str, target: JsValue) -> Result<JsValue, JsValue> {
        let report = self.session.update_text(score, &target).map_err(to_js_error)?;
        serialize(&report, "Update report serialization error")
    }
}

/// Calls `task` once input has been quiet for `delay_ms`
#[wasm_bindgen]
pub struct Debouncer {
    debounce: Debounce<WindowTimer>,
    task: Function,
}

#[wasm_bindgen]
impl Debouncer {
    /// `delay_ms` defaults to the configured `debounceMs`
    #[wasm_bindgen(constructor)]
    pub fn new(task: Function, delay_ms: Option<u32>, config: JsValue) -> Result<Debouncer, JsValue> {
        let delay_ms = resolve_config(config)?.debounce_delay(delay_ms);
        crate::wasm_log!("Debouncer created ({} ms)", delay_ms);

        Ok(Debouncer {
            debounce: Debounce::new(WindowTimer::new()?, delay_ms),
            task,
        })
    }

    #[wasm_bindgen(getter, js_name = delayMs)]
    pub fn delay_ms(&self) -> u32 {
        self.debounce.delay_ms()
    }

    /// Restart the quiet period; `arg` is passed to the task when it runs
    pub fn trigger(&mut self, arg: JsValue) {
        let task = self.task.clone();
        self.debounce.trigger(move || {
            if let Err(e) = task.call1(&JsValue::NULL, &arg) {
                crate::wasm_error!("Debounced task failed: {}", super::helpers::js_error_message(&e));
            }
        });
    }
}
