//! Bridges to the JavaScript collaborators
//!
//! - `JsRenderEngine` wraps `abcjs.renderAbc`
//! - `JsSynthControl` wraps an abcjs `SynthController` (or nothing, when the
//!   browser has no audio support)
//! - `JsDiagnosticSink` hands diagnostics to an editor callback, typically
//!   `diags => view.dispatch(setDiagnostics(view.state, diags))`
//! - `loadAudioController` builds that `SynthController` from the abcjs module

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::browser::document;
use super::cursor::CursorControl;
use super::helpers::{js_error_message, resolve_config, serialize};
use crate::diagnostics::Diagnostic;
use crate::session::{DiagnosticSink, PlaybackBinder, RenderEngine, RenderError, RenderedScore};

pub struct JsRenderEngine {
    render_abc: Function,
    options: JsValue,
}

impl JsRenderEngine {
    pub fn new(render_abc: Function, options: JsValue) -> Self {
        Self { render_abc, options }
    }
}

impl RenderEngine for JsRenderEngine {
    type Target = JsValue;
    type Tune = JsValue;

    fn render(&mut self, target: &JsValue, score: &str) -> Result<RenderedScore<JsValue>, RenderError> {
        let tunes = self
            .render_abc
            .call3(&JsValue::NULL, target, &JsValue::from_str(score), &self.options)
            .map_err(|e| RenderError::Engine(js_error_message(&e)))?;

        let tune = Reflect::get(&tunes, &JsValue::from(0))
            .ok()
            .filter(|tune| !tune.is_undefined() && !tune.is_null())
            .ok_or(RenderError::NoTune)?;

        let warnings = Reflect::get(&tune, &JsValue::from_str("warnings"))
            .ok()
            .filter(Array::is_array)
            .map(|list| Array::from(&list).iter().filter_map(|w| w.as_string()).collect())
            .unwrap_or_default();

        Ok(RenderedScore { tune, warnings })
    }
}

pub struct JsSynthControl {
    control: Option<JsValue>,
    // Shared by every `setTune` promise this control hands out
    on_loaded: Closure<dyn FnMut(JsValue)>,
    on_failed: Closure<dyn FnMut(JsValue)>,
}

impl JsSynthControl {
    /// `control` may be `null`/`undefined` when audio is unsupported
    pub fn new(control: JsValue, audio_selector: impl Into<String>) -> Self {
        let control = (!control.is_null() && !control.is_undefined()).then_some(control);

        let selector = audio_selector.into();
        let on_loaded = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
            let widget = document().ok().and_then(|d| d.query_selector(&selector).ok().flatten());
            if let Some(widget) = widget {
                let _ = widget.class_list().remove_1("disabled");
            }
        });
        let on_failed = Closure::<dyn FnMut(JsValue)>::new(|e: JsValue| {
            crate::wasm_warn!("Audio not loaded: {}", js_error_message(&e));
        });

        Self {
            control,
            on_loaded,
            on_failed,
        }
    }

    fn set_tune(&self, control: &JsValue, tune: &JsValue) -> Result<JsValue, JsValue> {
        let set_tune: Function = Reflect::get(control, &JsValue::from_str("setTune"))?.dyn_into()?;
        set_tune.call2(control, tune, &JsValue::TRUE)
    }
}

impl PlaybackBinder<JsValue> for JsSynthControl {
    fn bind(&mut self, tune: &JsValue) {
        let Some(control) = &self.control else {
            return;
        };

        let pending = match self.set_tune(control, tune) {
            Ok(result) => result,
            Err(e) => {
                crate::wasm_error!("setTune failed: {}", js_error_message(&e));
                return;
            }
        };

        if let Ok(promise) = pending.dyn_into::<Promise>() {
            let _ = promise.then2(&self.on_loaded, &self.on_failed);
        }
    }
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{} is not a function", name)))
}

/// Playback widget for the score, or `null` when the browser cannot play
/// audio
///
/// - `abcjs`: the abcjs module
/// - `audio_element`: selector of the element that hosts the widget
/// - `visual_element`: selector of the rendered score; defaults to the
///   configured `cursorRootSelector`
///
/// The widget starts disabled and is enabled once a tune has loaded.
#[wasm_bindgen(js_name = loadAudioController)]
pub fn load_audio_controller(
    abcjs: JsValue,
    audio_element: &str,
    visual_element: Option<String>,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let config = resolve_config(config)?;
    let synth = Reflect::get(&abcjs, &JsValue::from_str("synth"))?;

    if !method(&synth, "supportsAudio")?.call0(&synth)?.is_truthy() {
        crate::wasm_log!("Audio not supported, playback disabled");
        return Ok(JsValue::NULL);
    }

    let constructor = method(&synth, "SynthController")?;
    let control = Reflect::construct(&constructor, &Array::new())?;

    let cursor = CursorControl::with_config(visual_element.as_deref(), &config)?;
    let options = serialize(&config.control_options, "Control options serialization error")?;
    method(&control, "load")?.call3(&control, &JsValue::from_str(audio_element), &JsValue::from(cursor), &options)?;
    method(&control, "disable")?.call1(&control, &JsValue::TRUE)?;

    crate::wasm_log!("Audio controller loaded into '{}'", audio_element);
    Ok(control)
}

pub struct JsDiagnosticSink {
    set_diagnostics: Function,
}

impl JsDiagnosticSink {
    pub fn new(set_diagnostics: Function) -> Self {
        Self { set_diagnostics }
    }
}

impl DiagnosticSink for JsDiagnosticSink {
    fn replace_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        let converted = diagnostics_to_js(&diagnostics)
            .and_then(|list| self.set_diagnostics.call1(&JsValue::NULL, &list));

        if let Err(e) = converted {
            crate::wasm_error!("Diagnostics not delivered: {}", js_error_message(&e));
        }
    }
}

/// Diagnostics in the editor's shape, each with a `renderMessage()` that
/// builds a `<div>` from the original markup
pub fn diagnostics_to_js(diagnostics: &[Diagnostic]) -> Result<JsValue, JsValue> {
    let list = Array::new();

    for diagnostic in diagnostics {
        let object: Object = serialize(diagnostic, "Diagnostic serialization error")?.dyn_into()?;

        let markup = diagnostic.markup.clone();
        let render = Closure::<dyn Fn() -> JsValue>::new(move || render_markup(&markup));
        Reflect::set(&object, &JsValue::from_str("renderMessage"), &render.into_js_value())?;

        list.push(&object);
    }

    Ok(list.into())
}

fn render_markup(markup: &str) -> JsValue {
    match document().and_then(|d| d.create_element("div")) {
        Ok(node) => {
            node.set_inner_html(markup);
            node.into()
        }
        Err(e) => {
            crate::wasm_warn!("Cannot render message: {}", js_error_message(&e));
            JsValue::NULL
        }
    }
}
