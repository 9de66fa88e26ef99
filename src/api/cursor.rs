//! DOM binding of the playback cursor
//!
//! `CursorControl` is handed to abcjs' `SynthController.load` as the cursor
//! control object; abcjs calls `onStart`, `onEvent` and `onFinished` on it.

use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use super::browser::document;
use super::helpers::{js_error_message, resolve_config};
use crate::config::EditorConfig;
use crate::playback::{CursorController, CursorLine, CursorSurface, PlaybackState, TimingEvent};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Draws the cursor as an SVG `<line>` inside the rendered score
pub struct DomCursorSurface {
    document: Document,
    root_selector: String,
    cursor_class: String,
    highlight_class: String,
}

impl DomCursorSurface {
    pub fn new(
        document: Document,
        root_selector: impl Into<String>,
        cursor_class: impl Into<String>,
        highlight_class: impl Into<String>,
    ) -> Self {
        Self {
            document,
            root_selector: root_selector.into(),
            cursor_class: cursor_class.into(),
            highlight_class: highlight_class.into(),
        }
    }

    fn build_cursor(&self) -> Result<Option<Element>, JsValue> {
        let Some(svg) = self
            .document
            .query_selector(&format!("{} svg", self.root_selector))?
        else {
            return Ok(None);
        };

        let line = self.document.create_element_ns(Some(SVG_NS), "line")?;
        line.set_attribute("class", &self.cursor_class)?;
        svg.append_child(&line)?;
        Ok(Some(line))
    }
}

impl CursorSurface for DomCursorSurface {
    type Cursor = Element;
    type Element = Element;

    fn create_cursor(&mut self) -> Option<Element> {
        self.build_cursor()
            .map_err(|e| crate::wasm_warn!("Cursor not created: {}", js_error_message(&e)))
            .ok()
            .flatten()
    }

    fn move_cursor(&mut self, cursor: &Element, line: CursorLine) {
        for (name, value) in [("x1", line.x1), ("y1", line.y1), ("x2", line.x2), ("y2", line.y2)] {
            if let Err(e) = cursor.set_attribute_ns(None, name, &value.to_string()) {
                crate::wasm_warn!("Cursor attribute {} not set: {}", name, js_error_message(&e));
            }
        }
    }

    fn set_highlighted(&mut self, element: &Element, highlighted: bool) {
        let classes = element.class_list();
        let result = if highlighted {
            classes.add_1(&self.highlight_class)
        } else {
            classes.remove_1(&self.highlight_class)
        };
        if let Err(e) = result {
            crate::wasm_warn!("Highlight not toggled: {}", js_error_message(&e));
        }
    }
}

/// Read an abcjs `NoteTimingEvent`
///
/// Missing or mistyped fields become `None`; element groups keep only DOM
/// elements.
pub fn timing_event_from_js(value: &JsValue) -> TimingEvent<Element> {
    let get = |key: &str| Reflect::get(value, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED);
    let number = |key: &str| get(key).as_f64();

    let groups = get("elements");
    let elements: Vec<Vec<Element>> = if Array::is_array(&groups) {
        Array::from(&groups)
            .iter()
            .filter(Array::is_array)
            .map(|group| {
                Array::from(&group)
                    .iter()
                    .filter_map(|el| el.dyn_into::<Element>().ok())
                    .collect()
            })
            .collect()
    } else {
        Vec::new()
    };

    TimingEvent {
        kind: get("type").as_string(),
        milliseconds: number("milliseconds"),
        measure_start: get("measureStart").is_truthy(),
        measure_number: number("measureNumber").map(|n| n as u32),
        left: number("left"),
        top: number("top"),
        height: number("height"),
        start_char: number("startChar").map(|n| n as usize),
        end_char: number("endChar").map(|n| n as usize),
        elements,
    }
}

#[wasm_bindgen]
pub struct CursorControl {
    controller: CursorController<DomCursorSurface>,
}

impl CursorControl {
    pub fn with_config(root_selector: Option<&str>, config: &EditorConfig) -> Result<CursorControl, JsValue> {
        let surface = DomCursorSurface::new(
            document()?,
            config.cursor_root(root_selector),
            config.cursor_class.as_str(),
            config.highlight_class.as_str(),
        );

        Ok(CursorControl {
            controller: CursorController::new(surface, config.cursor_offset),
        })
    }
}

#[wasm_bindgen]
impl CursorControl {
    /// Cursor control for the score rendered under `root_selector`, or
    /// under the configured `cursorRootSelector` when none is given
    #[wasm_bindgen(constructor)]
    pub fn new(root_selector: Option<String>, config: JsValue) -> Result<CursorControl, JsValue> {
        Self::with_config(root_selector.as_deref(), &resolve_config(config)?)
    }

    #[wasm_bindgen(js_name = onStart)]
    pub fn on_start(&mut self) {
        self.controller.on_start();
    }

    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, event: JsValue) {
        self.controller.on_event(&timing_event_from_js(&event));
    }

    #[wasm_bindgen(js_name = onFinished)]
    pub fn on_finished(&mut self) {
        self.controller.on_finished();
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.controller.state() == PlaybackState::Playing
    }
}
