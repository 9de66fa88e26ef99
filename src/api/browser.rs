//! Browser bindings for the address bar, alerts and timers

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Url, Window};

use super::helpers::js_error_message;
use crate::codec::{Location, LocationError, Notifier};
use crate::utils::Timer;

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("document not available"))
}

/// Element by id, or an error naming the id
#[wasm_bindgen(js_name = elementById)]
pub fn element_by_id(id: &str) -> Result<Element, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("{} not found.", id)))
}

/// `window.location` plus `history.replaceState`
pub struct BrowserLocation {
    window: Window,
}

impl BrowserLocation {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self { window: window()? })
    }

    fn current_url(&self) -> Result<Url, LocationError> {
        let href = self
            .window
            .location()
            .href()
            .map_err(|e| LocationError::InvalidAddress(js_error_message(&e)))?;

        Url::new(&href).map_err(|e| LocationError::InvalidAddress(js_error_message(&e)))
    }
}

impl Location for BrowserLocation {
    fn query_param(&self, name: &str) -> Option<String> {
        self.current_url().ok()?.search_params().get(name)
    }

    fn with_query_param(&self, name: &str, value: &str) -> Result<String, LocationError> {
        let url = self.current_url()?;
        url.search_params().set(name, value);
        Ok(url.href())
    }

    fn replace_url(&self, url: &str) -> Result<(), LocationError> {
        self.window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(url)))
            .map_err(|e| LocationError::ReplaceFailed(js_error_message(&e)))
    }
}

/// Blocking `window.alert`
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        let shown = window().and_then(|w| w.alert_with_message(message));
        if let Err(e) = shown {
            crate::wasm_warn!("Could not show alert '{}': {}", message, js_error_message(&e));
        }
    }
}

/// `setTimeout`/`clearTimeout`
pub struct WindowTimer {
    window: Window,
}

impl WindowTimer {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self { window: window()? })
    }
}

/// A scheduled timeout that owns its callback
///
/// Dropping the handle clears the timeout and frees the closure, so a
/// superseded task does not outlive its cancellation.
pub struct TimeoutHandle {
    id: i32,
    window: Window,
    _callback: Closure<dyn FnMut()>,
}

impl TimeoutHandle {
    pub fn id(&self) -> i32 {
        self.id
    }
}

impl Drop for TimeoutHandle {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.id);
    }
}

impl Timer for WindowTimer {
    type Handle = TimeoutHandle;

    fn schedule(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Option<TimeoutHandle> {
        let callback = Closure::once(move || task());
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);

        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), timeout)
            .map_err(|e| crate::wasm_error!("setTimeout failed: {}", js_error_message(&e)))
            .ok()?;

        Some(TimeoutHandle {
            id,
            window: self.window.clone(),
            _callback: callback,
        })
    }

    fn cancel(&mut self, handle: TimeoutHandle) {
        drop(handle);
    }
}
