use report_core::state::StateError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no global window")]
    MissingWindow,
    #[error("window has no document")]
    MissingDocument,
    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus { url: String, status: u16 },
    #[error("{context}: {message}")]
    Js { context: &'static str, message: String },
    #[error("could not convert chart options: {0}")]
    Serialize(String),
    #[error(transparent)]
    State(#[from] StateError),
}

impl From<serde_wasm_bindgen::Error> for PageError {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        Self::Serialize(error.to_string())
    }
}

impl PageError {
    /// Wraps a rejected promise or thrown JS value.
    pub fn js(context: &'static str, value: &JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(value)
                    .ok()
                    .and_then(|text| text.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js { context, message }
    }
}
