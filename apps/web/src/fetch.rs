use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::console;
use crate::dom;
use crate::error::PageError;

/// GETs `url` and resolves to the parsed JSON body, untouched.
///
/// Failures are logged here and returned to the caller.
pub async fn fetch_json(url: &str) -> Result<JsValue, PageError> {
    let result = fetch_body(url).await;
    if let Err(error) = &result {
        console::error(&format!("Error fetching {url}: {error}"));
    }
    result
}

async fn fetch_body(url: &str) -> Result<JsValue, PageError> {
    let window = dom::window()?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|error| PageError::js("invalid request", &error))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|error| PageError::js("network error", &error))?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|error| PageError::js("unexpected fetch result", &error))?;

    if !response.ok() {
        return Err(PageError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = response
        .json()
        .map_err(|error| PageError::js("unreadable body", &error))?;

    JsFuture::from(body)
        .await
        .map_err(|error| PageError::js("malformed JSON", &error))
}
