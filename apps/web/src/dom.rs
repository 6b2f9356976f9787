use report_core::viewport::{nav_scroll_target, BoundingRect, ScrollMetrics, SectionOffset};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::error::PageError;

pub const ACTIVE_CLASS: &str = "active";
pub const OPEN_CLASS: &str = "open";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const VISIBLE_CLASS: &str = "visible";

pub fn window() -> Result<Window, PageError> {
    web_sys::window().ok_or(PageError::MissingWindow)
}

pub fn document() -> Result<Document, PageError> {
    window()?.document().ok_or(PageError::MissingDocument)
}

/// Every element matching `selector`, in document order. An invalid selector
/// yields an empty list.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, enabled: bool) {
    let classes = element.class_list();
    let result = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(error) = result {
        crate::console::warn(&PageError::js("classList update failed", &error).to_string());
    }
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

pub fn viewport_size(window: &Window) -> (f64, f64) {
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
    };
    (dimension(window.inner_width()), dimension(window.inner_height()))
}

pub fn scroll_metrics(window: &Window, document: &Document) -> ScrollMetrics {
    let (_, viewport_height) = viewport_size(window);
    let document_height = document
        .document_element()
        .map_or(0.0, |root| f64::from(root.scroll_height()));
    ScrollMetrics {
        scroll_top: scroll_y(window),
        document_height,
        viewport_height,
    }
}

pub fn bounding_rect(element: &Element) -> BoundingRect {
    let rect = element.get_bounding_client_rect();
    BoundingRect {
        top: rect.top(),
        left: rect.left(),
        bottom: rect.bottom(),
        right: rect.right(),
    }
}

pub fn offset_top(element: &Element) -> f64 {
    element
        .dyn_ref::<HtmlElement>()
        .map_or(0.0, |html| f64::from(html.offset_top()))
}

/// Page sections in document order with their vertical offsets.
pub fn section_offsets(document: &Document, selector: &str) -> Vec<SectionOffset> {
    query_all(document, selector)
        .iter()
        .map(|element| SectionOffset::new(element.id(), offset_top(element)))
        .collect()
}

pub fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

/// Smooth-scrolls to the element with `id`, leaving room for the fixed header
/// unless it is the hero. Returns false when there is no such element.
pub fn scroll_to_element(
    window: &Window,
    document: &Document,
    id: &str,
    header_offset: f64,
) -> bool {
    let Some(element) = document.get_element_by_id(id) else {
        return false;
    };
    smooth_scroll_to(window, nav_scroll_target(id, offset_top(&element), header_offset));
    true
}

/// `(prefers-reduced-motion: reduce)`; false when the query is unsupported.
pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}
