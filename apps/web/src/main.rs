mod charts;
mod console;
mod dom;
mod error;
mod fetch;
mod page;
mod timers;

use std::rc::Rc;

use gloo_events::EventListener;
use report_core::StateStore;
use wasm_bindgen_futures::spawn_local;

fn main() {
    console_error_panic_hook::set_once();

    let (Ok(window), Ok(document)) = (dom::window(), dom::document()) else {
        console::error("AI-Native Report needs a browser window and document");
        return;
    };

    let store = Rc::new(StateStore::new());
    let config = Rc::new(page::load_config(&document));

    // Cleanup on page unload
    EventListener::new(&window, "beforeunload", {
        let store = store.clone();
        move |_| store.destroy_all_charts()
    })
    .forget();

    let start = move || spawn_local(page::run(store, config));
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| start()).forget();
    } else {
        start();
    }
}
