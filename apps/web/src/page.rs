use std::rc::Rc;

use color_eyre::eyre::WrapErr;
use gloo_events::{EventListener, EventListenerOptions};
use report_core::config::CONFIG_ELEMENT_ID;
use report_core::timing::{Debounced, Throttled};
use report_core::viewport::{
    active_section_with_lookahead, fragment_target, is_scrolled, scroll_progress,
    should_close_menu_on_resize, should_reveal,
};
use report_core::{PageConfig, StateKey, StateStore};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::charts::initialize_charts;
use crate::console;
use crate::dom::{self, ACTIVE_CLASS, OPEN_CLASS, SCROLLED_CLASS, VISIBLE_CLASS};
use crate::error::PageError;
use crate::timers::BrowserScheduler;

const NAV_LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = ".content-section, #hero";
const REVEAL_SELECTOR: &str = ".observe-fade";
const PROGRESS_ID: &str = "progress-indicator";
const MAIN_NAV_ID: &str = "main-nav";
const NAV_MENU_ID: &str = "nav-menu";
const MENU_TOGGLE_ID: &str = "mobile-menu-toggle";
const CURRENT_DATE_ID: &str = "current-date";

type ScrollHandler = Throttled<(), BrowserScheduler>;

/// Reads the inline JSON override block, falling back to defaults.
pub fn load_config(document: &Document) -> PageConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return PageConfig::default();
    };

    PageConfig::from_json(&text).unwrap_or_else(|error| {
        console::warn(&format!("Ignoring #{CONFIG_ELEMENT_ID}: {error}"));
        PageConfig::default()
    })
}

fn set_current_date(document: &Document) {
    if let Some(element) = document.get_element_by_id(CURRENT_DATE_ID) {
        let now = chrono::Local::now();
        element.set_text_content(Some(&report_core::dates::month_year(&now)));
    }
}

fn update_active_nav(
    store: &StateStore,
    document: &Document,
    section_id: &str,
) -> Result<(), PageError> {
    for link in dom::query_all(document, NAV_LINK_SELECTOR) {
        let is_active = link
            .get_attribute("href")
            .as_deref()
            .and_then(fragment_target)
            == Some(section_id);
        dom::set_class(&link, ACTIVE_CLASS, is_active);
    }
    store.set(StateKey::CurrentSection, section_id)?;
    Ok(())
}

fn update_progress_indicator(
    store: &StateStore,
    window: &Window,
    document: &Document,
) -> Result<(), PageError> {
    let progress = scroll_progress(dom::scroll_metrics(window, document));

    if let Some(bar) = document
        .get_element_by_id(PROGRESS_ID)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    {
        bar.style()
            .set_property("width", &format!("{progress}%"))
            .map_err(|error| PageError::js("progress bar update failed", &error))?;
    }

    store.set(StateKey::ScrollProgress, progress)?;
    Ok(())
}

/// Adds `visible` to reveal-on-scroll elements once their top crosses the
/// reveal line. Elements are never hidden again.
fn reveal_visible(window: &Window, document: &Document, ratio: f64) {
    let (_, viewport_height) = dom::viewport_size(window);
    for element in dom::query_all(document, REVEAL_SELECTOR) {
        if should_reveal(dom::bounding_rect(&element).top, viewport_height, ratio) {
            dom::set_class(&element, VISIBLE_CLASS, true);
        }
    }
}

fn handle_scroll(store: &StateStore, config: &PageConfig) -> Result<(), PageError> {
    let window = dom::window()?;
    let document = dom::document()?;

    update_progress_indicator(store, &window, &document)?;

    let sections = dom::section_offsets(&document, SECTION_SELECTOR);
    let scroll_y = dom::scroll_y(&window);
    if let Some(active) =
        active_section_with_lookahead(&sections, scroll_y, config.section_lookahead)
            .filter(|id| !id.is_empty())
    {
        update_active_nav(store, &document, active)?;
    }

    if let Some(nav) = document.get_element_by_id(MAIN_NAV_ID) {
        dom::set_class(&nav, SCROLLED_CLASS, is_scrolled(scroll_y, config.scrolled_threshold));
    }

    reveal_visible(&window, &document, config.reveal_ratio);
    Ok(())
}

fn toggle_mobile_menu(store: &StateStore) -> Result<(), PageError> {
    let document = dom::document()?;
    let Some(menu) = document.get_element_by_id(NAV_MENU_ID) else {
        return Ok(());
    };

    let open = !store.mobile_menu_open();
    dom::set_class(&menu, OPEN_CLASS, open);
    store.set(StateKey::MobileMenuOpen, open)?;
    Ok(())
}

fn handle_resize(store: &StateStore, config: &PageConfig) -> Result<(), PageError> {
    store.resize_all_charts();

    let (width, _) = dom::viewport_size(&dom::window()?);
    if should_close_menu_on_resize(width, config.mobile_breakpoint, store.mobile_menu_open()) {
        toggle_mobile_menu(store)?;
    }
    Ok(())
}

fn log_failure(context: &str, result: Result<(), PageError>) {
    if let Err(error) = result {
        console::error(&format!("{context}: {error}"));
    }
}

fn setup_navigation(
    store: &Rc<StateStore>,
    config: &Rc<PageConfig>,
    document: &Document,
    on_scroll: &ScrollHandler,
) {
    for link in dom::query_all(document, NAV_LINK_SELECTOR) {
        let store = store.clone();
        let config = config.clone();
        let target = link.get_attribute("href");
        EventListener::new_with_options(
            &link,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(target_id) = target.as_deref().and_then(fragment_target) else {
                    return;
                };
                event.prevent_default();

                let (Ok(window), Ok(document)) = (dom::window(), dom::document()) else {
                    return;
                };
                let header_offset = config.nav_header_offset;
                if !dom::scroll_to_element(&window, &document, target_id, header_offset) {
                    return;
                }

                if store.mobile_menu_open() {
                    log_failure("Error closing mobile menu", toggle_mobile_menu(&store));
                }
            },
        )
        .forget();
    }

    if let Some(toggle) = document.get_element_by_id(MENU_TOGGLE_ID) {
        let store = store.clone();
        EventListener::new(&toggle, "click", move |_| {
            log_failure("Error toggling mobile menu", toggle_mobile_menu(&store));
        })
        .forget();
    }

    on_scroll.call(());
}

async fn init_app(store: Rc<StateStore>, config: Rc<PageConfig>) -> color_eyre::Result<()> {
    console::info("Initializing AI-Native Report...");

    let window = dom::window().wrap_err("page has no window")?;
    let document = dom::document().wrap_err("page has no document")?;

    set_current_date(&document);

    let on_scroll: ScrollHandler = Throttled::new(BrowserScheduler, config.scroll_throttle(), {
        let store = store.clone();
        let config = config.clone();
        move |()| log_failure("Error handling scroll", handle_scroll(&store, &config))
    });
    let on_resize: Debounced<(), BrowserScheduler> =
        Debounced::new(BrowserScheduler, config.resize_debounce(), {
            let store = store.clone();
            let config = config.clone();
            move |()| log_failure("Error handling resize", handle_resize(&store, &config))
        });

    setup_navigation(&store, &config, &document, &on_scroll);

    initialize_charts(&store, &config.charts, dom::prefers_reduced_motion(&window)).await;

    EventListener::new(&window, "scroll", move |_| {
        on_scroll.call(());
    })
    .forget();
    EventListener::new(&window, "resize", move |_| on_resize.call(())).forget();

    reveal_visible(&window, &document, config.reveal_ratio);

    console::info("App initialized successfully!");
    Ok(())
}

/// Runs start-up, logging anything that escapes it.
pub async fn run(store: Rc<StateStore>, config: Rc<PageConfig>) {
    if let Err(report) = init_app(store, config).await {
        console::error(&format!("Error initializing app: {report:?}"));
    }
}
