use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use report_core::charts::{
    chart_options, initialize_group, percent_tick, ChartSpec, GroupOutcome, TooltipFormat,
};
use report_core::{ChartHandle, Disposable, Resizable, StateStore};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::console;
use crate::dom;
use crate::error::PageError;
use crate::fetch::fetch_json;

#[wasm_bindgen]
extern "C" {
    /// The global `Chart` constructor from Chart.js.
    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(item: &Element, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &ChartJs);

    #[wasm_bindgen(method)]
    fn resize(this: &ChartJs);
}

type Callback = Closure<dyn Fn(JsValue) -> JsValue>;

/// A live Chart.js instance plus the Rust callbacks it calls into.
pub struct RenderedChart {
    chart: ChartJs,
    _callbacks: Vec<Callback>,
}

impl Disposable for RenderedChart {
    fn destroy(&self) {
        self.chart.destroy();
    }
}

impl Resizable for RenderedChart {
    fn resize(&self) {
        self.chart.resize();
    }
}

impl ChartHandle for RenderedChart {
    fn as_disposable(&self) -> Option<&dyn Disposable> {
        Some(self)
    }

    fn as_resizable(&self) -> Option<&dyn Resizable> {
        Some(self)
    }
}

fn get_path(value: &JsValue, path: &[&str]) -> JsValue {
    path.iter().fold(value.clone(), |current, key| {
        if current.is_object() {
            Reflect::get(&current, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
        } else {
            JsValue::UNDEFINED
        }
    })
}

/// Walks `path` from `root`, creating empty objects where keys are missing.
fn object_at(root: &JsValue, path: &[&str]) -> Result<JsValue, PageError> {
    let mut current = root.clone();
    for key in path {
        let key = JsValue::from_str(key);
        let mut next = Reflect::get(&current, &key)
            .map_err(|error| PageError::js("options lookup failed", &error))?;
        if !next.is_object() {
            next = Object::new().into();
            Reflect::set(&current, &key, &next)
                .map_err(|error| PageError::js("options update failed", &error))?;
        }
        current = next;
    }
    Ok(current)
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), PageError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(drop)
        .map_err(|error| PageError::js("options update failed", &error))
}

fn label_callback(format: TooltipFormat) -> Callback {
    Closure::new(move |context: JsValue| {
        let series = get_path(&context, &["dataset", "label"])
            .as_string()
            .unwrap_or_default();
        let x = get_path(&context, &["parsed", "x"]).as_f64().unwrap_or(f64::NAN);
        let y = get_path(&context, &["parsed", "y"]).as_f64().unwrap_or(f64::NAN);
        let lines = format.label_lines(&series, x, y);
        if lines.len() == 1 {
            JsValue::from_str(&lines[0])
        } else {
            lines
                .iter()
                .map(|line| JsValue::from_str(line))
                .collect::<Array>()
                .into()
        }
    })
}

fn title_callback(format: TooltipFormat) -> Callback {
    Closure::new(move |items: JsValue| {
        let first = Array::from(&items).get(0);
        let label = get_path(&first, &["raw", "label"]).as_string();
        format
            .title(label.as_deref())
            .map_or(JsValue::UNDEFINED, |title| JsValue::from_str(&title))
    })
}

fn percent_tick_callback() -> Callback {
    Closure::new(|value: JsValue| {
        value
            .as_f64()
            .map_or(value, |number| JsValue::from_str(&percent_tick(number)))
    })
}

/// Builds the `{ type, data, options }` object handed to Chart.js.
fn chart_config(
    spec: &ChartSpec,
    data: &JsValue,
    reduced_motion: bool,
) -> Result<(JsValue, Vec<Callback>), PageError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let options = chart_options(spec, reduced_motion).serialize(&serializer)?;

    let mut callbacks = Vec::new();

    let tooltip_callbacks = object_at(&options, &["plugins", "tooltip", "callbacks"])?;
    let label = label_callback(spec.tooltip.clone());
    set(&tooltip_callbacks, "label", label.as_ref())?;
    callbacks.push(label);
    if spec.tooltip.title(None).is_some() {
        let title = title_callback(spec.tooltip.clone());
        set(&tooltip_callbacks, "title", title.as_ref())?;
        callbacks.push(title);
    }

    let ticks = object_at(&options, &["scales", "y", "ticks"])?;
    let tick = percent_tick_callback();
    set(&ticks, "callback", tick.as_ref())?;
    callbacks.push(tick);

    let config: JsValue = Object::new().into();
    set(&config, "type", &JsValue::from_str(spec.kind.as_str()))?;
    set(&config, "data", data)?;
    set(&config, "options", &options)?;

    Ok((config, callbacks))
}

/// Fetches the dataset, mounts the chart and registers it under `spec.id`.
///
/// A page without the mount point is not an error; the chart is skipped.
pub async fn init_chart(
    store: &StateStore,
    spec: &ChartSpec,
    reduced_motion: bool,
) -> Result<(), PageError> {
    let data = fetch_json(&spec.data_url).await?;

    let document = dom::document()?;
    let Some(mount) = document.get_element_by_id(&spec.id) else {
        return Ok(());
    };

    let (config, callbacks) = chart_config(spec, &data, reduced_motion)?;
    let chart =
        ChartJs::new(&mount, &config).map_err(|error| PageError::js("Chart.js failed", &error))?;

    store.set_chart(
        spec.id.clone(),
        Rc::new(RenderedChart {
            chart,
            _callbacks: callbacks,
        }),
    );
    Ok(())
}

/// Renders every chart in `specs` concurrently, once per page.
pub async fn initialize_charts(store: &StateStore, specs: &[ChartSpec], reduced_motion: bool) {
    let outcome = initialize_group(store, specs, |spec| {
        init_chart(store, spec, reduced_motion)
    })
    .await;

    match outcome {
        Ok(GroupOutcome::AlreadyInitialized) => {}
        Ok(GroupOutcome::Settled { failures }) => {
            for (id, error) in failures {
                console::error(&format!("Error initializing {id} chart: {error}"));
            }
            console::info("All charts initialized successfully");
        }
        Err(error) => console::error(&format!("Error initializing charts: {error}")),
    }
}
