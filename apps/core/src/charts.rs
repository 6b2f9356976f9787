//! The report's chart catalogue and the Chart.js options built for it.
//!
//! Options are plain JSON; the page attaches the tooltip and tick callbacks
//! described by [`TooltipFormat`] after converting them to JS objects.

use std::future::Future;

use futures::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::{StateError, StateKey, StateStore};

pub const ACCENT_COLOR: &str = "#e88856";
const AXIS_TITLE_COLOR: &str = "rgba(255, 255, 255, 0.9)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
        }
    }
}

/// How tooltip text is produced for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "style", rename_all = "camelCase")]
pub enum TooltipFormat {
    /// `"<series>: <y>% <noun>"`
    SeriesPercent { noun: String },
    /// Point label as title, complexity and performance lines as body.
    ScatterPoint,
}

impl TooltipFormat {
    pub fn series_percent(noun: &str) -> Self {
        Self::SeriesPercent {
            noun: noun.to_string(),
        }
    }

    /// Body lines for one hovered item.
    pub fn label_lines(&self, series: &str, x: f64, y: f64) -> Vec<String> {
        match self {
            Self::SeriesPercent { noun } => vec![format!("{series}: {y}% {noun}")],
            Self::ScatterPoint => vec![
                format!("Complexity: {x}B parameters"),
                format!("Performance: {y}%"),
            ],
        }
    }

    /// Title for the tooltip, `None` to keep Chart.js' default.
    pub fn title(&self, point_label: Option<&str>) -> Option<String> {
        match self {
            Self::SeriesPercent { .. } => None,
            Self::ScatterPoint => Some(
                point_label
                    .filter(|label| !label.is_empty())
                    .unwrap_or("AI Model")
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    /// Mount point element id, also the registry key.
    pub id: String,
    pub kind: ChartKind,
    pub data_url: String,
    pub title: String,
    pub tooltip: TooltipFormat,
}

impl ChartSpec {
    pub fn new(
        id: &str,
        kind: ChartKind,
        data_url: &str,
        title: &str,
        tooltip: TooltipFormat,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            data_url: data_url.to_string(),
            title: title.to_string(),
            tooltip,
        }
    }
}

pub fn default_catalogue() -> Vec<ChartSpec> {
    vec![
        ChartSpec::new(
            "line-chart",
            ChartKind::Line,
            "./data/ai-adoption-trends.json",
            "AI Adoption Trends (2020-2025)",
            TooltipFormat::series_percent("adoption"),
        ),
        ChartSpec::new(
            "bar-chart",
            ChartKind::Bar,
            "./data/industry-comparison.json",
            "AI Implementation by Industry",
            TooltipFormat::series_percent("implementation"),
        ),
        ChartSpec::new(
            "scatter-chart",
            ChartKind::Scatter,
            "./data/performance-metrics.json",
            "AI Model Performance vs. Complexity",
            TooltipFormat::ScatterPoint,
        ),
    ]
}

pub fn percent_tick(value: f64) -> String {
    format!("{value}%")
}

fn axis_style() -> Value {
    json!({
        "grid": {
            "color": "rgba(255, 255, 255, 0.08)",
            "drawBorder": false
        },
        "ticks": {
            "color": "rgba(255, 255, 255, 0.7)",
            "font": { "size": 12 }
        }
    })
}

/// Style shared by every chart on the page.
pub fn base_options(reduced_motion: bool) -> Value {
    let duration = if reduced_motion { 0 } else { 1000 };
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "interaction": {
            "intersect": false,
            "mode": "index"
        },
        "animation": {
            "duration": duration,
            "easing": "easeOutQuart"
        },
        "plugins": {
            "legend": {
                "display": true,
                "position": "bottom",
                "labels": {
                    "color": "rgba(255, 255, 255, 0.8)",
                    "padding": 20,
                    "font": {
                        "size": 14,
                        "family": "Raleway, sans-serif"
                    },
                    "usePointStyle": true,
                    "pointStyle": "circle"
                }
            },
            "tooltip": {
                "enabled": true,
                "backgroundColor": "#4a4a4a",
                "titleColor": ACCENT_COLOR,
                "bodyColor": "rgba(255, 255, 255, 0.9)",
                "borderColor": "rgba(232, 136, 86, 0.3)",
                "borderWidth": 1,
                "padding": 12,
                "displayColors": true,
                "titleFont": { "size": 14, "weight": "bold" },
                "bodyFont": { "size": 13 }
            }
        },
        "scales": {
            "x": axis_style(),
            "y": axis_style()
        }
    })
}

fn axis_title(text: &str) -> Value {
    json!({
        "display": true,
        "text": text,
        "color": AXIS_TITLE_COLOR,
        "font": { "size": 14 }
    })
}

fn overrides(spec: &ChartSpec) -> Value {
    let mut overrides = json!({
        "plugins": {
            "title": {
                "display": true,
                "text": spec.title,
                "color": ACCENT_COLOR,
                "font": { "size": 18, "weight": "bold" },
                "padding": 20
            }
        },
        "scales": {
            "y": { "min": 0, "max": 100 }
        }
    });

    if spec.kind == ChartKind::Scatter {
        merge(
            &mut overrides,
            json!({
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "x": {
                        "type": "logarithmic",
                        "title": axis_title("Model Complexity (Billion Parameters)")
                    },
                    "y": { "title": axis_title("Performance Score (%)") }
                }
            }),
        );
    }

    overrides
}

/// Full options object for `spec`, without callbacks.
pub fn chart_options(spec: &ChartSpec, reduced_motion: bool) -> Value {
    let mut options = base_options(reduced_motion);
    merge(&mut options, overrides(spec));
    options
}

/// Recursively merges `patch` into `target`; objects merge key by key, any
/// other value replaces what was there.
pub fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// What [`initialize_group`] did.
#[derive(Debug, PartialEq, Eq)]
pub enum GroupOutcome<E> {
    /// The charts were already initialized; nothing ran.
    AlreadyInitialized,
    /// Every chart settled. Failed charts are listed by id, in `specs` order.
    Settled { failures: Vec<(String, E)> },
}

/// Runs `init` for every spec concurrently, once per store.
///
/// One chart failing does not stop the others. `ChartsInitialized` is set
/// after all of them have settled.
#[allow(clippy::future_not_send)]
pub async fn initialize_group<'a, F, Fut, E>(
    store: &StateStore,
    specs: &'a [ChartSpec],
    init: F,
) -> Result<GroupOutcome<E>, StateError>
where
    F: Fn(&'a ChartSpec) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    if store.charts_initialized() {
        return Ok(GroupOutcome::AlreadyInitialized);
    }

    let results = join_all(specs.iter().map(&init)).await;
    let failures = specs
        .iter()
        .zip(results)
        .filter_map(|(spec, result)| result.err().map(|error| (spec.id.clone(), error)))
        .collect();

    store.set(StateKey::ChartsInitialized, true)?;
    Ok(GroupOutcome::Settled { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use futures::executor::block_on;

    fn spec(id: &str) -> ChartSpec {
        default_catalogue()
            .into_iter()
            .find(|spec| spec.id == id)
            .unwrap_or_else(|| panic!("no chart {id} in catalogue"))
    }

    #[test]
    fn catalogue_covers_the_three_mount_points() {
        let ids: Vec<_> = default_catalogue().into_iter().map(|spec| spec.id).collect();
        assert_eq!(ids, vec!["line-chart", "bar-chart", "scatter-chart"]);
    }

    #[test]
    fn reduced_motion_disables_animation() {
        assert_eq!(base_options(true)["animation"]["duration"], json!(0));
        assert_eq!(base_options(false)["animation"]["duration"], json!(1000));
    }

    #[test]
    fn line_options_keep_shared_style_and_bound_the_y_axis() {
        let options = chart_options(&spec("line-chart"), false);

        assert_eq!(options["scales"]["y"]["min"], json!(0));
        assert_eq!(options["scales"]["y"]["max"], json!(100));
        assert_eq!(
            options["scales"]["y"]["ticks"]["color"],
            json!("rgba(255, 255, 255, 0.7)")
        );
        assert_eq!(options["plugins"]["legend"]["display"], json!(true));
        assert_eq!(options["plugins"]["tooltip"]["padding"], json!(12));
        assert_eq!(
            options["plugins"]["title"]["text"],
            json!("AI Adoption Trends (2020-2025)")
        );
    }

    #[test]
    fn scatter_options_hide_legend_and_use_log_axis() {
        let options = chart_options(&spec("scatter-chart"), false);

        assert_eq!(options["plugins"]["legend"]["display"], json!(false));
        assert_eq!(options["scales"]["x"]["type"], json!("logarithmic"));
        assert_eq!(options["scales"]["x"]["grid"]["drawBorder"], json!(false));
        assert_eq!(
            options["scales"]["y"]["title"]["text"],
            json!("Performance Score (%)")
        );
    }

    #[test]
    fn merge_replaces_leaves_and_keeps_siblings() {
        let mut target = json!({ "a": { "b": 1, "c": 2 }, "d": [1, 2] });

        merge(&mut target, json!({ "a": { "b": 5 }, "d": [3], "e": true }));

        assert_eq!(target, json!({ "a": { "b": 5, "c": 2 }, "d": [3], "e": true }));
    }

    #[test]
    fn series_tooltips_name_the_measure() {
        let adoption = TooltipFormat::series_percent("adoption");

        assert_eq!(
            adoption.label_lines("Healthcare", 0.0, 42.5),
            vec!["Healthcare: 42.5% adoption".to_string()]
        );
        assert_eq!(adoption.title(Some("ignored")), None);
    }

    #[test]
    fn scatter_tooltips_fall_back_to_generic_title() {
        let scatter = TooltipFormat::ScatterPoint;

        assert_eq!(scatter.title(Some("GPT-4")), Some("GPT-4".to_string()));
        assert_eq!(scatter.title(None), Some("AI Model".to_string()));
        assert_eq!(scatter.title(Some("")), Some("AI Model".to_string()));
        assert_eq!(
            scatter.label_lines("", 175.0, 88.0),
            vec![
                "Complexity: 175B parameters".to_string(),
                "Performance: 88%".to_string()
            ]
        );
    }

    #[test]
    fn ticks_get_a_percent_suffix() {
        assert_eq!(percent_tick(20.0), "20%");
        assert_eq!(percent_tick(12.5), "12.5%");
    }

    #[test]
    fn group_is_marked_initialized_after_a_chart_fails() -> Result<(), StateError> {
        let store = StateStore::new();
        let catalogue = default_catalogue();
        let settled = RefCell::new(Vec::new());

        let outcome = block_on(initialize_group(&store, &catalogue, |spec| {
            let (store, settled) = (&store, &settled);
            async move {
                settled
                    .borrow_mut()
                    .push((spec.id.clone(), store.charts_initialized()));
                if spec.id == "bar-chart" {
                    Err("HTTP error! status: 404")
                } else {
                    Ok(())
                }
            }
        }))?;

        assert_eq!(
            outcome,
            GroupOutcome::Settled {
                failures: vec![("bar-chart".to_string(), "HTTP error! status: 404")],
            }
        );
        assert_eq!(
            *settled.borrow(),
            vec![
                ("line-chart".to_string(), false),
                ("bar-chart".to_string(), false),
                ("scatter-chart".to_string(), false),
            ]
        );
        assert!(store.charts_initialized());
        Ok(())
    }

    #[test]
    fn second_group_initialization_runs_nothing() -> Result<(), StateError> {
        let store = StateStore::new();
        let catalogue = default_catalogue();
        let runs = Cell::new(0);
        let init = |_: &ChartSpec| {
            runs.set(runs.get() + 1);
            async { Ok::<(), String>(()) }
        };

        let first = block_on(initialize_group(&store, &catalogue, init))?;
        let second = block_on(initialize_group(&store, &catalogue, init))?;

        assert_eq!(first, GroupOutcome::Settled { failures: Vec::new() });
        assert_eq!(second, GroupOutcome::AlreadyInitialized);
        assert_eq!(runs.get(), 3);
        Ok(())
    }
}
