// Platform-independent core of the AI-Native Report page
pub mod charts;
pub mod config;
pub mod dates;
pub mod numbers;
pub mod state;
pub mod timing;
pub mod viewport;

pub use config::PageConfig;
pub use state::{ChartHandle, Disposable, Resizable, StateKey, StateStore, StateValue};
