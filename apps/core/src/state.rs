use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

/// Chart handles that can release their rendering resources.
pub trait Disposable {
    fn destroy(&self);
}

/// Chart handles that can re-measure their mount point.
pub trait Resizable {
    fn resize(&self);
}

/// A rendered chart owned by the store's registry.
///
/// Capabilities are discovered through the `as_*` accessors; a handle that
/// cannot be destroyed or resized keeps the default `None`.
pub trait ChartHandle {
    fn as_disposable(&self) -> Option<&dyn Disposable> {
        None
    }

    fn as_resizable(&self) -> Option<&dyn Resizable> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    CurrentSection,
    ScrollProgress,
    MobileMenuOpen,
    ChartsInitialized,
}

impl StateKey {
    pub const ALL: [Self; 4] = [
        Self::CurrentSection,
        Self::ScrollProgress,
        Self::MobileMenuOpen,
        Self::ChartsInitialized,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentSection => "currentSection",
            Self::ScrollProgress => "scrollProgress",
            Self::MobileMenuOpen => "mobileMenuOpen",
            Self::ChartsInitialized => "chartsInitialized",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    const fn kind(self) -> ValueKind {
        match self {
            Self::CurrentSection => ValueKind::Text,
            Self::ScrollProgress => ValueKind::Number,
            Self::MobileMenuOpen | Self::ChartsInitialized => ValueKind::Flag,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Flag,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Flag => "flag",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl StateValue {
    const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Flag(_) => ValueKind::Flag,
        }
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("state field `{key}` holds a {expected} value, got {found}")]
    TypeMismatch {
        key: StateKey,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Owned copy of the application state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub current_section: String,
    pub scroll_progress: f64,
    pub mobile_menu_open: bool,
    pub charts_initialized: bool,
    pub charts: Vec<String>,
}

#[derive(Debug)]
struct Fields {
    current_section: String,
    scroll_progress: f64,
    mobile_menu_open: bool,
    charts_initialized: bool,
}

impl Fields {
    fn get(&self, key: StateKey) -> StateValue {
        match key {
            StateKey::CurrentSection => StateValue::Text(self.current_section.clone()),
            StateKey::ScrollProgress => StateValue::Number(self.scroll_progress),
            StateKey::MobileMenuOpen => StateValue::Flag(self.mobile_menu_open),
            StateKey::ChartsInitialized => StateValue::Flag(self.charts_initialized),
        }
    }

    fn put(&mut self, value: StateValue, key: StateKey) {
        match (key, value) {
            (StateKey::CurrentSection, StateValue::Text(text)) => self.current_section = text,
            (StateKey::ScrollProgress, StateValue::Number(number)) => {
                self.scroll_progress = number;
            }
            (StateKey::MobileMenuOpen, StateValue::Flag(flag)) => self.mobile_menu_open = flag,
            (StateKey::ChartsInitialized, StateValue::Flag(flag)) => {
                self.charts_initialized = flag;
            }
            _ => {}
        }
    }
}

type Callback = Box<dyn Fn(&StateValue, &StateValue)>;

struct Listener {
    id: u64,
    active: Cell<bool>,
    callback: Callback,
}

type Listeners = RefCell<HashMap<StateKey, Vec<Rc<Listener>>>>;

/// Revocation capability returned by [`StateStore::subscribe`].
///
/// Dropping it leaves the registration in place.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    key: StateKey,
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    /// Removes this registration. Calling it again does nothing.
    pub fn unsubscribe(&self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = listeners.borrow_mut();
        let Some(entries) = listeners.get_mut(&self.key) else {
            return;
        };
        if let Some(index) = entries.iter().position(|listener| listener.id == self.id) {
            let removed = entries.remove(index);
            removed.active.set(false);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

/// Page-wide key/value state with synchronous per-key notification.
pub struct StateStore {
    fields: RefCell<Fields>,
    charts: RefCell<BTreeMap<String, Rc<dyn ChartHandle>>>,
    listeners: Rc<Listeners>,
    next_id: Cell<u64>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            fields: RefCell::new(Fields {
                current_section: "hero".to_string(),
                scroll_progress: 0.0,
                mobile_menu_open: false,
                charts_initialized: false,
            }),
            charts: RefCell::new(BTreeMap::new()),
            listeners: Rc::new(RefCell::new(HashMap::new())),
            next_id: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> AppState {
        let fields = self.fields.borrow();
        AppState {
            current_section: fields.current_section.clone(),
            scroll_progress: fields.scroll_progress,
            mobile_menu_open: fields.mobile_menu_open,
            charts_initialized: fields.charts_initialized,
            charts: self.chart_ids(),
        }
    }

    pub fn get(&self, key: StateKey) -> StateValue {
        self.fields.borrow().get(key)
    }

    /// Looks a field up by its camelCase name; unknown names yield `None`.
    pub fn get_named(&self, name: &str) -> Option<StateValue> {
        StateKey::parse(name).map(|key| self.get(key))
    }

    pub fn current_section(&self) -> String {
        self.fields.borrow().current_section.clone()
    }

    pub fn scroll_progress(&self) -> f64 {
        self.fields.borrow().scroll_progress
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.fields.borrow().mobile_menu_open
    }

    pub fn charts_initialized(&self) -> bool {
        self.fields.borrow().charts_initialized
    }

    /// Writes `value` and notifies the key's listeners.
    ///
    /// Returns `Ok(false)` when the value equals the stored one; no listener
    /// runs in that case.
    pub fn set(&self, key: StateKey, value: impl Into<StateValue>) -> Result<bool, StateError> {
        let value = value.into();
        if value.kind() != key.kind() {
            return Err(StateError::TypeMismatch {
                key,
                expected: key.kind(),
                found: value.kind(),
            });
        }

        let old = {
            let mut fields = self.fields.borrow_mut();
            let old = fields.get(key);
            if old == value {
                return Ok(false);
            }
            fields.put(value.clone(), key);
            old
        };

        self.notify(key, &value, &old);
        Ok(true)
    }

    /// Applies each entry with [`StateStore::set`], one notification round per change.
    pub fn update<I, V>(&self, entries: I) -> Result<(), StateError>
    where
        I: IntoIterator<Item = (StateKey, V)>,
        V: Into<StateValue>,
    {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    pub fn subscribe<F>(&self, key: StateKey, callback: F) -> Subscription
    where
        F: Fn(&StateValue, &StateValue) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.listeners
            .borrow_mut()
            .entry(key)
            .or_default()
            .push(Rc::new(Listener {
                id,
                active: Cell::new(true),
                callback: Box::new(callback),
            }));

        Subscription {
            key,
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    fn notify(&self, key: StateKey, new: &StateValue, old: &StateValue) {
        // Listeners may subscribe or unsubscribe while the round runs.
        let round = self
            .listeners
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_default();

        for listener in round {
            if !listener.active.get() {
                continue;
            }
            // Nested rounds re-enter listeners; the Rc keeps this one alive
            // even if it unsubscribes itself.
            (listener.callback)(new, old);
        }
    }

    pub fn set_chart(&self, id: impl Into<String>, handle: Rc<dyn ChartHandle>) {
        self.charts.borrow_mut().insert(id.into(), handle);
    }

    pub fn get_chart(&self, id: &str) -> Option<Rc<dyn ChartHandle>> {
        self.charts.borrow().get(id).cloned()
    }

    pub fn chart_ids(&self) -> Vec<String> {
        self.charts.borrow().keys().cloned().collect()
    }

    pub fn resize_all_charts(&self) {
        let handles: Vec<_> = self.charts.borrow().values().cloned().collect();
        for handle in handles {
            if let Some(resizable) = handle.as_resizable() {
                resizable.resize();
            }
        }
    }

    pub fn destroy_all_charts(&self) {
        let charts = std::mem::take(&mut *self.charts.borrow_mut());
        for handle in charts.into_values() {
            if let Some(disposable) = handle.as_disposable() {
                disposable.destroy();
            }
        }
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("fields", &self.fields.borrow())
            .field("charts", &self.chart_ids())
            .finish_non_exhaustive()
    }
}
