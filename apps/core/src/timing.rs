//! Trailing-edge debounce and leading-edge throttle wrappers.
//!
//! Both are generic over a [`Scheduler`] so the page can drive them with
//! browser timers while tests use [`ManualScheduler`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_WAIT: Duration = Duration::from_millis(250);

/// Runs deferred tasks. Dropping the returned handle cancels the task if it
/// has not run yet.
pub trait Scheduler {
    type Handle: 'static;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

impl<S: Scheduler> Scheduler for Rc<S> {
    type Handle = S::Handle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        (**self).schedule(delay, task)
    }
}

/// Only the last call in a burst runs, `wait` after that call.
pub struct Debounced<A, S: Scheduler> {
    inner: Rc<DebounceInner<A, S>>,
}

struct DebounceInner<A, S: Scheduler> {
    func: Box<dyn Fn(A)>,
    wait: Duration,
    scheduler: S,
    pending: RefCell<Option<S::Handle>>,
}

impl<A: 'static, S: Scheduler + 'static> Debounced<A, S> {
    pub fn new(scheduler: S, wait: Duration, func: impl Fn(A) + 'static) -> Self {
        Self {
            inner: Rc::new(DebounceInner {
                func: Box::new(func),
                wait,
                scheduler,
                pending: RefCell::new(None),
            }),
        }
    }

    pub fn call(&self, args: A) {
        // Dropping the previous handle cancels it.
        self.inner.pending.borrow_mut().take();

        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.wait,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let finished = inner.pending.borrow_mut().take();
                    (inner.func)(args);
                    drop(finished);
                }
            }),
        );
        *self.inner.pending.borrow_mut() = Some(handle);
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }
}

impl<A, S: Scheduler> Clone for Debounced<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Runs on the first call, then drops calls until `wait` has elapsed.
pub struct Throttled<A, S: Scheduler> {
    inner: Rc<ThrottleInner<A, S>>,
}

struct ThrottleInner<A, S: Scheduler> {
    func: Box<dyn Fn(A)>,
    wait: Duration,
    scheduler: S,
    waiting: Cell<bool>,
    cooldown: RefCell<Option<S::Handle>>,
}

impl<A: 'static, S: Scheduler + 'static> Throttled<A, S> {
    pub fn new(scheduler: S, wait: Duration, func: impl Fn(A) + 'static) -> Self {
        Self {
            inner: Rc::new(ThrottleInner {
                func: Box::new(func),
                wait,
                scheduler,
                waiting: Cell::new(false),
                cooldown: RefCell::new(None),
            }),
        }
    }

    /// Returns whether the call ran.
    pub fn call(&self, args: A) -> bool {
        if self.inner.waiting.get() {
            return false;
        }

        (self.inner.func)(args);
        self.inner.waiting.set(true);

        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.wait,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.waiting.set(false);
                    let finished = inner.cooldown.borrow_mut().take();
                    drop(finished);
                }
            }),
        );
        *self.inner.cooldown.borrow_mut() = Some(handle);
        true
    }

    pub fn is_cooling_down(&self) -> bool {
        self.inner.waiting.get()
    }
}

impl<A, S: Scheduler> Clone for Throttled<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Scheduler driven by a virtual clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    queue: Rc<RefCell<BTreeMap<(Duration, u64), Box<dyn FnOnce()>>>>,
}

/// Cancels its task when dropped.
pub struct ManualHandle {
    key: (Duration, u64),
    queue: std::rc::Weak<RefCell<BTreeMap<(Duration, u64), Box<dyn FnOnce()>>>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            // The queue is borrowed while a task is being popped.
            if let Ok(mut queue) = queue.try_borrow_mut() {
                queue.remove(&self.key);
            }
        }
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves the clock forward, running every task that falls due in order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                match queue.keys().next().copied() {
                    Some(key) if key.0 <= target => queue.remove(&key).map(|task| (key, task)),
                    _ => None,
                }
            };
            let Some(((due, _), task)) = next else {
                break;
            };
            self.now.set(due);
            task();
        }
        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ManualHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let key = (self.now.get() + delay, id);
        self.queue.borrow_mut().insert(key, task);
        ManualHandle {
            key,
            queue: Rc::downgrade(&self.queue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn counter() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |value| sink.borrow_mut().push(value))
    }

    #[test]
    fn throttle_runs_once_per_window_and_drops_the_rest() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (calls, func) = counter();
        let throttled = Throttled::new(scheduler.clone(), ms(100), func);

        for value in 0..5 {
            throttled.call(value);
            scheduler.advance(ms(2));
        }
        assert_eq!(*calls.borrow(), vec![0]);

        scheduler.advance(ms(100));
        assert!(throttled.call(5));

        assert_eq!(*calls.borrow(), vec![0, 5]);
    }

    #[test]
    fn throttle_has_no_trailing_call() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (calls, func) = counter();
        let throttled = Throttled::new(scheduler.clone(), ms(100), func);

        assert!(throttled.call(1));
        assert!(!throttled.call(2));
        scheduler.advance(ms(500));

        assert_eq!(*calls.borrow(), vec![1]);
        assert!(!throttled.is_cooling_down());
    }

    #[test]
    fn debounce_runs_last_call_once_after_the_burst() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (calls, func) = counter();
        let debounced = Debounced::new(scheduler.clone(), ms(100), func);

        debounced.call(1);
        scheduler.advance(ms(25));
        debounced.call(2);
        scheduler.advance(ms(25));
        debounced.call(3);

        scheduler.advance(ms(99));
        assert!(calls.borrow().is_empty());
        assert!(debounced.is_pending());

        scheduler.advance(ms(1));
        assert_eq!(*calls.borrow(), vec![3]);
        assert_eq!(scheduler.now(), ms(150));
        assert!(!debounced.is_pending());

        scheduler.advance(ms(1_000));
        assert_eq!(*calls.borrow(), vec![3]);
    }

    #[test]
    fn debounce_cancels_superseded_timers() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (_calls, func) = counter();
        let debounced = Debounced::new(scheduler.clone(), DEFAULT_WAIT, func);

        debounced.call(1);
        debounced.call(2);

        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn separate_bursts_each_fire() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (calls, func) = counter();
        let debounced = Debounced::new(scheduler.clone(), ms(100), func);

        debounced.call(1);
        scheduler.advance(ms(150));
        debounced.call(2);
        scheduler.advance(ms(150));

        assert_eq!(*calls.borrow(), vec![1, 2]);
    }
}
