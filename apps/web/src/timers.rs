use std::time::Duration;

use gloo_timers::callback::Timeout;
use report_core::timing::Scheduler;

/// `setTimeout`-backed scheduler; dropping the handle clears the timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}
