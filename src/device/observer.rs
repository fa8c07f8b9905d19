// src/device/observer.rs

//! Observer registry for device notifications.
//!
//! Callbacks are invoked synchronously, in registration order, after the state
//! machine has committed a transition and released its lock. A panicking
//! callback is caught and logged; it never reaches the state machine and never
//! prevents the remaining callbacks from running.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::device::state::{Readouts, StepChange};
use crate::device::Lifecycle;

/// Handle returned by `subscribe_*`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Notification produced by a committed transition or tick.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Notification {
    State(Lifecycle),
    Progress(u8),
    Parameters(Readouts),
    Step(StepChange),
}

struct Subscribers<T> {
    entries: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, id: SubscriptionId, callback: Callback<T>) {
        lock(&self.entries).push((id, callback));
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    fn notify(&self, kind: &'static str, value: &T) {
        // Snapshot so callbacks may subscribe/unsubscribe without deadlocking.
        let callbacks: Vec<(SubscriptionId, Callback<T>)> = lock(&self.entries).clone();

        for (id, callback) in callbacks {
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(value)));
            if result.is_err() {
                warn!(
                    subscription = id.0,
                    kind,
                    "observer panicked; notification skipped for this observer"
                );
            }
        }
    }
}

/// All observer lists of one device.
pub(crate) struct Observers {
    next_id: AtomicU64,
    state: Subscribers<Lifecycle>,
    progress: Subscribers<u8>,
    parameters: Subscribers<Readouts>,
    steps: Subscribers<StepChange>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state: Subscribers::new(),
            progress: Subscribers::new(),
            parameters: Subscribers::new(),
            steps: Subscribers::new(),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn on_state(&self, f: impl Fn(&Lifecycle) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.state.add(id, Arc::new(f));
        id
    }

    pub(crate) fn on_progress(&self, f: impl Fn(&u8) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.progress.add(id, Arc::new(f));
        id
    }

    pub(crate) fn on_parameters(
        &self,
        f: impl Fn(&Readouts) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.parameters.add(id, Arc::new(f));
        id
    }

    pub(crate) fn on_step(&self, f: impl Fn(&StepChange) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.steps.add(id, Arc::new(f));
        id
    }

    /// Remove a subscription from whichever list holds it.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        self.state.remove(id)
            || self.progress.remove(id)
            || self.parameters.remove(id)
            || self.steps.remove(id)
    }

    pub(crate) fn count(&self) -> usize {
        self.state.len() + self.progress.len() + self.parameters.len() + self.steps.len()
    }

    pub(crate) fn dispatch(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            debug!(?notification, "dispatching device notification");
            match notification {
                Notification::State(s) => self.state.notify("state", &s),
                Notification::Progress(p) => self.progress.notify("progress", &p),
                Notification::Parameters(r) => self.parameters.notify("parameters", &r),
                Notification::Step(step) => self.steps.notify("step", &step),
            }
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panicking_observer_does_not_stop_others() {
        let observers = Observers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        observers.on_progress(|_| panic!("observer failure"));
        let sink = Arc::clone(&seen);
        observers.on_progress(move |p| sink.lock().unwrap().push(*p));

        observers.dispatch(vec![Notification::Progress(10), Notification::Progress(20)]);

        assert_eq!(*seen.lock().unwrap(), vec![10, 20]);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let observers = Observers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = observers.on_state(move |s| sink.lock().unwrap().push(*s));
        observers.dispatch(vec![Notification::State(Lifecycle::On)]);

        assert!(observers.remove(id));
        assert!(!observers.remove(id));
        observers.dispatch(vec![Notification::State(Lifecycle::Off)]);

        assert_eq!(*seen.lock().unwrap(), vec![Lifecycle::On]);
        assert_eq!(observers.count(), 0);
    }
}
