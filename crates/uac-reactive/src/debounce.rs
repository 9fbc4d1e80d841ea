//! Debounced projection of a signal.
//!
//! The projection publishes a source value only after the source has been
//! quiet for the configured delay. Every write to the source cancels the
//! pending publication and schedules a new one, so a burst of writes
//! produces a single trailing update carrying the last value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskHandle};
use crate::signal::{ReadSignal, Signal, Subscription};

/// Default quiet period used for search inputs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Default)]
struct DebounceState {
    pending: RefCell<Option<TaskHandle>>,
    disposed: Cell<bool>,
}

impl DebounceState {
    fn cancel_pending(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.cancel();
        }
    }
}

/// A read-only signal that trails its source by a fixed delay.
///
/// The output starts with the source's value at creation time. Dropping the
/// projection (or calling [`dispose`](Self::dispose)) cancels any pending
/// publication; the output is never written afterwards.
pub struct Debounced<T> {
    output: Signal<T>,
    state: Rc<DebounceState>,
    subscription: Option<Subscription>,
    delay: Duration,
}

impl<T: Clone + 'static> Debounced<T> {
    /// Project `source` through a debounce of `delay` on `scheduler`.
    pub fn new(
        source: impl Into<ReadSignal<T>>,
        delay: Duration,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let source = source.into();
        let output = Signal::new(source.get());
        let state = Rc::new(DebounceState::default());

        let subscription = source.subscribe({
            let output = output.clone();
            let state = Rc::clone(&state);
            move |value: &T| {
                if state.disposed.get() {
                    return;
                }
                state.cancel_pending();

                let value = value.clone();
                let target = output.clone();
                let task_state = Rc::clone(&state);
                let handle = scheduler.schedule(
                    delay,
                    Box::new(move || {
                        if task_state.disposed.get() {
                            return;
                        }
                        task_state.pending.borrow_mut().take();
                        tracing::trace!(?delay, "debounce settled");
                        target.set(value);
                    }),
                );
                *state.pending.borrow_mut() = Some(handle);
            }
        });

        Self {
            output,
            state,
            subscription: Some(subscription),
            delay,
        }
    }

    /// Project `source` with [`DEFAULT_DEBOUNCE`].
    pub fn with_default_delay(
        source: impl Into<ReadSignal<T>>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self::new(source, DEFAULT_DEBOUNCE, scheduler)
    }

    /// The debounced value.
    pub fn value(&self) -> ReadSignal<T> {
        self.output.read_only()
    }

    /// Configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a publication is scheduled but has not run yet.
    pub fn is_pending(&self) -> bool {
        self.state
            .pending
            .borrow()
            .as_ref()
            .is_some_and(TaskHandle::is_pending)
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.state.disposed.get()
    }

    /// Stop observing the source and cancel any pending publication.
    pub fn dispose(&mut self) {
        if self.state.disposed.replace(true) {
            return;
        }
        self.state.cancel_pending();
        if let Some(subscription) = self.subscription.take() {
            subscription.detach();
        }
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.state.disposed.set(true);
        self.state.cancel_pending();
    }
}
