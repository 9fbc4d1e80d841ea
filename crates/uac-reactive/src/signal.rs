//! Signal - an observable value cell.
//!
//! `Signal<T>` stores a value and notifies its observers synchronously on
//! every write. Writes issued while a notification round is running (for
//! example from inside an observer) are queued and delivered once the
//! current round finishes, so every observer sees a write before any later
//! write is observed.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Observer<T> {
    id: u64,
    callback: Callback<T>,
}

struct SignalInner<T> {
    value: RefCell<T>,
    /// Incremented once per delivered write.
    version: Cell<u64>,
    observers: RefCell<Vec<Observer<T>>>,
    next_observer: Cell<u64>,
    notifying: Cell<bool>,
    /// Writes queued while a notification round is in progress.
    pending: RefCell<VecDeque<T>>,
}

/// A mutable, observable value.
///
/// Cloning a `Signal` yields another handle to the same cell.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a new signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
                notifying: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Current value (cloned).
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Number of writes delivered so far.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Write a new value and notify every observer.
    ///
    /// If called while this signal is already notifying, the write is queued
    /// and delivered after the running round completes.
    pub fn set(&self, value: T) {
        if self.inner.notifying.get() {
            self.inner.pending.borrow_mut().push_back(value);
            return;
        }

        let _round = NotifyRound::begin(&self.inner);
        let mut next = Some(value);
        while let Some(value) = next {
            *self.inner.value.borrow_mut() = value.clone();
            self.inner.version.set(self.inner.version.get() + 1);

            // Snapshot so observers may subscribe or unsubscribe while running.
            let callbacks: Vec<Callback<T>> = self
                .inner
                .observers
                .borrow()
                .iter()
                .map(|observer| Rc::clone(&observer.callback))
                .collect();
            tracing::trace!(
                version = self.inner.version.get(),
                observers = callbacks.len(),
                "signal write"
            );
            for callback in callbacks {
                callback(&value);
            }

            next = self.inner.pending.borrow_mut().pop_front();
        }
    }

    /// Apply `f` to the current value and write the result.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.with(f);
        self.set(next);
    }

    /// Register an observer called with every delivered value.
    ///
    /// The observer stays registered until the returned [`Subscription`] is
    /// dropped or detached.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_observer.get();
        self.inner.next_observer.set(id + 1);
        self.inner.observers.borrow_mut().push(Observer {
            id,
            callback: Rc::new(observer),
        });

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.observers.borrow_mut().retain(|observer| observer.id != id);
                }
            })),
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// A read-only handle to this signal.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            signal: self.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Write `value` only if it differs from the current one.
    ///
    /// Returns whether a write happened.
    pub fn set_if_changed(&self, value: T) -> bool {
        if self.with(|current| *current == value) {
            return false;
        }
        self.set(value);
        true
    }
}

/// Ends a notification round, even one cut short by a panicking observer.
///
/// Writes still queued when the round unwinds are discarded so a later,
/// unrelated write cannot be overtaken by them.
struct NotifyRound<'a, T> {
    inner: &'a SignalInner<T>,
}

impl<'a, T> NotifyRound<'a, T> {
    fn begin(inner: &'a SignalInner<T>) -> Self {
        inner.notifying.set(true);
        Self { inner }
    }
}

impl<T> Drop for NotifyRound<'_, T> {
    fn drop(&mut self) {
        self.inner.pending.borrow_mut().clear();
        self.inner.notifying.set(false);
    }
}

/// Read-only view of a [`Signal`].
///
/// Handed out to consumers that may observe a value but must not write it.
pub struct ReadSignal<T> {
    signal: Signal<T>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadSignal").field(&self.signal).finish()
    }
}

impl<T: Clone + 'static> ReadSignal<T> {
    /// Current value (cloned).
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }

    /// Number of writes delivered so far.
    pub fn version(&self) -> u64 {
        self.signal.version()
    }

    /// Register an observer; see [`Signal::subscribe`].
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        self.signal.subscribe(observer)
    }
}

impl<T: Clone + 'static> From<&Signal<T>> for ReadSignal<T> {
    fn from(signal: &Signal<T>) -> Self {
        signal.read_only()
    }
}

impl<T: Clone + 'static> From<&ReadSignal<T>> for ReadSignal<T> {
    fn from(signal: &ReadSignal<T>) -> Self {
        signal.clone()
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn detach(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
