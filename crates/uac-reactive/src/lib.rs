//! Reactive primitives for the User Admin Console.
//!
//! This crate provides the single-threaded dataflow substrate the console's
//! list and form state is built on:
//!
//! - **Signals** (`signal`): observable value cells with synchronous,
//!   ordered notification
//! - **Scheduling** (`scheduler`): cancellable one-shot tasks on a cooperative
//!   loop, either driven by a virtual clock or by a tokio `LocalSet`
//! - **Debouncing** (`debounce`): a derived cell that lags its source by a
//!   quiet period
//!
//! Everything here is `!Send` on purpose: state lives in `Rc`/`RefCell` and
//! is only touched from the thread that owns the event loop.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Duration;
//! use uac_reactive::{Debounced, ManualScheduler, Signal};
//!
//! let scheduler = ManualScheduler::new();
//! let input = Signal::new(String::new());
//! let search = Debounced::new(&input, Duration::from_millis(400), Rc::new(scheduler.clone()));
//!
//! input.set("a".into());
//! input.set("an".into());
//! scheduler.advance(Duration::from_millis(400));
//! assert_eq!(search.value().get(), "an");
//! ```

mod debounce;
mod scheduler;
mod signal;

pub use debounce::{DEFAULT_DEBOUNCE, Debounced};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};
pub use signal::{ReadSignal, Signal, Subscription};
