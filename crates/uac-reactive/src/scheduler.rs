//! Cooperative one-shot task scheduling.
//!
//! A [`Scheduler`] runs a task once after a delay, on the same thread that
//! scheduled it. Two implementations are provided:
//!
//! - [`ManualScheduler`] - a virtual clock advanced explicitly by the caller.
//!   Deterministic; used by tests and by the CLI's keystroke replay.
//! - [`TokioScheduler`] - `tokio::task::spawn_local` plus `tokio::time::sleep`.
//!   Must be used from inside a `tokio::task::LocalSet`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Schedules cancellable one-shot tasks on a cooperative loop.
pub trait Scheduler {
    /// Run `task` once, `delay` from now, unless the returned handle is
    /// cancelled first.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskStatus {
    Pending,
    Done,
    Cancelled,
}

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task.
pub struct TaskHandle {
    status: Rc<Cell<TaskStatus>>,
    abort: Option<AbortHandle>,
}

impl TaskHandle {
    /// Cancel the task if it has not run yet.
    pub fn cancel(&self) {
        if self.status.get() == TaskStatus::Pending {
            self.status.set(TaskStatus::Cancelled);
        }
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    /// Whether the task is still waiting to run.
    pub fn is_pending(&self) -> bool {
        self.status.get() == TaskStatus::Pending
    }

    /// Whether the task was cancelled before it ran.
    pub fn is_cancelled(&self) -> bool {
        self.status.get() == TaskStatus::Cancelled
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("status", &self.status.get())
            .finish()
    }
}

/// Wrap `task` so it only runs while its status is still pending.
fn guarded(task: Box<dyn FnOnce()>) -> (Rc<Cell<TaskStatus>>, impl FnOnce()) {
    let status = Rc::new(Cell::new(TaskStatus::Pending));
    let run_status = Rc::clone(&status);
    let run = move || {
        if run_status.get() != TaskStatus::Pending {
            return;
        }
        run_status.set(TaskStatus::Done);
        task();
    };
    (status, run)
}

// =============================================================================
// MANUAL SCHEDULER
// =============================================================================

struct QueuedTask {
    status: Rc<Cell<TaskStatus>>,
    run: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualInner {
    now: Cell<Duration>,
    sequence: Cell<u64>,
    /// Keyed by (deadline, scheduling order) so ties run first-in first-out.
    queue: RefCell<BTreeMap<(Duration, u64), QueuedTask>>,
}

/// Scheduler driven by a virtual clock.
///
/// Time only moves when [`advance`](Self::advance) or
/// [`run_until_idle`](Self::run_until_idle) is called. Clones share the same
/// clock and queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<ManualInner>,
}

impl ManualScheduler {
    /// Create a scheduler whose clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Number of tasks still waiting to run (cancelled tasks excluded).
    pub fn pending(&self) -> usize {
        self.inner
            .queue
            .borrow()
            .values()
            .filter(|task| task.status.get() == TaskStatus::Pending)
            .count()
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Tasks scheduled by running tasks are also run if their deadline is
    /// within the window. Returns the number of tasks that ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let ran = self.run_due(Some(target));
        self.inner.now.set(target);
        ran
    }

    /// Run tasks until the queue is empty, moving the clock as needed.
    pub fn run_until_idle(&self) -> usize {
        self.run_due(None)
    }

    fn run_due(&self, until: Option<Duration>) -> usize {
        let mut ran = 0;
        loop {
            let next = {
                let mut queue = self.inner.queue.borrow_mut();
                let due = queue.first_key_value().map(|(&(deadline, _), _)| deadline);
                match due {
                    Some(deadline) if until.is_none_or(|limit| deadline <= limit) => {
                        queue.pop_first()
                    }
                    _ => None,
                }
            };
            let Some(((deadline, _), task)) = next else {
                break;
            };
            if deadline > self.now() {
                self.inner.now.set(deadline);
            }
            if task.status.get() == TaskStatus::Pending {
                (task.run)();
                ran += 1;
            }
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        let (status, run) = guarded(task);
        let sequence = self.inner.sequence.get();
        self.inner.sequence.set(sequence + 1);
        let deadline = self.now() + delay;
        let mut queue = self.inner.queue.borrow_mut();
        queue.retain(|_, queued| queued.status.get() == TaskStatus::Pending);
        queue.insert(
            (deadline, sequence),
            QueuedTask {
                status: Rc::clone(&status),
                run: Box::new(run),
            },
        );
        TaskHandle {
            status,
            abort: None,
        }
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

// =============================================================================
// TOKIO SCHEDULER
// =============================================================================

/// Scheduler backed by the current tokio `LocalSet`.
///
/// # Panics
///
/// `schedule` panics when called outside of a `LocalSet` context, like
/// `tokio::task::spawn_local` does.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        let (status, run) = guarded(task);
        let join = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            run();
        });
        TaskHandle {
            status,
            abort: Some(join.abort_handle()),
        }
    }
}
