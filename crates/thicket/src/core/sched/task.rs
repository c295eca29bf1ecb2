use std::{
    cell::{Cell, RefCell},
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use crate::error::Result;

/// A suspended task body.
pub type Computation = Pin<Box<dyn Future<Output = Result<()>>>>;

/// Storage for a computation, shared between every task that wraps it.
pub(super) type Slot = Rc<RefCell<Option<Computation>>>;

/// A unique task identifier. Rescheduling a task produces a new identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(super) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Flags shared by a task and its handles.
#[derive(Debug, Default)]
pub(super) struct Flags {
    /// Set by cancellation; the driver drops the task when it next comes up.
    pub(super) canceled: Cell<bool>,
    /// Set once the computation has been handed to a new task.
    pub(super) rescheduled: Cell<bool>,
    /// Set when the computation completed, failed or panicked.
    pub(super) finished: Cell<bool>,
}

/// A scheduled unit of work as held in the ready queue or sleeping heap.
pub(super) struct Task {
    /// Identity.
    pub(super) id: TaskId,
    /// Shared cancellation and lifecycle flags.
    pub(super) flags: Rc<Flags>,
    /// The wrapped computation.
    pub(super) computation: Slot,
    /// Daemon tasks do not count as live work.
    pub(super) daemon: bool,
}

impl Task {
    /// Construct a task and a handle for it.
    pub(super) fn new(id: TaskId, computation: Slot, daemon: bool) -> (Self, TaskHandle) {
        let flags = Rc::new(Flags::default());
        let handle = TaskHandle {
            id,
            flags: flags.clone(),
            computation: computation.clone(),
            daemon,
        };
        (
            Self {
                id,
                flags,
                computation,
                daemon,
            },
            handle,
        )
    }

    /// Is this task still live work that keeps daemons running?
    pub(super) fn is_foreground(&self) -> bool {
        !self.daemon && !self.flags.canceled.get()
    }
}

/// A handle to a spawned task, used to cancel and reschedule it.
#[derive(Clone)]
pub struct TaskHandle {
    /// Identity of the task this handle refers to.
    id: TaskId,
    /// Flags shared with the task.
    pub(super) flags: Rc<Flags>,
    /// The computation, kept so that it can be rescheduled.
    pub(super) computation: Slot,
    /// Whether the task was spawned as a daemon.
    pub(super) daemon: bool,
}

impl TaskHandle {
    /// The task's identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Mark the task canceled. It is never resumed again.
    pub fn cancel(&self) {
        if !self.flags.canceled.replace(true) {
            tracing::debug!(task = %self.id, "cancel");
        }
    }

    /// Has the task been canceled?
    pub fn is_canceled(&self) -> bool {
        self.flags.canceled.get()
    }

    /// Has the task's computation run to completion (or failed)?
    pub fn is_finished(&self) -> bool {
        self.flags.finished.get()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("canceled", &self.flags.canceled.get())
            .field("rescheduled", &self.flags.rescheduled.get())
            .field("finished", &self.flags.finished.get())
            .finish()
    }
}
