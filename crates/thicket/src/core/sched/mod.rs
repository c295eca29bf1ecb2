//! A single-threaded cooperative task runtime.
//!
//! Tasks are futures polled by [`Scheduler::run`]. A task runs without
//! interruption until it awaits [`Scheduler::sleep`] or
//! [`Scheduler::yield_once`]. Ready tasks run in FIFO order; sleeping tasks
//! wake in `(deadline, sequence)` order, so tasks that sleep until the same
//! instant resume in the order they went to sleep.

/// Time sources.
mod clock;
/// Task records and handles.
mod task;

use std::{
    cell::{Cell, RefCell},
    cmp::Ordering,
    collections::{BinaryHeap, VecDeque},
    fmt,
    future::Future,
    panic::{self, AssertUnwindSafe},
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
    time::{Duration, Instant},
};

pub use clock::{Clock, SystemClock};
use task::{Slot, Task};
pub use task::{Computation, TaskHandle, TaskId};

use crate::error::{Error, Result};

/// A task waiting for its deadline.
struct Sleeper {
    /// Wake time.
    deadline: Instant,
    /// Tie-breaker assigned when the task went to sleep.
    seq: u64,
    /// The sleeping task.
    task: Task,
}

impl PartialEq for Sleeper {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Sleeper {}

/// Reverse order so the earliest deadline is at the top of the heap.
impl PartialOrd for Sleeper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so the earliest deadline is at the top of the heap.
impl Ord for Sleeper {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.deadline, other.seq).cmp(&(self.deadline, self.seq))
    }
}

/// Shared scheduler state.
struct Inner {
    /// Tasks eligible to run now.
    ready: RefCell<VecDeque<Task>>,
    /// Tasks waiting for a deadline.
    sleeping: RefCell<BinaryHeap<Sleeper>>,
    /// The task currently being polled.
    current: Cell<Option<TaskId>>,
    /// Deadline requested by the current task's pending sleep.
    suspension: Cell<Option<Instant>>,
    /// Next sleep sequence number.
    next_seq: Cell<u64>,
    /// Next task identifier.
    next_id: Cell<u64>,
    /// Set by shutdown; honored after the current step.
    stopping: Cell<bool>,
    /// Time source.
    clock: Box<dyn Clock>,
}

/// The cooperative scheduler. Clones share the same queues.
#[derive(Clone)]
pub struct Scheduler {
    /// Shared state.
    inner: Rc<Inner>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ready, sleeping) = self.pending();
        f.debug_struct("Scheduler")
            .field("ready", &ready)
            .field("sleeping", &sleeping)
            .field("current", &self.inner.current.get())
            .finish()
    }
}

impl Scheduler {
    /// A scheduler running on wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// A scheduler driven by the given clock.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                ready: RefCell::new(VecDeque::new()),
                sleeping: RefCell::new(BinaryHeap::new()),
                current: Cell::new(None),
                suspension: Cell::new(None),
                next_seq: Cell::new(0),
                next_id: Cell::new(0),
                stopping: Cell::new(false),
                clock: Box::new(clock),
            }),
        }
    }

    /// The scheduler's current time.
    pub fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    /// Allocate a task identifier.
    fn next_id(&self) -> TaskId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        TaskId(id)
    }

    /// Allocate a sleep sequence number.
    fn next_seq(&self) -> u64 {
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);
        seq
    }

    /// Place a slot on the ready queue as a new task.
    fn enqueue(&self, computation: Slot, daemon: bool) -> TaskHandle {
        let (task, handle) = Task::new(self.next_id(), computation, daemon);
        tracing::debug!(task = %task.id, daemon, "spawn");
        self.inner.ready.borrow_mut().push_back(task);
        handle
    }

    /// Enqueue a computation on the ready queue.
    pub fn spawn(&self, fut: impl Future<Output = Result<()>> + 'static) -> TaskHandle {
        self.enqueue(Rc::new(RefCell::new(Some(Box::pin(fut)))), false)
    }

    /// Enqueue a background computation. Daemons are not counted by
    /// [`Scheduler::has_foreground_work`], so they can end themselves once
    /// nothing else is left.
    pub fn spawn_daemon(&self, fut: impl Future<Output = Result<()>> + 'static) -> TaskHandle {
        self.enqueue(Rc::new(RefCell::new(Some(Box::pin(fut)))), true)
    }

    /// Spawn several computations at once, in order.
    pub fn run_soon<I>(&self, computations: I) -> Vec<TaskHandle>
    where
        I: IntoIterator<Item = Computation>,
    {
        computations
            .into_iter()
            .map(|c| self.enqueue(Rc::new(RefCell::new(Some(c))), false))
            .collect()
    }

    /// Call `callback` now and then once every `delay`, `count` times or
    /// forever. A zero delay repeats once per scheduler pass. An error from
    /// the callback ends the task.
    pub fn interval<F>(&self, delay: Duration, count: Option<usize>, mut callback: F) -> TaskHandle
    where
        F: FnMut() -> Result<()> + 'static,
    {
        let sched = self.clone();
        self.spawn(async move {
            let mut n = 0;
            while count.is_none_or(|c| n < c) {
                callback()?;
                n += 1;
                if delay.is_zero() {
                    sched.yield_once().await;
                } else {
                    sched.sleep(delay).await;
                }
            }
            Ok::<(), Error>(())
        })
    }

    /// Cancel a task. Equivalent to [`TaskHandle::cancel`].
    pub fn cancel(&self, handle: &TaskHandle) {
        handle.cancel();
    }

    /// Wrap a canceled task's computation in a new task on the ready queue.
    /// A task may be rescheduled only once; reschedule the returned handle to
    /// do it again.
    pub fn reschedule(&self, handle: &TaskHandle) -> Result<TaskHandle> {
        if !handle.flags.canceled.get() {
            return Err(Error::Schedule(format!("{} is not canceled", handle.id())));
        }
        if handle.flags.rescheduled.get() {
            return Err(Error::Schedule(format!(
                "{} was already rescheduled",
                handle.id()
            )));
        }
        if handle.flags.finished.get() {
            return Err(Error::Schedule(format!("{} already finished", handle.id())));
        }
        handle.flags.rescheduled.set(true);
        let next = self.enqueue(handle.computation.clone(), handle.daemon);
        tracing::debug!(from = %handle.id(), to = %next.id(), "reschedule");
        Ok(next)
    }

    /// Suspend the calling task for `duration`.
    pub fn sleep(&self, duration: Duration) -> Sleep {
        Sleep {
            sched: self.clone(),
            duration,
            suspended: false,
        }
    }

    /// Suspend the calling task and requeue it at the back of the ready
    /// queue.
    pub fn yield_once(&self) -> YieldOnce {
        YieldOnce { suspended: false }
    }

    /// Ask the driver to stop. After the current step both queues are
    /// cleared and [`Scheduler::run`] returns.
    pub fn shutdown(&self) {
        tracing::debug!("shutdown requested");
        self.inner.stopping.set(true);
    }

    /// The task currently being polled, if any.
    pub fn current(&self) -> Option<TaskId> {
        self.inner.current.get()
    }

    /// Number of (ready, sleeping) tasks, including canceled tasks that have
    /// not been discarded yet.
    pub fn pending(&self) -> (usize, usize) {
        (
            self.inner.ready.borrow().len(),
            self.inner.sleeping.borrow().len(),
        )
    }

    /// Are both queues empty?
    pub fn is_idle(&self) -> bool {
        self.pending() == (0, 0)
    }

    /// Is any live, non-daemon task queued?
    pub fn has_foreground_work(&self) -> bool {
        self.inner.ready.borrow().iter().any(Task::is_foreground)
            || self
                .inner
                .sleeping
                .borrow()
                .iter()
                .any(|s| s.task.is_foreground())
    }

    /// Spawn `computations`, then drive tasks until none remain ready or
    /// sleeping, or until [`Scheduler::shutdown`] is called.
    pub fn run<I>(&self, computations: I)
    where
        I: IntoIterator<Item = Computation>,
    {
        self.run_soon(computations);
        self.drive();
    }

    /// The driver loop.
    fn drive(&self) {
        let inner = &self.inner;
        loop {
            if inner.stopping.replace(false) {
                inner.ready.borrow_mut().clear();
                inner.sleeping.borrow_mut().clear();
                tracing::debug!("scheduler stopped");
                break;
            }
            let now = inner.clock.now();
            self.wake(now);

            let next = inner.ready.borrow_mut().pop_front();
            let task = match next {
                Some(t) => t,
                None => {
                    let Some(s) = inner.sleeping.borrow_mut().pop() else {
                        break;
                    };
                    tracing::trace!(task = %s.task.id, "blocking until deadline");
                    inner.clock.sleep_until(s.deadline);
                    s.task
                }
            };

            if task.flags.canceled.get() {
                tracing::debug!(task = %task.id, "drop canceled");
                continue;
            }
            self.step(task);
        }
    }

    /// Move every sleeper whose deadline has passed onto the ready queue.
    fn wake(&self, now: Instant) {
        let mut sleeping = self.inner.sleeping.borrow_mut();
        let mut ready = self.inner.ready.borrow_mut();
        while sleeping.peek().is_some_and(|s| s.deadline <= now) {
            if let Some(s) = sleeping.pop() {
                ready.push_back(s.task);
            }
        }
    }

    /// Resume one task by a single step and requeue it if it suspended.
    fn step(&self, task: Task) {
        let inner = &self.inner;
        inner.current.set(Some(task.id));
        inner.suspension.set(None);

        let outcome = {
            let mut slot = task.computation.borrow_mut();
            let Some(fut) = slot.as_mut() else {
                inner.current.set(None);
                return;
            };
            let mut cx = Context::from_waker(Waker::noop());
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| fut.as_mut().poll(&mut cx)));
            if !matches!(outcome, Ok(Poll::Pending)) {
                *slot = None;
            }
            outcome
        };
        inner.current.set(None);

        match outcome {
            Ok(Poll::Ready(Ok(()))) => {
                task.flags.finished.set(true);
                tracing::debug!(task = %task.id, "complete");
            }
            Ok(Poll::Ready(Err(e))) => {
                task.flags.finished.set(true);
                tracing::warn!(task = %task.id, error = %e, "task failed");
            }
            Err(payload) => {
                task.flags.finished.set(true);
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                tracing::warn!(task = %task.id, panic = %msg, "task panicked");
            }
            Ok(Poll::Pending) => {
                if task.flags.canceled.get() {
                    tracing::debug!(task = %task.id, "drop canceled");
                } else if let Some(deadline) = inner.suspension.take() {
                    let seq = self.next_seq();
                    tracing::trace!(task = %task.id, seq, "sleep");
                    inner.sleeping.borrow_mut().push(Sleeper {
                        deadline,
                        seq,
                        task,
                    });
                } else {
                    inner.ready.borrow_mut().push_back(task);
                }
            }
        }
    }
}

/// Future returned by [`Scheduler::sleep`].
#[must_use = "futures do nothing unless awaited"]
pub struct Sleep {
    /// Scheduler that receives the deadline.
    sched: Scheduler,
    /// Requested delay.
    duration: Duration,
    /// Whether the suspension has been handed to the driver.
    suspended: bool,
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.suspended {
            return Poll::Ready(());
        }
        self.suspended = true;
        let deadline = self.sched.now() + self.duration;
        self.sched.inner.suspension.set(Some(deadline));
        Poll::Pending
    }
}

/// Future returned by [`Scheduler::yield_once`].
#[must_use = "futures do nothing unless awaited"]
pub struct YieldOnce {
    /// Whether the task has already given up its turn.
    suspended: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.suspended {
            Poll::Ready(())
        } else {
            self.suspended = true;
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::clock::ManualClock;

    type Log = Rc<RefCell<Vec<String>>>;

    fn setup() -> (Scheduler, ManualClock, Log) {
        let clock = ManualClock::new();
        (
            Scheduler::with_clock(clock.clone()),
            clock,
            Rc::new(RefCell::new(vec![])),
        )
    }

    fn explode() -> Result<()> {
        panic!("kaboom")
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn sleeper(s: &Scheduler, log: &Log, d: Duration, name: &str) -> Computation {
        let (s, log, name) = (s.clone(), log.clone(), name.to_string());
        Box::pin(async move {
            s.sleep(d).await;
            log.borrow_mut().push(name);
            Ok(())
        })
    }

    #[test]
    fn shorter_sleep_finishes_first() {
        let (s, clock, log) = setup();
        s.run([
            sleeper(&s, &log, ms(100), "a"),
            sleeper(&s, &log, ms(50), "b"),
        ]);
        assert_eq!(*log.borrow(), vec!["b", "a"]);
        assert_eq!(clock.elapsed(), ms(100));
        assert!(s.is_idle());
    }

    #[test]
    fn equal_deadlines_keep_sleep_order() {
        let (s, _, log) = setup();
        s.run([
            sleeper(&s, &log, ms(10), "a"),
            sleeper(&s, &log, ms(10), "b"),
            sleeper(&s, &log, ms(10), "c"),
        ]);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn yield_interleaves_fifo() {
        let (s, _, log) = setup();
        let mk = |name: &'static str| -> Computation {
            let (s, log) = (s.clone(), log.clone());
            Box::pin(async move {
                for i in 0..3 {
                    log.borrow_mut().push(format!("{name}{i}"));
                    s.yield_once().await;
                }
                Ok(())
            })
        };
        s.run([mk("x"), mk("y")]);
        assert_eq!(*log.borrow(), vec!["x0", "y0", "x1", "y1", "x2", "y2"]);
    }

    #[test]
    fn canceled_sleeper_never_resumes() {
        let (s, _, log) = setup();
        let h = s.spawn({
            let (s, log) = (s.clone(), log.clone());
            async move {
                log.borrow_mut().push("start".into());
                s.sleep(ms(100)).await;
                log.borrow_mut().push("never".into());
                Ok(())
            }
        });
        s.spawn({
            let (s, h) = (s.clone(), h.clone());
            async move {
                s.sleep(ms(10)).await;
                h.cancel();
                Ok(())
            }
        });
        s.run([]);
        assert_eq!(*log.borrow(), vec!["start"]);
        assert!(h.is_canceled());
        assert!(!h.is_finished());
        assert!(s.is_idle());
    }

    #[test]
    fn cancel_before_first_step() {
        let (s, _, log) = setup();
        let h = s.spawn({
            let log = log.clone();
            async move {
                log.borrow_mut().push("ran".into());
                Ok(())
            }
        });
        s.cancel(&h);
        s.run([]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn reschedule_rules() -> Result<()> {
        let (s, _, log) = setup();
        let h = s.spawn({
            let (s, log) = (s.clone(), log.clone());
            async move {
                for i in 0..3 {
                    log.borrow_mut().push(format!("{i}"));
                    s.yield_once().await;
                }
                Ok(())
            }
        });
        assert!(matches!(s.reschedule(&h), Err(Error::Schedule(_))));

        h.cancel();
        let h2 = s.reschedule(&h)?;
        assert_ne!(h.id(), h2.id());
        assert!(matches!(s.reschedule(&h), Err(Error::Schedule(_))));

        s.run([]);
        assert_eq!(*log.borrow(), vec!["0", "1", "2"]);
        assert!(h2.is_finished());

        h2.cancel();
        assert!(matches!(s.reschedule(&h2), Err(Error::Schedule(_))));
        Ok(())
    }

    #[test]
    fn reschedule_resumes_where_it_stopped() -> Result<()> {
        let (s, _, log) = setup();
        let h = s.spawn({
            let (s, log) = (s.clone(), log.clone());
            async move {
                log.borrow_mut().push("one".into());
                s.sleep(ms(5)).await;
                log.borrow_mut().push("two".into());
                Ok(())
            }
        });
        s.spawn({
            let (s, h) = (s.clone(), h.clone());
            async move {
                h.cancel();
                s.sleep(ms(50)).await;
                s.reschedule(&h)?;
                Ok::<(), Error>(())
            }
        });
        s.run([]);
        assert_eq!(*log.borrow(), vec!["one", "two"]);
        Ok(())
    }

    #[test]
    fn errors_and_panics_are_isolated() {
        let (s, _, log) = setup();
        let failing = s.spawn(async { Err::<(), _>(Error::Task("boom".into())) });
        let panicking = s.spawn(async { explode() });
        s.run([sleeper(&s, &log, ms(1), "survivor")]);
        assert_eq!(*log.borrow(), vec!["survivor"]);
        assert!(failing.is_finished());
        assert!(panicking.is_finished());
    }

    #[test]
    fn interval_counts_and_stops() {
        let (s, clock, log) = setup();
        let l = log.clone();
        s.interval(ms(10), Some(3), move || {
            l.borrow_mut().push("tick".into());
            Ok(())
        });
        s.run([]);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(clock.elapsed(), ms(30));
    }

    #[test]
    fn interval_error_ends_task() {
        let (s, _, log) = setup();
        let l = log.clone();
        let h = s.interval(Duration::ZERO, None, move || {
            l.borrow_mut().push("tick".into());
            if l.borrow().len() == 2 {
                return Err(Error::Task("enough".into()));
            }
            Ok(())
        });
        s.run([]);
        assert_eq!(log.borrow().len(), 2);
        assert!(h.is_finished());
    }

    #[test]
    fn shutdown_clears_queues() {
        let (s, _, log) = setup();
        s.spawn({
            let s = s.clone();
            async move {
                s.shutdown();
                Ok(())
            }
        });
        s.run([sleeper(&s, &log, ms(10), "late")]);
        assert!(log.borrow().is_empty());
        assert!(s.is_idle());
    }

    #[test]
    fn current_and_foreground() {
        let (s, _, log) = setup();
        let seen = Rc::new(Cell::new(None));
        let h = s.spawn({
            let (s, seen) = (s.clone(), seen.clone());
            async move {
                seen.set(s.current());
                Ok(())
            }
        });
        s.spawn_daemon({
            let (s, log) = (s.clone(), log.clone());
            async move {
                while s.has_foreground_work() {
                    log.borrow_mut().push("refresh".into());
                    s.sleep(ms(10)).await;
                }
                Ok(())
            }
        });
        s.spawn({
            let s = s.clone();
            async move {
                s.sleep(ms(25)).await;
                Ok(())
            }
        });
        s.run([]);
        assert_eq!(seen.get(), Some(h.id()));
        assert_eq!(s.current(), None);
        assert_eq!(log.borrow().len(), 3);
    }
}
