//! Single-threaded cooperative executor driven by virtual time.
//!
//! # Loop
//!
//! ```text
//! loop:
//!   ① Poll    — poll every woken task, in wake order, until none is runnable.
//!   ② Pop     — take the earliest event strictly before `until`; stop if none.
//!   ③ Pace    — with pacing enabled, wait for the wall clock to catch up.
//!   ④ Advance — set the clock to the event's instant and run its callback
//!               (usually a timer waking a task).
//! ```
//!
//! Tasks borrow from the caller for `'a`, so a simulation can hand them
//! plain references to its gateway, log and observer.  Dropping the executor
//! (or calling [`Executor::cancel_all`]) drops every unfinished task; nothing
//! a cancelled task was doing is reported as complete.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

use crossbeam_channel::{Receiver, Sender};
use hs_core::{Pacing, SimTime};
use slab::Slab;
use tracing::debug;

use crate::pacing::Pacer;
use crate::{ScheduleResult, Scheduler};

type TaskFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

struct Task<'a> {
    future: TaskFuture<'a>,
    waker:  Waker,
}

/// Wakes a task by pushing its slab key onto the ready channel.
struct TaskWaker {
    key:   usize,
    ready: Sender<usize>,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        // The receiver lives as long as the executor; after that there is
        // nobody left to poll the task anyway.
        let _ = self.ready.send(self.key);
    }
}

/// Summary of one call to [`Executor::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Events fired (timers, actuator replies, plain callbacks).
    pub events: u64,
    /// Task polls performed.
    pub polls: u64,
    /// Clock value when the run stopped.
    pub end: SimTime,
}

pub struct Executor<'a> {
    scheduler: Scheduler,
    tasks:     Slab<Task<'a>>,
    ready_tx:  Sender<usize>,
    ready_rx:  Receiver<usize>,
    pacer:     Option<Pacer>,
}

impl<'a> Default for Executor<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Executor<'a> {
    /// An executor on a fresh timeline starting at zero.
    pub fn new() -> Self {
        Self::with_scheduler(Scheduler::new())
    }

    /// An executor driving an existing timeline.
    pub fn with_scheduler(scheduler: Scheduler) -> Self {
        let (ready_tx, ready_rx) = crossbeam_channel::unbounded();
        Self {
            scheduler,
            tasks: Slab::new(),
            ready_tx,
            ready_rx,
            pacer: None,
        }
    }

    /// Pace virtual time against the wall clock.
    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.pacer = Some(Pacer::new(pacing));
        self
    }

    /// A handle to this executor's clock and event queue.
    pub fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    /// Current virtual time.
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Number of tasks that have not finished yet.
    pub fn live_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Add a task.  It is first polled on the next [`run`][Self::run], after
    /// every task spawned before it.
    pub fn spawn(&mut self, future: impl Future<Output = ()> + 'a) {
        let entry = self.tasks.vacant_entry();
        let key = entry.key();
        let waker = Waker::from(Arc::new(TaskWaker {
            key,
            ready: self.ready_tx.clone(),
        }));
        entry.insert(Task {
            future: Box::pin(future),
            waker,
        });
        let _ = self.ready_tx.send(key);
    }

    /// Process events until the first one at or after `until`, then set the
    /// clock to `until`.
    ///
    /// Unfinished tasks stay suspended; a later `run` with a further horizon
    /// resumes them.
    pub fn run(&mut self, until: SimTime) -> ScheduleResult<RunStats> {
        let mut stats = RunStats { events: 0, polls: 0, end: self.now() };

        loop {
            stats.polls += self.poll_ready();

            let Some((at, action)) = self.scheduler.pop_before(until) else {
                break;
            };
            if let Some(pacer) = &mut self.pacer {
                pacer.sync(at)?;
            }
            self.scheduler.advance_to(at);
            action();
            stats.events += 1;
        }

        if self.now() < until {
            if let Some(pacer) = &mut self.pacer {
                pacer.sync(until)?;
            }
            self.scheduler.advance_to(until);
        }
        stats.end = self.now();
        debug!(
            events = stats.events,
            polls = stats.polls,
            live_tasks = self.tasks.len(),
            end = %stats.end,
            "executor stopped"
        );
        Ok(stats)
    }

    /// Drop every unfinished task.
    pub fn cancel_all(&mut self) {
        let cancelled = self.tasks.len();
        // Dropping a task can release resources and wake other tasks; drain
        // the resulting wake-ups so they do not leak into a later run.
        self.tasks.clear();
        while self.ready_rx.try_recv().is_ok() {}
        if cancelled > 0 {
            debug!(cancelled, "cancelled unfinished tasks");
        }
    }

    fn poll_ready(&mut self) -> u64 {
        let mut polls = 0;
        while let Ok(key) = self.ready_rx.try_recv() {
            // Stale wake-up for a task that already finished.
            let Some(Task { future, waker }) = self.tasks.get_mut(key) else {
                continue;
            };
            let mut cx = Context::from_waker(waker);
            polls += 1;
            if let Poll::Ready(()) = future.as_mut().poll(&mut cx) {
                self.tasks.remove(key);
            }
        }
        polls
    }
}

impl Drop for Executor<'_> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
