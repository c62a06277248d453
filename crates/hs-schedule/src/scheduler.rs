//! The `Scheduler` handle: virtual clock, event submission, and the
//! time-based futures built on top of it.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use hs_core::SimTime;
use pin_project::pin_project;

use crate::event_queue::{Action, EventQueue};
use crate::Elapsed;

struct Shared {
    now:   Cell<SimTime>,
    queue: RefCell<EventQueue>,
}

/// A cheap, cloneable handle to the virtual clock and its event queue.
///
/// Every task that needs the time or wants to suspend for a while holds a
/// clone.  The handle is `!Send`: the whole simulation runs on one thread and
/// only yields at explicit suspension points.
#[derive(Clone)]
pub struct Scheduler(Rc<Shared>);

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// A fresh timeline starting at [`SimTime::ZERO`].
    pub fn new() -> Self {
        Scheduler(Rc::new(Shared {
            now:   Cell::new(SimTime::ZERO),
            queue: RefCell::new(EventQueue::new()),
        }))
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.0.now.get()
    }

    /// Run `action` `delay` virtual seconds from now.
    ///
    /// Negative delays are treated as zero; the action then runs at the
    /// current instant, after everything already queued for it.
    pub fn schedule(&self, delay: f64, action: impl FnOnce() + 'static) {
        debug_assert!(delay >= 0.0, "negative delay {delay}");
        self.schedule_at(self.now() + delay.max(0.0), action);
    }

    /// Run `action` at the absolute instant `at` (clamped to now).
    pub fn schedule_at(&self, at: SimTime, action: impl FnOnce() + 'static) {
        let at = at.max(self.now());
        self.0.queue.borrow_mut().push(at, Box::new(action));
    }

    /// A future that completes `delay` virtual seconds after it is first polled.
    pub fn sleep(&self, delay: f64) -> Sleep {
        Sleep {
            scheduler: self.clone(),
            delay,
            timer: None,
        }
    }

    /// Wrap `future` so that it yields `Err(Elapsed)` if it has not completed
    /// `delay` virtual seconds after the first poll.
    pub fn timeout<F: Future>(&self, delay: f64, future: F) -> Timeout<F> {
        Timeout {
            future,
            sleep: self.sleep(delay),
        }
    }

    /// Number of events not yet fired.
    pub fn pending_events(&self) -> usize {
        self.0.queue.borrow().len()
    }

    /// Earliest pending instant, if any.
    pub fn next_event_time(&self) -> Option<SimTime> {
        self.0.queue.borrow().next_time()
    }

    // ── Executor hooks ────────────────────────────────────────────────────

    pub(crate) fn pop_before(&self, until: SimTime) -> Option<(SimTime, Action)> {
        // The borrow ends before the caller runs the action, so actions may
        // schedule further events.
        self.0.queue.borrow_mut().pop_before(until)
    }

    pub(crate) fn advance_to(&self, at: SimTime) {
        debug_assert!(at >= self.now(), "clock rewound from {} to {at}", self.now());
        self.0.now.set(at.max(self.now()));
    }
}

// ── Sleep ─────────────────────────────────────────────────────────────────────

struct TimerSlot {
    fired: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

/// Future returned by [`Scheduler::sleep`].
///
/// The timer is registered on first poll, so a `Sleep` that is built but
/// never awaited does not occupy the event queue.  Dropping a registered
/// `Sleep` leaves a harmless no-op event behind.
pub struct Sleep {
    scheduler: Scheduler,
    delay:     f64,
    timer:     Option<Rc<TimerSlot>>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match &this.timer {
            None => {
                let slot = Rc::new(TimerSlot {
                    fired: Cell::new(false),
                    waker: RefCell::new(Some(cx.waker().clone())),
                });
                let fired = Rc::clone(&slot);
                this.scheduler.schedule(this.delay.max(0.0), move || {
                    fired.fired.set(true);
                    if let Some(waker) = fired.waker.borrow_mut().take() {
                        waker.wake();
                    }
                });
                this.timer = Some(slot);
                Poll::Pending
            }
            Some(slot) if slot.fired.get() => Poll::Ready(()),
            Some(slot) => {
                *slot.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

// ── Timeout ───────────────────────────────────────────────────────────────────

/// Future returned by [`Scheduler::timeout`].
#[pin_project]
pub struct Timeout<F> {
    #[pin]
    future: F,
    sleep:  Sleep,
}

impl<F: Future> Future for Timeout<F> {
    type Output = Result<F::Output, Elapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if let Poll::Ready(out) = this.future.poll(cx) {
            return Poll::Ready(Ok(out));
        }
        let after = this.sleep.delay;
        match Pin::new(this.sleep).poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(Elapsed { after })),
            Poll::Pending   => Poll::Pending,
        }
    }
}
