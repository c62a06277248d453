//! `ResourceQueue` — a FIFO mutual-exclusion queue over `capacity` slots.
//!
//! # Admission
//!
//! [`ResourceQueue::acquire`] grants a slot immediately only when one is free
//! *and* nobody is waiting; otherwise the caller joins the back of the queue.
//! When a [`Permit`] is dropped the slot goes straight to the head of the
//! queue, so a newcomer can never overtake a waiter.
//!
//! # Cancellation
//!
//! A waiter whose [`Acquire`] future is dropped leaves the queue.  If the
//! slot had already been handed to it, the slot is passed on to the next
//! waiter.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::{ScheduleError, ScheduleResult};

struct Waiter {
    granted: Cell<bool>,
    waker:   RefCell<Option<Waker>>,
}

struct Inner {
    capacity:        usize,
    in_service:      usize,
    peak_in_service: usize,
    waiters:         VecDeque<Rc<Waiter>>,
}

impl Inner {
    fn occupy(&mut self) {
        self.in_service += 1;
        self.peak_in_service = self.peak_in_service.max(self.in_service);
    }
}

/// A shared, cloneable handle to one capacity-constrained resource.
#[derive(Clone)]
pub struct ResourceQueue(Rc<RefCell<Inner>>);

impl ResourceQueue {
    pub fn new(capacity: usize) -> ScheduleResult<Self> {
        if capacity == 0 {
            return Err(ScheduleError::InvalidCapacity(capacity));
        }
        Ok(ResourceQueue(Rc::new(RefCell::new(Inner {
            capacity,
            in_service: 0,
            peak_in_service: 0,
            waiters: VecDeque::new(),
        }))))
    }

    /// Wait for a slot.  The slot is held until the returned [`Permit`] drops.
    pub fn acquire(&self) -> Acquire {
        Acquire {
            queue:  self.clone(),
            waiter: None,
            done:   false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.0.borrow().capacity
    }

    /// Callers currently waiting for a slot.
    pub fn queue_len(&self) -> usize {
        self.0.borrow().waiters.len()
    }

    /// Slots currently held.
    pub fn in_service(&self) -> usize {
        self.0.borrow().in_service
    }

    /// Highest number of slots ever held at once.
    pub fn peak_in_service(&self) -> usize {
        self.0.borrow().peak_in_service
    }

    fn release(&self) {
        let next = {
            let mut inner = self.0.borrow_mut();
            inner.in_service -= 1;
            let next = inner.waiters.pop_front();
            if next.is_some() {
                inner.occupy();
            }
            next
        };
        if let Some(waiter) = next {
            waiter.granted.set(true);
            if let Some(waker) = waiter.waker.borrow_mut().take() {
                waker.wake();
            }
        }
    }
}

/// Future returned by [`ResourceQueue::acquire`].
pub struct Acquire {
    queue:  ResourceQueue,
    waiter: Option<Rc<Waiter>>,
    done:   bool,
}

impl Future for Acquire {
    type Output = Permit;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Permit> {
        let this = self.get_mut();
        debug_assert!(!this.done, "Acquire polled after completion");

        match &this.waiter {
            None => {
                let mut inner = this.queue.0.borrow_mut();
                if inner.in_service < inner.capacity && inner.waiters.is_empty() {
                    inner.occupy();
                    drop(inner);
                    this.done = true;
                    return Poll::Ready(Permit { queue: this.queue.clone() });
                }
                let waiter = Rc::new(Waiter {
                    granted: Cell::new(false),
                    waker:   RefCell::new(Some(cx.waker().clone())),
                });
                inner.waiters.push_back(Rc::clone(&waiter));
                drop(inner);
                this.waiter = Some(waiter);
                Poll::Pending
            }
            Some(waiter) if waiter.granted.get() => {
                this.done = true;
                Poll::Ready(Permit { queue: this.queue.clone() })
            }
            Some(waiter) => {
                *waiter.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl Drop for Acquire {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let Some(waiter) = self.waiter.take() else {
            return;
        };
        if waiter.granted.get() {
            self.queue.release();
        } else {
            self.queue
                .0
                .borrow_mut()
                .waiters
                .retain(|w| !Rc::ptr_eq(w, &waiter));
        }
    }
}

/// Proof of holding one slot of a [`ResourceQueue`].  Releases on drop.
pub struct Permit {
    queue: ResourceQueue,
}

impl Permit {
    /// Release the slot now.
    pub fn release(self) {}
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.queue.release();
    }
}
