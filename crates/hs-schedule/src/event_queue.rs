//! `EventQueue` — pending callbacks ordered by virtual time.
//!
//! # Ordering
//!
//! Events are keyed by the instant they fire.  Several events may share an
//! instant (two patients ordering at the same second, a timer and an
//! actuator reply landing together); those fire in the order they were
//! submitted.  This FIFO tie-break is what makes a run replayable under a
//! fixed seed.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert and O(log W) pop where W = number of
//! distinct pending instants.  A ward of 16 patients keeps at most a few
//! dozen timers alive, so the constant is tiny.

use std::collections::{BTreeMap, VecDeque};

use hs_core::SimTime;

/// A callback run when its instant is reached.
pub type Action = Box<dyn FnOnce()>;

/// A priority queue mapping instants → callbacks that must run at that instant.
#[derive(Default)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, VecDeque<Action>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run at `at`, after every action already queued
    /// for that same instant.
    pub fn push(&mut self, at: SimTime, action: Action) {
        self.inner.entry(at).or_default().push_back(action);
        self.total += 1;
    }

    /// Remove and return the earliest event, provided it fires strictly
    /// before `until`.
    pub fn pop_before(&mut self, until: SimTime) -> Option<(SimTime, Action)> {
        let mut entry = self.inner.first_entry()?;
        let at = *entry.key();
        if at >= until {
            return None;
        }
        let action = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        Some((at, action))
    }

    /// The earliest instant with at least one queued event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of events across all future instants.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future instants that have at least one event.
    pub fn instant_count(&self) -> usize {
        self.inner.len()
    }
}
