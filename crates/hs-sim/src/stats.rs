//! Per-order timing records and the end-of-run report.

use std::fmt;

use hs_core::{OrderKind, PatientId, SimTime, clock_time};

use crate::OrderFailure;

// ── CompletionRecord ──────────────────────────────────────────────────────────

/// Timing of one order that went all the way through the robot.
///
/// `arrival + queue_wait` is when the robot took the order and
/// `arrival + queue_wait + service_time` when it released it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionRecord {
    pub patient:      PatientId,
    pub kind:         OrderKind,
    pub arrival:      SimTime,
    pub queue_wait:   f64,
    pub service_time: f64,
}

impl CompletionRecord {
    pub fn start(&self) -> SimTime {
        self.arrival + self.queue_wait
    }

    pub fn completion(&self) -> SimTime {
        self.start() + self.service_time
    }
}

impl fmt::Display for CompletionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {:.3}, {:.3})",
            self.patient.0,
            self.kind,
            clock_time(self.arrival.as_secs()),
            self.queue_wait,
            self.service_time,
        )
    }
}

// ── CompletionLog ─────────────────────────────────────────────────────────────

/// Append-only log of completed orders, in completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionLog {
    records: Vec<CompletionRecord>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: CompletionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CompletionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompletionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Completed orders of `kind`.
    pub fn count(&self, kind: OrderKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a CompletionLog {
    type Item = &'a CompletionRecord;
    type IntoIter = std::slice::Iter<'a, CompletionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Counts taken when the horizon is reached, before unfinished work is
/// abandoned.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub completed_food:  usize,
    pub completed_linen: usize,
    /// Orders queued for the robot at the horizon.
    pub waiting:         usize,
    /// Orders the robot was working on at the horizon.
    pub in_service:      usize,
    /// Orders dropped after a gateway error.
    pub failed:          usize,
    /// Most orders the robot ever held at once.
    pub peak_in_service: usize,
    pub end:             SimTime,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.completed_food + self.completed_linen
    }

    /// Orders placed but not completed by the horizon, excluding failures.
    pub fn unprocessed(&self) -> usize {
        self.waiting + self.in_service
    }
}

// ── RunReport ─────────────────────────────────────────────────────────────────

/// Everything a finished run produced.
///
/// `Display` renders the console report:
///
/// ```text
/// Simulation ended at 00:20:00
/// Food orders processed = 7
/// Linen orders processed = 5
/// Orders not processed = 3
/// Orders failed = 0
///
/// The data of the processed orders are as follows:
/// (Patient ID, Type of order, Arrival time, Time in queue, Time processing)
/// (4, food, 00:03:12, 0.000, 21.503)
/// ```
#[derive(Debug)]
pub struct RunReport {
    pub summary:  RunSummary,
    pub log:      CompletionLog,
    pub failures: Vec<OrderFailure>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Simulation ended at {}", s.end.clock())?;
        writeln!(f, "Food orders processed = {}", s.completed_food)?;
        writeln!(f, "Linen orders processed = {}", s.completed_linen)?;
        writeln!(f, "Orders not processed = {}", s.unprocessed())?;
        writeln!(f, "Orders failed = {}", s.failed)?;
        writeln!(f)?;
        writeln!(f, "The data of the processed orders are as follows:")?;
        writeln!(f, "(Patient ID, Type of order, Arrival time, Time in queue, Time processing)")?;
        for record in &self.log {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}
