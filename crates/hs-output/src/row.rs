//! Plain data row types written by output backends.

use hs_core::{OrderId, OrderKind, PatientId, SimTime};
use hs_sim::{CompletionRecord, RunSummary};

/// How far an order got when an [`OrderEventRow`] was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ordered,
    Processing,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Ordered    => "ordered",
            Stage::Processing => "processing",
            Stage::Done       => "done",
            Stage::Failed     => "failed",
        }
    }
}

/// One step in the life of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderEventRow {
    pub time:     SimTime,
    pub order_id: OrderId,
    pub patient:  PatientId,
    pub kind:     OrderKind,
    pub stage:    Stage,
}

/// One completed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionRow {
    pub patient:      PatientId,
    pub kind:         OrderKind,
    pub arrival:      SimTime,
    pub queue_wait:   f64,
    pub service_time: f64,
}

impl From<&CompletionRecord> for CompletionRow {
    fn from(r: &CompletionRecord) -> Self {
        Self {
            patient:      r.patient,
            kind:         r.kind,
            arrival:      r.arrival,
            queue_wait:   r.queue_wait,
            service_time: r.service_time,
        }
    }
}

/// End-of-run counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub end:             SimTime,
    pub completed_food:  u64,
    pub completed_linen: u64,
    pub waiting:         u64,
    pub in_service:      u64,
    pub failed:          u64,
    pub peak_in_service: u64,
}

impl From<&RunSummary> for SummaryRow {
    fn from(s: &RunSummary) -> Self {
        Self {
            end:             s.end,
            completed_food:  s.completed_food as u64,
            completed_linen: s.completed_linen as u64,
            waiting:         s.waiting as u64,
            in_service:      s.in_service as u64,
            failed:          s.failed as u64,
            peak_in_service: s.peak_in_service as u64,
        }
    }
}
