//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use hs_core::{Order, OrderEvent, SimTime};
use hs_sim::{CompletionRecord, OrderFailure, RunReport, SimObserver};

use crate::row::{CompletionRow, OrderEventRow, Stage, SummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that streams order events and completions to any
/// [`OutputWriter`] backend and writes the summary when the run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn event(&mut self, event: &OrderEvent, time: SimTime, stage: Stage) {
        let row = OrderEventRow {
            time,
            order_id: event.order.id(),
            patient:  event.order.patient,
            kind:     event.order.kind,
            stage,
        };
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_order_placed(&mut self, event: &OrderEvent) {
        self.event(event, event.arrival, Stage::Ordered);
    }

    fn on_service_start(&mut self, event: &OrderEvent, at: SimTime) {
        self.event(event, at, Stage::Processing);
    }

    fn on_order_complete(&mut self, record: &CompletionRecord) {
        let event = OrderEvent {
            order:   Order::new(record.patient, record.kind),
            arrival: record.arrival,
        };
        self.event(&event, record.completion(), Stage::Done);
        let result = self.writer.write_completion(&CompletionRow::from(record));
        self.store_err(result);
    }

    fn on_order_failed(&mut self, failure: &OrderFailure) {
        self.event(&failure.event, failure.at, Stage::Failed);
    }

    fn on_sim_end(&mut self, report: &RunReport) {
        let result = self.writer.write_summary(&SummaryRow::from(&report.summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
