//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `order_events.csv`
//! - `completions.csv`
//! - `summary.csv`
//!
//! Times are written both as seconds since the start of the run and as the
//! `HH:MM:SS` ward clock.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use hs_core::clock_time;

use crate::writer::OutputWriter;
use crate::{CompletionRow, OrderEventRow, OutputResult, SummaryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    events:      Writer<File>,
    completions: Writer<File>,
    summary:     Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files in it, and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join("order_events.csv"))?;
        events.write_record(["time_secs", "clock", "order_id", "patient", "kind", "stage"])?;

        let mut completions = Writer::from_path(dir.join("completions.csv"))?;
        completions.write_record([
            "patient", "kind", "arrival_secs", "arrival_clock", "queue_wait", "service_time",
        ])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record([
            "end_secs", "completed_food", "completed_linen", "waiting", "in_service",
            "failed", "peak_in_service",
        ])?;

        Ok(Self {
            events,
            completions,
            summary,
            finished: false,
        })
    }
}

fn secs(t: f64) -> String {
    format!("{t:.3}")
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &OrderEventRow) -> OutputResult<()> {
        self.events.write_record(&[
            secs(row.time.as_secs()),
            row.time.clock(),
            row.order_id.0.to_string(),
            row.patient.0.to_string(),
            row.kind.as_str().to_owned(),
            row.stage.as_str().to_owned(),
        ])?;
        Ok(())
    }

    fn write_completion(&mut self, row: &CompletionRow) -> OutputResult<()> {
        self.completions.write_record(&[
            row.patient.0.to_string(),
            row.kind.as_str().to_owned(),
            secs(row.arrival.as_secs()),
            clock_time(row.arrival.as_secs()),
            secs(row.queue_wait),
            secs(row.service_time),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            secs(row.end.as_secs()),
            row.completed_food.to_string(),
            row.completed_linen.to_string(),
            row.waiting.to_string(),
            row.in_service.to_string(),
            row.failed.to_string(),
            row.peak_in_service.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.completions.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
