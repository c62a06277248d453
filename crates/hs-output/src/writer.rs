//! The `OutputWriter` trait implemented by backend writers.

use crate::{CompletionRow, OrderEventRow, OutputResult, SummaryRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Append one order lifecycle event.
    fn write_event(&mut self, row: &OrderEventRow) -> OutputResult<()>;

    /// Append one completed order.
    fn write_completion(&mut self, row: &CompletionRow) -> OutputResult<()>;

    /// Write the end-of-run summary.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
