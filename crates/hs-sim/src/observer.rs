//! Simulation observer trait for progress reporting and data collection.

use hs_core::{OrderEvent, SimTime};

use crate::{CompletionRecord, OrderFailure, RunReport};

/// Callbacks invoked by [`HospitalSim::run`][crate::HospitalSim::run] as
/// orders move through the ward.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — console log
///
/// ```rust,ignore
/// struct Console;
///
/// impl SimObserver for Console {
///     fn on_order_placed(&mut self, event: &OrderEvent) {
///         println!("*ORDER* {} at {}", event.order, event.arrival.clock());
///     }
/// }
/// ```
pub trait SimObserver {
    /// A patient placed an order.  It now waits for the robot.
    fn on_order_placed(&mut self, _event: &OrderEvent) {}

    /// The robot took the order at `at`.
    fn on_service_start(&mut self, _event: &OrderEvent, _at: SimTime) {}

    /// The robot finished the order.
    fn on_order_complete(&mut self, _record: &CompletionRecord) {}

    /// The gateway failed the order; the patient's generator moves on.
    fn on_order_failed(&mut self, _failure: &OrderFailure) {}

    /// Called once after the horizon, with the final report.
    fn on_sim_end(&mut self, _report: &RunReport) {}
}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_order_placed(&mut self, event: &OrderEvent) {
        (**self).on_order_placed(event);
    }

    fn on_service_start(&mut self, event: &OrderEvent, at: SimTime) {
        (**self).on_service_start(event, at);
    }

    fn on_order_complete(&mut self, record: &CompletionRecord) {
        (**self).on_order_complete(record);
    }

    fn on_order_failed(&mut self, failure: &OrderFailure) {
        (**self).on_order_failed(failure);
    }

    fn on_sim_end(&mut self, report: &RunReport) {
        (**self).on_sim_end(report);
    }
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
