//! The nurses' desk: order generators and the order processor.
//!
//! Each (patient, kind) pair runs one [`Desk::generate`] task:
//!
//! ```text
//! loop:
//!   delay ← ArrivalModel::next_delay      (None ends the task)
//!   sleep delay
//!   process the order, and wait for it before drawing again
//! ```
//!
//! Processing holds the robot from the gateway request until the reply's
//! processing time has elapsed in virtual time.

use std::cell::RefCell;
use std::fmt;

use hs_core::{Order, OrderEvent, OrderId, PatientRng, SimTime};
use hs_gateway::{ActuationGateway, GatewayError};
use hs_schedule::{ResourceQueue, Scheduler};
use tracing::{debug, info, warn};

use crate::{ArrivalModel, CompletionLog, CompletionRecord, SimObserver};

/// An order the gateway could not carry out.
#[derive(Debug)]
pub struct OrderFailure {
    pub event: OrderEvent,
    pub id:    OrderId,
    /// When the gateway gave up.
    pub at:    SimTime,
    pub cause: GatewayError,
}

impl fmt::Display for OrderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) placed at {} failed at {}: {}",
            self.event.order,
            self.id,
            self.event.arrival.clock(),
            self.at.clock(),
            self.cause,
        )
    }
}

/// State shared by every generator of one run.
pub(crate) struct Desk<'a, G, O> {
    pub scheduler: Scheduler,
    pub robot:     ResourceQueue,
    pub gateway:   &'a G,
    pub log:       &'a RefCell<CompletionLog>,
    pub failures:  &'a RefCell<Vec<OrderFailure>>,
    pub observer:  &'a RefCell<O>,
}

impl<G: ActuationGateway, O: SimObserver> Desk<'_, G, O> {
    /// Place orders of one kind for one patient until the model stops or the
    /// task is cancelled.
    pub async fn generate<A>(&self, arrivals: &A, order: Order, mut rng: PatientRng)
    where
        A: ArrivalModel + ?Sized,
    {
        while let Some(delay) = arrivals.next_delay(order, &mut rng) {
            if !(delay.is_finite() && delay >= 0.0) {
                warn!(%order, delay, "invalid interarrival delay; generator stopped");
                return;
            }
            self.scheduler.sleep(delay).await;

            let event = OrderEvent { order, arrival: self.scheduler.now() };
            info!(
                patient = order.patient.0,
                kind = %order.kind,
                at = %event.arrival.clock(),
                "*ORDER* patient ordered"
            );
            self.observer.borrow_mut().on_order_placed(&event);

            if let Err(failure) = self.process(event).await {
                warn!(%failure, "order failed");
                self.observer.borrow_mut().on_order_failed(&failure);
                self.failures.borrow_mut().push(failure);
            }
        }
        debug!(%order, "generator finished");
    }

    /// Run one order through the robot.
    pub async fn process(&self, event: OrderEvent) -> Result<CompletionRecord, OrderFailure> {
        let order = event.order;
        let permit = self.robot.acquire().await;

        let start = self.scheduler.now();
        info!(%order, at = %start.clock(), "processing order");
        self.observer.borrow_mut().on_service_start(&event, start);

        let id = order.id();
        let ptime = match self.gateway.request(id).await {
            Ok(ptime) => ptime,
            Err(cause) => {
                permit.release();
                return Err(OrderFailure { event, id, at: self.scheduler.now(), cause });
            }
        };
        self.scheduler.sleep(ptime).await;
        permit.release();

        let done = self.scheduler.now();
        info!(%order, at = %done.clock(), "robot is done with the order");

        let record = CompletionRecord {
            patient:      order.patient,
            kind:         order.kind,
            arrival:      event.arrival,
            queue_wait:   start.since(event.arrival),
            service_time: done.since(start),
        };
        self.log.borrow_mut().push(record);
        self.observer.borrow_mut().on_order_complete(&record);
        Ok(record)
    }
}
