//! The `HospitalSim` struct and its run loop.

use std::cell::RefCell;

use hs_core::{Order, OrderKind, PatientRng, RunConfig};
use hs_gateway::{ActuationGateway, ActuatorLink};
use hs_schedule::{Executor, ResourceQueue, Scheduler};
use tracing::info;

use crate::desk::Desk;
use crate::{
    ArrivalModel, CompletionLog, RunReport, RunSummary, SimError, SimObserver, SimResult,
};

/// The ward: `patient_count` patients ordering food and linen from one robot.
///
/// # Run
///
/// ```text
/// ① start the actuator
/// ② spawn one generator per (kind, patient): all food first, then linen,
///    each in ascending patient order
/// ③ run the clock to the horizon
/// ④ count waiting and in-service orders, then abandon them
/// ⑤ pause the actuator and close the connection
/// ```
///
/// The remote scene is paused, not stopped, so it can be inspected after the
/// run; [`ActuatorLink::stop`] is left to the caller.
///
/// Create via [`HospitalSimBuilder`][crate::HospitalSimBuilder].  A sim runs
/// once; a second [`run`][Self::run] returns [`SimError::AlreadyRun`].
pub struct HospitalSim<G, A> {
    /// Run configuration.  Validated again when [`run`][Self::run] starts.
    pub config: RunConfig,

    scheduler: Scheduler,
    gateway:   G,
    arrivals:  A,
    ran:       bool,
}

impl<G, A> HospitalSim<G, A>
where
    G: ActuationGateway + ActuatorLink,
    A: ArrivalModel,
{
    pub(crate) fn new(config: RunConfig, scheduler: Scheduler, gateway: G, arrivals: A) -> Self {
        Self { config, scheduler, gateway, arrivals, ran: false }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// The run's clock.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the ward to the horizon and report what happened.
    ///
    /// The actuator is paused and finished even when the run fails part-way.
    /// An invalid `config` fails before the actuator is started.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunReport> {
        if self.ran {
            return Err(SimError::AlreadyRun);
        }
        self.config.validate()?;
        self.ran = true;

        let robot = ResourceQueue::new(self.config.capacity)?;
        self.gateway.start()?;
        info!(
            patients = self.config.patient_count,
            capacity = self.config.capacity,
            horizon = %self.config.horizon().clock(),
            "simulation started at {}",
            self.scheduler.now().clock()
        );

        let log = RefCell::new(CompletionLog::new());
        let failures = RefCell::new(Vec::new());
        let observer = RefCell::new(observer);

        let outcome = {
            let desk = Desk {
                scheduler: self.scheduler.clone(),
                robot:     robot.clone(),
                gateway:   &self.gateway,
                log:       &log,
                failures:  &failures,
                observer:  &observer,
            };
            let mut executor = Executor::with_scheduler(self.scheduler.clone());
            if let Some(pacing) = self.config.pacing {
                executor = executor.pacing(pacing);
            }

            for kind in OrderKind::ALL {
                for patient in self.config.patients() {
                    let order = Order::new(patient, kind);
                    let rng = PatientRng::new(self.config.seed, order);
                    executor.spawn(desk.generate(&self.arrivals, order, rng));
                }
            }

            let outcome = executor.run(self.config.horizon());
            // Count before cancelling: abandoning a task frees its place.
            let waiting = robot.queue_len();
            let in_service = robot.in_service();
            executor.cancel_all();
            outcome.map(|stats| (stats, waiting, in_service))
        };

        let paused = self.gateway.pause();
        self.gateway.finish();
        let (stats, waiting, in_service) = outcome?;
        paused?;

        let log = log.into_inner();
        let failures = failures.into_inner();
        let summary = RunSummary {
            completed_food:  log.count(OrderKind::Food),
            completed_linen: log.count(OrderKind::Linen),
            waiting,
            in_service,
            failed:          failures.len(),
            peak_in_service: robot.peak_in_service(),
            end:             stats.end,
        };
        info!(
            completed = summary.completed(),
            unprocessed = summary.unprocessed(),
            failed = summary.failed,
            events = stats.events,
            "simulation ended at {}",
            summary.end.clock()
        );

        let report = RunReport { summary, log, failures };
        observer.into_inner().on_sim_end(&report);
        Ok(report)
    }
}
