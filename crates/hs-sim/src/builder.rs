//! Fluent builder for constructing a [`HospitalSim`].

use hs_core::RunConfig;
use hs_gateway::{ActuationGateway, ActuatorLink, GatewayResult};
use hs_schedule::Scheduler;

use crate::{ArrivalModel, HospitalSim, SimResult, StandardArrivals};

/// Fluent builder for [`HospitalSim<G, A>`].
///
/// # Inputs
///
/// | Method            | Default                                         |
/// |-------------------|-------------------------------------------------|
/// | `new(config)`     | required                                        |
/// | `.arrivals(m)`    | [`StandardArrivals`]                            |
/// | `.build(connect)` | required: opens the gateway on the run's clock  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = HospitalSimBuilder::new(RunConfig::default())
///     .build(|scheduler| {
///         SignalGateway::connect(LoopbackActuator::fixed(30.0), scheduler, GatewayConfig::default())
///     })?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct HospitalSimBuilder<A> {
    config:   RunConfig,
    arrivals: A,
}

impl HospitalSimBuilder<StandardArrivals> {
    pub fn new(config: RunConfig) -> Self {
        Self { config, arrivals: StandardArrivals }
    }
}

impl<A: ArrivalModel> HospitalSimBuilder<A> {
    /// Replace the interarrival model.
    pub fn arrivals<B: ArrivalModel>(self, arrivals: B) -> HospitalSimBuilder<B> {
        HospitalSimBuilder { config: self.config, arrivals }
    }

    /// Validate the configuration, then open the gateway with `connect`.
    ///
    /// `connect` receives the scheduler the run will use, so gateways that
    /// wait in virtual time share the simulation's clock.  Nothing is
    /// connected if the configuration is invalid, and a connection failure
    /// is returned as [`SimError::Connection`][crate::SimError::Connection].
    pub fn build<G, F>(self, connect: F) -> SimResult<HospitalSim<G, A>>
    where
        G: ActuationGateway + ActuatorLink,
        F: FnOnce(Scheduler) -> GatewayResult<G>,
    {
        self.config.validate()?;
        let scheduler = Scheduler::new();
        let gateway = connect(scheduler.clone())?;
        Ok(HospitalSim::new(self.config, scheduler, gateway, self.arrivals))
    }
}
