use hs_core::HsError;
use hs_gateway::GatewayError;
use hs_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] HsError),

    #[error("actuator connection error: {0}")]
    Connection(#[from] GatewayError),

    #[error("scheduler error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("this simulation has already been run")]
    AlreadyRun,
}

pub type SimResult<T> = Result<T, SimError>;
