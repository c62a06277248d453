use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("the run lags behind the wall clock by {lag:?}")]
    OutOfSync { lag: Duration },

    #[error("resource capacity must be positive, got {0}")]
    InvalidCapacity(usize),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Returned by [`Timeout`][crate::Timeout] when the inner future did not
/// finish in time.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("deadline of {after} virtual seconds elapsed")]
pub struct Elapsed {
    pub after: f64,
}
