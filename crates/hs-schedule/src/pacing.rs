//! Real-time pacing of the virtual clock.
//!
//! Before the executor advances virtual time to `t`, the pacer blocks until
//!
//!   wall_origin + (t - sim_origin) * factor
//!
//! The origin is taken the first time the pacer is consulted.  If the wall
//! clock is already past the target by more than one `factor` unit the run
//! is behind: a strict pacer reports [`ScheduleError::OutOfSync`], a lenient
//! one logs the lag and carries on.

use std::time::{Duration, Instant};

use hs_core::{Pacing, SimTime};
use tracing::warn;

use crate::{ScheduleError, ScheduleResult};

pub struct Pacer {
    pacing: Pacing,
    origin: Option<(Instant, SimTime)>,
}

impl Pacer {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing, origin: None }
    }

    /// Pin the wall/virtual origin explicitly instead of at first use.
    pub fn with_origin(pacing: Pacing, wall: Instant, sim: SimTime) -> Self {
        Self { pacing, origin: Some((wall, sim)) }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Block until the wall clock reaches the target for `at`.
    pub fn sync(&mut self, at: SimTime) -> ScheduleResult<()> {
        let (wall0, sim0) = *self.origin.get_or_insert_with(|| (Instant::now(), at));
        let offset = Duration::from_secs_f64((at.since(sim0) * self.pacing.factor).max(0.0));
        let target = wall0 + offset;
        let now = Instant::now();

        if target > now {
            spin_sleep::sleep(target - now);
            return Ok(());
        }

        let lag = now - target;
        if lag.as_secs_f64() > self.pacing.factor {
            if self.pacing.strict {
                return Err(ScheduleError::OutOfSync { lag });
            }
            warn!(?lag, at = %at, "simulation is running behind the wall clock");
        }
        Ok(())
    }
}
