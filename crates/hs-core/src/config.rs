//! Run configuration.
//!
//! Built by the application (or deserialized with the `serde` feature) and
//! handed to the simulation builder, which calls [`RunConfig::validate`]
//! before creating any simulation state.

use crate::{HsError, HsResult, OrderId, PatientId, SimTime};

/// Real-time pacing of the virtual clock.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pacing {
    /// Wall-clock seconds per virtual second.  `1.0` runs in real time,
    /// `0.01` a hundred times faster.
    pub factor: f64,

    /// When `true`, falling more than one `factor` behind the wall clock
    /// aborts the run.  When `false`, the lag is logged and tolerated.
    pub strict: bool,
}

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Number of patients on the ward.  Patients are numbered `1..=patient_count`.
    pub patient_count: u32,

    /// Length of the run in virtual seconds.  Events at or after the horizon
    /// are not processed.
    pub horizon_secs: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Optional wall-clock pacing.  `None` runs as fast as possible.
    pub pacing: Option<Pacing>,

    /// How many orders the robot can serve at once.
    pub capacity: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            patient_count: 16,
            horizon_secs:  20.0 * 60.0,
            seed:          42,
            pacing:        None,
            capacity:      1,
        }
    }
}

impl RunConfig {
    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> HsResult<()> {
        if self.patient_count == 0 {
            return Err(HsError::Config("patient count must be positive".into()));
        }
        if self.patient_count > OrderId::MAX_PATIENT {
            return Err(HsError::Config(format!(
                "patient count {} exceeds {}; order ids would collide",
                self.patient_count,
                OrderId::MAX_PATIENT,
            )));
        }
        if !(self.horizon_secs.is_finite() && self.horizon_secs > 0.0) {
            return Err(HsError::Config(format!(
                "horizon must be a positive number of seconds, got {}",
                self.horizon_secs
            )));
        }
        if self.capacity == 0 {
            return Err(HsError::Config("robot capacity must be positive".into()));
        }
        if let Some(p) = &self.pacing {
            if !(p.factor.is_finite() && p.factor > 0.0) {
                return Err(HsError::Config(format!(
                    "pacing factor must be positive, got {}",
                    p.factor
                )));
            }
        }
        Ok(())
    }

    /// The instant at which the run stops.
    #[inline]
    pub fn horizon(&self) -> SimTime {
        SimTime::from_secs(self.horizon_secs)
    }

    /// Every patient on the ward, in ascending order.
    pub fn patients(&self) -> impl Iterator<Item = PatientId> + use<> {
        (1..=self.patient_count).map(PatientId)
    }
}
