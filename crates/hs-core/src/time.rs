//! Simulation time model.
//!
//! # Design
//!
//! Virtual time is a count of seconds since the start of the run, held in an
//! `f64`.  Interarrival draws and actuator replies are continuous, so unlike
//! an integer tick counter the clock can land on any instant.
//!
//! `SimTime` is totally ordered (via `f64::total_cmp`) so it can key a
//! `BTreeMap`.  Constructors reject NaN in debug builds; nothing in the
//! simulation produces one.
//!
//! Instants and delays are kept apart the same way a tick counter would:
//!
//!   SimTime + f64 → SimTime      SimTime - SimTime → f64

use std::cmp::Ordering;
use std::fmt;

/// Seconds in one day; clock formatting wraps at this boundary.
pub const SECS_PER_DAY: i64 = 86_400;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute instant on the virtual timeline, in seconds.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Build an instant `secs` seconds after the start of the run.
    #[inline]
    pub fn from_secs(secs: f64) -> SimTime {
        debug_assert!(!secs.is_nan(), "SimTime cannot be NaN");
        SimTime(secs)
    }

    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`, never negative.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    /// Wall-clock style label for this instant (see [`clock_time`]).
    pub fn clock(self) -> String {
        clock_time(self.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime::from_secs(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

// ── Clock formatting ─────────────────────────────────────────────────────────

/// Format `secs` as `HH:MM:SS`, rounded to the nearest second (halves to
/// even) and wrapped modulo one day.
///
/// Only used for reporting; scheduling arithmetic never goes through it.
pub fn clock_time(secs: f64) -> String {
    let t = (secs.round_ties_even() as i64).rem_euclid(SECS_PER_DAY);
    let (m, s) = (t / 60, t % 60);
    let (h, m) = (m / 60, m % 60);
    format!("{h:02}:{m:02}:{s:02}")
}
