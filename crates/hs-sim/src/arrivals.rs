//! Interarrival models: how long a patient waits before placing the next
//! order of a kind.

use hs_core::{Order, OrderKind, PatientRng};
use rand_distr::{Normal, Weibull};

/// Pluggable interarrival distribution.
///
/// Called by each (patient, kind) generator before every order, with that
/// generator's own RNG stream.  Returning `None` ends the generator: the
/// patient places no further orders of that kind.
pub trait ArrivalModel {
    fn next_delay(&self, order: Order, rng: &mut PatientRng) -> Option<f64>;
}

impl<F> ArrivalModel for F
where
    F: Fn(Order, &mut PatientRng) -> Option<f64>,
{
    fn next_delay(&self, order: Order, rng: &mut PatientRng) -> Option<f64> {
        self(order, rng)
    }
}

// ── StandardArrivals ──────────────────────────────────────────────────────────

/// The ward's default order pattern.
///
/// Patients are grouped by `patient mod 6`; higher groups order less often.
///
/// | Kind  | Delay (seconds)                                                   |
/// |-------|-------------------------------------------------------------------|
/// | food  | Weibull, scale `(5 + 20·g)·60`, shape 3                            |
/// | linen | `|Normal(μ·60, 600)|` with `μ` uniform in `10..=20 + 20·g` minutes |
///
/// The linen draw is folded at zero rather than truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardArrivals;

impl StandardArrivals {
    pub const FOOD_SHAPE: f64 = 3.0;
    pub const LINEN_STD_DEV: f64 = 600.0;

    fn group(order: Order) -> u32 {
        order.patient.0 % 6
    }
}

impl ArrivalModel for StandardArrivals {
    fn next_delay(&self, order: Order, rng: &mut PatientRng) -> Option<f64> {
        let g = Self::group(order);
        match order.kind {
            OrderKind::Food => {
                let scale = f64::from(5 + 20 * g) * 60.0;
                let dist = Weibull::new(scale, Self::FOOD_SHAPE).ok()?;
                Some(rng.sample(dist))
            }
            OrderKind::Linen => {
                let mean_minutes: u32 = rng.gen_range(10..=20 + 20 * g);
                let dist = Normal::new(f64::from(mean_minutes) * 60.0, Self::LINEN_STD_DEV).ok()?;
                Some(rng.sample(dist).abs())
            }
        }
    }
}

// ── FixedInterarrival ─────────────────────────────────────────────────────────

/// A constant delay between orders, optionally for a subset of kinds.
///
/// Kinds that are not enabled never place an order.
#[derive(Debug, Clone)]
pub struct FixedInterarrival {
    interval: f64,
    kinds:    Vec<OrderKind>,
}

impl FixedInterarrival {
    /// Every kind orders every `interval` seconds.
    pub fn new(interval: f64) -> Self {
        Self { interval, kinds: OrderKind::ALL.to_vec() }
    }

    /// Restrict ordering to `kind`.
    pub fn only(mut self, kind: OrderKind) -> Self {
        self.kinds = vec![kind];
        self
    }
}

impl ArrivalModel for FixedInterarrival {
    fn next_delay(&self, order: Order, _rng: &mut PatientRng) -> Option<f64> {
        self.kinds.contains(&order.kind).then_some(self.interval)
    }
}
