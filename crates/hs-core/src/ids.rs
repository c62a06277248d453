//! Strongly typed identifier wrappers.
//!
//! `PatientId` is the 1-based bed number of a patient.  `OrderId` is the
//! integer actually written on the actuator's signal channel: the patient id,
//! offset by [`OrderId::LINEN_OFFSET`] for linen orders.

use std::fmt;

use crate::{HsError, HsResult, OrderKind};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// A patient's bed number.  Patients are numbered from 1.
    pub struct PatientId(u32);
}

typed_id! {
    /// The order identifier sent to the actuator.
    pub struct OrderId(i32);
}

impl PatientId {
    /// Cast to `usize` for arithmetic on the patient number.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl OrderId {
    /// Linen orders are shifted by this much so they never collide with food
    /// orders of the same patient.
    pub const LINEN_OFFSET: i32 = 16;

    /// Highest patient id for which `OrderId` is unambiguous.
    pub const MAX_PATIENT: u32 = Self::LINEN_OFFSET as u32;

    /// Derive the wire id of an order.
    pub fn new(patient: PatientId, kind: OrderKind) -> Self {
        let offset = match kind {
            OrderKind::Food  => 0,
            OrderKind::Linen => Self::LINEN_OFFSET,
        };
        OrderId(offset + patient.0 as i32)
    }

    /// Recover `(patient, kind)` from a wire id.
    ///
    /// Valid ids are `1..=16` (food) and `17..=32` (linen).
    pub fn decode(self) -> HsResult<(PatientId, OrderKind)> {
        match self.0 {
            n @ 1..=Self::LINEN_OFFSET => Ok((PatientId(n as u32), OrderKind::Food)),
            n @ 17..=32 => Ok((PatientId((n - Self::LINEN_OFFSET) as u32), OrderKind::Linen)),
            _ => Err(HsError::InvalidOrderId(self)),
        }
    }
}
