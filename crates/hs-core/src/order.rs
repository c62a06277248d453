//! Orders placed by patients.

use crate::{OrderId, PatientId, SimTime};

/// What a patient is asking the robot for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrderKind {
    Food,
    Linen,
}

impl OrderKind {
    /// All kinds in generator spawn order.
    pub const ALL: [OrderKind; 2] = [OrderKind::Food, OrderKind::Linen];

    /// Human-readable label, used in reports and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderKind::Food  => "food",
            OrderKind::Linen => "linen",
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable service request.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub patient: PatientId,
    pub kind:    OrderKind,
}

impl Order {
    #[inline]
    pub fn new(patient: PatientId, kind: OrderKind) -> Self {
        Self { patient, kind }
    }

    /// The id written on the actuator's order channel.
    #[inline]
    pub fn id(&self) -> OrderId {
        OrderId::new(self.patient, self.kind)
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} order from patient #{}", self.kind, self.patient.0)
    }
}

/// An order together with the instant it was placed.
///
/// Created by a generator when an interarrival delay expires and consumed
/// exactly once by the order processor.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderEvent {
    pub order:   Order,
    pub arrival: SimTime,
}
