use hs_core::OrderId;
use thiserror::Error;

use crate::ReturnCode;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("cannot reach the actuator: {0}")]
    Connection(String),

    #[error("gateway configuration error: {0}")]
    Config(String),

    #[error("{order}: actuator replied {value} with status {status}")]
    Protocol {
        order:  OrderId,
        status: ReturnCode,
        value:  f64,
    },

    #[error("{order}: no reply within {after} virtual seconds")]
    Timeout { order: OrderId, after: f64 },

    #[error("{order}: channel busy with {in_flight}")]
    Busy { order: OrderId, in_flight: OrderId },
}

pub type GatewayResult<T> = Result<T, GatewayError>;
