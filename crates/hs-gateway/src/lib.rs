//! `hs-gateway` — the boundary between the hospital and the robot controller.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`channel`]  | `SignalChannel` trait, `OpMode`, `ReturnCode`, signal names     |
//! | [`gateway`]  | `ActuationGateway` trait, `SignalGateway`, `GatewayConfig`      |
//! | [`link`]     | `ActuatorLink` lifecycle hooks, `Connector`, `LinkState`        |
//! | [`loopback`] | `LoopbackActuator` — in-process controller with scripted replies |
//! | [`error`]    | `GatewayError`, `GatewayResult<T>`                              |
//!
//! # Design notes
//!
//! The gateway owns its channel and a [`Scheduler`][hs_schedule::Scheduler]
//! handle; there is no process-wide connection.  Waiting for a reply is a
//! virtual-time sleep between polls, so other orders keep arriving while
//! the robot is busy.

pub mod channel;
pub mod error;
pub mod gateway;
pub mod link;
pub mod loopback;

#[cfg(test)]
mod tests;

pub use channel::{OpMode, ORDER_SIGNAL, REPLY_SIGNAL, ReturnCode, SignalChannel};
pub use error::{GatewayError, GatewayResult};
pub use gateway::{ActuationGateway, GatewayConfig, SignalGateway};
pub use link::{ActuatorLink, Connector, LinkState};
pub use loopback::{LoopbackActuator, Reply};
