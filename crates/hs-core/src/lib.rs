//! `hs-core` — foundational types for the hospital service simulation.
//!
//! This crate is a dependency of every other `hs-*` crate.  It intentionally
//! has no `hs-*` dependencies and minimal external ones (`rand`,
//! `rand_distr` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PatientId`, `OrderId`                                |
//! | [`order`]       | `OrderKind`, `Order`, `OrderEvent`                    |
//! | [`time`]        | `SimTime`, `clock_time` (HH:MM:SS formatting)         |
//! | [`rng`]         | `PatientRng` (per patient and order kind), `SimRng`   |
//! | [`config`]      | `RunConfig`, `Pacing`                                 |
//! | [`error`]       | `HsError`, `HsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod order;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Pacing, RunConfig};
pub use error::{HsError, HsResult};
pub use ids::{OrderId, PatientId};
pub use order::{Order, OrderEvent, OrderKind};
pub use rng::{PatientRng, SimRng};
pub use time::{SimTime, clock_time};
