//! `hs-sim` — the ward orchestrator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`arrivals`] | `ArrivalModel` trait, `StandardArrivals`, `FixedInterarrival` |
//! | [`desk`]     | Order generators and processor, `OrderFailure`               |
//! | [`stats`]    | `CompletionRecord`, `CompletionLog`, `RunSummary`, `RunReport` |
//! | [`observer`] | `SimObserver` hooks, `NoopObserver`                          |
//! | [`builder`]  | `HospitalSimBuilder`                                         |
//! | [`sim`]      | `HospitalSim::run`                                           |
//! | [`error`]    | `SimError`, `SimResult<T>`                                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hs_core::RunConfig;
//! use hs_gateway::{GatewayConfig, LoopbackActuator, SignalGateway};
//! use hs_sim::{HospitalSimBuilder, NoopObserver};
//!
//! let mut sim = HospitalSimBuilder::new(RunConfig::default())
//!     .build(|s| SignalGateway::connect(LoopbackActuator::fixed(30.0), s, GatewayConfig::default()))?;
//! let report = sim.run(&mut NoopObserver)?;
//! println!("{report}");
//! ```

pub mod arrivals;
pub mod builder;
pub mod desk;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stats;


pub use arrivals::{ArrivalModel, FixedInterarrival, StandardArrivals};
pub use builder::HospitalSimBuilder;
pub use desk::OrderFailure;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::HospitalSim;
pub use stats::{CompletionLog, CompletionRecord, RunReport, RunSummary};
