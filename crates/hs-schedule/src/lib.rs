//! `hs-schedule` — virtual clock, cooperative executor, and resource queue.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`event_queue`] | `EventQueue` (`BTreeMap<SimTime, VecDeque<Action>>`)      |
//! | [`scheduler`]   | `Scheduler` handle, `Sleep`, `Timeout`                    |
//! | [`executor`]    | `Executor` — single-threaded task loop, `RunStats`        |
//! | [`pacing`]      | `Pacer` — optional wall-clock pacing                      |
//! | [`resource`]    | `ResourceQueue`, `Acquire`, `Permit`                      |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`, `Elapsed`           |
//!
//! # Concurrency model (summary)
//!
//! All tasks run on the calling thread.  A task only gives up control at an
//! `.await` on something that is not ready yet: a [`Sleep`], an
//! [`Acquire`], or a future built from them.  Shared state therefore lives in
//! `Rc`/`RefCell` and is never borrowed across an `.await`.
//!
//! ```text
//! now()            — current virtual time
//! schedule(d, f)   — run f at now + d (FIFO among equal instants)
//! sleep(d).await   — suspend the calling task for d virtual seconds
//! run(until)       — process everything strictly before `until`
//! ```

pub mod error;
pub mod event_queue;
pub mod executor;
pub mod pacing;
pub mod resource;
pub mod scheduler;


pub use error::{Elapsed, ScheduleError, ScheduleResult};
pub use event_queue::{Action, EventQueue};
pub use executor::{Executor, RunStats};
pub use pacing::Pacer;
pub use resource::{Acquire, Permit, ResourceQueue};
pub use scheduler::{Scheduler, Sleep, Timeout};
