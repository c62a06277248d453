//! Controller lifecycle: connecting, and starting/stopping the remote scene.

use hs_schedule::Scheduler;

use crate::{GatewayResult, SignalChannel};

/// Lifecycle state of an [`ActuatorLink`], for implementations that track it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Running,
    Paused,
    Stopped,
    Finished,
}

/// Start/stop control of the remote scene.
///
/// The simulation calls [`start`][Self::start] before the first order is
/// scheduled, then [`pause`][Self::pause] and [`finish`][Self::finish] once
/// the horizon is reached.  Every hook defaults to a no-op so gateways
/// without a remote scene need only an empty `impl`.
pub trait ActuatorLink {
    fn start(&mut self) -> GatewayResult<()> {
        Ok(())
    }

    fn pause(&mut self) -> GatewayResult<()> {
        Ok(())
    }

    /// End the remote scene.  Never called by the simulation itself.
    fn stop(&mut self) -> GatewayResult<()> {
        Ok(())
    }

    /// Close the connection.  Called once, last.
    fn finish(&mut self) {}
}

/// Opens a [`SignalChannel`] to the controller.
///
/// The scheduler is passed in so in-process controllers can time their
/// replies on the simulation's clock.
pub trait Connector {
    type Channel: SignalChannel;

    /// Fails with [`GatewayError::Connection`][crate::GatewayError::Connection]
    /// when the controller cannot be reached.
    fn connect(self, scheduler: &Scheduler) -> GatewayResult<Self::Channel>;
}
