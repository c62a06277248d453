//! The named-signal channel shared with the robot controller.
//!
//! The controller exposes a flat namespace of typed signals.  The hospital
//! writes the integer [`ORDER_SIGNAL`]; the controller answers on the float
//! [`REPLY_SIGNAL`] with the time the robot needs for the order.  Every call
//! carries an [`OpMode`] and returns a [`ReturnCode`].

use std::fmt;

/// Integer signal carrying the `OrderId` to the controller.
pub const ORDER_SIGNAL: &str = "order_ToVREP";

/// Float signal carrying the processing time back from the controller.
pub const REPLY_SIGNAL: &str = "ptime_FromVREP";

/// How a signal call is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Fire and forget; the call does not wait for the remote side.
    Oneshot,
    /// Ask the remote side to push every change of the signal.  The first
    /// call normally reports [`ReturnCode::NoValue`].
    Streaming,
    /// Read the latest value pushed by an earlier streaming request.
    Buffer,
}

/// Outcome of one signal call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    /// Nothing has been received for the signal yet.
    NoValue,
    Timeout,
    /// The remote side rejected the call.
    Remote,
    /// The call failed before reaching the remote side.
    Local,
}

impl ReturnCode {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == ReturnCode::Ok
    }

    /// Wire flag value of this code.
    pub fn flag(self) -> i32 {
        match self {
            ReturnCode::Ok      => 0,
            ReturnCode::NoValue => 1,
            ReturnCode::Timeout => 2,
            ReturnCode::Remote  => 8,
            ReturnCode::Local   => 32,
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReturnCode::Ok      => "ok",
            ReturnCode::NoValue => "no value",
            ReturnCode::Timeout => "timeout",
            ReturnCode::Remote  => "remote error",
            ReturnCode::Local   => "local error",
        };
        write!(f, "{name} ({})", self.flag())
    }
}

/// Access to the controller's signals.
///
/// Calls are synchronous and never block on virtual time; waiting for a
/// reply is the gateway's job.
pub trait SignalChannel {
    fn set_integer(&mut self, name: &str, value: i32, mode: OpMode) -> ReturnCode;

    /// Read a float signal.  The value is `0.0` when nothing is available.
    fn get_float(&mut self, name: &str, mode: OpMode) -> (ReturnCode, f32);

    fn clear_float(&mut self, name: &str, mode: OpMode) -> ReturnCode;
}
