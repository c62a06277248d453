//! `ActuationGateway` and its signal-channel implementation.
//!
//! # Handshake
//!
//! ```text
//! clear  ptime_FromVREP                      (drop any stale reply)
//! set    order_ToVREP = OrderId   oneshot
//! get    ptime_FromVREP           streaming  (once)
//! loop:  get ptime_FromVREP       buffer     until the value is non-zero,
//!        sleeping poll_interval virtual seconds between reads
//! clear  ptime_FromVREP                      (the reply is consumed)
//! ```
//!
//! A reply of exactly `0.0` is indistinguishable from "nothing yet", so the
//! controller cannot report a zero-duration order; the gateway keeps waiting.
//!
//! # Abandoned orders
//!
//! The reply signal carries no order id.  When an order times out, its reply
//! may still arrive later, so the next request first drains the reply signal
//! for up to one more `timeout` and discards whatever shows up before it
//! sends its own order.

use std::cell::{Cell, Ref, RefCell};
use std::future::Future;

use hs_core::OrderId;
use hs_schedule::Scheduler;
use tracing::{debug, info, warn};

use crate::{
    ActuatorLink, Connector, GatewayError, GatewayResult, OpMode, ORDER_SIGNAL, REPLY_SIGNAL,
    ReturnCode, SignalChannel,
};

// ── ActuationGateway ──────────────────────────────────────────────────────────

/// Dispatches one order to the robot and waits for its processing time.
pub trait ActuationGateway {
    /// Resolve to the processing time of `order`, in virtual seconds.
    fn request(&self, order: OrderId) -> impl Future<Output = GatewayResult<f64>> + '_;
}

// ── GatewayConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GatewayConfig {
    /// Virtual seconds between two reads of the reply signal.
    pub poll_interval: f64,
    /// Give up on a reply after this many virtual seconds.  `None` waits
    /// forever, which stalls the order (and the robot) if the controller
    /// never answers.
    ///
    /// After a timeout the next request spends up to another `timeout`
    /// draining the late reply before sending.  A reply later than twice the
    /// timeout cannot be told apart from the next order's reply on the wire
    /// and will be credited to it.
    pub timeout: Option<f64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { poll_interval: 1.0, timeout: None }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> GatewayResult<()> {
        if !(self.poll_interval.is_finite() && self.poll_interval > 0.0) {
            return Err(GatewayError::Config(format!(
                "poll_interval must be a positive number of seconds, got {}",
                self.poll_interval
            )));
        }
        if let Some(after) = self.timeout {
            if !(after.is_finite() && after > 0.0) {
                return Err(GatewayError::Config(format!(
                    "timeout must be a positive number of seconds, got {after}"
                )));
            }
        }
        Ok(())
    }
}

// ── SignalGateway ─────────────────────────────────────────────────────────────

/// An [`ActuationGateway`] speaking the signal handshake over a
/// [`SignalChannel`].
///
/// One order at a time: a request issued while another is waiting for its
/// reply fails with [`GatewayError::Busy`].
pub struct SignalGateway<C> {
    channel:   RefCell<C>,
    scheduler: Scheduler,
    config:    GatewayConfig,
    in_flight: Cell<Option<OrderId>>,
    abandoned: Cell<Option<OrderId>>,
}

impl<C: SignalChannel> SignalGateway<C> {
    pub fn new(channel: C, scheduler: Scheduler, config: GatewayConfig) -> GatewayResult<Self> {
        config.validate()?;
        Ok(Self {
            channel: RefCell::new(channel),
            scheduler,
            config,
            in_flight: Cell::new(None),
            abandoned: Cell::new(None),
        })
    }

    /// Open a channel with `connector` and wrap it.
    pub fn connect<K>(connector: K, scheduler: Scheduler, config: GatewayConfig) -> GatewayResult<Self>
    where
        K: Connector<Channel = C>,
    {
        config.validate()?;
        let channel = connector.connect(&scheduler)?;
        info!("connected to the actuator");
        Self::new(channel, scheduler, config)
    }

    pub fn config(&self) -> GatewayConfig {
        self.config
    }

    /// The order currently waiting for a reply, if any.
    pub fn in_flight(&self) -> Option<OrderId> {
        self.in_flight.get()
    }

    /// The last order that timed out, while its late reply may still arrive.
    pub fn abandoned(&self) -> Option<OrderId> {
        self.abandoned.get()
    }

    /// Borrow the underlying channel.  Do not hold across an `.await`.
    pub fn channel(&self) -> Ref<'_, C> {
        self.channel.borrow()
    }

    pub fn into_channel(self) -> C {
        self.channel.into_inner()
    }

    fn clear_reply(&self) {
        let status = self.channel.borrow_mut().clear_float(REPLY_SIGNAL, OpMode::Oneshot);
        if !status.is_ok() {
            debug!(%status, "clearing the reply signal failed");
        }
    }

    /// Poll the reply signal until it carries a non-zero value.
    async fn await_reply(&self, order: OrderId, mut mode: OpMode) -> (ReturnCode, f32, u32) {
        let mut polls = 0u32;
        loop {
            let (status, value) = self.channel.borrow_mut().get_float(REPLY_SIGNAL, mode);
            mode = OpMode::Buffer;
            polls += 1;
            if value != 0.0 {
                return (status, value, polls);
            }
            debug!(%order, %status, polls, "no reply yet");
            self.scheduler.sleep(self.config.poll_interval).await;
        }
    }

    /// Wait up to `after` seconds for the late reply of `abandoned` and
    /// discard it.
    async fn drain(&self, abandoned: OrderId, after: f64) {
        match self.scheduler.timeout(after, self.await_reply(abandoned, OpMode::Buffer)).await {
            Ok((status, value, _)) => {
                warn!(%abandoned, %status, value, "late reply of an abandoned order discarded");
            }
            Err(_) => debug!(%abandoned, "no late reply"),
        }
        self.clear_reply();
    }

    async fn exchange(&self, order: OrderId) -> GatewayResult<f64> {
        self.clear_reply();

        let status = self.channel.borrow_mut().set_integer(ORDER_SIGNAL, order.0, OpMode::Oneshot);
        debug!(%order, %status, "order sent");

        let (status, value, polls) = self.await_reply(order, OpMode::Streaming).await;
        self.clear_reply();

        let value = f64::from(value);
        if !status.is_ok() || !value.is_finite() || value < 0.0 {
            return Err(GatewayError::Protocol { order, status, value });
        }
        debug!(%order, ptime = value, polls, "reply received");
        Ok(value)
    }
}

/// Resets the in-flight marker when a request ends, including by cancellation.
struct InFlight<'a>(&'a Cell<Option<OrderId>>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(None);
    }
}

impl<C: SignalChannel> ActuationGateway for SignalGateway<C> {
    fn request(&self, order: OrderId) -> impl Future<Output = GatewayResult<f64>> + '_ {
        async move {
            if let Some(in_flight) = self.in_flight.get() {
                return Err(GatewayError::Busy { order, in_flight });
            }
            self.in_flight.set(Some(order));
            let _guard = InFlight(&self.in_flight);

            let Some(after) = self.config.timeout else {
                return self.exchange(order).await;
            };
            if let Some(abandoned) = self.abandoned.take() {
                self.drain(abandoned, after).await;
            }
            match self.scheduler.timeout(after, self.exchange(order)).await {
                Ok(result) => result,
                Err(_) => {
                    self.clear_reply();
                    self.abandoned.set(Some(order));
                    Err(GatewayError::Timeout { order, after })
                }
            }
        }
    }
}

impl<C: ActuatorLink> ActuatorLink for SignalGateway<C> {
    fn start(&mut self) -> GatewayResult<()> {
        self.channel.get_mut().start()
    }

    fn pause(&mut self) -> GatewayResult<()> {
        self.channel.get_mut().pause()
    }

    fn stop(&mut self) -> GatewayResult<()> {
        self.channel.get_mut().stop()
    }

    fn finish(&mut self) {
        self.channel.get_mut().finish()
    }
}
