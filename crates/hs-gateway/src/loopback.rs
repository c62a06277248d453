//! `LoopbackActuator` — an in-process stand-in for the robot controller.
//!
//! It speaks the same signal protocol as the remote scene: an order written
//! to [`ORDER_SIGNAL`] is handed to a responder closure, whose [`Reply`] is
//! published on [`REPLY_SIGNAL`] after `reply.delay` virtual seconds.  The
//! first streaming read reports [`ReturnCode::NoValue`]; buffered reads then
//! return whatever was published last, until it is cleared.
//!
//! A reply still pending when the reply signal is cleared, or when the next
//! order is written, is dropped: the controller abandons that order.

use std::cell::Cell;
use std::rc::Rc;

use hs_core::OrderId;
use hs_schedule::Scheduler;
use tracing::debug;

use crate::{
    ActuatorLink, Connector, GatewayError, GatewayResult, LinkState, OpMode, ORDER_SIGNAL,
    REPLY_SIGNAL, ReturnCode, SignalChannel,
};

/// What the loopback controller answers to one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reply {
    pub value:  f32,
    pub status: ReturnCode,
    /// Virtual seconds between receiving the order and publishing the reply.
    pub delay:  f64,
}

impl Reply {
    /// An immediate, successful reply.
    pub fn ok(value: f32) -> Self {
        Self { value, status: ReturnCode::Ok, delay: 0.0 }
    }

    pub fn with_status(self, status: ReturnCode) -> Self {
        Self { status, ..self }
    }

    pub fn after(self, delay: f64) -> Self {
        Self { delay, ..self }
    }
}

type Responder = Box<dyn FnMut(OrderId) -> Option<Reply>>;

pub struct LoopbackActuator {
    responder: Responder,
    scheduler: Option<Scheduler>,
    published: Rc<Cell<Option<(ReturnCode, f32)>>>,
    /// Bumped by every order write and reply clear; a scheduled reply is
    /// published only if the epoch it was scheduled in is still current.
    epoch:     Rc<Cell<u64>>,
    dropped:   Rc<Cell<usize>>,
    streaming: bool,
    reachable: bool,
    state:     Option<LinkState>,
    received:  Vec<OrderId>,
}

impl LoopbackActuator {
    /// A controller that answers each order with `responder(order)`.
    /// `None` means the order is never answered.
    pub fn new(responder: impl FnMut(OrderId) -> Option<Reply> + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            scheduler: None,
            published: Rc::new(Cell::new(None)),
            epoch:     Rc::new(Cell::new(0)),
            dropped:   Rc::new(Cell::new(0)),
            streaming: false,
            reachable: true,
            state:     None,
            received:  Vec::new(),
        }
    }

    /// A controller that answers every order immediately with `ptime`.
    pub fn fixed(ptime: f32) -> Self {
        Self::new(move |_| Some(Reply::ok(ptime)))
    }

    /// Make [`Connector::connect`] fail, as if the controller were down.
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Orders received so far, in arrival order.
    pub fn received(&self) -> &[OrderId] {
        &self.received
    }

    /// `None` until connected.
    pub fn state(&self) -> Option<LinkState> {
        self.state
    }

    /// The reply currently published on the reply signal.
    pub fn published(&self) -> Option<f32> {
        self.published.get().map(|(_, value)| value)
    }

    /// Replies that were due but dropped because their order was abandoned.
    pub fn dropped_replies(&self) -> usize {
        self.dropped.get()
    }

    fn next_epoch(&self) -> u64 {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        epoch
    }

    fn read(&self) -> (ReturnCode, f32) {
        self.published.get().unwrap_or((ReturnCode::NoValue, 0.0))
    }

    fn transition(&mut self, to: LinkState) -> GatewayResult<()> {
        if self.state.is_none() {
            return Err(GatewayError::Connection("loopback actuator is not connected".into()));
        }
        debug!(?to, "loopback actuator state change");
        self.state = Some(to);
        Ok(())
    }
}

impl Connector for LoopbackActuator {
    type Channel = Self;

    fn connect(mut self, scheduler: &Scheduler) -> GatewayResult<Self> {
        if !self.reachable {
            return Err(GatewayError::Connection("loopback actuator refused the connection".into()));
        }
        self.scheduler = Some(scheduler.clone());
        self.state = Some(LinkState::Connected);
        Ok(self)
    }
}

impl SignalChannel for LoopbackActuator {
    fn set_integer(&mut self, name: &str, value: i32, _mode: OpMode) -> ReturnCode {
        let Some(scheduler) = &self.scheduler else {
            return ReturnCode::Local;
        };
        if name != ORDER_SIGNAL {
            return ReturnCode::Ok;
        }
        let order = OrderId(value);
        self.received.push(order);
        let epoch = self.next_epoch();

        if let Some(reply) = (self.responder)(order) {
            if reply.delay > 0.0 {
                let published = Rc::clone(&self.published);
                let current = Rc::clone(&self.epoch);
                let dropped = Rc::clone(&self.dropped);
                scheduler.schedule(reply.delay, move || {
                    if current.get() != epoch {
                        debug!(%order, "reply of an abandoned order dropped");
                        dropped.set(dropped.get() + 1);
                        return;
                    }
                    published.set(Some((reply.status, reply.value)));
                });
            } else {
                self.published.set(Some((reply.status, reply.value)));
            }
        }
        ReturnCode::Ok
    }

    fn get_float(&mut self, name: &str, mode: OpMode) -> (ReturnCode, f32) {
        if self.scheduler.is_none() {
            return (ReturnCode::Local, 0.0);
        }
        if name != REPLY_SIGNAL {
            return (ReturnCode::NoValue, 0.0);
        }
        match mode {
            OpMode::Streaming if !self.streaming => {
                self.streaming = true;
                (ReturnCode::NoValue, 0.0)
            }
            OpMode::Buffer if !self.streaming => (ReturnCode::NoValue, 0.0),
            _ => self.read(),
        }
    }

    fn clear_float(&mut self, name: &str, _mode: OpMode) -> ReturnCode {
        if self.scheduler.is_none() {
            return ReturnCode::Local;
        }
        if name == REPLY_SIGNAL {
            self.published.set(None);
            self.next_epoch();
        }
        ReturnCode::Ok
    }
}

impl ActuatorLink for LoopbackActuator {
    fn start(&mut self) -> GatewayResult<()> {
        self.transition(LinkState::Running)
    }

    fn pause(&mut self) -> GatewayResult<()> {
        self.transition(LinkState::Paused)
    }

    fn stop(&mut self) -> GatewayResult<()> {
        self.transition(LinkState::Stopped)
    }

    fn finish(&mut self) {
        if self.state.is_some() {
            self.state = Some(LinkState::Finished);
        }
    }
}
