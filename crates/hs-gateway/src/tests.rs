//! Unit tests for hs-gateway.

use std::cell::RefCell;
use std::rc::Rc;

use hs_core::{OrderId, SimTime};
use hs_schedule::{Executor, Scheduler};

use crate::{
    ActuationGateway, GatewayConfig, GatewayError, GatewayResult, LoopbackActuator, Reply,
    SignalChannel, SignalGateway,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Outcome = (OrderId, GatewayResult<f64>, f64);

fn connect(actuator: LoopbackActuator, config: GatewayConfig) -> (Scheduler, SignalGateway<LoopbackActuator>) {
    let scheduler = Scheduler::new();
    let gateway = SignalGateway::connect(actuator, scheduler.clone(), config).unwrap();
    (scheduler, gateway)
}

/// Issue each `(start, order)` request from its own task and collect the
/// outcomes in completion order, with the completion time.
fn drive(
    scheduler: &Scheduler,
    gateway:   &SignalGateway<LoopbackActuator>,
    requests:  &[(f64, i32)],
) -> Vec<Outcome> {
    let out = Rc::new(RefCell::new(Vec::new()));
    let mut ex = Executor::with_scheduler(scheduler.clone());
    for &(start, id) in requests {
        let s = scheduler.clone();
        let out = Rc::clone(&out);
        ex.spawn(async move {
            s.sleep(start).await;
            let r = gateway.request(OrderId(id)).await;
            out.borrow_mut().push((OrderId(id), r, s.now().as_secs()));
        });
    }
    ex.run(SimTime::from_secs(1_000.0)).unwrap();
    drop(ex);
    Rc::try_unwrap(out).unwrap().into_inner()
}

/// Issue `ids` one after the other from a single task.
fn sequential<C: SignalChannel>(
    scheduler: &Scheduler,
    gateway:   &SignalGateway<C>,
    ids:       &[i32],
) -> Vec<Outcome> {
    let out = Rc::new(RefCell::new(Vec::new()));
    {
        let mut ex = Executor::with_scheduler(scheduler.clone());
        let s = scheduler.clone();
        let out = Rc::clone(&out);
        ex.spawn(async move {
            for &id in ids {
                let r = gateway.request(OrderId(id)).await;
                out.borrow_mut().push((OrderId(id), r, s.now().as_secs()));
            }
        });
        ex.run(SimTime::from_secs(1_000.0)).unwrap();
    }
    Rc::try_unwrap(out).unwrap().into_inner()
}

// ── Handshake ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod handshake {
    use super::*;

    #[test]
    fn immediate_reply_costs_one_poll() {
        let (s, gateway) = connect(LoopbackActuator::fixed(5.0), GatewayConfig::default());
        let out = drive(&s, &gateway, &[(0.0, 3)]);

        let (order, r, at) = &out[0];
        assert_eq!(*order, OrderId(3));
        assert_eq!(*r.as_ref().unwrap(), 5.0);
        // The first streaming read never carries a value.
        assert_eq!(*at, 1.0);
        assert_eq!(gateway.channel().received(), [OrderId(3)]);
        assert_eq!(gateway.channel().published(), None);
        assert_eq!(gateway.in_flight(), None);
    }

    #[test]
    fn delayed_reply_is_polled_until_present() {
        let actuator = LoopbackActuator::new(|_| Some(Reply::ok(2.0).after(3.5)));
        let (s, gateway) = connect(actuator, GatewayConfig::default());
        let out = drive(&s, &gateway, &[(0.0, 1)]);
        assert_eq!(*out[0].1.as_ref().unwrap(), 2.0);
        assert_eq!(out[0].2, 4.0);
    }

    #[test]
    fn poll_interval_sets_the_backoff() {
        let actuator = LoopbackActuator::new(|_| Some(Reply::ok(2.0).after(3.5)));
        let config = GatewayConfig { poll_interval: 0.25, ..GatewayConfig::default() };
        let (s, gateway) = connect(actuator, config);
        let out = drive(&s, &gateway, &[(0.0, 1)]);
        assert_eq!(out[0].2, 3.5);
    }

    #[test]
    fn replies_are_not_attributed_across_orders() {
        let actuator = LoopbackActuator::new(|order| Some(Reply::ok(10.0 * order.0 as f32).after(2.5)));
        let (s, gateway) = connect(actuator, GatewayConfig::default());

        let out = Rc::new(RefCell::new(Vec::new()));
        {
            let mut ex = Executor::with_scheduler(s.clone());
            let out = Rc::clone(&out);
            let gateway = &gateway;
            ex.spawn(async move {
                for id in [1, 2] {
                    let r = gateway.request(OrderId(id)).await.unwrap();
                    out.borrow_mut().push(r);
                }
            });
            ex.run(SimTime::from_secs(100.0)).unwrap();
        }
        assert_eq!(*out.borrow(), [10.0, 20.0]);
        assert_eq!(gateway.channel().received(), [OrderId(1), OrderId(2)]);
    }
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use super::*;
    use crate::ReturnCode;

    #[test]
    fn error_status_is_a_protocol_error() {
        let actuator = LoopbackActuator::new(|_| Some(Reply::ok(4.0).with_status(ReturnCode::Remote)));
        let (s, gateway) = connect(actuator, GatewayConfig::default());
        let out = drive(&s, &gateway, &[(0.0, 7)]);
        match &out[0].1 {
            Err(GatewayError::Protocol { order, status, value }) => {
                assert_eq!(*order, OrderId(7));
                assert_eq!(*status, ReturnCode::Remote);
                assert_eq!(*value, 4.0);
            }
            other => panic!("expected a protocol error, got {other:?}"),
        }
        assert_eq!(gateway.channel().published(), None);
    }

    #[test]
    fn negative_duration_is_a_protocol_error() {
        let (s, gateway) = connect(LoopbackActuator::fixed(-3.0), GatewayConfig::default());
        let out = drive(&s, &gateway, &[(0.0, 2)]);
        assert!(matches!(out[0].1, Err(GatewayError::Protocol { value, .. }) if value == -3.0));
    }

    #[test]
    fn silent_controller_times_out() {
        let actuator = LoopbackActuator::new(|_| None);
        let config = GatewayConfig { timeout: Some(5.0), ..GatewayConfig::default() };
        let (s, gateway) = connect(actuator, config);
        let out = drive(&s, &gateway, &[(0.0, 4)]);
        assert!(matches!(
            out[0].1,
            Err(GatewayError::Timeout { order: OrderId(4), after }) if after == 5.0
        ));
        assert_eq!(out[0].2, 5.0);
        assert_eq!(gateway.in_flight(), None);
    }

    /// Order 1 answers after 10 s, order 2 after 3 s; the timeout is 8 s.
    fn late_then_prompt(order: OrderId) -> Option<Reply> {
        match order.0 {
            1 => Some(Reply::ok(100.0).after(10.0)),
            _ => Some(Reply::ok(7.0).after(3.0)),
        }
    }

    #[test]
    fn late_reply_of_a_timed_out_order_is_dropped() {
        let config = GatewayConfig { timeout: Some(8.0), ..GatewayConfig::default() };
        let (s, gateway) = connect(LoopbackActuator::new(late_then_prompt), config);
        let out = sequential(&s, &gateway, &[1, 2]);

        assert!(matches!(
            out[0],
            (OrderId(1), Err(GatewayError::Timeout { order: OrderId(1), .. }), at) if at == 8.0
        ));
        // Order 2 waits out the drain window (8..16), then gets its own reply.
        assert!(matches!(out[1], (OrderId(2), Ok(ptime), at) if ptime == 7.0 && at == 19.0));
        assert_eq!(gateway.channel().dropped_replies(), 1);
        assert_eq!(gateway.channel().received(), [OrderId(1), OrderId(2)]);
        assert_eq!(gateway.abandoned(), None);
    }

    /// A controller that publishes every reply when it is due, whatever was
    /// cleared or written in between.
    struct EagerWire {
        scheduler: Scheduler,
        published: Rc<std::cell::Cell<f32>>,
    }

    impl SignalChannel for EagerWire {
        fn set_integer(&mut self, _name: &str, value: i32, _mode: crate::OpMode) -> ReturnCode {
            if let Some(reply) = late_then_prompt(OrderId(value)) {
                let published = Rc::clone(&self.published);
                self.scheduler.schedule(reply.delay, move || published.set(reply.value));
            }
            ReturnCode::Ok
        }

        fn get_float(&mut self, _name: &str, _mode: crate::OpMode) -> (ReturnCode, f32) {
            let value = self.published.get();
            if value == 0.0 { (ReturnCode::NoValue, 0.0) } else { (ReturnCode::Ok, value) }
        }

        fn clear_float(&mut self, _name: &str, _mode: crate::OpMode) -> ReturnCode {
            self.published.set(0.0);
            ReturnCode::Ok
        }
    }

    #[test]
    fn late_reply_is_drained_before_the_next_order() {
        let s = Scheduler::new();
        let wire = EagerWire { scheduler: s.clone(), published: Rc::default() };
        let config = GatewayConfig { timeout: Some(8.0), ..GatewayConfig::default() };
        let gateway = SignalGateway::new(wire, s.clone(), config).unwrap();
        let out = sequential(&s, &gateway, &[1, 2]);

        assert!(matches!(out[0], (OrderId(1), Err(GatewayError::Timeout { .. }), at) if at == 8.0));
        // Order 1's 100 s lands at t=10 during the drain and is discarded;
        // order 2 is sent at t=10 and answered at t=13.
        assert!(matches!(out[1], (OrderId(2), Ok(ptime), at) if ptime == 7.0 && at == 13.0));
        assert_eq!(gateway.abandoned(), None);
        assert_eq!(gateway.channel().published.get(), 0.0);
    }

    #[test]
    fn concurrent_request_is_busy() {
        let actuator = LoopbackActuator::new(|_| Some(Reply::ok(1.0).after(3.0)));
        let (s, gateway) = connect(actuator, GatewayConfig::default());
        let out = drive(&s, &gateway, &[(0.0, 1), (1.0, 2)]);

        assert!(matches!(
            out[0],
            (OrderId(2), Err(GatewayError::Busy { in_flight: OrderId(1), .. }), at) if at == 1.0
        ));
        assert!(matches!(out[1], (OrderId(1), Ok(_), at) if at == 3.0));
        assert_eq!(gateway.channel().received(), [OrderId(1)]);
    }

    #[test]
    fn unreachable_controller_fails_to_connect() {
        let r = SignalGateway::connect(
            LoopbackActuator::fixed(1.0).unreachable(),
            Scheduler::new(),
            GatewayConfig::default(),
        );
        assert!(matches!(r, Err(GatewayError::Connection(_))));
    }

    #[test]
    fn invalid_config_rejected() {
        for config in [
            GatewayConfig { poll_interval: 0.0, timeout: None },
            GatewayConfig { poll_interval: f64::NAN, timeout: None },
            GatewayConfig { poll_interval: 1.0, timeout: Some(-1.0) },
        ] {
            assert!(matches!(config.validate(), Err(GatewayError::Config(_))), "{config:?}");
        }
        GatewayConfig::default().validate().unwrap();
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::{ActuatorLink, LinkState};

    #[test]
    fn hooks_reach_the_controller() {
        let (_s, mut gateway) = connect(LoopbackActuator::fixed(1.0), GatewayConfig::default());
        assert_eq!(gateway.channel().state(), Some(LinkState::Connected));

        gateway.start().unwrap();
        assert_eq!(gateway.channel().state(), Some(LinkState::Running));
        gateway.pause().unwrap();
        assert_eq!(gateway.channel().state(), Some(LinkState::Paused));
        gateway.stop().unwrap();
        assert_eq!(gateway.channel().state(), Some(LinkState::Stopped));
        gateway.finish();
        assert_eq!(gateway.into_channel().state(), Some(LinkState::Finished));
    }

    #[test]
    fn unconnected_controller_cannot_start() {
        let mut actuator = LoopbackActuator::fixed(1.0);
        assert!(matches!(actuator.start(), Err(GatewayError::Connection(_))));
        assert_eq!(actuator.state(), None);
    }

    #[test]
    fn return_code_display() {
        use crate::ReturnCode;
        assert_eq!(ReturnCode::Ok.to_string(), "ok (0)");
        assert_eq!(ReturnCode::Remote.to_string(), "remote error (8)");
        assert!(!ReturnCode::NoValue.is_ok());
    }
}
