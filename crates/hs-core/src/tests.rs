//! Unit tests for hs-core primitives.

#[cfg(test)]
mod ids {
    use crate::{HsError, OrderId, OrderKind, PatientId};

    #[test]
    fn linen_offset_by_sixteen() {
        assert_eq!(OrderId::new(PatientId(3), OrderKind::Food), OrderId(3));
        assert_eq!(OrderId::new(PatientId(3), OrderKind::Linen), OrderId(19));
    }

    #[test]
    fn decode_inverts_new_for_whole_ward() {
        for p in 1..=16 {
            for kind in OrderKind::ALL {
                let id = OrderId::new(PatientId(p), kind);
                assert_eq!(id.decode().unwrap(), (PatientId(p), kind));
            }
        }
    }

    #[test]
    fn decode_rejects_out_of_range() {
        assert!(matches!(OrderId(0).decode(), Err(HsError::InvalidOrderId(OrderId(0)))));
        assert!(OrderId(33).decode().is_err());
        assert!(OrderId(-1).decode().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PatientId(7).to_string(), "PatientId(7)");
        assert_eq!(OrderId(23).to_string(), "OrderId(23)");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimTime, clock_time};

    #[test]
    fn arithmetic() {
        let t = SimTime::from_secs(10.0);
        assert_eq!(t + 2.5, SimTime::from_secs(12.5));
        assert_eq!(SimTime::from_secs(15.0) - t, 5.0);
        assert_eq!(t.since(SimTime::from_secs(12.0)), 0.0);
    }

    #[test]
    fn ordering_is_total() {
        let mut v = vec![SimTime::from_secs(3.0), SimTime::ZERO, SimTime::from_secs(1.5)];
        v.sort();
        assert_eq!(v, [SimTime::ZERO, SimTime::from_secs(1.5), SimTime::from_secs(3.0)]);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(clock_time(0.0), "00:00:00");
        assert_eq!(clock_time(9.0), "00:00:09");
        assert_eq!(clock_time(59.6), "00:01:00");
        assert_eq!(clock_time(3_723.0), "01:02:03");
        assert_eq!(clock_time(86_399.0), "23:59:59");
    }

    #[test]
    fn clock_rounds_halves_to_even() {
        assert_eq!(clock_time(0.5), "00:00:00");
        assert_eq!(clock_time(1.5), "00:00:02");
        assert_eq!(clock_time(2.5), "00:00:02");
        assert_eq!(clock_time(59.5), "00:01:00");
    }

    #[test]
    fn clock_wraps_daily() {
        for t in [0.0, 1.0, 59.0, 3_600.0, 43_210.4, 86_399.0, 100_000.0] {
            assert_eq!(clock_time(t), clock_time(t + 86_400.0), "t = {t}");
        }
        assert_eq!(clock_time(86_400.0), "00:00:00");
    }

    #[test]
    fn sim_time_clock_label() {
        assert_eq!(SimTime::from_secs(1_200.0).clock(), "00:20:00");
    }
}

#[cfg(test)]
mod rng {
    use crate::{Order, OrderKind, PatientId, PatientRng};

    fn food(p: u32) -> Order {
        Order::new(PatientId(p), OrderKind::Food)
    }

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = PatientRng::new(12345, food(1));
        let mut r2 = PatientRng::new(12345, food(1));
        for _ in 0..100 {
            let a: f64 = r1.gen_range(0.0..1.0);
            let b: f64 = r2.gen_range(0.0..1.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn streams_differ_by_kind() {
        let mut food_rng = PatientRng::new(1, food(2));
        let mut linen_rng = PatientRng::new(1, Order::new(PatientId(2), OrderKind::Linen));
        let a: u64 = food_rng.gen_range(0..u64::MAX);
        let b: u64 = linen_rng.gen_range(0..u64::MAX);
        assert_ne!(a, b, "food and linen streams of one patient should diverge");
    }
}

#[cfg(test)]
mod config {
    use crate::{HsError, Pacing, PatientId, RunConfig, SimTime};

    #[test]
    fn default_is_valid() {
        let cfg = RunConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.horizon(), SimTime::from_secs(1_200.0));
    }

    #[test]
    fn patients_are_one_based() {
        let cfg = RunConfig { patient_count: 3, ..RunConfig::default() };
        let ids: Vec<PatientId> = cfg.patients().collect();
        assert_eq!(ids, [PatientId(1), PatientId(2), PatientId(3)]);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            RunConfig { patient_count: 0, ..RunConfig::default() },
            RunConfig { patient_count: 17, ..RunConfig::default() },
            RunConfig { capacity: 0, ..RunConfig::default() },
            RunConfig { horizon_secs: 0.0, ..RunConfig::default() },
            RunConfig { horizon_secs: f64::INFINITY, ..RunConfig::default() },
            RunConfig {
                pacing: Some(Pacing { factor: 0.0, strict: false }),
                ..RunConfig::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(HsError::Config(_))), "{cfg:?}");
        }
    }
}
