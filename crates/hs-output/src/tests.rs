//! Integration tests for hs-output.

#[cfg(test)]
mod csv_tests {
    use hs_core::{OrderId, OrderKind, PatientId, SimTime};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{CompletionRow, OrderEventRow, Stage, SummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_rows(dir: &TempDir, file: &str) -> Vec<Vec<String>> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect()
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("order_events.csv").exists());
        assert!(dir.path().join("completions.csv").exists());
        assert!(dir.path().join("summary.csv").exists());
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tmp();
        let nested = dir.path().join("ward").join("run-1");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("summary.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir, "order_events.csv"), ["time_secs", "clock", "order_id", "patient", "kind", "stage"]);
        assert_eq!(
            headers(&dir, "completions.csv"),
            ["patient", "kind", "arrival_secs", "arrival_clock", "queue_wait", "service_time"]
        );
        assert_eq!(
            headers(&dir, "summary.csv"),
            ["end_secs", "completed_food", "completed_linen", "waiting", "in_service", "failed", "peak_in_service"]
        );
    }

    #[test]
    fn event_row_layout() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_event(&OrderEventRow {
            time:     SimTime::from_secs(192.4),
            order_id: OrderId(20),
            patient:  PatientId(4),
            kind:     OrderKind::Linen,
            stage:    Stage::Processing,
        })
        .unwrap();
        w.finish().unwrap();

        assert_eq!(read_rows(&dir, "order_events.csv"), [["192.400", "00:03:12", "20", "4", "linen", "processing"]]);
    }

    #[test]
    fn completion_row_layout() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_completion(&CompletionRow {
            patient:      PatientId(2),
            kind:         OrderKind::Food,
            arrival:      SimTime::from_secs(86_410.0),
            queue_wait:   1.23456,
            service_time: 30.0,
        })
        .unwrap();
        w.finish().unwrap();

        assert_eq!(read_rows(&dir, "completions.csv"), [["2", "food", "86410.000", "00:00:10", "1.235", "30.000"]]);
    }

    #[test]
    fn summary_row_layout() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_summary(&SummaryRow {
            end:             SimTime::from_secs(1200.0),
            completed_food:  7,
            completed_linen: 5,
            waiting:         2,
            in_service:      1,
            failed:          0,
            peak_in_service: 1,
        })
        .unwrap();
        w.finish().unwrap();

        assert_eq!(read_rows(&dir, "summary.csv"), [["1200.000", "7", "5", "2", "1", "0", "1"]]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use hs_core::{Order, OrderEvent, OrderKind, PatientId, SimTime};
    use hs_sim::SimObserver;

    use crate::row::{CompletionRow, OrderEventRow, SummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult, SimOutputObserver};

    /// Fails every write; counts the attempts.
    #[derive(Default)]
    struct Failing {
        attempts: usize,
    }

    impl Failing {
        fn fail(&mut self) -> OutputResult<()> {
            self.attempts += 1;
            Err(std::io::Error::other(format!("write {}", self.attempts)).into())
        }
    }

    impl OutputWriter for Failing {
        fn write_event(&mut self, _row: &OrderEventRow) -> OutputResult<()> {
            self.fail()
        }

        fn write_completion(&mut self, _row: &CompletionRow) -> OutputResult<()> {
            self.fail()
        }

        fn write_summary(&mut self, _row: &SummaryRow) -> OutputResult<()> {
            self.fail()
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SimOutputObserver::new(Failing::default());
        let event = OrderEvent {
            order:   Order::new(PatientId(1), OrderKind::Food),
            arrival: SimTime::from_secs(5.0),
        };
        obs.on_order_placed(&event);
        obs.on_service_start(&event, SimTime::from_secs(6.0));

        match obs.take_error() {
            Some(OutputError::Io(e)) => assert_eq!(e.to_string(), "write 1"),
            other => panic!("expected the first I/O error, got {other:?}"),
        }
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().attempts, 2);
    }
}

#[cfg(test)]
mod integration {
    use hs_core::{OrderKind, RunConfig};
    use hs_gateway::{GatewayConfig, LoopbackActuator, SignalGateway};
    use hs_sim::{FixedInterarrival, HospitalSimBuilder};

    use crate::{CsvWriter, SimOutputObserver};

    #[test]
    fn ward_run_to_csv() {
        let config = RunConfig {
            patient_count: 1,
            horizon_secs:  30.0,
            ..RunConfig::default()
        };
        let mut sim = HospitalSimBuilder::new(config)
            .arrivals(FixedInterarrival::new(2.0).only(OrderKind::Food))
            .build(|s| SignalGateway::connect(LoopbackActuator::fixed(5.0), s, GatewayConfig::default()))
            .unwrap();

        let dir = tempfile::tempdir().expect("create temp dir");
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let report = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let count = |file: &str| {
            csv::Reader::from_path(dir.path().join(file)).unwrap().records().count()
        };
        assert_eq!(count("completions.csv"), report.log.len());
        // ordered + processing + done for every completed order.
        assert_eq!(count("order_events.csv"), 3 * report.log.len());
        assert_eq!(count("summary.csv"), 1);

        let mut rdr = csv::Reader::from_path(dir.path().join("summary.csv")).unwrap();
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[1], report.summary.completed_food.to_string());
    }
}
