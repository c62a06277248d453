//! ward — a hospital ward served by one delivery robot.
//!
//! Sixteen patients order food and linen at random; a single robot takes the
//! orders one at a time.  The robot controller is the in-process loopback
//! actuator, answering each order with a travel time that grows with the
//! bed number.
//!
//! Usage: `ward [config.json]`.  Without an argument the built-in defaults
//! are used; `RUST_LOG` controls log verbosity (default `info`).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use hs_core::{OrderEvent, OrderKind, RunConfig, SimRng, SimTime};
use hs_gateway::{GatewayConfig, LoopbackActuator, Reply, SignalGateway};
use hs_output::{CsvWriter, OutputWriter, SimOutputObserver};
use hs_sim::{CompletionRecord, HospitalSimBuilder, OrderFailure, RunReport, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Seconds the controller needs to plan a delivery before it answers.
const CONTROLLER_LATENCY_SECS: f64 = 2.0;
/// Robot travel time to bed 0 and per additional bed.
const BASE_TRAVEL_SECS:        f32 = 15.0;
const PER_BED_SECS:            f32 = 3.0;
/// Extra time to load a food tray.
const FOOD_LOADING_SECS:       f32 = 10.0;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    run:        RunConfig,
    gateway:    GatewayConfig,
    output_dir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            run:        RunConfig::default(),
            gateway:    GatewayConfig::default(),
            output_dir: PathBuf::from("output/ward"),
        }
    }
}

fn load_config() -> Result<DemoConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

// ── Console observer ──────────────────────────────────────────────────────────

/// Prints every order as it moves through the ward and forwards all
/// callbacks to the CSV observer.
struct ConsoleObserver<W: OutputWriter> {
    inner:     SimOutputObserver<W>,
    placed:    usize,
    completed: usize,
}

impl<W: OutputWriter> ConsoleObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, placed: 0, completed: 0 }
    }
}

impl<W: OutputWriter> SimObserver for ConsoleObserver<W> {
    fn on_order_placed(&mut self, event: &OrderEvent) {
        self.placed += 1;
        println!(
            "*ORDER* Patient #{} ordered {} at {}",
            event.order.patient.0,
            event.order.kind,
            event.arrival.clock()
        );
        self.inner.on_order_placed(event);
    }

    fn on_service_start(&mut self, event: &OrderEvent, at: SimTime) {
        println!("Processing {} at {}", event.order, at.clock());
        self.inner.on_service_start(event, at);
    }

    fn on_order_complete(&mut self, record: &CompletionRecord) {
        self.completed += 1;
        println!("Robot is done with the order at {}", record.completion().clock());
        self.inner.on_order_complete(record);
    }

    fn on_order_failed(&mut self, failure: &OrderFailure) {
        println!("!!! {failure}");
        self.inner.on_order_failed(failure);
    }

    fn on_sim_end(&mut self, report: &RunReport) {
        self.inner.on_sim_end(report);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Configuration.
    let config = load_config()?;
    println!("=== ward — hospital service robot ===");
    println!(
        "Patients: {}  |  Horizon: {}  |  Seed: {}  |  Robot capacity: {}",
        config.run.patient_count,
        config.run.horizon().clock(),
        config.run.seed,
        config.run.capacity,
    );
    println!();

    // 2. The robot controller: travel time grows with the bed number.
    let mut travel = SimRng::new(config.run.seed).child(1);
    let actuator = LoopbackActuator::new(move |order| {
        let (patient, kind) = order.decode().ok()?;
        let loading = if kind == OrderKind::Food { FOOD_LOADING_SECS } else { 0.0 };
        let jitter: f32 = travel.gen_range(0.0..5.0);
        let ptime = BASE_TRAVEL_SECS + PER_BED_SECS * patient.0 as f32 + loading + jitter;
        Some(Reply::ok(ptime).after(CONTROLLER_LATENCY_SECS))
    });

    // 3. Connect and build the ward.
    println!("Starting connection...");
    let gateway_config = config.gateway;
    let mut sim = HospitalSimBuilder::new(config.run.clone())
        .build(|scheduler| SignalGateway::connect(actuator, scheduler, gateway_config))?;
    println!("Connected.");
    println!("Simulation started at {}", sim.scheduler().now().clock());
    println!();

    // 4. Output.
    let writer = CsvWriter::new(&config.output_dir)?;
    let mut obs = ConsoleObserver::new(SimOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    let report = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Report.
    println!();
    println!("{report}");
    println!(
        "Orders placed = {}  |  completed = {}  |  peak robot load = {}",
        obs.placed, obs.completed, report.summary.peak_in_service
    );
    println!("CSV written to {}", config.output_dir.display());
    println!("Closing connection... Bye!");
    println!();
    println!("Program ended.");
    println!("Time spent = {:.2} minutes.", elapsed.as_secs_f64() / 60.0);

    Ok(())
}
