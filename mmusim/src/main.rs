mod logger;
mod report;

use std::time::Instant;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use mmulib::config::{ReplacementPolicyConfig, Settings};
use mmulib::io::open_trace;
use mmulib::page_table::PageTableTrait;
use mmulib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Replays a memory trace through a simulated TLB and page table"))]
struct Args {
    settings: String,
    /// The trace file, or - to read it from standard input
    trace: String,

    /// Print the result as JSON instead of the text summary
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,

    /// Overrides the page replacement policy from the settings file
    #[arg(long, value_enum)]
    policy: Option<ReplacementPolicyConfig>,

    /// Seeds the random replacement policy
    #[arg(long)]
    seed: Option<u64>,
}

/// Per-access logging is emitted at info level, so it's only visible when the settings ask for it.
/// RUST_LOG takes precedence
fn init_logging(logging_output: bool) {
    let default_level = if logging_output { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    let mut settings = Settings::load(&args.settings).map_err(|e| format!("Couldn't load the settings file at path {}: {e}", args.settings))?;
    if let Some(policy) = args.policy {
        settings.page_replacement = policy;
    }
    if args.seed.is_some() {
        settings.random_seed = args.seed;
    }
    init_logging(settings.logging_output);

    let mut simulator = Simulator::new(&settings).map_err(|e| format!("Invalid settings: {e}"))?;
    if !args.json {
        println!("{}", report::pre_simulation(&settings, simulator.page_table().geometry()));
        println!();
    }
    let trace = open_trace(&args.trace).map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let result = simulator
        .try_simulate(trace, logger::log_event)
        .map_err(|e| format!("Couldn't simulate the trace: {e}"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    } else {
        println!("{}", report::summary(result));
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed settings: {settings:?}");
        println!("Resident pages: {}", simulator.page_table().resident_count());
        println!("TLB entries: {} of {}", simulator.tlb().len(), simulator.tlb().capacity());
    }
    Ok(())
}
