use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use crate::config::Settings;
use crate::error::TraceError;
use crate::io::open_trace;
use crate::simulator::Simulator;
use crate::stats::SimulationResult;
use crate::util::{get_cases, DEMOS_PATH};

#[test]
fn run_all_demos() -> Result<(), Box<dyn Error>> {
    let cases = get_cases(DEMOS_PATH)?;
    assert!(!cases.is_empty(), "no demo cases found under {DEMOS_PATH}");
    for case in cases {
        println!("Running test for {}", case.output.display());
        // Read expected output
        let expected_output_file = File::open(&case.output)?;
        let expected_output: SimulationResult = serde_json::from_reader(BufReader::new(expected_output_file))?;
        // Simulate!
        let settings = Settings::load(&case.settings)?;
        let mut simulator = Simulator::new(&settings)?;
        let trace = open_trace(&case.trace)?;
        let result = simulator.try_simulate(trace, |_| {})?;
        assert_eq!(*result, expected_output, "mismatch for {}", case.output.display());
        // Check results
        let time = simulator.get_execution_time();
        println!("Success for {}, time: {}", case.output.display(), time.as_nanos() as f64 / 1e9);
    }
    Ok(())
}

#[test]
fn open_trace_reports_missing_files() {
    let missing = format!("{DEMOS_PATH}/traces/no_such_trace.trace");
    assert!(matches!(open_trace(missing), Err(TraceError::Io(_))));
}

#[test]
fn open_trace_reads_every_record() -> Result<(), Box<dyn Error>> {
    let records = open_trace(format!("{DEMOS_PATH}/traces/two_process.trace"))?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 6);
    assert_eq!(records[2].address, 0x2000);
    Ok(())
}
