use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;

/// The bundled demo cases, relative to the workspace root
pub const DEMOS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos");

pub struct TestCasePaths {
    pub settings: PathBuf,
    pub trace: PathBuf,
    pub output: PathBuf,
}

/// Finds every demo case under `root`
///
/// Each expected output is named `output-<trace>-<settings>.json`, and names the trace in
/// `traces/<trace>.trace` and the settings in `settings/<settings>.txt` it was produced from
pub fn get_cases(root: impl AsRef<Path>) -> Result<Vec<TestCasePaths>, Box<dyn Error>> {
    let root = root.as_ref();
    let mut out = Vec::new();
    let output_file_directory = fs::read_dir(root.join("outputs"))?;
    let output_pattern = Regex::new(r"^output-(?P<trace>[0-9a-zA-Z_]+)-(?P<settings>[0-9a-zA-Z_]+)\.json$")?;
    let mut file_names = Vec::new();
    for entry in output_file_directory {
        let file_name = entry?.file_name().into_string().map_err(|e| format!("Can't convert OS string ({e:?}) to standard string"))?;
        if output_pattern.is_match(&file_name) {
            file_names.push(file_name);
        }
    }
    file_names.sort();
    for file_name in file_names {
        // Get components of name
        let tokens = output_pattern.captures(&file_name).ok_or("Couldn't parse the file name".to_string())?;
        let trace_name = tokens.name("trace").ok_or("Couldn't get the trace file from the output file name".to_string())?.as_str();
        let settings_name = tokens.name("settings").ok_or("Couldn't get the settings file from the output file name".to_string())?.as_str();
        out.push(TestCasePaths {
            settings: root.join("settings").join(format!("{settings_name}.txt")),
            trace: root.join("traces").join(format!("{trace_name}.trace")),
            output: root.join("outputs").join(&file_name),
        })
    }
    Ok(out)
}
