use std::io;
use thiserror::Error;

/// Errors raised while loading settings or building the memory geometry from them.
///
/// All of these are fatal and are reported before any trace record is simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("frame size {0} is not a power of two")]
    FrameSizeNotPowerOfTwo(u32),

    #[error("frame size {frame_size} does not evenly divide the physical memory size {memory_size}")]
    FrameSizeMismatch { memory_size: u32, frame_size: u32 },

    #[error("physical memory of {0} bytes has no room for a single frame")]
    NoFrames(u32),

    #[error("missing setting `{0}`")]
    MissingSetting(&'static str),

    #[error("invalid value `{value}` for setting `{label}`")]
    InvalidValue { label: String, value: String },

    #[error("couldn't parse settings line {0:?}")]
    MalformedLine(String),

    #[error("unknown page replacement policy `{0}`")]
    UnknownPolicy(String),

    #[error("couldn't parse the JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("couldn't read the settings: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while turning trace text into access records
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("malformed trace record on line {line_number}: {line:?}")]
    MalformedRecord { line_number: usize, line: String },

    #[error("couldn't read the trace: {0}")]
    Io(#[from] io::Error),
}
