use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use crate::error::TraceError;
use crate::trace::TraceReader;

/// Generated traces run to millions of short lines, read them in large blocks
const BUFFER_SIZE: usize = 64 * 4096;

/// Path that reads the trace from standard input
pub const STDIN_PATH: &str = "-";

/// Opens the trace at `path` for a single sequential pass
///
/// Regular files are memory mapped on unix systems. Anything that can't be mapped, such as a pipe,
/// falls back to a large buffered reader, as does `-` (standard input).
pub fn get_reader(path: &Path) -> Result<Box<dyn BufRead>, TraceError> {
    if path == Path::new(STDIN_PATH) {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, io::stdin())));
    }
    let file = File::open(path)?;
    #[cfg(unix)]
    if let Some(mapped) = map_sequential(&file) {
        return Ok(Box::new(io::Cursor::new(mapped)));
    }
    Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
}

#[cfg(unix)]
fn map_sequential(file: &File) -> Option<memmap2::Mmap> {
    use memmap2::{Advice, Mmap};
    // SAFETY: the trace is only ever read, and must not be truncated while the simulation runs
    let mapped = match unsafe { Mmap::map(file) } {
        Ok(mapped) => mapped,
        Err(e) => {
            tracing::debug!(error = %e, "couldn't memory map the trace, reading it through a buffer");
            return None;
        }
    };
    if let Err(e) = mapped.advise(Advice::Sequential) {
        tracing::debug!(error = %e, "sequential access advice was refused");
    }
    Some(mapped)
}

/// Opens a trace and parses it lazily
pub fn open_trace(path: impl AsRef<Path>) -> Result<TraceReader<Box<dyn BufRead>>, TraceError> {
    Ok(TraceReader::new(get_reader(path.as_ref())?))
}
