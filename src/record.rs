use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Error;

/// Timing and volume of one completed multiplication, owned by the caller
/// of `Coordinator::multiply`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplicationRecord {
    pub elapsed_seconds: f64,
    /// Number of elements in the product, `a.rows * b.cols`.
    pub volume: usize,
}

impl MultiplicationRecord {
    /// Append the runtime/volume annotation to an existing output file.
    pub fn append_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut file = OpenOptions::new().append(true).open(path)?;
        writeln!(file, "Runtime {} seconds", self.elapsed_seconds)?;
        writeln!(file, "Volume {}", self.volume)?;
        Ok(())
    }
}
