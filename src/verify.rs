use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::Error;

const ORACLE_PROGRAM: &str = "python";
const ORACLE_SCRIPT: &str = "verificator.py";

/// Check the stored product against the external NumPy oracle.
pub fn verify_product(matrix_a: &Path, matrix_b: &Path, output: &Path) -> Result<(), Error> {
    let mut command = Command::new(ORACLE_PROGRAM);
    command
        .arg(ORACLE_SCRIPT)
        .arg(matrix_a)
        .arg(matrix_b)
        .arg(output);
    run_oracle(&mut command)
}

/// Run a verification command and interpret the first line of its stdout.
/// Anything but the exact line `True` is fatal.
pub fn run_oracle(command: &mut Command) -> Result<(), Error> {
    let output = command.output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = stdout.lines().next().unwrap_or("").trim();

    if verdict == "True" {
        info!("verification oracle accepted the product");
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}
