use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in the distributed multiplication. Every
/// variant is fatal at the point of detection; errors propagate to the
/// top-level handler in `main`, which tears the computation down.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid dimension: {what} must be at least 1, got {value}")]
    InvalidDimension { what: &'static str, value: usize },

    #[error("matrix dimensions incompatible: A is {a_rows}x{a_cols}, B is {b_rows}x{b_cols}")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },

    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("not enough processes: {0} running, need a coordinator and at least one worker")]
    InsufficientWorkers(usize),

    #[error("no matrix in file {0:?}")]
    EmptyMatrix(PathBuf),

    #[error("ragged matrix in {path:?}: line {line} has {found} values, expected {expected}")]
    RaggedMatrix {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to parse matrix value: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("verification oracle rejected the computed product")]
    VerificationFailed,
}
