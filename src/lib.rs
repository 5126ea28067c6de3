pub mod cli;
pub mod coordinator;
pub mod error;
pub mod matrix;
pub mod mpi_utils;
pub mod partition;
pub mod record;
pub mod verify;
pub mod worker;

pub use coordinator::Coordinator;
pub use error::Error;
pub use matrix::Matrix;
pub use partition::{partition_rows, RowRange};
pub use record::MultiplicationRecord;
pub use worker::Worker;
