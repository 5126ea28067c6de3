use std::time::Instant;

use mpi::traits::*;
use tracing::{debug, info};

use crate::error::Error;
use crate::matrix::Matrix;
use crate::mpi_utils::*;
use crate::partition::partition_rows;
use crate::record::MultiplicationRecord;

/// Rank 0 role: owns the operands, dispatches row assignments, gathers the
/// product.
pub struct Coordinator<'a, C: Communicator> {
    world: &'a C,
}

impl<'a, C: Communicator> Coordinator<'a, C> {
    pub fn new(world: &'a C) -> Self {
        Coordinator { world }
    }

    /// Number of worker ranks in the communicator.
    pub fn worker_count(&self) -> usize {
        (self.world.size() as usize).saturating_sub(1)
    }

    /// Multiply A by B across the worker ranks.
    ///
    /// Mirrors the sequence in `Worker::run`: the two dimension broadcasts,
    /// the point-to-point dispatch, the collective broadcast of B, the
    /// gather ordered by worker index, and the closing barrier. Precondition
    /// failures are detected before the first collective call so an aborting
    /// coordinator never strands a worker mid-protocol.
    pub fn multiply(
        &self,
        a: &Matrix,
        b: &Matrix,
    ) -> Result<(Matrix, MultiplicationRecord), Error> {
        let size = self.world.size() as usize;
        if size < 2 {
            return Err(Error::InsufficientWorkers(size));
        }
        if a.cols != b.rows {
            return Err(Error::DimensionMismatch {
                a_rows: a.rows,
                a_cols: a.cols,
                b_rows: b.rows,
                b_cols: b.cols,
            });
        }

        let worker_count = self.worker_count();
        info!(
            "multiplying {}x{} by {}x{} across {} workers",
            a.rows, a.cols, b.rows, b.cols, worker_count
        );

        // Workers size their receive buffers from these before any matrix
        // payload is in flight.
        broadcast_dimensions(self.world, COORDINATOR_RANK, a.rows, a.cols);
        broadcast_dimensions(self.world, COORDINATOR_RANK, b.rows, b.cols);

        let ranges = partition_rows(a.rows, worker_count)?;
        let mut result = Matrix::new(a.rows, b.cols)?;

        let started = Instant::now();

        for (index, range) in ranges.iter().enumerate() {
            let dest = index as i32 + 1;
            debug!(
                "assigning rows [{}, {}) to worker {}",
                range.start, range.end, dest
            );
            send_row_range(self.world, dest, *range, TAG_ROW_RANGE);
            send_rows(self.world, dest, a.row_slice(*range)?, TAG_ROW_DATA);
        }

        // Every rank, the coordinator included, must enter the broadcast
        // of the right operand.
        let mut right_operand = b.data.clone();
        broadcast_rows(self.world, COORDINATOR_RANK, &mut right_operand);

        for index in 0..worker_count {
            let source = index as i32 + 1;
            let range = receive_row_range(self.world, source, TAG_RESULT_RANGE);
            // The destination offset comes from the reply itself, never from
            // the loop position.
            let offset = range.start * b.cols;
            let len = range.len() * b.cols;
            receive_rows_into(
                self.world,
                source,
                &mut result.data[offset..offset + len],
                TAG_RESULT_DATA,
            );
            debug!(
                "gathered rows [{}, {}) from worker {}",
                range.start, range.end, source
            );
        }

        let record = MultiplicationRecord {
            elapsed_seconds: started.elapsed().as_secs_f64(),
            volume: a.rows * b.cols,
        };

        // No rank starts post-multiplication I/O while a peer is still
        // mid-transfer.
        self.world.barrier();
        info!("multiplication finished in {} seconds", record.elapsed_seconds);

        Ok((result, record))
    }
}
