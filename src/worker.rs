use mpi::traits::*;
use tracing::{debug, info};

use crate::error::Error;
use crate::matrix::Matrix;
use crate::mpi_utils::*;

/// Rank > 0 role: computes one block of rows of the product.
pub struct Worker<'a, C: Communicator> {
    rank: i32,
    world: &'a C,
}

impl<'a, C: Communicator> Worker<'a, C> {
    pub fn new(world: &'a C) -> Self {
        Worker {
            rank: world.rank(),
            world,
        }
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }

    /// Worker-side mirror of `Coordinator::multiply`.
    pub fn run(&self) -> Result<(), Error> {
        let (_a_rows, a_cols) = broadcast_dimensions(self.world, COORDINATOR_RANK, 0, 0);
        let (b_rows, b_cols) = broadcast_dimensions(self.world, COORDINATOR_RANK, 0, 0);

        let range = receive_row_range(self.world, COORDINATOR_RANK, TAG_ROW_RANGE);
        debug!(
            "worker {} assigned rows [{}, {})",
            self.rank, range.start, range.end
        );

        let mut slice = vec![0.0; range.len() * a_cols];
        receive_rows_into(self.world, COORDINATOR_RANK, &mut slice, TAG_ROW_DATA);

        let mut right_operand = vec![0.0; b_rows * b_cols];
        broadcast_rows(self.world, COORDINATOR_RANK, &mut right_operand);

        // An empty range flows through the same path and yields an empty
        // block.
        let block_a = Matrix::from_vec(slice, range.len(), a_cols)?;
        let b = Matrix::from_vec(right_operand, b_rows, b_cols)?;
        let block_c = block_a.multiply(&b)?;

        send_row_range(self.world, COORDINATOR_RANK, range, TAG_RESULT_RANGE);
        send_rows(self.world, COORDINATOR_RANK, &block_c.data, TAG_RESULT_DATA);
        info!(
            "worker {} computed rows [{}, {})",
            self.rank, range.start, range.end
        );

        self.world.barrier();
        Ok(())
    }
}
