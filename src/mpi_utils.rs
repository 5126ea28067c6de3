use mpi::traits::*;

use crate::partition::RowRange;

// Message tags for the dispatch/gather protocol.
pub const TAG_ROW_RANGE: i32 = 1;
pub const TAG_ROW_DATA: i32 = 2;
pub const TAG_RESULT_RANGE: i32 = 3;
pub const TAG_RESULT_DATA: i32 = 4;

/// Rank of the coordinating process.
pub const COORDINATOR_RANK: i32 = 0;

/// Send a row range to a destination rank.
pub fn send_row_range<C: Communicator>(world: &C, dest: i32, range: RowRange, tag: i32) {
    let bounds = [range.start as i32, range.end as i32];
    world.process_at_rank(dest).send_with_tag(&bounds[..], tag);
}

/// Receive a row range from a source rank.
pub fn receive_row_range<C: Communicator>(world: &C, source: i32, tag: i32) -> RowRange {
    let mut bounds = [0i32; 2];
    world
        .process_at_rank(source)
        .receive_into_with_tag(&mut bounds[..], tag);
    RowRange {
        start: bounds[0] as usize,
        end: bounds[1] as usize,
    }
}

/// Send a contiguous block of matrix rows.
pub fn send_rows<C: Communicator>(world: &C, dest: i32, rows: &[f64], tag: i32) {
    world.process_at_rank(dest).send_with_tag(rows, tag);
}

/// Receive a block of matrix rows into a preallocated buffer.
pub fn receive_rows_into<C: Communicator>(world: &C, source: i32, buf: &mut [f64], tag: i32) {
    world.process_at_rank(source).receive_into_with_tag(buf, tag);
}

/// Broadcast matrix dimensions from the root to every rank. Non-root ranks
/// pass zeros and return the values the root supplied.
pub fn broadcast_dimensions<C: Communicator>(
    world: &C,
    root: i32,
    rows: usize,
    cols: usize,
) -> (usize, usize) {
    let mut dims = if world.rank() == root {
        [rows as i32, cols as i32]
    } else {
        [0i32; 2]
    };
    world.process_at_rank(root).broadcast_into(&mut dims[..]);
    (dims[0] as usize, dims[1] as usize)
}

/// Broadcast a full row-major buffer from the root to every rank.
pub fn broadcast_rows<C: Communicator>(world: &C, root: i32, buf: &mut [f64]) {
    world.process_at_rank(root).broadcast_into(buf);
}
