use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use distributed_matrix_product::matrix::Matrix;
use distributed_matrix_product::mpi_utils::{
    TAG_RESULT_DATA, TAG_RESULT_RANGE, TAG_ROW_DATA, TAG_ROW_RANGE,
};
use distributed_matrix_product::partition::{partition_rows, RowRange};

// Mock-only tags: broadcasts are modelled as the root sending to each rank.
pub const TAG_DIMENSIONS: i32 = 5;
pub const TAG_BROADCAST: i32 = 6;

/// In-memory message queue standing in for MPI transport, so the protocol
/// can be exercised without mpirun.
#[derive(Clone)]
pub struct TestMessageQueue {
    messages: Arc<Mutex<HashMap<(i32, i32, i32), VecDeque<Vec<u8>>>>>,
}

impl TestMessageQueue {
    pub fn new() -> Self {
        TestMessageQueue {
            messages: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Send data from one rank to another.
    pub fn send<T: Copy>(&self, from: i32, to: i32, tag: i32, data: &[T]) {
        let size = data.len() * std::mem::size_of::<T>();
        let bytes =
            unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, size) }.to_vec();

        self.messages
            .lock()
            .unwrap()
            .entry((from, to, tag))
            .or_default()
            .push_back(bytes);
    }

    /// Receive the oldest pending message for (from, to, tag) into `buf`.
    pub fn receive<T: Copy>(&self, from: i32, to: i32, tag: i32, buf: &mut [T]) -> bool {
        let mut messages = self.messages.lock().unwrap();
        let Some(queue) = messages.get_mut(&(from, to, tag)) else {
            return false;
        };
        let Some(bytes) = queue.pop_front() else {
            return false;
        };

        let expected = buf.len() * std::mem::size_of::<T>();
        if bytes.len() != expected {
            return false;
        }
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.as_mut_ptr() as *mut u8, expected);
        }
        true
    }
}

/// Queue-backed doubles of the mpi_utils helpers.
pub mod test_protocol {
    use super::*;

    pub fn send_row_range(queue: &TestMessageQueue, from: i32, to: i32, range: RowRange, tag: i32) {
        let bounds = [range.start as i32, range.end as i32];
        queue.send(from, to, tag, &bounds);
    }

    pub fn receive_row_range(
        queue: &TestMessageQueue,
        from: i32,
        to: i32,
        tag: i32,
    ) -> Option<RowRange> {
        let mut bounds = [0i32; 2];
        if queue.receive(from, to, tag, &mut bounds) {
            Some(RowRange {
                start: bounds[0] as usize,
                end: bounds[1] as usize,
            })
        } else {
            None
        }
    }

    pub fn send_rows(queue: &TestMessageQueue, from: i32, to: i32, rows: &[f64], tag: i32) {
        queue.send(from, to, tag, rows);
    }

    pub fn receive_rows(
        queue: &TestMessageQueue,
        from: i32,
        to: i32,
        len: usize,
        tag: i32,
    ) -> Option<Vec<f64>> {
        let mut buf = vec![0.0f64; len];
        if queue.receive(from, to, tag, &mut buf) {
            Some(buf)
        } else {
            None
        }
    }

    pub fn broadcast_dimensions(
        queue: &TestMessageQueue,
        root: i32,
        world_size: i32,
        rows: usize,
        cols: usize,
    ) {
        let dims = [rows as i32, cols as i32];
        for rank in 0..world_size {
            if rank != root {
                queue.send(root, rank, TAG_DIMENSIONS, &dims);
            }
        }
    }

    pub fn receive_dimensions(
        queue: &TestMessageQueue,
        root: i32,
        to: i32,
    ) -> Option<(usize, usize)> {
        let mut dims = [0i32; 2];
        if queue.receive(root, to, TAG_DIMENSIONS, &mut dims) {
            Some((dims[0] as usize, dims[1] as usize))
        } else {
            None
        }
    }

    pub fn broadcast_rows(queue: &TestMessageQueue, root: i32, world_size: i32, data: &[f64]) {
        for rank in 0..world_size {
            if rank != root {
                queue.send(root, rank, TAG_BROADCAST, data);
            }
        }
    }

    pub fn receive_broadcast_rows(
        queue: &TestMessageQueue,
        root: i32,
        to: i32,
        len: usize,
    ) -> Option<Vec<f64>> {
        let mut buf = vec![0.0f64; len];
        if queue.receive(root, to, TAG_BROADCAST, &mut buf) {
            Some(buf)
        } else {
            None
        }
    }
}

/// Coordinator half of the protocol over the mock queue: dimension
/// broadcasts, per-worker dispatch, broadcast of B.
pub fn dispatch_work(
    queue: &TestMessageQueue,
    a: &Matrix,
    b: &Matrix,
    worker_count: usize,
) -> Result<Vec<RowRange>, String> {
    let world_size = worker_count as i32 + 1;
    test_protocol::broadcast_dimensions(queue, 0, world_size, a.rows, a.cols);
    test_protocol::broadcast_dimensions(queue, 0, world_size, b.rows, b.cols);

    let ranges = partition_rows(a.rows, worker_count).map_err(|e| e.to_string())?;
    for (index, range) in ranges.iter().enumerate() {
        let dest = index as i32 + 1;
        test_protocol::send_row_range(queue, 0, dest, *range, TAG_ROW_RANGE);
        let slice = a.row_slice(*range).map_err(|e| e.to_string())?;
        test_protocol::send_rows(queue, 0, dest, slice, TAG_ROW_DATA);
    }

    test_protocol::broadcast_rows(queue, 0, world_size, &b.data);
    Ok(ranges)
}

/// Worker half: the same sequence Worker::run performs over real MPI.
/// Returns the range the worker was assigned.
pub fn simulate_worker(queue: &TestMessageQueue, rank: i32) -> Result<RowRange, String> {
    let (_a_rows, a_cols) =
        test_protocol::receive_dimensions(queue, 0, rank).ok_or("no dimensions for A")?;
    let (b_rows, b_cols) =
        test_protocol::receive_dimensions(queue, 0, rank).ok_or("no dimensions for B")?;

    let range =
        test_protocol::receive_row_range(queue, 0, rank, TAG_ROW_RANGE).ok_or("no row range")?;
    let slice = test_protocol::receive_rows(queue, 0, rank, range.len() * a_cols, TAG_ROW_DATA)
        .ok_or("no row data")?;
    let b_data = test_protocol::receive_broadcast_rows(queue, 0, rank, b_rows * b_cols)
        .ok_or("no broadcast of B")?;

    let block_a = Matrix::from_vec(slice, range.len(), a_cols).map_err(|e| e.to_string())?;
    let b = Matrix::from_vec(b_data, b_rows, b_cols).map_err(|e| e.to_string())?;
    let block_c = block_a.multiply(&b).map_err(|e| e.to_string())?;

    test_protocol::send_row_range(queue, rank, 0, range, TAG_RESULT_RANGE);
    test_protocol::send_rows(queue, rank, 0, &block_c.data, TAG_RESULT_DATA);
    Ok(range)
}

/// Coordinator gather half: destination offsets come from each reply's own
/// row range, never from the loop position.
pub fn gather_results(
    queue: &TestMessageQueue,
    result: &mut Matrix,
    worker_count: usize,
) -> Result<(), String> {
    for index in 0..worker_count {
        let source = index as i32 + 1;
        let range = test_protocol::receive_row_range(queue, source, 0, TAG_RESULT_RANGE)
            .ok_or("no result range")?;
        let block =
            test_protocol::receive_rows(queue, source, 0, range.len() * result.cols, TAG_RESULT_DATA)
                .ok_or("no result data")?;
        let offset = range.start * result.cols;
        result.data[offset..offset + block.len()].copy_from_slice(&block);
    }
    Ok(())
}

/// Full dispatch/compute/gather round over the mock queue.
pub fn simulate_multiplication(
    a: &Matrix,
    b: &Matrix,
    worker_count: usize,
) -> Result<Matrix, String> {
    let queue = TestMessageQueue::new();
    dispatch_work(&queue, a, b, worker_count)?;
    for rank in 1..=worker_count as i32 {
        simulate_worker(&queue, rank)?;
    }
    let mut result = Matrix::new(a.rows, b.cols).map_err(|e| e.to_string())?;
    gather_results(&queue, &mut result, worker_count)?;
    Ok(result)
}
