use crate::error::Error;

/// Half-open range of matrix rows assigned to a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        RowRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `[0, total_rows)` into one contiguous range per worker.
///
/// Every worker receives `total_rows / worker_count` rows and the remainder
/// is absorbed entirely by the last worker. With more workers than rows the
/// non-last workers receive empty ranges; those are dispatched and answered
/// like any other assignment.
pub fn partition_rows(total_rows: usize, worker_count: usize) -> Result<Vec<RowRange>, Error> {
    if total_rows < 1 {
        return Err(Error::InvalidDimension {
            what: "rows",
            value: total_rows,
        });
    }
    if worker_count < 1 {
        return Err(Error::InvalidDimension {
            what: "workers",
            value: worker_count,
        });
    }

    let granularity = total_rows / worker_count;
    let mut ranges = Vec::with_capacity(worker_count);
    for i in 0..worker_count {
        let start = i * granularity;
        let end = if i + 1 == worker_count {
            total_rows
        } else {
            (i + 1) * granularity
        };
        ranges.push(RowRange { start, end });
    }

    Ok(ranges)
}
