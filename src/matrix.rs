use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::partition::RowRange;

/// Dense matrix backed by a single row-major buffer.
///
/// `data.len() == rows * cols` holds for every instance; element `(i, j)`
/// lives at `data[i * cols + j]`. The default value is the empty 0x0 matrix,
/// a valid unset state that never enters a multiplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl Matrix {
    /// Create a zero-filled matrix with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self, Error> {
        if rows < 1 {
            return Err(Error::InvalidDimension {
                what: "rows",
                value: rows,
            });
        }
        if cols < 1 {
            return Err(Error::InvalidDimension {
                what: "columns",
                value: cols,
            });
        }
        Ok(Matrix {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        })
    }

    /// Build a matrix around an existing row-major buffer.
    ///
    /// The 0 x cols shape is accepted so a worker holding an empty row
    /// assignment runs the same code path as any other worker.
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, Error> {
        if data.len() != rows * cols {
            return Err(Error::InvalidArgument(format!(
                "data length {} does not match dimensions {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Matrix { data, rows, cols })
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get the value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<f64, Error> {
        self.check_index(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    /// Set the value at (row, col). A failed bounds check leaves the buffer
    /// untouched.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), Error> {
        self.check_index(row, col)?;
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), Error> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Borrow the contiguous rows `[range.start, range.end)` of the buffer.
    pub fn row_slice(&self, range: RowRange) -> Result<&[f64], Error> {
        if range.start > range.end || range.end > self.rows {
            return Err(Error::InvalidArgument(format!(
                "row range [{}, {}) out of bounds for {} rows",
                range.start, range.end, self.rows
            )));
        }
        Ok(&self.data[range.start * self.cols..range.end * self.cols])
    }

    /// Multiply two matrices: C[i][j] = sum over k of A[i][k] * B[k][j].
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, Error> {
        if self.cols != other.rows {
            return Err(Error::DimensionMismatch {
                a_rows: self.rows,
                a_cols: self.cols,
                b_rows: other.rows,
                b_cols: other.cols,
            });
        }

        let mut result = Matrix {
            data: vec![0.0; self.rows * other.cols],
            rows: self.rows,
            cols: other.cols,
        };

        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }
                result.data[i * other.cols + j] = sum;
            }
        }

        Ok(result)
    }

    /// Load a matrix from a text file: whitespace-separated values, one row
    /// per line. Blank lines are skipped.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut data = Vec::new();
        let mut rows = 0usize;
        let mut cols = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            match cols {
                Some(expected) if expected != tokens.len() => {
                    return Err(Error::RaggedMatrix {
                        path: path.to_path_buf(),
                        line: line_num + 1,
                        expected,
                        found: tokens.len(),
                    });
                }
                None => cols = Some(tokens.len()),
                _ => {}
            }

            for token in tokens {
                data.push(token.parse::<f64>()?);
            }
            rows += 1;
        }

        match cols {
            Some(cols) => Ok(Matrix { data, rows, cols }),
            None => Err(Error::EmptyMatrix(path.to_path_buf())),
        }
    }

    /// Save the matrix in the same text format `load_from_file` reads:
    /// space-separated values, one row per line, trailing newline per row.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for i in 0..self.rows {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(writer, " ")?;
                }
                write!(writer, "{}", value)?;
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }
}
