//! Row-distributed sparse matrix
//!
//! Every owned row stores its entries in two blocks: columns inside the
//! ownership range of this process ("diagonal" block) and all others
//! ("off-diagonal" block). The capacity of both blocks is fixed by
//! [`DistributedMatrix::preallocate`]; a new nonzero beyond it is an
//! error rather than a silent reallocation.
use super::DistributedMatrix;
use crate::comm::Communicator;
use crate::error::{Error, Result};
use crate::types::GlobalIndex;
use ndarray::Array1;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq)]
struct Block {
    entries: Vec<(usize, f64)>,
    capacity: usize,
}

impl Block {
    fn insert(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if let Some(e) = self.entries.iter_mut().find(|e| e.0 == col) {
            e.1 = value;
            return Ok(());
        }
        if self.entries.len() >= self.capacity {
            return Err(Error::Preallocation {
                row,
                col,
                capacity: self.capacity,
            });
        }
        self.entries.push((col, value));
        Ok(())
    }

    fn sort(&mut self) {
        self.entries.sort_by_key(|e| e.0);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Row {
    local: Block,
    remote: Block,
}

/// Sparse matrix distributed by contiguous row ranges
#[derive(Debug)]
pub struct AijMatrix<'a, C> {
    comm: &'a C,
    start: usize,
    end: usize,
    global_size: usize,
    rows: Vec<Row>,
    assembled: bool,
}

impl<'a, C: Communicator> AijMatrix<'a, C> {
    /// Size of the square matrix
    pub fn global_size(&self) -> usize {
        self.global_size
    }

    /// Matrix is assembled
    pub fn is_assembled(&self) -> bool {
        self.assembled
    }

    /// Number of stored entries on this process
    pub fn nnz(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.local.entries.len() + r.remote.entries.len())
            .sum()
    }

    /// Stored value at (`row`, `col`), `None` if the entry is not stored
    /// or the row is owned by another process
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let r = self.rows.get(row.checked_sub(self.start)?)?;
        r.local
            .entries
            .iter()
            .chain(r.remote.entries.iter())
            .find(|e| e.0 == col)
            .map(|e| e.1)
    }

    /// Entries of an owned row, sorted by column
    ///
    /// # Errors
    /// Row is not owned
    pub fn row(&self, row: usize) -> Result<Vec<(usize, f64)>> {
        let r = &self.rows[self.local_row(row)?];
        let mut entries: Vec<(usize, f64)> = r
            .local
            .entries
            .iter()
            .chain(r.remote.entries.iter())
            .copied()
            .collect();
        entries.sort_by_key(|e| e.0);
        Ok(entries)
    }

    /// All stored entries on this process as (row, col, value)
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(i, r)| {
            r.local
                .entries
                .iter()
                .chain(r.remote.entries.iter())
                .map(move |&(j, v)| (self.start + i, j, v))
        })
    }

    /// Matrix vector product y = A x. `x` is distributed like the rows.
    ///
    /// # Errors
    /// Matrix is not assembled, shape mismatch, collective failed
    pub fn mult(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_assembled()?;
        let x = self.gather(x)?;
        Ok(self
            .rows
            .iter()
            .map(|r| {
                r.local
                    .entries
                    .iter()
                    .chain(r.remote.entries.iter())
                    .map(|&(j, v)| v * x[j])
                    .sum::<f64>()
            })
            .collect())
    }

    fn local_row(&self, row: usize) -> Result<usize> {
        if (self.start..self.end).contains(&row) {
            Ok(row - self.start)
        } else {
            Err(Error::RowNotOwned {
                row,
                start: self.start,
                end: self.end,
            })
        }
    }

    fn check_assembled(&self) -> Result<()> {
        if self.assembled {
            Ok(())
        } else {
            Err(Error::NotAssembled)
        }
    }

    fn check_local(&self, len: usize) -> Result<()> {
        if len == self.rows.len() {
            Ok(())
        } else {
            Err(Error::shape_mismatch(self.rows.len(), len))
        }
    }

    /// Collect a distributed vector on every process
    fn gather(&self, v: &Array1<f64>) -> Result<Vec<f64>> {
        self.check_local(v.len())?;
        let full = self.comm.all_gather(&v.to_vec())?;
        if full.len() != self.global_size {
            return Err(Error::shape_mismatch(self.global_size, full.len()));
        }
        Ok(full)
    }
}

impl<'a, C: Communicator> DistributedMatrix<'a> for AijMatrix<'a, C> {
    type Comm = C;

    /// # Example
    ///```
    /// use rustcfd::comm::SelfComm;
    /// use rustcfd::matrix::{AijMatrix, DistributedMatrix};
    /// let comm = SelfComm;
    /// let mut mat = AijMatrix::create(&comm, 3).unwrap();
    /// mat.preallocate(&[2, 2, 2], &[0, 0, 0]).unwrap();
    /// for i in 0..3 {
    ///     mat.set_row(i, &[Some(i), Some((i + 1) % 3)], &[2., -1.]).unwrap();
    /// }
    /// mat.assemble().unwrap();
    /// mat.shift(1.).unwrap();
    /// assert_eq!(mat.get(2, 2), Some(3.));
    /// assert_eq!(mat.get(2, 0), Some(-1.));
    ///```
    fn create(comm: &'a C, local_size: usize) -> Result<Self> {
        let (start, global_size) = comm.scan_sum(local_size)?;
        Ok(Self {
            comm,
            start,
            end: start + local_size,
            global_size,
            rows: vec![Row::default(); local_size],
            assembled: false,
        })
    }

    fn preallocate(&mut self, d_nnz: &[usize], o_nnz: &[usize]) -> Result<()> {
        self.check_local(d_nnz.len())?;
        self.check_local(o_nnz.len())?;
        for (r, (&d, &o)) in self.rows.iter_mut().zip(d_nnz.iter().zip(o_nnz.iter())) {
            r.local.capacity = d;
            r.remote.capacity = o;
        }
        Ok(())
    }

    fn set_row(&mut self, row: usize, cols: &[GlobalIndex], values: &[f64]) -> Result<()> {
        if self.assembled {
            return Err(Error::AlreadyAssembled);
        }
        if cols.len() != values.len() {
            return Err(Error::shape_mismatch(cols.len(), values.len()));
        }
        let i = self.local_row(row)?;
        let (start, end, global_size) = (self.start, self.end, self.global_size);
        let r = &mut self.rows[i];
        for (col, &value) in cols.iter().zip(values.iter()) {
            let col = match col {
                Some(col) => *col,
                None => continue,
            };
            if col >= global_size {
                return Err(Error::ColumnOutOfRange {
                    col,
                    size: global_size,
                });
            }
            if (start..end).contains(&col) {
                r.local.insert(row, col, value)?;
            } else {
                r.remote.insert(row, col, value)?;
            }
        }
        Ok(())
    }

    fn assemble(&mut self) -> Result<()> {
        for r in &mut self.rows {
            r.local.sort();
            r.remote.sort();
        }
        self.comm.barrier()?;
        self.assembled = true;
        Ok(())
    }

    fn scale(&mut self, alpha: f64) -> Result<()> {
        self.check_assembled()?;
        for r in &mut self.rows {
            for e in r.local.entries.iter_mut().chain(r.remote.entries.iter_mut()) {
                e.1 *= alpha;
            }
        }
        Ok(())
    }

    fn shift(&mut self, alpha: f64) -> Result<()> {
        self.check_assembled()?;
        for (i, r) in self.rows.iter_mut().enumerate() {
            let row = self.start + i;
            match r.local.entries.iter_mut().find(|e| e.0 == row) {
                Some(e) => e.1 += alpha,
                None => {
                    r.local.insert(row, row, alpha)?;
                    r.local.sort();
                }
            }
        }
        Ok(())
    }

    fn diagonal_scale(&mut self, left: &Array1<f64>, right: &Array1<f64>) -> Result<()> {
        self.check_assembled()?;
        self.check_local(left.len())?;
        let right = self.gather(right)?;
        for (r, l) in self.rows.iter_mut().zip(left.iter()) {
            for e in r.local.entries.iter_mut().chain(r.remote.entries.iter_mut()) {
                e.1 *= l * right[e.0];
            }
        }
        Ok(())
    }

    fn row_range(&self) -> Range<usize> {
        self.start..self.end
    }
}
