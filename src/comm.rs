//! # Communicator
//!
//! The operator assembly and the ghost update are data parallel across
//! processes. The only places where processes synchronise are the
//! collective operations collected in [`Communicator`]: every process
//! must call them, otherwise the others block.
//!
//! Implementations:
//! - [`SelfComm`]: single process
//! - [`EmulatedComm`]: one rank of a decomposition, emulated inside a
//!   single process (knows the local sizes of all ranks, but no data)
//! - `mpi::topology::SimpleCommunicator` with feature `mpi`
use crate::error::{Error, Result};

/// Collective operations needed by the distributed matrix
pub trait Communicator {
    /// Rank of this process
    fn rank(&self) -> usize;

    /// Number of participating processes
    fn size(&self) -> usize;

    /// Block until all processes arrived
    ///
    /// # Errors
    /// Collective failed
    fn barrier(&self) -> Result<()>;

    /// Returns the exclusive prefix sum of `local` over all ranks and
    /// the global sum.
    ///
    /// # Errors
    /// Collective failed
    fn scan_sum(&self, local: usize) -> Result<(usize, usize)>;

    /// Concatenate the local slices of all ranks in rank order
    ///
    /// # Errors
    /// Collective failed
    fn all_gather(&self, local: &[f64]) -> Result<Vec<f64>>;
}

/// Communicator of a single process
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<()> {
        Ok(())
    }

    fn scan_sum(&self, local: usize) -> Result<(usize, usize)> {
        Ok((0, local))
    }

    fn all_gather(&self, local: &[f64]) -> Result<Vec<f64>> {
        Ok(local.to_vec())
    }
}

/// Stand-in for one rank of a multi process run.
///
/// Knows how many rows every rank owns, which is enough to
/// determine ownership ranges. Data of other ranks is not available,
/// so `all_gather` fails unless there is only one rank.
#[derive(Debug, Clone)]
pub struct EmulatedComm {
    rank: usize,
    local_sizes: Vec<usize>,
}

impl EmulatedComm {
    /// Rank `rank` of a run where rank `r` owns `local_sizes[r]` rows
    ///
    /// # Errors
    /// `rank` is not smaller than the number of ranks
    pub fn new(rank: usize, local_sizes: Vec<usize>) -> Result<Self> {
        if rank >= local_sizes.len() {
            return Err(Error::Communication(format!(
                "Rank {} out of range for {} ranks",
                rank,
                local_sizes.len()
            )));
        }
        Ok(Self { rank, local_sizes })
    }
}

impl Communicator for EmulatedComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.local_sizes.len()
    }

    fn barrier(&self) -> Result<()> {
        Ok(())
    }

    fn scan_sum(&self, local: usize) -> Result<(usize, usize)> {
        if local != self.local_sizes[self.rank] {
            return Err(Error::Communication(format!(
                "Rank {} contributes {} but {} were registered",
                self.rank, local, self.local_sizes[self.rank]
            )));
        }
        let start = self.local_sizes[..self.rank].iter().sum();
        let total = self.local_sizes.iter().sum();
        Ok((start, total))
    }

    fn all_gather(&self, local: &[f64]) -> Result<Vec<f64>> {
        if self.local_sizes.len() == 1 {
            Ok(local.to_vec())
        } else {
            Err(Error::Communication(
                "Emulated ranks do not share data".to_owned(),
            ))
        }
    }
}

#[cfg(feature = "mpi")]
mod rsmpi {
    use super::Communicator;
    use crate::error::Result;
    use mpi::collective::{CommunicatorCollectives, SystemOperation};
    use mpi::datatype::PartitionMut;
    use mpi::topology::SimpleCommunicator;
    use mpi::Count;

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    impl Communicator for SimpleCommunicator {
        fn rank(&self) -> usize {
            mpi::traits::Communicator::rank(self) as usize
        }

        fn size(&self) -> usize {
            mpi::traits::Communicator::size(self) as usize
        }

        fn barrier(&self) -> Result<()> {
            CommunicatorCollectives::barrier(self);
            Ok(())
        }

        fn scan_sum(&self, local: usize) -> Result<(usize, usize)> {
            let local = local as u64;
            let mut total = 0_u64;
            let mut inclusive = 0_u64;
            self.all_reduce_into(&local, &mut total, SystemOperation::sum());
            self.scan_into(&local, &mut inclusive, SystemOperation::sum());
            Ok(((inclusive - local) as usize, total as usize))
        }

        fn all_gather(&self, local: &[f64]) -> Result<Vec<f64>> {
            let nprocs = mpi::traits::Communicator::size(self) as usize;
            let count = local.len() as Count;
            let mut counts = vec![0 as Count; nprocs];
            self.all_gather_into(&count, &mut counts[..]);
            let displs: Vec<Count> = counts
                .iter()
                .scan(0, |acc, &x| {
                    let d = *acc;
                    *acc += x;
                    Some(d)
                })
                .collect();
            let total: Count = counts.iter().sum();
            let mut buf = vec![0.0; total as usize];
            {
                let mut partition = PartitionMut::new(&mut buf[..], counts, &displs[..]);
                self.all_gather_varcount_into(local, &mut partition);
            }
            Ok(buf)
        }
    }
}
