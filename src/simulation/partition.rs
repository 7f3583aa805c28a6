//! Static mapping from global body index to owning worker
//!
//! Every worker owns one contiguous block of `partition_size` bodies for the
//! whole run. The map is pure arithmetic, so any worker can answer "who owns
//! body i" without asking anyone.

use std::ops::Range;

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionMap {
    workers: usize,
    partition_size: usize,
}

impl PartitionMap {
    /// Map with `workers` partitions of `partition_size` bodies each
    pub fn new(workers: usize, partition_size: usize) -> Result<Self, SimError> {
        if workers == 0 {
            return Err(SimError::NoWorkers);
        }
        if partition_size == 0 {
            return Err(SimError::NoBodies);
        }
        Ok(Self { workers, partition_size })
    }

    /// Split a population of `bodies` evenly across `workers`
    ///
    /// Fails when the population is not an exact multiple of the worker
    /// count; nothing downstream copes with ragged partitions.
    pub fn for_population(bodies: usize, workers: usize) -> Result<Self, SimError> {
        if workers == 0 {
            return Err(SimError::NoWorkers);
        }
        if bodies == 0 {
            return Err(SimError::NoBodies);
        }
        if bodies % workers != 0 {
            return Err(SimError::UnevenPartition { bodies, workers });
        }
        Self::new(workers, bodies / workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn partition_size(&self) -> usize {
        self.partition_size
    }

    /// Total number of bodies, N
    pub fn bodies(&self) -> usize {
        self.workers * self.partition_size
    }

    /// Worker owning global index `i`
    pub fn owner(&self, i: usize) -> usize {
        self.check(i);
        i / self.partition_size
    }

    /// Offset of global index `i` inside its owner's partition
    pub fn local_offset(&self, i: usize) -> usize {
        self.check(i);
        i % self.partition_size
    }

    /// Inverse of (`owner`, `local_offset`)
    pub fn global_index(&self, worker: usize, offset: usize) -> usize {
        assert!(worker < self.workers, "worker {worker} out of range (P = {})", self.workers);
        assert!(
            offset < self.partition_size,
            "offset {offset} out of range (partition size {})",
            self.partition_size
        );
        worker * self.partition_size + offset
    }

    /// Global indices owned by `worker`
    pub fn range(&self, worker: usize) -> Range<usize> {
        assert!(worker < self.workers, "worker {worker} out of range (P = {})", self.workers);
        let start = worker * self.partition_size;
        start..start + self.partition_size
    }

    fn check(&self, i: usize) {
        assert!(i < self.bodies(), "body index {i} out of range (N = {})", self.bodies());
    }
}
