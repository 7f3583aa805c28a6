//! Double-buffered, partitioned storage for the whole population
//!
//! Each partition keeps two buffers. Which one is `current` and which one is
//! `next` depends on the epoch a worker is in, so publishing a step is a local
//! role swap instead of a copy. Within one epoch every worker agrees on the
//! roles:
//!
//! - `current` buffers are only read, and only through bulk snapshot copies
//!   ([`WorkerView::fetch_partition`]).
//! - a `next` buffer is only touched by its owner, through
//!   [`WorkerView::local_slice`].
//!
//! A worker that has already published sits at epoch `t + 1` until the
//! barrier, but it reads nothing there. Slower peers still at epoch `t` keep
//! reading the buffer the fast worker just retired, which it will not write
//! again until everyone has passed the barrier. One rendezvous per step is
//! therefore enough.

use std::ops::{Deref, DerefMut};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use crate::simulation::partition::PartitionMap;
use crate::simulation::states::Body;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Current,
    Next,
}

/// Both generations of one worker's partition
struct PartitionSlot {
    buffers: [RwLock<Vec<Body>>; 2],
}

impl PartitionSlot {
    fn new(size: usize) -> Self {
        Self {
            buffers: [
                RwLock::new(vec![Body::default(); size]),
                RwLock::new(vec![Body::default(); size]),
            ],
        }
    }
}

pub struct BodyStore {
    map: PartitionMap,
    partitions: Vec<PartitionSlot>,
}

impl BodyStore {
    pub fn new(map: PartitionMap) -> Self {
        let partitions = (0..map.workers())
            .map(|_| PartitionSlot::new(map.partition_size()))
            .collect();
        Self { map, partitions }
    }

    /// Hand out exactly one view per worker
    ///
    /// Views are the only way to reach a partition's buffers, and only the
    /// view for worker `w` can write worker `w`'s partition. The views hold
    /// the store mutably borrowed, so a second set cannot exist alongside:
    ///
    /// ```compile_fail
    /// use spmd_nbody::{BodyStore, PartitionMap};
    ///
    /// let mut store = BodyStore::new(PartitionMap::new(2, 1).unwrap());
    /// let first = store.split();
    /// let second = store.split();
    /// drop((first, second));
    /// ```
    pub fn split(&mut self) -> Vec<WorkerView<'_>> {
        let store = &*self;
        (0..store.map.workers())
            .map(|worker| WorkerView { store, worker, epoch: 0 })
            .collect()
    }

    /// Full population in global index order, as `current` at `epoch`
    ///
    /// Only meaningful once every worker has reached `epoch`.
    pub fn gather(&self, epoch: usize) -> Vec<Body> {
        let mut out = Vec::with_capacity(self.map.bodies());
        for slot in &self.partitions {
            let buf = slot.buffers[epoch % 2]
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            out.extend_from_slice(&buf);
        }
        out
    }
}

/// One worker's handle on the store
pub struct WorkerView<'a> {
    store: &'a BodyStore,
    worker: usize,
    epoch: usize,
}

impl<'a> WorkerView<'a> {
    pub fn worker(&self) -> usize {
        self.worker
    }

    pub fn workers(&self) -> usize {
        self.store.map.workers()
    }

    pub fn map(&self) -> &PartitionMap {
        &self.store.map
    }

    fn buffer(&self, generation: Generation) -> usize {
        match generation {
            Generation::Current => self.epoch % 2,
            Generation::Next => (self.epoch + 1) % 2,
        }
    }

    /// Mutable view of this worker's own partition, no copy
    ///
    /// Writing `current` is only legitimate while populating the initial
    /// state, before the first barrier. During a step use `Generation::Next`.
    pub fn local_slice(&mut self, generation: Generation) -> LocalSlice<'_> {
        let slot = &self.store.partitions[self.worker];
        let guard = slot.buffers[self.buffer(generation)]
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        LocalSlice { guard }
    }

    /// Snapshot copy of `worker`'s partition
    ///
    /// Another worker's `next` is never readable.
    pub fn fetch_partition(&self, generation: Generation, worker: usize) -> Vec<Body> {
        let mut out = Vec::with_capacity(self.store.map.partition_size());
        self.fetch_partition_into(generation, worker, &mut out);
        out
    }

    /// Same as [`fetch_partition`](Self::fetch_partition), reusing `out`
    pub fn fetch_partition_into(&self, generation: Generation, worker: usize, out: &mut Vec<Body>) {
        assert!(
            generation == Generation::Current || worker == self.worker,
            "worker {} tried to read the next generation of worker {worker}",
            self.worker
        );
        let slot = &self.store.partitions[worker];
        let buf = slot.buffers[self.buffer(generation)]
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        out.clear();
        out.extend_from_slice(&buf);
    }

    /// Make this worker's `next` partition its `current` one
    ///
    /// Purely local: flips which buffer this view treats as current. Peers
    /// see the new data once they have also advanced past the barrier.
    pub fn publish_local(&mut self) {
        self.epoch += 1;
    }
}

/// Exclusive borrow of one worker's partition buffer
pub struct LocalSlice<'a> {
    guard: RwLockWriteGuard<'a, Vec<Body>>,
}

impl Deref for LocalSlice<'_> {
    type Target = [Body];

    fn deref(&self) -> &[Body] {
        &self.guard
    }
}

impl DerefMut for LocalSlice<'_> {
    fn deref_mut(&mut self) -> &mut [Body] {
        &mut self.guard
    }
}
