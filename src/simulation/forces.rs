//! Force contributors for the n-body engine
//!
//! Defines the pairwise force trait, direct Newtonian gravity and the
//! per-worker all-pairs scan over every partition of the current generation

use crate::simulation::states::{Body, NVec3};
use crate::simulation::store::{Generation, WorkerView};

/// Trait for force sources acting on one target body
/// Implementations add the force exerted by every body in `sources`
/// on `target` into `out`
pub trait Force {
    fn accumulate(&self, target: &Body, sources: &[Body], out: &mut NVec3);
}

/// Direct Newtonian gravity, no softening
///
/// A pair at exactly zero separation contributes nothing. That one check
/// excludes the self pair and also silently drops any two distinct bodies
/// sitting on the same point.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
}

impl Force for NewtonianGravity {
    fn accumulate(&self, target: &Body, sources: &[Body], out: &mut NVec3) {
        for source in sources {
            // displacement from source to target
            let r = target.x - source.x;
            let d = (r.x * r.x + r.y * r.y + r.z * r.z).sqrt();

            if d != 0.0 {
                let f = (self.G * target.m * source.m) / (d * d);
                *out += r * f / d;
            }
        }
    }
}

/// Net force on every body of `targets` from the whole population
///
/// `targets` is the calling worker's own partition of `current`; `out[i]` is
/// overwritten with the force on `targets[i]`. Each partition is fetched once
/// and scanned for every target, walking partitions in worker order so the
/// sum for each target always runs over global indices `0..N` in order,
/// whatever the worker count.
pub fn partition_forces<F: Force>(
    force: &F,
    view: &WorkerView<'_>,
    targets: &[Body],
    out: &mut [NVec3],
    scratch: &mut Vec<Body>,
) {
    for a in out.iter_mut() {
        *a = NVec3::zeros();
    }

    for w in 0..view.workers() {
        view.fetch_partition_into(Generation::Current, w, scratch);
        for (target, acc) in targets.iter().zip(out.iter_mut()) {
            force.accumulate(target, scratch, acc);
        }
    }
}
