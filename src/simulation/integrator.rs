//! Fixed-step time integrator for the partitioned system
//!
//! Explicit step where the position is advanced with the velocity from the
//! start of the step, not the freshly kicked one.

use super::states::{Body, NVec3};

/// Advance one body by `dt` under net force `force`
pub fn advance(body: &Body, force: NVec3, dt: f64) -> Body {
    // a_n = F_n / m
    let a = force / body.m;

    Body {
        // x_n+1 = x_n + dt v_n
        x: body.x + dt * body.v,
        // v_n+1 = v_n + dt a_n
        v: body.v + dt * a,
        m: body.m,
    }
}

/// Integrate a whole partition into its slot of the next generation
///
/// `current`, `forces` and `next` are indexed alike.
pub fn advance_partition(current: &[Body], forces: &[NVec3], next: &mut [Body], dt: f64) {
    for ((slot, body), f) in next.iter_mut().zip(current).zip(forces) {
        *slot = advance(body, *f, dt);
    }
}
