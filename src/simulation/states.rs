//! Core state types for the partitioned N-body simulation.
//!
//! A `Body` is one point mass. Bodies are plain `Copy` values: a worker never
//! mutates one in place, it writes a freshly integrated body into the next
//! generation instead.

use std::fmt;

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass, constant for the whole run
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m }
    }

    /// Deterministic initial condition for global index `i`
    ///
    /// Pure function of the index so every worker can build its own
    /// partition without talking to anyone, and two runs always start from
    /// the same population.
    pub fn initial(i: usize) -> Self {
        let i = i as f64;
        Self {
            x: NVec3::new(100.0 * (i + 0.1), 200.0 * (i + 0.1), 300.0 * (i + 0.1)),
            v: NVec3::new(i + 400.0, i + 500.0, i + 600.0),
            m: 10e6 * (i + 100.2),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self {
            x: NVec3::zeros(),
            v: NVec3::zeros(),
            m: 0.0,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x: {:7.3} y: {:7.3} z: {:7.3} dx: {:7.3} dy: {:7.3} dz: {:7.3}",
            self.x.x, self.x.y, self.x.z, self.v.x, self.v.y, self.v.z
        )
    }
}
