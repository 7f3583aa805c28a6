//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant `G`,
//! - fixed step size `dt`,
//! - number of steps to run

/// Gravitational constant used by the reference run
pub const G: f64 = 6.67e-11;
/// Fixed step size
pub const TIMESTEP: f64 = 0.25;
/// Number of timesteps in the reference run
pub const NSTEPS: usize = 10;
/// Bodies owned by each worker in the reference run
pub const PARTITION_SIZE: usize = 250;
/// Workers in the reference run
pub const WORKERS: usize = 40;

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub G: f64, // gravitational constant
    pub dt: f64, // step size
    pub steps: usize, // number of steps
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            G,
            dt: TIMESTEP,
            steps: NSTEPS,
        }
    }
}
