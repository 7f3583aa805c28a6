pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, NVec3};
pub use simulation::params::Parameters;
pub use simulation::partition::PartitionMap;
pub use simulation::store::{BodyStore, Generation, WorkerView};
pub use simulation::forces::{Force, NewtonianGravity, partition_forces};
pub use simulation::integrator::{advance, advance_partition};
pub use simulation::scenario::{Scenario, InitialState};
pub use simulation::engine::{run, RunReport};

pub use configuration::config::{SimulationConfig, EngineConfig, ParametersConfig};

pub use benchmark::benchmark::{bench_workers, even_worker_counts};

pub use error::SimError;
