use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("population is empty")]
    NoBodies,

    #[error("{bodies} bodies cannot be split evenly across {workers} workers")]
    UnevenPartition { bodies: usize, workers: usize },

    #[error("initial population has {bodies} bodies, partition layout expects {expected}")]
    PopulationMismatch { bodies: usize, expected: usize },

    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f64),

    #[error("worker {worker} panicked during the run")]
    WorkerPanicked { worker: usize },
}
