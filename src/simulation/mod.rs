pub mod states;
pub mod params;
pub mod partition;
pub mod store;
pub mod forces;
pub mod integrator;
pub mod scenario;
pub mod engine;
