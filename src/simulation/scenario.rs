//! Build fully-validated simulation runs from configuration
//!
//! Takes a `SimulationConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario`) containing:
//! - numerical parameters (`Parameters`)
//! - the static partition layout (`PartitionMap`)
//! - the initial population (`InitialState`)
//!
//! All structural checks happen here, once, before any worker starts.

use crate::configuration::config::SimulationConfig;
use crate::error::SimError;
use crate::simulation::params::Parameters;
use crate::simulation::partition::PartitionMap;
use crate::simulation::states::Body;

/// Where the population at t = 0 comes from
#[derive(Debug, Clone)]
pub enum InitialState {
    /// [`Body::initial`] for every global index
    Deterministic,
    /// Explicit bodies in global index order
    Explicit(Vec<Body>),
}

impl InitialState {
    /// Initial body for global index `i`
    pub fn body(&self, i: usize) -> Body {
        match self {
            InitialState::Deterministic => Body::initial(i),
            InitialState::Explicit(bodies) => bodies[i],
        }
    }
}

/// Validated run description
///
/// Fields are private so that every `Scenario` has passed the checks in its
/// constructors: the population splits evenly across the workers and an
/// explicit population has exactly `map().bodies()` entries.
#[derive(Debug, Clone)]
pub struct Scenario {
    parameters: Parameters,
    map: PartitionMap,
    initial: InitialState,
}

impl Scenario {
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn map(&self) -> &PartitionMap {
        &self.map
    }

    pub fn initial(&self) -> &InitialState {
        &self.initial
    }

    /// Deterministic population described by a config
    pub fn build(cfg: &SimulationConfig) -> Result<Self, SimError> {
        let map = PartitionMap::for_population(cfg.engine.bodies, cfg.engine.workers)?;

        // Parameters (runtime) from ParametersConfig
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            G: p_cfg.G,
            dt: p_cfg.timestep,
            steps: p_cfg.steps,
        };

        Self::new(parameters, map, InitialState::Deterministic)
    }

    /// Explicit population split across `workers`
    pub fn with_bodies(
        parameters: Parameters,
        workers: usize,
        bodies: Vec<Body>,
    ) -> Result<Self, SimError> {
        let map = PartitionMap::for_population(bodies.len(), workers)?;
        Self::new(parameters, map, InitialState::Explicit(bodies))
    }

    /// Deterministic population of `bodies` split across `workers`
    pub fn deterministic(
        parameters: Parameters,
        workers: usize,
        bodies: usize,
    ) -> Result<Self, SimError> {
        let map = PartitionMap::for_population(bodies, workers)?;
        Self::new(parameters, map, InitialState::Deterministic)
    }

    fn new(parameters: Parameters, map: PartitionMap, initial: InitialState) -> Result<Self, SimError> {
        if !(parameters.dt.is_finite() && parameters.dt > 0.0) {
            return Err(SimError::InvalidTimestep(parameters.dt));
        }
        if let InitialState::Explicit(bodies) = &initial {
            if bodies.len() != map.bodies() {
                return Err(SimError::PopulationMismatch {
                    bodies: bodies.len(),
                    expected: map.bodies(),
                });
            }
        }
        Ok(Self { parameters, map, initial })
    }
}
