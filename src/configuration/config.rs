//! Configuration types for loading simulation runs from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! run. A run consists of:
//!
//! - [`EngineConfig`]     – population size and worker count
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`SimulationConfig`] – top-level wrapper used to load a run from YAML
//!
//! # YAML format
//! The reference run, matching these types:
//!
//! ```yaml
//! engine:
//!   workers: 40             # number of parallel workers, P
//!   bodies: 10000           # population size N, must be a multiple of P
//!
//! parameters:
//!   G: 6.67e-11             # gravitational constant
//!   timestep: 0.25          # fixed step size
//!   steps: 10               # number of steps
//! ```
//!
//! Every field is optional and falls back to the reference value above, so an
//! empty file describes the reference run.

use std::io::Read;

use serde::Deserialize;

use crate::simulation::params::{G, NSTEPS, PARTITION_SIZE, TIMESTEP, WORKERS};

/// Shape of the parallel run
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub workers: usize, // P, fixed for the whole run
    pub bodies: usize, // N, must be an exact multiple of P
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: WORKERS,
            bodies: WORKERS * PARTITION_SIZE,
        }
    }
}

/// Global numerical and physical parameters
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub G: f64, // gravitational constant
    pub timestep: f64, // fixed step size
    pub steps: usize, // number of steps to run
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            G,
            timestep: TIMESTEP,
            steps: NSTEPS,
        }
    }
}

/// Top-level run configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub engine: EngineConfig, // population and worker layout
    pub parameters: ParametersConfig, // numerical and physical parameters
}

impl SimulationConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
