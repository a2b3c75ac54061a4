use serde::{Deserialize, Serialize};

use super::Simulation;
use crate::SimulationError;

/// When the device's outputs become visible after the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Timing {
    /// Outputs change in the same instant as their cause.
    #[default]
    Ideal,
    /// Outputs settle `delay` time units after their cause.
    Delayed { delay: u64 },
}

impl Timing {
    pub fn delay(&self) -> u64 {
        match self {
            Self::Ideal => 0,
            Self::Delayed { delay } => *delay,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    pub timing: Timing,
}

/// A fluent builder for configuring and initializing a [`Simulation`].
#[derive(Debug, Default)]
pub struct SimulationBuilder {
    options: SimulationOptions,
    vcd_path: Option<std::path::PathBuf>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the timing model of the device outputs.
    pub fn timing(mut self, timing: Timing) -> Self {
        self.options.timing = timing;
        self
    }

    /// Enable VCD dumping to the specified file.
    pub fn vcd<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.vcd_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Constructs the simulation around a freshly powered device.
    pub fn build(self) -> Result<Simulation, SimulationError> {
        let mut sim = Simulation::new(self.options);
        if let Some(path) = self.vcd_path {
            sim.vcd_writer = Some(crate::vcd::VcdWriter::new(path)?);
        }
        sim.dump()?;
        Ok(sim)
    }
}
