mod config;
mod device;
mod error;
pub mod pins;
mod scenario;
mod scheduler;
mod simulation;
mod testbench;
mod vcd;

pub use config::{DEFAULT_GATE_DELAY, TestbenchConfig};
pub use device::{Counter, Device};
pub use error::{CheckError, ConfigError, SimulationError, TestbenchError};
pub use pins::{Observation, OutputPin, PinVector};
pub use scenario::{SCENARIOS, Scenario, ScenarioReport, find as find_scenario};
pub use simulation::{Simulation, SimulationBuilder, SimulationOptions, Timing};
pub use testbench::{SettlePolicy, Testbench};
