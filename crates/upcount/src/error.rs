use crate::pins::{Hex, OutputPin};
use thiserror::Error;

/// An observed output byte differed from the expected one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub checkpoint: String,
    pub pin: OutputPin,
    pub time: u64,
    pub expected: u8,
    /// `None` when the output was undefined.
    pub actual: Option<u8>,
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} expected {:02x} got {} at t={}",
            self.checkpoint,
            self.pin,
            self.expected,
            Hex(self.actual),
            self.time
        )
    }
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("simulation stalled at t={time}: no clock is running")]
    Stalled { time: u64 },
    #[error("clock period {period} is too short, need at least 2")]
    InvalidClock { period: u64 },
    #[error("a clock with period {period} is already running")]
    ClockRunning { period: u64 },
    #[error("VCD write failed: {0}")]
    Vcd(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TestbenchError {
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
