use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ConfigError, SettlePolicy, Timing};

/// Propagation delay used for the gate-level timing model unless configured.
pub const DEFAULT_GATE_DELAY: u64 = 3;

/// Timing parameters of the acceptance scenarios.
///
/// Defaults reproduce the reference run: a 20 unit clock, reset held for 25
/// units and released 5 units before stimulus starts, ideal timing, and a one
/// unit settle delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestbenchConfig {
    pub clock_period: u64,
    /// How long `rst_n` is held low.
    pub reset_assert: u64,
    /// Delay between releasing `rst_n` and the first stimulus.
    pub reset_release: u64,
    pub timing: Timing,
    pub settle: SettlePolicy,
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            clock_period: 20,
            reset_assert: 25,
            reset_release: 5,
            timing: Timing::Ideal,
            settle: SettlePolicy::Fixed { delay: 1 },
        }
    }
}

impl TestbenchConfig {
    /// Settings for a device with output propagation delay: outputs lag by
    /// `delay` and are sampled one unit after the falling clock edge.
    pub fn gate_level(delay: u64) -> Self {
        Self {
            timing: Timing::Delayed { delay },
            settle: SettlePolicy::FallingEdge { delay: 1 },
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_period < 2 {
            return Err(ConfigError::Invalid(format!(
                "clock_period must be at least 2, got {}",
                self.clock_period
            )));
        }
        // A full period guarantees a rising edge inside the reset window.
        if self.reset_assert < self.clock_period {
            return Err(ConfigError::Invalid(format!(
                "reset_assert ({}) must cover a full clock period ({})",
                self.reset_assert, self.clock_period
            )));
        }
        Ok(())
    }
}
