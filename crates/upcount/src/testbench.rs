//! Stimulus-and-check driver.
//!
//! A [`Testbench`] drives the counter's input pins on a [`Simulation`] and
//! checks the outputs it sees on the pins. It never reads the model's
//! register directly.
//!
//! Checks are taken at settle points chosen by a [`SettlePolicy`], so the same
//! scenario runs unchanged against ideal and delayed timing.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    CheckError, Simulation, SimulationError, TestbenchConfig, TestbenchError,
    pins::{Hex, Observation, OutputPin, PinVector},
};

/// When outputs are sampled after a stimulus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SettlePolicy {
    /// Wait `delay` time units after the last change.
    Fixed { delay: u64 },
    /// Wait for the next falling clock edge, then `delay` time units.
    FallingEdge { delay: u64 },
}

pub struct Testbench {
    sim: Simulation,
    config: TestbenchConfig,
    checkpoints: usize,
}

impl Testbench {
    /// Creates a testbench over a fresh simulation using the configured timing.
    pub fn new(config: TestbenchConfig) -> Result<Self, SimulationError> {
        let sim = Simulation::builder().timing(config.timing).build()?;
        Ok(Self::with_simulation(sim, config))
    }

    /// Same as [`Testbench::new`], dumping every pin to a VCD file.
    pub fn with_vcd<P: AsRef<Path>>(
        config: TestbenchConfig,
        path: P,
    ) -> Result<Self, SimulationError> {
        let sim = Simulation::builder()
            .timing(config.timing)
            .vcd(path)
            .build()?;
        Ok(Self::with_simulation(sim, config))
    }

    pub fn with_simulation(sim: Simulation, config: TestbenchConfig) -> Self {
        Self {
            sim,
            config,
            checkpoints: 0,
        }
    }

    pub fn config(&self) -> &TestbenchConfig {
        &self.config
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Number of checks that passed so far.
    pub fn checkpoints(&self) -> usize {
        self.checkpoints
    }

    pub fn time(&self) -> u64 {
        self.sim.time()
    }

    /// Starts the clock with its first rising edge now and powers the device.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        self.sim.add_clock(self.config.clock_period, 0)?;
        self.drive(|pins| pins.ena = true)
    }

    /// Flushes the waveform trace.
    pub fn finish(&mut self) -> Result<(), SimulationError> {
        self.sim.finish()
    }

    /// Holds `rst_n` low with quiet inputs, then releases it.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.drive(|pins| {
            pins.rst_n = false;
            pins.ui_in = 0;
            pins.uio_in = 0;
        })?;
        self.sim.wait(self.config.reset_assert)?;
        self.drive(|pins| pins.rst_n = true)?;
        self.sim.wait(self.config.reset_release)
    }

    /// Changes input pins.
    pub fn drive<F>(&mut self, f: F) -> Result<(), SimulationError>
    where
        F: FnOnce(&mut PinVector),
    {
        self.sim.modify(f)?;
        let pins = self.sim.pins();
        debug!(
            "t={}: rst_n={} ena={} ui_in={:02x} uio_in={:02x}",
            self.sim.time(),
            pins.rst_n as u8,
            pins.ena as u8,
            pins.ui_in,
            pins.uio_in
        );
        Ok(())
    }

    pub fn rising_edge(&mut self) -> Result<(), SimulationError> {
        self.sim.wait_rising_edge()
    }

    pub fn rising_edges(&mut self, count: usize) -> Result<(), SimulationError> {
        for _ in 0..count {
            self.sim.wait_rising_edge()?;
        }
        Ok(())
    }

    pub fn wait(&mut self, duration: u64) -> Result<(), SimulationError> {
        self.sim.wait(duration)
    }

    /// Waits until outputs are stable according to the settle policy.
    pub fn settle(&mut self) -> Result<(), SimulationError> {
        match self.config.settle {
            SettlePolicy::Fixed { delay } => self.sim.wait(delay),
            SettlePolicy::FallingEdge { delay } => {
                self.sim.wait_falling_edge()?;
                self.sim.wait(delay)
            }
        }
    }

    pub fn observe(&self) -> Observation {
        self.sim.observe()
    }

    /// Compares one output against `expected` at the current time.
    pub fn expect(&mut self, checkpoint: &str, pin: OutputPin, expected: u8) -> Result<(), CheckError> {
        let actual = self.sim.observe().get(pin);
        let time = self.sim.time();
        if actual != Some(expected) {
            let err = CheckError {
                checkpoint: checkpoint.to_string(),
                pin,
                time,
                expected,
                actual,
            };
            warn!("{err}");
            return Err(err);
        }
        self.checkpoints += 1;
        info!("t={time}: {checkpoint}: {pin} = {}", Hex(actual));
        Ok(())
    }

    /// Settles, then checks one output.
    pub fn settle_and_expect(
        &mut self,
        checkpoint: &str,
        pin: OutputPin,
        expected: u8,
    ) -> Result<(), TestbenchError> {
        self.settle()?;
        self.expect(checkpoint, pin, expected)?;
        Ok(())
    }
}
