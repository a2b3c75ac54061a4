use log::info;
use serde::Serialize;
use std::path::Path;

use crate::{
    Testbench, TestbenchConfig, TestbenchError,
    pins::{EN, LOAD, OE, OutputPin},
};

type ScenarioFn = fn(&mut Testbench) -> Result<(), TestbenchError>;

/// A named acceptance script.
#[derive(Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    body: ScenarioFn,
}

/// Every registered scenario, in run order.
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "counter_basic",
        description: "Program, count, and tri-state checks",
        body: counter_basic,
    },
    Scenario {
        name: "counter_wraparound",
        description: "Count through the 0xff -> 0x00 boundary",
        body: counter_wraparound,
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

/// Result of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub passed: bool,
    /// Checks that passed before the scenario ended.
    pub checkpoints: usize,
    pub end_time: u64,
    pub error: Option<String>,
}

impl Scenario {
    /// Runs the script against `tb`, stopping at the first failure.
    pub fn run_on(&self, tb: &mut Testbench) -> Result<(), TestbenchError> {
        (self.body)(tb)
    }

    /// Runs the script on a fresh device and summarizes the outcome.
    pub fn run(
        &self,
        config: &TestbenchConfig,
        vcd: Option<&Path>,
    ) -> Result<ScenarioReport, TestbenchError> {
        let mut tb = match vcd {
            Some(path) => Testbench::with_vcd(config.clone(), path)?,
            None => Testbench::new(config.clone())?,
        };
        info!("running {}: {}", self.name, self.description);
        let outcome = self.run_on(&mut tb);
        tb.finish()?;
        Ok(ScenarioReport {
            name: self.name,
            passed: outcome.is_ok(),
            checkpoints: tb.checkpoints(),
            end_time: tb.time(),
            error: outcome.err().map(|e| e.to_string()),
        })
    }
}

fn counter_basic(tb: &mut Testbench) -> Result<(), TestbenchError> {
    tb.start()?;
    tb.reset()?;

    // Drive the uio bus, no counting, no load
    tb.drive(|pins| pins.ui_in = 1 << OE)?;
    tb.settle_and_expect("after reset", OutputPin::UoOut, 0x00)?;

    tb.drive(|pins| {
        pins.uio_in = 0xF0;
        pins.set_bit(LOAD, true);
    })?;
    tb.rising_edge()?;
    tb.drive(|pins| pins.set_bit(LOAD, false))?;
    tb.settle_and_expect("after load", OutputPin::UoOut, 0xF0)?;

    tb.drive(|pins| pins.set_bit(EN, true))?;
    tb.rising_edges(3)?;
    tb.settle_and_expect("after 3 inc", OutputPin::UoOut, 0xF3)?;

    // EN stays high while the bus floats
    tb.drive(|pins| pins.set_bit(OE, false))?;
    tb.settle_and_expect("tri-state", OutputPin::UioOe, 0x00)?;

    tb.drive(|pins| pins.set_bit(OE, true))?;
    tb.settle_and_expect("drive", OutputPin::UioOe, 0xFF)?;
    Ok(())
}

fn counter_wraparound(tb: &mut Testbench) -> Result<(), TestbenchError> {
    tb.start()?;
    tb.reset()?;

    tb.drive(|pins| {
        pins.ui_in = (1 << OE) | (1 << LOAD);
        pins.uio_in = 0xFE;
    })?;
    tb.rising_edge()?;
    tb.drive(|pins| {
        pins.set_bit(LOAD, false);
        pins.set_bit(EN, true);
    })?;
    tb.settle_and_expect("after load", OutputPin::UoOut, 0xFE)?;

    for (edge, expected) in [0xFF, 0x00, 0x01, 0x02, 0x03].into_iter().enumerate() {
        tb.rising_edge()?;
        tb.settle_and_expect(&format!("inc {}", edge + 1), OutputPin::UoOut, expected)?;
    }
    Ok(())
}
