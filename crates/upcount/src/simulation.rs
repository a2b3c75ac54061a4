use crate::{
    SimulationError,
    device::Device,
    pins::{Observation, PinVector},
    scheduler::{ClockDef, EventKind, Scheduler},
    vcd::VcdWriter,
};

mod builder;

pub use builder::{SimulationBuilder, SimulationOptions, Timing};

/// A timed simulation of the counter.
///
/// Manages simulation time, the free-running clock, and the visible outputs,
/// which lag the model by the configured [`Timing`].
pub struct Simulation {
    pub(crate) device: Device,
    pub(crate) scheduler: Scheduler,
    pub(crate) vcd_writer: Option<VcdWriter>,
    timing: Timing,
    clk: bool,
    // Outputs most recently computed by the model, visible or not.
    computed: Observation,
    visible: Observation,
    rising_edges: u64,
    falling_edges: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.scheduler.time)
            .field("pins", self.device.pins())
            .field("visible", &self.visible)
            .finish()
    }
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    pub(crate) fn new(options: SimulationOptions) -> Self {
        let device = Device::new();
        let outputs = device.observe();
        Self {
            device,
            scheduler: Scheduler::new(),
            vcd_writer: None,
            timing: options.timing,
            clk: false,
            computed: outputs,
            visible: outputs,
            rising_edges: 0,
            falling_edges: 0,
        }
    }

    /// Register the clock and its period, enqueuing the first rising edge.
    /// `initial_delay` specifies when the first rising edge occurs.
    pub fn add_clock(&mut self, period: u64, initial_delay: u64) -> Result<(), SimulationError> {
        if period < 2 {
            return Err(SimulationError::InvalidClock { period });
        }
        if let Some(def) = self.scheduler.clock {
            return Err(SimulationError::ClockRunning { period: def.period });
        }
        self.scheduler.clock = Some(ClockDef { period });
        self.scheduler.push(
            self.scheduler.time + initial_delay,
            EventKind::Clock { next_level: true },
        );
        Ok(())
    }

    /// Modifies the input pins via a callback and schedules the resulting
    /// output change.
    pub fn modify<F>(&mut self, f: F) -> Result<(), SimulationError>
    where
        F: FnOnce(&mut PinVector),
    {
        self.device.modify(f);
        self.propagate();
        self.dump()
    }

    /// Advance time to the next scheduled event and process all events at that time.
    /// Returns the new simulation time, or None if no events are scheduled.
    pub fn step(&mut self) -> Result<Option<u64>, SimulationError> {
        let (current_time, events) = match self.scheduler.pop_all_at_next_time() {
            Some(res) => res,
            None => return Ok(None),
        };
        self.scheduler.time = current_time;

        for ev in events {
            match ev.kind {
                EventKind::Settle(outputs) => self.visible = outputs,
                EventKind::Clock { next_level } => self.toggle_clock(current_time, next_level),
            }
        }

        self.dump()?;
        Ok(Some(current_time))
    }

    fn toggle_clock(&mut self, now: u64, next_level: bool) {
        let rising = next_level && !self.clk;
        let falling = !next_level && self.clk;
        self.clk = next_level;
        if rising {
            self.rising_edges += 1;
            self.device.tick();
            self.propagate();
        } else if falling {
            self.falling_edges += 1;
        }

        if let Some(def) = self.scheduler.clock {
            let high = def.period / 2;
            let delay = if next_level { high } else { def.period - high };
            self.scheduler.push(
                now + delay,
                EventKind::Clock {
                    next_level: !next_level,
                },
            );
        }
    }

    // Re-evaluates the combinational outputs and makes them visible after the
    // propagation delay.
    fn propagate(&mut self) {
        let outputs = self.device.observe();
        if outputs == self.computed {
            return;
        }
        self.computed = outputs;
        match self.timing.delay() {
            0 => self.visible = outputs,
            delay => self
                .scheduler
                .push(self.scheduler.time + delay, EventKind::Settle(outputs)),
        }
    }

    /// Advance time and run until `end_time` (inclusive).
    pub fn run_until(&mut self, end_time: u64) -> Result<(), SimulationError> {
        while let Some(next_time) = self.scheduler.next_event_time() {
            if next_time > end_time {
                break;
            }
            self.step()?;
        }
        self.scheduler.time = self.scheduler.time.max(end_time);
        self.dump()
    }

    /// Advance time by `duration`.
    pub fn wait(&mut self, duration: u64) -> Result<(), SimulationError> {
        self.run_until(self.scheduler.time + duration)
    }

    /// Advance until the next rising clock edge has been processed.
    pub fn wait_rising_edge(&mut self) -> Result<(), SimulationError> {
        let target = self.rising_edges + 1;
        while self.rising_edges < target {
            self.step_or_stall()?;
        }
        Ok(())
    }

    /// Advance until the next falling clock edge has been processed.
    pub fn wait_falling_edge(&mut self) -> Result<(), SimulationError> {
        let target = self.falling_edges + 1;
        while self.falling_edges < target {
            self.step_or_stall()?;
        }
        Ok(())
    }

    fn step_or_stall(&mut self) -> Result<(), SimulationError> {
        if self.scheduler.clock.is_none() || self.step()?.is_none() {
            return Err(SimulationError::Stalled {
                time: self.scheduler.time,
            });
        }
        Ok(())
    }

    /// Outputs as currently seen on the device pins.
    pub fn observe(&self) -> Observation {
        self.visible
    }

    pub fn pins(&self) -> &PinVector {
        self.device.pins()
    }

    /// Current level of the clock.
    pub fn clk(&self) -> bool {
        self.clk
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> u64 {
        self.scheduler.time
    }

    /// Returns the time of the next scheduled event, if any.
    pub fn next_event_time(&self) -> Option<u64> {
        self.scheduler.next_event_time()
    }

    /// Number of rising clock edges processed so far.
    pub fn rising_edges(&self) -> u64 {
        self.rising_edges
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Flushes the VCD trace, if any.
    pub fn finish(&mut self) -> Result<(), SimulationError> {
        if let Some(ref mut writer) = self.vcd_writer {
            writer.flush()?;
        }
        Ok(())
    }

    /// Captures the current state of all pins and writes the changes to the VCD file.
    pub(crate) fn dump(&mut self) -> Result<(), SimulationError> {
        if let Some(ref mut writer) = self.vcd_writer {
            let pins = self.device.pins();
            let sample = [
                Some(self.clk as u8),
                Some(pins.rst_n as u8),
                Some(pins.ena as u8),
                Some(pins.ui_in),
                Some(pins.uio_in),
                self.visible.uo_out,
                Some(self.visible.uio_oe),
            ];
            writer.dump(self.scheduler.time, &sample)?;
        }
        Ok(())
    }
}
