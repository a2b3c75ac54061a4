use crate::pins::{Observation, PinVector};

/// Bit-accurate model of the loadable up-counter.
///
/// The register is `None` until the first reset or load. Increment and hold
/// keep an undefined register undefined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    register: Option<u8>,
}

impl Counter {
    /// A freshly powered counter with an undefined register.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> Option<u8> {
        self.register
    }

    /// Forces the register to zero.
    pub fn apply_reset(&mut self) {
        self.register = Some(0);
    }

    /// Samples `pins` on a rising clock edge.
    ///
    /// Reset wins over load, load wins over increment.
    pub fn on_rising_edge(&mut self, pins: &PinVector) {
        if pins.in_reset() {
            self.apply_reset();
        } else if pins.load() {
            self.register = Some(pins.uio_in);
        } else if pins.en() {
            self.register = self.register.map(|v| v.wrapping_add(1));
        }
    }

    /// Combinational outputs for the current register and `pins`.
    pub fn observe(&self, pins: &PinVector) -> Observation {
        Observation {
            uo_out: self.register,
            uio_oe: if pins.oe() { 0xFF } else { 0x00 },
        }
    }
}

/// Untimed access to the counter through its pins.
///
/// Inputs are changed with [`Device::modify`] and the clock is advanced one
/// rising edge at a time with [`Device::tick`]. For a timed view with a
/// free-running clock use [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, Default)]
pub struct Device {
    pub(crate) counter: Counter,
    pub(crate) pins: PinVector,
}

impl Device {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modifies the input pins via a callback.
    pub fn modify<F>(&mut self, f: F)
    where
        F: FnOnce(&mut PinVector),
    {
        f(&mut self.pins);
    }

    /// Applies one rising clock edge with the current pins.
    pub fn tick(&mut self) {
        self.counter.on_rising_edge(&self.pins);
    }

    /// Applies `count` rising clock edges.
    pub fn tick_n(&mut self, count: u32) {
        for _ in 0..count {
            self.tick();
        }
    }

    pub fn observe(&self) -> Observation {
        self.counter.observe(&self.pins)
    }

    pub fn pins(&self) -> &PinVector {
        &self.pins
    }
}
