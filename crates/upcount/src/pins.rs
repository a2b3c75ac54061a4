use serde::Serialize;

/// `ui_in` bit that enables counting.
pub const EN: u8 = 0;
/// `ui_in` bit that requests a synchronous load from `uio_in`.
pub const LOAD: u8 = 1;
/// `ui_in` bit that drives the `uio_*` bus (1 = drive, 0 = high-impedance).
pub const OE: u8 = 2;

/// Input pins presented to the device at one instant.
///
/// The clock is not part of the vector; it is owned by the
/// [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PinVector {
    /// Active-low reset.
    pub rst_n: bool,
    /// Power/select gate.
    pub ena: bool,
    pub ui_in: u8,
    /// Parallel load value.
    pub uio_in: u8,
}

impl PinVector {
    /// Pins with every input low, reset asserted.
    pub fn quiescent() -> Self {
        Self::default()
    }

    pub fn bit(&self, bit: u8) -> bool {
        self.ui_in & (1 << bit) != 0
    }

    pub fn set_bit(&mut self, bit: u8, value: bool) {
        if value {
            self.ui_in |= 1 << bit;
        } else {
            self.ui_in &= !(1 << bit);
        }
    }

    pub fn en(&self) -> bool {
        self.bit(EN)
    }

    pub fn load(&self) -> bool {
        self.bit(LOAD)
    }

    pub fn oe(&self) -> bool {
        self.bit(OE)
    }

    pub fn in_reset(&self) -> bool {
        !self.rst_n
    }
}

/// An output bus of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputPin {
    UoOut,
    UioOe,
}

impl std::fmt::Display for OutputPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UoOut => write!(f, "uo_out"),
            Self::UioOe => write!(f, "uio_oe"),
        }
    }
}

/// Outputs sampled from the device.
///
/// `uo_out` is `None` while the register has never been reset or loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Observation {
    pub uo_out: Option<u8>,
    pub uio_oe: u8,
}

impl Observation {
    pub fn get(&self, pin: OutputPin) -> Option<u8> {
        match pin {
            OutputPin::UoOut => self.uo_out,
            OutputPin::UioOe => Some(self.uio_oe),
        }
    }
}

/// Formats a sampled byte as two hex digits, `xx` when undefined.
pub struct Hex(pub Option<u8>);

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:02x}"),
            None => write!(f, "xx"),
        }
    }
}
