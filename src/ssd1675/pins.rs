//! Pin and device-node assignments for the 2.13" e-paper HAT
//!
//! Offsets are BCM line numbers on the Raspberry Pi 40-pin header, matching
//! the HAT's fixed wiring.

/// Pin configuration constants for the e-paper HAT
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    /// Reset pin for display
    pub const RST: u32 = 17;
    /// Data/Command control pin (High for data, Low for command)
    pub const DC: u32 = 25;
    /// Busy status pin (High when display is busy)
    pub const BUSY: u32 = 24;
    /// Chip Select, driven by the spidev CE0 line rather than by this program
    pub const CS: u32 = 8;
}

/// spidev node the HAT's controller answers on (CE0)
pub const SPI_DEVICE: &str = "/dev/spidev0.0";

/// GPIO character device holding the RST/DC/BUSY lines
pub const GPIO_CHIP: &str = "/dev/gpiochip0";
