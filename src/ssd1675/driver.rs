//! SSD1675 driver for the 2.13" V2 panel
//!
//! Owns the [`DisplayInterface`] and sequences the controller: one-time
//! init, refresh-mode selection, frame upload and the refresh trigger
//! itself. The waveform tables and register values follow the vendor
//! sequence for this panel revision.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::ssd1675::graphics::Frame;
use crate::ssd1675::interface::DisplayInterface;
use crate::ssd1675::{cmd::Cmd, flag::Flag, HEIGHT, WIDTH};

/// Refresh mode the controller is configured for.
///
/// `Full` rewrites the whole panel with the flicker-heavy waveform that
/// clears ghosting; `Partial` redraws changed pixels only, fast and
/// flicker-free, which is what a once-a-second clock wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    Full,
    Partial,
}

/// The panel operations the refresh loop depends on.
///
/// Kept narrow so the loop can run against a fake panel in tests.
pub trait Panel {
    /// Push a full-bounds frame using the configured refresh mode
    fn draw_partial(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

/// SSD1675 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH while the controller refreshes)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Epd2in13<SPI, BSY, DC, RST, DELAY> {
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    mode: UpdateMode,
}

impl<SPI, BSY, DC, RST, DELAY> Epd2in13<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Waveform for full refreshes, from the vendor reference for this panel
    const LUT_FULL_UPDATE: [u8; 70] = [
        0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // LUT0: BB
        0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // LUT1: BW
        0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // LUT2: WB
        0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // LUT3: WW
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT4: VCOM
        0x03, 0x03, 0x00, 0x00, 0x02, // TP0: Phase 0 timing
        0x09, 0x09, 0x00, 0x00, 0x02, // TP1: Phase 1 timing
        0x03, 0x03, 0x00, 0x00, 0x02, // TP2: Phase 2 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP3: Phase 3 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP4: Phase 4 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP5: Phase 5 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP6: Phase 6 timing
    ];

    /// Waveform for partial refreshes, single short phase, no inverse pass
    const LUT_PARTIAL_UPDATE: [u8; 70] = [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT0: BB
        0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT1: BW
        0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT2: WB
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT3: WW
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT4: VCOM
        0x0A, 0x00, 0x00, 0x00, 0x00, // TP0: Phase 0 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP1: Phase 1 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP2: Phase 2 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP3: Phase 3 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP4: Phase 4 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP5: Phase 5 timing
        0x00, 0x00, 0x00, 0x00, 0x00, // TP6: Phase 6 timing
    ];

    /// Create the driver and run the full hardware init sequence
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Result<Self, DisplayError> {
        let interface = DisplayInterface::new(spi, busy, dc, rst, delay);
        let mut epd = Epd2in13 {
            interface,
            mode: UpdateMode::Full,
        };
        epd.init()?;
        Ok(epd)
    }

    /// Wrap an existing interface without touching the hardware
    #[cfg(test)]
    pub(crate) fn from_interface(interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>) -> Self {
        Epd2in13 {
            interface,
            mode: UpdateMode::Full,
        }
    }

    /// Initialise the controller for full refreshes
    fn init(&mut self) -> Result<(), DisplayError> {
        log::info!("initializing e-paper panel");

        self.interface.reset()?;

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.wait_busy_low();

        self.interface
            .cmd_with_data(Cmd::ANALOG_BLOCK_CONTROL, &[0x54])?;
        self.interface
            .cmd_with_data(Cmd::DIGITAL_BLOCK_CONTROL, &[0x3B])?;

        // 250 gate lines, scanned G0 upward
        let gates = HEIGHT - 1;
        self.interface.cmd_with_data(
            Cmd::DRIVER_CONTROL,
            &[(gates & 0xFF) as u8, (gates >> 8) as u8, 0x00],
        )?;

        self.interface
            .cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;
        self.use_full_frame()?;

        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_LUT3])?;
        self.interface
            .cmd_with_data(Cmd::WRITE_VCOM_REGISTER, &[Flag::VCOM_FULL_REFRESH])?;
        self.interface
            .cmd_with_data(Cmd::GATE_VOLTAGE_CONTROL, &[Flag::GATE_VOLTAGE_DEFAULT])?;
        self.interface
            .cmd_with_data(Cmd::SOURCE_VOLTAGE_CONTROL, &Flag::SOURCE_VOLTAGE_DEFAULT)?;
        self.interface
            .cmd_with_data(Cmd::WRITE_DUMMY_LINE_PERIOD, &[Flag::DUMMY_LINE_DEFAULT])?;
        self.interface
            .cmd_with_data(Cmd::SET_GATE_LINE_WIDTH, &[Flag::GATE_LINE_WIDTH_DEFAULT])?;
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;

        self.set_lut(&Self::LUT_FULL_UPDATE)?;
        self.interface.wait_busy_low();

        Ok(())
    }

    /// Switch refresh mode, reloading the waveform and border for it
    pub fn set_update_mode(&mut self, mode: UpdateMode) -> Result<(), DisplayError> {
        log::info!("selecting {:?} refresh mode", mode);
        match mode {
            UpdateMode::Full => {
                self.interface
                    .cmd_with_data(Cmd::WRITE_VCOM_REGISTER, &[Flag::VCOM_FULL_REFRESH])?;
                self.set_lut(&Self::LUT_FULL_UPDATE)?;
                self.interface.cmd_with_data(
                    Cmd::BORDER_WAVEFORM_CONTROL,
                    &[Flag::BORDER_WAVEFORM_LUT3],
                )?;
            }
            UpdateMode::Partial => {
                self.interface
                    .cmd_with_data(Cmd::WRITE_VCOM_REGISTER, &[Flag::VCOM_PARTIAL_REFRESH])?;
                self.interface.wait_busy_low();

                self.set_lut(&Self::LUT_PARTIAL_UPDATE)?;
                self.interface
                    .cmd_with_data(Cmd::WRITE_DISPLAY_OPTION, &Flag::DISPLAY_OPTION_PARTIAL)?;

                // power the clock and analog blocks once up front; the
                // per-frame trigger then only runs the display phase
                self.interface.cmd_with_data(
                    Cmd::DISPLAY_UPDATE_CTRL2,
                    &[Flag::DISPLAY_UPDATE_ENABLE_CLOCK_ANALOG],
                )?;
                self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
                self.interface.wait_busy_low();

                self.interface.cmd_with_data(
                    Cmd::BORDER_WAVEFORM_CONTROL,
                    &[Flag::BORDER_WAVEFORM_LUT1],
                )?;
            }
        }
        self.mode = mode;
        Ok(())
    }

    /// Upload a frame and refresh the panel at origin (0, 0).
    ///
    /// The frame must match the panel bounds exactly; anything else is a
    /// caller bug and comes back as `OutOfBoundsError` before any bus
    /// traffic happens.
    pub fn draw_partial(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if frame.width() != u32::from(WIDTH) || frame.height() != u32::from(HEIGHT) {
            log::error!(
                "frame is {}x{}, panel is {}x{}",
                frame.width(),
                frame.height(),
                WIDTH,
                HEIGHT
            );
            return Err(DisplayError::OutOfBoundsError);
        }

        self.use_full_frame()?;
        self.interface
            .cmd_with_data(Cmd::WRITE_BW_DATA, frame.buffer())?;
        self.update()
    }

    /// Flood the panel white and refresh
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.use_full_frame()?;
        self.interface.cmd(Cmd::WRITE_BW_DATA)?;

        let total_bytes = (u32::from(WIDTH) + 7) / 8 * u32::from(HEIGHT);
        self.interface.data_x_times(0xFF, total_bytes)?;

        self.update()
    }

    /// Put the controller into deep sleep; a hardware reset wakes it
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])
    }

    /// Trigger a refresh from RAM and wait for the controller to finish
    fn update(&mut self) -> Result<(), DisplayError> {
        let sequence = match self.mode {
            UpdateMode::Full => Flag::DISPLAY_UPDATE_FULL,
            UpdateMode::Partial => Flag::DISPLAY_UPDATE_PARTIAL,
        };
        self.interface
            .cmd_with_data(Cmd::DISPLAY_UPDATE_CTRL2, &[sequence])?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_busy_low();
        Ok(())
    }

    /// Set the RAM window to the whole panel and the counters to (0, 0)
    fn use_full_frame(&mut self) -> Result<(), DisplayError> {
        // X window in bytes: 122 px round up to 16 bytes
        let ram_x_end = ((u32::from(WIDTH) + 7) / 8 - 1) as u8;
        self.interface
            .cmd_with_data(Cmd::SET_RAMX_START_END, &[0x00, ram_x_end])?;

        // Y window in gate lines, little endian
        let ram_y_end = HEIGHT - 1;
        self.interface.cmd_with_data(
            Cmd::SET_RAMY_START_END,
            &[0x00, 0x00, (ram_y_end & 0xFF) as u8, (ram_y_end >> 8) as u8],
        )?;

        self.interface.cmd_with_data(Cmd::SET_RAMX_COUNTER, &[0x00])?;
        self.interface
            .cmd_with_data(Cmd::SET_RAMY_COUNTER, &[0x00, 0x00])
    }

    /// Set the Look-Up Table driving the refresh waveform
    fn set_lut(&mut self, lut_data: &[u8]) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::WRITE_LUT_REGISTER, lut_data)
    }
}

impl<SPI, BSY, DC, RST, DELAY> Panel for Epd2in13<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn draw_partial(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        Epd2in13::draw_partial(self, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::spi::Mock as SpiMock;

    #[test]
    fn mis_sized_frame_is_rejected_before_any_bus_traffic() {
        let mut spi: SpiMock<u8> = SpiMock::new(&[]);
        let mut busy = PinMock::new(&[]);
        let mut dc = PinMock::new(&[]);
        let mut rst = PinMock::new(&[]);

        let interface = DisplayInterface::new(
            spi.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            NoopDelay::new(),
        );
        let mut epd = Epd2in13::from_interface(interface);

        let undersized = Frame::new(10, 10);
        assert!(matches!(
            epd.draw_partial(&undersized),
            Err(DisplayError::OutOfBoundsError)
        ));

        let transposed = Frame::new(u32::from(HEIGHT), u32::from(WIDTH));
        assert!(matches!(
            epd.draw_partial(&transposed),
            Err(DisplayError::OutOfBoundsError)
        ));

        // the mocks were given no expectations, so any traffic would panic
        spi.done();
        busy.done();
        dc.done();
        rst.done();
    }
}
