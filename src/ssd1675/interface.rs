//! Display interface using SPI
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

const BUSY_POLL_INTERVAL_MS: u32 = 1;
const BUSY_WAIT_TIMEOUT_MS: u32 = 10_000;

/// The connection to the panel controller: SPI device plus the three
/// sideband pins and a delay provider.
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// High while the controller is mid-refresh
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for resetting
    rst: RST,
    /// Delay provider, shared with the driver for sequencing waits
    pub(crate) delay: DELAY,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Create the interface; no hardware traffic happens until the driver
    /// runs its init sequence.
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
        }
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi.
    /// Used for setting one color for the whole frame.
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: u32) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        const CHUNK_SIZE: usize = 64;
        let buffer = [val; CHUNK_SIZE];

        let full_chunks = (repetitions as usize) / CHUNK_SIZE;
        let remainder = (repetitions as usize) % CHUNK_SIZE;

        for _ in 0..full_chunks {
            self.spi
                .write(&buffer)
                .map_err(|_| DisplayError::BusWriteError)?;
        }
        if remainder > 0 {
            self.spi
                .write(&buffer[0..remainder])
                .map_err(|_| DisplayError::BusWriteError)?;
        }

        Ok(())
    }

    /// Wait for the busy pin to go LOW.
    ///
    /// Polls with a short sleep rather than spinning, and gives up after
    /// [`BUSY_WAIT_TIMEOUT_MS`] so a wedged controller cannot hang the
    /// process; a refresh normally completes well inside the limit.
    pub(crate) fn wait_busy_low(&mut self) {
        let mut waited_ms = 0u32;

        while waited_ms < BUSY_WAIT_TIMEOUT_MS {
            match self.busy.is_high() {
                Ok(false) => return,
                Ok(true) => {
                    self.delay.delay_ms(BUSY_POLL_INTERVAL_MS);
                    waited_ms += BUSY_POLL_INTERVAL_MS;
                }
                Err(_) => {
                    log::error!("error reading BUSY pin state, assuming not busy to continue");
                    return;
                }
            }
        }

        log::error!(
            "timeout waiting for BUSY pin to go LOW after {} ms",
            BUSY_WAIT_TIMEOUT_MS
        );
    }

    /// Hardware reset via the RST pin
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(20);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(20);
        Ok(())
    }
}
