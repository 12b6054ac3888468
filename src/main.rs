//! E-ink clock for the Waveshare 2.13" V2 HAT on a Raspberry Pi.
//!
//! Brings the panel up in partial-refresh mode, then redraws the current
//! UTC time once a second until interrupted. A failed refresh is logged
//! and retried implicitly on the next tick; only failing to bring the
//! hardware up at all is fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use log::LevelFilter;

mod clockface;
mod ssd1675;

use crate::ssd1675::driver::{Epd2in13, Panel, UpdateMode};
use crate::ssd1675::pins::{Pins, GPIO_CHIP, SPI_DEVICE};

const REFRESH_PERIOD: Duration = Duration::from_secs(1);
const SPI_SPEED_HZ: u32 = 4_000_000;
const GPIO_CONSUMER: &str = "epaper-clock";

fn main() -> Result<()> {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing interrupt handler")?;
    }

    let mut epd = open_panel().context("failed to bring up the e-paper panel")?;
    log::info!(
        "panel ready ({}x{} px), updating display every second, press Ctrl+C to stop",
        ssd1675::WIDTH,
        ssd1675::HEIGHT
    );

    run(&mut epd, &running);

    log::info!("interrupt received, shutting down");
    if let Err(e) = epd.sleep() {
        log::error!("failed to power down panel: {:?}", e);
    }
    Ok(())
}

/// Acquire the SPI bus and GPIO lines and initialize the panel in
/// partial-refresh mode. Every failure here is fatal to the caller.
fn open_panel() -> Result<Epd2in13<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>> {
    let mut spi = SpidevDevice::open(SPI_DEVICE)
        .map_err(|e| anyhow!("opening {}: {:?}", SPI_DEVICE, e))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.0
        .configure(&options)
        .with_context(|| format!("configuring {}", SPI_DEVICE))?;

    let mut chip =
        Chip::new(GPIO_CHIP).with_context(|| format!("opening {}", GPIO_CHIP))?;
    let busy = input_pin(&mut chip, Pins::BUSY)?;
    let dc = output_pin(&mut chip, Pins::DC)?;
    let rst = output_pin(&mut chip, Pins::RST)?;

    let mut epd = Epd2in13::new(spi, busy, dc, rst, Delay {})
        .map_err(|e| anyhow!("panel init failed: {:?}", e))?;

    // start from a known-white panel before switching waveforms
    epd.clear()
        .map_err(|e| anyhow!("initial clear failed: {:?}", e))?;
    epd.set_update_mode(UpdateMode::Partial)
        .map_err(|e| anyhow!("selecting partial refresh failed: {:?}", e))?;

    Ok(epd)
}

fn input_pin(chip: &mut Chip, offset: u32) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .and_then(|line| line.request(LineRequestFlags::INPUT, 0, GPIO_CONSUMER))
        .with_context(|| format!("requesting input line {}", offset))?;
    CdevPin::new(handle).with_context(|| format!("wrapping input line {}", offset))
}

fn output_pin(chip: &mut Chip, offset: u32) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .and_then(|line| line.request(LineRequestFlags::OUTPUT, 0, GPIO_CONSUMER))
        .with_context(|| format!("requesting output line {}", offset))?;
    CdevPin::new(handle).with_context(|| format!("wrapping output line {}", offset))
}

/// Draw once immediately, then once per tick until `running` is cleared.
///
/// Ticks are paced from absolute deadlines so the time spent composing
/// and pushing a frame does not stretch the period.
fn run<P: Panel>(panel: &mut P, running: &AtomicBool) {
    refresh(panel);

    let mut next_tick = Instant::now() + REFRESH_PERIOD;
    while running.load(Ordering::SeqCst) {
        thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        next_tick += REFRESH_PERIOD;
        refresh(panel);
    }
}

/// One tick: compose the clock face for the current time and push it.
/// A failed push is logged and left for the next tick to retry.
fn refresh<P: Panel>(panel: &mut P) {
    let frame = clockface::compose(Utc::now());
    if let Err(e) = panel.draw_partial(&frame) {
        log::error!("error updating display: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1675::driver::DisplayError;
    use crate::ssd1675::graphics::Frame;

    struct FlakyPanel {
        draws: usize,
        fail_on: Option<usize>,
    }

    impl Panel for FlakyPanel {
        fn draw_partial(&mut self, frame: &Frame) -> Result<(), DisplayError> {
            assert_eq!(frame.width(), u32::from(ssd1675::WIDTH));
            assert_eq!(frame.height(), u32::from(ssd1675::HEIGHT));
            self.draws += 1;
            if self.fail_on == Some(self.draws) {
                return Err(DisplayError::BusWriteError);
            }
            Ok(())
        }
    }

    #[test]
    fn refresh_survives_a_failed_draw() {
        let mut panel = FlakyPanel {
            draws: 0,
            fail_on: Some(1),
        };
        refresh(&mut panel);
        refresh(&mut panel);
        assert_eq!(panel.draws, 2);
    }

    #[test]
    fn run_draws_once_before_checking_for_shutdown() {
        let mut panel = FlakyPanel {
            draws: 0,
            fail_on: None,
        };
        let running = AtomicBool::new(false);
        run(&mut panel, &running);
        assert_eq!(panel.draws, 1);
    }
}
