//! SSD1675 ePaper Display Driver
//!
//! Drives the [Waveshare 2.13" V2 HAT](https://www.waveshare.com/wiki/2.13inch_e-Paper_HAT)
//! over SPI from a Raspberry Pi class host.
//!
//! This driver is loosely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for my needs.
//!
//! ### Usage
//! The driver does not hide that you're working with one buffer for black/white. To
//! display something you:
//!
//! 1. first create a [`graphics::Frame`] and draw things onto it, preferably
//!    with [`embedded_graphics`](https://github.com/embedded-graphics/embedded-graphics).
//! 1. then hand the frame to [`driver::Epd2in13::draw_partial`], which uploads it
//!    and refreshes the panel in the configured update mode.

pub mod driver;
pub mod graphics;
pub mod interface;
pub mod pins;

mod cmd;
mod flag;

/// Display width, pixels horizontally (panel-native orientation)
pub const WIDTH: u16 = 122;

/// Display height, pixels vertically (panel-native orientation)
pub const HEIGHT: u16 = 250;
