//! Clock face composition
//!
//! Builds the frame pushed to the panel each second: the current UTC time
//! over a fixed label, drawn with a 7x13 fixed-width font. Text is laid
//! out on a canvas transposed relative to the panel (wide side horizontal)
//! and rotated into the panel's native orientation afterwards, so this
//! whole module is a pure function of the timestamp.

use chrono::{DateTime, Utc};
use embedded_graphics::mono_font::ascii::FONT_7X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use crate::ssd1675::graphics::Frame;
use crate::ssd1675::{HEIGHT, WIDTH};

/// Left edge of both text lines on the working canvas
const TEXT_ORIGIN_X: i32 = 10;

/// Baseline of the time line on the working canvas
const TEXT_BASELINE_Y: i32 = 30;

/// Second line, drawn one font advance below the time
const LABEL: &str = "haxrob";

/// Render the clock face for `now` in panel orientation.
///
/// The returned frame always matches the panel bounds exactly and the same
/// timestamp always yields bit-identical output.
pub fn compose(now: DateTime<Utc>) -> Frame {
    render_canvas(now).rotated()
}

/// Draw both text lines on the transposed working canvas
fn render_canvas(now: DateTime<Utc>) -> Frame {
    let mut canvas = Frame::new(u32::from(HEIGHT), u32::from(WIDTH));

    let style = MonoTextStyle::new(&FONT_7X13, BinaryColor::On);
    let line_height = FONT_7X13.character_size.height as i32;

    let time_text = now.format("%H:%M:%S").to_string();
    let _ = Text::new(
        &time_text,
        Point::new(TEXT_ORIGIN_X, TEXT_BASELINE_Y),
        style,
    )
    .draw(&mut canvas);

    let _ = Text::new(
        LABEL,
        Point::new(TEXT_ORIGIN_X, TEXT_BASELINE_Y + line_height),
        style,
    )
    .draw(&mut canvas);

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ink(frame: &Frame) -> Vec<(u32, u32)> {
        let mut pixels = Vec::new();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.get(x, y) == BinaryColor::On {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 34, 56).unwrap()
    }

    #[test]
    fn composed_frame_matches_panel_bounds() {
        for timestamp in [
            noon(),
            Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2038, 6, 15, 0, 0, 0).unwrap(),
        ] {
            let frame = compose(timestamp);
            assert_eq!(frame.width(), u32::from(WIDTH));
            assert_eq!(frame.height(), u32::from(HEIGHT));
        }
    }

    #[test]
    fn same_timestamp_renders_identically() {
        assert_eq!(compose(noon()).buffer(), compose(noon()).buffer());
    }

    #[test]
    fn different_seconds_render_differently() {
        let next = noon() + chrono::Duration::seconds(1);
        assert_ne!(compose(noon()).buffer(), compose(next).buffer());
    }

    #[test]
    fn text_starts_at_the_fixed_origin() {
        let canvas = render_canvas(noon());
        let pixels = ink(&canvas);
        assert!(!pixels.is_empty());

        // nothing left of the origin column, first glyph cell inked
        assert!(pixels.iter().all(|&(x, _)| x >= 10));
        assert!(pixels.iter().any(|&(x, _)| x < 17));

        // "12:34:56" is eight 7 px advances wide, the label six
        assert!(pixels.iter().all(|&(x, _)| x < 10 + 8 * 7));

        // two separate text bands around baselines 30 and 43
        assert!(pixels.iter().all(|&(_, y)| (17..=46).contains(&y)));
        assert!(pixels.iter().any(|&(_, y)| y <= 30));
        assert!(pixels.iter().any(|&(_, y)| y >= 33));
    }

    #[test]
    fn rotation_carries_every_glyph_pixel() {
        let canvas = render_canvas(noon());
        let frame = compose(noon());
        let canvas_height = canvas.height();

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                assert_eq!(
                    frame.get(canvas_height - y - 1, x),
                    canvas.get(x, y),
                    "mismatch for canvas pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }
}
