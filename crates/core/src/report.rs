//! Notifier report encoding.
//!
//! The webmail notifier takes 8-byte output reports with report ID 0:
//! - Enable: `1F 02 00 5F 00 00 1A 03` switches the LED output on.
//! - Color: three intensity bytes followed by the fixed `00 00 00 1A 05` trailer.
//!
//! The LEDs are not equally bright, so the default white point scales the
//! channels by 27/31/15 to get a roughly neutral white at full intensity.

use crate::cycle::Rgb;

/// Length of every notifier report (excluding the report ID).
pub const REPORT_LEN: usize = 8;

/// Report ID used for all notifier reports.
pub const REPORT_ID: u8 = 0x00;

/// Report that turns the LED output on.
pub const ENABLE_REPORT: [u8; REPORT_LEN] = [0x1F, 0x02, 0x00, 0x5F, 0x00, 0x00, 0x1A, 0x03];

/// Constant tail of every color report.
pub const COLOR_TRAILER: [u8; 5] = [0x00, 0x00, 0x00, 0x1A, 0x05];

/// Per-channel scaling applied before rounding to device intensity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitePoint {
    /// Scale red/green/blue by 27/31/15 (close to neutral white).
    #[default]
    Normalized,
    /// Scale every channel by 31 (brighter, tinted white).
    FullBrightness,
}

impl WhitePoint {
    /// Scale factors for (red, green, blue).
    pub fn scales(&self) -> (f64, f64, f64) {
        match self {
            Self::Normalized => (27.0, 31.0, 15.0),
            Self::FullBrightness => (31.0, 31.0, 31.0),
        }
    }
}

/// Round half away from zero: 2.5 → 3, -2.5 → -3.
pub fn round_half_away(x: f64) -> i64 {
    if x >= 0.0 {
        (x + 0.5).floor() as i64
    } else {
        (x - 0.5).ceil() as i64
    }
}

fn scale_channel(value: f64, scale: f64) -> u8 {
    // Keep out-of-range input from wrapping the byte.
    round_half_away(value.clamp(0.0, 1.0) * scale) as u8
}

/// Encode a color into a notifier color report.
pub fn encode_color(color: Rgb, white_point: WhitePoint) -> [u8; REPORT_LEN] {
    let (rs, gs, bs) = white_point.scales();
    let mut report = [0u8; REPORT_LEN];
    report[0] = scale_channel(color.r, rs);
    report[1] = scale_channel(color.g, gs);
    report[2] = scale_channel(color.b, bs);
    report[3..].copy_from_slice(&COLOR_TRAILER);
    report
}
