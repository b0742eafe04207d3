//! HID transport abstraction for notifier communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::cycle::Rgb;
use crate::error::{Error, Result};
use crate::report::{encode_color, WhitePoint, ENABLE_REPORT, REPORT_LEN};
use tracing::trace;

/// Abstraction over a write-only HID output channel.
///
/// Implementations send one 8-byte notifier report with report ID 0.
pub trait HidTransport: Send {
    /// Write a report and return the number of payload bytes accepted.
    fn send_report(&self, report: &[u8; REPORT_LEN]) -> Result<usize>;
}

impl<T: HidTransport + ?Sized> HidTransport for Box<T> {
    fn send_report(&self, report: &[u8; REPORT_LEN]) -> Result<usize> {
        (**self).send_report(report)
    }
}

fn send_checked(transport: &dyn HidTransport, report: &[u8; REPORT_LEN]) -> Result<()> {
    trace!(report_hex = format_args!("{:02X?}", report), "notifier TX");
    let written = transport.send_report(report)?;
    if written < REPORT_LEN {
        return Err(Error::ShortWrite {
            written,
            expected: REPORT_LEN,
        });
    }
    Ok(())
}

/// Send the report that switches the LED output on.
pub fn send_enable(transport: &dyn HidTransport) -> Result<()> {
    send_checked(transport, &ENABLE_REPORT)
}

/// Encode and send a color.
pub fn send_color(
    transport: &dyn HidTransport,
    color: Rgb,
    white_point: WhitePoint,
) -> Result<()> {
    send_checked(transport, &encode_color(color, white_point))
}
