//! Error types for notifier-rainbow-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID subsystem or device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// No matching device during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// A device property (vendor or product id) could not be read.
    ///
    /// The hidapi backend always has both ids, so only backends with a
    /// fallible property store produce this.
    #[error("property unavailable: {property}")]
    PropertyUnavailable { property: &'static str },

    /// The device accepted fewer bytes than the report holds.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Value out of the accepted range.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
