//! notifier-rainbow-core: report encoding, color cycle, and device discovery.
//!
//! This crate drives the Dream Cheeky webmail notifier, a USB HID device
//! with a tri-color LED, through a continuous hue rotation.

pub mod animation;
pub mod config;
pub mod cycle;
pub mod device;
pub mod error;
pub mod report;
pub mod transport;

/// Dream Cheeky USB Vendor ID.
pub const NOTIFIER_VID: u16 = 0x1D34;

/// Webmail notifier USB Product ID.
pub const NOTIFIER_PID: u16 = 0x0004;
