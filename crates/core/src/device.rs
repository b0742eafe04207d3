//! Device model: discovery, filtering, and LED enable.

use crate::error::{Error, Result};
use crate::report::{REPORT_ID, REPORT_LEN};
use crate::transport::{send_enable, HidTransport};
use crate::{NOTIFIER_PID, NOTIFIER_VID};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Integer properties the locator reads from each device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProperty {
    VendorId,
    ProductId,
}

impl DeviceProperty {
    /// Property name as used in log output and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VendorId => "vendor_id",
            Self::ProductId => "product_id",
        }
    }
}

/// Whether a vendor/product pair identifies the webmail notifier.
pub fn is_notifier(vid: u16, pid: u16) -> bool {
    vid == NOTIFIER_VID && pid == NOTIFIER_PID
}

/// Host HID subsystem as seen by the locator.
pub trait HidBus {
    /// An enumerated, not yet opened device.
    type Candidate;
    /// An opened device.
    type Device: HidTransport;

    /// List every HID device currently visible to the host.
    fn enumerate(&self) -> Result<Vec<Self::Candidate>>;

    /// Read an integer property of a candidate.
    ///
    /// Backends that always know the ids (hidapi reports them with every
    /// device) never fail here.
    fn read_property(&self, candidate: &Self::Candidate, property: DeviceProperty) -> Result<u16>;

    /// Platform path of a candidate, for display.
    fn path(&self, candidate: &Self::Candidate) -> String;

    /// Serial number, when the device reports one.
    fn serial(&self, _candidate: &Self::Candidate) -> Option<String> {
        None
    }

    /// Open a candidate for writing.
    fn open(&self, candidate: &Self::Candidate) -> Result<Self::Device>;
}

/// Information about a discovered notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub serial: Option<String>,
}

/// A matching device that has not been opened.
#[derive(Debug, Clone)]
pub struct Discovered<C> {
    pub candidate: C,
    pub info: DeviceInfo,
}

/// An opened notifier that has been sent the enable report.
pub struct Notifier<D> {
    pub info: DeviceInfo,
    pub transport: D,
}

/// Find every connected notifier without touching it.
///
/// Enumeration and property failures are logged and treated as "no match".
pub fn find_notifiers<B: HidBus>(bus: &B) -> Vec<Discovered<B::Candidate>> {
    debug!("Starting HID device enumeration");
    let candidates = match bus.enumerate() {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, "HID enumeration failed");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for candidate in candidates {
        let path = bus.path(&candidate);
        let ids = bus
            .read_property(&candidate, DeviceProperty::VendorId)
            .and_then(|vid| {
                bus.read_property(&candidate, DeviceProperty::ProductId)
                    .map(|pid| (vid, pid))
            });
        let (vid, pid) = match ids {
            Ok(ids) => ids,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping device with unreadable ids");
                continue;
            }
        };

        if !is_notifier(vid, pid) {
            debug!(
                vid = format_args!("0x{:04X}", vid),
                pid = format_args!("0x{:04X}", pid),
                path = %path,
                "Skipping device"
            );
            continue;
        }

        info!(
            vid = format_args!("0x{:04X}", vid),
            pid = format_args!("0x{:04X}", pid),
            path = %path,
            "Found webmail notifier"
        );
        let serial = bus.serial(&candidate);
        found.push(Discovered {
            candidate,
            info: DeviceInfo {
                vid,
                pid,
                path,
                serial,
            },
        });
    }

    debug!(count = found.len(), "Device enumeration complete");
    found
}

/// Open every connected notifier and switch its LED output on.
///
/// Devices that fail to open are skipped. A failed enable report is
/// logged and the device is still returned.
pub fn locate_notifiers<B: HidBus>(bus: &B) -> Vec<Notifier<B::Device>> {
    let mut notifiers = Vec::new();
    for Discovered { candidate, info } in find_notifiers(bus) {
        let transport = match bus.open(&candidate) {
            Ok(transport) => transport,
            Err(e) => {
                warn!(path = %info.path, error = %e, "Failed to open notifier");
                continue;
            }
        };

        match send_enable(&transport) {
            Ok(()) => debug!(path = %info.path, "LED output enabled"),
            Err(e) => warn!(path = %info.path, error = %e, "Enable report failed"),
        }
        notifiers.push(Notifier { info, transport });
    }

    if notifiers.is_empty() {
        info!("No webmail notifier found");
    }
    notifiers
}

/// [`HidBus`] backed by `hidapi`.
pub struct HidapiBus {
    api: hidapi::HidApi,
}

impl HidapiBus {
    /// Initialise the HID subsystem.
    pub fn new() -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Hid(e.to_string()))?;
        Ok(Self { api })
    }
}

impl HidBus for HidapiBus {
    type Candidate = hidapi::DeviceInfo;
    type Device = HidapiNotifier;

    fn enumerate(&self) -> Result<Vec<hidapi::DeviceInfo>> {
        let devices: Vec<_> = self.api.device_list().cloned().collect();
        if devices.is_empty() {
            return Err(Error::DeviceNotFound("no HID devices visible".into()));
        }
        Ok(devices)
    }

    fn read_property(&self, info: &hidapi::DeviceInfo, property: DeviceProperty) -> Result<u16> {
        Ok(match property {
            DeviceProperty::VendorId => info.vendor_id(),
            DeviceProperty::ProductId => info.product_id(),
        })
    }

    fn path(&self, info: &hidapi::DeviceInfo) -> String {
        info.path().to_string_lossy().into_owned()
    }

    fn serial(&self, info: &hidapi::DeviceInfo) -> Option<String> {
        info.serial_number().map(|s| s.to_string())
    }

    fn open(&self, info: &hidapi::DeviceInfo) -> Result<HidapiNotifier> {
        let device = info
            .open_device(&self.api)
            .map_err(|e| Error::Hid(format!("open {}: {e}", info.path().to_string_lossy())))?;
        Ok(HidapiNotifier { device })
    }
}

/// An open notifier on the `hidapi` backend. Closed on drop.
pub struct HidapiNotifier {
    device: hidapi::HidDevice,
}

impl HidTransport for HidapiNotifier {
    fn send_report(&self, report: &[u8; REPORT_LEN]) -> Result<usize> {
        let written = self
            .device
            .write(&frame_report(report))
            .map_err(|e| Error::Hid(format!("write: {e}")))?;
        Ok(payload_written(written))
    }
}

/// Prefix a report with its report ID, as hidapi expects.
fn frame_report(report: &[u8; REPORT_LEN]) -> [u8; REPORT_LEN + 1] {
    let mut buf = [0u8; REPORT_LEN + 1];
    buf[0] = REPORT_ID;
    buf[1..].copy_from_slice(report);
    buf
}

/// Payload bytes covered by a hidapi write count.
///
/// The count includes the report ID byte; some backends report the full
/// output report length instead.
fn payload_written(written: usize) -> usize {
    written.saturating_sub(1).min(REPORT_LEN)
}

/// A scripted HID bus for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::transport::mock::MockTransport;

    /// One device on the mock bus.
    #[derive(Clone)]
    pub struct MockDevice {
        pub vid: Option<u16>,
        pub pid: Option<u16>,
        pub path: String,
        pub open_fails: bool,
        pub transport: MockTransport,
    }

    impl MockDevice {
        pub fn new(vid: u16, pid: u16, path: &str) -> Self {
            Self {
                vid: Some(vid),
                pid: Some(pid),
                path: path.to_string(),
                open_fails: false,
                transport: MockTransport::new(),
            }
        }

        pub fn notifier(path: &str) -> Self {
            Self::new(NOTIFIER_VID, NOTIFIER_PID, path)
        }
    }

    /// Mock bus returning a fixed device list.
    #[derive(Default)]
    pub struct MockBus {
        pub devices: Vec<MockDevice>,
        pub enumerate_fails: bool,
    }

    impl MockBus {
        pub fn with_devices(devices: Vec<MockDevice>) -> Self {
            Self {
                devices,
                enumerate_fails: false,
            }
        }
    }

    impl HidBus for MockBus {
        type Candidate = MockDevice;
        type Device = MockTransport;

        fn enumerate(&self) -> Result<Vec<MockDevice>> {
            if self.enumerate_fails {
                return Err(Error::Hid("mock: no HID manager".into()));
            }
            Ok(self.devices.clone())
        }

        fn read_property(&self, device: &MockDevice, property: DeviceProperty) -> Result<u16> {
            let value = match property {
                DeviceProperty::VendorId => device.vid,
                DeviceProperty::ProductId => device.pid,
            };
            value.ok_or(Error::PropertyUnavailable {
                property: property.name(),
            })
        }

        fn path(&self, device: &MockDevice) -> String {
            device.path.clone()
        }

        fn open(&self, device: &MockDevice) -> Result<MockTransport> {
            if device.open_fails {
                return Err(Error::Hid(format!("mock: cannot open {}", device.path)));
            }
            Ok(device.transport.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockBus, MockDevice};
    use super::*;
    use crate::report::ENABLE_REPORT;

    #[test]
    fn notifier_ids_match() {
        assert!(is_notifier(0x1D34, 0x0004));
    }

    #[test]
    fn partial_id_matches_rejected() {
        assert!(!is_notifier(0x1D34, 0x0005));
        assert!(!is_notifier(0x1D35, 0x0004));
        assert!(!is_notifier(0x0004, 0x1D34));
        assert!(!is_notifier(0x046D, 0xC08D));
    }

    #[test]
    fn find_filters_by_ids() {
        let bus = MockBus::with_devices(vec![
            MockDevice::new(0x046D, 0xC08D, "mouse"),
            MockDevice::notifier("notifier"),
            MockDevice::new(NOTIFIER_VID, 0x0008, "wrong-product"),
            MockDevice::new(0x1234, NOTIFIER_PID, "wrong-vendor"),
        ]);
        let found = find_notifiers(&bus);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].info.path, "notifier");
        assert_eq!(found[0].info.vid, NOTIFIER_VID);
        assert_eq!(found[0].info.pid, NOTIFIER_PID);
    }

    #[test]
    fn find_does_not_write() {
        let device = MockDevice::notifier("notifier");
        let transport = device.transport.clone();
        let bus = MockBus::with_devices(vec![device]);
        assert_eq!(find_notifiers(&bus).len(), 1);
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn unreadable_properties_are_skipped() {
        let mut no_vid = MockDevice::notifier("no-vid");
        no_vid.vid = None;
        let mut no_pid = MockDevice::notifier("no-pid");
        no_pid.pid = None;
        let bus = MockBus::with_devices(vec![no_vid, no_pid, MockDevice::notifier("ok")]);

        let found = find_notifiers(&bus);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].info.path, "ok");
    }

    #[test]
    fn enumeration_failure_yields_empty() {
        let bus = MockBus {
            devices: vec![MockDevice::notifier("notifier")],
            enumerate_fails: true,
        };
        assert!(find_notifiers(&bus).is_empty());
        assert!(locate_notifiers(&bus).is_empty());
    }

    #[test]
    fn empty_bus_yields_empty() {
        assert!(locate_notifiers(&MockBus::default()).is_empty());
    }

    #[test]
    fn locate_enables_every_match() {
        let first = MockDevice::notifier("first");
        let second = MockDevice::notifier("second");
        let other = MockDevice::new(0x046D, 0xC08B, "other");
        let (t1, t2, t3) = (
            first.transport.clone(),
            second.transport.clone(),
            other.transport.clone(),
        );
        let bus = MockBus::with_devices(vec![first, other, second]);

        let notifiers = locate_notifiers(&bus);
        assert_eq!(notifiers.len(), 2);
        assert_eq!(notifiers[0].info.path, "first");
        assert_eq!(notifiers[1].info.path, "second");
        assert_eq!(t1.sent(), vec![ENABLE_REPORT]);
        assert_eq!(t2.sent(), vec![ENABLE_REPORT]);
        assert!(t3.sent().is_empty());
    }

    #[test]
    fn locate_skips_devices_that_fail_to_open() {
        let mut broken = MockDevice::notifier("broken");
        broken.open_fails = true;
        let bus = MockBus::with_devices(vec![broken, MockDevice::notifier("ok")]);

        let notifiers = locate_notifiers(&bus);
        assert_eq!(notifiers.len(), 1);
        assert_eq!(notifiers[0].info.path, "ok");
    }

    #[test]
    fn locate_keeps_device_when_enable_fails() {
        let device = MockDevice::notifier("flaky");
        device.transport.set_failing(true);
        let bus = MockBus::with_devices(vec![device]);

        let notifiers = locate_notifiers(&bus);
        assert_eq!(notifiers.len(), 1);
        assert!(notifiers[0].transport.sent().is_empty());
    }

    #[test]
    fn frame_report_prefixes_report_id() {
        let framed = frame_report(&ENABLE_REPORT);
        assert_eq!(framed.len(), REPORT_LEN + 1);
        assert_eq!(framed[0], REPORT_ID);
        assert_eq!(&framed[1..], &ENABLE_REPORT);
    }

    #[test]
    fn payload_written_excludes_report_id() {
        assert_eq!(payload_written(9), 8);
        assert_eq!(payload_written(0), 0);
        assert_eq!(payload_written(1), 0);
        assert_eq!(payload_written(5), 4);
        assert_eq!(payload_written(65), 8);
    }

    #[test]
    fn device_info_serializes() {
        let info = DeviceInfo {
            vid: NOTIFIER_VID,
            pid: NOTIFIER_PID,
            path: "/dev/hidraw3".into(),
            serial: None,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"path\":\"/dev/hidraw3\""));
        assert!(json.contains("\"vid\":7476"));
    }
}
