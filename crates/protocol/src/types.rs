//! Shared protocol types
//!
//! The device shows up on the bus under two different vendor/product pairs
//! depending on which mode it is in: the vision-processor ROM bootloader
//! before any application firmware is running, and the application identity
//! once firmware has been uploaded. Both are the same physical unit; the
//! host reconciles them by re-discovering after a firmware load.

use std::fmt;
use std::time::Duration;

/// A vendor/product identifier pair as reported in the device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
}

impl DeviceIdentity {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// Identity of the ROM bootloader (no application firmware running).
pub const BOOTLOADER_IDENTITY: DeviceIdentity = DeviceIdentity::new(0x03e7, 0x2150);

/// Identity of the device once application firmware is up.
pub const OPERATIONAL_IDENTITY: DeviceIdentity = DeviceIdentity::new(0x2e09, 0x0030);

/// Operational identity of the "pro" hardware revision. Same protocol,
/// different product id; selectable through configuration.
pub const OPERATIONAL_IDENTITY_PRO: DeviceIdentity = DeviceIdentity::new(0x2e09, 0x0041);

/// LCD capability info decoded from the 8-byte control response.
///
/// Decoding is structural only: any 8 bytes decode into some `LcdInfo`.
/// Downstream image preparation additionally needs positive dimensions,
/// which [`LcdInfo::is_usable`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdInfo {
    pub width: i16,
    pub height: i16,
    pub orientation: i8,
    pub rotation: i8,
    pub brightness: i16,
}

impl LcdInfo {
    /// Whether the reported dimensions can size an image buffer.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for LcdInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width: {}, height: {}, orientation: {}, rotation: {}, brightness: {}",
            self.width, self.height, self.orientation, self.rotation, self.brightness
        )
    }
}

/// Outcome of a timed bulk upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReport {
    /// Bytes the transport accepted.
    pub bytes_transferred: usize,
    /// Wall-clock time around the transfer.
    pub duration: Duration,
}

impl TransferReport {
    pub fn new(bytes_transferred: usize, duration: Duration) -> Self {
        Self {
            bytes_transferred,
            duration,
        }
    }

    /// Throughput in KiB/s over the measured duration.
    pub fn throughput_kib_s(&self) -> f64 {
        (self.bytes_transferred as f64 / 1024.0) / self.duration.as_secs_f64()
    }
}
