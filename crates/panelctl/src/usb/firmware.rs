//! Firmware upload
//!
//! The bootloader accepts the entire application image as one bulk write
//! to its OUT endpoint; its internal protocol handles the rest. No
//! chunking, no checksum, no acknowledgement readback — a transport
//! failure aborts the load with no partial-upload recovery.

use crate::usb::session::Session;
use crate::usb::transport::{FIRMWARE_TIMEOUT, UsbHandle};
use common::{Error, Result};
use protocol::TransferReport;
use std::time::Instant;
use tracing::info;

/// OUT endpoint the bootloader listens on.
pub const FIRMWARE_ENDPOINT: u8 = 0x01;

/// Upload `image` to a session resolved under the bootloader identity.
///
/// The session must already be open and configured; callers resolve it via
/// the bootloader identity before getting here. Returns the timed report
/// used for the throughput log line.
pub fn load<H: UsbHandle>(session: &mut Session<H>, image: &[u8]) -> Result<TransferReport> {
    let started = Instant::now();

    let written = session
        .handle_mut()
        .write_bulk(FIRMWARE_ENDPOINT, image, FIRMWARE_TIMEOUT)
        .map_err(|e| Error::FirmwareLoad(e.to_string()))?;

    let report = TransferReport::new(written, started.elapsed());
    info!(
        "loaded firmware of {:.1} KiB in {:.1} ms = {:.1} KiB/s",
        report.bytes_transferred as f64 / 1024.0,
        report.duration.as_secs_f64() * 1000.0,
        report.throughput_kib_s()
    );

    Ok(report)
}
