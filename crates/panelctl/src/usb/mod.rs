//! USB session management and device operations
//!
//! The modules here own everything between the CLI and the bus: the
//! transport seam, session resolution across the device's two identities,
//! the firmware upload, discovery polling, and the LCD/camera operations.

pub mod camera;
pub mod discovery;
pub mod firmware;
pub mod lcd;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

use common::{Error, Result};
use protocol::DeviceIdentity;
use session::Session;
use std::time::Duration;
use tracing::debug;
use transport::UsbHost;

/// Resolve an operational session, flashing firmware first if the device
/// is still sitting in its bootloader.
///
/// If the operational identity is already on the bus the firmware step is
/// skipped entirely. Otherwise the bootloader is required, `firmware_image`
/// is uploaded, and discovery polling bridges the re-enumeration. With no
/// firmware image to offer, an absent operational device is simply not
/// found.
pub fn bring_up<H: UsbHost>(
    host: &H,
    bootloader: DeviceIdentity,
    operational: DeviceIdentity,
    firmware_image: Option<&[u8]>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Session<H::Handle>> {
    if let Some(running) = session::resolve(host, operational)? {
        debug!("device already running application firmware");
        return Ok(running);
    }

    let Some(image) = firmware_image else {
        return Err(Error::device_not_found(operational));
    };

    let mut boot = session::require(host, bootloader)?;
    firmware::load(&mut boot, image)?;

    // The bootloader handle points at a device object that is about to
    // fall off the bus; it cannot be reused for the application device.
    drop(boot);

    discovery::wait_for(host, operational, timeout, poll_interval)
}
