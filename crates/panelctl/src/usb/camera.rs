//! Camera subsystem control
//!
//! The camera-enable vendor request must be issued while no kernel driver
//! holds interface 0, but the device has to come back under its normal
//! driver afterwards so the rest of its functions keep working. The
//! sequence is: query driver state, detach if needed (verifying the detach
//! took), issue the request, reattach.
//!
//! Reattachment runs on every exit path, including a failed enable
//! request, via a scoped guard; an attach error is logged and swallowed
//! since the driver may never have been attached to begin with.

use crate::usb::session::Session;
use crate::usb::transport::UsbHandle;
use common::{Error, Result};
use protocol::CAMERA_ENABLE;
use tracing::{debug, info};

/// Interface the kernel driver holds while the camera runs normally.
pub const CAMERA_INTERFACE: u8 = 0;

/// Enable the camera subsystem on an operational-identity session.
pub fn enable<H: UsbHandle>(session: &mut Session<H>) -> Result<()> {
    let handle = session.handle_mut();

    if handle.kernel_driver_active(CAMERA_INTERFACE)? {
        info!("detaching kernel driver from interface {}", CAMERA_INTERFACE);
        handle.detach_kernel_driver(CAMERA_INTERFACE)?;
        if handle.kernel_driver_active(CAMERA_INTERFACE)? {
            return Err(Error::KernelDriverDetach {
                interface: CAMERA_INTERFACE,
            });
        }
        debug!("kernel driver detached");
    }

    let mut guard = ReattachGuard {
        handle,
        interface: CAMERA_INTERFACE,
    };
    guard.handle.write_control(&CAMERA_ENABLE, &[0x01])?;
    info!("camera subsystem enabled");
    Ok(())
}

/// Reattaches the kernel driver when dropped, on success and error paths
/// alike.
struct ReattachGuard<'a, H: UsbHandle> {
    handle: &'a mut H,
    interface: u8,
}

impl<H: UsbHandle> Drop for ReattachGuard<'_, H> {
    fn drop(&mut self) {
        if let Err(e) = self.handle.attach_kernel_driver(self.interface) {
            debug!(
                "could not reattach kernel driver to interface {} (may not have been detached): {}",
                self.interface, e
            );
        }
    }
}
