//! Device session resolution
//!
//! A [`Session`] is the single opened device for one logical run, tagged
//! with the identity it was resolved under. The bootloader and operational
//! personas are different USB device objects even though they are the same
//! physical unit, so a bootloader session is dropped before the
//! operational one is resolved; no global "current device" exists.

use crate::usb::transport::{UsbHandle, UsbHost};
use common::{Error, Result};
use protocol::DeviceIdentity;
use tracing::{debug, info};

/// One opened device, owned exclusively for the duration of a run.
#[derive(Debug)]
pub struct Session<H: UsbHandle> {
    handle: H,
    identity: DeviceIdentity,
}

impl<H: UsbHandle> Session<H> {
    /// The identity this session was resolved under.
    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

/// Scan the bus for `identity` and open the first match.
///
/// `Ok(None)` is the normal not-present outcome used by the discovery
/// poller; transport failures propagate. Multiple matching devices are not
/// disambiguated: first match wins.
pub fn resolve<H: UsbHost>(host: &H, identity: DeviceIdentity) -> Result<Option<Session<H::Handle>>> {
    match host.open_device(identity)? {
        Some(handle) => {
            info!(
                "found device {} at bus {} address {}",
                identity,
                handle.bus_number(),
                handle.address()
            );
            Ok(Some(Session { handle, identity }))
        }
        None => {
            debug!("device {} not on the bus", identity);
            Ok(None)
        }
    }
}

/// Like [`resolve`], but absence is an error.
pub fn require<H: UsbHost>(host: &H, identity: DeviceIdentity) -> Result<Session<H::Handle>> {
    resolve(host, identity)?.ok_or_else(|| Error::device_not_found(identity))
}
