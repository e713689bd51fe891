//! USB transport seam
//!
//! The protocol layer consumes a narrow capability set: scan the bus for a
//! vendor/product pair, open the match, and issue blocking control/bulk
//! transfers plus kernel-driver toggles on the opened handle. The two
//! traits here are that seam; [`RusbHost`] is the production implementation
//! and the scenario tests script a mock against the same traits.

use common::{Error, Result};
use protocol::{ControlRequest, DeviceIdentity};
use rusb::{Context, UsbContext};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for control and image transfers.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the firmware bulk write; the whole image goes out in one
/// transfer, so this has to cover the slowest expected upload.
pub const FIRMWARE_TIMEOUT: Duration = Duration::from_secs(60);

/// Bus-level access: enumerate and open devices by identity.
pub trait UsbHost {
    type Handle: UsbHandle;

    /// Scan the bus for an exact vendor/product match and open the first
    /// hit. `Ok(None)` means no bus entry matched, the normal outcome
    /// while polling for a re-enumerating device.
    fn open_device(&self, identity: DeviceIdentity) -> Result<Option<Self::Handle>>;
}

/// Operations on one opened device.
pub trait UsbHandle {
    /// Issue a device-to-host control transfer described by `request`,
    /// filling `buf`. Returns the number of bytes the device answered.
    fn read_control(&mut self, request: &ControlRequest, buf: &mut [u8]) -> Result<usize>;

    /// Issue a host-to-device control transfer described by `request`
    /// carrying `data`.
    fn write_control(&mut self, request: &ControlRequest, data: &[u8]) -> Result<usize>;

    /// Blocking bulk write of `data` to an OUT endpoint.
    fn write_bulk(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<usize>;

    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool>;
    fn detach_kernel_driver(&mut self, interface: u8) -> Result<()>;
    fn attach_kernel_driver(&mut self, interface: u8) -> Result<()>;

    /// Bus number the device was found on, for log lines.
    fn bus_number(&self) -> u8;
    /// Device address on that bus.
    fn address(&self) -> u8;
}

/// Production transport backed by rusb.
pub struct RusbHost {
    context: Context,
}

impl RusbHost {
    pub fn new() -> Result<Self> {
        let context = Context::new().map_err(map_rusb_error)?;
        Ok(Self { context })
    }
}

impl UsbHost for RusbHost {
    type Handle = RusbDeviceHandle;

    fn open_device(&self, identity: DeviceIdentity) -> Result<Option<Self::Handle>> {
        let devices = self.context.devices().map_err(map_rusb_error)?;

        for device in devices.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(d) => d,
                Err(_) => continue,
            };

            if descriptor.vendor_id() != identity.vendor_id
                || descriptor.product_id() != identity.product_id
            {
                continue;
            }

            let handle = device.open().map_err(map_rusb_error)?;

            // The bootloader needs its configuration selected before it
            // accepts bulk writes. On the application device the kernel
            // driver has usually configured it already and the call can
            // fail with Busy, so treat failure as non-fatal.
            if let Err(e) = handle.set_active_configuration(1) {
                debug!("active configuration unchanged: {}", e);
            }

            return Ok(Some(RusbDeviceHandle {
                bus_number: device.bus_number(),
                address: device.address(),
                handle,
            }));
        }

        Ok(None)
    }
}

/// An opened rusb device with its bus location cached.
pub struct RusbDeviceHandle {
    bus_number: u8,
    address: u8,
    handle: rusb::DeviceHandle<Context>,
}

impl UsbHandle for RusbDeviceHandle {
    fn read_control(&mut self, request: &ControlRequest, buf: &mut [u8]) -> Result<usize> {
        debug!(
            "control in: request_type={:#04x}, request={:#04x}, value={:#06x}, index={:#06x}, length={}",
            request.request_type, request.request, request.value, request.index, request.length
        );

        self.handle
            .read_control(
                request.request_type,
                request.request,
                request.value,
                request.index,
                buf,
                DEFAULT_TIMEOUT,
            )
            .map_err(map_rusb_error)
    }

    fn write_control(&mut self, request: &ControlRequest, data: &[u8]) -> Result<usize> {
        debug!(
            "control out: request_type={:#04x}, request={:#04x}, value={:#06x}, index={:#06x}, data_len={}",
            request.request_type,
            request.request,
            request.value,
            request.index,
            data.len()
        );

        self.handle
            .write_control(
                request.request_type,
                request.request,
                request.value,
                request.index,
                data,
                DEFAULT_TIMEOUT,
            )
            .map_err(map_rusb_error)
    }

    fn write_bulk(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<usize> {
        debug!(
            "bulk out: endpoint={:#04x}, data_len={}, timeout={}ms",
            endpoint,
            data.len(),
            timeout.as_millis()
        );

        let written = self
            .handle
            .write_bulk(endpoint, data, timeout)
            .map_err(map_rusb_error)?;

        if written < data.len() {
            warn!("short bulk write: {} of {} bytes", written, data.len());
        }

        Ok(written)
    }

    fn kernel_driver_active(&mut self, interface: u8) -> Result<bool> {
        self.handle
            .kernel_driver_active(interface)
            .map_err(map_rusb_error)
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> Result<()> {
        self.handle
            .detach_kernel_driver(interface)
            .map_err(map_rusb_error)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<()> {
        self.handle
            .attach_kernel_driver(interface)
            .map_err(map_rusb_error)
    }

    fn bus_number(&self) -> u8 {
        self.bus_number
    }

    fn address(&self) -> u8 {
        self.address
    }
}

/// Map rusb::Error to the shared taxonomy.
pub fn map_rusb_error(err: rusb::Error) -> Error {
    Error::Usb(err.to_string())
}
