//! Run-level error taxonomy
//!
//! Every operation against the device is attempted exactly once; each of
//! these errors aborts the run. The only non-fatal condition, a device not
//! being on the bus yet, is modeled as `Ok(None)` by the session layer and
//! only becomes [`Error::DeviceNotFound`] when a caller requires presence.

use protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No bus entry matched the requested vendor/product pair.
    #[error("device {vendor_id:04x}:{product_id:04x} not found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// The operational identity never appeared after a firmware load.
    #[error("device {vendor_id:04x}:{product_id:04x} did not appear within {timeout_ms} ms")]
    DiscoveryTimeout {
        vendor_id: u16,
        product_id: u16,
        timeout_ms: u64,
    },

    /// The bulk firmware write failed; there is no partial-upload recovery.
    #[error("firmware upload failed: {0}")]
    FirmwareLoad(String),

    /// The LCD capability response was malformed.
    #[error("LCD info response malformed: {0}")]
    LcdInfoDecode(#[from] ProtocolError),

    /// The bulk image write failed.
    #[error("LCD image transfer failed: {0}")]
    LcdTransfer(String),

    /// The kernel driver stayed attached after a detach request, so the
    /// camera control request cannot be issued safely.
    #[error("kernel driver still attached to interface {interface} after detach")]
    KernelDriverDetach { interface: u8 },

    /// Transport-level USB failure outside the specific cases above.
    #[error("USB error: {0}")]
    Usb(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn device_not_found(identity: protocol::DeviceIdentity) -> Self {
        Self::DeviceNotFound {
            vendor_id: identity.vendor_id,
            product_id: identity.product_id,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::OPERATIONAL_IDENTITY;

    #[test]
    fn test_not_found_display_names_identity() {
        let err = Error::device_not_found(OPERATIONAL_IDENTITY);
        let msg = format!("{}", err);
        assert!(msg.contains("2e09:0030"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_timeout_display_names_budget() {
        let err = Error::DiscoveryTimeout {
            vendor_id: 0x2e09,
            product_id: 0x0030,
            timeout_ms: 5000,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("5000 ms"));
    }

    #[test]
    fn test_decode_error_wraps_protocol_error() {
        let err: Error = ProtocolError::ShortResponse {
            expected: 8,
            actual: 2,
        }
        .into();
        assert!(matches!(err, Error::LcdInfoDecode(_)));
        assert!(format!("{}", err).contains("short control response"));
    }
}
