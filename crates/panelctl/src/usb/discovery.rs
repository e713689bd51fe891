//! Bounded discovery polling
//!
//! After a firmware load the bootloader device drops off the bus and the
//! application identity enumerates in its place. This poller is the only
//! mechanism reconciling the two personas into one logical session: it
//! re-resolves at a fixed interval until the target identity appears or
//! the wall-clock budget runs out.

use crate::usb::session::{self, Session};
use crate::usb::transport::UsbHost;
use common::{Error, Result};
use protocol::DeviceIdentity;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Fixed sleep between resolution attempts.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default wall-clock budget for a device to appear.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Poll for `identity` until it resolves or `timeout` elapses.
///
/// A device that is already present returns on the first attempt without
/// sleeping. The timeout is wall-clock based and not cancellable mid-wait.
pub fn wait_for<H: UsbHost>(
    host: &H,
    identity: DeviceIdentity,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Session<H::Handle>> {
    info!("waiting for device {}", identity);
    let started = Instant::now();

    loop {
        if let Some(session) = session::resolve(host, identity)? {
            return Ok(session);
        }

        if started.elapsed() > timeout {
            return Err(Error::DiscoveryTimeout {
                vendor_id: identity.vendor_id,
                product_id: identity.product_id,
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::mock::MockHost;
    use protocol::OPERATIONAL_IDENTITY;

    #[test]
    fn test_present_device_returns_without_sleeping() {
        let host = MockHost::new();
        host.device_present(OPERATIONAL_IDENTITY);

        let started = Instant::now();
        let session = wait_for(
            &host,
            OPERATIONAL_IDENTITY,
            Duration::from_secs(5),
            Duration::from_millis(100),
        )
        .unwrap();

        assert_eq!(session.identity(), OPERATIONAL_IDENTITY);
        assert_eq!(host.attempts(OPERATIONAL_IDENTITY), 1);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_absent_device_times_out_after_budget() {
        let host = MockHost::new();
        let timeout = Duration::from_millis(250);

        let started = Instant::now();
        let err = wait_for(
            &host,
            OPERATIONAL_IDENTITY,
            timeout,
            Duration::from_millis(50),
        )
        .unwrap_err();

        // Not less than the configured budget, and several attempts made.
        assert!(started.elapsed() >= timeout);
        assert!(host.attempts(OPERATIONAL_IDENTITY) > 1);
        assert!(matches!(
            err,
            Error::DiscoveryTimeout { timeout_ms: 250, .. }
        ));
    }

    #[test]
    fn test_device_appearing_mid_poll_resolves() {
        let host = MockHost::new();
        host.device_appears_after(OPERATIONAL_IDENTITY, 2);

        let session = wait_for(
            &host,
            OPERATIONAL_IDENTITY,
            Duration::from_secs(5),
            Duration::from_millis(10),
        )
        .unwrap();

        assert_eq!(session.identity(), OPERATIONAL_IDENTITY);
        assert_eq!(host.attempts(OPERATIONAL_IDENTITY), 3);
    }
}
