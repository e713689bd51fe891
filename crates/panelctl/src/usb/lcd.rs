//! LCD operations
//!
//! Two operations on an operational-identity session, neither of which
//! claims an interface: the capability query over a vendor control
//! transfer, and the image push over the same bulk endpoint the bootloader
//! uses for firmware (the payload format is distinguished purely by which
//! mode the device is in).

use crate::usb::session::Session;
use crate::usb::transport::{DEFAULT_TIMEOUT, UsbHandle};
use common::{Error, Result};
use protocol::{LCD_GET_INFO, LCD_INFO_LEN, LcdInfo, build_image_packet};
use tracing::{debug, info};

/// OUT endpoint for image packets.
pub const IMAGE_ENDPOINT: u8 = 0x01;

/// Query the LCD capability block and decode it.
///
/// A response shorter than the 8 bytes the request promises is a protocol
/// violation surfaced as [`Error::LcdInfoDecode`].
pub fn get_info<H: UsbHandle>(session: &mut Session<H>) -> Result<LcdInfo> {
    let mut buf = [0u8; LCD_INFO_LEN];
    let answered = session.handle_mut().read_control(&LCD_GET_INFO, &mut buf)?;

    let info = protocol::decode_lcd_info(&buf[..answered])?;
    info!("LCD info: {}", info);
    Ok(info)
}

/// Push a frame of raw pixels to the panel.
///
/// `pixels` must already be resized to the reported dimensions and
/// converted to 4-byte RGBA; no length validation happens before
/// transmission.
pub fn push_image<H: UsbHandle>(
    session: &mut Session<H>,
    width: i32,
    height: i32,
    pixels: &[u8],
) -> Result<()> {
    let packet = build_image_packet(width, height, pixels);

    session
        .handle_mut()
        .write_bulk(IMAGE_ENDPOINT, &packet, DEFAULT_TIMEOUT)
        .map_err(|e| Error::LcdTransfer(e.to_string()))?;

    debug!("pushed {}x{} frame, {} bytes", width, height, packet.len());
    Ok(())
}
