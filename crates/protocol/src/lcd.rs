//! LCD wire formats
//!
//! Two fixed layouts: the 8-byte capability response to [`LCD_GET_INFO`],
//! and the bulk image packet pushed to the OUT endpoint. Field order and
//! widths are bit-exact contracts with the device firmware.
//!
//! # Image packet layout (little-endian)
//!
//! ```text
//! offset  0  width          i32
//! offset  4  height         i32
//! offset  8  format         u8, always 1 (RGBA8888)
//! offset  9  fmt_reserved   3 zero bytes
//! offset 12  reserved       8 zero bytes
//! offset 20  pixel data     width * height * 4 bytes
//! ```

use crate::error::{ProtocolError, Result};
use crate::types::LcdInfo;
use bytes::{BufMut, Bytes, BytesMut};

/// Length of the LCD capability response.
pub const LCD_INFO_LEN: usize = 8;

/// Image packet header length preceding pixel data.
pub const IMAGE_HEADER_LEN: usize = 20;

/// The one pixel format the device speaks: 4 bytes per pixel, RGBA order.
pub const PIXEL_FORMAT_RGBA8888: u8 = 1;

/// Bytes per pixel implied by [`PIXEL_FORMAT_RGBA8888`].
pub const BYTES_PER_PIXEL: usize = 4;

/// Decode the 8-byte LCD capability response.
///
/// Total over all 8-byte inputs: width/height/brightness are little-endian
/// byte pairs, orientation and rotation pass through as single bytes. A
/// shorter buffer is a protocol violation.
pub fn decode_lcd_info(data: &[u8]) -> Result<LcdInfo> {
    if data.len() < LCD_INFO_LEN {
        return Err(ProtocolError::ShortResponse {
            expected: LCD_INFO_LEN,
            actual: data.len(),
        });
    }

    Ok(LcdInfo {
        width: i16::from_le_bytes([data[0], data[1]]),
        height: i16::from_le_bytes([data[2], data[3]]),
        orientation: data[4] as i8,
        rotation: data[5] as i8,
        brightness: i16::from_le_bytes([data[6], data[7]]),
    })
}

/// Assemble a complete image packet: 20-byte header followed by the pixel
/// payload verbatim.
///
/// The caller guarantees `pixels.len() == width * height * 4`; no length
/// validation happens here, the device rejects mismatched payloads itself.
pub fn build_image_packet(width: i32, height: i32, pixels: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(IMAGE_HEADER_LEN + pixels.len());
    buf.put_i32_le(width);
    buf.put_i32_le(height);
    buf.put_u8(PIXEL_FORMAT_RGBA8888);
    buf.put_bytes(0, 3);
    buf.put_bytes(0, 8);
    buf.put_slice(pixels);
    buf.freeze()
}
