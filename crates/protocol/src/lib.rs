//! Wire formats for the panel device
//!
//! This crate defines the binary protocol spoken over USB to the display/
//! camera peripheral: the two device identities it enumerates under, the
//! closed table of vendor control requests, the 8-byte LCD capability
//! response, and the bulk image packet format. Everything here is pure
//! byte-level encode/decode with no USB dependency, so it can be tested
//! without hardware.

pub mod error;
pub mod lcd;
pub mod requests;
pub mod types;

pub use error::{ProtocolError, Result};
pub use lcd::{
    BYTES_PER_PIXEL, IMAGE_HEADER_LEN, LCD_INFO_LEN, PIXEL_FORMAT_RGBA8888, build_image_packet,
    decode_lcd_info,
};
pub use requests::{CAMERA_ENABLE, ControlRequest, LCD_GET_INFO};
pub use types::{
    BOOTLOADER_IDENTITY, DeviceIdentity, LcdInfo, OPERATIONAL_IDENTITY, OPERATIONAL_IDENTITY_PRO,
    TransferReport,
};
