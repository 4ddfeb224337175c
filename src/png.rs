//! PNG fallback-marker scan
//!
//! Image resources that had no asset at the requested scale are emitted by
//! the pack builder as the lower-scale image tagged with an empty `csCl`
//! chunk. Detecting that chunk lets callers know the image must be rescaled.
//! Only chunk headers are read; no pixel data is decoded.

use crate::cursor::ByteCursor;

/// 8-byte PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Custom chunk type marking a scale fallback
pub const FALLBACK_CHUNK_TYPE: [u8; 4] = *b"csCl";

/// Image data chunk type; markers must precede it
pub const IMAGE_DATA_CHUNK_TYPE: [u8; 4] = *b"IDAT";

/// Length, type and CRC fields around every chunk payload
const CHUNK_METADATA_SIZE: usize = 12;

/// True if `data` is a PNG carrying a zero-length fallback marker chunk
/// before its first image data chunk
///
/// Anything that is not a PNG, or whose chunk stream is truncated before a
/// marker is seen, reports `false`.
pub fn png_contains_fallback_marker(data: &[u8]) -> bool {
    let mut cursor = ByteCursor::new(data);
    if cursor.take(PNG_SIGNATURE.len()) != Some(&PNG_SIGNATURE[..]) {
        return false;
    }

    while cursor.remaining() >= CHUNK_METADATA_SIZE {
        let Some(length) = cursor.u32_be() else {
            break;
        };
        let Some(chunk_type) = cursor.array::<4>() else {
            break;
        };
        // Payload plus the 4-byte CRC must still be present
        let Some(to_next) = (length as usize).checked_add(4) else {
            break;
        };
        if cursor.remaining() < to_next {
            break;
        }

        if length == 0 && chunk_type == FALLBACK_CHUNK_TYPE {
            return true;
        }
        if chunk_type == IMAGE_DATA_CHUNK_TYPE {
            break;
        }
        if cursor.skip(to_next).is_none() {
            break;
        }
    }
    false
}
