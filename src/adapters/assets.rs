//! The built-in clear-image PNG (spec §6): a 480×1920 fully-transparent
//! image embedded verbatim, byte-for-byte identical to the one the
//! reference driver carries, so any device that accepts one accepts
//! the other.

const HEADER: [u8; 112] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x01, 0xe0, 0x00, 0x00, 0x07, 0x80, 0x08, 0x06, 0x00, 0x00, 0x00, 0x16, 0xf0, 0x84,
    0xf5, 0x00, 0x00, 0x00, 0x01, 0x73, 0x52, 0x47, 0x42, 0x00, 0xae, 0xce, 0x1c, 0xe9, 0x00, 0x00,
    0x00, 0x04, 0x67, 0x41, 0x4d, 0x41, 0x00, 0x00, 0xb1, 0x8f, 0x0b, 0xfc, 0x61, 0x05, 0x00, 0x00,
    0x00, 0x09, 0x70, 0x48, 0x59, 0x73, 0x00, 0x00, 0x0e, 0xc3, 0x00, 0x00, 0x0e, 0xc3, 0x01, 0xc7,
    0x6f, 0xa8, 0x64, 0x00, 0x00, 0x0e, 0x0c, 0x49, 0x44, 0x41, 0x54, 0x78, 0x5e, 0xed, 0xc1, 0x01,
    0x0d, 0x00, 0x00, 0x00, 0xc2, 0xa0, 0xf7, 0x4f, 0x6d, 0x0f, 0x07, 0x14, 0x00, 0x00, 0x00, 0x00,
];

const TRAILER: [u8; 23] = [
    0x00, 0xf0, 0x66, 0x4a, 0xc8, 0x00, 0x01, 0x11, 0x9d, 0x82, 0x0a, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

const ZERO_RUN_LEN: usize = 3568;

/// Build the embedded clear-image PNG: signature, IHDR (480×1920 RGBA),
/// sRGB/gAMA/pHYs chunks, a single IDAT whose deflate payload is a
/// header, a run of zero bytes, and a trailer, then IEND. 3703 bytes
/// total.
pub fn clear_image_png() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER.len() + ZERO_RUN_LEN + TRAILER.len());
    bytes.extend_from_slice(&HEADER);
    bytes.extend(std::iter::repeat(0u8).take(ZERO_RUN_LEN));
    bytes.extend_from_slice(&TRAILER);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_image_is_3703_bytes_with_png_signature_and_iend() {
        let png = clear_image_png();
        assert_eq!(png.len(), 3703);
        assert_eq!(&png[0..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(&png[png.len() - 4..], &[0x49, 0x45, 0x4e, 0x44]);
    }
}
