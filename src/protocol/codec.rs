//! Packet framing and DES-CBC obfuscation.
//!
//! Pure functions, no I/O: build a 500-byte plaintext header, encrypt it
//! into a 512-byte envelope with magic/trailer bytes. Mirrors the
//! `gs_usb` protocol modules in spirit (constants + a small pure codec
//! layer feeding the transport) even though the wire format here is
//! unrelated to CAN framing.

use chrono::Local;
use cipher::block_padding::NoPadding;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::constants::{DES_KEY, ENVELOPE_LEN, MAGIC, PLAINTEXT_LEN, TRAILER};
use super::opcode::Opcode;

type DesCbcEnc = cbc::Encryptor<des::Des>;
type DesCbcDec = cbc::Decryptor<des::Des>;

/// The fixed 500-byte plaintext command header, zero-initialised apart
/// from the opcode, magic, timestamp and any opcode-specific arguments
/// the command layer writes into bytes 8 onward.
#[derive(Clone)]
pub struct PlaintextPacket {
    bytes: [u8; PLAINTEXT_LEN],
}

impl PlaintextPacket {
    /// Allocate a zeroed header for `opcode`, stamped with the magic
    /// bytes and the current local-midnight-relative timestamp.
    pub fn new(opcode: Opcode) -> Self {
        let mut bytes = [0u8; PLAINTEXT_LEN];
        bytes[0] = opcode.as_u8();
        bytes[2] = MAGIC[0];
        bytes[3] = MAGIC[1];
        bytes[4..8].copy_from_slice(&millis_since_local_midnight().to_le_bytes());
        Self { bytes }
    }

    /// Same as [`PlaintextPacket::new`] but with an explicit timestamp,
    /// for deterministic tests.
    pub fn with_timestamp(opcode: Opcode, timestamp_millis: u32) -> Self {
        let mut bytes = [0u8; PLAINTEXT_LEN];
        bytes[0] = opcode.as_u8();
        bytes[2] = MAGIC[0];
        bytes[3] = MAGIC[1];
        bytes[4..8].copy_from_slice(&timestamp_millis.to_le_bytes());
        Self { bytes }
    }

    pub fn set_u8(&mut self, offset: usize, value: u8) {
        self.bytes[offset] = value;
    }

    pub fn set_bytes(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Write a big-endian u32 at `offset` — used by every opcode that
    /// declares a payload/path length. The protocol is little-endian for
    /// the timestamp and reply counters but big-endian here; this
    /// asymmetry is intentional (see spec §4.3) and must be reproduced.
    pub fn set_be_u32(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    pub fn as_bytes(&self) -> &[u8; PLAINTEXT_LEN] {
        &self.bytes
    }
}

/// Milliseconds elapsed since local midnight today, truncated to `u32`.
/// The device is expected to tolerate imprecision or disregard this
/// value entirely; only millisecond precision is promised.
fn millis_since_local_midnight() -> u32 {
    let now = Local::now();
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_local_timezone(Local)
        .single()
        .unwrap_or(now);
    let elapsed_ms = now.signed_duration_since(midnight).num_milliseconds().max(0);
    elapsed_ms as u32
}

/// Encrypt a plaintext header into a 512-byte envelope: DES-CBC with the
/// fixed key/IV, ciphertext at offset 0, zero padding, then the trailer.
pub fn encrypt(plaintext: &PlaintextPacket) -> [u8; ENVELOPE_LEN] {
    let padded_len = PLAINTEXT_LEN.div_ceil(8) * 8;
    let mut buf = vec![0u8; padded_len];
    buf[..PLAINTEXT_LEN].copy_from_slice(plaintext.as_bytes());

    let ciphertext = DesCbcEnc::new(DES_KEY.into(), DES_KEY.into())
        .encrypt_padded_mut::<NoPadding>(&mut buf, PLAINTEXT_LEN.next_multiple_of(8))
        .expect("plaintext length is already block-aligned");

    let mut envelope = [0u8; ENVELOPE_LEN];
    envelope[..ciphertext.len()].copy_from_slice(ciphertext);
    envelope[ENVELOPE_LEN - 2] = TRAILER[0];
    envelope[ENVELOPE_LEN - 1] = TRAILER[1];
    envelope
}

/// Decrypt the ciphertext portion of an envelope back to its padded
/// plaintext. Used only by tests — production code never needs to
/// decrypt, since the device is the only reader of encrypted envelopes.
#[cfg(test)]
pub fn decrypt(envelope: &[u8; ENVELOPE_LEN]) -> Vec<u8> {
    let padded_len = PLAINTEXT_LEN.next_multiple_of(8);
    let mut buf = envelope[..padded_len].to_vec();
    let plaintext = DesCbcDec::new(DES_KEY.into(), DES_KEY.into())
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .expect("envelope ciphertext is block-aligned");
    plaintext.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_exactly_512_bytes_with_trailer() {
        let header = PlaintextPacket::with_timestamp(Opcode::Brightness, 0x0102_0304);
        let envelope = encrypt(&header);
        assert_eq!(envelope.len(), ENVELOPE_LEN);
        assert_eq!(&envelope[510..512], &TRAILER);
    }

    #[test]
    fn envelope_round_trips_through_des_cbc() {
        let mut header = PlaintextPacket::with_timestamp(Opcode::Brightness, 0x0102_0304);
        header.set_u8(8, 80);
        let envelope = encrypt(&header);
        let recovered = decrypt(&envelope);
        assert_eq!(&recovered[..PLAINTEXT_LEN], header.as_bytes().as_slice());
        assert_eq!(&recovered[PLAINTEXT_LEN..], &[0u8; 4]);
    }

    #[test]
    fn brightness_header_byte_layout_matches_spec_example() {
        let mut header = PlaintextPacket::with_timestamp(Opcode::Brightness, 0x0102_0304);
        header.set_u8(8, 0x50);
        let bytes = header.as_bytes();
        assert_eq!(&bytes[0..8], &[0x0E, 0x00, 0x1A, 0x6D, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(bytes[8], 0x50);
    }

    #[test]
    fn encrypt_is_deterministic_modulo_timestamp() {
        let a = PlaintextPacket::with_timestamp(Opcode::Sync, 111);
        let b = PlaintextPacket::with_timestamp(Opcode::Sync, 111);
        assert_eq!(encrypt(&a), encrypt(&b));
    }

    #[test]
    fn timestamp_stable_within_a_couple_milliseconds() {
        let a = PlaintextPacket::new(Opcode::Brightness);
        let b = PlaintextPacket::new(Opcode::Brightness);
        assert_eq!(a.as_bytes()[0..4], b.as_bytes()[0..4]);
        let ts_a = u32::from_le_bytes(a.as_bytes()[4..8].try_into().unwrap());
        let ts_b = u32::from_le_bytes(b.as_bytes()[4..8].try_into().unwrap());
        assert!(ts_b.abs_diff(ts_a) <= 5);
    }
}
