//! Command-packet framing and DES-CBC obfuscation (spec §3, §4.1).
//!
//! Everything in this module is a pure function operating on in-memory
//! buffers; no USB I/O happens here. See [`crate::usb`] for the
//! transport and [`crate::driver`] for the per-opcode command layer.

pub mod codec;
pub mod constants;
pub mod opcode;

pub use codec::PlaintextPacket;
pub use constants::ENVELOPE_LEN;
pub use opcode::Opcode;
