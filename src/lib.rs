//! Host-side driver for a USB-attached Turing Smart Screen (vendor
//! 0x1CBE, product 0x0088): command-packet framing, DES-CBC
//! obfuscation, the USB bulk transport, and the command/streaming/
//! orchestration layers built on top of it.

pub mod adapters;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod usb;

pub use driver::{Action, ActionOutcome, StorageInfo, StorageKind, TuringScreen};
pub use error::{Result, TuringError};
pub use usb::{Transport, UsbTransport};
