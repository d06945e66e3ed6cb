//! USB device discovery and the synchronous write/read transport.

pub mod device;
pub mod transport;

pub use transport::{Transport, UsbTransport};
