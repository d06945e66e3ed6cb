//! The command layer, flow control, streaming engines and orchestrator
//! that sit on top of [`crate::usb::Transport`].
//!
//! Split across files the way `gs_usb`'s driver is split from its
//! context and constants modules: each file owns one concern and all
//! extend the same `TuringScreen<T>` struct via separate `impl` blocks.

mod commands;
mod file_transfer;
mod flow_control;
mod image_stream;
mod orchestrator;
mod storage;
mod video_stream;

pub use file_transfer::RemoteKind;
pub use orchestrator::{Action, ActionOutcome, StorageKind};
pub use storage::StorageInfo;

use crate::usb::Transport;

/// The single entry point for driving a Turing Smart Screen: one
/// operation per protocol command, plus the higher-level streaming and
/// file-transfer rituals built on top of them.
///
/// Generic over `Transport` so tests can drive it with a
/// `MockTransport` instead of real USB hardware.
pub struct TuringScreen<T: Transport> {
    transport: T,
}

impl<T: Transport> TuringScreen<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Consume the driver, returning the underlying transport. Only
    /// useful in tests that want to inspect everything a `MockTransport`
    /// recorded after driving a whole ritual.
    #[cfg(test)]
    pub(crate) fn into_transport(self) -> T {
        self.transport
    }
}
