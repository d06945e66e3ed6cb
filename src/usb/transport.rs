//! The write-then-read transaction primitive every command rides on.
//!
//! Grounded on the blocking transfer methods of `gs_usb/context.rs`'s
//! `LibusbDeviceHandle`, but built directly on the safe `rusb` API: this
//! driver talks to a single bulk endpoint pair synchronously and never
//! needs the async-transfer/event-thread machinery gs_usb uses to catch
//! unsolicited CAN frames (see `SPEC_FULL.md` §5 for why that
//! architecture was not carried over).

use rusb::{DeviceHandle, GlobalContext};

use crate::protocol::constants::{
    USB_DRAIN_ATTEMPTS, USB_DRAIN_TIMEOUT, USB_READ_LEN, USB_TIMEOUT,
};
use crate::error::Result;

use super::device::{self, Endpoints};

/// Everything the command layer needs from the transport: write a frame
/// (an envelope, optionally followed by a raw payload), get back
/// whatever the device replied with. A trait so unit tests can swap in
/// a `MockTransport` without touching real hardware.
pub trait Transport {
    fn transact(&mut self, frame: &[u8]) -> Result<Vec<u8>>;
}

/// A `Transport` backed by a claimed `rusb` bulk endpoint pair.
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    endpoints: Endpoints,
}

impl UsbTransport {
    /// Find the device, claim interface 0, and return a ready transport.
    pub fn open() -> Result<Self> {
        let (mut handle, endpoints) = device::open_device()?;

        if let Ok(active) = handle.kernel_driver_active(crate::protocol::constants::USB_INTERFACE)
        {
            if active {
                let _ = handle.detach_kernel_driver(crate::protocol::constants::USB_INTERFACE);
            }
        }

        if let Ok(device) = handle.device().active_config_descriptor() {
            if let Err(err) = handle.set_active_configuration(device.number()) {
                log::warn!("set_active_configuration failed, continuing anyway: {err}");
            }
        }

        handle.claim_interface(crate::protocol::constants::USB_INTERFACE)?;

        Ok(Self { handle, endpoints })
    }

    /// Read with a short timeout until the device stops answering,
    /// discarding whatever comes back. Mirrors `read_flush` in the
    /// original driver: clears out replies left over from a previous
    /// transaction that the caller never collected.
    fn drain(&mut self) {
        let mut buf = [0u8; USB_READ_LEN];
        for _ in 0..USB_DRAIN_ATTEMPTS {
            match self
                .handle
                .read_bulk(self.endpoints.in_ep, &mut buf, USB_DRAIN_TIMEOUT)
            {
                Ok(0) => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }
}

impl Transport for UsbTransport {
    /// Write `frame`, then read the immediate reply. Per spec §4.2/§4.9:
    /// a write or primary-read failure is logged and surfaced as an
    /// empty reply, not a hard error — callers (the backpressure probe,
    /// the streaming loops, every opcode method) already treat a short
    /// or missing reply as "not ready yet"/"skip parsing", so one flaky
    /// transaction degrades gracefully instead of aborting the action.
    fn transact(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        if let Err(err) = self.handle.write_bulk(self.endpoints.out_ep, frame, USB_TIMEOUT) {
            log::warn!("USB write failed: {err}");
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; USB_READ_LEN];
        let read = match self.handle.read_bulk(self.endpoints.in_ep, &mut buf, USB_TIMEOUT) {
            Ok(read) => read,
            Err(err) => {
                log::warn!("USB read failed: {err}");
                return Ok(Vec::new());
            }
        };
        buf.truncate(read);

        self.drain();

        Ok(buf)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Records every envelope written and plays back queued replies in
    /// order, for command-layer unit tests that never touch real hardware.
    pub struct MockTransport {
        pub sent: Vec<Vec<u8>>,
        pub replies: std::collections::VecDeque<Vec<u8>>,
    }

    impl MockTransport {
        pub fn new(replies: Vec<Vec<u8>>) -> Self {
            Self {
                sent: Vec::new(),
                replies: replies.into(),
            }
        }
    }

    impl Transport for MockTransport {
        fn transact(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
            self.sent.push(frame.to_vec());
            Ok(self.replies.pop_front().unwrap_or_default())
        }
    }
}
