//! Device discovery: find the first Turing Smart Screen and its bulk
//! endpoints on interface 0.
//!
//! Grounded on `gs_usb/device.rs`'s `select_device`/`find_gs_usb_interface`
//! pair, rewritten against the safe `rusb` API instead of raw
//! `libusb1_sys` calls — this core has no need for the async transfer
//! machinery the gs_usb driver needs for unsolicited CAN frame streaming.

use rusb::{Direction, GlobalContext, TransferType};

use crate::error::{Result, TuringError};
use crate::protocol::constants::{PRODUCT_ID, USB_INTERFACE, VENDOR_ID};

/// The bulk OUT/IN endpoint addresses on interface 0.
#[derive(Clone, Copy, Debug)]
pub struct Endpoints {
    pub out_ep: u8,
    pub in_ep: u8,
}

/// Find interface 0's first bulk OUT and first bulk IN endpoint.
fn find_bulk_endpoints(device: &rusb::Device<GlobalContext>) -> Result<Endpoints> {
    let config = device.active_config_descriptor()?;

    let interface = config
        .interfaces()
        .find(|iface| iface.number() == USB_INTERFACE)
        .ok_or_else(|| TuringError::ProtocolMismatch("interface 0 not found".into()))?;

    let mut out_ep = None;
    let mut in_ep = None;

    for descriptor in interface.descriptors() {
        for endpoint in descriptor.endpoint_descriptors() {
            if endpoint.transfer_type() != TransferType::Bulk {
                continue;
            }
            match endpoint.direction() {
                Direction::Out if out_ep.is_none() => out_ep = Some(endpoint.address()),
                Direction::In if in_ep.is_none() => in_ep = Some(endpoint.address()),
                _ => {}
            }
        }
    }

    match (out_ep, in_ep) {
        (Some(out_ep), Some(in_ep)) => Ok(Endpoints { out_ep, in_ep }),
        _ => Err(TuringError::ProtocolMismatch(
            "could not find bulk IN/OUT endpoints on interface 0".into(),
        )),
    }
}

/// Locate the first attached device matching vendor 0x1CBE / product
/// 0x0088, returning an opened handle and its bulk endpoints.
pub fn open_device() -> Result<(rusb::DeviceHandle<GlobalContext>, Endpoints)> {
    let devices = rusb::devices()?;

    for device in devices.iter() {
        let descriptor = match device.device_descriptor() {
            Ok(d) => d,
            Err(_) => continue,
        };
        if descriptor.vendor_id() != VENDOR_ID || descriptor.product_id() != PRODUCT_ID {
            continue;
        }

        let endpoints = find_bulk_endpoints(&device)?;
        let handle = device.open()?;
        return Ok((handle, endpoints));
    }

    Err(TuringError::DeviceAbsent)
}
