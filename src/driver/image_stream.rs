//! The layered PNG image streamer (spec §4.5, opcode 102).
//!
//! Splits a source image into progressively taller bottom-up canvases so
//! no single transfer exceeds `max_chunk_bytes`, matching the device's
//! expectation of a bottom-up layered update.

use image::{Rgba, RgbaImage};

use crate::adapters::image as image_adapter;
use crate::error::Result;
use crate::protocol::constants::NATIVE_RESOLUTION;
use crate::usb::Transport;

use super::TuringScreen;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// One bottom-up layer of a split image, ready to encode and send.
struct Layer {
    canvas: RgbaImage,
}

/// Split `source` into `num_layers` bottom-up layers of height
/// `source.height() / num_layers` each (spec §4.5 step 2).
fn build_layers(source: &RgbaImage, num_layers: u32) -> Vec<Layer> {
    let (width, height) = source.dimensions();
    let layer_height = height / num_layers;

    (0..num_layers)
        .map(|i| {
            let y_start = height.saturating_sub((i + 1) * layer_height);
            let canvas_height = height - i * layer_height;

            let mut canvas = RgbaImage::from_pixel(width, canvas_height, TRANSPARENT);
            let visible_height = canvas_height - y_start;
            for y in 0..visible_height {
                for x in 0..width {
                    canvas.put_pixel(x, y_start + y, *source.get_pixel(x, y_start + y));
                }
            }
            Layer { canvas }
        })
        .collect()
}

impl<T: Transport> TuringScreen<T> {
    /// Encode `source` as PNG, split it into bottom-up layers under
    /// `max_chunk_bytes`, and send each layer via opcode 102 in order.
    /// Succeeds only if every layer's transfer produced a non-empty reply.
    pub fn send_image(&mut self, source: &RgbaImage, max_chunk_bytes: usize) -> Result<bool> {
        let (width, height) = source.dimensions();
        if (width, height) != NATIVE_RESOLUTION {
            log::warn!(
                "image resolution is {width}x{height}, not {}x{} (device screen resolution)",
                NATIVE_RESOLUTION.0,
                NATIVE_RESOLUTION.1
            );
        }

        let full_png = image_adapter::encode_png(source)?;
        let num_layers = full_png.len().div_ceil(max_chunk_bytes).max(1) as u32;
        log::info!(
            "image size: {} bytes -> split into {num_layers} layers",
            full_png.len()
        );

        let layers = build_layers(source, num_layers);

        let mut all_ok = true;
        for (i, layer) in layers.iter().enumerate() {
            let encoded = image_adapter::encode_png(&layer.canvas)?;
            log::debug!("sending layer {} ({} bytes)", i + 1, encoded.len());
            let reply = self.image_chunk(&encoded)?;
            all_ok &= !reply.is_empty();
        }
        Ok(all_ok)
    }

    /// Send the embedded fully-transparent clear-image PNG (spec §6).
    pub fn clear_image(&mut self) -> Result<Vec<u8>> {
        self.image_chunk(&crate::adapters::assets::clear_image_png())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::transport::mock::MockTransport;

    fn layer_count(total_len: usize, budget: usize) -> u32 {
        total_len.div_ceil(budget).max(1) as u32
    }

    #[test]
    fn layer_count_matches_spec_example() {
        assert_eq!(layer_count(1_200_000, 524_288), 3);
    }

    #[test]
    fn layers_are_bottom_up_with_expected_heights() {
        let source = RgbaImage::from_pixel(480, 1920, Rgba([1, 2, 3, 255]));
        let layers = build_layers(&source, 3);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].canvas.height(), 1920);
        assert_eq!(layers[1].canvas.height(), 1280);
        assert_eq!(layers[2].canvas.height(), 640);
    }

    #[test]
    fn transparent_region_above_visible_band_stays_transparent() {
        let source = RgbaImage::from_pixel(480, 1920, Rgba([9, 9, 9, 255]));
        let layers = build_layers(&source, 3);
        let layer2 = &layers[1].canvas;
        assert_eq!(*layer2.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*layer2.get_pixel(0, 639), *source.get_pixel(0, 639 + 640));
    }

    #[test]
    fn send_image_fails_if_any_layer_reply_is_empty() {
        let source = RgbaImage::from_pixel(480, 1920, Rgba([0, 0, 0, 255]));
        let transport = MockTransport::new(vec![vec![1u8; 16], vec![], vec![1u8; 16]]);
        let mut screen = TuringScreen::new(transport);
        let ok = screen.send_image(&source, 524_288).unwrap();
        assert!(!ok);
    }
}
