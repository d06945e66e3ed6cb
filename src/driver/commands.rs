//! One method per protocol opcode (spec §4.3): build the header, fill
//! in opcode-specific bytes, encrypt, and hand off to the transport.

use crate::error::Result;
use crate::protocol::{codec, Opcode, PlaintextPacket};
use crate::usb::Transport;

use super::TuringScreen;

impl<T: Transport> TuringScreen<T> {
    /// Send a bare opcode with no header arguments and no payload.
    fn send_bare(&mut self, opcode: Opcode) -> Result<Vec<u8>> {
        let header = PlaintextPacket::new(opcode);
        self.transport.transact(&codec::encrypt(&header))
    }

    /// Send a header plus a raw payload appended after the envelope in
    /// the same bulk write (image/video chunks, write-file buffers).
    fn send_with_payload(&mut self, header: &PlaintextPacket, payload: &[u8]) -> Result<Vec<u8>> {
        let envelope = codec::encrypt(header);
        let mut frame = Vec::with_capacity(envelope.len() + payload.len());
        frame.extend_from_slice(&envelope);
        frame.extend_from_slice(payload);
        self.transport.transact(&frame)
    }

    /// Build a path-bearing header shared by opcodes 38/42/98/99/110/113:
    /// big-endian path length at bytes 8..12, zero at 12..16, ASCII path
    /// bytes from 16 onward.
    fn path_header(opcode: Opcode, path: &str) -> PlaintextPacket {
        let mut header = PlaintextPacket::new(opcode);
        let path_bytes = path.as_bytes();
        header.set_be_u32(8, path_bytes.len() as u32);
        header.set_bytes(16, path_bytes);
        header
    }

    pub fn sync(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::Sync)
    }

    pub fn restart(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::Restart)
    }

    pub fn pre_video_reset_primary(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::PreVideoResetPrimary)
    }

    pub fn pre_video_reset_secondary(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::PreVideoResetSecondary)
    }

    pub fn post_video_reset(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::PostVideoReset)
    }

    pub fn stop_play1(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::StopPlay1)
    }

    pub fn stop_play2(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::StopPlay2)
    }

    pub fn pre_play_reset(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::PrePlayReset)
    }

    pub fn brightness(&mut self, value: u8) -> Result<Vec<u8>> {
        let mut header = PlaintextPacket::new(Opcode::Brightness);
        header.set_u8(8, value);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub fn frame_rate(&mut self, fps: u8) -> Result<Vec<u8>> {
        let mut header = PlaintextPacket::new(Opcode::FrameRate);
        header.set_u8(8, fps);
        self.transport.transact(&codec::encrypt(&header))
    }

    /// `reserved` is always 0 and is not exposed as a CLI-tunable field
    /// (spec §9); this signature accepts every other save-settings field.
    pub fn save_settings(
        &mut self,
        brightness: u8,
        startup: u8,
        rotation: u8,
        sleep: u8,
        offline: u8,
    ) -> Result<Vec<u8>> {
        let mut header = PlaintextPacket::new(Opcode::SaveSettings);
        header.set_u8(8, brightness);
        header.set_u8(9, startup);
        header.set_u8(10, 0);
        header.set_u8(11, rotation);
        header.set_u8(12, sleep);
        header.set_u8(13, offline);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub fn open_remote_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let header = Self::path_header(Opcode::OpenRemoteFile, path);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub fn delete_remote_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let header = Self::path_header(Opcode::DeleteRemoteFile, path);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub fn play1(&mut self, path: &str) -> Result<Vec<u8>> {
        let header = Self::path_header(Opcode::Play1, path);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub fn play2(&mut self, path: &str) -> Result<Vec<u8>> {
        let header = Self::path_header(Opcode::Play2, path);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub fn play3(&mut self, path: &str) -> Result<Vec<u8>> {
        let header = Self::path_header(Opcode::Play3, path);
        self.transport.transact(&codec::encrypt(&header))
    }

    /// Raw opcode-99 reply for one read pass; the multi-pass accumulation
    /// loop lives in [`super::storage`].
    pub(super) fn list_directory_once(&mut self, path: &str) -> Result<Vec<u8>> {
        let header = Self::path_header(Opcode::ListDirectory, path);
        self.transport.transact(&codec::encrypt(&header))
    }

    pub(super) fn storage_info_raw(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::StorageInfo)
    }

    pub(super) fn backpressure_probe(&mut self) -> Result<Vec<u8>> {
        self.send_bare(Opcode::BackpressureProbe)
    }

    pub(super) fn image_chunk(&mut self, png_bytes: &[u8]) -> Result<Vec<u8>> {
        let mut header = PlaintextPacket::new(Opcode::ImageChunk);
        header.set_be_u32(8, png_bytes.len() as u32);
        self.send_with_payload(&header, png_bytes)
    }

    pub(super) fn video_chunk(&mut self, h264_bytes: &[u8]) -> Result<Vec<u8>> {
        let mut header = PlaintextPacket::new(Opcode::VideoChunk);
        header.set_be_u32(8, h264_bytes.len() as u32);
        self.send_with_payload(&header, h264_bytes)
    }

    /// `buffer` must already be exactly 1 MiB (zero-padded past
    /// `valid_len`); see `file_transfer::upload`.
    pub(super) fn write_remote_file_chunk(
        &mut self,
        buffer: &[u8],
        valid_len: u32,
        is_last: bool,
    ) -> Result<Vec<u8>> {
        let mut header = PlaintextPacket::new(Opcode::WriteRemoteFileChunk);
        header.set_be_u32(8, buffer.len() as u32);
        header.set_be_u32(12, valid_len);
        header.set_u8(16, is_last as u8);
        self.send_with_payload(&header, buffer)
    }
}
