//! The H.264 video streamer (spec §4.6, opcode 121).
//!
//! Prelude resets the device into video mode, the loop chunks the
//! elementary stream and interleaves backpressure probes, and teardown
//! (opcode 123) is unconditional on every exit path including a
//! cooperative user interrupt.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::error::Result;
use crate::protocol::constants::{
    REPLY_STATUS_OFFSET, VIDEO_BACKPRESSURE_THRESHOLD, VIDEO_CHUNK_DELAY, VIDEO_CHUNK_LEN,
    VIDEO_PRELUDE_BRIGHTNESS, VIDEO_PRELUDE_FRAME_RATE, VIDEO_REPLY_BUSY_THRESHOLD,
    VIDEO_REPLY_MIN_LEN,
};
use crate::usb::Transport;

use super::TuringScreen;

impl<T: Transport> TuringScreen<T> {
    /// Fixed opcode sequence that resets the device into video mode
    /// before the first chunk is sent (spec §4.6).
    fn send_video_prelude(&mut self) -> Result<()> {
        self.stop_play1()?;
        self.pre_play_reset()?;
        self.pre_video_reset_primary()?;
        self.brightness(VIDEO_PRELUDE_BRIGHTNESS)?;
        self.pre_video_reset_secondary()?;
        self.clear_image()?;
        self.frame_rate(VIDEO_PRELUDE_FRAME_RATE)?;
        Ok(())
    }

    /// Stream `path`'s H.264 Annex-B bytes in [`VIDEO_CHUNK_LEN`]-byte
    /// chunks. Loops back to the start of the file when `loop_playback`
    /// is set, until EOF (non-looping) or `interrupted` flips true
    /// between chunks. Teardown (opcode 123) always runs, on every exit
    /// path.
    pub fn send_video(
        &mut self,
        path: &Path,
        loop_playback: bool,
        interrupted: &AtomicBool,
    ) -> Result<()> {
        self.send_video_prelude()?;

        let result = self.stream_video_file(path, loop_playback, interrupted);

        if let Err(err) = self.post_video_reset() {
            log::warn!("post-video teardown (opcode 123) failed: {err}");
        }

        result
    }

    fn stream_video_file(
        &mut self,
        path: &Path,
        loop_playback: bool,
        interrupted: &AtomicBool,
    ) -> Result<()> {
        loop {
            let mut file = File::open(path)?;
            let mut buf = vec![0u8; VIDEO_CHUNK_LEN];

            loop {
                if interrupted.load(Ordering::Relaxed) {
                    log::info!("video stream interrupted by user");
                    return Ok(());
                }

                let read = file.read(&mut buf)?;
                if read == 0 {
                    break;
                }

                let reply = self.video_chunk(&buf[..read])?;
                thread::sleep(VIDEO_CHUNK_DELAY);

                let needs_backpressure = reply.len() < VIDEO_REPLY_MIN_LEN
                    || reply
                        .get(REPLY_STATUS_OFFSET)
                        .is_none_or(|&busy| busy <= VIDEO_REPLY_BUSY_THRESHOLD);
                if needs_backpressure {
                    self.delay(VIDEO_BACKPRESSURE_THRESHOLD)?;
                }
            }

            log::info!("video sent successfully");
            if !loop_playback {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::transport::mock::MockTransport;
    use std::io::Write as _;

    #[test]
    fn busy_reply_forces_one_backpressure_probe_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.h264");
        std::fs::write(&path, vec![0u8; VIDEO_CHUNK_LEN]).unwrap();

        // prelude: 7 replies, then one video chunk reply with byte 8 = 1
        // (busy, forces a delay probe), then the probe's own replies
        // (byte 8 = 0, ready), then the teardown reply.
        let mut replies = vec![vec![1u8; 16]; 7];
        let mut busy_reply = vec![1u8; 16];
        busy_reply[8] = 1;
        replies.push(busy_reply);
        let mut ready_reply = vec![1u8; 16];
        ready_reply[8] = 0;
        replies.push(ready_reply);
        replies.push(vec![1u8; 16]);

        let transport = MockTransport::new(replies);
        let mut screen = TuringScreen::new(transport);
        let interrupted = AtomicBool::new(false);
        screen.send_video(&path, false, &interrupted).unwrap();
    }

    #[test]
    fn empty_reply_mid_stream_triggers_backpressure_not_abort() {
        // A write or read failure inside `Transport::transact` now surfaces
        // as an empty reply rather than an `Err` (see `usb::transport`), so
        // a flaky transaction mid-stream must be absorbed the same way a
        // short/busy reply already is: one backpressure probe, then carry
        // on to the next chunk instead of aborting the whole stream.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.h264");
        std::fs::write(&path, vec![0u8; VIDEO_CHUNK_LEN]).unwrap();

        let mut replies = vec![vec![1u8; 16]; 7]; // prelude
        replies.push(Vec::new()); // simulated transport failure on the chunk write
        let mut ready_reply = vec![1u8; 16];
        ready_reply[8] = 0;
        replies.push(ready_reply); // the probe's own reply, device ready
        replies.push(vec![1u8; 16]); // teardown

        let transport = MockTransport::new(replies);
        let mut screen = TuringScreen::new(transport);
        let interrupted = AtomicBool::new(false);
        screen.send_video(&path, false, &interrupted).unwrap();
    }

    #[test]
    fn interrupt_flag_still_sends_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.h264");
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![0u8; VIDEO_CHUNK_LEN * 4]).unwrap();

        let mut replies = vec![vec![1u8; 16]; 7]; // prelude
        replies.push(vec![1u8; 16]); // teardown
        let transport = MockTransport::new(replies);
        let mut screen = TuringScreen::new(transport);

        let interrupted = AtomicBool::new(true);
        screen.send_video(&path, true, &interrupted).unwrap();

        // prelude (7) + teardown (1) = 8 sends, no video chunk was sent
        assert_eq!(screen.into_transport().sent.len(), 8);
    }
}
