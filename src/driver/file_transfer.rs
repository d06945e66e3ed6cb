//! Upload, delete, and play-select for on-device storage (spec §4.7).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, TuringError};
use crate::protocol::constants::{
    PLAY_SELECT_BRIGHTNESS, REMOTE_IMG_DIR, REMOTE_VIDEO_DIR, WRITE_CHUNK_BUFFER_LEN,
};
use crate::usb::Transport;

use super::TuringScreen;

/// Which on-device directory a filename belongs to, inferred from its
/// extension (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    Image,
    Video,
}

impl RemoteKind {
    fn from_extension(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Ok(RemoteKind::Image),
            Some(ext) if ext.eq_ignore_ascii_case("h264") => Ok(RemoteKind::Video),
            Some(ext) if ext.eq_ignore_ascii_case("mp4") => Ok(RemoteKind::Video),
            other => Err(TuringError::UnsupportedFileType(format!("{other:?}"))),
        }
    }

    fn remote_dir(self) -> &'static str {
        match self {
            RemoteKind::Image => REMOTE_IMG_DIR,
            RemoteKind::Video => REMOTE_VIDEO_DIR,
        }
    }
}

fn remote_path_for(kind: RemoteKind, filename: &str) -> String {
    format!("{}{}", kind.remote_dir(), filename)
}

impl<T: Transport> TuringScreen<T> {
    /// Upload `local_path` to on-device storage: `.png` files go
    /// straight to `/img/`; `.mp4` files are first converted to
    /// `.h264` by the caller-supplied adapter and go to `/video/`.
    /// Streams the resulting file in 1 MiB chunks via opcode 39.
    pub fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<bool> {
        let reply = self.open_remote_file(remote_path)?;
        if reply.is_empty() {
            log::warn!("open-remote-file got no reply for {remote_path}, aborting upload");
            return Ok(false);
        }

        let mut file = File::open(local_path)?;
        let total_len = file.metadata()?.len();
        let mut sent = 0u64;

        loop {
            let mut chunk = vec![0u8; WRITE_CHUNK_BUFFER_LEN];
            let read = file.read(&mut chunk)?;
            sent += read as u64;
            let is_last = sent >= total_len;

            self.write_remote_file_chunk(&chunk, read as u32, is_last)?;

            if is_last {
                break;
            }
        }

        Ok(true)
    }

    /// Delete a stored file by name, inferring its remote directory from
    /// the extension.
    pub fn delete(&mut self, filename: &str) -> Result<bool> {
        let kind = RemoteKind::from_extension(Path::new(filename))?;
        let reply = self.delete_remote_file(&remote_path_for(kind, filename))?;
        Ok(!reply.is_empty())
    }

    /// Play a stored file by name via the bare opcode corresponding to
    /// its kind (98 for the first play variant).
    pub fn play(&mut self, filename: &str) -> Result<bool> {
        let kind = RemoteKind::from_extension(Path::new(filename))?;
        let reply = self.play1(&remote_path_for(kind, filename))?;
        Ok(!reply.is_empty())
    }

    /// The fixed `play-select` ritual for starting playback of an
    /// already-stored file (spec §4.7): stop any current playback, set
    /// brightness, clear the screen, then issue the kind-specific play
    /// opcode (110 for `.h264`, 113 for `.png`).
    pub fn play_select(&mut self, filename: &str) -> Result<bool> {
        let kind = RemoteKind::from_extension(Path::new(filename))?;

        self.stop_play1()?;
        self.stop_play2()?;
        self.brightness(PLAY_SELECT_BRIGHTNESS)?;

        if kind == RemoteKind::Video {
            self.play1(&remote_path_for(kind, filename))?;
        }

        self.stop_play1()?;
        self.pre_play_reset()?;
        self.clear_image()?;

        let reply = match kind {
            RemoteKind::Video => self.play2(&remote_path_for(kind, filename))?,
            RemoteKind::Image => self.play3(&remote_path_for(kind, filename))?,
        };
        Ok(!reply.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::transport::mock::MockTransport;

    #[test]
    fn png_extension_maps_to_image_dir() {
        assert_eq!(
            remote_path_for(RemoteKind::from_extension(Path::new("a.png")).unwrap(), "a.png"),
            "/tmp/sdcard/mmcblk0p1/img/a.png"
        );
    }

    #[test]
    fn h264_extension_maps_to_video_dir() {
        assert_eq!(
            remote_path_for(RemoteKind::from_extension(Path::new("a.h264")).unwrap(), "a.h264"),
            "/tmp/sdcard/mmcblk0p1/video/a.h264"
        );
    }

    #[test]
    fn unsupported_extension_is_rejected_before_any_io() {
        let transport = MockTransport::new(vec![]);
        let mut screen = TuringScreen::new(transport);
        let result = screen.delete("a.txt");
        assert!(matches!(result, Err(TuringError::UnsupportedFileType(_))));
        assert!(screen.into_transport().sent.is_empty());
    }

    #[test]
    fn upload_issues_one_open_and_ceil_chunks_with_last_flag_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, vec![7u8; WRITE_CHUNK_BUFFER_LEN + 10]).unwrap();

        let replies = vec![vec![1u8; 16], vec![1u8; 16], vec![1u8; 16]];
        let transport = MockTransport::new(replies);
        let mut screen = TuringScreen::new(transport);
        let ok = screen
            .upload(&path, "/tmp/sdcard/mmcblk0p1/img/a.png")
            .unwrap();
        assert!(ok);

        // 1 open + 2 write-chunks (1 MiB + 10 bytes)
        assert_eq!(screen.into_transport().sent.len(), 3);
    }

    #[test]
    fn play_select_for_h264_issues_expected_opcode_sequence() {
        let replies = vec![vec![1u8; 16]; 8];
        let transport = MockTransport::new(replies);
        let mut screen = TuringScreen::new(transport);
        let ok = screen.play_select("clip.h264").unwrap();
        assert!(ok);
        // 111, 114, 14, 98, 111, 112, 102, 110 = 8 transactions
        assert_eq!(screen.into_transport().sent.len(), 8);
    }

    #[test]
    fn play_select_for_png_skips_the_play1_probe() {
        let replies = vec![vec![1u8; 16]; 7];
        let transport = MockTransport::new(replies);
        let mut screen = TuringScreen::new(transport);
        let ok = screen.play_select("still.png").unwrap();
        assert!(ok);
        // 111, 114, 14, 111, 112, 102, 113 = 7 transactions (no play1)
        assert_eq!(screen.into_transport().sent.len(), 7);
    }
}
