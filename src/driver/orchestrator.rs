//! Orchestrator: the `delay_sync` preamble and the action dispatch table
//! that maps one CLI subcommand to one fixed opcode sequence (spec §4.8).

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::thread;

use crate::adapters::{image as image_adapter, mp4};
use crate::error::{Result, TuringError};
use crate::protocol::constants::{REMOTE_IMG_DIR, REMOTE_VIDEO_DIR, SYNC_SETTLE_DELAY};
use crate::usb::Transport;

use super::storage::StorageInfo;
use super::TuringScreen;

/// Which on-device directory [`Action::ListStorage`] should enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Image,
    Video,
}

impl StorageKind {
    fn remote_dir(self) -> &'static str {
        match self {
            StorageKind::Image => REMOTE_IMG_DIR,
            StorageKind::Video => REMOTE_VIDEO_DIR,
        }
    }
}

/// One user-initiated action, one per spec §6 CLI subcommand.
pub enum Action<'a> {
    Sync,
    Restart,
    RefreshStorage,
    ClearImage,
    StopPlay,
    Brightness(u8),
    SaveSettings {
        brightness: u8,
        startup: u8,
        rotation: u8,
        sleep: u8,
        offline: u8,
    },
    ListStorage(StorageKind),
    SendImage {
        path: &'a Path,
        max_chunk_bytes: usize,
    },
    SendVideo {
        path: &'a Path,
        loop_playback: bool,
        interrupted: &'a AtomicBool,
    },
    Upload {
        path: &'a Path,
    },
    Delete {
        filename: &'a str,
    },
    PlaySelect {
        filename: &'a str,
    },
}

/// What an action produced, for the CLI layer to print. Most actions
/// have nothing interesting to report beyond success.
#[derive(Debug)]
pub enum ActionOutcome {
    None,
    StorageInfo(Option<StorageInfo>),
    Files(Vec<String>),
    Flag(bool),
}

impl<T: Transport> TuringScreen<T> {
    /// Resynchronise the device's command parser: opcode 10, then a
    /// settle delay. Precedes every action except a bare [`Action::Sync`]
    /// (spec §4.8).
    pub fn delay_sync(&mut self) -> Result<()> {
        self.sync()?;
        thread::sleep(SYNC_SETTLE_DELAY);
        Ok(())
    }

    /// Run one [`Action`], applying the `delay_sync` preamble except for
    /// a bare sync (spec §4.8: "every user-initiated action except bare
    /// sync").
    pub fn execute(&mut self, action: Action<'_>) -> Result<ActionOutcome> {
        if !matches!(action, Action::Sync) {
            self.delay_sync()?;
        }

        match action {
            Action::Sync => Ok(ActionOutcome::None),
            Action::Restart => {
                self.restart()?;
                Ok(ActionOutcome::None)
            }
            Action::RefreshStorage => Ok(ActionOutcome::StorageInfo(self.storage_info()?)),
            Action::ClearImage => {
                self.clear_image()?;
                Ok(ActionOutcome::None)
            }
            Action::StopPlay => {
                self.stop_play1()?;
                self.stop_play2()?;
                Ok(ActionOutcome::None)
            }
            Action::Brightness(value) => {
                self.brightness(value)?;
                Ok(ActionOutcome::None)
            }
            Action::SaveSettings {
                brightness,
                startup,
                rotation,
                sleep,
                offline,
            } => {
                self.save_settings(brightness, startup, rotation, sleep, offline)?;
                Ok(ActionOutcome::None)
            }
            Action::ListStorage(kind) => {
                let files = self.list_directory(kind.remote_dir())?;
                Ok(ActionOutcome::Files(files))
            }
            Action::SendImage { path, max_chunk_bytes } => {
                let source = image_adapter::load_rgba(path)?;
                let ok = self.send_image(&source, max_chunk_bytes)?;
                Ok(ActionOutcome::Flag(ok))
            }
            Action::SendVideo {
                path,
                loop_playback,
                interrupted,
            } => {
                self.send_video(path, loop_playback, interrupted)?;
                Ok(ActionOutcome::None)
            }
            Action::Upload { path } => {
                let (local_path, remote_path) = resolve_upload_target(path)?;
                let ok = self.upload(&local_path, &remote_path)?;
                Ok(ActionOutcome::Flag(ok))
            }
            Action::Delete { filename } => Ok(ActionOutcome::Flag(self.delete(filename)?)),
            Action::PlaySelect { filename } => {
                Ok(ActionOutcome::Flag(self.play_select(filename)?))
            }
        }
    }
}

/// Resolve the local file that will actually be streamed and its
/// on-device destination path (spec §4.7): `.png` files upload as-is,
/// `.mp4` files are first converted to `.h264` by the MP4 adapter.
fn resolve_upload_target(path: &Path) -> Result<(PathBuf, String)> {
    let basename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TuringError::UnsupportedFileType(format!("{path:?}")))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => {
            Ok((path.to_path_buf(), format!("{REMOTE_IMG_DIR}{basename}")))
        }
        Some(ext) if ext.eq_ignore_ascii_case("mp4") => {
            let h264_path = mp4::extract_h264(path)?;
            let remote_name = format!(
                "{}.h264",
                Path::new(basename)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(basename)
            );
            Ok((h264_path, format!("{REMOTE_VIDEO_DIR}{remote_name}")))
        }
        other => Err(TuringError::UnsupportedFileType(format!("{other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::transport::mock::MockTransport;

    #[test]
    fn bare_sync_skips_the_delay_sync_preamble() {
        let transport = MockTransport::new(vec![vec![1u8; 16]]);
        let mut screen = TuringScreen::new(transport);
        screen.execute(Action::Sync).unwrap();
        // exactly one transaction: no leading opcode-10 delay_sync.
        assert_eq!(screen.into_transport().sent.len(), 1);
    }

    #[test]
    fn other_actions_get_delay_sync_preamble() {
        let transport = MockTransport::new(vec![vec![1u8; 16]; 2]);
        let mut screen = TuringScreen::new(transport);
        screen.execute(Action::Restart).unwrap();
        // opcode 10 (delay_sync) + opcode 11 (restart)
        assert_eq!(screen.into_transport().sent.len(), 2);
    }

    #[test]
    fn upload_resolves_png_to_img_dir_with_original_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not a real png").unwrap();
        let (local, remote) = resolve_upload_target(&path).unwrap();
        assert_eq!(local, path);
        assert_eq!(remote, "/tmp/sdcard/mmcblk0p1/img/photo.png");
    }
}
