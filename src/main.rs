//! CLI entry point: argument parsing, logging setup, and dispatch onto
//! one [`turing_screen_cli::Action`] per subcommand (spec §6).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use turing_screen_cli::{Action, ActionOutcome, StorageKind, TuringError, TuringScreen, UsbTransport};

#[derive(Parser, Debug)]
#[command(name = "turing-screen-cli", about = "Driver CLI for USB-attached Turing Smart Screen displays")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StorageKindArg {
    Image,
    Video,
}

impl From<StorageKindArg> for StorageKind {
    fn from(value: StorageKindArg) -> Self {
        match value {
            StorageKindArg::Image => StorageKind::Image,
            StorageKindArg::Video => StorageKind::Video,
        }
    }
}

/// Rotation accepts exactly 0 degrees or 180 degrees (spec §4.3); unlike
/// `brightness`/`startup`/`offline` this isn't a contiguous range, so a
/// `u8::range` parser would wrongly let `1` through.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum RotationArg {
    #[value(name = "0")]
    Deg0,
    #[value(name = "2")]
    Deg180,
}

impl From<RotationArg> for u8 {
    fn from(value: RotationArg) -> Self {
        match value {
            RotationArg::Deg0 => 0,
            RotationArg::Deg180 => 2,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send Sync Command (ID 10) — no delay_sync preamble.
    Sync,
    /// Send Restart Device Command (ID 11)
    Restart,
    /// Send Refresh Storage Command (ID 100)
    RefreshStorage,
    /// Send Clear Image Command (ID 102)
    ClearImage,
    /// Stop any current playback (ID 111, 114)
    StopPlay,
    /// Set Brightness (ID 14)
    Brightness {
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=102))]
        value: u8,
    },
    /// Save Device Settings (ID 125)
    Save {
        #[arg(long, default_value_t = 102, value_parser = clap::value_parser!(u8).range(0..=102))]
        brightness: u8,
        /// 0 = default, 1 = play image, 2 = play video
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
        startup: u8,
        /// 0 = 0 degrees, 2 = 180 degrees
        #[arg(long, default_value = "0", value_enum)]
        rotation: RotationArg,
        #[arg(long, default_value_t = 0)]
        sleep: u8,
        /// 0 = disabled, 1 = enabled
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
        offline: u8,
    },
    /// List storage contents (ID 99)
    ListStorage {
        #[arg(long = "type", value_enum)]
        storage_type: StorageKindArg,
    },
    /// Send Image (ID 102)
    SendImage {
        /// Path to a 480x1920 PNG image
        #[arg(long)]
        path: PathBuf,
    },
    /// Send Video (ID 121)
    SendVideo {
        /// Path to an MP4 video file
        #[arg(long)]
        path: PathBuf,
        /// Loop the video playback until interrupted
        #[arg(long)]
        r#loop: bool,
    },
    /// Upload a file (PNG or MP4) to on-device storage
    Upload {
        #[arg(long)]
        path: PathBuf,
    },
    /// Delete a stored file (PNG or H.264) by name
    Delete {
        #[arg(long)]
        filename: String,
    },
    /// Start playback of an already-stored file (PNG or H.264)
    PlaySelect {
        #[arg(long)]
        filename: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    // Device-absent is the one error class spec §4.9/§6 treats as an
    // unconditional fatal exit, reported without the `anyhow` context
    // wrapper the rest of dispatch uses.
    let transport = match UsbTransport::open() {
        Ok(transport) => transport,
        Err(TuringError::DeviceAbsent) => {
            log::error!("Turing Smart Screen device not found");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            log::error!("failed to open device: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut screen = TuringScreen::new(transport);

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        if let Err(err) = ctrlc::set_handler(move || interrupted.store(true, Ordering::Relaxed)) {
            log::warn!("failed to install Ctrl-C handler: {err}");
        }
    }

    match run(&mut screen, cli.command, &interrupted).context("turing-screen-cli action failed") {
        Ok(outcome) => {
            report(outcome);
            ExitCode::SUCCESS
        }
        Err(err) if interrupted.load(Ordering::Relaxed) => {
            log::info!("interrupted by user: {err:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    screen: &mut TuringScreen<UsbTransport>,
    command: Command,
    interrupted: &AtomicBool,
) -> turing_screen_cli::Result<ActionOutcome> {
    let action = match &command {
        Command::Sync => Action::Sync,
        Command::Restart => Action::Restart,
        Command::RefreshStorage => Action::RefreshStorage,
        Command::ClearImage => Action::ClearImage,
        Command::StopPlay => Action::StopPlay,
        Command::Brightness { value } => Action::Brightness(*value),
        Command::Save {
            brightness,
            startup,
            rotation,
            sleep,
            offline,
        } => Action::SaveSettings {
            brightness: *brightness,
            startup: *startup,
            rotation: (*rotation).into(),
            sleep: *sleep,
            offline: *offline,
        },
        Command::ListStorage { storage_type } => Action::ListStorage((*storage_type).into()),
        Command::SendImage { path, .. } => Action::SendImage {
            path: path.as_path(),
            max_chunk_bytes: turing_screen_cli::protocol::constants::IMAGE_CHUNK_BUDGET,
        },
        Command::SendVideo { path, r#loop, .. } => Action::SendVideo {
            path: path.as_path(),
            loop_playback: *r#loop,
            interrupted,
        },
        Command::Upload { path } => Action::Upload { path: path.as_path() },
        Command::Delete { filename } => Action::Delete {
            filename: filename.as_str(),
        },
        Command::PlaySelect { filename } => Action::PlaySelect {
            filename: filename.as_str(),
        },
    };

    screen.execute(action)
}

fn report(outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::None => {}
        ActionOutcome::StorageInfo(Some(info)) => {
            println!("Card Total = {}", info.total);
            println!("Card Used = {}", info.used);
            println!("Card Valid = {}", info.valid);
        }
        ActionOutcome::StorageInfo(None) => {
            println!("storage-info reply was too short to parse");
        }
        ActionOutcome::Files(files) => {
            for file in files {
                println!("{file}");
            }
        }
        ActionOutcome::Flag(true) => println!("ok"),
        ActionOutcome::Flag(false) => println!("failed"),
    }
}
