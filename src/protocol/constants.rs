//! Protocol constants for the Turing Smart Screen command/envelope format.

use std::time::Duration;

/// USB vendor ID of the Turing Smart Screen.
pub const VENDOR_ID: u16 = 0x1cbe;
/// USB product ID of the Turing Smart Screen.
pub const PRODUCT_ID: u16 = 0x0088;

/// Interface claimed for all command/data transfers.
pub const USB_INTERFACE: u8 = 0;

/// Timeout used for the primary write and the primary post-write read.
pub const USB_TIMEOUT: Duration = Duration::from_secs(2);
/// Timeout used while draining residual IN data after a transaction.
pub const USB_DRAIN_TIMEOUT: Duration = Duration::from_millis(100);
/// Maximum number of drain reads attempted per transaction.
pub const USB_DRAIN_ATTEMPTS: usize = 5;
/// Size of the primary IN read and each drain read.
pub const USB_READ_LEN: usize = 512;

/// Size of the plaintext command header before DES-CBC padding.
pub const PLAINTEXT_LEN: usize = 500;
/// Size of the encrypted envelope that precedes every transfer.
pub const ENVELOPE_LEN: usize = 512;
/// Magic bytes written at plaintext offset 2..4.
pub const MAGIC: [u8; 2] = [0x1A, 0x6D];
/// Trailer bytes written at envelope offset 510..512.
pub const TRAILER: [u8; 2] = [0xA1, 0x1A];

/// DES key; also used as the CBC initialisation vector. Obfuscation only,
/// not a security boundary — the device is the only thing that needs to
/// agree with this value, so it is never substituted for a stronger cipher.
pub const DES_KEY: &[u8; 8] = b"slv3tuzx";

/// Default per-layer chunk budget for the image streamer (opcode 102).
pub const IMAGE_CHUNK_BUDGET: usize = 524_288;
/// Chunk size used by the video streamer (opcode 121).
pub const VIDEO_CHUNK_LEN: usize = 202_752;
/// Fixed write-remote-file-chunk buffer size (opcode 39), regardless of
/// the actual number of valid bytes in a given chunk.
pub const WRITE_CHUNK_BUFFER_LEN: usize = 1_048_576;

/// Expected native display resolution (width, height), portrait orientation.
pub const NATIVE_RESOLUTION: (u32, u32) = (480, 1920);

/// Delay after the sync opcode in the `delay_sync` preamble.
pub const SYNC_SETTLE_DELAY: Duration = Duration::from_millis(200);
/// Delay before each backpressure probe (opcode 122).
pub const BACKPRESSURE_PROBE_DELAY: Duration = Duration::from_millis(50);
/// Delay after each video chunk write.
pub const VIDEO_CHUNK_DELAY: Duration = Duration::from_millis(30);
/// Busy-counter threshold used by the video streamer's backpressure loop.
pub const VIDEO_BACKPRESSURE_THRESHOLD: u8 = 2;
/// Reply-too-short/reply-busy threshold below which a video chunk write
/// must be followed by a backpressure probe.
pub const VIDEO_REPLY_MIN_LEN: usize = 9;
pub const VIDEO_REPLY_BUSY_THRESHOLD: u8 = 3;

/// On-device directories.
pub const REMOTE_IMG_DIR: &str = "/tmp/sdcard/mmcblk0p1/img/";
pub const REMOTE_VIDEO_DIR: &str = "/tmp/sdcard/mmcblk0p1/video/";

/// Byte offset of the status/busy counter in a device reply.
pub const REPLY_STATUS_OFFSET: usize = 8;

/// Maximum read passes attempted by the list-directory command (opcode 99).
pub const LIST_STORAGE_MAX_PASSES: usize = 20;
/// Accumulator capacity for the list-directory command.
pub const LIST_STORAGE_BUFFER_LEN: usize = 10 * 1024;
/// Token separating entries in a list-directory reply.
pub const LIST_STORAGE_ENTRY_TOKEN: &str = "file:";

/// Brightness applied by the video-streaming prelude.
pub const VIDEO_PRELUDE_BRIGHTNESS: u8 = 32;
/// Frame rate applied by the video-streaming prelude.
pub const VIDEO_PRELUDE_FRAME_RATE: u8 = 25;
/// Brightness applied by the play-select ritual.
pub const PLAY_SELECT_BRIGHTNESS: u8 = 32;
