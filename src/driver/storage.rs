//! Storage-info (opcode 100) and list-directory (opcode 99) reply
//! parsing (spec §4.3).

use crate::error::Result;
use crate::protocol::constants::{
    LIST_STORAGE_BUFFER_LEN, LIST_STORAGE_ENTRY_TOKEN, LIST_STORAGE_MAX_PASSES,
};
use crate::usb::Transport;

use super::TuringScreen;

/// Card capacity counters, already converted to a human-readable unit.
/// The device reports these in kilobytes; values below 1 GiB render as
/// megabytes, larger ones as gigabytes.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageInfo {
    pub total: String,
    pub used: String,
    pub valid: String,
}

fn format_kb(kb: u32) -> String {
    const KB_PER_GB: u32 = 1024 * 1024;
    if kb > KB_PER_GB {
        format!("{:.2} GB", kb as f64 / KB_PER_GB as f64)
    } else {
        format!("{:.2} MB", kb as f64 / 1024.0)
    }
}

impl<T: Transport> TuringScreen<T> {
    /// Send opcode 100 and parse the three little-endian u32 counters at
    /// reply bytes 8, 12, 16. `None` if the reply is shorter than 20
    /// bytes (spec §7 `ProtocolMismatch`: logged and degraded, not fatal).
    pub fn storage_info(&mut self) -> Result<Option<StorageInfo>> {
        let reply = self.storage_info_raw()?;
        if reply.len() < 20 {
            log::warn!("storage-info reply too short ({} bytes), skipping parse", reply.len());
            return Ok(None);
        }
        let read_u32 = |offset: usize| u32::from_le_bytes(reply[offset..offset + 4].try_into().unwrap());
        Ok(Some(StorageInfo {
            total: format_kb(read_u32(8)),
            used: format_kb(read_u32(12)),
            valid: format_kb(read_u32(16)),
        }))
    }

    /// Send opcode 99 for `path` up to [`LIST_STORAGE_MAX_PASSES`] times,
    /// accumulating replies into a capped buffer, stopping on an empty
    /// reply or when the buffer is full. Returns the filenames found
    /// after the last `file:` token in the decoded accumulator.
    pub fn list_directory(&mut self, path: &str) -> Result<Vec<String>> {
        let mut accumulator = Vec::with_capacity(LIST_STORAGE_BUFFER_LEN);

        for pass in 0..LIST_STORAGE_MAX_PASSES {
            let reply = self.list_directory_once(path)?;
            if reply.is_empty() {
                log::warn!("no response in list-storage pass {pass}");
                break;
            }
            if accumulator.len() + reply.len() > LIST_STORAGE_BUFFER_LEN {
                break;
            }
            accumulator.extend_from_slice(&reply);
        }

        if accumulator.is_empty() {
            return Ok(Vec::new());
        }

        Ok(parse_list_reply(&accumulator))
    }
}

/// Decode a list-storage accumulator lossily as UTF-8, take the content
/// after the last `file:` token, and split it on `/` into filenames.
fn parse_list_reply(accumulator: &[u8]) -> Vec<String> {
    let decoded = String::from_utf8_lossy(accumulator);
    let Some(tail) = decoded.rsplit(LIST_STORAGE_ENTRY_TOKEN).next() else {
        return Vec::new();
    };
    tail.split('/').filter(|s| !s.is_empty()).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_separated_entries_after_last_token() {
        let entries = parse_list_reply(b"file:a/b/c/");
        assert_eq!(entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn format_kb_matches_spec_storage_example() {
        assert_eq!(format_kb(1024), "1.00 MB");
        assert_eq!(format_kb(512), "0.50 MB");
        assert_eq!(format_kb(256), "0.25 MB");
    }

    #[test]
    fn empty_accumulator_yields_no_entries() {
        assert_eq!(parse_list_reply(b""), Vec::<String>::new());
    }
}
