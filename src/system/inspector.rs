use crate::format::truncate_utf8;

use super::sample::ProcessSample;

pub const DEFAULT_CMDLINE_MAX_BYTES: usize = 512;
/// Kernel command-name length without its terminator.
pub const NAME_MAX_BYTES: usize = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessMemory {
    pub vsz_kb: u64,
    pub rss_kb: u64,
}

/// Virtual and resident size in KiB. Processes without an address space
/// (kernel workers) report zero bytes and therefore `(0, 0)`.
pub fn memory_of(sample: &ProcessSample) -> ProcessMemory {
    ProcessMemory {
        vsz_kb: sample.virtual_bytes / 1024,
        rss_kb: sample.resident_bytes / 1024,
    }
}

/// Turns a raw argument region into a single readable line of at most
/// `max_bytes - 1` bytes. Argument terminators become spaces; an unreadable
/// or empty region yields an empty string.
pub fn command_line_of(raw: Option<&[u8]>, max_bytes: usize) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let limit = max_bytes.saturating_sub(1);
    let region = &raw[..raw.len().min(limit)];

    let end = region
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    if end == 0 {
        return String::new();
    }

    let bytes: Vec<u8> = region[..end]
        .iter()
        .map(|&b| if b == 0 { b' ' } else { b })
        .collect();
    let line = String::from_utf8_lossy(&bytes);
    // Lossy replacement can grow the string past the limit.
    truncate_utf8(&line, limit).to_string()
}

pub fn bounded_name(name: &str) -> String {
    truncate_utf8(name, NAME_MAX_BYTES).to_string()
}
