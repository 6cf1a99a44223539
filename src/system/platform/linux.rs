use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn raw_command_line(pid: u32, max_bytes: usize) -> Option<Vec<u8>> {
        let limit = max_bytes.checked_sub(1)?;
        let file = File::open(format!("/proc/{pid}/cmdline")).ok()?;
        let mut buf = Vec::with_capacity(limit.min(4096));
        // /proc/<pid>/cmdline can be arbitrarily long; never read past the limit.
        file.take(limit as u64).read_to_end(&mut buf).ok()?;
        Some(buf)
    }

    fn run_state(pid: u32) -> Option<char> {
        let contents = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        state_from_stat(&contents)
    }

    fn control_group(pid: u32) -> Option<String> {
        let contents = std::fs::read_to_string(format!("/proc/{pid}/cgroup")).ok()?;
        primary_control_group(&contents)
    }

    fn process_exists(pid: u32) -> Option<bool> {
        Some(Path::new(&format!("/proc/{pid}")).exists())
    }
}

/// State letter from a `/proc/<pid>/stat` line. The command name may itself
/// contain spaces and parens, so parsing starts after the last `)`.
fn state_from_stat(contents: &str) -> Option<char> {
    let after_comm = contents.rfind(')')? + 1;
    let state = contents[after_comm..].split_whitespace().next()?;
    let mut chars = state.chars();
    let letter = chars.next()?;
    chars.next().is_none().then_some(letter)
}

/// cgroup v2: single line "0::/path/to/group"
/// cgroup v1: multiple lines "hierarchy-id:controller-list:path"
/// The unified entry wins; otherwise the first v1 entry that is not the root.
fn primary_control_group(contents: &str) -> Option<String> {
    let mut fallback = None;
    for line in contents.lines() {
        let parts: Vec<&str> = line.splitn(3, ':').collect();
        if parts.len() != 3 {
            continue;
        }
        let path = parts[2].trim();
        if parts[0] == "0" && parts[1].is_empty() {
            return (!path.is_empty()).then(|| path.to_string());
        }
        if fallback.is_none() && !path.is_empty() && path != "/" {
            fallback = Some(path.to_string());
        }
    }
    fallback
}
