/// Per-OS process details that `sysinfo` does not expose, or exposes without
/// the bounds a report needs. Every lookup is best-effort: `None` means the
/// data (or the capability) is unavailable.
pub trait PlatformExtensions {
    /// At most `max_bytes - 1` bytes of the NUL-separated argument region.
    fn raw_command_line(pid: u32, max_bytes: usize) -> Option<Vec<u8>>;
    /// Single-letter scheduler state, e.g. `R`, `S`, `D`, `Z`.
    fn run_state(pid: u32) -> Option<char>;
    /// Primary control-group path of the process.
    fn control_group(pid: u32) -> Option<String>;
    /// Whether the process is still present; `None` when the platform cannot tell.
    fn process_exists(pid: u32) -> Option<bool>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod other;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use other as platform_impl;

pub fn raw_command_line(pid: u32, max_bytes: usize) -> Option<Vec<u8>> {
    platform_impl::Platform::raw_command_line(pid, max_bytes)
}

pub fn run_state(pid: u32) -> Option<char> {
    platform_impl::Platform::run_state(pid)
}

pub fn control_group(pid: u32) -> Option<String> {
    platform_impl::Platform::control_group(pid)
}

pub fn process_exists(pid: u32) -> Option<bool> {
    platform_impl::Platform::process_exists(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic_for_current_pid() {
        let pid = std::process::id();
        let _ = raw_command_line(pid, 512);
        let _ = run_state(pid);
        let _ = control_group(pid);
        assert_ne!(process_exists(pid), Some(false));
    }

    #[test]
    fn wrappers_tolerate_missing_pid() {
        let pid = u32::MAX;
        assert!(raw_command_line(pid, 512).is_none());
        assert!(run_state(pid).is_none());
        assert!(control_group(pid).is_none());
        assert_ne!(process_exists(pid), Some(true));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn current_process_is_visible_on_linux() {
        let pid = std::process::id();
        let raw = raw_command_line(pid, 4096).expect("own cmdline readable");
        assert!(!raw.is_empty());
        assert!(run_state(pid).is_some());
        assert_eq!(process_exists(pid), Some(true));
    }
}
