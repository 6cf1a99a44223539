use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn raw_command_line(_pid: u32, _max_bytes: usize) -> Option<Vec<u8>> {
        // The collector falls back to the argument list sysinfo exposes.
        None
    }

    fn run_state(_pid: u32) -> Option<char> {
        None
    }

    fn control_group(_pid: u32) -> Option<String> {
        // No control groups outside Linux.
        None
    }

    fn process_exists(_pid: u32) -> Option<bool> {
        None
    }
}
