/// Raw per-process data as read from the host, before any conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// Argument region with NUL terminators; `None` when it could not be read.
    pub command: Option<Vec<u8>>,
    pub virtual_bytes: u64,
    pub resident_bytes: u64,
    pub state: Option<char>,
    pub control_group: Option<String>,
}
