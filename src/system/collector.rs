use color_eyre::eyre::{Result, eyre};
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};

use super::inspector::DEFAULT_CMDLINE_MAX_BYTES;
use super::memory::SystemMemory;
use super::platform;
use super::sample::ProcessSample;

/// Where a report gets its host data from.
pub trait ProcessSource {
    fn memory(&mut self) -> SystemMemory;

    /// Lazily yields one sample per live process. Processes that disappear
    /// mid-enumeration are skipped rather than reported as errors; the only
    /// failure is a process table that cannot be read at all.
    fn samples(&mut self) -> Result<Box<dyn Iterator<Item = ProcessSample> + '_>>;
}

/// Live host collector backed by `sysinfo`. Each report should use its own
/// collector so concurrent reports never share state.
pub struct Collector {
    sys: System,
    cmdline_max_bytes: usize,
    read_control_groups: bool,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(DEFAULT_CMDLINE_MAX_BYTES, true)
    }
}

impl Collector {
    pub fn new(cmdline_max_bytes: usize, read_control_groups: bool) -> Self {
        Collector {
            sys: System::new(),
            cmdline_max_bytes,
            read_control_groups,
        }
    }

    fn refresh_processes(&mut self) -> Result<()> {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(eyre!(
                "process table is not available on {}",
                std::env::consts::OS
            ));
        }
        let refreshed = self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );
        tracing::debug!(refreshed, "process table refreshed");
        ensure_table_visible(self.sys.processes().len())
    }

    fn sample(&self, pid: Pid, process: &Process) -> Option<ProcessSample> {
        let pid_u32 = pid.as_u32();
        if platform::process_exists(pid_u32) == Some(false) {
            tracing::debug!(pid = pid_u32, "process exited during enumeration, skipping");
            return None;
        }

        let command = platform::raw_command_line(pid_u32, self.cmdline_max_bytes)
            .or_else(|| argument_region(process));
        let state = platform::run_state(pid_u32).or_else(|| status_letter(process.status()));
        let control_group = if self.read_control_groups {
            platform::control_group(pid_u32)
        } else {
            None
        };

        Some(ProcessSample {
            pid: pid_u32,
            name: process.name().to_string_lossy().to_string(),
            command,
            virtual_bytes: process.virtual_memory(),
            resident_bytes: process.memory(),
            state,
            control_group,
        })
    }
}

impl ProcessSource for Collector {
    fn memory(&mut self) -> SystemMemory {
        self.sys.refresh_memory();
        SystemMemory::from_system(&self.sys)
    }

    fn samples(&mut self) -> Result<Box<dyn Iterator<Item = ProcessSample> + '_>> {
        self.refresh_processes()?;

        let this: &Collector = self;
        let mut entries: Vec<(&Pid, &Process)> = this
            .sys
            .processes()
            .iter()
            .filter(|(pid, _)| pid.as_u32() != 0)
            .collect();
        entries.sort_unstable_by_key(|(pid, _)| **pid);

        Ok(Box::new(
            entries
                .into_iter()
                .filter_map(move |(pid, process)| this.sample(*pid, process)),
        ))
    }
}

/// A live host always lists at least the calling process, so an empty table
/// means the process table itself could not be read (e.g. `/proc` missing).
fn ensure_table_visible(process_count: usize) -> Result<()> {
    if process_count == 0 {
        return Err(eyre!("process table unavailable: no processes visible"));
    }
    Ok(())
}

/// Rebuilds a NUL-terminated argument region from the list sysinfo exposes.
fn argument_region(process: &Process) -> Option<Vec<u8>> {
    let args = process.cmd();
    if args.is_empty() {
        return None;
    }
    let mut region = Vec::new();
    for arg in args {
        region.extend_from_slice(arg.to_string_lossy().as_bytes());
        region.push(0);
    }
    Some(region)
}

fn status_letter(status: ProcessStatus) -> Option<char> {
    match status {
        ProcessStatus::Run => Some('R'),
        ProcessStatus::Sleep => Some('S'),
        ProcessStatus::UninterruptibleDiskSleep => Some('D'),
        ProcessStatus::Zombie => Some('Z'),
        ProcessStatus::Stop => Some('T'),
        ProcessStatus::Tracing => Some('t'),
        ProcessStatus::Dead => Some('X'),
        ProcessStatus::Idle => Some('I'),
        ProcessStatus::Wakekill => Some('K'),
        ProcessStatus::Waking => Some('W'),
        ProcessStatus::Parked => Some('P'),
        ProcessStatus::LockBlocked => Some('L'),
        _ => None,
    }
}
