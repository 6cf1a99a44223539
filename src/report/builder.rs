use std::time::{Duration, Instant};

use color_eyre::eyre::Result;

use crate::classifier::{ContainerClassifier, container_id_from_cmdline};
use crate::system::inspector::{
    DEFAULT_CMDLINE_MAX_BYTES, bounded_name, command_line_of, memory_of,
};
use crate::system::{Collector, MemPercent, ProcessSample, ProcessSource, SystemMemory};

use super::record::{PercentBasis, ProcessRecord, Report, ReportKind};

#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub cmdline_max_bytes: usize,
    /// Upper bound on time spent enumerating processes.
    pub deadline: Duration,
    pub system_basis: PercentBasis,
    pub container_basis: PercentBasis,
    pub read_control_groups: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            cmdline_max_bytes: DEFAULT_CMDLINE_MAX_BYTES,
            deadline: Duration::from_secs(2),
            system_basis: PercentBasis::Rss,
            container_basis: PercentBasis::Vsz,
            read_control_groups: true,
        }
    }
}

impl ReportOptions {
    pub fn basis_for(&self, kind: ReportKind) -> PercentBasis {
        match kind {
            ReportKind::System => self.system_basis,
            ReportKind::Containers => self.container_basis,
        }
    }
}

/// Assembles system and container reports. Holds no per-report state, so one
/// builder can serve any number of concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    options: ReportOptions,
    classifier: ContainerClassifier,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions, classifier: ContainerClassifier) -> Self {
        ReportBuilder {
            options,
            classifier,
        }
    }

    /// Scans the live host with a collector of its own.
    pub fn generate_live(&self, kind: ReportKind) -> Result<Report> {
        let mut collector = Collector::new(
            self.options.cmdline_max_bytes,
            self.options.read_control_groups,
        );
        self.generate(&mut collector, kind)
    }

    /// Fails only when the process table cannot be enumerated at all;
    /// unreadable processes degrade to empty or zero fields.
    pub fn generate(&self, source: &mut dyn ProcessSource, kind: ReportKind) -> Result<Report> {
        let _generate_span = tracing::debug_span!("report.generate", kind = kind.label()).entered();

        let started = Instant::now();
        let deadline = started + self.options.deadline;

        let memory = source.memory();
        let mut report = Report::empty(kind, memory);
        let mut scanned = 0usize;

        let samples = source.samples()?;
        if Instant::now() >= deadline {
            // The table refresh itself cannot be interrupted; nothing is
            // inspected once it has used up the budget.
            report.partial = true;
            tracing::warn!(
                kind = kind.label(),
                deadline_ms = self.options.deadline.as_millis() as u64,
                "process table refresh exceeded report deadline"
            );
            return Ok(report);
        }

        for sample in samples {
            if Instant::now() >= deadline {
                report.partial = true;
                tracing::warn!(
                    kind = kind.label(),
                    scanned,
                    deadline_ms = self.options.deadline.as_millis() as u64,
                    "report deadline reached, returning partial process list"
                );
                break;
            }
            scanned += 1;
            if let Some(record) = self.record_for(&sample, kind, &memory) {
                report.records.push(record);
            }
        }

        tracing::debug!(
            kind = kind.label(),
            scanned,
            records = report.records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report generated"
        );
        Ok(report)
    }

    fn record_for(
        &self,
        sample: &ProcessSample,
        kind: ReportKind,
        memory: &SystemMemory,
    ) -> Option<ProcessRecord> {
        let cmdline = command_line_of(sample.command.as_deref(), self.options.cmdline_max_bytes);

        if kind == ReportKind::Containers {
            let signal = self
                .classifier
                .matched_signal(&cmdline, sample.control_group.as_deref())?;
            tracing::trace!(pid = sample.pid, ?signal, "container process");
        }

        let mem = memory_of(sample);
        let basis = self.options.basis_for(kind).pick(mem.vsz_kb, mem.rss_kb);

        let (state, container_id) = match kind {
            ReportKind::System => (sample.state, None),
            ReportKind::Containers => (None, container_id_from_cmdline(&cmdline).map(str::to_owned)),
        };

        Some(ProcessRecord {
            pid: sample.pid,
            name: bounded_name(&sample.name),
            cmdline,
            vsz_kb: mem.vsz_kb,
            rss_kb: mem.rss_kb,
            mem_pct: MemPercent::of(basis, memory.total_kb),
            state,
            container_id,
        })
    }
}
