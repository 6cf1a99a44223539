use color_eyre::eyre::Result;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::system::{MemPercent, SystemMemory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Every visible process.
    System,
    /// Only processes the classifier flags as containers.
    Containers,
}

impl ReportKind {
    pub fn records_key(self) -> &'static str {
        match self {
            ReportKind::System => "processes",
            ReportKind::Containers => "containers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::System => "system",
            ReportKind::Containers => "containers",
        }
    }
}

/// Which per-process figure `mem_pct` is computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PercentBasis {
    Rss,
    Vsz,
}

impl PercentBasis {
    pub fn from_str_config(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rss" => Some(PercentBasis::Rss),
            "vsz" => Some(PercentBasis::Vsz),
            _ => None,
        }
    }

    pub fn pick(self, vsz_kb: u64, rss_kb: u64) -> u64 {
        match self {
            PercentBasis::Rss => rss_kb,
            PercentBasis::Vsz => vsz_kb,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cmdline: String,
    pub vsz_kb: u64,
    pub rss_kb: u64,
    pub mem_pct: MemPercent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<char>,
    /// Only set on container records whose command line names a shim id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub memory: SystemMemory,
    pub records: Vec<ProcessRecord>,
    /// Enumeration stopped at the deadline; `records` is incomplete.
    pub partial: bool,
}

impl Report {
    pub fn empty(kind: ReportKind, memory: SystemMemory) -> Self {
        Report {
            kind,
            memory,
            records: Vec::new(),
            partial: false,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Report", 4)?;
        s.serialize_field("mem_total_kb", &self.memory.total_kb)?;
        s.serialize_field("mem_free_kb", &self.memory.free_kb)?;
        s.serialize_field("mem_used_kb", &self.memory.used_kb())?;
        s.serialize_field(self.kind.records_key(), &self.records)?;
        s.end()
    }
}
