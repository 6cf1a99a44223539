use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::{Report, eyre};
use serde::{Serialize, Serializer};
use sysinfo::System;

/// Host memory totals in KiB, captured once per report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemMemory {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl SystemMemory {
    pub fn new(total_kb: u64, free_kb: u64) -> Self {
        Self {
            total_kb,
            free_kb: free_kb.min(total_kb),
        }
    }

    /// Reads total and free memory from an already refreshed `System`.
    /// A host that reports nothing yields zeroed totals.
    pub fn from_system(sys: &System) -> Self {
        Self::new(sys.total_memory() / 1024, sys.free_memory() / 1024)
    }

    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.free_kb)
    }
}

/// `part_kb` as a percentage of `total_kb`; zero when the total is unknown.
pub fn percent_of(part_kb: u64, total_kb: u64) -> f64 {
    if total_kb == 0 {
        return 0.0;
    }
    part_kb as f64 * 100.0 / total_kb as f64
}

/// Fixed-point percentage with two decimal digits, truncated toward zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemPercent {
    hundredths: u64,
}

impl MemPercent {
    pub const ZERO: MemPercent = MemPercent { hundredths: 0 };

    pub fn of(part_kb: u64, total_kb: u64) -> Self {
        if total_kb == 0 {
            return Self::ZERO;
        }
        let scaled = u128::from(part_kb) * 10_000 / u128::from(total_kb);
        Self {
            hundredths: u64::try_from(scaled).unwrap_or(u64::MAX),
        }
    }

    pub fn from_hundredths(hundredths: u64) -> Self {
        Self { hundredths }
    }

    pub fn hundredths(self) -> u64 {
        self.hundredths
    }

    pub fn as_f64(self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

impl fmt::Display for MemPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl FromStr for MemPercent {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(eyre!("invalid percentage `{s}`"));
        }
        if frac_part.len() > 2 || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(eyre!("invalid percentage `{s}`: expected at most two decimals"));
        }
        let whole: u64 = int_part
            .parse()
            .map_err(|e| eyre!("invalid percentage `{s}`: {e}"))?;
        let mut frac: u64 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|e| eyre!("invalid percentage `{s}`: {e}"))?
        };
        if frac_part.len() == 1 {
            frac *= 10;
        }
        whole
            .checked_mul(100)
            .and_then(|h| h.checked_add(frac))
            .map(Self::from_hundredths)
            .ok_or_else(|| eyre!("percentage `{s}` out of range"))
    }
}

impl Serialize for MemPercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
