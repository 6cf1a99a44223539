pub mod builder;
pub mod record;

pub use builder::{ReportBuilder, ReportOptions};
pub use record::{PercentBasis, ProcessRecord, Report, ReportKind};
