//! Best-effort JSON snapshots of host memory and process telemetry.
//!
//! A report is built fresh on every call: host memory totals are captured
//! once, then every visible process is inspected in pid order. The system
//! report lists all of them; the container report keeps only processes the
//! [`classifier::ContainerClassifier`] flags.

pub mod classifier;
pub mod config;
pub mod format;
pub mod logging;
pub mod report;
pub mod system;
pub mod watch;
