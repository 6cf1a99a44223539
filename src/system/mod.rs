pub mod collector;
pub mod inspector;
pub mod memory;
pub mod platform;
pub mod sample;

pub use collector::{Collector, ProcessSource};
pub use memory::{MemPercent, SystemMemory, percent_of};
pub use sample::ProcessSample;
