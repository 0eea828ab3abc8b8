//! This crate connects the pingback stack to libpcap: frames are read from a savefile or a live
//! device, and replies are written to a savefile or injected on a live device.
#![deny(missing_docs)]

mod error;
mod sink;
mod source;

pub use error::Error;
pub use sink::{PcapDumpSink, PcapInjectSink};
pub use source::PcapSource;

/// Largest frame captured from a live device.
pub const SNAPLEN: i32 = 65535;

/// Read timeout for live captures, in milliseconds. Expired reads are retried.
pub const READ_TIMEOUT_MS: i32 = 1000;
