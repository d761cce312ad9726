//! I/O adapters for fieldwatch
//!
//! Everything the core deliberately does not do: reading the flat
//! key-value configuration file, pulling frames off the mill's byte
//! stream, recording and replaying field data, formatting outbound
//! messages, and broadcasting them over UDP multicast. Each module is a
//! thin collaborator around `fieldwatch-core`; none of the detection or
//! debounce logic lives here.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config_file;
pub mod ingest;
pub mod record;
pub mod report;
pub mod sender;

pub use config_file::{ConfigFileError, DaemonConfig};
pub use ingest::FrameReader;
pub use record::{FieldRecorder, ReplayError, ReplayReader};
pub use sender::DataServer;

/// Timestamp format used in recorded data and broadcast messages
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
