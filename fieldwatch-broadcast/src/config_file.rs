//! Flat key-value configuration file loader
//!
//! The daemon reads a `lightning.cfg`-style file: one `KEY value` pair
//! per line, whitespace separated, `#` starts a comment, lines too short
//! to carry a pair are skipped. Report and cleared intervals are given in
//! minutes. A missing file is not an error (the daemon starts with
//! defaults and says so), but a value that fails to parse, or a
//! configuration the core rejects, is.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use fieldwatch_core::constants::MS_PER_MINUTE;
use fieldwatch_core::{FieldError, MonitorConfig};

/// Default serial device path
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyS0";
/// Default multicast group address
pub const DEFAULT_MCAST_ADDR: Ipv4Addr = Ipv4Addr::new(224, 168, 2, 9);
/// Default multicast group port
pub const DEFAULT_MCAST_PORT: u16 = 7163;
/// Default local port the sender binds
pub const DEFAULT_SEND_PORT: u16 = 7164;

/// Errors from configuration loading
#[derive(Error, Debug)]
pub enum ConfigFileError {
    /// A key's value failed to parse
    #[error("unreadable value for {key}: '{value}'")]
    InvalidValue {
        /// Configuration key the value belonged to
        key: String,
        /// The offending text
        value: String,
    },

    /// The parsed configuration was rejected by the core
    #[error("configuration rejected: {0}")]
    Rejected(#[from] FieldError),

    /// I/O failure while reading an existing file
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Complete daemon configuration: transport settings plus the monitor
/// configuration handed to the core
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    /// Device path the field mill frames arrive on
    pub serial_port: String,
    /// Multicast group notifications are sent to
    pub mcast_addr: Ipv4Addr,
    /// Multicast group port
    pub mcast_port: u16,
    /// Local port the sending socket binds
    pub send_port: u16,
    /// Detection and debounce configuration
    pub monitor: MonitorConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            serial_port: DEFAULT_SERIAL_PORT.to_string(),
            mcast_addr: DEFAULT_MCAST_ADDR,
            mcast_port: DEFAULT_MCAST_PORT,
            send_port: DEFAULT_SEND_PORT,
            monitor: MonitorConfig::default(),
        }
    }
}

/// Load a configuration file, falling back to defaults if it is missing
pub fn load(path: &Path) -> Result<DaemonConfig, ConfigFileError> {
    let mut config = DaemonConfig::default();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::warn!(
                "could not read configuration file '{}': {}; using defaults",
                path.display(),
                err
            );
            return Ok(config);
        }
    };

    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim_end();
        if line.len() < 3 || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(char::is_whitespace) else {
            log::warn!("skipping configuration line without a value: '{line}'");
            continue;
        };
        let value = value.trim();

        match key {
            "SERIAL_PORT" => config.serial_port = value.to_string(),
            "MCAST_ADDR" => config.mcast_addr = parse(key, value)?,
            "MCAST_PORT" => config.mcast_port = parse(key, value)?,
            "SEND_PORT" => config.send_port = parse(key, value)?,

            "FIELD_AVERAGE" => config.monitor.field_average_secs = parse(key, value)?,
            "HIGH_FIELD" => config.monitor.high_field = parse(key, value)?,
            "VERY_HIGH_FIELD" => config.monitor.very_high_field = parse(key, value)?,
            "FIELD_REPORT_INTERVAL" => {
                config.monitor.field_timing.report_ms = minutes_to_ms(parse(key, value)?)
            }
            "FIELD_CLEARED_INTERVAL" => {
                config.monitor.field_timing.cleared_ms = minutes_to_ms(parse(key, value)?)
            }

            "LIGHTNING_MIN_FIELD_CHANGE" => {
                config.monitor.lightning_min_field_change = parse(key, value)?
            }
            "LIGHTNING_REPORT_INTERVAL" => {
                config.monitor.lightning_timing.report_ms = minutes_to_ms(parse(key, value)?)
            }
            "LIGHTNING_CLEARED_INTERVAL" => {
                config.monitor.lightning_timing.cleared_ms = minutes_to_ms(parse(key, value)?)
            }
            "LIGHTNING_REQUIRES_HIGH_FIELD" => {
                config.monitor.lightning_requires_high_field = parse_flag(key, value)?
            }

            _ => log::debug!("ignoring unknown configuration key '{key}'"),
        }
    }

    config.monitor.validate()?;
    Ok(config)
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigFileError> {
    value.parse().map_err(|_| ConfigFileError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigFileError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn minutes_to_ms(minutes: f32) -> u64 {
    (minutes * MS_PER_MINUTE as f32) as u64
}
