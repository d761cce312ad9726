//! Field mill monitoring daemon
//!
//! Reads EFM-100 frames from the configured device path, feeds each
//! reading through the monitor, and broadcasts field summaries and
//! debounced warnings over UDP multicast. Optionally records the raw
//! field data and appends notifications to a log file.

use std::env;
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

use chrono::DateTime;

use fieldwatch_broadcast::{config_file, report, DataServer, FieldRecorder, FrameReader};
use fieldwatch_core::time::SystemTime;
use fieldwatch_core::{FieldMonitor, RotorStatus};

const USAGE: &str = "\
fieldwatchd - read data from an atmospheric electric field mill and
broadcast field change and lightning events via UDP multicast

Usage: fieldwatchd [OPTIONS]

Options:
  -h, --help              Display this help information
  -c, --config-file PATH  Path to configuration file (default: lightning.cfg)
  -p, --pid-file PATH     File to write the current PID to
  -l, --log-file PATH     File to log warnings/lightning detections to
  -r, --record-to PATH    Record the raw electric field data to a file
";

struct Options {
    config_file: PathBuf,
    pid_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    record_file: Option<PathBuf>,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        config_file: PathBuf::from("lightning.cfg"),
        pid_file: None,
        log_file: None,
        record_file: None,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                process::exit(0);
            }
            "-c" | "--config-file" => options.config_file = value(&mut args, &arg)?.into(),
            "-p" | "--pid-file" => options.pid_file = Some(value(&mut args, &arg)?.into()),
            "-l" | "--log-file" => options.log_file = Some(value(&mut args, &arg)?.into()),
            "-r" | "--record-to" => options.record_file = Some(value(&mut args, &arg)?.into()),
            other => return Err(format!("unrecognized option '{other}'")),
        }
    }

    Ok(options)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("option '{flag}' needs a value"))
}

fn main() {
    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("fieldwatchd: {err}\n\n{USAGE}");
            process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("fieldwatchd: {err}");
        process::exit(1);
    }
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let config = config_file::load(&options.config_file)?;

    if let Some(pid_file) = &options.pid_file {
        fs::write(pid_file, format!("{}\n", process::id()))?;
    }

    // The device node is expected to be configured (9600 8N1) already;
    // from here it is just a byte stream
    let device = File::open(&config.serial_port)?;
    let mut frames = FrameReader::new(BufReader::new(device), SystemTime);

    let mut server = DataServer::new(config.mcast_addr, config.mcast_port, config.send_port);
    server.start()?;

    let mut monitor = FieldMonitor::new(&config.monitor)?;

    let mut recorder = match &options.record_file {
        Some(path) => Some(FieldRecorder::new(append_file(path)?)),
        None => None,
    };
    let mut log_file = match &options.log_file {
        Some(path) => Some(append_file(path)?),
        None => None,
    };

    while let Some((t_ms, frame)) = frames.next_frame()? {
        let when = DateTime::from_timestamp_millis(t_ms as i64).unwrap_or_default();

        if frame.status == RotorStatus::Fault {
            log::warn!("rotor fault reported by the mill");
        }

        if let Some(recorder) = &mut recorder {
            recorder.record(when, frame.field)?;
        }

        let cycle = monitor.process(t_ms, frame.field)?;

        if let Some(summary) = &cycle.summary {
            let (field_line, delta_line) = report::summary_lines(when, summary);
            server.send(&field_line);
            server.send(&delta_line);
        }

        for notification in &cycle.notifications {
            let line = report::notification_line(when, notification);
            println!("{line}");
            server.send(&line);

            if let Some(log_file) = &mut log_file {
                writeln!(log_file, "{line}")?;
                log_file.flush()?;
            }
        }
    }

    server.stop();
    Ok(())
}

fn append_file(path: &Path) -> Result<File, std::io::Error> {
    OpenOptions::new().create(true).append(true).open(path)
}
