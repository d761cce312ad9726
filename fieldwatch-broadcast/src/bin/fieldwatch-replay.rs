//! Replay a recorded electric field file
//!
//! Drives the monitor with the timestamps and values from a recording
//! made with `fieldwatchd -r`, printing and broadcasting the same
//! messages the live daemon would have produced. Useful for tuning
//! thresholds and intervals against a storm that already happened.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use fieldwatch_broadcast::{config_file, record, report, DataServer, ReplayReader};
use fieldwatch_core::FieldMonitor;

const USAGE: &str = "\
fieldwatch-replay - read data from a pre-recorded electric field file and
broadcast field change and lightning events via UDP multicast

Usage: fieldwatch-replay [OPTIONS] FILE

Options:
  -h, --help              Display this help information
  -c, --config-file PATH  Path to configuration file (default: lightning.cfg)
";

struct Options {
    filename: PathBuf,
    config_file: PathBuf,
}

fn parse_args() -> Result<Options, String> {
    let mut filename = None;
    let mut config_file = PathBuf::from("lightning.cfg");

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                process::exit(0);
            }
            "-c" | "--config-file" => {
                config_file = args
                    .next()
                    .ok_or_else(|| format!("option '{arg}' needs a value"))?
                    .into();
            }
            other if !other.starts_with('-') => filename = Some(PathBuf::from(other)),
            other => return Err(format!("unrecognized option '{other}'")),
        }
    }

    let filename = filename.ok_or("no field file to replay")?;
    Ok(Options {
        filename,
        config_file,
    })
}

fn main() {
    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("fieldwatch-replay: {err}\n\n{USAGE}");
            process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("fieldwatch-replay: {err}");
        process::exit(1);
    }
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let config = config_file::load(&options.config_file)?;

    let mut server = DataServer::new(config.mcast_addr, config.mcast_port, config.send_port);
    server.start()?;

    let mut monitor = FieldMonitor::new(&config.monitor)?;

    println!("Replaying file '{}'", options.filename.display());
    let file = File::open(&options.filename)?;

    for entry in ReplayReader::new(BufReader::new(file)) {
        let (when, field) = entry?;
        let cycle = monitor.process(record::timestamp_ms(&when), field)?;

        if let Some(summary) = &cycle.summary {
            let (field_line, delta_line) = report::summary_lines(when, summary);
            server.send(&field_line);
            server.send(&delta_line);
        }

        for notification in &cycle.notifications {
            let line = report::notification_line(when, notification);
            println!("{line}");
            server.send(&line);
        }
    }

    server.stop();
    Ok(())
}
