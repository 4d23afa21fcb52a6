//! Live spectrum monitor: default input through the engine to the default
//! output, printing the loudest bin of each track.

use clap::Parser;
use std::time::{Duration, Instant};
use tele_spectrum::audio::input::list_input_devices;
use tele_spectrum::audio::output::list_output_devices;
use tele_spectrum::audio::LiveHost;
use tele_spectrum::config::{bin_to_hz, CONSUMER_REFRESH_HZ};
use tele_spectrum::spectrum::SpectrogramHistory;
use tele_spectrum::EngineConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "tele-spectrum")]
#[command(about = "Real-time spectrum monitor with a 440 Hz test tone", long_about = None)]
struct Args {
    /// Test tone level (0..1)
    #[arg(long, value_name = "LEVEL", default_value = "0.0")]
    sine_level: f32,

    /// Display sensitivity (0..1)
    #[arg(long, value_name = "LEVEL", default_value = "1.0")]
    sensitivity: f32,

    /// Stop after this many seconds (runs until interrupted otherwise)
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    seconds: Option<Duration>,

    /// List audio devices and exit
    #[arg(long)]
    list_devices: bool,
}

/// Non-negative, finite run time in seconds
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f32 = value
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    Duration::try_from_secs_f32(seconds).map_err(|e| format!("invalid duration '{}': {}", value, e))
}

fn peak(spectrum: &[f32]) -> Option<(usize, f32)> {
    spectrum
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
}

fn print_devices() {
    match list_input_devices() {
        Ok(devices) => {
            for d in devices {
                println!("in : {} ({} Hz, {} ch)", d.name, d.sample_rate, d.channels);
            }
        }
        Err(e) => eprintln!("Failed to list input devices: {}", e),
    }
    match list_output_devices() {
        Ok(devices) => {
            for d in devices {
                println!("out: {} ({} Hz, {} ch)", d.name, d.sample_rate, d.channels);
            }
        }
        Err(e) => eprintln!("Failed to list output devices: {}", e),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.list_devices {
        print_devices();
        return;
    }

    let host = match LiveHost::start(EngineConfig {
        sensitivity: args.sensitivity,
        sine_level: args.sine_level,
        ..EngineConfig::default()
    }) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Failed to start audio: {}", e);
            std::process::exit(1);
        }
    };

    let handle = host.handle().clone();
    let sample_rate = host.output_info().sample_rate as f64;
    let mut history = SpectrogramHistory::default();

    let period = Duration::from_secs_f64(1.0 / CONSUMER_REFRESH_HZ as f64);
    // Too far out to represent means no deadline at all
    let deadline = args.seconds.and_then(|d| Instant::now().checked_add(d));
    let mut last_report = Instant::now();

    loop {
        std::thread::sleep(period);

        history.poll(
            handle.primary_store(),
            handle.tone_store(),
            handle.params().sensitivity(),
        );

        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();

            let primary = handle.fetch_primary_spectrum();
            let tone = handle.fetch_tone_spectrum();
            match (peak(&primary), peak(&tone)) {
                (Some((pb, pm)), Some((tb, tm))) => println!(
                    "input peak {:7.1} Hz ({:.3})  tone peak {:7.1} Hz ({:.3})  history {}",
                    bin_to_hz(pb, sample_rate),
                    pm,
                    bin_to_hz(tb, sample_rate),
                    tm,
                    history.len()
                ),
                _ => println!("warming up..."),
            }
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }

    host.stop();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("2.5"), Ok(Duration::from_millis(2500)));
        assert_eq!(parse_seconds("0"), Ok(Duration::ZERO));
        assert!(parse_seconds("inf").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn test_seconds_argument_rejected_by_cli() {
        assert!(Args::try_parse_from(["tele-spectrum", "--seconds", "inf"]).is_err());

        let args = Args::try_parse_from(["tele-spectrum", "--seconds", "3"]).unwrap();
        assert_eq!(args.seconds, Some(Duration::from_secs(3)));
    }
}
