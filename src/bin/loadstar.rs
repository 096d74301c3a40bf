//! Loadstar sensor CLI
//!
//! Picks a serial port, identifies the sensor on it and prints streamed
//! readings for a fixed duration.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! cargo run --features cli -- --list-ports
//!
//! # Prompt for a port, stream for 10 seconds at 9600 baud
//! cargo run --features cli
//!
//! # Specific port, baud rate and duration
//! cargo run --features cli -- --port /dev/ttyUSB0 --baud 9600 --seconds 30
//! ```

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use clap::Parser;
use log::warn;

use loadstar::channel::native::available_port_names;
use loadstar::common::timing;
use loadstar::{LoadstarSensor, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "loadstar", about = "Stream readings from a Loadstar sensor")]
struct Args {
    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Serial port to open (prompted for if omitted)
    #[arg(long)]
    port: Option<String>,

    /// Baud rate
    #[arg(long, default_value_t = timing::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// How long to stream, in seconds
    #[arg(long, default_value_t = 10)]
    seconds: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let ports = available_port_names()?;
    if args.list_ports {
        for port in &ports {
            println!("{}", port);
        }
        return Ok(());
    }

    if ports.is_empty() {
        eprintln!("No available serial ports are on your machine");
        return Ok(());
    }

    let port = match args.port {
        Some(port) => port,
        None => prompt_for_port(&ports)?,
    };
    if !ports.contains(&port) {
        return Err(format!("Please choose a valid serial port (got {:?})", port).into());
    }

    let config = SessionConfig::new(port).with_baud_rate(args.baud);
    let mut sensor = LoadstarSensor::open(config)?;
    println!("{}", sensor);

    sensor.start_reading()?;
    let poll = sensor.timings().frame_poll_interval;
    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    while Instant::now() < deadline {
        match sensor.poll_reading() {
            Ok(reading) => println!("{}", reading),
            Err(nb::Error::WouldBlock) => std::thread::sleep(poll),
            // Already logged by the driver; keep going with the next frame.
            Err(nb::Error::Other(e)) if e.is_frame_error() => {}
            Err(nb::Error::Other(e)) => {
                warn!("read failed: {}", e);
                break;
            }
        }
    }
    sensor.stop_reading()?;

    Ok(())
}

fn prompt_for_port(ports: &[String]) -> io::Result<String> {
    println!("Available Ports : {:?}", ports);
    println!("Choose a port:");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
