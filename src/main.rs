//! midibridge - serial MIDI <-> ALSA sequencer bridge
//!
//! # Configuration
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults (`/dev/serial0` at 31250 baud, client `midibridge`)
//! 2. TOML file given with `--config`
//! 3. Command line flags
//!
//! `RUST_LOG` overrides the log level chosen by `--debug`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use midibridge::{BridgeConfig, Result, SingleByteMode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Bridge a serial MIDI port to ALSA sequencer ports
#[derive(Parser, Debug)]
#[command(name = "midibridge")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device
    #[arg(long)]
    device: Option<PathBuf>,

    /// Serial baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// ALSA sequencer client name
    #[arg(long)]
    client_name: Option<String>,

    /// Let Program Change and Channel Pressure swallow one extra data byte
    #[arg(long)]
    absorb_pad_byte: bool,

    /// Enable debug logging (byte traces)
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn resolve(&self) -> Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::load(path)?,
            None => BridgeConfig::default(),
        };
        if let Some(device) = &self.device {
            config.device = device.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(name) = &self.client_name {
            config.client_name = name.clone();
        }
        if self.absorb_pad_byte {
            config.single_byte_mode = SingleByteMode::Absorb;
        }
        config.debug |= self.debug;
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(all(target_os = "linux", feature = "alsa-seq"))]
fn run(config: &BridgeConfig) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let bridge = midibridge::open_system(config)?;
    let trigger = bridge.shutdown_trigger();
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, trigger.flag())?;
    }

    info!("Bridging {} <-> {}", config.device.display(), config.client_name);
    bridge.run()?;
    info!("Bridge stopped");
    Ok(())
}

#[cfg(not(all(target_os = "linux", feature = "alsa-seq")))]
fn run(_config: &BridgeConfig) -> Result<()> {
    Err(midibridge::Error::Config(
        "built without ALSA sequencer support (feature `alsa-seq`, Linux only)".into(),
    ))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = args.resolve();

    init_tracing(args.debug || config.as_ref().is_ok_and(|c| c.debug));

    let result = config.and_then(|config| run(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("midibridge").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        assert_eq!(args(&[]).resolve().unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = args(&[
            "--device",
            "/dev/ttyAMA0",
            "--baud",
            "38400",
            "--client-name",
            "uart",
            "--absorb-pad-byte",
            "--debug",
        ])
        .resolve()
        .unwrap();
        assert_eq!(config.device, PathBuf::from("/dev/ttyAMA0"));
        assert_eq!(config.baud_rate, 38400);
        assert_eq!(config.client_name, "uart");
        assert_eq!(config.single_byte_mode, SingleByteMode::Absorb);
        assert!(config.debug);
    }

    #[test]
    fn test_zero_baud_rejected() {
        let err = args(&["--baud", "0"]).resolve().unwrap_err();
        assert!(matches!(err, midibridge::Error::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(args(&["--config", "/nonexistent/midibridge.toml"])
            .resolve()
            .is_err());
    }
}
