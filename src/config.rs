//! Bridge configuration.
//!
//! Built once at startup from defaults, an optional TOML file and command
//! line overrides, then split into the per-endpoint configs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use midibridge_core::SingleByteMode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_DEVICE: &str = "/dev/serial0";
pub const DEFAULT_BAUD: u32 = 31_250;
pub const DEFAULT_CLIENT_NAME: &str = "midibridge";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Serial device node.
    pub device: PathBuf,
    pub baud_rate: u32,
    /// Sequencer client name shown to other ALSA clients.
    pub client_name: String,
    pub out_port_name: String,
    pub in_port_name: String,
    pub single_byte_mode: SingleByteMode,
    /// Upper bound on how long either loop blocks before checking for
    /// shutdown.
    pub poll_interval_ms: u64,
    pub debug: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            baud_rate: DEFAULT_BAUD,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            out_port_name: "MIDI out".to_string(),
            in_port_name: "MIDI in".to_string(),
            single_byte_mode: SingleByteMode::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            debug: false,
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file. Keys it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(Error::Config("baud_rate must be non-zero".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be non-zero".into()));
        }
        if self.device.as_os_str().is_empty() {
            return Err(Error::Config("device must not be empty".into()));
        }
        for (key, value) in [
            ("client_name", &self.client_name),
            ("out_port_name", &self.out_port_name),
            ("in_port_name", &self.in_port_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[cfg(unix)]
    pub fn serial(&self) -> midibridge_io::SerialConfig {
        midibridge_io::SerialConfig {
            device: self.device.clone(),
            baud_rate: self.baud_rate,
            poll_interval: self.poll_interval(),
        }
    }

    #[cfg(all(target_os = "linux", feature = "alsa-seq"))]
    pub fn seq(&self) -> midibridge_io::SeqConfig {
        midibridge_io::SeqConfig {
            client_name: self.client_name.clone(),
            out_port_name: self.out_port_name.clone(),
            in_port_name: self.in_port_name.clone(),
            poll_interval: self.poll_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.device, PathBuf::from("/dev/serial0"));
        assert_eq!(config.baud_rate, 31_250);
        assert_eq!(config.single_byte_mode, SingleByteMode::Exact);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml_str(
            r#"
            device = "/dev/ttyAMA0"
            single_byte_mode = "absorb"
            "#,
        )
        .unwrap();
        assert_eq!(config.device, PathBuf::from("/dev/ttyAMA0"));
        assert_eq!(config.single_byte_mode, SingleByteMode::Absorb);
        assert_eq!(config.baud_rate, DEFAULT_BAUD);
        assert_eq!(config.client_name, DEFAULT_CLIENT_NAME);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            BridgeConfig::from_toml_str("").unwrap(),
            BridgeConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = BridgeConfig::from_toml_str("baud = 9600").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(BridgeConfig::from_toml_str(r#"single_byte_mode = "pad""#).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_baud() {
        let config = BridgeConfig {
            baud_rate: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_poll() {
        let config = BridgeConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_port_name() {
        let config = BridgeConfig {
            in_port_name: "  ".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("in_port_name"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BridgeConfig::load(Path::new("/nonexistent/midibridge.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_serial_config_carries_fields() {
        let config = BridgeConfig {
            baud_rate: 38_400,
            poll_interval_ms: 5,
            ..Default::default()
        };
        let serial = config.serial();
        assert_eq!(serial.device, config.device);
        assert_eq!(serial.baud_rate, 38_400);
        assert_eq!(serial.poll_interval, Duration::from_millis(5));
    }
}
