//! Forwarder configuration.
//!
//! All timeouts are wall-clock seconds; retransmits is a count. A config
//! file (TOML or JSON) may override any subset of the defaults.

use config::{Config, File};
use rust_icnfwd_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CS_TIMEOUT: u64 = 10;
const DEFAULT_PIT_TIMEOUT: u64 = 10;
const DEFAULT_PIT_RETRANSMITS: u32 = 3;
const DEFAULT_AGEING_INTERVAL: u64 = 4;

/// Tunables of the forwarding plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwarderConfig {
    /// Seconds a non-static Content Store entry stays fresh.
    #[serde(default = "default_cs_timeout")]
    pub cs_timeout: u64,

    /// Seconds before a PIT entry becomes eligible for eviction.
    #[serde(default = "default_pit_timeout")]
    pub pit_timeout: u64,

    /// Retransmit budget per PIT entry.
    #[serde(default = "default_pit_retransmits")]
    pub pit_retransmits: u32,

    /// Seconds between runs of the aging driver.
    #[serde(default = "default_ageing_interval")]
    pub ageing_interval: u64,

    /// Punt incoming Interests to the local application layer before
    /// consulting the FIB.
    #[serde(default)]
    pub interest_to_app: bool,
}

fn default_cs_timeout() -> u64 {
    DEFAULT_CS_TIMEOUT
}

fn default_pit_timeout() -> u64 {
    DEFAULT_PIT_TIMEOUT
}

fn default_pit_retransmits() -> u32 {
    DEFAULT_PIT_RETRANSMITS
}

fn default_ageing_interval() -> u64 {
    DEFAULT_AGEING_INTERVAL
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            cs_timeout: DEFAULT_CS_TIMEOUT,
            pit_timeout: DEFAULT_PIT_TIMEOUT,
            pit_retransmits: DEFAULT_PIT_RETRANSMITS,
            ageing_interval: DEFAULT_AGEING_INTERVAL,
            interest_to_app: false,
        }
    }
}

impl ForwarderConfig {
    /// Load configuration from a file, filling unset options with defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        cfg.try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn cs_timeout(&self) -> Duration {
        Duration::from_secs(self.cs_timeout)
    }

    pub fn pit_timeout(&self) -> Duration {
        Duration::from_secs(self.pit_timeout)
    }

    pub fn ageing_interval(&self) -> Duration {
        Duration::from_secs(self.ageing_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ForwarderConfig::default();
        assert_eq!(config.cs_timeout, 10);
        assert_eq!(config.pit_timeout, 10);
        assert_eq!(config.pit_retransmits, 3);
        assert_eq!(config.ageing_interval, 4);
        assert!(!config.interest_to_app);
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "pit_timeout = 2\ninterest_to_app = true").unwrap();

        let config = ForwarderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pit_timeout, 2);
        assert!(config.interest_to_app);
        // untouched options keep their defaults
        assert_eq!(config.cs_timeout, 10);
        assert_eq!(config.pit_retransmits, 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ForwarderConfig::from_file("/nonexistent/icnfwd.toml").is_err());
    }
}
