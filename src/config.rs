use std::net::SocketAddr;
use std::path::Path;

use config_file::FromConfigFile;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TurntableConfig {
    /// Where control surface input arrives
    pub listen_addr: SocketAddr,
    /// Where surface feedback is sent
    pub feedback_addr: SocketAddr,
    pub sample_rate: u32,
    /// Sequencer period at speed 1.0
    pub base_interval_ms: f64,
    /// Speed multipliers offered by the speed buttons, 0.0 stops the record
    pub speeds: Vec<f32>,
    /// Raw volume dial position, 0 to 100
    pub initial_volume: f32,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        TurntableConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            feedback_addr: SocketAddr::from(([127, 0, 0, 1], 9000)),
            sample_rate: 44100,
            base_interval_ms: 330.0,
            speeds: vec![0.0, 1.0, 2.0],
            initial_volume: 65.0,
        }
    }
}

impl TurntableConfig {
    pub fn load(path: &Path) -> Result<TurntableConfig> {
        let config = TurntableConfig::from_config_file(path)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.sample_rate > i32::MAX as u32 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate out of range: {}",
                self.sample_rate
            )));
        }

        if !self.base_interval_ms.is_finite() || self.base_interval_ms <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "base_interval_ms must be positive, got {}",
                self.base_interval_ms
            )));
        }

        if let Some(speed) = self.speeds.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(Error::InvalidConfig(format!("invalid speed: {speed}")));
        }

        if !self.speeds.contains(&0.0) {
            return Err(Error::InvalidConfig(
                "speeds must include 0.0 to stop the record".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.initial_volume) {
            return Err(Error::InvalidConfig(format!(
                "initial_volume must be within 0..=100, got {}",
                self.initial_volume
            )));
        }

        Ok(())
    }
}
