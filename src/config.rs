//! # JSON Configuration
//!
//! Application and simulator settings stored as a JSON file next to the
//! binary. Every field has a default, so a partial file (or no file at all)
//! is valid.
//!
//! ```json
//! {
//!   "file_name": "circuit.png",
//!   "simulations_per_frame": 5,
//!   "simulator": {
//!     "conductivity_threshold": 57087,
//!     "rise_rate": 0.5,
//!     "fall_rate": 0.5,
//!     "seed": null,
//!     "carry_over": "conductive"
//!   },
//!   "console": { "refresh_rate_ms": 50, "show_stats": true, "start_running": true },
//!   "gui": { "window_size": [1024.0, 768.0], "overlay_mix": 0.7, "start_running": true }
//! }
//! ```
//!
//! The older key names `FileName` and `SimulationsPerFrame` are accepted
//! as aliases.

use std::io::ErrorKind;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::console::ConsoleConfig;
use crate::error::{Result, SimError};
use crate::gate::SwitchingRates;
use crate::gui::GuiConfig;
use crate::netlist::CarryOver;
use crate::pixel::Threshold;

/// Settings consumed by [`crate::simulator::Simulator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub conductivity_threshold: Threshold,
    pub rise_rate: f32,
    pub fall_rate: f32,
    /// Fixed seed for the evaluation order and charge draws. `None` seeds
    /// from the OS.
    pub seed: Option<u64>,
    pub carry_over: CarryOver,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let rates = SwitchingRates::default();
        Self {
            conductivity_threshold: Threshold::default(),
            rise_rate: rates.rise,
            fall_rate: rates.fall,
            seed: None,
            carry_over: CarryOver::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn rates(&self) -> SwitchingRates {
        SwitchingRates {
            rise: self.rise_rate,
            fall: self.fall_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("rise_rate", self.rise_rate), ("fall_rate", self.fall_rate)] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}

/// Top-level configuration for the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Image to load on startup.
    #[serde(alias = "FileName")]
    pub file_name: String,
    /// Ticks run per displayed frame.
    #[serde(alias = "SimulationsPerFrame")]
    pub simulations_per_frame: u32,
    pub simulator: SimulatorConfig,
    pub console: ConsoleConfig,
    pub gui: GuiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            simulations_per_frame: 5,
            simulator: SimulatorConfig::default(),
            console: ConsoleConfig::default(),
            gui: GuiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a configuration file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no config at '{}', using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SimError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: AppConfig = serde_json::from_str(&content).map_err(|source| SimError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SimError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations_per_frame == 0 {
            return Err(SimError::InvalidConfig(
                "simulations_per_frame must be at least 1".to_string(),
            ));
        }
        self.simulator.validate()
    }
}
