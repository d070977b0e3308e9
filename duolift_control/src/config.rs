//! TOML configuration loading and validation for the simulator.
//!
//! A single `duolift.toml` describes the shaft geometry, the timing
//! model, and the two lifts. `SimConfig::default()` gives a runnable
//! configuration so the binary works without a file.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "duolift-sim-01"
//!
//! [layout]
//! max_row = 100
//! zone_boundary = 51
//! service_bottom_row = 101
//! service_top_row = 102
//! pickup_offset = 2
//!
//! [timing]
//! cycle_interval_ms = 150
//! drive_ms_per_row = 40
//! drive_min_ms = 120
//! fork_travel_ms = 300
//! tray_transfer_ms = 200
//!
//! [[lift]]
//! name = "lift-a"
//! initial_row = 2
//!
//! [[lift]]
//! name = "lift-b"
//! initial_row = 99
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use duolift::config::{ConfigError, ConfigLoader, SharedConfig};
use duolift::layout::ShaftLayout;

// ─── Timing Model ───────────────────────────────────────────────────

/// Durations of the simulated mechanics and the tick cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Tick cadence [ms].
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,
    /// Drive travel time per row of distance [ms].
    #[serde(default = "default_drive_ms_per_row")]
    pub drive_ms_per_row: u64,
    /// Floor for drive travel time [ms].
    #[serde(default = "default_drive_min_ms")]
    pub drive_min_ms: u64,
    /// Fork extension/retraction time, independent of distance [ms].
    #[serde(default = "default_fork_travel_ms")]
    pub fork_travel_ms: u64,
    /// Grip/release lag between fork arrival and tray change [ms].
    #[serde(default = "default_tray_transfer_ms")]
    pub tray_transfer_ms: u64,
}

fn default_cycle_interval_ms() -> u64 {
    150
}
fn default_drive_ms_per_row() -> u64 {
    40
}
fn default_drive_min_ms() -> u64 {
    120
}
fn default_fork_travel_ms() -> u64 {
    300
}
fn default_tray_transfer_ms() -> u64 {
    200
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: default_cycle_interval_ms(),
            drive_ms_per_row: default_drive_ms_per_row(),
            drive_min_ms: default_drive_min_ms(),
            fork_travel_ms: default_fork_travel_ms(),
            tray_transfer_ms: default_tray_transfer_ms(),
        }
    }
}

impl TimingConfig {
    /// Tick cadence as a `Duration`.
    #[inline]
    pub const fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    /// Drive travel time for a physical distance in rows.
    #[inline]
    pub fn drive_duration(&self, rows: u32) -> Duration {
        let ms = (rows as u64 * self.drive_ms_per_row).max(self.drive_min_ms);
        Duration::from_millis(ms)
    }

    /// Fork travel time.
    #[inline]
    pub const fn fork_duration(&self) -> Duration {
        Duration::from_millis(self.fork_travel_ms)
    }

    /// Tray grip/release lag.
    #[inline]
    pub const fn tray_duration(&self) -> Duration {
        Duration::from_millis(self.tray_transfer_ms)
    }
}

// ─── Lift Entries ───────────────────────────────────────────────────

/// Static description of one lift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiftConfig {
    /// Display name, used in log fields.
    pub name: String,
    /// Row the lift occupies at process start.
    pub initial_row: u16,
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete validated simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Base application configuration.
    #[serde(default)]
    pub shared: SharedConfig,
    /// Shaft geometry.
    #[serde(default)]
    pub layout: ShaftLayout,
    /// Timing model.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Exactly two lifts, listed bottom lift first.
    #[serde(rename = "lift")]
    pub lifts: Vec<LiftConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::default(),
            layout: ShaftLayout::default(),
            timing: TimingConfig::default(),
            lifts: vec![
                LiftConfig {
                    name: "lift-a".to_string(),
                    initial_row: 2,
                },
                LiftConfig {
                    name: "lift-b".to_string(),
                    initial_row: 99,
                },
            ],
        }
    }
}

impl SimConfig {
    /// Validate the configuration as a whole.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` on the first violated
    /// rule: shared fields, layout geometry, timing bounds, lift count
    /// and initial placement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.layout.validate()?;

        if !(50..=1000).contains(&self.timing.cycle_interval_ms) {
            return Err(ConfigError::ValidationError(format!(
                "cycle_interval_ms {} outside 50..=1000",
                self.timing.cycle_interval_ms
            )));
        }
        if self.timing.drive_ms_per_row == 0 || self.timing.drive_min_ms == 0 {
            return Err(ConfigError::ValidationError(
                "drive timing values must be nonzero".to_string(),
            ));
        }
        if self.timing.fork_travel_ms == 0 || self.timing.tray_transfer_ms == 0 {
            return Err(ConfigError::ValidationError(
                "fork and tray timing values must be nonzero".to_string(),
            ));
        }

        if self.lifts.len() != 2 {
            return Err(ConfigError::ValidationError(format!(
                "exactly two lifts required, found {}",
                self.lifts.len()
            )));
        }
        for lift in &self.lifts {
            if lift.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "lift name cannot be empty".to_string(),
                ));
            }
            if !self.layout.is_valid_row(lift.initial_row) {
                return Err(ConfigError::ValidationError(format!(
                    "lift '{}' initial_row {} is not a usable row",
                    lift.name, lift.initial_row
                )));
            }
        }
        if self.lifts[0].initial_row == self.lifts[1].initial_row {
            return Err(ConfigError::ValidationError(
                "lifts cannot start on the same row".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load and validate the simulator configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let config = SimConfig::load(path)?;
    config.validate()?;
    Ok(config)
}
