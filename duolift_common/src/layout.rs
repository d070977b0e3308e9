//! Shaft layout: rack zones, service rows, and physical projection.
//!
//! Logical rows are `u16` with `0` reserved as the unset sentinel.
//! The two rack zones sit on opposite lateral sides of one shaft and
//! are physically concatenated on a single vertical axis; collision
//! math therefore runs on projected physical coordinates, never on
//! raw logical row numbers.
//!
//! Service rows are out-of-rack docking points at the physical ends of
//! the shaft. They carry dedicated logical ids above `max_row` and are
//! exempt from the zone-to-fork-side mapping.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::state::ForkSide;

/// Geometry of the shared shaft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaftLayout {
    /// Highest rack row. Zone A is `1..zone_boundary`, zone B is
    /// `zone_boundary..=max_row`.
    pub max_row: u16,
    /// First row of zone B.
    pub zone_boundary: u16,
    /// Logical id of the bottom service row (physically below zone A).
    pub service_bottom_row: u16,
    /// Logical id of the top service row (physically above zone B).
    pub service_top_row: u16,
    /// Simulated overshoot rows when grabbing or placing a tray.
    pub pickup_offset: u16,
}

impl Default for ShaftLayout {
    fn default() -> Self {
        Self {
            max_row: 100,
            zone_boundary: 51,
            service_bottom_row: 101,
            service_top_row: 102,
            pickup_offset: 2,
        }
    }
}

impl ShaftLayout {
    /// Validate the geometry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the zone boundary does
    /// not split the rack, or the service row ids collide with rack
    /// rows or each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_row == 0 {
            return Err(ConfigError::ValidationError(
                "max_row must be at least 1".to_string(),
            ));
        }
        if self.zone_boundary < 2 || self.zone_boundary > self.max_row {
            return Err(ConfigError::ValidationError(format!(
                "zone_boundary {} must lie within 2..={}",
                self.zone_boundary, self.max_row
            )));
        }
        if self.service_bottom_row <= self.max_row || self.service_top_row <= self.max_row {
            return Err(ConfigError::ValidationError(
                "service row ids must be above max_row".to_string(),
            ));
        }
        if self.service_bottom_row == self.service_top_row {
            return Err(ConfigError::ValidationError(
                "service row ids must be distinct".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `row` is an in-rack row.
    #[inline]
    pub const fn is_rack_row(&self, row: u16) -> bool {
        row >= 1 && row <= self.max_row
    }

    /// Whether `row` is one of the two service rows.
    #[inline]
    pub const fn is_service_row(&self, row: u16) -> bool {
        row == self.service_bottom_row || row == self.service_top_row
    }

    /// Whether `row` is usable as a job target (rack or service row).
    #[inline]
    pub const fn is_valid_row(&self, row: u16) -> bool {
        self.is_rack_row(row) || self.is_service_row(row)
    }

    /// Fork side serving `row`.
    ///
    /// Rows below the zone boundary extend toward side A, rows at or
    /// above it toward side B. Service rows have no rack: `Middle`.
    #[inline]
    pub const fn fork_side_for_row(&self, row: u16) -> ForkSide {
        if self.is_service_row(row) {
            ForkSide::Middle
        } else if row < self.zone_boundary {
            ForkSide::SideA
        } else {
            ForkSide::SideB
        }
    }

    /// Project a logical row onto the single physical shaft axis.
    ///
    /// The bottom service row sits below row 1, the top service row
    /// above `max_row`; rack rows project to themselves.
    #[inline]
    pub const fn project_row(&self, row: u16) -> i32 {
        if row == self.service_bottom_row {
            0
        } else if row == self.service_top_row {
            self.max_row as i32 + 1
        } else {
            row as i32
        }
    }
}
