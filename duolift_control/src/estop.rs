//! Global emergency-stop latch.
//!
//! The emergency stop overrides everything: while held, both lifts are
//! forced into `EmergencyHeld` and no job processing happens. Recovery
//! needs two things, in order: the physical stop condition released,
//! and an explicit reset request. A reset arriving while the stop is
//! still asserted is refused (and consumed); release alone never
//! un-holds the lifts.

use tracing::{info, warn};

/// Latching emergency-stop controller, one per process.
#[derive(Debug, Default)]
pub struct EstopController {
    /// The stop condition as read this tick.
    asserted: bool,
    /// Latched hold; survives release until a valid reset.
    latched: bool,
}

impl EstopController {
    pub const fn new() -> Self {
        Self {
            asserted: false,
            latched: false,
        }
    }

    /// Update the stop condition from this tick's input.
    pub fn set_asserted(&mut self, asserted: bool) {
        if asserted && !self.latched {
            warn!("emergency stop asserted");
            self.latched = true;
        }
        if !asserted && self.asserted {
            info!("emergency stop released; reset required before resuming");
        }
        self.asserted = asserted;
    }

    /// Process a reset request.
    ///
    /// Refused while the stop condition is still asserted. Returns
    /// whether the latch was cleared.
    pub fn request_reset(&mut self) -> bool {
        if self.asserted {
            warn!("emergency stop reset refused: stop still asserted");
            return false;
        }
        if self.latched {
            info!("emergency stop reset accepted");
            self.latched = false;
        }
        true
    }

    /// Whether the stop condition is currently asserted.
    #[inline]
    pub const fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Whether the lifts must be held in `EmergencyHeld`.
    #[inline]
    pub const fn is_held(&self) -> bool {
        self.asserted || self.latched
    }
}
