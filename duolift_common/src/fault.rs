//! Fault codes, display text, and per-tick request flags.
//!
//! A lift is healthy when `FaultCode::None` (0). Nonzero codes split
//! into validation rejections (1xx, recoverable by a corrected retry
//! after the request field clears), execution faults (2xx, require the
//! external clear-error signal), and the emergency stop (3xx, requires
//! stop release plus reset). Every nonzero code maps to short/long
//! description and remediation text kept current for external display.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ─── Fault Code ─────────────────────────────────────────────────────

/// Per-lift fault classification published on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum FaultCode {
    /// Healthy.
    None = 0,

    // ── Validation rejections ──
    /// Pickup-class task while a tray is already present.
    PickupWithTrayPresent = 101,
    /// Required row field unset or outside the usable rows.
    InvalidZeroPosition = 102,
    /// Unknown task kind or unmet task precondition.
    InvalidAssignment = 103,
    /// Occupied ranges of the two lifts would overlap.
    LiftsCross = 104,

    // ── Execution faults ──
    /// Tray absent after a pickup sequence finished.
    TrayMissingAfterPickup = 201,
    /// Tray still present after a release sequence finished.
    TrayPresentAfterRelease = 202,
    /// Pipeline stage entered without its required job context.
    SequenceFault = 203,

    // ── Global ──
    /// Emergency stop asserted.
    EmergencyStop = 301,
}

impl FaultCode {
    /// Convert from raw `u16`. Returns `None` for unknown codes.
    #[inline]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            101 => Some(Self::PickupWithTrayPresent),
            102 => Some(Self::InvalidZeroPosition),
            103 => Some(Self::InvalidAssignment),
            104 => Some(Self::LiftsCross),
            201 => Some(Self::TrayMissingAfterPickup),
            202 => Some(Self::TrayPresentAfterRelease),
            203 => Some(Self::SequenceFault),
            301 => Some(Self::EmergencyStop),
            _ => None,
        }
    }

    /// Whether this code stems from job validation (retry with a
    /// corrected request clears it, no explicit error reset needed).
    #[inline]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::PickupWithTrayPresent
                | Self::InvalidZeroPosition
                | Self::InvalidAssignment
                | Self::LiftsCross
        )
    }

    /// Whether the lift is healthy.
    #[inline]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl Default for FaultCode {
    fn default() -> Self {
        Self::None
    }
}

// ─── Display Text ───────────────────────────────────────────────────

/// Short description, long description, and remediation text for one
/// fault code. Published verbatim to the store while the fault holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultText {
    pub short: &'static str,
    pub long: &'static str,
    pub remedy: &'static str,
}

const TEXT_HEALTHY: FaultText = FaultText {
    short: "",
    long: "",
    remedy: "",
};

/// Display text for a fault code.
pub const fn fault_text(code: FaultCode) -> FaultText {
    match code {
        FaultCode::None => TEXT_HEALTHY,
        FaultCode::PickupWithTrayPresent => FaultText {
            short: "tray present",
            long: "pickup task requested while a tray is already on the forks",
            remedy: "bring the current tray away first, then repeat the request",
        },
        FaultCode::InvalidZeroPosition => FaultText {
            short: "row missing",
            long: "a required row field is zero or outside the rack",
            remedy: "clear the request and resend it with valid row numbers",
        },
        FaultCode::InvalidAssignment => FaultText {
            short: "invalid assignment",
            long: "unknown task kind or task preconditions not met",
            remedy: "clear the request and check task kind and tray state",
        },
        FaultCode::LiftsCross => FaultText {
            short: "lifts would cross",
            long: "the requested path overlaps the occupied range of the other lift",
            remedy: "wait until the other lift finishes, then repeat the request",
        },
        FaultCode::TrayMissingAfterPickup => FaultText {
            short: "tray lost",
            long: "no tray detected on the forks after the pickup sequence",
            remedy: "inspect the station, then clear the error to resume",
        },
        FaultCode::TrayPresentAfterRelease => FaultText {
            short: "tray stuck",
            long: "tray still detected on the forks after the release sequence",
            remedy: "remove the tray manually, then clear the error to resume",
        },
        FaultCode::SequenceFault => FaultText {
            short: "sequence fault",
            long: "execution stage entered without an active job",
            remedy: "clear the error; report the occurrence if it repeats",
        },
        FaultCode::EmergencyStop => FaultText {
            short: "emergency stop",
            long: "the emergency stop circuit is open",
            remedy: "release the stop, then issue the reset signal",
        },
    }
}

// ─── Request Flags ──────────────────────────────────────────────────

bitflags! {
    /// Per-tick external request flags assembled from the input paths.
    ///
    /// Dispatch priority (after the global emergency stop): CANCEL,
    /// then CLEAR_ERROR, then ACK_MOVEMENT as part of normal flow.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RequestFlags: u8 {
        /// Cancel-assignment code is nonzero.
        const CANCEL       = 0x01;
        /// Clear-error flag is set.
        const CLEAR_ERROR  = 0x02;
        /// Acknowledge-movement flag is set.
        const ACK_MOVEMENT = 0x04;
    }
}

impl Default for RequestFlags {
    fn default() -> Self {
        Self::empty()
    }
}
