//! Lift identity and execution-state enums.
//!
//! All enums use `#[repr(u8)]` for compact layout and a stable numeric
//! form on the variable store. The execution stages collapse the many
//! numeric waypoints of the legacy controllers into named stages; the
//! ordering of stages within a job pipeline is fixed by the state
//! machine in `duolift_control`.

use serde::{Deserialize, Serialize};

// ─── Lift Identity ──────────────────────────────────────────────────

/// Identity of one of the two lifts sharing the shaft.
///
/// Exactly two lifts exist for the process lifetime; the design is
/// hard-coded to two actors on one shared axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LiftId {
    /// Lower lift (defaults to a parking row near the shaft bottom).
    A = 0,
    /// Upper lift (defaults to a parking row near the shaft top).
    B = 1,
}

impl LiftId {
    /// The other lift.
    #[inline]
    pub const fn peer(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Array index for `[_; 2]` storage.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Short lowercase label used in store paths and log fields.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

// ─── Execution Stage ────────────────────────────────────────────────

/// Per-lift execution stage.
///
/// `Ready` is the only state that reads new task requests. All waiting
/// (handshake acknowledgment, sub-motion completion, handshake-slot
/// contention) is expressed as staying in the same stage and
/// re-evaluating next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LiftState {
    /// Initial state after process start.
    Init = 0,
    /// Waiting for a task request (or for the request field to clear).
    Ready = 1,
    /// Request rejected — waiting for the request field to return to 0.
    Rejected = 2,
    /// Claiming the shared handshake slot and publishing the signal.
    SignalHandshake = 3,
    /// Signal published — waiting for the external acknowledgment edge.
    AwaitAck = 4,
    /// Vertical drive moving to the leg target row.
    MoveToTarget = 5,
    /// Forks extending toward the rack side of the target zone.
    OrientForks = 6,
    /// Waiting for the delayed tray pickup/release to commit.
    TrayTransfer = 7,
    /// Forks retracting to the middle position.
    ForksToMiddle = 8,
    /// Job finished — publishes completion, then returns to Ready.
    Complete = 9,
    /// Job aborted by the external cancel request.
    Cancelled = 10,
    /// Execution fault — held until the external clear-error signal.
    ErrorHeld = 11,
    /// Emergency stop — held until stop released AND reset issued.
    EmergencyHeld = 12,
}

impl LiftState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Init),
            1 => Some(Self::Ready),
            2 => Some(Self::Rejected),
            3 => Some(Self::SignalHandshake),
            4 => Some(Self::AwaitAck),
            5 => Some(Self::MoveToTarget),
            6 => Some(Self::OrientForks),
            7 => Some(Self::TrayTransfer),
            8 => Some(Self::ForksToMiddle),
            9 => Some(Self::Complete),
            10 => Some(Self::Cancelled),
            11 => Some(Self::ErrorHeld),
            12 => Some(Self::EmergencyHeld),
            _ => None,
        }
    }

    /// Whether the lift is executing an accepted job.
    #[inline]
    pub const fn is_executing(&self) -> bool {
        matches!(
            self,
            Self::SignalHandshake
                | Self::AwaitAck
                | Self::MoveToTarget
                | Self::OrientForks
                | Self::TrayTransfer
                | Self::ForksToMiddle
                | Self::Complete
        )
    }

    /// Whether the lift is parked in a held state that needs an
    /// external signal to leave.
    #[inline]
    pub const fn is_held(&self) -> bool {
        matches!(self, Self::ErrorHeld | Self::EmergencyHeld)
    }
}

impl Default for LiftState {
    fn default() -> Self {
        Self::Init
    }
}

// ─── Fork Side ──────────────────────────────────────────────────────

/// Lateral extension state of the load-engaging forks.
///
/// Zone A racks are reached with `SideA`, zone B racks with `SideB`.
/// Service rows have no rack and keep the forks at `Middle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ForkSide {
    /// Retracted, travel position.
    Middle = 0,
    /// Extended toward the zone-A rack.
    SideA = 1,
    /// Extended toward the zone-B rack.
    SideB = 2,
}

impl ForkSide {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Middle),
            1 => Some(Self::SideA),
            2 => Some(Self::SideB),
            _ => None,
        }
    }
}

impl Default for ForkSide {
    fn default() -> Self {
        Self::Middle
    }
}

// ─── Station Status ─────────────────────────────────────────────────

/// Coarse per-lift status published for external display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StationStatus {
    /// Starting up.
    Init = 0,
    /// Idle, accepting requests.
    Idle = 1,
    /// Executing a job.
    Busy = 2,
    /// Rejected request or execution fault.
    Fault = 3,
    /// Emergency stop active.
    EmergencyStop = 4,
}

impl StationStatus {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Init),
            1 => Some(Self::Idle),
            2 => Some(Self::Busy),
            3 => Some(Self::Fault),
            4 => Some(Self::EmergencyStop),
            _ => None,
        }
    }
}

impl Default for StationStatus {
    fn default() -> Self {
        Self::Init
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lift_id_peer_and_index() {
        assert_eq!(LiftId::A.peer(), LiftId::B);
        assert_eq!(LiftId::B.peer(), LiftId::A);
        assert_eq!(LiftId::A.index(), 0);
        assert_eq!(LiftId::B.index(), 1);
        assert_eq!(LiftId::A.label(), "a");
    }

    #[test]
    fn lift_state_from_u8_bounds() {
        assert_eq!(LiftState::from_u8(0), Some(LiftState::Init));
        assert_eq!(LiftState::from_u8(12), Some(LiftState::EmergencyHeld));
        assert!(LiftState::from_u8(13).is_none());
        assert!(LiftState::from_u8(255).is_none());
    }

    #[test]
    fn executing_and_held_predicates() {
        assert!(!LiftState::Ready.is_executing());
        assert!(LiftState::MoveToTarget.is_executing());
        assert!(LiftState::AwaitAck.is_executing());
        assert!(!LiftState::ErrorHeld.is_executing());

        assert!(LiftState::ErrorHeld.is_held());
        assert!(LiftState::EmergencyHeld.is_held());
        assert!(!LiftState::Rejected.is_held());
    }

    #[test]
    fn fork_side_from_u8() {
        assert_eq!(ForkSide::from_u8(0), Some(ForkSide::Middle));
        assert_eq!(ForkSide::from_u8(2), Some(ForkSide::SideB));
        assert!(ForkSide::from_u8(3).is_none());
    }

    #[test]
    fn station_status_from_u8() {
        assert_eq!(StationStatus::from_u8(4), Some(StationStatus::EmergencyStop));
        assert!(StationStatus::from_u8(5).is_none());
    }
}
