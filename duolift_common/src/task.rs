//! Task requests, active job records, and validation reject reasons.
//!
//! A task request arrives over the variable store as three raw fields
//! (`task_kind`, `origin`, `destination`); `0` is the universal unset
//! sentinel for all three. The typed forms here are what the state
//! machine works with after decode.

use serde::{Deserialize, Serialize};

use crate::fault::FaultCode;

/// Unset sentinel for task kind and row fields on the store.
pub const FIELD_UNSET: u16 = 0;

// ─── Task Kind ──────────────────────────────────────────────────────

/// Kind of work a lift can be asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TaskKind {
    /// No task (idle sentinel).
    None = 0,
    /// Pick a tray up at `origin`, carry it, place it at `destination`.
    FullMove = 1,
    /// Reposition to `origin` only; no fork or tray interaction.
    MoveTo = 2,
    /// Move to `origin` and cycle the forks without grabbing.
    PreparePickup = 3,
    /// Carry the tray already on the forks to `destination` and release.
    BringAway = 4,
}

impl TaskKind {
    /// Convert from raw `u16`. Returns `None` for unknown discriminants.
    #[inline]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::FullMove),
            2 => Some(Self::MoveTo),
            3 => Some(Self::PreparePickup),
            4 => Some(Self::BringAway),
            _ => None,
        }
    }

    /// Task kinds that begin with a pickup and therefore require
    /// empty forks at intake.
    #[inline]
    pub const fn is_pickup_class(&self) -> bool {
        matches!(self, Self::FullMove | Self::PreparePickup)
    }

    /// Whether the task moves a tray at some point.
    #[inline]
    pub const fn touches_tray(&self) -> bool {
        matches!(self, Self::FullMove | Self::BringAway)
    }
}

impl Default for TaskKind {
    fn default() -> Self {
        Self::None
    }
}

// ─── Job Leg ────────────────────────────────────────────────────────

/// Which leg of a two-leg job is executing.
///
/// Only `FullMove` has two legs; single-leg tasks stay on their entry
/// leg for their whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Leg {
    /// First leg: travel to the pickup (or only) station.
    Pickup = 0,
    /// Second leg: travel to the delivery station.
    Delivery = 1,
}

impl Default for Leg {
    fn default() -> Self {
        Self::Pickup
    }
}

// ─── Active Job ─────────────────────────────────────────────────────

/// A validated, accepted job being executed by a lift.
///
/// All fields are fully populated on acceptance; the record is cleared
/// as a whole on completion, rejection, cancellation, or fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveJob {
    /// Kind of work.
    pub kind: TaskKind,
    /// Pickup row (0 for kinds that do not use it).
    pub origin: u16,
    /// Delivery row (0 for kinds that do not use it).
    pub destination: u16,
    /// Current leg of the pipeline.
    pub leg: Leg,
}

impl ActiveJob {
    /// Create a new job on its first leg.
    pub const fn new(kind: TaskKind, origin: u16, destination: u16) -> Self {
        Self {
            kind,
            origin,
            destination,
            leg: Leg::Pickup,
        }
    }

    /// Row the current leg travels to (and signals in the handshake).
    ///
    /// `BringAway` has no pickup travel — its single leg targets the
    /// destination. `MoveTo` and `PreparePickup` target the origin.
    #[inline]
    pub const fn leg_target(&self) -> u16 {
        match (self.kind, self.leg) {
            (TaskKind::FullMove, Leg::Pickup) => self.origin,
            (TaskKind::FullMove, Leg::Delivery) => self.destination,
            (TaskKind::MoveTo, _) | (TaskKind::PreparePickup, _) => self.origin,
            (TaskKind::BringAway, _) => self.destination,
            (TaskKind::None, _) => FIELD_UNSET,
        }
    }

    /// Whether the current leg picks a tray up at its station.
    #[inline]
    pub const fn leg_picks_up(&self) -> bool {
        matches!((self.kind, self.leg), (TaskKind::FullMove, Leg::Pickup))
    }

    /// Whether the current leg releases a tray at its station.
    #[inline]
    pub const fn leg_releases(&self) -> bool {
        matches!(
            (self.kind, self.leg),
            (TaskKind::FullMove, Leg::Delivery) | (TaskKind::BringAway, _)
        )
    }
}

// ─── Reject Reasons ─────────────────────────────────────────────────

/// Closed enumeration of validation rejection reasons.
///
/// First failing check wins; the ordering of checks lives in the
/// validation routine, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Pickup-class task requested while a tray is already on the forks.
    PickupWithTrayPresent,
    /// A required row field is the unset sentinel or not a usable row.
    InvalidZeroPosition,
    /// Unknown task kind, or task preconditions not met.
    InvalidAssignment,
    /// The prospective occupied range overlaps the active peer's range.
    LiftsCross,
}

impl RejectReason {
    /// Fault code published while the rejection is displayed.
    #[inline]
    pub const fn fault_code(&self) -> FaultCode {
        match self {
            Self::PickupWithTrayPresent => FaultCode::PickupWithTrayPresent,
            Self::InvalidZeroPosition => FaultCode::InvalidZeroPosition,
            Self::InvalidAssignment => FaultCode::InvalidAssignment,
            Self::LiftsCross => FaultCode::LiftsCross,
        }
    }
}
