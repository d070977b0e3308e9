//! Shared handshake signal slot.
//!
//! Before moving to a station, a lift publishes `{job_type, row}` on
//! the shared handshake pair and blocks (at the state-machine level)
//! until the external system acknowledges. One slot serves both lifts:
//! a lift that finds the slot held by its peer stays in its signalling
//! stage and retries next tick. The owner clears the slot back to the
//! idle sentinel after consuming the acknowledgment.

use duolift::state::LiftId;
use duolift::task::FIELD_UNSET;

/// The shared `{job_type, row}` signal and its current owner.
#[derive(Debug, Default)]
pub struct HandshakeSlot {
    job_type: u16,
    row: u16,
    owner: Option<LiftId>,
}

impl HandshakeSlot {
    pub const fn new() -> Self {
        Self {
            job_type: FIELD_UNSET,
            row: FIELD_UNSET,
            owner: None,
        }
    }

    /// Claim the slot and publish a signal.
    ///
    /// Succeeds if the slot is free or already held by `owner` (the
    /// signal is then overwritten, e.g. for the second leg). Returns
    /// `false` while the peer holds the slot.
    pub fn try_claim(&mut self, owner: LiftId, job_type: u16, row: u16) -> bool {
        match self.owner {
            Some(holder) if holder != owner => false,
            _ => {
                self.owner = Some(owner);
                self.job_type = job_type;
                self.row = row;
                true
            }
        }
    }

    /// Clear the signal back to the idle sentinel.
    ///
    /// Only the current owner can clear; a stale call from the peer is
    /// ignored.
    pub fn clear(&mut self, owner: LiftId) {
        if self.owner == Some(owner) {
            self.job_type = FIELD_UNSET;
            self.row = FIELD_UNSET;
            self.owner = None;
        }
    }

    /// Published job type (0 while idle).
    #[inline]
    pub const fn job_type(&self) -> u16 {
        self.job_type
    }

    /// Published target row (0 while idle).
    #[inline]
    pub const fn row(&self) -> u16 {
        self.row
    }

    /// Current owner, if any.
    #[inline]
    pub const fn owner(&self) -> Option<LiftId> {
        self.owner
    }

    /// Whether the slot is free.
    #[inline]
    pub const fn is_idle(&self) -> bool {
        self.owner.is_none()
    }
}
