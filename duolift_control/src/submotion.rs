//! Time-based sub-motion simulation.
//!
//! Each lift owns two independent sub-resources: the vertical drive
//! and the fork-shift mechanism. Both are modeled as "busy until
//! wall-clock deadline", polled once per tick with an injected `now`;
//! when the deadline passes, the target value commits atomically and
//! the busy flag clears. The state machine never advances while either
//! is in progress.
//!
//! Tray pickup/release is a third, delayed transition anchored to fork
//! arrival. It is gated: it commits only while the lift still stands
//! at the expected row; if the lift has since moved the change stays
//! pending rather than committing at the wrong location.

use std::time::Instant;

use duolift::state::ForkSide;

use crate::config::TimingConfig;

/// An in-flight vertical drive movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DriveMotion {
    target_row: u16,
    deadline: Instant,
}

/// An in-flight fork-shift movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ForkMotion {
    target: ForkSide,
    deadline: Instant,
}

/// A scheduled tray pickup/release waiting for the grip lag to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTrayChange {
    /// Tray state after commit.
    pub will_have_tray: bool,
    /// Row the lift must still occupy for the commit to be valid.
    pub expected_row: u16,
    due: Instant,
}

/// What committed during a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionEvents {
    /// Drive arrived at this row.
    pub drive_arrived: Option<u16>,
    /// Forks arrived at this side.
    pub fork_arrived: Option<ForkSide>,
    /// Tray state changed to this value.
    pub tray_committed: Option<bool>,
}

/// Sub-motion state of one lift.
#[derive(Debug, Default)]
pub struct SubMotion {
    drive: Option<DriveMotion>,
    fork: Option<ForkMotion>,
    pending_tray: Option<PendingTrayChange>,
}

impl SubMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the drive is in progress.
    #[inline]
    pub const fn drive_busy(&self) -> bool {
        self.drive.is_some()
    }

    /// Whether the forks are in progress.
    #[inline]
    pub const fn fork_busy(&self) -> bool {
        self.fork.is_some()
    }

    /// Whether either sub-motion blocks the state machine this tick.
    #[inline]
    pub const fn any_busy(&self) -> bool {
        self.drive.is_some() || self.fork.is_some()
    }

    /// Whether a tray change is still waiting to commit.
    #[inline]
    pub const fn tray_pending(&self) -> bool {
        self.pending_tray.is_some()
    }

    /// Begin a drive movement from `from_row` to `to_row`.
    ///
    /// Duration is proportional to the projected distance with a
    /// configured floor. Distance is measured on physical coordinates
    /// so a hop onto a service row costs its real travel.
    pub fn start_drive(
        &mut self,
        from_phys: i32,
        to_phys: i32,
        target_row: u16,
        now: Instant,
        timing: &TimingConfig,
    ) {
        let rows = from_phys.abs_diff(to_phys);
        self.drive = Some(DriveMotion {
            target_row,
            deadline: now + timing.drive_duration(rows),
        });
    }

    /// Begin a fork movement toward `target`.
    pub fn start_fork(&mut self, target: ForkSide, now: Instant, timing: &TimingConfig) {
        self.fork = Some(ForkMotion {
            target,
            deadline: now + timing.fork_duration(),
        });
    }

    /// Schedule the delayed tray change after fork arrival.
    pub fn schedule_tray(
        &mut self,
        will_have_tray: bool,
        expected_row: u16,
        now: Instant,
        timing: &TimingConfig,
    ) {
        self.pending_tray = Some(PendingTrayChange {
            will_have_tray,
            expected_row,
            due: now + timing.tray_duration(),
        });
    }

    /// Abort every in-flight sub-motion and discard a pending tray
    /// change. Position and fork side stay at their last committed
    /// values.
    pub fn abort(&mut self) {
        self.drive = None;
        self.fork = None;
        self.pending_tray = None;
    }

    /// Poll all sub-motions against `now` and commit what is due.
    ///
    /// `current_row` is the lift's committed position entering this
    /// tick; a drive arrival within the same poll counts as the
    /// lift's position for the tray gate.
    pub fn poll(&mut self, now: Instant, current_row: u16) -> MotionEvents {
        let mut events = MotionEvents::default();

        if let Some(drive) = self.drive {
            if drive.deadline <= now {
                events.drive_arrived = Some(drive.target_row);
                self.drive = None;
            }
        }

        if let Some(fork) = self.fork {
            if fork.deadline <= now {
                events.fork_arrived = Some(fork.target);
                self.fork = None;
            }
        }

        let row_now = events.drive_arrived.unwrap_or(current_row);
        if let Some(pending) = self.pending_tray {
            // Gate: commit only while stationary at the expected row.
            if pending.due <= now && self.drive.is_none() && row_now == pending.expected_row {
                events.tray_committed = Some(pending.will_have_tray);
                self.pending_tray = None;
            }
        }

        events
    }
}
