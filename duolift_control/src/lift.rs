//! Per-lift job execution state machine.
//!
//! Each tick a lift: (1) commits due sub-motions, (2) handles the
//! emergency-stop override, (3) processes a client cancellation, (4)
//! if no sub-motion is in flight, processes clear-error and runs the
//! current stage's logic. Every wait — handshake acknowledgment,
//! sub-motion completion, handshake-slot contention, request-field
//! release — is expressed as staying in the stage and re-evaluating
//! next tick.
//!
//! Stage order within a job pipeline:
//! `SignalHandshake → AwaitAck → MoveToTarget → OrientForks →
//! TrayTransfer → ForksToMiddle`, then either the second leg (for a
//! full move) or `Complete`. Kinds without fork or tray work skip the
//! stages they do not need.

use std::time::Instant;

use tracing::{debug, info, warn};

use duolift::fault::{fault_text, FaultCode, RequestFlags};
use duolift::state::{ForkSide, LiftId, LiftState, StationStatus};
use duolift::task::{ActiveJob, Leg, TaskKind, FIELD_UNSET};

use crate::arbiter::PeerSnapshot;
use crate::config::SimConfig;
use crate::handshake::HandshakeSlot;
use crate::io::LiftInputs;
use crate::job::{validate, Validation};
use crate::reach::Reach;
use crate::submotion::SubMotion;

/// Input flags the lift consumed this tick; the I/O layer writes the
/// corresponding store paths back to their unset defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Consumed {
    /// Acknowledge-movement edge was consumed.
    pub ack: bool,
    /// Cancel-assignment code was consumed.
    pub cancel: bool,
    /// Clear-error edge was consumed.
    pub clear_error: bool,
}

/// Runtime state of one lift.
#[derive(Debug)]
pub struct Lift {
    /// Identity on the shared shaft.
    pub id: LiftId,
    /// Display name from config.
    pub name: String,
    /// Current logical row.
    pub position: u16,
    /// Whether a tray rests on the forks.
    pub has_tray: bool,
    /// Current fork extension.
    pub fork_side: ForkSide,
    /// Current execution stage.
    pub state: LiftState,
    /// Accepted job being executed, if any.
    pub job: Option<ActiveJob>,
    /// Occupied range on the projected shaft axis.
    pub reach: Reach,
    /// Current fault code (0 = healthy).
    pub fault: FaultCode,
    /// Reason code of the last processed cancellation.
    pub cancel_reason: u16,
    /// Free-text comment for the current step.
    pub step_comment: String,
    /// After completion/rejection/cancellation the request field must
    /// return to 0 before a new request is read.
    awaiting_release: bool,
    motion: SubMotion,
}

impl Lift {
    /// Create a lift parked at its initial row.
    pub fn new(id: LiftId, name: &str, initial_row: u16, config: &SimConfig) -> Self {
        Self {
            id,
            name: name.to_string(),
            position: initial_row,
            has_tray: false,
            fork_side: ForkSide::Middle,
            state: LiftState::Init,
            job: None,
            reach: Reach::point(config.layout.project_row(initial_row)),
            fault: FaultCode::None,
            cancel_reason: 0,
            step_comment: String::new(),
            awaiting_release: false,
            motion: SubMotion::new(),
        }
    }

    /// Whether the lift holds a validated or executing job.
    ///
    /// This is the activity flag the peer's arbitration sees: an idle
    /// lift never blocks a request even when parked inside its span.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.job.is_some()
    }

    /// Coarse status for external display.
    pub const fn station_status(&self) -> StationStatus {
        match self.state {
            LiftState::Init => StationStatus::Init,
            LiftState::Ready | LiftState::Cancelled => StationStatus::Idle,
            LiftState::Rejected | LiftState::ErrorHeld => StationStatus::Fault,
            LiftState::EmergencyHeld => StationStatus::EmergencyStop,
            _ => StationStatus::Busy,
        }
    }

    /// Advance the lift by one tick.
    ///
    /// `peer` is the other lift's snapshot as of tick start; `held` is
    /// the global emergency-stop hold. Returns which input edges were
    /// consumed.
    pub fn step(
        &mut self,
        now: Instant,
        inputs: &LiftInputs,
        peer: &PeerSnapshot,
        shake: &mut HandshakeSlot,
        held: bool,
        config: &SimConfig,
    ) -> Consumed {
        let mut consumed = Consumed::default();

        // Commit due sub-motions before anything reads position/forks.
        let events = self.motion.poll(now, self.position);
        if let Some(row) = events.drive_arrived {
            self.position = row;
        }
        if let Some(side) = events.fork_arrived {
            self.fork_side = side;
        }
        if let Some(has_tray) = events.tray_committed {
            self.has_tray = has_tray;
        }

        // Emergency stop: total override.
        if held {
            if self.state != LiftState::EmergencyHeld {
                self.enter_emergency(shake, config);
            }
            return consumed;
        }
        if self.state == LiftState::EmergencyHeld {
            // Stop released and reset accepted this tick.
            info!(lift = %self.name, "emergency hold released");
            self.fault = FaultCode::None;
            self.awaiting_release = true;
            self.set_state(LiftState::Ready, "ready after emergency reset");
            return consumed;
        }

        let flags = inputs.flags();

        // Client cancellation pre-empts everything below.
        if flags.contains(RequestFlags::CANCEL) {
            consumed.cancel = true;
            self.cancel(inputs.cancel_code, shake, config);
            return consumed;
        }

        // Clear-error is consumed whenever seen; a no-op while healthy.
        if flags.contains(RequestFlags::CLEAR_ERROR) {
            consumed.clear_error = true;
            if self.state == LiftState::ErrorHeld {
                info!(lift = %self.name, "error cleared by client");
                self.fault = FaultCode::None;
                self.awaiting_release = true;
                self.set_state(LiftState::Ready, "ready after error clear");
                return consumed;
            }
        }

        // An in-flight sub-motion blocks state advance this tick.
        if self.motion.any_busy() {
            return consumed;
        }

        match self.state {
            LiftState::Init => {
                self.set_state(LiftState::Ready, "ready");
            }
            LiftState::Ready => self.step_ready(inputs, peer, config),
            LiftState::Rejected => {
                // Edge-triggered re-arm: wait for the request to clear.
                if inputs.task_kind == FIELD_UNSET {
                    self.fault = FaultCode::None;
                    self.awaiting_release = false;
                    self.set_state(LiftState::Ready, "ready");
                }
            }
            LiftState::SignalHandshake => self.step_signal(shake, config),
            LiftState::AwaitAck => self.step_await_ack(inputs, &mut consumed, shake, now, config),
            LiftState::MoveToTarget => self.step_arrived(now, config),
            LiftState::OrientForks => self.step_station_work(now, config),
            LiftState::TrayTransfer => self.step_tray_transfer(now, config),
            LiftState::ForksToMiddle => self.step_leg_done(config),
            LiftState::Complete => {
                self.set_state(LiftState::Ready, "ready");
            }
            LiftState::Cancelled => {
                self.set_state(LiftState::Ready, "ready");
            }
            // Held until the clear-error edge handled above.
            LiftState::ErrorHeld => {}
            // Handled before the match.
            LiftState::EmergencyHeld => {}
        }

        consumed
    }

    // ─── Stage Logic ────────────────────────────────────────────────

    fn step_ready(&mut self, inputs: &LiftInputs, peer: &PeerSnapshot, config: &SimConfig) {
        if self.awaiting_release {
            if inputs.task_kind == FIELD_UNSET {
                self.awaiting_release = false;
                self.fault = FaultCode::None;
                self.step_comment = "ready".to_string();
            }
            return;
        }
        if inputs.task_kind == FIELD_UNSET {
            return;
        }

        match validate(
            inputs.task_kind,
            inputs.origin,
            inputs.destination,
            self.has_tray,
            self.position,
            peer,
            &config.layout,
        ) {
            Validation::Accept { kind, reach } => {
                info!(
                    lift = %self.name,
                    ?kind,
                    origin = inputs.origin,
                    destination = inputs.destination,
                    low = reach.low,
                    high = reach.high,
                    "job accepted"
                );
                self.job = Some(ActiveJob::new(kind, inputs.origin, inputs.destination));
                self.reach = reach;
                self.set_state(LiftState::SignalHandshake, "signalling movement");
            }
            Validation::Reject(reason) => {
                warn!(lift = %self.name, ?reason, kind = inputs.task_kind, "job rejected");
                self.job = None;
                self.fault = reason.fault_code();
                self.awaiting_release = true;
                self.set_state(LiftState::Rejected, fault_text(self.fault).short);
            }
        }
    }

    fn step_signal(&mut self, shake: &mut HandshakeSlot, config: &SimConfig) {
        let Some(job) = self.job else {
            self.sequence_fault(shake, config);
            return;
        };
        // Slot held by the peer: stay and retry next tick.
        if shake.try_claim(self.id, job.kind as u16, job.leg_target()) {
            self.set_state(LiftState::AwaitAck, "awaiting movement acknowledgment");
        }
    }

    fn step_await_ack(
        &mut self,
        inputs: &LiftInputs,
        consumed: &mut Consumed,
        shake: &mut HandshakeSlot,
        now: Instant,
        config: &SimConfig,
    ) {
        // No timeout: acknowledgment is a hard external dependency.
        if !inputs.ack_movement {
            return;
        }
        consumed.ack = true;
        shake.clear(self.id);

        let Some(job) = self.job else {
            self.sequence_fault(shake, config);
            return;
        };
        let target = job.leg_target();
        self.motion.start_drive(
            config.layout.project_row(self.position),
            config.layout.project_row(target),
            target,
            now,
            &config.timing,
        );
        self.set_state(LiftState::MoveToTarget, "moving to target row");
    }

    /// Drive finished: decide the station work for this leg.
    fn step_arrived(&mut self, now: Instant, config: &SimConfig) {
        let Some(job) = self.job else {
            self.enter_fault(FaultCode::SequenceFault, config);
            return;
        };
        match job.kind {
            TaskKind::MoveTo => self.finish_job(config),
            _ => {
                let side = config.layout.fork_side_for_row(self.position);
                if side == ForkSide::Middle {
                    // Service row: nothing to extend into.
                    self.step_station_work(now, config);
                } else {
                    self.motion.start_fork(side, now, &config.timing);
                    self.set_state(LiftState::OrientForks, "orienting forks");
                }
            }
        }
    }

    /// Forks extended (or service row skipped extension): start the
    /// tray transfer the leg calls for, if any.
    fn step_station_work(&mut self, now: Instant, config: &SimConfig) {
        let Some(job) = self.job else {
            self.enter_fault(FaultCode::SequenceFault, config);
            return;
        };
        if job.leg_picks_up() {
            self.motion
                .schedule_tray(true, self.position, now, &config.timing);
            self.set_state(LiftState::TrayTransfer, "picking up tray");
        } else if job.leg_releases() {
            self.motion
                .schedule_tray(false, self.position, now, &config.timing);
            self.set_state(LiftState::TrayTransfer, "releasing tray");
        } else {
            // PreparePickup only cycles the forks.
            self.forks_home(now, config);
        }
    }

    fn step_tray_transfer(&mut self, now: Instant, config: &SimConfig) {
        if self.motion.tray_pending() {
            return;
        }
        let Some(job) = self.job else {
            self.enter_fault(FaultCode::SequenceFault, config);
            return;
        };
        // Consistency check after the transfer committed.
        if job.leg_picks_up() && !self.has_tray {
            self.enter_fault(FaultCode::TrayMissingAfterPickup, config);
            return;
        }
        if job.leg_releases() && self.has_tray {
            self.enter_fault(FaultCode::TrayPresentAfterRelease, config);
            return;
        }
        self.forks_home(now, config);
    }

    fn forks_home(&mut self, now: Instant, config: &SimConfig) {
        if self.fork_side == ForkSide::Middle {
            self.step_leg_done(config);
        } else {
            self.motion
                .start_fork(ForkSide::Middle, now, &config.timing);
            self.set_state(LiftState::ForksToMiddle, "returning forks to middle");
        }
    }

    /// Forks back at middle: finish the leg.
    fn step_leg_done(&mut self, config: &SimConfig) {
        let Some(job) = self.job else {
            self.enter_fault(FaultCode::SequenceFault, config);
            return;
        };
        if job.kind == TaskKind::FullMove && job.leg == Leg::Pickup {
            self.job = Some(ActiveJob {
                leg: Leg::Delivery,
                ..job
            });
            self.set_state(LiftState::SignalHandshake, "signalling delivery movement");
        } else {
            self.finish_job(config);
        }
    }

    // ─── Transitions ────────────────────────────────────────────────

    fn finish_job(&mut self, config: &SimConfig) {
        info!(lift = %self.name, row = self.position, "job complete");
        self.job = None;
        self.reach = Reach::point(config.layout.project_row(self.position));
        self.awaiting_release = true;
        self.set_state(LiftState::Complete, "job complete");
    }

    fn cancel(&mut self, code: u16, shake: &mut HandshakeSlot, config: &SimConfig) {
        info!(lift = %self.name, code, "assignment cancelled by client");
        self.motion.abort();
        self.job = None;
        shake.clear(self.id);
        self.reach = Reach::point(config.layout.project_row(self.position));
        self.fault = FaultCode::None;
        self.cancel_reason = code;
        self.awaiting_release = true;
        self.set_state(LiftState::Cancelled, "assignment cancelled");
    }

    fn enter_fault(&mut self, code: FaultCode, config: &SimConfig) {
        warn!(lift = %self.name, ?code, "execution fault");
        self.motion.abort();
        self.job = None;
        self.reach = Reach::point(config.layout.project_row(self.position));
        self.fault = code;
        self.awaiting_release = true;
        self.set_state(LiftState::ErrorHeld, fault_text(code).short);
    }

    fn sequence_fault(&mut self, shake: &mut HandshakeSlot, config: &SimConfig) {
        shake.clear(self.id);
        self.enter_fault(FaultCode::SequenceFault, config);
    }

    fn enter_emergency(&mut self, shake: &mut HandshakeSlot, config: &SimConfig) {
        warn!(lift = %self.name, "emergency stop: halting");
        self.motion.abort();
        self.job = None;
        shake.clear(self.id);
        self.reach = Reach::point(config.layout.project_row(self.position));
        self.fault = FaultCode::EmergencyStop;
        self.set_state(LiftState::EmergencyHeld, "emergency stop active");
    }

    fn set_state(&mut self, state: LiftState, comment: &str) {
        if self.state != state {
            debug!(lift = %self.name, from = ?self.state, to = ?state, "stage transition");
        }
        self.state = state;
        self.step_comment = comment.to_string();
    }
}
