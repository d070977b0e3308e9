//! Whole-machine scenarios driven through the tick loop.
//!
//! Everything goes through the public surface: requests and control
//! flags are written to the variable store the way the external client
//! would, ticks run with a virtual clock, and assertions read lift
//! state and store outputs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use duolift::fault::FaultCode;
use duolift::state::{LiftId, LiftState, StationStatus};
use duolift::task::TaskKind;
use duolift_control::config::{SimConfig, TimingConfig};
use duolift_control::cycle::CycleRunner;
use duolift_control::reach::Reach;
use duolift_store::{paths, MemoryStore, Value, VarStore};

const TICK: Duration = Duration::from_millis(100);
const A: LiftId = LiftId::A;
const B: LiftId = LiftId::B;

/// Test fixture: a runner on a shared store with a virtual clock.
struct Sim {
    runner: CycleRunner,
    store: Arc<MemoryStore>,
    now: Instant,
}

impl Sim {
    /// Fast timing so every sub-motion finishes within one tick.
    fn new(initial_a: u16, initial_b: u16) -> Self {
        let mut config = SimConfig {
            timing: TimingConfig {
                cycle_interval_ms: 100,
                drive_ms_per_row: 10,
                drive_min_ms: 20,
                fork_travel_ms: 30,
                tray_transfer_ms: 25,
            },
            ..SimConfig::default()
        };
        config.lifts[0].initial_row = initial_a;
        config.lifts[1].initial_row = initial_b;

        let store = Arc::new(MemoryStore::new());
        let runner = CycleRunner::new(config, store.clone()).unwrap();
        let mut sim = Self {
            runner,
            store,
            now: Instant::now(),
        };
        // First tick: Init → Ready for both lifts.
        sim.tick();
        sim
    }

    fn tick(&mut self) {
        self.runner.tick(self.now).unwrap();
        self.now += TICK;
    }

    fn submit(&self, lift: LiftId, kind: TaskKind, origin: u16, destination: u16) {
        self.store
            .write(&paths::in_task_kind(lift), Value::from(kind as u16))
            .unwrap();
        self.store
            .write(&paths::in_origin(lift), Value::from(origin))
            .unwrap();
        self.store
            .write(&paths::in_destination(lift), Value::from(destination))
            .unwrap();
    }

    fn clear_request(&self, lift: LiftId) {
        self.submit(lift, TaskKind::None, 0, 0);
    }

    fn ack(&self, lift: LiftId) {
        self.store
            .write(&paths::in_ack_movement(lift), Value::Bool(true))
            .unwrap();
    }

    /// Tick until `done`, acknowledging `lift`'s handshakes.
    fn run_until(&mut self, lift: LiftId, done: impl Fn(&CycleRunner) -> bool, max_ticks: u32) {
        for _ in 0..max_ticks {
            if done(&self.runner) {
                return;
            }
            if self.runner.lift(lift).state == LiftState::AwaitAck {
                self.ack(lift);
            }
            self.tick();
        }
        panic!(
            "condition not reached within {max_ticks} ticks; state={:?}",
            self.runner.lift(lift).state
        );
    }

    /// Drive `lift` through a submitted job to `Ready`, releasing the
    /// request field once the job completes.
    fn run_job(&mut self, lift: LiftId, max_ticks: u32) {
        self.run_until(lift, |r| r.lift(lift).state == LiftState::Complete, max_ticks);
        self.clear_request(lift);
        self.run_until(
            lift,
            |r| r.lift(lift).state == LiftState::Ready && !r.lift(lift).is_active(),
            10,
        );
        // One more tick so the lift re-arms on the cleared field.
        self.tick();
    }

    fn out_int(&self, path: &str) -> i64 {
        self.store.read(path).unwrap().as_int().unwrap()
    }

    fn out_bool(&self, path: &str) -> bool {
        self.store.read(path).unwrap().as_bool().unwrap()
    }
}

// ─── Scenario A ─────────────────────────────────────────────────────

#[test]
fn scenario_a_full_move_executes_end_to_end() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::FullMove, 10, 90);
    sim.tick();
    // Accepted: the lift left Ready and owns a job.
    assert!(sim.runner.lift(A).is_active());

    // Pickup leg: tray appears at row 10.
    sim.run_until(A, |r| r.lift(A).has_tray, 40);
    assert_eq!(sim.runner.lift(A).position, 10);

    // Delivery leg: job finishes at 90 with the tray released.
    sim.run_job(A, 60);
    let lift = sim.runner.lift(A);
    assert_eq!(lift.position, 90);
    assert!(!lift.has_tray);
    assert_eq!(lift.state, LiftState::Ready);
    assert_eq!(lift.fault, FaultCode::None);

    // Store outputs agree.
    assert_eq!(sim.out_int(&paths::out_row(A)), 90);
    assert!(!sim.out_bool(&paths::out_has_tray(A)));
    assert_eq!(
        sim.out_int(&paths::out_state(A)),
        LiftState::Ready as u8 as i64
    );
}

// ─── Scenario B ─────────────────────────────────────────────────────

#[test]
fn scenario_b_crossing_request_rejected_while_peer_busy() {
    let mut sim = Sim::new(5, 80);

    // Lift A accepts a job spanning [5, 50] (10..48 + offset 2).
    sim.submit(A, TaskKind::FullMove, 10, 48);
    sim.tick();
    assert!(sim.runner.lift(A).is_active());
    assert_eq!(sim.runner.lift(A).reach, Reach { low: 5, high: 50 });

    // Lift B asks to move to row 30, inside A's occupied range.
    sim.submit(B, TaskKind::MoveTo, 30, 0);
    sim.tick();
    let lift_b = sim.runner.lift(B);
    assert_eq!(lift_b.state, LiftState::Rejected);
    assert_eq!(lift_b.fault, FaultCode::LiftsCross);
    assert!(!lift_b.is_active());
    assert_eq!(
        sim.out_int(&paths::out_fault_code(B)),
        FaultCode::LiftsCross as u16 as i64
    );

    // Once A finishes and B's request is cleared, the same move is fine.
    sim.run_job(A, 60);
    sim.clear_request(B);
    sim.tick();
    sim.submit(B, TaskKind::MoveTo, 30, 0);
    sim.run_job(B, 40);
    assert_eq!(sim.runner.lift(B).position, 30);
}

// ─── Scenario C ─────────────────────────────────────────────────────

#[test]
fn scenario_c_zero_destination_rejected_without_reach_change() {
    let mut sim = Sim::new(5, 99);
    let reach_before = sim.runner.lift(A).reach;

    sim.submit(A, TaskKind::FullMove, 10, 0);
    sim.tick();

    let lift = sim.runner.lift(A);
    assert_eq!(lift.state, LiftState::Rejected);
    assert_eq!(lift.fault, FaultCode::InvalidZeroPosition);
    assert_eq!(lift.reach, reach_before);
}

// ─── Scenario D ─────────────────────────────────────────────────────

#[test]
fn scenario_d_prepare_pickup_with_tray_rejected() {
    let mut sim = Sim::new(5, 99);
    sim.runner.lift_mut(A).has_tray = true;

    sim.submit(A, TaskKind::PreparePickup, 10, 0);
    sim.tick();

    let lift = sim.runner.lift(A);
    assert_eq!(lift.state, LiftState::Rejected);
    assert_eq!(lift.fault, FaultCode::PickupWithTrayPresent);
    assert!(lift.has_tray);
}

// ─── Scenario E ─────────────────────────────────────────────────────

#[test]
fn scenario_e_emergency_stop_mid_job() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::FullMove, 10, 90);
    sim.run_until(A, |r| r.lift(A).state == LiftState::MoveToTarget, 20);

    // Assert the stop mid-motion: both lifts freeze and drop jobs.
    sim.store
        .write(paths::SYS_ESTOP_ACTIVE, Value::Bool(true))
        .unwrap();
    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::EmergencyHeld);
    assert_eq!(sim.runner.lift(B).state, LiftState::EmergencyHeld);
    assert!(!sim.runner.lift(A).is_active());
    assert_eq!(sim.runner.lift(A).fault, FaultCode::EmergencyStop);
    assert_eq!(
        sim.out_int(&paths::out_station_status(A)),
        StationStatus::EmergencyStop as u8 as i64
    );
    let frozen_row = sim.runner.lift(A).position;

    // Reset while still asserted is refused.
    sim.store
        .write(paths::SYS_ESTOP_RESET, Value::Bool(true))
        .unwrap();
    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::EmergencyHeld);
    // The reset edge was consumed even though refused.
    assert!(!sim.out_bool(paths::SYS_ESTOP_RESET));

    // Release alone does not recover.
    sim.store
        .write(paths::SYS_ESTOP_ACTIVE, Value::Bool(false))
        .unwrap();
    sim.tick();
    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::EmergencyHeld);

    // Release + reset recovers both lifts.
    sim.store
        .write(paths::SYS_ESTOP_RESET, Value::Bool(true))
        .unwrap();
    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::Ready);
    assert_eq!(sim.runner.lift(B).state, LiftState::Ready);
    assert_eq!(sim.runner.lift(A).fault, FaultCode::None);
    assert_eq!(sim.runner.lift(A).position, frozen_row);
}

// ─── Round Trip ─────────────────────────────────────────────────────

#[test]
fn bring_away_then_full_move_at_same_row_accepted() {
    let mut sim = Sim::new(40, 99);
    sim.runner.lift_mut(A).has_tray = true;

    sim.submit(A, TaskKind::BringAway, 0, 20);
    sim.run_job(A, 40);
    assert!(!sim.runner.lift(A).has_tray);
    assert_eq!(sim.runner.lift(A).position, 20);

    // No residual tray flag: a pickup at the same row is accepted.
    sim.submit(A, TaskKind::FullMove, 20, 45);
    sim.tick();
    assert!(sim.runner.lift(A).is_active());
    sim.run_job(A, 60);
    assert_eq!(sim.runner.lift(A).position, 45);
    assert!(!sim.runner.lift(A).has_tray);
}

// ─── Collision Soundness ────────────────────────────────────────────

#[test]
fn collision_soundness_directed_intervals() {
    // Lift A active with span [10, 20]; lift B proposes [15, 25].
    let mut sim = Sim::new(10, 25);
    sim.submit(A, TaskKind::FullMove, 12, 18);
    sim.tick();
    assert_eq!(sim.runner.lift(A).reach, Reach { low: 10, high: 20 });

    sim.submit(B, TaskKind::MoveTo, 15, 0);
    sim.tick();
    assert_eq!(sim.runner.lift(B).state, LiftState::Rejected);
    assert_eq!(sim.runner.lift(B).fault, FaultCode::LiftsCross);
}

#[test]
fn idle_peer_inside_span_does_not_block() {
    // Lift B idle at 30; lift A proposes a span containing 30.
    let mut sim = Sim::new(5, 30);
    sim.submit(A, TaskKind::MoveTo, 60, 0);
    sim.tick();
    assert!(sim.runner.lift(A).is_active());
}

// ─── Clear-Error Idempotence ────────────────────────────────────────

#[test]
fn clear_error_idempotent_while_healthy() {
    let mut sim = Sim::new(5, 99);

    for _ in 0..3 {
        sim.store
            .write(&paths::in_clear_error(A), Value::Bool(true))
            .unwrap();
        sim.tick();
        let lift = sim.runner.lift(A);
        assert_eq!(lift.state, LiftState::Ready);
        assert_eq!(lift.fault, FaultCode::None);
        // The edge is consumed each time.
        assert!(!sim.out_bool(&paths::in_clear_error(A)));
    }
}

// ─── Cancellation ───────────────────────────────────────────────────

#[test]
fn cancellation_aborts_job_and_publishes_reason() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::FullMove, 10, 90);
    sim.run_until(A, |r| r.lift(A).state == LiftState::MoveToTarget, 20);

    sim.store
        .write(&paths::in_cancel_code(A), Value::Int(9))
        .unwrap();
    sim.tick();

    let lift = sim.runner.lift(A);
    assert_eq!(lift.state, LiftState::Cancelled);
    assert!(!lift.is_active());
    assert_eq!(lift.cancel_reason, 9);
    assert_eq!(sim.out_int(&paths::out_cancel_reason(A)), 9);
    // The cancel code was consumed.
    assert_eq!(sim.out_int(&paths::in_cancel_code(A)), 0);

    // Handshake signal is back at the idle sentinel.
    assert_eq!(sim.out_int(paths::HANDSHAKE_JOB_TYPE), 0);
    assert_eq!(sim.out_int(paths::HANDSHAKE_ROW), 0);

    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::Ready);
}

// ─── Handshake Protocol ─────────────────────────────────────────────

#[test]
fn handshake_signal_published_and_cleared_after_ack() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::MoveTo, 30, 0);
    sim.run_until(A, |r| r.lift(A).state == LiftState::AwaitAck, 10);

    // Signal visible on the shared pair while awaiting acknowledgment.
    assert_eq!(
        sim.out_int(paths::HANDSHAKE_JOB_TYPE),
        TaskKind::MoveTo as u16 as i64
    );
    assert_eq!(sim.out_int(paths::HANDSHAKE_ROW), 30);

    sim.ack(A);
    sim.tick();
    // Consumed: ack flag and signal both reset.
    assert!(!sim.out_bool(&paths::in_ack_movement(A)));
    assert_eq!(sim.out_int(paths::HANDSHAKE_JOB_TYPE), 0);
    assert_eq!(sim.out_int(paths::HANDSHAKE_ROW), 0);
}

#[test]
fn handshake_never_times_out() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::MoveTo, 30, 0);
    sim.run_until(A, |r| r.lift(A).state == LiftState::AwaitAck, 10);

    // A hundred ticks without acknowledgment: still waiting, no fault.
    for _ in 0..100 {
        sim.tick();
    }
    let lift = sim.runner.lift(A);
    assert_eq!(lift.state, LiftState::AwaitAck);
    assert_eq!(lift.fault, FaultCode::None);
    assert_eq!(lift.position, 5);
}

#[test]
fn handshake_slot_serializes_both_lifts() {
    // Both lifts request disjoint moves in the same tick; the shared
    // signal slot serves them one after the other.
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::MoveTo, 20, 0);
    sim.submit(B, TaskKind::MoveTo, 80, 0);
    sim.tick();
    assert!(sim.runner.lift(A).is_active());
    assert!(sim.runner.lift(B).is_active());

    sim.tick();
    // Lift A (stepped first) owns the slot; B keeps retrying.
    assert_eq!(sim.runner.lift(A).state, LiftState::AwaitAck);
    assert_eq!(sim.runner.lift(B).state, LiftState::SignalHandshake);

    // Acknowledge A; B claims the freed slot and proceeds.
    sim.ack(A);
    sim.tick();
    sim.run_until(B, |r| r.lift(B).state == LiftState::AwaitAck, 10);
    assert_eq!(sim.out_int(paths::HANDSHAKE_ROW), 80);

    sim.ack(B);
    sim.run_until(B, |r| r.lift(B).state == LiftState::Complete, 40);
    assert_eq!(sim.runner.lift(B).position, 80);
}

// ─── Re-Arm Semantics ───────────────────────────────────────────────

#[test]
fn lingering_request_does_not_restart_after_completion() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::MoveTo, 30, 0);
    sim.run_until(A, |r| r.lift(A).state == LiftState::Complete, 30);

    // The request field is still set: the lift must stay idle.
    for _ in 0..10 {
        sim.tick();
        assert!(!sim.runner.lift(A).is_active());
    }

    sim.clear_request(A);
    sim.tick();
    sim.submit(A, TaskKind::MoveTo, 50, 0);
    sim.tick();
    assert!(sim.runner.lift(A).is_active());
}

#[test]
fn rejected_request_rearms_after_field_clears() {
    let mut sim = Sim::new(5, 99);
    sim.submit(A, TaskKind::FullMove, 10, 0);
    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::Rejected);

    sim.clear_request(A);
    sim.tick();
    assert_eq!(sim.runner.lift(A).state, LiftState::Ready);
    assert_eq!(sim.runner.lift(A).fault, FaultCode::None);
    assert_eq!(sim.out_int(&paths::out_fault_code(A)), 0);

    // Corrected retry goes through.
    sim.submit(A, TaskKind::FullMove, 10, 45);
    sim.tick();
    assert!(sim.runner.lift(A).is_active());
}
