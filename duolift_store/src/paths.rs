//! Canonical store paths for every core input and output.
//!
//! Per-lift paths are grouped under `lift_<label>/in/` (written by the
//! external client, read by the core) and `lift_<label>/out/` (written
//! by the core). The handshake pair is shared between the lifts, not
//! per-lift; system paths carry the global emergency-stop inputs.

use duolift::state::LiftId;

// ─── Shared Paths ───────────────────────────────────────────────────

/// Handshake signal: task kind being serviced (0 = idle sentinel).
pub const HANDSHAKE_JOB_TYPE: &str = "handshake/job_type";
/// Handshake signal: row the acknowledged movement targets.
pub const HANDSHAKE_ROW: &str = "handshake/row";

/// Emergency stop circuit state (true = asserted).
pub const SYS_ESTOP_ACTIVE: &str = "system/estop_active";
/// Emergency stop reset request (consumed by the core).
pub const SYS_ESTOP_RESET: &str = "system/estop_reset";

// ─── Per-Lift Input Paths (client → core) ───────────────────────────

/// Requested task kind (0 = no request).
pub fn in_task_kind(lift: LiftId) -> String {
    lift_path(lift, "in/task_kind")
}

/// Requested pickup row.
pub fn in_origin(lift: LiftId) -> String {
    lift_path(lift, "in/origin")
}

/// Requested delivery row.
pub fn in_destination(lift: LiftId) -> String {
    lift_path(lift, "in/destination")
}

/// Acknowledge-movement edge for the pending handshake.
pub fn in_ack_movement(lift: LiftId) -> String {
    lift_path(lift, "in/ack_movement")
}

/// Cancel-assignment reason code (0 = no cancellation).
pub fn in_cancel_code(lift: LiftId) -> String {
    lift_path(lift, "in/cancel_code")
}

/// Clear-error edge.
pub fn in_clear_error(lift: LiftId) -> String {
    lift_path(lift, "in/clear_error")
}

// ─── Per-Lift Output Paths (core → client) ──────────────────────────

/// Execution stage discriminant.
pub fn out_state(lift: LiftId) -> String {
    lift_path(lift, "out/state")
}

/// Coarse station status discriminant.
pub fn out_station_status(lift: LiftId) -> String {
    lift_path(lift, "out/station_status")
}

/// Current row.
pub fn out_row(lift: LiftId) -> String {
    lift_path(lift, "out/row")
}

/// Tray-present flag.
pub fn out_has_tray(lift: LiftId) -> String {
    lift_path(lift, "out/has_tray")
}

/// Current fork side discriminant.
pub fn out_fork_side(lift: LiftId) -> String {
    lift_path(lift, "out/fork_side")
}

/// Fault code (0 = healthy).
pub fn out_fault_code(lift: LiftId) -> String {
    lift_path(lift, "out/fault_code")
}

/// Short fault description.
pub fn out_fault_short(lift: LiftId) -> String {
    lift_path(lift, "out/fault_short")
}

/// Long fault description.
pub fn out_fault_long(lift: LiftId) -> String {
    lift_path(lift, "out/fault_long")
}

/// Remediation text.
pub fn out_fault_remedy(lift: LiftId) -> String {
    lift_path(lift, "out/fault_remedy")
}

/// Free-text comment for the current step.
pub fn out_step_comment(lift: LiftId) -> String {
    lift_path(lift, "out/step_comment")
}

/// Reason code of the last processed cancellation.
pub fn out_cancel_reason(lift: LiftId) -> String {
    lift_path(lift, "out/cancel_reason")
}

fn lift_path(lift: LiftId, suffix: &str) -> String {
    format!("lift_{}/{}", lift.label(), suffix)
}
