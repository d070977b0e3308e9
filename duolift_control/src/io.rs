//! Typed reads and writes between the core and the variable store.
//!
//! Inputs are read into a per-tick snapshot; a path the client has not
//! written yet reads as its unset default. Consumed edges (ack,
//! cancel, clear-error, estop reset) are written back to their unset
//! values by the core, per the handshake contract. Outputs are
//! published after every lift step so external readers always see the
//! current tick's state.

use duolift::fault::{fault_text, RequestFlags};
use duolift::state::LiftId;
use duolift_store::{paths, StoreError, Value, VarStore};

use crate::handshake::HandshakeSlot;
use crate::lift::{Consumed, Lift};

// ─── Inputs ─────────────────────────────────────────────────────────

/// Per-lift input snapshot for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiftInputs {
    /// Requested task kind (0 = no request).
    pub task_kind: u16,
    /// Requested pickup row.
    pub origin: u16,
    /// Requested delivery row.
    pub destination: u16,
    /// Acknowledge-movement edge.
    pub ack_movement: bool,
    /// Cancel-assignment reason code (0 = none).
    pub cancel_code: u16,
    /// Clear-error edge.
    pub clear_error: bool,
}

impl LiftInputs {
    /// No client activity; useful in tests.
    pub const fn none() -> Self {
        Self {
            task_kind: 0,
            origin: 0,
            destination: 0,
            ack_movement: false,
            cancel_code: 0,
            clear_error: false,
        }
    }

    /// Request flags for priority dispatch.
    pub fn flags(&self) -> RequestFlags {
        let mut flags = RequestFlags::empty();
        if self.cancel_code != 0 {
            flags.insert(RequestFlags::CANCEL);
        }
        if self.clear_error {
            flags.insert(RequestFlags::CLEAR_ERROR);
        }
        if self.ack_movement {
            flags.insert(RequestFlags::ACK_MOVEMENT);
        }
        flags
    }
}

/// Global input snapshot for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemInputs {
    /// Emergency stop circuit asserted.
    pub estop_active: bool,
    /// Emergency stop reset requested.
    pub estop_reset: bool,
}

/// Clamp a store integer into the row/code domain.
fn field(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}

/// Read one lift's inputs.
pub fn read_lift_inputs(store: &dyn VarStore, lift: LiftId) -> Result<LiftInputs, StoreError> {
    Ok(LiftInputs {
        task_kind: field(store.read_int_or(&paths::in_task_kind(lift), 0)?),
        origin: field(store.read_int_or(&paths::in_origin(lift), 0)?),
        destination: field(store.read_int_or(&paths::in_destination(lift), 0)?),
        ack_movement: store.read_bool_or(&paths::in_ack_movement(lift), false)?,
        cancel_code: field(store.read_int_or(&paths::in_cancel_code(lift), 0)?),
        clear_error: store.read_bool_or(&paths::in_clear_error(lift), false)?,
    })
}

/// Write consumed input edges back to their unset values.
pub fn consume_lift_inputs(
    store: &dyn VarStore,
    lift: LiftId,
    consumed: &Consumed,
) -> Result<(), StoreError> {
    if consumed.ack {
        store.write(&paths::in_ack_movement(lift), Value::Bool(false))?;
    }
    if consumed.cancel {
        store.write(&paths::in_cancel_code(lift), Value::Int(0))?;
    }
    if consumed.clear_error {
        store.write(&paths::in_clear_error(lift), Value::Bool(false))?;
    }
    Ok(())
}

/// Read the global inputs.
pub fn read_system_inputs(store: &dyn VarStore) -> Result<SystemInputs, StoreError> {
    Ok(SystemInputs {
        estop_active: store.read_bool_or(paths::SYS_ESTOP_ACTIVE, false)?,
        estop_reset: store.read_bool_or(paths::SYS_ESTOP_RESET, false)?,
    })
}

/// Consume the estop reset edge.
pub fn consume_estop_reset(store: &dyn VarStore) -> Result<(), StoreError> {
    store.write(paths::SYS_ESTOP_RESET, Value::Bool(false))
}

// ─── Outputs ────────────────────────────────────────────────────────

/// Publish one lift's outputs for this tick.
pub fn publish_lift_outputs(store: &dyn VarStore, lift: &Lift) -> Result<(), StoreError> {
    let id = lift.id;
    store.write(&paths::out_state(id), Value::Int(lift.state as u8 as i64))?;
    store.write(
        &paths::out_station_status(id),
        Value::Int(lift.station_status() as u8 as i64),
    )?;
    store.write(&paths::out_row(id), Value::from(lift.position))?;
    store.write(&paths::out_has_tray(id), Value::Bool(lift.has_tray))?;
    store.write(
        &paths::out_fork_side(id),
        Value::Int(lift.fork_side as u8 as i64),
    )?;
    store.write(
        &paths::out_fault_code(id),
        Value::Int(lift.fault as u16 as i64),
    )?;

    let text = fault_text(lift.fault);
    store.write(&paths::out_fault_short(id), Value::from(text.short))?;
    store.write(&paths::out_fault_long(id), Value::from(text.long))?;
    store.write(&paths::out_fault_remedy(id), Value::from(text.remedy))?;
    store.write(
        &paths::out_step_comment(id),
        Value::from(lift.step_comment.as_str()),
    )?;
    store.write(
        &paths::out_cancel_reason(id),
        Value::from(lift.cancel_reason),
    )?;
    Ok(())
}

/// Publish the shared handshake signal.
pub fn publish_handshake(store: &dyn VarStore, slot: &HandshakeSlot) -> Result<(), StoreError> {
    store.write(paths::HANDSHAKE_JOB_TYPE, Value::from(slot.job_type()))?;
    store.write(paths::HANDSHAKE_ROW, Value::from(slot.row()))?;
    Ok(())
}
