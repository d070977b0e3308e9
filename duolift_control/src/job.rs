//! Job intake validation.
//!
//! Runs once, synchronously, when a new request is read at the ready
//! state. Checks run in a fixed order and the first failing check
//! wins; the collision check comes last so a malformed request never
//! reaches the arbiter.

use duolift::layout::ShaftLayout;
use duolift::task::{RejectReason, TaskKind, FIELD_UNSET};

use crate::arbiter::{check_crossing, PeerSnapshot};
use crate::reach::{compute_reach, Reach};

/// Outcome of validating a task request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Accepted; carries the decoded kind and the prospective reach to
    /// store as the lift's occupied range.
    Accept { kind: TaskKind, reach: Reach },
    /// Rejected with the first failing reason.
    Reject(RejectReason),
}

/// Validate a raw task request against the lift and its peer.
///
/// Check order (first failure wins):
/// 1. pickup-class request while a tray is present
/// 2. unset row fields per task kind
/// 3. `BringAway` preconditions (tray present, destination set)
/// 4. unknown task kind
/// 5. row numbers outside rack and service rows
/// 6. occupied-range overlap with the active peer
pub fn validate(
    kind_raw: u16,
    origin: u16,
    destination: u16,
    has_tray: bool,
    current_row: u16,
    peer: &PeerSnapshot,
    layout: &ShaftLayout,
) -> Validation {
    let kind = TaskKind::from_u16(kind_raw);

    // 1. Tray conflict for pickup-class kinds.
    if matches!(kind, Some(k) if k.is_pickup_class()) && has_tray {
        return Validation::Reject(RejectReason::PickupWithTrayPresent);
    }

    // 2. Unset-field validity per kind.
    match kind {
        Some(TaskKind::FullMove) => {
            if origin == FIELD_UNSET || destination == FIELD_UNSET {
                return Validation::Reject(RejectReason::InvalidZeroPosition);
            }
        }
        Some(TaskKind::MoveTo) | Some(TaskKind::PreparePickup) => {
            if origin == FIELD_UNSET {
                return Validation::Reject(RejectReason::InvalidZeroPosition);
            }
        }
        _ => {}
    }

    // 3. BringAway preconditions.
    if kind == Some(TaskKind::BringAway) {
        if !has_tray {
            return Validation::Reject(RejectReason::InvalidAssignment);
        }
        if destination == FIELD_UNSET {
            return Validation::Reject(RejectReason::InvalidZeroPosition);
        }
    }

    // 4. Unknown task kind (or the idle sentinel).
    let kind = match kind {
        Some(k) if k != TaskKind::None => k,
        _ => return Validation::Reject(RejectReason::InvalidAssignment),
    };

    // 5. Row numbers must be usable rows.
    let in_range = match kind {
        TaskKind::FullMove => layout.is_valid_row(origin) && layout.is_valid_row(destination),
        TaskKind::MoveTo | TaskKind::PreparePickup => layout.is_valid_row(origin),
        TaskKind::BringAway => layout.is_valid_row(destination),
        TaskKind::None => false,
    };
    if !in_range {
        return Validation::Reject(RejectReason::InvalidZeroPosition);
    }

    // 6. Collision against the active peer, on the full path.
    let reach = compute_reach(kind, origin, destination, current_row, layout);
    if check_crossing(&reach, peer) {
        return Validation::Reject(RejectReason::LiftsCross);
    }

    Validation::Accept { kind, reach }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ShaftLayout {
        ShaftLayout::default()
    }

    fn idle_peer() -> PeerSnapshot {
        PeerSnapshot::idle_at(80)
    }

    fn busy_peer(low: i32, high: i32) -> PeerSnapshot {
        PeerSnapshot {
            reach: Reach { low, high },
            active: true,
        }
    }

    #[test]
    fn full_move_accepted_with_reach() {
        let v = validate(1, 10, 90, false, 5, &idle_peer(), &layout());
        match v {
            Validation::Accept { kind, reach } => {
                assert_eq!(kind, TaskKind::FullMove);
                assert_eq!(reach, Reach { low: 5, high: 92 });
            }
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[test]
    fn pickup_with_tray_present_rejected_first() {
        // Tray conflict wins even though the rows are also invalid.
        let v = validate(1, 0, 0, true, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::PickupWithTrayPresent));

        let v = validate(3, 0, 0, true, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::PickupWithTrayPresent));
    }

    #[test]
    fn full_move_with_zero_field_rejected() {
        let v = validate(1, 10, 0, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));

        let v = validate(1, 0, 90, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));
    }

    #[test]
    fn move_to_and_prepare_need_origin() {
        let v = validate(2, 0, 50, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));

        let v = validate(3, 0, 0, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));
    }

    #[test]
    fn bring_away_needs_tray_then_destination() {
        let v = validate(4, 0, 50, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidAssignment));

        let v = validate(4, 0, 0, true, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));

        let v = validate(4, 0, 50, true, 5, &idle_peer(), &layout());
        assert!(matches!(v, Validation::Accept { .. }));
    }

    #[test]
    fn unknown_kind_rejected() {
        let v = validate(9, 10, 90, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidAssignment));

        // The idle sentinel is not a schedulable task either.
        let v = validate(0, 10, 90, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidAssignment));
    }

    #[test]
    fn out_of_rack_row_rejected() {
        let v = validate(2, 250, 0, false, 5, &idle_peer(), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));
    }

    #[test]
    fn service_rows_are_valid_targets() {
        let lay = layout();
        let v = validate(2, lay.service_top_row, 0, false, 5, &idle_peer(), &lay);
        assert!(matches!(v, Validation::Accept { .. }));
    }

    #[test]
    fn crossing_with_active_peer_rejected() {
        // Directed case: peer spans [10,20], request spans [15,25].
        let v = validate(2, 15, 0, false, 25, &busy_peer(10, 20), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::LiftsCross));
    }

    #[test]
    fn idle_peer_inside_span_does_not_reject() {
        let peer = PeerSnapshot::idle_at(30);
        let v = validate(2, 15, 0, false, 45, &peer, &layout());
        assert!(matches!(v, Validation::Accept { .. }));
    }

    #[test]
    fn collision_check_runs_last() {
        // Malformed request overlapping the peer still reports the
        // field problem, not the crossing.
        let v = validate(1, 0, 18, false, 15, &busy_peer(10, 20), &layout());
        assert_eq!(v, Validation::Reject(RejectReason::InvalidZeroPosition));
    }
}
