//! Collision arbiter for the shared shaft.
//!
//! Two lifts may never have overlapping occupied ranges while either
//! is active. The arbiter compares a proposed reach against a snapshot
//! of the peer lift taken at tick start (previous-tick semantics), so
//! the outcome does not depend on the order the lifts are stepped
//! within a tick.
//!
//! An idle peer does not block: a lift parked inside the proposed
//! range without a job is expected to be commanded away before the
//! accepted job's motion would actually conflict.

use crate::reach::Reach;

/// Read-only view of the peer lift used for arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerSnapshot {
    /// The peer's occupied range as of tick start.
    pub reach: Reach,
    /// Whether the peer holds a validated or executing job.
    pub active: bool,
}

impl PeerSnapshot {
    /// Snapshot of an idle peer parked at a projected position.
    pub const fn idle_at(position: i32) -> Self {
        Self {
            reach: Reach::point(position),
            active: false,
        }
    }
}

/// Whether two closed intervals overlap on the shaft axis.
#[inline]
pub const fn ranges_overlap(a: &Reach, b: &Reach) -> bool {
    !(a.high < b.low || a.low > b.high)
}

/// Whether a proposed reach collides with the peer.
///
/// Overlap only matters while the peer is active.
#[inline]
pub const fn check_crossing(proposed: &Reach, peer: &PeerSnapshot) -> bool {
    peer.active && ranges_overlap(proposed, &peer.reach)
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn span(low: i32, high: i32) -> Reach {
        Reach { low, high }
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(&span(1, 5), &span(6, 10)));
        assert!(!ranges_overlap(&span(6, 10), &span(1, 5)));
    }

    #[test]
    fn touching_bounds_overlap() {
        // Closed intervals: sharing one row is a conflict.
        assert!(ranges_overlap(&span(1, 5), &span(5, 10)));
        assert!(ranges_overlap(&span(5, 10), &span(1, 5)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(ranges_overlap(&span(0, 100), &span(40, 60)));
        assert!(ranges_overlap(&span(40, 60), &span(0, 100)));
    }

    #[test]
    fn crossing_requires_active_peer() {
        let proposed = span(15, 25);
        let busy_peer = PeerSnapshot {
            reach: span(10, 20),
            active: true,
        };
        assert!(check_crossing(&proposed, &busy_peer));

        // Same geometry, idle peer: no conflict.
        let idle_peer = PeerSnapshot {
            reach: span(10, 20),
            active: false,
        };
        assert!(!check_crossing(&proposed, &idle_peer));
    }

    #[test]
    fn idle_peer_inside_range_does_not_block() {
        let proposed = span(1, 50);
        let parked = PeerSnapshot::idle_at(30);
        assert!(!check_crossing(&proposed, &parked));
    }

    #[test]
    fn active_peer_outside_range_does_not_block() {
        let proposed = span(1, 20);
        let peer = PeerSnapshot {
            reach: span(30, 60),
            active: true,
        };
        assert!(!check_crossing(&proposed, &peer));
    }
}
