//! Occupied-interval calculator.
//!
//! Maps a lift's job (or lack of one) and current position to the
//! interval it reserves on the shared shaft axis. All arithmetic runs
//! on projected physical coordinates; the pickup offset models the
//! vertical overshoot needed to lift a tray clear of its rack.

use duolift::layout::ShaftLayout;
use duolift::task::TaskKind;

/// A closed interval on the projected shaft axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reach {
    pub low: i32,
    pub high: i32,
}

impl Reach {
    /// Degenerate single-point interval.
    #[inline]
    pub const fn point(at: i32) -> Self {
        Self { low: at, high: at }
    }

    /// Interval invariant.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.low <= self.high
    }
}

/// Compute the interval a lift reserves for a job.
///
/// `origin` and `destination` are logical rows as requested; only the
/// fields the task kind actually uses enter the computation. With no
/// job (`TaskKind::None`) the reach degenerates to the current
/// position.
///
/// For `FullMove` with `origin == destination` the reach collapses to
/// `current..current + offset` no matter where the rows lie. Inherited
/// from the legacy controller; see the documenting test below before
/// changing it.
pub fn compute_reach(
    kind: TaskKind,
    origin: u16,
    destination: u16,
    current_row: u16,
    layout: &ShaftLayout,
) -> Reach {
    let current = layout.project_row(current_row);
    let offset = layout.pickup_offset as i32;

    match kind {
        TaskKind::None => Reach::point(current),

        // Pure reposition: span to the single target, no overshoot.
        TaskKind::MoveTo => {
            let target = layout.project_row(origin);
            Reach {
                low: current.min(target),
                high: current.max(target),
            }
        }

        TaskKind::FullMove => {
            if origin == destination {
                return Reach {
                    low: current,
                    high: current + offset,
                };
            }
            let o = layout.project_row(origin);
            let d = layout.project_row(destination);
            Reach {
                low: current.min(o.min(d)),
                high: current.max(o.max(d) + offset),
            }
        }

        TaskKind::PreparePickup => {
            let o = layout.project_row(origin);
            Reach {
                low: current.min(o),
                high: current.max(o + offset),
            }
        }

        TaskKind::BringAway => {
            let d = layout.project_row(destination);
            Reach {
                low: current.min(d),
                high: current.max(d + offset),
            }
        }
    }
}
