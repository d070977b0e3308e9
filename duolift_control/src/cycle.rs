//! Cooperative tick loop driving both lifts.
//!
//! Single-threaded: each tick reads the global inputs, snapshots both
//! lifts' occupied ranges and activity flags, then steps lift A and
//! lift B in that order against the snapshots. Because both snapshots
//! are taken before either lift moves, arbitration always compares
//! against the peer's state as of tick start — the outcome does not
//! depend on step order within the tick.
//!
//! No lift logic blocks the loop; every wait is a stay-in-stage
//! re-evaluation on the next tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use duolift::config::ConfigError;
use duolift::state::LiftId;
use duolift_store::{StoreError, VarStore};

use crate::arbiter::PeerSnapshot;
use crate::config::SimConfig;
use crate::estop::EstopController;
use crate::handshake::HandshakeSlot;
use crate::io;
use crate::lift::Lift;

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors surfaced by the tick driver.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Store access failed.
    #[error("store access failed: {0}")]
    Store(#[from] StoreError),
    /// Configuration rejected at startup.
    #[error("configuration invalid: {0}")]
    Config(#[from] ConfigError),
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics, updated every tick without
/// allocation.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    /// Total ticks executed.
    pub cycle_count: u64,
    /// Last tick computation time [ns].
    pub last_cycle_ns: u64,
    /// Maximum tick computation time [ns].
    pub max_cycle_ns: u64,
    /// Ticks whose computation exceeded the cadence budget.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            max_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record one tick. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration: Duration, budget: Duration) {
        let ns = duration.as_nanos() as u64;
        self.cycle_count += 1;
        self.last_cycle_ns = ns;
        if ns > self.max_cycle_ns {
            self.max_cycle_ns = ns;
        }
        if duration > budget {
            self.overruns += 1;
        }
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Owns the process-scoped simulation state and drives it tick by
/// tick. Created once at startup; no ambient globals.
pub struct CycleRunner {
    /// Validated configuration.
    pub config: SimConfig,
    /// Both lifts, A first.
    pub lifts: [Lift; 2],
    /// Global emergency-stop latch.
    pub estop: EstopController,
    /// Tick statistics.
    pub stats: CycleStats,
    store: Arc<dyn VarStore>,
    shake: HandshakeSlot,
}

impl CycleRunner {
    /// Validate the configuration and build the runtime.
    pub fn new(config: SimConfig, store: Arc<dyn VarStore>) -> Result<Self, CycleError> {
        config.validate()?;
        let lifts = [
            Lift::new(
                LiftId::A,
                &config.lifts[0].name,
                config.lifts[0].initial_row,
                &config,
            ),
            Lift::new(
                LiftId::B,
                &config.lifts[1].name,
                config.lifts[1].initial_row,
                &config,
            ),
        ];
        Ok(Self {
            config,
            lifts,
            estop: EstopController::new(),
            stats: CycleStats::new(),
            store,
            shake: HandshakeSlot::new(),
        })
    }

    /// One lift, by identity.
    #[inline]
    pub fn lift(&self, id: LiftId) -> &Lift {
        &self.lifts[id.index()]
    }

    /// One lift, mutable.
    #[inline]
    pub fn lift_mut(&mut self, id: LiftId) -> &mut Lift {
        &mut self.lifts[id.index()]
    }

    /// The shared handshake signal.
    #[inline]
    pub fn handshake(&self) -> &HandshakeSlot {
        &self.shake
    }

    /// Execute one tick at simulated time `now`.
    pub fn tick(&mut self, now: Instant) -> Result<(), CycleError> {
        let started = Instant::now();

        // ═══ READ PHASE ═══
        let sys = io::read_system_inputs(self.store.as_ref())?;
        self.estop.set_asserted(sys.estop_active);
        if sys.estop_reset {
            io::consume_estop_reset(self.store.as_ref())?;
            self.estop.request_reset();
        }
        let held = self.estop.is_held();

        // Previous-tick snapshots: taken before either lift steps.
        let snapshots = [
            PeerSnapshot {
                reach: self.lifts[0].reach,
                active: self.lifts[0].is_active(),
            },
            PeerSnapshot {
                reach: self.lifts[1].reach,
                active: self.lifts[1].is_active(),
            },
        ];

        // ═══ PROCESS + WRITE PHASE ═══
        for id in [LiftId::A, LiftId::B] {
            let inputs = io::read_lift_inputs(self.store.as_ref(), id)?;
            let peer = snapshots[id.peer().index()];
            let consumed = self.lifts[id.index()].step(
                now,
                &inputs,
                &peer,
                &mut self.shake,
                held,
                &self.config,
            );
            io::consume_lift_inputs(self.store.as_ref(), id, &consumed)?;
            io::publish_lift_outputs(self.store.as_ref(), &self.lifts[id.index()])?;
        }
        io::publish_handshake(self.store.as_ref(), &self.shake)?;

        self.stats
            .record(started.elapsed(), self.config.timing.cycle_interval());
        Ok(())
    }

    /// Run the tick loop until `running` is cleared.
    ///
    /// Paces ticks at the configured cadence with plain sleeps; an
    /// overrun is counted, not fatal — this is a simulator, not a
    /// hard-deadline controller.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), CycleError> {
        info!(
            service = %self.config.shared.service_name,
            cadence_ms = self.config.timing.cycle_interval_ms,
            "entering tick loop"
        );
        let cadence = self.config.timing.cycle_interval();

        while running.load(Ordering::SeqCst) {
            let started = Instant::now();
            self.tick(started)?;

            if let Some(remaining) = cadence.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            } else {
                debug!(tick = self.stats.cycle_count, "tick overran its cadence");
            }
        }

        info!(
            cycles = self.stats.cycle_count,
            overruns = self.stats.overruns,
            "tick loop stopped"
        );
        Ok(())
    }
}
