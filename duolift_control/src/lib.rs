//! # Duolift Control
//!
//! Control core for two stacker cranes sharing one vertical shaft.
//!
//! Each lift runs a named-stage job state machine (intake → validation
//! → handshake → motion → tray transfer → completion) driven by a
//! single-threaded cooperative tick loop. A collision arbiter compares
//! the lifts' occupied intervals on the shared axis and rejects any
//! request whose prospective range overlaps the active peer's range.
//!
//! All external traffic flows through the injected variable store
//! (`duolift_store`): task requests, acknowledgments, cancellations,
//! and error clears come in; lift state, fault text, and the shared
//! handshake signal go out.

pub mod arbiter;
pub mod config;
pub mod cycle;
pub mod estop;
pub mod handshake;
pub mod io;
pub mod job;
pub mod lift;
pub mod reach;
pub mod submotion;
