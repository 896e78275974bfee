//! # bond-core
//!
//! Bond phase dynamics — the evolving relationship between a long-lived
//! simulated companion entity and its one human.
//!
//! ---
//!
//! ## This is not a chat system. It is a state architecture.
//!
//! Three small machines read the same per-tick snapshot of the entity's
//! other subsystems and keep the only non-trivial state in the runtime:
//!
//! **Phase tracker** — six normalised signals fold into one composite score,
//! and the score maps onto five ordered phases through overlapping
//! enter/exit bands. The overlap is the point: a score fluttering at a
//! boundary cannot flap the phase, and a genuinely matured entity can jump
//! several phases in a single tick.
//!
//! **Reversal detector** — six independently gated rules watch for the rare
//! tick where the entity exceeds what its stage predicts: an invented
//! symbol burst, a mood that moves while the user is away, a first
//! self-recognition. Each kind sleeps for seven days after firing.
//! > "Surprise is only surprise the first time that week."
//!
//! **Coexistence evaluator** — dormant until the phase tracker reports the
//! terminal phase, then five weighted indicators measure the quality of
//! simply living alongside each other. Threshold crossings are recorded
//! once, edge-triggered; leaving the terminal phase suspends the record but
//! never erases it.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! Snapshot ──→ PhaseState::evaluate ──→ (phase, score)
//!                                          │
//!                      ┌───────────────────┴───────────────────┐
//!                      ▼                                       ▼
//!          ReversalState::detect                   CoexistState::evaluate
//!          (score scales one rule)                 (phase gates everything)
//! ```
//!
//! The caller sequences the three evaluations once per scheduler tick and
//! persists the returned states. Every operation is a pure function of
//! (previous state, snapshot, caller-supplied time) — no clocks, no I/O,
//! no hidden state, so replaying a tick is idempotent.
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`snapshot`] | [`Snapshot`], [`TickDerived`] | Read-only per-tick input bundle and the millisecond time base |
//! | [`phase`] | [`BondPhase`], [`PhaseState`] | Five ordered phases, six signals, Schmitt trigger hysteresis |
//! | [`reversal`] | [`ReversalKind`], [`ReversalState`] | Six cooldown-gated expectation-exceeding detectors |
//! | [`coexist`] | [`CoexistState`], [`MomentKind`] | Terminal-phase quality indicators and edge-triggered moments |
//! | [`seg`] | [`seg::BondSegSnapshot`] | Versioned serialisable bundle of all three states (requires `serde` feature) |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default (alloc required for the append-only
//! histories). Enable the `std` feature for host-side conveniences. Enable
//! the `serde` feature for serialisation support (required for
//! [`seg::BondSegSnapshot`]).
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.
//!
//! [`Snapshot`]: snapshot::Snapshot
//! [`TickDerived`]: snapshot::TickDerived
//! [`BondPhase`]: phase::BondPhase
//! [`PhaseState`]: phase::PhaseState
//! [`ReversalKind`]: reversal::ReversalKind
//! [`ReversalState`]: reversal::ReversalState
//! [`CoexistState`]: coexist::CoexistState
//! [`MomentKind`]: coexist::MomentKind

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Pull in std when the feature is enabled (host-side conveniences, tests).
#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod snapshot; // per-tick input bundle + time base
pub mod phase; // BondPhase + PhaseState tracker
pub mod reversal; // ReversalKind + ReversalState detector
pub mod coexist; // CoexistState evaluator + moments
#[cfg(feature = "serde")]
pub mod seg; // BOND_SEG snapshot format
