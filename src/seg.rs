//! BOND_SEG — portable snapshot of the three bond states for persistence
//! and transport.
//!
//! The bond core produces no file format of its own: the host decides
//! whether state lands in markdown, JSON or anything else. This module is
//! the serializer-facing surface — one versioned container holding the
//! phase tracker, reversal detector and coexistence evaluator states
//! exactly as they were returned, so any external formatter can round-trip
//! them without loss.
//!
//! # no_std
//!
//! Requires the `serde` feature; compatible with no_std + alloc.

use crate::coexist::CoexistState;
use crate::phase::PhaseState;
use crate::reversal::ReversalState;
use crate::snapshot::Timestamp;

/// Magic bytes identifying a BOND_SEG blob: "BNDS".
pub const BOND_SEG_MAGIC: u32 = 0x42_4e_44_53;

/// Current BOND_SEG format version.
pub const BOND_SEG_VERSION: u16 = 1;

/// A serializable snapshot of all three persisted bond states.
///
/// # Example
///
/// ```rust,ignore
/// use bond_core::seg::BondSegSnapshot;
///
/// let snapshot = BondSegSnapshot::from_states(&phase, &reversal, &coexist, now);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// let restored: BondSegSnapshot = serde_json::from_str(&json).unwrap();
/// let (phase, reversal, coexist) = restored.restore();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct BondSegSnapshot {
    /// Format version — always [`BOND_SEG_VERSION`] for newly created snapshots.
    pub version: u16,
    /// Caller-supplied time the snapshot was taken (Unix ms, 0 if unknown).
    pub saved_at: Timestamp,
    /// Phase tracker state.
    pub phase: PhaseState,
    /// Reversal detector state.
    pub reversal: ReversalState,
    /// Coexistence evaluator state.
    pub coexist: CoexistState,
}

impl BondSegSnapshot {
    /// Capture the three live states.
    pub fn from_states(
        phase: &PhaseState,
        reversal: &ReversalState,
        coexist: &CoexistState,
        saved_at: Timestamp,
    ) -> Self {
        Self {
            version: BOND_SEG_VERSION,
            saved_at,
            phase: phase.clone(),
            reversal: reversal.clone(),
            coexist: coexist.clone(),
        }
    }

    /// Hand the three states back to the caller, consuming the snapshot.
    pub fn restore(self) -> (PhaseState, ReversalState, CoexistState) {
        (self.phase, self.reversal, self.coexist)
    }
}
