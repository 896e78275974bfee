/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Bond phase classification — six signals, one composite score, five
//! ordered phases with Schmitt trigger hysteresis.
//!
//! - [`PhaseSignals`]: deterministic signal formulas over a [`Snapshot`].
//! - [`BondPhase`]: five-variant ordered phase with per-phase enter/exit bands.
//! - [`PhaseState`]: persisted tracker state with an append-only transition log.
//!
//! # Invariants
//!
//! - **BND-001**: `transitions` only grows, and consecutive entries never
//!   share identical from/to phases.
//! - **BND-002**: signals, score and confidence are bounded [0, 100];
//!   out-of-range inputs clamp, never error.
//! - **BND-003**: adjacent phase bands overlap (enter of the next below exit
//!   of the current) so a score fluctuating inside the dead zone holds the
//!   current phase in both directions.

use crate::snapshot::{clamp100, log2_nr, round_pct, Snapshot, Timestamp};

extern crate alloc;

use alloc::vec::Vec;

// ─── BondPhase ──────────────────────────────────────────────────────────────

/// Relationship phase, lowest to terminal.
///
/// Total order follows declaration order: `Encounter < Familiar < Companion
/// < Attuned < Coexistent`. The order is load-bearing — hysteresis scans and
/// the coexistence gate compare phases directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BondPhase {
    /// First contact: the entity barely registers the user.
    Encounter,
    /// The user is recognised and expected.
    Familiar,
    /// Steady shared routine.
    Companion,
    /// Mutual anticipation without prompting.
    Attuned,
    /// Terminal phase: comfortable coexistence.
    Coexistent,
}

/// Score band for one phase.
///
/// `enter` is the band floor (the score required to move into the phase from
/// below); `exit` is the band ceiling (the score that must be exceeded to
/// leave upward). Adjacent bands overlap — e.g. [`BondPhase::Encounter`]
/// exits at 18 while [`BondPhase::Familiar`] enters at 15 — producing a dead
/// zone that absorbs boundary flutter (BND-003).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseBand {
    /// Band floor: minimum score to enter (and hold) the phase.
    pub enter: u8,
    /// Band ceiling: score must exceed this to ascend out of the phase.
    pub exit: u8,
}

impl PhaseBand {
    /// Position of `score` within this band as a 0–100 percentage.
    pub fn position(&self, score: u8) -> u8 {
        let width = (self.exit - self.enter) as f32;
        if width <= 0.0 {
            return 0;
        }
        let offset = score.saturating_sub(self.enter) as f32;
        round_pct(offset / width * 100.0)
    }
}

impl BondPhase {
    /// All phases, lowest to terminal. Scan order for hysteresis.
    pub const ALL: [BondPhase; 5] = [
        BondPhase::Encounter,
        BondPhase::Familiar,
        BondPhase::Companion,
        BondPhase::Attuned,
        BondPhase::Coexistent,
    ];

    /// Zero-based position in the phase order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this is the terminal phase.
    pub fn is_terminal(self) -> bool {
        self == BondPhase::Coexistent
    }

    /// The enter/exit score band for this phase.
    pub const fn band(self) -> PhaseBand {
        match self {
            BondPhase::Encounter => PhaseBand { enter: 0, exit: 18 },
            BondPhase::Familiar => PhaseBand { enter: 15, exit: 38 },
            BondPhase::Companion => PhaseBand { enter: 35, exit: 58 },
            BondPhase::Attuned => PhaseBand { enter: 55, exit: 78 },
            BondPhase::Coexistent => PhaseBand { enter: 75, exit: 100 },
        }
    }

    /// Human-readable phase label.
    pub fn label(self) -> &'static str {
        match self {
            BondPhase::Encounter => "encounter",
            BondPhase::Familiar => "familiar",
            BondPhase::Companion => "companion",
            BondPhase::Attuned => "attuned",
            BondPhase::Coexistent => "coexistent",
        }
    }

    /// Determine the phase for `score` given the previous phase, with
    /// Schmitt trigger hysteresis.
    ///
    /// Ascent requires the score to clear the current band's ceiling; the
    /// landing phase is then the *highest* one whose enter threshold the
    /// score meets, so a large single-tick score jump moves straight to the
    /// matching phase. Descent requires the score to fall below the current
    /// band's floor; the landing phase is again the highest satisfying one
    /// below — a multi-phase drop records as a single jump, not a cascade.
    /// Inside the band (dead zone included) the previous phase holds.
    pub fn reclassify(score: u8, prev: BondPhase) -> BondPhase {
        let band = prev.band();

        if score > band.exit {
            for p in BondPhase::ALL.iter().rev() {
                if *p > prev && score >= p.band().enter {
                    return *p;
                }
            }
        }

        if score < band.enter {
            for p in BondPhase::ALL.iter().rev() {
                if *p < prev && score >= p.band().enter {
                    return *p;
                }
            }
            return BondPhase::Encounter;
        }

        prev
    }
}

impl core::fmt::Display for BondPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── PhaseSignals ───────────────────────────────────────────────────────────

/// The six normalised bond signals, each in [0.0, 100.0].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSignals {
    /// Language level scaled to 0–100.
    pub language_maturity: f32,
    /// Average daily interactions, saturating at 10/day.
    pub initiative_balance: f32,
    /// Weighted tiered-memory richness.
    pub memory_depth: f32,
    /// Growth-stage base plus a small form-complexity bonus.
    pub emotional_complexity: f32,
    /// Form solidity blended with invented-symbol count.
    pub identity_strength: f32,
    /// Logarithmic growth-day maturity.
    pub temporal_maturity: f32,
}

impl PhaseSignals {
    /// All-zero signals for a freshly created tracker.
    pub fn zero() -> Self {
        Self {
            language_maturity: 0.0,
            initiative_balance: 0.0,
            memory_depth: 0.0,
            emotional_complexity: 0.0,
            identity_strength: 0.0,
            temporal_maturity: 0.0,
        }
    }

    /// Compute all six signals from a snapshot.
    ///
    /// Memory depth caps each tier (30/30/20/20) so no single tier can
    /// dominate. Temporal maturity is deliberately logarithmic: early days
    /// move the signal quickly, later days barely at all.
    pub fn compute(snap: &Snapshot) -> Self {
        let language_maturity = clamp100(snap.status.language_level.min(4) as f32 * 25.0);

        let initiative_balance = clamp100(snap.interactions_per_day() * 10.0);

        let m = &snap.memory;
        let memory_depth = (m.hot_count as f32 * 3.0).min(30.0)
            + (m.warm_count as f32 * 3.0).min(30.0)
            + (m.cold_count as f32 * 4.0).min(20.0)
            + (m.note_count as f32 * 2.0).min(20.0);

        let emotional_complexity =
            clamp100(snap.stage.emotional_base() + clamp100(snap.form.complexity) * 0.1);

        let solidity = (clamp100(snap.form.density) + clamp100(snap.form.stability)) / 2.0;
        let symbols = (snap.language.native_symbols as f32 * 4.0).min(100.0);
        let identity_strength = clamp100(solidity * 0.5 + symbols * 0.5);

        let temporal_maturity =
            clamp100(log2_nr(snap.status.growth_day as f32 + 1.0) * 11.0);

        Self {
            language_maturity,
            initiative_balance,
            memory_depth,
            emotional_complexity,
            identity_strength,
            temporal_maturity,
        }
    }

    /// Weighted composite score, rounded and clamped to [0, 100].
    ///
    /// | Signal | Weight |
    /// |--------|--------|
    /// | language maturity | 0.20 |
    /// | initiative balance | 0.10 |
    /// | memory depth | 0.15 |
    /// | emotional complexity | 0.20 |
    /// | identity strength | 0.10 |
    /// | temporal maturity | 0.25 |
    pub fn composite(&self) -> u8 {
        round_pct(
            self.language_maturity * 0.20
                + self.initiative_balance * 0.10
                + self.memory_depth * 0.15
                + self.emotional_complexity * 0.20
                + self.identity_strength * 0.10
                + self.temporal_maturity * 0.25,
        )
    }
}

// ─── PhaseState ─────────────────────────────────────────────────────────────

/// One recorded phase change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTransition {
    /// Phase before the change.
    pub from: BondPhase,
    /// Phase after the change.
    pub to: BondPhase,
    /// When the change was recorded.
    pub at: Timestamp,
    /// Composite score at the moment of the change.
    pub score: u8,
}

/// Persisted phase-tracker state, updated once per tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseState {
    /// Current phase.
    pub phase: BondPhase,
    /// Position of the score within the current band, 0–100.
    pub confidence: u8,
    /// The six signals from the most recent evaluation.
    pub signals: PhaseSignals,
    /// Append-only log of every phase change (BND-001).
    pub transitions: Vec<PhaseTransition>,
    /// Composite score from the most recent evaluation.
    pub score: u8,
}

impl PhaseState {
    /// Fresh tracker: lowest phase, zero score, empty log.
    pub fn new() -> Self {
        Self {
            phase: BondPhase::Encounter,
            confidence: 0,
            signals: PhaseSignals::zero(),
            transitions: Vec::new(),
            score: 0,
        }
    }

    /// The most recent recorded transition, if any.
    pub fn latest_transition(&self) -> Option<&PhaseTransition> {
        self.transitions.last()
    }

    /// Evaluate one tick: recompute signals and score, reclassify the phase
    /// with hysteresis, and append a transition entry iff the phase changed.
    ///
    /// Pure: `self` is not mutated; re-running with identical inputs yields
    /// an identical state and no extra transition entries. Confidence is the
    /// score's position within the landing band, except on a downward jump
    /// where it is pinned to 50 (the landing score sits at the bottom of the
    /// band and would read as spuriously low certainty).
    pub fn evaluate(&self, snap: &Snapshot, now: Timestamp) -> PhaseState {
        let signals = PhaseSignals::compute(snap);
        let score = signals.composite();
        let phase = BondPhase::reclassify(score, self.phase);

        let confidence = if phase < self.phase {
            50
        } else {
            phase.band().position(score)
        };

        let mut transitions = self.transitions.clone();
        if phase != self.phase {
            transitions.push(PhaseTransition {
                from: self.phase,
                to: phase,
                at: now,
                score,
            });
        }

        PhaseState {
            phase,
            confidence,
            signals,
            transitions,
            score,
        }
    }
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
