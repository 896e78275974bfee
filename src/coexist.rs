//! Coexistence quality — measured only while the bond sits in its terminal
//! phase.
//!
//! While the phase tracker reports [`BondPhase::Coexistent`], five weighted
//! indicators are recomputed from scratch each tick and blended into a
//! single quality score. Crossing an indicator threshold from below records
//! an edge-triggered [`Moment`]. Outside the terminal phase the evaluator is
//! dormant: quality and indicators read zero, but the moment history and the
//! day counter are retained untouched — leaving coexistence suspends the
//! record, it never erases it.

use crate::phase::BondPhase;
use crate::snapshot::{clamp100, log2_nr, round_pct, Snapshot, Timestamp, MS_PER_HOUR};

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

// ─── MomentKind ─────────────────────────────────────────────────────────────

/// The five indicator-linked moment categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MomentKind {
    /// Silence comfort crossed its threshold.
    SilenceComfort,
    /// Shared vocabulary crossed its threshold.
    SharedVocabulary,
    /// Rhythm synchrony crossed its threshold.
    RhythmSynchrony,
    /// Shared memory crossed its threshold.
    SharedMemory,
    /// Autonomy respect crossed its threshold.
    AutonomyRespect,
}

impl MomentKind {
    /// All moment kinds, in indicator order.
    pub const ALL: [MomentKind; 5] = [
        MomentKind::SilenceComfort,
        MomentKind::SharedVocabulary,
        MomentKind::RhythmSynchrony,
        MomentKind::SharedMemory,
        MomentKind::AutonomyRespect,
    ];

    /// Indicator value that must be reached to record this moment.
    pub const fn threshold(self) -> f32 {
        match self {
            MomentKind::SilenceComfort
            | MomentKind::SharedVocabulary
            | MomentKind::RhythmSynchrony
            | MomentKind::SharedMemory
            | MomentKind::AutonomyRespect => 70.0,
        }
    }

    /// Fixed description recorded with the moment.
    pub fn description(self) -> &'static str {
        match self {
            MomentKind::SilenceComfort => "long silences feel comfortable now",
            MomentKind::SharedVocabulary => "a private vocabulary has taken hold",
            MomentKind::RhythmSynchrony => "daily rhythms have fallen into step",
            MomentKind::SharedMemory => "a deep store of shared memories",
            MomentKind::AutonomyRespect => "closeness without clinging",
        }
    }
}

// ─── CoexistIndicators ──────────────────────────────────────────────────────

/// The five coexistence indicators, each in [0.0, 100.0].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoexistIndicators {
    /// Comfort that survives long gaps between interactions.
    pub silence_comfort: f32,
    /// Invented symbols plus language level.
    pub shared_vocabulary: f32,
    /// Interaction cadence plus logarithmic age bonus.
    pub rhythm_synchrony: f32,
    /// Warm and cold memory-tier richness.
    pub shared_memory: f32,
    /// Form stability blended with comfort.
    pub autonomy_respect: f32,
}

impl CoexistIndicators {
    /// All-zero indicators (the dormant reading).
    pub fn zero() -> Self {
        Self {
            silence_comfort: 0.0,
            shared_vocabulary: 0.0,
            rhythm_synchrony: 0.0,
            shared_memory: 0.0,
            autonomy_respect: 0.0,
        }
    }

    /// Compute all five indicators from a snapshot at `now`.
    ///
    /// Silence comfort deliberately distinguishes short gaps from long
    /// ones: under six hours the current comfort reading is only an
    /// approximation (scaled to 60), while comfort that persists past six
    /// hours scores in full, with a bonus past twelve.
    pub fn compute(snap: &Snapshot, now: Timestamp) -> Self {
        let comfort = clamp100(snap.status.comfort);
        let silence = now.saturating_sub(snap.status.last_interaction);

        let silence_comfort = if silence < 6 * MS_PER_HOUR {
            clamp100(comfort * 0.6)
        } else {
            let base = (comfort / 60.0 * 100.0).min(100.0);
            let bonus = if silence >= 12 * MS_PER_HOUR && comfort >= 40.0 {
                10.0
            } else {
                0.0
            };
            clamp100(base + bonus)
        };

        let shared_vocabulary = (snap.language.native_symbols as f32 * 3.0).min(60.0)
            + snap.status.language_level.min(4) as f32 * 10.0;

        let rhythm_synchrony = (snap.interactions_per_day() * 12.0).min(60.0)
            + (log2_nr(snap.status.growth_day as f32 + 1.0) * 5.0).min(40.0);

        let shared_memory = (snap.memory.warm_count as f32 * 8.0).min(50.0)
            + (snap.memory.cold_count as f32 * 15.0).min(50.0);

        let autonomy_respect =
            (clamp100(snap.form.stability) * 0.5).min(50.0) + (comfort * 0.5).min(50.0);

        Self {
            silence_comfort,
            shared_vocabulary,
            rhythm_synchrony,
            shared_memory,
            autonomy_respect,
        }
    }

    /// Indicator value for a moment kind.
    pub fn get(&self, kind: MomentKind) -> f32 {
        match kind {
            MomentKind::SilenceComfort => self.silence_comfort,
            MomentKind::SharedVocabulary => self.shared_vocabulary,
            MomentKind::RhythmSynchrony => self.rhythm_synchrony,
            MomentKind::SharedMemory => self.shared_memory,
            MomentKind::AutonomyRespect => self.autonomy_respect,
        }
    }

    /// Weighted quality score, rounded and clamped to [0, 100].
    ///
    /// | Indicator | Weight |
    /// |-----------|--------|
    /// | silence comfort | 0.25 |
    /// | shared vocabulary | 0.20 |
    /// | rhythm synchrony | 0.15 |
    /// | shared memory | 0.20 |
    /// | autonomy respect | 0.20 |
    pub fn quality(&self) -> u8 {
        round_pct(
            self.silence_comfort * 0.25
                + self.shared_vocabulary * 0.20
                + self.rhythm_synchrony * 0.15
                + self.shared_memory * 0.20
                + self.autonomy_respect * 0.20,
        )
    }
}

// ─── CoexistState ───────────────────────────────────────────────────────────

/// One recorded threshold crossing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Moment {
    /// When the crossing was recorded.
    pub at: Timestamp,
    /// Which indicator crossed.
    pub kind: MomentKind,
    /// Fixed description for the kind.
    pub description: String,
}

/// Everything the evaluator reads for one tick.
#[derive(Clone, Debug)]
pub struct CoexistContext<'a> {
    /// The phase tracker's phase for this same tick.
    pub phase: BondPhase,
    /// Current subsystem snapshot.
    pub snapshot: &'a Snapshot,
    /// Caller-supplied current time.
    pub now: Timestamp,
}

/// Persisted coexistence state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoexistState {
    /// Whether the bond currently sits in the terminal phase.
    pub active: bool,
    /// Quality score [0, 100]; forced to 0 while inactive.
    pub quality: u8,
    /// Indicator values; forced to zero while inactive.
    pub indicators: CoexistIndicators,
    /// Append-only record of threshold crossings; never cleared.
    pub moments: Vec<Moment>,
    /// Ticks spent coexistent: +1 per active tick, reset to 1 on re-entry,
    /// held (not zeroed) while inactive.
    pub days_coexistent: u32,
}

impl CoexistState {
    /// Fresh dormant state.
    pub fn new() -> Self {
        Self {
            active: false,
            quality: 0,
            indicators: CoexistIndicators::zero(),
            moments: Vec::new(),
            days_coexistent: 0,
        }
    }

    /// Evaluate one tick.
    ///
    /// Outside the terminal phase this returns the dormant reading with the
    /// history carried over unchanged. Inside it, indicators and quality are
    /// recomputed from scratch (no smoothing), threshold crossings against
    /// the previous stored values append moments, and the day counter
    /// advances. Pure: `self` is never mutated.
    pub fn evaluate(&self, ctx: &CoexistContext<'_>) -> CoexistState {
        if !ctx.phase.is_terminal() {
            return CoexistState {
                active: false,
                quality: 0,
                indicators: CoexistIndicators::zero(),
                moments: self.moments.clone(),
                days_coexistent: self.days_coexistent,
            };
        }

        let indicators = CoexistIndicators::compute(ctx.snapshot, ctx.now);
        let quality = indicators.quality();

        let mut moments = self.moments.clone();
        for kind in MomentKind::ALL {
            let threshold = kind.threshold();
            let previous = self.indicators.get(kind);
            let current = indicators.get(kind);
            // Edge-triggered: strictly below before, at-or-above now.
            if previous < threshold && current >= threshold {
                moments.push(Moment {
                    at: ctx.now,
                    kind,
                    description: String::from(kind.description()),
                });
            }
        }

        let days_coexistent = if self.active {
            self.days_coexistent + 1
        } else {
            1
        };

        CoexistState {
            active: true,
            quality,
            indicators,
            moments,
            days_coexistent,
        }
    }
}

impl Default for CoexistState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
