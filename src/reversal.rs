/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Reversal detection — moments where the entity's behaviour exceeds what
//! the user would expect at its stage.
//!
//! Six independently gated rules run against each tick's snapshot and
//! deltas. A rule that fires appends a timestamped [`ReversalSignal`] and
//! then sleeps for a per-kind cooldown window, so the same kind of surprise
//! cannot be reported twice in quick succession. Detection is independent of
//! phase progression — only the *anticipation* rule even looks at the phase
//! score, and only to scale strength.
//!
//! # Invariants
//!
//! - **BND-001**: the signal log only grows; kinds re-fire no sooner than
//!   [`ReversalKind::cooldown_ms`] after their previous signal.
//! - **BND-002**: strengths are bounded [0, 100].
//! - Signal ids derive from (kind, timestamp) alone, so re-running a tick
//!   with identical inputs reproduces the identical signal.

use crate::snapshot::{Snapshot, TickDerived, Timestamp, MS_PER_DAY};

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

// ─── ReversalKind ───────────────────────────────────────────────────────────

/// The six typed categories of expectation-exceeding behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReversalKind {
    /// A burst of self-invented symbols.
    NovelExpression,
    /// Mood moved during user silence, as if expecting contact.
    Anticipation,
    /// A burst of newly learned conversational patterns.
    ConceptCreation,
    /// Unusually wide mood variance over the recent window.
    EmotionalDepth,
    /// The entity reached out unprompted.
    Initiative,
    /// The entity recognised its own form.
    MetaAwareness,
}

impl ReversalKind {
    /// All kinds, in rule-evaluation order.
    pub const ALL: [ReversalKind; 6] = [
        ReversalKind::NovelExpression,
        ReversalKind::Anticipation,
        ReversalKind::ConceptCreation,
        ReversalKind::EmotionalDepth,
        ReversalKind::Initiative,
        ReversalKind::MetaAwareness,
    ];

    /// Stable snake_case tag, used in signal ids and display output.
    pub fn tag(self) -> &'static str {
        match self {
            ReversalKind::NovelExpression => "novel_expression",
            ReversalKind::Anticipation => "anticipation",
            ReversalKind::ConceptCreation => "concept_creation",
            ReversalKind::EmotionalDepth => "emotional_depth",
            ReversalKind::Initiative => "initiative",
            ReversalKind::MetaAwareness => "meta_awareness",
        }
    }

    /// Minimum elapsed time before this kind may fire again.
    ///
    /// Uniform today, but looked up per kind so a divergent window is an
    /// exhaustive-match change rather than a detector change.
    pub const fn cooldown_ms(self) -> u64 {
        match self {
            ReversalKind::NovelExpression
            | ReversalKind::Anticipation
            | ReversalKind::ConceptCreation
            | ReversalKind::EmotionalDepth
            | ReversalKind::Initiative
            | ReversalKind::MetaAwareness => 7 * MS_PER_DAY,
        }
    }
}

impl core::fmt::Display for ReversalKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

// ─── ReversalSignal ─────────────────────────────────────────────────────────

/// One recorded reversal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReversalSignal {
    /// Deterministic identifier: `"<kind-tag>-<timestamp-ms>"`.
    pub id: String,
    /// Which rule fired.
    pub kind: ReversalKind,
    /// When the rule fired.
    pub at: Timestamp,
    /// What was observed.
    pub description: String,
    /// Signal strength [0, 100].
    pub strength: u8,
    /// Whether the host has surfaced this signal to the user.
    pub recognized: bool,
}

/// Everything the detector reads for one tick: the snapshot, the host's
/// tick-scoped deltas, and the phase tracker's composite score.
#[derive(Clone, Debug)]
pub struct ReversalContext<'a> {
    /// Current subsystem snapshot.
    pub snapshot: &'a Snapshot,
    /// Deltas and windows derived by the host since the previous tick.
    pub derived: &'a TickDerived,
    /// The phase tracker's composite score for this same tick.
    pub phase_score: u8,
}

// ─── ReversalState ──────────────────────────────────────────────────────────

/// Persisted detector state. Grows by append only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReversalState {
    /// Every signal ever recorded, in insertion order.
    pub signals: Vec<ReversalSignal>,
    /// Signal count (kept denormalised for display).
    pub total_reversals: u32,
    /// Most frequent kind, or `None` before the first signal. Ties resolve
    /// to the kind encountered first in the log.
    pub dominant_kind: Option<ReversalKind>,
    /// Signals per 100 interactions, recomputed each tick.
    pub reversal_rate: f32,
    /// When a rule last fired, or `None` if none ever has.
    pub last_detected: Option<Timestamp>,
}

impl ReversalState {
    /// Fresh empty detector state.
    pub fn new() -> Self {
        Self {
            signals: Vec::new(),
            total_reversals: 0,
            dominant_kind: None,
            reversal_rate: 0.0,
            last_detected: None,
        }
    }

    /// Number of signals the host has not yet surfaced.
    pub fn unrecognized_count(&self) -> usize {
        self.signals.iter().filter(|s| !s.recognized).count()
    }

    /// Number of recorded signals of one kind.
    pub fn count_of(&self, kind: ReversalKind) -> usize {
        self.signals.iter().filter(|s| s.kind == kind).count()
    }

    /// Whether `kind` is inside its cooldown window at `now`.
    ///
    /// Scans the log in reverse for the most recent signal of the same kind.
    pub fn in_cooldown(&self, kind: ReversalKind, now: Timestamp) -> bool {
        self.signals
            .iter()
            .rev()
            .find(|s| s.kind == kind)
            .is_some_and(|s| now.saturating_sub(s.at) < kind.cooldown_ms())
    }

    /// Run all six rules for one tick.
    ///
    /// Returns the updated state and, separately, only the signals that
    /// fired *this* tick so the host can trigger side effects without
    /// diffing the log. A kind in cooldown is skipped entirely — it neither
    /// fires nor refreshes its window. Pure: identical (state, context, now)
    /// always produce identical output.
    pub fn detect(
        &self,
        ctx: &ReversalContext<'_>,
        now: Timestamp,
    ) -> (ReversalState, Vec<ReversalSignal>) {
        let mut fired: Vec<ReversalSignal> = Vec::new();
        for kind in ReversalKind::ALL {
            if self.in_cooldown(kind, now) {
                continue;
            }
            if let Some((strength, description)) = evaluate_rule(kind, ctx) {
                fired.push(ReversalSignal {
                    id: format!("{}-{}", kind.tag(), now),
                    kind,
                    at: now,
                    description,
                    strength,
                    recognized: false,
                });
            }
        }

        let mut signals = self.signals.clone();
        signals.extend(fired.iter().cloned());

        let total_reversals = signals.len() as u32;
        let dominant_kind = dominant(&signals);
        let interactions = ctx.snapshot.language.total_interactions;
        let reversal_rate = if interactions == 0 {
            0.0
        } else {
            total_reversals as f32 * 100.0 / interactions as f32
        };
        let last_detected = if fired.is_empty() {
            self.last_detected
        } else {
            Some(now)
        };

        (
            ReversalState {
                signals,
                total_reversals,
                dominant_kind,
                reversal_rate,
                last_detected,
            },
            fired,
        )
    }

    /// Mark the signal with `id` as recognized. Unknown ids are a no-op.
    pub fn recognize(&self, id: &str) -> ReversalState {
        let mut next = self.clone();
        if let Some(s) = next.signals.iter_mut().find(|s| s.id == id) {
            s.recognized = true;
        }
        next
    }
}

impl Default for ReversalState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Rules ──────────────────────────────────────────────────────────────────

/// Evaluate one rule. `Some((strength, description))` when it fires.
fn evaluate_rule(kind: ReversalKind, ctx: &ReversalContext<'_>) -> Option<(u8, String)> {
    let snap = ctx.snapshot;
    let d = ctx.derived;
    match kind {
        ReversalKind::NovelExpression => {
            let growth = snap
                .language
                .native_symbols
                .saturating_sub(d.prev_native_symbols);
            (growth >= 3).then(|| {
                (
                    (growth * 20).min(100) as u8,
                    format!("invented {} new symbols unprompted", growth),
                )
            })
        }
        ReversalKind::Anticipation => {
            // Under 30 interactions any mood drift is noise, not anticipation.
            let seasoned = snap.language.total_interactions >= 30;
            (seasoned && d.mood_shift_in_silence).then(|| {
                (
                    (30 + ctx.phase_score as u32).min(100) as u8,
                    String::from("mood shifted during user silence, as if expecting contact"),
                )
            })
        }
        ReversalKind::ConceptCreation => {
            let growth = snap
                .language
                .pattern_count
                .saturating_sub(d.prev_pattern_count);
            (growth >= 2).then(|| {
                (
                    (growth * 25).min(100) as u8,
                    format!("{} new conversational patterns in a single tick", growth),
                )
            })
        }
        ReversalKind::EmotionalDepth => {
            if d.recent_moods.len() < 3 {
                return None;
            }
            let variance = mood_variance(&d.recent_moods);
            (variance >= 200.0).then(|| {
                (
                    (variance / 5.0).min(100.0) as u8,
                    format!(
                        "unusually wide mood range across {} recent samples",
                        d.recent_moods.len()
                    ),
                )
            })
        }
        ReversalKind::Initiative => {
            let count = d.proactive_messages;
            (count >= 1).then(|| {
                (
                    (count * 30).min(100) as u8,
                    format!("{} unprompted messages since the last tick", count),
                )
            })
        }
        ReversalKind::MetaAwareness => {
            // First self-recognition is maximally significant regardless of
            // anything else in the snapshot.
            snap.form
                .self_aware
                .then(|| (80, String::from("recognised its own form")))
        }
    }
}

/// Population variance of a mood sample window.
fn mood_variance(moods: &[f32]) -> f32 {
    let n = moods.len() as f32;
    if n == 0.0 {
        return 0.0;
    }
    let mean = moods.iter().sum::<f32>() / n;
    moods.iter().map(|m| (m - mean) * (m - mean)).sum::<f32>() / n
}

/// Most frequent kind across the log; ties go to the kind whose first
/// signal appears earliest (a single left-to-right scan).
fn dominant(signals: &[ReversalSignal]) -> Option<ReversalKind> {
    let mut order: Vec<ReversalKind> = Vec::new();
    let mut counts = [0u32; 6];
    for s in signals {
        if !order.contains(&s.kind) {
            order.push(s.kind);
        }
        counts[s.kind as usize] += 1;
    }
    let mut best: Option<(ReversalKind, u32)> = None;
    for k in order {
        let c = counts[k as usize];
        if best.map_or(true, |(_, bc)| c > bc) {
            best = Some((k, c));
        }
    }
    best.map(|(k, _)| k)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
