//! Per-tick snapshot of the entity's other subsystems.
//!
//! The bond core never owns status, language, memory, growth or form data —
//! those belong to the surrounding runtime. Once per scheduler tick the host
//! assembles a read-only [`Snapshot`] (plus the tick-scoped deltas in
//! [`TickDerived`]) and hands it to the three evaluators together with the
//! current wall-clock [`Timestamp`]. Nothing in this crate reads a system
//! clock: the same snapshot and timestamp always produce the same result.
//!
//! The structs here mirror what the upstream subsystems report. Validation is
//! their job, not ours — every consumer clamps numeric ranges instead of
//! rejecting them.

extern crate alloc;

use alloc::vec::Vec;

// ─── Time base ──────────────────────────────────────────────────────────────

/// Caller-supplied wall-clock time in Unix milliseconds.
pub type Timestamp = u64;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 3_600_000;

/// Milliseconds in one day.
pub const MS_PER_DAY: u64 = 86_400_000;

// ─── no_std log2 (exponent split + mantissa polynomial) ─────────────────────

/// Compute log2 of a positive f32 without platform intrinsics.
///
/// Splits the IEEE-754 exponent off and approximates log2 of the mantissa
/// in [1, 2) with a quadratic, accurate to ~5e-3 over the full range.
/// Returns 0.0 for non-positive input.
pub fn log2_nr(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let bits = x.to_bits();
    let exponent = ((bits >> 23) & 0xff) as i32 - 127;
    // Rebuild the mantissa as a float in [1.0, 2.0)
    let m = f32::from_bits((bits & 0x007f_ffff) | 0x3f80_0000);
    let frac = (-0.344_848_43 * m + 2.024_665_8) * m - 1.674_877_6;
    exponent as f32 + frac
}

/// Clamp a continuous signal to the canonical [0.0, 100.0] range.
pub(crate) fn clamp100(v: f32) -> f32 {
    v.clamp(0.0, 100.0)
}

/// Round a continuous 0–100 value to the nearest integer percentage.
pub(crate) fn round_pct(v: f32) -> u8 {
    (clamp100(v) + 0.5) as u8
}

// ─── Subsystem views ────────────────────────────────────────────────────────

/// Live status reported by the entity's mood/energy subsystem.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityStatus {
    /// Current mood [0.0, 100.0].
    pub mood: f32,
    /// Current energy [0.0, 100.0].
    pub energy: f32,
    /// Current comfort [0.0, 100.0].
    pub comfort: f32,
    /// Whole days since the entity was created.
    pub growth_day: u32,
    /// Language sophistication level, 0 (none) to 4 (fluent).
    pub language_level: u8,
    /// Perception sophistication level, 0 to 4.
    pub perception_level: u8,
    /// Timestamp of the most recent user interaction.
    pub last_interaction: Timestamp,
}

/// Aggregates from the language subsystem.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageState {
    /// Total user interactions since creation.
    pub total_interactions: u32,
    /// Distinct learned conversational patterns.
    pub pattern_count: u32,
    /// Symbols the entity invented itself (not taught).
    pub native_symbols: u32,
}

/// Tiered memory counts from the memory subsystem.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryState {
    /// Entries in the hot (working) tier.
    pub hot_count: u32,
    /// Entries in the warm (consolidated) tier.
    pub warm_count: u32,
    /// Entries in the cold (archival) tier.
    pub cold_count: u32,
    /// Free-form notes attached to memories.
    pub note_count: u32,
}

/// Growth stage label reported by the growth subsystem.
///
/// Ordered youngest to oldest; the discriminant order is meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrowthStage {
    /// First days of existence.
    Newborn,
    /// Early development, limited expression.
    Infant,
    /// Rapid learning period.
    Juvenile,
    /// Identity formation period.
    Adolescent,
    /// Fully developed.
    Adult,
    /// Long-lived, settled.
    Mature,
}

impl GrowthStage {
    /// Baseline emotional complexity contributed by this stage [0.0, 100.0].
    pub fn emotional_base(self) -> f32 {
        match self {
            GrowthStage::Newborn => 10.0,
            GrowthStage::Infant => 25.0,
            GrowthStage::Juvenile => 40.0,
            GrowthStage::Adolescent => 55.0,
            GrowthStage::Adult => 75.0,
            GrowthStage::Mature => 90.0,
        }
    }
}

/// Physical-form metrics from the form subsystem.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormState {
    /// Visual density of the rendered form [0.0, 100.0].
    pub density: f32,
    /// Structural complexity of the form [0.0, 100.0].
    pub complexity: f32,
    /// Stability of the form across renders [0.0, 100.0].
    pub stability: f32,
    /// Whether the entity has recognised its own form.
    pub self_aware: bool,
}

// ─── Snapshot ───────────────────────────────────────────────────────────────

/// The full read-only bundle consumed by the three evaluators each tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Mood/energy/comfort status.
    pub status: EntityStatus,
    /// Language subsystem aggregates.
    pub language: LanguageState,
    /// Tiered memory counts.
    pub memory: MemoryState,
    /// Current growth stage label.
    pub stage: GrowthStage,
    /// Physical-form metrics.
    pub form: FormState,
}

impl Snapshot {
    /// Average interactions per growth day (day floor of 1 so that a
    /// freshly created entity does not divide by zero).
    pub fn interactions_per_day(&self) -> f32 {
        let days = self.status.growth_day.max(1) as f32;
        self.language.total_interactions as f32 / days
    }
}

/// Tick-scoped values derived by the host between two snapshots.
///
/// These are deltas and short windows the bond core cannot reconstruct from
/// a single snapshot: what the previous tick looked like, and what happened
/// in between.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickDerived {
    /// Native-symbol count at the previous tick.
    pub prev_native_symbols: u32,
    /// Pattern count at the previous tick.
    pub prev_pattern_count: u32,
    /// Proactive (entity-initiated) messages since the previous tick.
    pub proactive_messages: u32,
    /// Short rolling window of recent mood samples, oldest first.
    pub recent_moods: Vec<f32>,
    /// Whether mood shifted while the user was silent.
    pub mood_shift_in_silence: bool,
}

// ─── Tests ──────────────────────────────────────────────────────────────────
