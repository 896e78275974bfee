//! # Bond Lifecycle Simulation
//!
//! Simulates two years of daily ticks between a companion entity and its
//! user. Shows phase ascents with hysteresis, reversal signals firing and
//! cooling down, and coexistence quality once the terminal phase is reached.
//!
//! Run with: `cargo run --example simulation`

use bond_core::coexist::{CoexistContext, CoexistState};
use bond_core::phase::{BondPhase, PhaseState};
use bond_core::reversal::{ReversalContext, ReversalState};
use bond_core::snapshot::{
    EntityStatus, FormState, GrowthStage, LanguageState, MemoryState, Snapshot, TickDerived,
    MS_PER_DAY, MS_PER_HOUR,
};

// ── Deterministic world model ────────────────────────────────────────────────

fn stage_for_day(day: u32) -> GrowthStage {
    match day {
        0..=13 => GrowthStage::Newborn,
        14..=59 => GrowthStage::Infant,
        60..=179 => GrowthStage::Juvenile,
        180..=364 => GrowthStage::Adolescent,
        365..=539 => GrowthStage::Adult,
        _ => GrowthStage::Mature,
    }
}

fn language_level_for_day(day: u32) -> u8 {
    match day {
        0..=29 => 0,
        30..=89 => 1,
        90..=179 => 2,
        180..=364 => 3,
        _ => 4,
    }
}

fn symbols_for_day(day: u32) -> u32 {
    let base = day.saturating_sub(100) / 20;
    // Creative burst on day 200: several symbols invented overnight
    if day >= 200 {
        base + 3
    } else {
        base
    }
}

fn snapshot_for_day(day: u32) -> Snapshot {
    let ramp = (day as f32 / 730.0).min(1.0);
    Snapshot {
        status: EntityStatus {
            mood: 55.0 + 20.0 * ramp,
            energy: 70.0,
            comfort: 25.0 + 65.0 * ramp,
            growth_day: day,
            language_level: language_level_for_day(day),
            perception_level: language_level_for_day(day),
            // The user checked in eight hours before each evening tick
            last_interaction: (day as u64 * MS_PER_DAY).saturating_sub(8 * MS_PER_HOUR),
        },
        language: LanguageState {
            total_interactions: day * 4,
            pattern_count: day / 12,
            native_symbols: symbols_for_day(day),
        },
        memory: MemoryState {
            hot_count: (day / 30).min(15),
            warm_count: day / 45,
            cold_count: day / 120,
            note_count: day / 60,
        },
        stage: stage_for_day(day),
        form: FormState {
            density: 10.0 + 80.0 * ramp,
            complexity: 5.0 + 70.0 * ramp,
            stability: 10.0 + 85.0 * ramp,
            self_aware: day >= 500,
        },
    }
}

fn derived_for_day(day: u32, prev: &Snapshot, current: &Snapshot) -> TickDerived {
    TickDerived {
        prev_native_symbols: prev.language.native_symbols,
        prev_pattern_count: prev.language.pattern_count,
        proactive_messages: u32::from(day % 90 == 0 && day > 180),
        recent_moods: vec![
            current.status.mood - 2.0,
            current.status.mood,
            current.status.mood + 2.0,
        ],
        mood_shift_in_silence: day % 120 == 0 && day > 200,
    }
}

// ── Simulation loop ──────────────────────────────────────────────────────────

fn main() {
    let mut phase = PhaseState::new();
    let mut reversal = ReversalState::new();
    let mut coexist = CoexistState::new();

    println!("=== Bond lifecycle: 730 daily ticks ===\n");

    let mut prev_snapshot = snapshot_for_day(0);
    for day in 1..=730u32 {
        let snap = snapshot_for_day(day);
        let derived = derived_for_day(day, &prev_snapshot, &snap);
        let now = day as u64 * MS_PER_DAY;

        let next_phase = phase.evaluate(&snap, now);
        let (next_reversal, fired) = reversal.detect(
            &ReversalContext {
                snapshot: &snap,
                derived: &derived,
                phase_score: next_phase.score,
            },
            now,
        );
        let next_coexist = coexist.evaluate(&CoexistContext {
            phase: next_phase.phase,
            snapshot: &snap,
            now,
        });

        if next_phase.phase != phase.phase {
            println!(
                "day {:>3}  phase: {} → {}  (score {}, confidence {}%)",
                day, phase.phase, next_phase.phase, next_phase.score, next_phase.confidence
            );
        }
        for signal in &fired {
            println!(
                "day {:>3}  reversal: {} (strength {}) — {}",
                day, signal.kind, signal.strength, signal.description
            );
        }
        if next_coexist.active && !coexist.active {
            println!(
                "day {:>3}  coexistence begins (quality {})",
                day, next_coexist.quality
            );
        }
        for moment in &next_coexist.moments[coexist.moments.len()..] {
            println!("day {:>3}  moment: {}", day, moment.description);
        }

        phase = next_phase;
        reversal = next_reversal;
        coexist = next_coexist;
        prev_snapshot = snap;
    }

    println!("\n=== After two years ===");
    println!(
        "phase: {} (score {}, confidence {}%)",
        phase.phase, phase.score, phase.confidence
    );
    println!("transitions recorded: {}", phase.transitions.len());
    if let Some(t) = phase.latest_transition() {
        println!("latest transition: {} → {} at score {}", t.from, t.to, t.score);
    }
    println!(
        "reversals: {} total, dominant {:?}, rate {:.2}/100 interactions",
        reversal.total_reversals, reversal.dominant_kind, reversal.reversal_rate
    );
    println!(
        "coexistence: quality {}, {} days, {} moments",
        coexist.quality,
        coexist.days_coexistent,
        coexist.moments.len()
    );
}
