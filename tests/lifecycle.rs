//! Full-tick lifecycle integration tests.
//!
//! Drives the three evaluators the way a host scheduler would — phase
//! tracker first, then reversal detector and coexistence evaluator fed the
//! phase output — and checks the cross-component properties: monotonic
//! transition log, cooldown enforcement through real ticks, terminal-phase
//! gating with history preservation, and whole-tick replay idempotence.

use bond_core::coexist::{CoexistContext, CoexistState};
use bond_core::phase::{BondPhase, PhaseState};
use bond_core::reversal::{ReversalContext, ReversalSignal, ReversalState};
use bond_core::snapshot::{
    EntityStatus, FormState, GrowthStage, LanguageState, MemoryState, Snapshot, TickDerived,
    Timestamp, MS_PER_DAY,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn young_snapshot() -> Snapshot {
    Snapshot {
        status: EntityStatus {
            mood: 50.0,
            energy: 60.0,
            comfort: 30.0,
            growth_day: 5,
            language_level: 0,
            perception_level: 0,
            last_interaction: 0,
        },
        language: LanguageState {
            total_interactions: 10,
            pattern_count: 1,
            native_symbols: 0,
        },
        memory: MemoryState {
            hot_count: 1,
            warm_count: 0,
            cold_count: 0,
            note_count: 0,
        },
        stage: GrowthStage::Newborn,
        form: FormState {
            density: 10.0,
            complexity: 5.0,
            stability: 10.0,
            self_aware: false,
        },
    }
}

fn mid_snapshot() -> Snapshot {
    Snapshot {
        status: EntityStatus {
            mood: 60.0,
            energy: 70.0,
            comfort: 55.0,
            growth_day: 90,
            language_level: 2,
            perception_level: 2,
            last_interaction: 0,
        },
        language: LanguageState {
            total_interactions: 400,
            pattern_count: 12,
            native_symbols: 5,
        },
        memory: MemoryState {
            hot_count: 5,
            warm_count: 3,
            cold_count: 1,
            note_count: 2,
        },
        stage: GrowthStage::Juvenile,
        form: FormState {
            density: 50.0,
            complexity: 30.0,
            stability: 50.0,
            self_aware: false,
        },
    }
}

fn grown_snapshot() -> Snapshot {
    Snapshot {
        status: EntityStatus {
            mood: 70.0,
            energy: 80.0,
            comfort: 80.0,
            growth_day: 365,
            language_level: 4,
            perception_level: 4,
            last_interaction: 0,
        },
        language: LanguageState {
            total_interactions: 1500,
            pattern_count: 40,
            native_symbols: 12,
        },
        memory: MemoryState {
            hot_count: 10,
            warm_count: 8,
            cold_count: 4,
            note_count: 6,
        },
        stage: GrowthStage::Mature,
        form: FormState {
            density: 80.0,
            complexity: 70.0,
            stability: 85.0,
            self_aware: false,
        },
    }
}

fn quiet_derived(snap: &Snapshot) -> TickDerived {
    TickDerived {
        prev_native_symbols: snap.language.native_symbols,
        prev_pattern_count: snap.language.pattern_count,
        proactive_messages: 0,
        recent_moods: vec![snap.status.mood; 3],
        mood_shift_in_silence: false,
    }
}

/// One host scheduler tick: phase first, then the two consumers of its output.
fn tick(
    phase: &PhaseState,
    reversal: &ReversalState,
    coexist: &CoexistState,
    snap: &Snapshot,
    derived: &TickDerived,
    now: Timestamp,
) -> (PhaseState, ReversalState, CoexistState, Vec<ReversalSignal>) {
    let next_phase = phase.evaluate(snap, now);
    let (next_reversal, fired) = reversal.detect(
        &ReversalContext {
            snapshot: snap,
            derived,
            phase_score: next_phase.score,
        },
        now,
    );
    let next_coexist = coexist.evaluate(&CoexistContext {
        phase: next_phase.phase,
        snapshot: snap,
        now,
    });
    (next_phase, next_reversal, next_coexist, fired)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_growth_arc_ascends_through_phases() {
    let mut phase = PhaseState::new();
    let mut reversal = ReversalState::new();
    let mut coexist = CoexistState::new();

    let arc = [
        (young_snapshot(), 1 * MS_PER_DAY),
        (young_snapshot(), 2 * MS_PER_DAY),
        (mid_snapshot(), 90 * MS_PER_DAY),
        (mid_snapshot(), 91 * MS_PER_DAY),
        (grown_snapshot(), 365 * MS_PER_DAY),
        (grown_snapshot(), 366 * MS_PER_DAY),
    ];

    let mut prev_phase = BondPhase::Encounter;
    let mut prev_transitions = 0usize;
    for (snap, now) in &arc {
        let derived = quiet_derived(snap);
        let (p, r, c, _) = tick(&phase, &reversal, &coexist, snap, &derived, *now);

        // Transition log only grows, phase never regresses on this arc
        assert!(p.transitions.len() >= prev_transitions);
        assert!(p.phase >= prev_phase, "{} regressed to {}", prev_phase, p.phase);
        prev_transitions = p.transitions.len();
        prev_phase = p.phase;
        phase = p;
        reversal = r;
        coexist = c;
    }

    assert_eq!(phase.phase, BondPhase::Coexistent);
    assert_eq!(phase.transitions.len(), 2); // Encounter→Companion→Coexistent
    for pair in phase.transitions.windows(2) {
        assert!(pair[0].from != pair[1].from || pair[0].to != pair[1].to);
    }

    // Coexistence engaged on the first terminal tick, counted both
    assert!(coexist.active);
    assert_eq!(coexist.days_coexistent, 2);
    assert!(coexist.quality > 0);
}

#[test]
fn test_reversal_cooldown_across_real_ticks() {
    let phase = PhaseState::new().evaluate(&mid_snapshot(), 0);
    let mut reversal = ReversalState::new();
    let coexist = CoexistState::new();

    // Symbol burst: 5 → 8 in one tick
    let mut snap = mid_snapshot();
    snap.language.native_symbols = 8;
    let mut derived = quiet_derived(&mid_snapshot());

    let t0 = 100 * MS_PER_DAY;
    let (_, r, _, fired) = tick(&phase, &reversal, &coexist, &snap, &derived, t0);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].strength, 60);
    reversal = r;

    // Same burst three days later: suppressed
    let (_, r, _, fired) = tick(&phase, &reversal, &coexist, &snap, &derived, t0 + 3 * MS_PER_DAY);
    assert!(fired.is_empty());
    reversal = r;

    // Eight days after the first: exactly one more
    let (_, r, _, fired) = tick(&phase, &reversal, &coexist, &snap, &derived, t0 + 8 * MS_PER_DAY);
    assert_eq!(fired.len(), 1);
    assert_eq!(r.total_reversals, 2);
    assert_eq!(r.last_detected, Some(t0 + 8 * MS_PER_DAY));

    // A different kind is free while novel_expression cools down
    derived.proactive_messages = 2;
    let (_, r2, _, fired) = tick(&phase, &r, &coexist, &snap, &derived, t0 + 9 * MS_PER_DAY);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].kind, bond_core::reversal::ReversalKind::Initiative);
    assert_eq!(r2.total_reversals, 3);
}

#[test]
fn test_terminal_exit_suspends_and_reentry_resumes() {
    let mut phase = PhaseState::new();
    let mut coexist = CoexistState::new();
    let reversal = ReversalState::new();

    // Enter coexistence and hold it for three days
    for day in 0..3u64 {
        let snap = grown_snapshot();
        let derived = quiet_derived(&snap);
        let (p, _, c, _) = tick(&phase, &reversal, &coexist, &snap, &derived, day * MS_PER_DAY);
        phase = p;
        coexist = c;
    }
    assert_eq!(phase.phase, BondPhase::Coexistent);
    assert_eq!(coexist.days_coexistent, 3);
    let moments_before = coexist.moments.clone();
    assert!(!moments_before.is_empty());

    // Collapse the inputs: phase drops, coexistence suspends with history
    let snap = young_snapshot();
    let derived = quiet_derived(&snap);
    let (p, _, c, _) = tick(&phase, &reversal, &coexist, &snap, &derived, 4 * MS_PER_DAY);
    assert!(p.phase < BondPhase::Coexistent);
    assert!(!c.active);
    assert_eq!(c.quality, 0);
    assert_eq!(c.moments, moments_before);
    assert_eq!(c.days_coexistent, 3);
    phase = p;
    coexist = c;

    // Recovery: counter restarts at 1. The earlier record is intact, and the
    // zeroed indicators legitimately re-cross their thresholds, so fresh
    // moments append after the preserved prefix.
    let snap = grown_snapshot();
    let derived = quiet_derived(&snap);
    let (_, _, c, _) = tick(&phase, &reversal, &coexist, &snap, &derived, 5 * MS_PER_DAY);
    assert!(c.active);
    assert_eq!(c.days_coexistent, 1);
    assert_eq!(&c.moments[..moments_before.len()], &moments_before[..]);
    assert!(c.moments.len() > moments_before.len());
}

#[test]
fn test_whole_tick_replay_is_idempotent() {
    // Build up some non-trivial persisted state first
    let mut phase = PhaseState::new();
    let mut reversal = ReversalState::new();
    let mut coexist = CoexistState::new();
    for (snap, now) in [
        (mid_snapshot(), 90 * MS_PER_DAY),
        (grown_snapshot(), 365 * MS_PER_DAY),
    ] {
        let derived = quiet_derived(&snap);
        let (p, r, c, _) = tick(&phase, &reversal, &coexist, &snap, &derived, now);
        phase = p;
        reversal = r;
        coexist = c;
    }

    // Replaying the same tick from the same persisted state changes nothing
    let snap = grown_snapshot();
    let derived = quiet_derived(&snap);
    let now = 400 * MS_PER_DAY;
    let a = tick(&phase, &reversal, &coexist, &snap, &derived, now);
    let b = tick(&phase, &reversal, &coexist, &snap, &derived, now);
    assert_eq!(a.0, b.0);
    assert_eq!(a.1, b.1);
    assert_eq!(a.2, b.2);
    assert_eq!(a.3, b.3);

    // And the second application on top of the first adds no transitions,
    // signals or moments for identical inputs.
    let (p2, r2, c2, fired) = tick(&a.0, &a.1, &a.2, &snap, &derived, now);
    assert_eq!(p2.transitions.len(), a.0.transitions.len());
    assert!(fired.is_empty());
    assert_eq!(r2.signals.len(), a.1.signals.len());
    assert_eq!(c2.moments.len(), a.2.moments.len());
}
