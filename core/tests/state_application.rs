//! Applying deltas to snapshots: additive, then re-clamped.

use sovereign_core::{
    command::CommandCategory,
    effects::{delta_for, generate, EffectDelta, Warning},
    snapshot::ResourceSnapshot,
};

#[test]
fn repeated_overdraw_clamps_treasury_to_zero() {
    let start = ResourceSnapshot { treasury: 5.0, ..ResourceSnapshot::default() };
    let delta = EffectDelta { treasury: -20.0, ..EffectDelta::ZERO };

    let once = start.apply(&delta);
    assert_eq!(once.treasury, 0.0);
    let twice = once.apply(&delta);
    assert_eq!(twice.treasury, 0.0);
}

#[test]
fn warfare_at_stability_25_lands_at_10_and_still_warns() {
    let start = ResourceSnapshot { stability: 25, ..ResourceSnapshot::default() };

    let out = generate(CommandCategory::Warfare, &start);
    let after = start.apply(&out.delta);

    assert_eq!(after.stability, 10);
    assert!(after.at_war);
    // Evaluated on the pre-delta value (25), not the post-delta one (10).
    assert!(out.warnings.contains(&Warning::LowStability));
}

#[test]
fn apply_does_not_mutate_the_input() {
    let start = ResourceSnapshot { treasury: 100.0, stability: 50, ..ResourceSnapshot::default() };
    let copy = start.clone();
    let _ = start.apply(&delta_for(CommandCategory::Nuclear));
    assert_eq!(start, copy);
}

#[test]
fn stability_is_capped_at_100() {
    let start = ResourceSnapshot { stability: 95, ..ResourceSnapshot::default() };
    let after = start.apply(&delta_for(CommandCategory::Reform));
    assert_eq!(after.stability, 100);
}

#[test]
fn tactical_points_never_go_negative() {
    let start = ResourceSnapshot { tactical_points: 30, ..ResourceSnapshot::default() };
    let after = start.apply(&delta_for(CommandCategory::Warfare));
    assert_eq!(after.tactical_points, 0);
}

#[test]
fn nuclear_stage_caps_at_five() {
    let mut state = ResourceSnapshot { treasury: 1_000.0, ..ResourceSnapshot::default() };
    for _ in 0..8 {
        state = state.apply(&delta_for(CommandCategory::Nuclear));
    }
    assert_eq!(state.nuclear_program_stage, 5);
    assert_eq!(state.treasury, 360.0);
}

#[test]
fn intelligence_level_only_grows() {
    let mut state = ResourceSnapshot::default();
    let mut last = state.intelligence_level;
    for category in CommandCategory::ALL {
        state = state.apply(&delta_for(category));
        assert!(state.intelligence_level >= last);
        last = state.intelligence_level;
    }
    assert_eq!(state.intelligence_level, 2);
}

#[test]
fn peace_ends_war_and_clears_target() {
    let start = ResourceSnapshot {
        at_war:     true,
        war_target: Some("IQ".into()),
        stability:  40,
        ..ResourceSnapshot::default()
    };
    let after = start.apply(&delta_for(CommandCategory::Peace));
    assert!(!after.at_war);
    assert_eq!(after.war_target, None);
    assert_eq!(after.stability, 50);
}
