//! End-to-end game session tests against an in-memory store.

use chrono::{Duration, TimeZone, Utc};
use sovereign_core::{
    analysis::AnalysisSource,
    command::{CommandCategory, CommandStatus},
    effects::EffectDelta,
    engine::{GameEngine, START_COMMAND_TEXT},
    error::GameError,
    event::GameEvent,
    game::Difficulty,
};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn build(seed: u64) -> GameEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    GameEngine::build_test(seed).expect("build test engine")
}

#[test]
fn start_game_applies_era_and_difficulty() {
    let mut engine = build(1);
    // EG: 2000-era treasury 250, manpower 450k, stability 65
    let game = engine.start_game("EG", Difficulty::Unstable, 1995, t0()).unwrap();

    let r = &game.resources;
    assert!((r.treasury - 175.0).abs() < 1e-9, "treasury {}", r.treasury);
    assert_eq!(r.manpower, 360_000);
    assert_eq!(r.stability, 39);
    assert_eq!(r.tactical_points, 100);
    assert_eq!(r.intelligence_level, 1);
    assert_eq!(r.nuclear_program_stage, 0);
    assert_eq!(r.nuclear_warheads, 0);
    assert!(!r.at_war);

    let stored = engine.game(&game.id).unwrap();
    assert_eq!(stored, game);
}

#[test]
fn start_game_writes_system_banner() {
    let mut engine = build(2);
    let game = engine.start_game("SA", Difficulty::WorldAtWar, 2025, t0()).unwrap();
    assert!(game.resources.at_war);

    let log = engine.command_log(&game.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].status, CommandStatus::System);
    assert_eq!(log[0].command_text, START_COMMAND_TEXT);
    assert_eq!(log[0].applied_delta, EffectDelta::ZERO);
    assert!(log[0].response_message.contains("السعودية"));

    let events = engine.take_events();
    assert!(matches!(events.as_slice(), [GameEvent::GameStarted { year: 2025, .. }]));
}

#[test]
fn start_game_rejects_unknown_country_and_bad_year() {
    let mut engine = build(3);
    assert!(matches!(
        engine.start_game("XX", Difficulty::Stable, 2000, t0()),
        Err(GameError::CountryNotFound { .. })
    ));
    assert!(matches!(
        engine.start_game("EG", Difficulty::Stable, 1979, t0()),
        Err(GameError::InvalidYear { year: 1979, .. })
    ));
    assert!(matches!(
        engine.start_game("EG", Difficulty::Stable, 2031, t0()),
        Err(GameError::InvalidYear { .. })
    ));
}

#[test]
fn command_updates_snapshot_and_appends_log() {
    let mut engine = build(4);
    let game = engine.start_game("EG", Difficulty::Stable, 2025, t0()).unwrap();
    let before = game.resources.clone();

    let outcome = engine
        .issue_command(&game.id, "زيادة ميزانية الجيش", t0() + Duration::seconds(5))
        .unwrap();

    assert_eq!(outcome.interpretation.source, AnalysisSource::Local);
    assert_eq!(outcome.interpretation.analysis.command_type, CommandCategory::MilitaryBudget);
    assert_eq!(outcome.state.resources.treasury, before.treasury - 20.0);
    assert_eq!(outcome.state.resources.manpower, before.manpower + 50_000);
    assert_eq!(outcome.state.resources.stability, before.stability + 5);
    assert_eq!(outcome.state.resources.tactical_points, before.tactical_points + 10);

    let committed = engine.game(&game.id).unwrap();
    assert_eq!(committed.resources, outcome.state.resources);

    let log = engine.command_log(&game.id).unwrap();
    assert_eq!(log.len(), 2);
    let last = &log[1];
    assert_eq!(last.status, CommandStatus::Executed);
    assert_eq!(last.category, CommandCategory::MilitaryBudget);
    assert_eq!(last.command_text, "زيادة ميزانية الجيش");
    assert_eq!(last.response_message, outcome.interpretation.message);
    assert_eq!(last, &outcome.log_entry);
}

#[test]
fn war_then_peace_round_trip() {
    let mut engine = build(5);
    let game = engine.start_game("EG", Difficulty::Stable, 2025, t0()).unwrap();

    let war = engine.issue_command(&game.id, "شن حرب على الجار", t0()).unwrap();
    assert!(war.state.resources.at_war);
    assert_eq!(war.state.resources.stability, 50);
    // Stability 65 is not below 30; only the entering-war warning fires.
    assert_eq!(war.interpretation.analysis.warnings.len(), 1);

    let reform = engine.issue_command(&game.id, "إصلاح الاقتصاد", t0()).unwrap();
    assert_eq!(reform.interpretation.analysis.warnings.len(), 1);
    assert_eq!(reform.state.resources.stability, 70);

    let peace = engine.issue_command(&game.id, "طلب هدنة", t0()).unwrap();
    assert!(!peace.state.resources.at_war);
    assert_eq!(peace.state.resources.war_target, None);
}

#[test]
fn unknown_command_is_logged_with_zero_delta() {
    let mut engine = build(6);
    let game = engine.start_game("EG", Difficulty::Stable, 2025, t0()).unwrap();

    let outcome = engine.issue_command(&game.id, "hello there", t0()).unwrap();
    assert_eq!(outcome.interpretation.analysis.command_type, CommandCategory::Unknown);
    assert_eq!(outcome.state.resources, game.resources);
    assert_eq!(outcome.log_entry.applied_delta, EffectDelta::ZERO);
    assert_eq!(outcome.log_entry.status, CommandStatus::Executed);
}

#[test]
fn blank_command_is_rejected_before_the_engine() {
    let mut engine = build(7);
    let game = engine.start_game("EG", Difficulty::Stable, 2025, t0()).unwrap();

    assert!(matches!(
        engine.issue_command(&game.id, "   \n\t", t0()),
        Err(GameError::EmptyCommand)
    ));
    assert_eq!(engine.command_log(&game.id).unwrap().len(), 1);
}

#[test]
fn command_on_missing_game_fails_cleanly() {
    let mut engine = build(8);
    assert!(matches!(
        engine.issue_command("no-such-game", "زيادة ميزانية الجيش", t0()),
        Err(GameError::GameNotFound { .. })
    ));
}

#[test]
fn log_is_ordered_by_timestamp() {
    let mut engine = build(9);
    let game = engine.start_game("EG", Difficulty::Stable, 2025, t0()).unwrap();

    let texts = ["تجنيد", "تطوير الصناعة", "شراء دبابات", "سرب طائرات"];
    for (i, text) in texts.iter().enumerate() {
        let at = t0() + Duration::seconds(10 * (i as i64 + 1));
        engine.issue_command(&game.id, text, at).unwrap();
    }

    let log = engine.command_log(&game.id).unwrap();
    assert_eq!(log.len(), texts.len() + 1);
    assert!(log.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    let logged: Vec<&str> = log[1..].iter().map(|e| e.command_text.as_str()).collect();
    assert_eq!(logged, texts);
}

#[test]
fn same_seed_gives_same_target_markers() {
    let run = |seed: u64| {
        let mut engine = build(seed);
        let game = engine.start_game("EG", Difficulty::Stable, 2025, t0()).unwrap();
        (0..5)
            .map(|_| {
                engine
                    .issue_command(&game.id, "هجوم مفاجئ", t0())
                    .unwrap()
                    .interpretation
                    .analysis
                    .target_location
            })
            .collect::<Vec<_>>()
    };

    let a = run(0xC0FFEE);
    let b = run(0xC0FFEE);
    assert_eq!(a, b);
    assert!(a.iter().all(|t| matches!(t, Some(p) if p.x < 100 && p.y < 100)));
}
