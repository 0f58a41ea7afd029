//! The game engine: the only component that mutates a game session.
//!
//! COMMAND PIPELINE (fixed order, one command at a time):
//!   1. Re-read the committed game_state row.
//!   2. Interpret the text (remote analyzer, local fallback).
//!   3. Apply the delta to the snapshot and re-clamp.
//!   4. Persist the new snapshot and the log row in one transaction.
//!
//! RULES:
//!   - Every mutation takes `&mut self`, so commands and regen ticks on
//!     one engine are serialized. Callers sharing an engine across threads
//!     wrap it in a Mutex.
//!   - Every mutation re-fetches the row immediately before writing.
//!     No in-memory copy of a snapshot is ever trusted.
//!   - A persistence failure leaves the snapshot unchanged and is logged
//!     with status `failed`.

use crate::{
    analysis::{Interpretation, Interpreter},
    clock::RegenClock,
    command::{CommandCategory, CommandStatus},
    config::GameConfig,
    effects::EffectDelta,
    error::{GameError, GameResult},
    event::{CommandLogEntry, GameEvent},
    game::{initial_resources, welcome_message, Difficulty, GameState},
    snapshot::ResourceUpdate,
    store::{GameStore, SqliteStore},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Command text logged for the start-of-game banner.
pub const START_COMMAND_TEXT: &str = "بدء المهمة";

/// Result of one applied command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub state:          GameState,
    pub interpretation: Interpretation,
    pub log_entry:      CommandLogEntry,
}

pub struct GameEngine<S: GameStore = SqliteStore> {
    store:       S,
    config:      GameConfig,
    interpreter: Interpreter,
    regen:       RegenClock,
    events:      Vec<GameEvent>,
}

impl<S: GameStore> GameEngine<S> {
    pub fn new(store: S, config: GameConfig, interpreter: Interpreter) -> Self {
        let regen = RegenClock::new(config.regen_interval());
        Self {
            store,
            config,
            interpreter,
            regen,
            events: Vec::new(),
        }
    }

    /// Build a fully wired engine: roster seeded, interpreter from config.
    pub fn build(store: S, config: GameConfig, seed: u64) -> GameResult<Self> {
        for country in &config.countries {
            store.upsert_country(country)?;
        }
        let interpreter = Interpreter::from_config(seed, config.remote_analyzer.as_ref());
        log::info!(
            "engine: {} countries, remote analyzer {}",
            config.countries.len(),
            if interpreter.has_remote() { "enabled" } else { "disabled" }
        );
        Ok(Self::new(store, config, interpreter))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Committed state of a game.
    pub fn game(&self, game_id: &str) -> GameResult<GameState> {
        self.store
            .game(game_id)?
            .ok_or_else(|| GameError::GameNotFound { game_id: game_id.to_string() })
    }

    /// Playable countries, ordered by name.
    pub fn countries(&self) -> GameResult<Vec<crate::game::Country>> {
        self.store.countries()
    }

    pub fn command_log(&self, game_id: &str) -> GameResult<Vec<CommandLogEntry>> {
        self.store.command_log(game_id)
    }

    // ── Game setup ─────────────────────────────────────────────

    pub fn start_game(
        &mut self,
        country_code: &str,
        difficulty:   Difficulty,
        year:         i32,
        now:          DateTime<Utc>,
    ) -> GameResult<GameState> {
        if !(self.config.min_year..=self.config.max_year).contains(&year) {
            return Err(GameError::InvalidYear {
                year,
                min: self.config.min_year,
                max: self.config.max_year,
            });
        }
        let country = self
            .store
            .country(country_code)?
            .ok_or_else(|| GameError::CountryNotFound { code: country_code.to_string() })?;

        let resources = initial_resources(&country, difficulty, year, &self.config);
        let game = GameState {
            id:                 Uuid::new_v4().to_string(),
            country_code:       country.code.clone(),
            country_name:       country.name_ar.clone(),
            difficulty,
            year,
            resources,
            last_tp_generation: now,
            created_at:         now,
            updated_at:         now,
        };
        self.store.insert_game(&game)?;

        self.store.append_log(&CommandLogEntry {
            id:               Uuid::new_v4().to_string(),
            game_id:          game.id.clone(),
            timestamp:        now,
            command_text:     START_COMMAND_TEXT.to_string(),
            category:         CommandCategory::Unknown,
            status:           CommandStatus::System,
            response_message: welcome_message(&country, difficulty, year, &game.resources),
            applied_delta:    EffectDelta::ZERO,
        })?;

        log::info!(
            "game={} started: country={} difficulty={} year={year}",
            game.id,
            country.code,
            difficulty.code()
        );
        self.events.push(GameEvent::GameStarted {
            game_id:      game.id.clone(),
            country_code: country.code,
            difficulty:   difficulty.code().to_string(),
            year,
        });
        Ok(game)
    }

    // ── Commands ───────────────────────────────────────────────

    /// Interpret and apply one player command.
    pub fn issue_command(
        &mut self,
        game_id: &str,
        text:    &str,
        now:     DateTime<Utc>,
    ) -> GameResult<CommandOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::EmptyCommand);
        }

        let current = self.game(game_id)?;
        let sequence = self.store.command_count(game_id)?;
        let interpretation = self.interpreter.interpret(text, &current, sequence);
        let category = interpretation.analysis.command_type;

        let next = current.resources.apply(&interpretation.delta);
        let entry = CommandLogEntry {
            id:               Uuid::new_v4().to_string(),
            game_id:          game_id.to_string(),
            timestamp:        now,
            command_text:     text.to_string(),
            category,
            status:           CommandStatus::Executed,
            response_message: interpretation.message.clone(),
            applied_delta:    interpretation.delta,
        };

        match self.store.commit_command(game_id, &ResourceUpdate::full(&next), &entry) {
            Ok(state) => {
                log::info!(
                    "game={game_id} command applied: category={} source={:?} warnings={}",
                    category.code(),
                    interpretation.source,
                    interpretation.analysis.warnings.len()
                );
                self.events.push(GameEvent::CommandApplied {
                    game_id:  game_id.to_string(),
                    log_id:   entry.id.clone(),
                    category,
                    source:   interpretation.source,
                    warnings: interpretation.analysis.warnings.clone(),
                });
                Ok(CommandOutcome {
                    state,
                    interpretation,
                    log_entry: entry,
                })
            }
            Err(e) => {
                self.record_failure(game_id, text, category, &e, now);
                Err(e)
            }
        }
    }

    /// Best-effort audit row for a command whose update did not commit.
    fn record_failure(
        &mut self,
        game_id:  &str,
        text:     &str,
        category: CommandCategory,
        error:    &GameError,
        now:      DateTime<Utc>,
    ) {
        log::warn!("game={game_id} command not applied: {error}");
        let failed = CommandLogEntry {
            id:               Uuid::new_v4().to_string(),
            game_id:          game_id.to_string(),
            timestamp:        now,
            command_text:     text.to_string(),
            category,
            status:           CommandStatus::Failed,
            response_message: format!("❌ فشل تنفيذ الأمر: {error}"),
            applied_delta:    EffectDelta::ZERO,
        };
        if let Err(log_err) = self.store.append_log(&failed) {
            log::warn!("game={game_id} failed-command row not written: {log_err}");
        }
        self.events.push(GameEvent::CommandFailed {
            game_id: game_id.to_string(),
            reason:  error.to_string(),
        });
    }

    // ── Passive income ─────────────────────────────────────────

    /// Add `tp_per_intelligence_level × intelligence_level` tactical points.
    pub fn regenerate_tactical_points(
        &mut self,
        game_id: &str,
        now:     DateTime<Utc>,
    ) -> GameResult<GameState> {
        let current = self.game(game_id)?;
        let gain = self
            .config
            .tp_per_intelligence_level
            .saturating_mul(i64::from(current.resources.intelligence_level));

        let update = ResourceUpdate {
            tactical_points:    Some(current.resources.tactical_points.saturating_add(gain).max(0)),
            last_tp_generation: Some(now),
            ..ResourceUpdate::default()
        };
        let state = self.store.update_resources(game_id, &update, now)?;

        log::debug!(
            "game={game_id} regen: +{gain} tactical points (total {})",
            state.resources.tactical_points
        );
        self.events.push(GameEvent::TacticalPointsGenerated {
            game_id: game_id.to_string(),
            gained:  gain,
            total:   state.resources.tactical_points,
        });
        Ok(state)
    }

    /// Run the regen tick only if a full interval has passed since the
    /// last stamp on the committed row.
    pub fn regenerate_if_due(
        &mut self,
        game_id: &str,
        now:     DateTime<Utc>,
    ) -> GameResult<Option<GameState>> {
        let current = self.game(game_id)?;
        if !self.regen.is_due(current.last_tp_generation, now) {
            return Ok(None);
        }
        self.regenerate_tactical_points(game_id, now).map(Some)
    }

    /// Time left before `regenerate_if_due` would fire; zero when due.
    pub fn until_next_regen(&self, game_id: &str, now: DateTime<Utc>) -> GameResult<chrono::Duration> {
        let current = self.game(game_id)?;
        Ok(self.regen.until_due(current.last_tp_generation, now))
    }
}

impl GameEngine<SqliteStore> {
    /// In-memory engine with test config and local analysis.
    pub fn build_test(seed: u64) -> GameResult<Self> {
        let store = SqliteStore::in_memory()?;
        store.migrate()?;
        Self::build(store, GameConfig::default_test(), seed)
    }

    /// Open (or create) a database file, migrate it, and wire the engine.
    pub fn open(path: &str, config: GameConfig, seed: u64) -> GameResult<Self> {
        let store = SqliteStore::open(path)?;
        store.migrate()?;
        Self::build(store, config, seed)
    }
}
