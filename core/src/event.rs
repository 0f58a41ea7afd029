//! Engine events and the persisted command log.
//!
//! RULE: command_log is append-only. Rows are never updated or deleted,
//! and are read back ordered by timestamp.

use crate::{
    analysis::AnalysisSource,
    command::{CommandCategory, CommandStatus},
    effects::EffectDelta,
    types::{EntityId, GameId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the engine did in response to one call, for the caller to
/// render. Not persisted; the command log is the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        game_id:      GameId,
        country_code: String,
        difficulty:   String,
        year:         i32,
    },
    CommandApplied {
        game_id:  GameId,
        log_id:   EntityId,
        category: CommandCategory,
        source:   AnalysisSource,
        warnings: Vec<String>,
    },
    CommandFailed {
        game_id: GameId,
        reason:  String,
    },
    TacticalPointsGenerated {
        game_id: GameId,
        gained:  i64,
        total:   i64,
    },
}

/// A command_log row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandLogEntry {
    pub id:               EntityId,
    pub game_id:          GameId,
    pub timestamp:        DateTime<Utc>,
    pub command_text:     String,
    pub category:         CommandCategory,
    pub status:           CommandStatus,
    pub response_message: String,
    pub applied_delta:    EffectDelta,
}
