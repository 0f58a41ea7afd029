//! Command analysis: remote service first, local engine as the guaranteed
//! fallback.
//!
//! RULES:
//!   - `Interpreter::interpret` never fails. Any remote error class
//!     (transport, timeout, non-2xx, undecodable body) is logged and the
//!     local classifier + effect generator answer instead.
//!   - The remote payload and the local result share one shape (`Analysis`).

use crate::{
    classifier::{classify, extract_intent},
    command::{CommandCategory, Intent},
    config::RemoteAnalyzerConfig,
    effects::{compose_message, delta_for, generate, EffectDelta},
    error::{GameError, GameResult},
    game::GameState,
    rng::GameRng,
};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

pub const LOCAL_CONFIDENCE: f64 = 0.85;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetLocation {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EconomicImpact {
    pub treasury:  f64,
    pub manpower:  i64,
    pub stability: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MilitaryImpact {
    pub tactical_points:      i64,
    pub combat_effectiveness: i32,
}

/// Wire shape shared by the remote service and the local engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub intent:          Intent,
    pub confidence:      f64,
    pub command_type:    CommandCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_location: Option<TargetLocation>,
    pub economic_impact: EconomicImpact,
    pub military_impact: MilitaryImpact,
    pub strategic_value: String,
    #[serde(default)]
    pub warnings:        Vec<String>,
}

impl Analysis {
    /// Numeric fields come from the payload; war, intelligence and nuclear
    /// transitions always come from the category table.
    pub fn delta(&self) -> EffectDelta {
        EffectDelta {
            treasury:             self.economic_impact.treasury,
            manpower:             self.economic_impact.manpower,
            stability:            self.economic_impact.stability,
            tactical_points:      self.military_impact.tactical_points,
            combat_effectiveness: self.military_impact.combat_effectiveness,
            ..delta_for(self.command_type)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Remote,
    Local,
}

/// Everything the engine needs to apply and log one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub analysis: Analysis,
    pub delta:    EffectDelta,
    pub message:  String,
    pub source:   AnalysisSource,
}

/// A fallible source of command analyses.
pub trait Analyzer: Send {
    fn analyze(&self, command: &str, state: &GameState) -> GameResult<Analysis>;
}

/// Pure local analysis: classify, generate, attach intent and target.
pub fn local_analysis(command: &str, state: &GameState, rng: &mut GameRng) -> Interpretation {
    let category = classify(command);
    let outcome = generate(category, &state.resources);

    let analysis = Analysis {
        intent:          extract_intent(command),
        confidence:      LOCAL_CONFIDENCE,
        command_type:    category,
        target_location: Some(TargetLocation {
            x: rng.next_u64_below(100) as u32,
            y: rng.next_u64_below(100) as u32,
        }),
        economic_impact: EconomicImpact {
            treasury:  outcome.delta.treasury,
            manpower:  outcome.delta.manpower,
            stability: outcome.delta.stability,
        },
        military_impact: MilitaryImpact {
            tactical_points:      outcome.delta.tactical_points,
            combat_effectiveness: outcome.delta.combat_effectiveness,
        },
        strategic_value: category.strategic_value().to_string(),
        warnings:        outcome.warnings.iter().map(|w| w.message().to_string()).collect(),
    };

    Interpretation {
        analysis,
        delta:   outcome.delta,
        message: outcome.message,
        source:  AnalysisSource::Local,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    command:    &'a str,
    game_state: &'a GameState,
    language:   &'a str,
}

/// HTTP client for the hosted command analyzer.
pub struct RemoteAnalyzer {
    client: Client,
    config: RemoteAnalyzerConfig,
}

impl RemoteAnalyzer {
    pub fn new(config: RemoteAnalyzerConfig) -> GameResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }
}

impl Analyzer for RemoteAnalyzer {
    fn analyze(&self, command: &str, state: &GameState) -> GameResult<Analysis> {
        let body = AnalysisRequest {
            command,
            game_state: state,
            language: &self.config.language,
        };
        let mut req = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        if !resp.status().is_success() {
            return Err(GameError::RemoteStatus { status: resp.status().as_u16() });
        }
        let text = resp.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Remote-with-fallback composition around the local engine.
pub struct Interpreter {
    remote: Option<Box<dyn Analyzer>>,
    seed:   u64,
}

impl Interpreter {
    /// Local analysis only.
    pub fn local(seed: u64) -> Self {
        Self { remote: None, seed }
    }

    pub fn with_remote(seed: u64, remote: Box<dyn Analyzer>) -> Self {
        Self { remote: Some(remote), seed }
    }

    /// Build from config: remote when an endpoint is configured and the
    /// client can be constructed, local otherwise.
    pub fn from_config(seed: u64, config: Option<&RemoteAnalyzerConfig>) -> Self {
        match config.map(|c| RemoteAnalyzer::new(c.clone())) {
            Some(Ok(remote)) => Self::with_remote(seed, Box::new(remote)),
            Some(Err(e)) => {
                log::warn!("remote analyzer disabled: {e}");
                Self::local(seed)
            }
            None => Self::local(seed),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Analyze `command` against the committed `state`. Never fails.
    /// `sequence` selects the RNG stream for the local target marker.
    pub fn interpret(&self, command: &str, state: &GameState, sequence: u64) -> Interpretation {
        self.remote
            .as_ref()
            .and_then(|remote| match remote.analyze(command, state) {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    log::warn!("game={} remote analysis failed, using local: {e}", state.id);
                    None
                }
            })
            .map(remote_interpretation)
            .unwrap_or_else(|| {
                let mut rng = GameRng::new(self.seed, sequence);
                local_analysis(command, state, &mut rng)
            })
    }
}

fn remote_interpretation(analysis: Analysis) -> Interpretation {
    let delta = analysis.delta();
    let message = compose_message(analysis.command_type, &delta, &analysis.warnings);
    Interpretation {
        analysis,
        delta,
        message,
        source: AnalysisSource::Remote,
    }
}
