use crate::game::{Country, Difficulty};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DifficultyModifier {
    pub treasury:  f64,
    pub manpower:  f64,
    pub stability: f64,
}

impl Default for DifficultyModifier {
    fn default() -> Self {
        Self { treasury: 1.0, manpower: 1.0, stability: 1.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DifficultyEntry {
    difficulty: Difficulty,
    #[serde(flatten)]
    modifier:   DifficultyModifier,
}

/// Remote command-analysis endpoint. Absent means local analysis only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteAnalyzerConfig {
    pub endpoint:     String,
    #[serde(default)]
    pub api_key:      Option<String>,
    pub timeout_secs: u64,
    #[serde(default = "default_language")]
    pub language:     String,
}

fn default_language() -> String {
    "ar".into()
}

impl RemoteAnalyzerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GameConfigFile {
    initial_tactical_points:   i64,
    tp_per_intelligence_level: i64,
    regen_interval_secs:       u64,
    min_year:                  i32,
    max_year:                  i32,
    difficulties:              Vec<DifficultyEntry>,
    #[serde(default)]
    remote_analyzer:           Option<RemoteAnalyzerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct CountriesFile {
    countries: Vec<Country>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Tactical points every new game starts with.
    pub initial_tactical_points:   i64,
    /// Passive income per regen tick, multiplied by intelligence level.
    pub tp_per_intelligence_level: i64,
    pub regen_interval_secs:       u64,
    pub min_year:                  i32,
    pub max_year:                  i32,
    pub difficulty_modifiers:      HashMap<Difficulty, DifficultyModifier>,
    pub remote_analyzer:           Option<RemoteAnalyzerConfig>,
    /// Roster seeded into the store at startup.
    pub countries:                 Vec<Country>,
}

impl GameConfig {
    /// Load from the data/ directory.
    /// In tests, use GameConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/game_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: GameConfigFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let countries_path = format!("{data_dir}/countries.json");
        let countries_content = std::fs::read_to_string(&countries_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {countries_path}: {e}"))?;
        let countries_file: CountriesFile = serde_json::from_str(&countries_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {countries_path}: {e}"))?;

        if file.min_year > file.max_year {
            anyhow::bail!(
                "{path}: min_year {} is after max_year {}",
                file.min_year,
                file.max_year
            );
        }

        let difficulty_modifiers = file
            .difficulties
            .into_iter()
            .map(|d| (d.difficulty, d.modifier))
            .collect();

        Ok(Self {
            initial_tactical_points:   file.initial_tactical_points,
            tp_per_intelligence_level: file.tp_per_intelligence_level,
            regen_interval_secs:       file.regen_interval_secs,
            min_year:                  file.min_year,
            max_year:                  file.max_year,
            difficulty_modifiers,
            remote_analyzer:           file.remote_analyzer,
            countries:                 countries_file.countries,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let difficulty_modifiers = [
            (Difficulty::Stable,     DifficultyModifier { treasury: 1.0, manpower: 1.0, stability: 1.0 }),
            (Difficulty::Unstable,   DifficultyModifier { treasury: 0.7, manpower: 0.8, stability: 0.6 }),
            (Difficulty::CivilWar,   DifficultyModifier { treasury: 0.4, manpower: 0.5, stability: 0.3 }),
            (Difficulty::WorldAtWar, DifficultyModifier { treasury: 0.5, manpower: 1.5, stability: 0.4 }),
        ]
        .into_iter()
        .collect();

        Self {
            initial_tactical_points:   100,
            tp_per_intelligence_level: 5,
            regen_interval_secs:       60,
            min_year:                  1980,
            max_year:                  2030,
            difficulty_modifiers,
            remote_analyzer:           None,
            countries: vec![
                Country {
                    code:               "EG".into(),
                    name_ar:            "مصر".into(),
                    name_en:            "Egypt".into(),
                    region:             "North Africa".into(),
                    base_treasury_1980: 120.0,
                    base_treasury_2000: 250.0,
                    base_treasury_2020: 400.0,
                    base_manpower:      450_000,
                    base_stability:     65,
                    tech_era:           "modern".into(),
                },
                Country {
                    code:               "SA".into(),
                    name_ar:            "السعودية".into(),
                    name_en:            "Saudi Arabia".into(),
                    region:             "Gulf".into(),
                    base_treasury_1980: 300.0,
                    base_treasury_2000: 500.0,
                    base_treasury_2020: 900.0,
                    base_manpower:      250_000,
                    base_stability:     75,
                    tech_era:           "advanced".into(),
                },
            ],
        }
    }

    pub fn modifier(&self, difficulty: Difficulty) -> DifficultyModifier {
        self.difficulty_modifiers
            .get(&difficulty)
            .copied()
            .unwrap_or_default()
    }

    pub fn regen_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.regen_interval_secs as i64)
    }
}
