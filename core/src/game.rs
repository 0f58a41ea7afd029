//! Game session records: the country roster entry, difficulty, and the
//! persisted game_state row, plus the new-game resource formula.

use crate::{
    config::{DifficultyModifier, GameConfig},
    snapshot::{ResourceSnapshot, STABILITY_MAX},
    types::{CountryCode, GameId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub code:               CountryCode,
    pub name_ar:            String,
    pub name_en:            String,
    pub region:             String,
    pub base_treasury_1980: f64,
    pub base_treasury_2000: f64,
    pub base_treasury_2020: f64,
    pub base_manpower:      i64,
    pub base_stability:     i32,
    pub tech_era:           String,
}

impl Country {
    /// Base treasury for the era the game starts in.
    pub fn base_treasury(&self, year: i32) -> f64 {
        if year < 1990 {
            self.base_treasury_1980
        } else if year < 2010 {
            self.base_treasury_2000
        } else {
            self.base_treasury_2020
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[serde(rename = "STABLE")]
    Stable,
    #[serde(rename = "UNSTABLE")]
    Unstable,
    #[serde(rename = "CIVIL WAR")]
    CivilWar,
    #[serde(rename = "WORLD AT WAR")]
    WorldAtWar,
}

impl Difficulty {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Stable     => "STABLE",
            Self::Unstable   => "UNSTABLE",
            Self::CivilWar   => "CIVIL WAR",
            Self::WorldAtWar => "WORLD AT WAR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "STABLE"       => Some(Self::Stable),
            "UNSTABLE"     => Some(Self::Unstable),
            "CIVIL WAR"    => Some(Self::CivilWar),
            "WORLD AT WAR" => Some(Self::WorldAtWar),
            _              => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stable     => "مستقر",
            Self::Unstable   => "غير مستقر",
            Self::CivilWar   => "حرب أهلية",
            Self::WorldAtWar => "حرب عالمية",
        }
    }
}

/// Technology era label for a start year.
pub fn tech_era_label(year: i32) -> &'static str {
    match year {
        y if y < 1990 => "الثمانينات",
        y if y < 2000 => "التسعينات",
        y if y < 2010 => "الألفية",
        y if y < 2020 => "العقد الثاني",
        _             => "العقد الثالث",
    }
}

/// One persisted game session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub id:                 GameId,
    pub country_code:       CountryCode,
    pub country_name:       String,
    pub difficulty:         Difficulty,
    pub year:               i32,
    #[serde(flatten)]
    pub resources:          ResourceSnapshot,
    pub last_tp_generation: DateTime<Utc>,
    pub created_at:         DateTime<Utc>,
    pub updated_at:         DateTime<Utc>,
}

/// Starting resources for `country` at `difficulty` in `year`.
pub fn initial_resources(
    country:    &Country,
    difficulty: Difficulty,
    year:       i32,
    config:     &GameConfig,
) -> ResourceSnapshot {
    let mods: DifficultyModifier = config.modifier(difficulty);
    let stability = (country.base_stability as f64 * mods.stability).round() as i32;

    ResourceSnapshot {
        treasury:              country.base_treasury(year) * mods.treasury,
        manpower:              (country.base_manpower as f64 * mods.manpower).floor() as i64,
        stability:             stability.clamp(0, STABILITY_MAX),
        tactical_points:       config.initial_tactical_points,
        intelligence_level:    1,
        nuclear_program_stage: 0,
        nuclear_warheads:      0,
        at_war:                difficulty == Difficulty::WorldAtWar,
        war_target:            None,
    }
    .clamped()
}

/// Banner logged as the first entry of every game.
pub fn welcome_message(
    country:    &Country,
    difficulty: Difficulty,
    year:       i32,
    resources:  &ResourceSnapshot,
) -> String {
    format!(
        "🎖️ مرحباً بك يا سيادة القائد\n\n\
         تم تفعيل النظام العسكري المتقدم للنواة السيادية\n\n\
         📋 معلومات الدولة:\n\
         - الدولة: {}\n\
         - الصعوبة: {} ({})\n\
         - السنة: {} ({})\n\
         - الخزينة: {:.1}B دولار\n\
         - القوى العاملة: {} جندي\n\
         - الاستقرار: {}%\n\n\
         ⚡ النظام جاهز لتلقي الأوامر\n\
         🎯 في انتظار تعليماتك العسكرية",
        country.name_ar,
        difficulty.label(),
        difficulty.code(),
        year,
        tech_era_label(year),
        resources.treasury,
        resources.manpower,
        resources.stability,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country() -> Country {
        Country {
            code:               "EG".into(),
            name_ar:            "مصر".into(),
            name_en:            "Egypt".into(),
            region:             "MENA".into(),
            base_treasury_1980: 100.0,
            base_treasury_2000: 200.0,
            base_treasury_2020: 400.0,
            base_manpower:      450_000,
            base_stability:     65,
            tech_era:           "modern".into(),
        }
    }

    #[test]
    fn base_treasury_picks_era() {
        let c = country();
        assert_eq!(c.base_treasury(1985), 100.0);
        assert_eq!(c.base_treasury(1990), 200.0);
        assert_eq!(c.base_treasury(2009), 200.0);
        assert_eq!(c.base_treasury(2010), 400.0);
    }

    #[test]
    fn tech_era_boundaries() {
        assert_eq!(tech_era_label(1989), "الثمانينات");
        assert_eq!(tech_era_label(1990), "التسعينات");
        assert_eq!(tech_era_label(2019), "العقد الثاني");
        assert_eq!(tech_era_label(2030), "العقد الثالث");
    }

    #[test]
    fn world_at_war_starts_at_war() {
        let cfg = GameConfig::default_test();
        let r = initial_resources(&country(), Difficulty::WorldAtWar, 2025, &cfg);
        assert!(r.at_war);
        assert_eq!(r.treasury, 200.0);
        assert_eq!(r.manpower, 675_000);
        assert_eq!(r.stability, 26);

        let r = initial_resources(&country(), Difficulty::Stable, 2025, &cfg);
        assert!(!r.at_war);
        assert_eq!(r.stability, 65);
        assert_eq!(r.tactical_points, 100);
    }
}
