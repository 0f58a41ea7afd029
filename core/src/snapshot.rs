//! Resource snapshot: the numeric state of one game session.
//!
//! RULE: The engine never mutates a snapshot in place.
//! `apply` returns a new, re-clamped snapshot; the store persists it.
//!
//! Invariants held by every snapshot that leaves this module:
//!   - treasury, manpower, tactical_points >= 0
//!   - stability in [0, 100]
//!   - nuclear_program_stage in [0, 5]
//!   - intelligence_level >= 1 and never decreases

use crate::effects::EffectDelta;
use serde::{Deserialize, Serialize};

pub const STABILITY_MAX: i32 = 100;
pub const NUCLEAR_STAGE_MAX: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceSnapshot {
    pub treasury:              f64,
    pub manpower:              i64,
    pub stability:             i32,
    pub tactical_points:       i64,
    pub intelligence_level:    i32,
    pub nuclear_program_stage: i32,
    pub nuclear_warheads:      i64,
    pub at_war:                bool,
    pub war_target:            Option<String>,
}

impl Default for ResourceSnapshot {
    fn default() -> Self {
        Self {
            treasury:              0.0,
            manpower:              0,
            stability:             50,
            tactical_points:       0,
            intelligence_level:    1,
            nuclear_program_stage: 0,
            nuclear_warheads:      0,
            at_war:                false,
            war_target:            None,
        }
    }
}

impl ResourceSnapshot {
    /// Force every field back inside its legal range.
    pub fn clamped(mut self) -> Self {
        self.treasury              = self.treasury.clamp(0.0, f64::MAX);
        self.manpower              = self.manpower.max(0);
        self.stability             = self.stability.clamp(0, STABILITY_MAX);
        self.tactical_points       = self.tactical_points.max(0);
        self.intelligence_level    = self.intelligence_level.max(1);
        self.nuclear_program_stage = self.nuclear_program_stage.clamp(0, NUCLEAR_STAGE_MAX);
        self.nuclear_warheads      = self.nuclear_warheads.max(0);
        self
    }

    /// Add `delta` field by field, then re-clamp.
    /// Integer fields saturate; remote deltas are not range-checked.
    /// Combat effectiveness is informational and has no field here.
    pub fn apply(&self, delta: &EffectDelta) -> Self {
        let mut next = self.clone();
        next.treasury              += delta.treasury;
        next.manpower              = next.manpower.saturating_add(delta.manpower);
        next.stability             = next.stability.saturating_add(delta.stability);
        next.tactical_points       = next.tactical_points.saturating_add(delta.tactical_points);
        next.intelligence_level    = next.intelligence_level.saturating_add(delta.intelligence_level.max(0));
        next.nuclear_program_stage = next.nuclear_program_stage.saturating_add(delta.nuclear_program_stage);

        if let Some(at_war) = delta.at_war {
            next.at_war = at_war;
            if !at_war {
                next.war_target = None;
            }
        }
        next.clamped()
    }
}

/// A partial field set for `GameStore::update_resources`.
/// `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceUpdate {
    pub treasury:              Option<f64>,
    pub manpower:              Option<i64>,
    pub stability:             Option<i32>,
    pub tactical_points:       Option<i64>,
    pub intelligence_level:    Option<i32>,
    pub nuclear_program_stage: Option<i32>,
    pub nuclear_warheads:      Option<i64>,
    pub at_war:                Option<bool>,
    /// Outer `None`: untouched. `Some(None)`: cleared.
    pub war_target:            Option<Option<String>>,
    pub last_tp_generation:    Option<chrono::DateTime<chrono::Utc>>,
}

impl ResourceUpdate {
    /// Every resource column set from `snapshot`.
    pub fn full(snapshot: &ResourceSnapshot) -> Self {
        Self {
            treasury:              Some(snapshot.treasury),
            manpower:              Some(snapshot.manpower),
            stability:             Some(snapshot.stability),
            tactical_points:       Some(snapshot.tactical_points),
            intelligence_level:    Some(snapshot.intelligence_level),
            nuclear_program_stage: Some(snapshot.nuclear_program_stage),
            nuclear_warheads:      Some(snapshot.nuclear_warheads),
            at_war:                Some(snapshot.at_war),
            war_target:            Some(snapshot.war_target.clone()),
            last_tp_generation:    None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_restores_every_bound() {
        let raw = ResourceSnapshot {
            treasury:              -3.5,
            manpower:              -10,
            stability:             140,
            tactical_points:       -1,
            intelligence_level:    0,
            nuclear_program_stage: 9,
            nuclear_warheads:      -2,
            at_war:                false,
            war_target:            None,
        };
        let c = raw.clamped();
        assert_eq!(c.treasury, 0.0);
        assert_eq!(c.manpower, 0);
        assert_eq!(c.stability, 100);
        assert_eq!(c.tactical_points, 0);
        assert_eq!(c.intelligence_level, 1);
        assert_eq!(c.nuclear_program_stage, 5);
        assert_eq!(c.nuclear_warheads, 0);
    }

    #[test]
    fn extreme_deltas_saturate_then_clamp() {
        let start = ResourceSnapshot { stability: 65, tactical_points: 100, ..ResourceSnapshot::default() };
        let up = EffectDelta {
            treasury:              f64::MAX,
            manpower:              i64::MAX,
            stability:             i32::MAX,
            tactical_points:       i64::MAX,
            intelligence_level:    i32::MAX,
            nuclear_program_stage: i32::MAX,
            ..EffectDelta::ZERO
        };
        let high = start.apply(&up).apply(&up);
        assert_eq!(high.treasury, f64::MAX);
        assert_eq!(high.manpower, i64::MAX);
        assert_eq!(high.stability, STABILITY_MAX);
        assert_eq!(high.tactical_points, i64::MAX);
        assert_eq!(high.intelligence_level, i32::MAX);
        assert_eq!(high.nuclear_program_stage, NUCLEAR_STAGE_MAX);

        let down = EffectDelta {
            treasury:              -f64::MAX,
            manpower:              i64::MIN,
            stability:             i32::MIN,
            tactical_points:       i64::MIN,
            intelligence_level:    i32::MIN,
            nuclear_program_stage: i32::MIN,
            ..EffectDelta::ZERO
        };
        let low = high.apply(&down);
        assert_eq!(low.treasury, 0.0);
        assert_eq!(low.manpower, 0);
        assert_eq!(low.stability, 0);
        assert_eq!(low.tactical_points, 0);
        assert_eq!(low.intelligence_level, i32::MAX);
        assert_eq!(low.nuclear_program_stage, 0);
    }

    #[test]
    fn ending_war_clears_target() {
        let at_war = ResourceSnapshot {
            at_war:     true,
            war_target: Some("IQ".into()),
            ..ResourceSnapshot::default()
        };
        let delta = EffectDelta { at_war: Some(false), ..EffectDelta::ZERO };
        let next = at_war.apply(&delta);
        assert!(!next.at_war);
        assert_eq!(next.war_target, None);
    }
}
