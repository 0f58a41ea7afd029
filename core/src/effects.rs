//! Effect generator: (category, pre-delta state) -> delta, warnings, message.
//!
//! RULES:
//!   - The delta for a category is static table data. It never depends
//!     on the current state.
//!   - Warnings are independent predicates over the PRE-delta state.
//!     All that hold fire, in the fixed order of `Warning::ALL`.
//!   - Nothing here touches the store.

use crate::{command::CommandCategory, snapshot::ResourceSnapshot};
use serde::{Deserialize, Serialize};

/// Signed adjustment vector for one command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EffectDelta {
    pub treasury:              f64,
    pub manpower:              i64,
    pub stability:             i32,
    pub tactical_points:       i64,
    /// Informational military metric; not persisted on the snapshot.
    pub combat_effectiveness:  i32,
    #[serde(default)]
    pub intelligence_level:    i32,
    #[serde(default)]
    pub nuclear_program_stage: i32,
    /// `Some(true)` enters war, `Some(false)` ends it.
    #[serde(default)]
    pub at_war:                Option<bool>,
}

impl EffectDelta {
    pub const ZERO: EffectDelta = EffectDelta {
        treasury:              0.0,
        manpower:              0,
        stability:             0,
        tactical_points:       0,
        combat_effectiveness:  0,
        intelligence_level:    0,
        nuclear_program_stage: 0,
        at_war:                None,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

const fn delta(
    treasury: f64,
    manpower: i64,
    stability: i32,
    tactical_points: i64,
    combat_effectiveness: i32,
) -> EffectDelta {
    EffectDelta {
        treasury,
        manpower,
        stability,
        tactical_points,
        combat_effectiveness,
        ..EffectDelta::ZERO
    }
}

const MILITARY_BUDGET: EffectDelta = delta(-20.0, 50_000, 5, 10, 15);
const NATIONALIZE: EffectDelta     = delta(50.0, 0, -10, 0, 0);
const RECRUITMENT: EffectDelta     = delta(-5.0, 100_000, -3, 0, 0);
const INTELLIGENCE: EffectDelta = EffectDelta {
    intelligence_level: 1,
    ..delta(-30.0, 0, 0, 20, 10)
};
const NUCLEAR: EffectDelta = EffectDelta {
    nuclear_program_stage: 1,
    ..delta(-80.0, 0, -5, 50, 30)
};
const WARFARE: EffectDelta = EffectDelta {
    at_war: Some(true),
    ..delta(0.0, 0, -15, -50, 40)
};
const PEACE: EffectDelta = EffectDelta {
    at_war: Some(false),
    ..delta(0.0, 0, 10, 0, 0)
};
const REFORM: EffectDelta   = delta(-15.0, 0, 20, 0, 0);
const TANKS: EffectDelta    = delta(-10.0, 0, 0, 5, 12);
const AIRCRAFT: EffectDelta = delta(-25.0, 0, 0, 8, 20);

/// Static delta table lookup.
pub fn delta_for(category: CommandCategory) -> EffectDelta {
    match category {
        CommandCategory::MilitaryBudget => MILITARY_BUDGET,
        CommandCategory::Nationalize    => NATIONALIZE,
        CommandCategory::Recruitment    => RECRUITMENT,
        CommandCategory::Intelligence   => INTELLIGENCE,
        CommandCategory::Nuclear        => NUCLEAR,
        CommandCategory::Warfare        => WARFARE,
        CommandCategory::Peace          => PEACE,
        CommandCategory::Reform         => REFORM,
        CommandCategory::Tanks          => TANKS,
        CommandCategory::Aircraft       => AIRCRAFT,
        CommandCategory::Unknown        => EffectDelta::ZERO,
    }
}

/// Advisory attached to a command outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    LowStability,
    InsufficientFunds,
    OverspendRisk,
    EnteringWar,
    WartimeReform,
}

impl Warning {
    /// Evaluation and output order.
    pub const ALL: [Warning; 5] = [
        Self::LowStability,
        Self::InsufficientFunds,
        Self::OverspendRisk,
        Self::EnteringWar,
        Self::WartimeReform,
    ];

    pub fn applies(&self, category: CommandCategory, state: &ResourceSnapshot) -> bool {
        use CommandCategory::*;
        match self {
            Self::LowStability      => category == Warfare && state.stability < 30,
            Self::InsufficientFunds => category == Nuclear && state.treasury < 80.0,
            Self::OverspendRisk     => category == MilitaryBudget && state.stability < 20,
            Self::EnteringWar       => category == Warfare && !state.at_war,
            Self::WartimeReform     => state.at_war && category == Reform,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::LowStability =>
                "⚠️ الاستقرار الداخلي منخفض جداً - العملية الحربية قد تؤدي لانهيار داخلي",
            Self::InsufficientFunds =>
                "⚠️ الموارد غير كافية للبرنامج النووي",
            Self::OverspendRisk =>
                "⚠️ زيادة الإنفاق العسكري قد تؤثر على الاستقرار",
            Self::EnteringWar =>
                "⚠️ ستدخل الدولة في حالة حرب - الاستعداد عالي المستوى",
            Self::WartimeReform =>
                "⚠️ الإصلاحات أثناء الحرب قد تؤثر على تركيز القوات",
        }
    }
}

/// All warnings that fire for `category` against the pre-delta `state`.
pub fn warnings_for(category: CommandCategory, state: &ResourceSnapshot) -> Vec<Warning> {
    Warning::ALL
        .into_iter()
        .filter(|w| w.applies(category, state))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectOutcome {
    pub delta:    EffectDelta,
    pub warnings: Vec<Warning>,
    pub message:  String,
}

/// Pure: look up the delta, evaluate warnings, compose the message.
pub fn generate(category: CommandCategory, state: &ResourceSnapshot) -> EffectOutcome {
    let delta = delta_for(category);
    let warnings = warnings_for(category, state);
    let warning_text: Vec<&str> = warnings.iter().map(Warning::message).collect();
    let message = compose_message(category, &delta, &warning_text);
    EffectOutcome { delta, warnings, message }
}

/// Build the player-facing response.
///
/// Always contains the category label and code, one line per nonzero
/// delta field, and every warning verbatim.
pub fn compose_message<S: AsRef<str>>(
    category: CommandCategory,
    delta: &EffectDelta,
    warnings: &[S],
) -> String {
    let mut lines = Vec::new();

    if category == CommandCategory::Unknown && delta.is_zero() {
        lines.push(format!(
            "❓ {} [{}] - لم يتم التعرف على الأمر، لا توجد تأثيرات",
            category.label(),
            category.code()
        ));
    } else {
        lines.push(format!("✅ تم تنفيذ الأمر: {} [{}]", category.label(), category.code()));
    }

    let mut effects = Vec::new();
    if delta.treasury != 0.0 {
        effects.push(format!("💰 الخزينة: {:+}B", delta.treasury));
    }
    if delta.manpower != 0 {
        effects.push(format!("👥 القوى البشرية: {:+}", delta.manpower));
    }
    if delta.stability != 0 {
        effects.push(format!("🏛️ الاستقرار: {:+}", delta.stability));
    }
    if delta.tactical_points != 0 {
        effects.push(format!("🎯 النقاط التكتيكية: {:+}", delta.tactical_points));
    }
    if delta.combat_effectiveness != 0 {
        effects.push(format!("⚔️ الفعالية القتالية: {:+}", delta.combat_effectiveness));
    }
    if delta.intelligence_level != 0 {
        effects.push(format!("🕵️ مستوى الاستخبارات: {:+}", delta.intelligence_level));
    }
    if delta.nuclear_program_stage != 0 {
        effects.push(format!("☢️ مرحلة البرنامج النووي: {:+}", delta.nuclear_program_stage));
    }
    match delta.at_war {
        Some(true)  => effects.push("🔥 حالة الحرب: معلنة".to_string()),
        Some(false) => effects.push("🕊️ حالة الحرب: منتهية".to_string()),
        None        => {}
    }

    if !effects.is_empty() {
        lines.push(String::new());
        lines.push("📊 التأثيرات:".to_string());
        lines.extend(effects);
    }

    if category != CommandCategory::Unknown {
        lines.push(String::new());
        lines.push(format!("📈 القيمة الاستراتيجية: {}", category.strategic_value()));
    }

    if !warnings.is_empty() {
        lines.push(String::new());
        lines.extend(warnings.iter().map(|w| w.as_ref().to_string()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_only_nonzero_fields() {
        let msg = compose_message::<&str>(CommandCategory::Reform, &delta_for(CommandCategory::Reform), &[]);
        assert!(msg.contains("reform"));
        assert!(msg.contains("الخزينة: -15B"));
        assert!(msg.contains("الاستقرار: +20"));
        assert!(!msg.contains("القوى البشرية"));
        assert!(!msg.contains("النقاط التكتيكية"));
    }

    #[test]
    fn unknown_with_effects_does_not_claim_none() {
        let delta = EffectDelta { stability: 4, ..EffectDelta::ZERO };
        let msg = compose_message::<&str>(CommandCategory::Unknown, &delta, &[]);
        assert!(msg.contains("[unknown]"));
        assert!(msg.contains("الاستقرار: +4"));
        assert!(!msg.contains("لا توجد تأثيرات"));
    }

    #[test]
    fn unknown_message_has_no_effect_block() {
        let msg = compose_message::<&str>(CommandCategory::Unknown, &EffectDelta::ZERO, &[]);
        assert!(msg.contains("unknown"));
        assert!(!msg.contains("التأثيرات"));
    }
}
