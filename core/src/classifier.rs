//! Command classifier: free text -> exactly one `CommandCategory`.
//!
//! PRECEDENCE (fixed, first match wins, never reordered):
//!   1. military_budget   budget AND army
//!   2. nationalize       nationalize AND oil
//!   3. recruitment       conscription | mobilization
//!   4. intelligence      intelligence-service | espionage
//!   5. nuclear           nuclear | atomic
//!   6. warfare           war | invasion | attack
//!   7. peace             peace | truce
//!   8. reform            reform | development
//!   9. tanks             tank | tanks
//!  10. aircraft          aircraft | planes | fighter
//!  11. unknown           (fallback)
//!
//! A command can carry several overlapping keywords; the order above is
//! the disambiguation policy. Matching is plain substring containment on
//! the lower-cased text.

use crate::command::{CommandCategory, Intent};

/// One classification rule. Every group must match; within a group any
/// single keyword is enough.
#[derive(Debug)]
pub struct KeywordRule {
    pub category: CommandCategory,
    pub groups:   &'static [&'static [&'static str]],
}

impl KeywordRule {
    fn matches(&self, text: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|kw| text.contains(kw)))
    }
}

pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        category: CommandCategory::MilitaryBudget,
        groups:   &[&["ميزانية"], &["جيش"]],
    },
    KeywordRule {
        category: CommandCategory::Nationalize,
        groups:   &[&["تأميم"], &["نفط"]],
    },
    KeywordRule {
        category: CommandCategory::Recruitment,
        groups:   &[&["تجنيد", "تعبئة"]],
    },
    KeywordRule {
        category: CommandCategory::Intelligence,
        groups:   &[&["مخابرات", "استخبارات"]],
    },
    KeywordRule {
        category: CommandCategory::Nuclear,
        groups:   &[&["نووي", "ذري"]],
    },
    KeywordRule {
        category: CommandCategory::Warfare,
        groups:   &[&["حرب", "غزو", "هجوم"]],
    },
    KeywordRule {
        category: CommandCategory::Peace,
        groups:   &[&["سلام", "هدنة"]],
    },
    KeywordRule {
        category: CommandCategory::Reform,
        groups:   &[&["إصلاح", "تطوير"]],
    },
    KeywordRule {
        category: CommandCategory::Tanks,
        groups:   &[&["دبابة", "دبابات"]],
    },
    KeywordRule {
        category: CommandCategory::Aircraft,
        groups:   &[&["طائرة", "طائرات", "مقاتلة"]],
    },
];

/// Classify a command. Total: never fails, always returns one category.
pub fn classify(text: &str) -> CommandCategory {
    let normalized = text.to_lowercase();
    let category = RULES
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.category)
        .unwrap_or(CommandCategory::Unknown);
    log::debug!("classify: {:?} -> {}", text, category.code());
    category
}

/// Coarse intent, read from the raw text.
/// Checked in order: offensive, defensive, development, nuclear.
pub fn extract_intent(text: &str) -> Intent {
    let has = |kws: &[&str]| kws.iter().any(|kw| text.contains(kw));

    if has(&["حرب", "غزو"]) {
        Intent::Offensive
    } else if has(&["سلام", "هدنة"]) {
        Intent::Defensive
    } else if has(&["تطوير", "إصلاح"]) {
        Intent::Development
    } else if has(&["نووي"]) {
        Intent::NuclearDevelopment
    } else {
        Intent::GeneralOperations
    }
}
