use serde::{Deserialize, Serialize};

/// The closed set of categories a player command is classified into.
/// Exactly one is selected per command; `Unknown` is the fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    MilitaryBudget,
    Nationalize,
    Recruitment,
    Intelligence,
    Nuclear,
    Warfare,
    Peace,
    Reform,
    Tanks,
    Aircraft,
    Unknown,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 11] = [
        Self::MilitaryBudget,
        Self::Nationalize,
        Self::Recruitment,
        Self::Intelligence,
        Self::Nuclear,
        Self::Warfare,
        Self::Peace,
        Self::Reform,
        Self::Tanks,
        Self::Aircraft,
        Self::Unknown,
    ];

    /// Stable wire name, also used for the `category` column in command_log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MilitaryBudget => "military_budget",
            Self::Nationalize    => "nationalize",
            Self::Recruitment    => "recruitment",
            Self::Intelligence   => "intelligence",
            Self::Nuclear        => "nuclear",
            Self::Warfare        => "warfare",
            Self::Peace          => "peace",
            Self::Reform         => "reform",
            Self::Tanks          => "tanks",
            Self::Aircraft       => "aircraft",
            Self::Unknown        => "unknown",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Player-facing label shown in the command response.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MilitaryBudget => "زيادة الميزانية العسكرية",
            Self::Nationalize    => "تأميم النفط",
            Self::Recruitment    => "التجنيد والتعبئة",
            Self::Intelligence   => "عمليات استخباراتية",
            Self::Nuclear        => "البرنامج النووي",
            Self::Warfare        => "عمليات حربية",
            Self::Peace          => "مبادرة سلام",
            Self::Reform         => "إصلاحات داخلية",
            Self::Tanks          => "تعزيز سلاح المدرعات",
            Self::Aircraft       => "تعزيز سلاح الجو",
            Self::Unknown        => "أمر غير معروف",
        }
    }

    pub fn strategic_value(&self) -> &'static str {
        match self {
            Self::Warfare        => "عالي جداً - تحقيق أهداف عسكرية استراتيجية",
            Self::Nuclear        => "حرج - تغيير في توازن القوى",
            Self::Intelligence   => "عالي - الحصول على معلومات استخباراتية",
            Self::MilitaryBudget => "متوسط - تحسين الجاهزية القتالية",
            Self::Recruitment    => "متوسط - زيادة القوى البشرية",
            Self::Nationalize    => "متوسط - تحسين الموارد الاقتصادية",
            Self::Reform         => "متوسط - استقرار داخلي",
            Self::Peace | Self::Tanks | Self::Aircraft | Self::Unknown => {
                "منخفض - عمليات روتينية"
            }
        }
    }
}

/// Coarse intent of a command, reported alongside the category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Offensive,
    Defensive,
    Development,
    NuclearDevelopment,
    GeneralOperations,
    /// Reported by the remote analyzer for unsupported languages.
    Unknown,
}

/// Outcome recorded on each command_log row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    /// Engine-generated entry (game start banner).
    System,
    Executed,
    /// Persistence failed; resources were left unchanged.
    Failed,
}

impl CommandStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::System   => "system",
            Self::Executed => "executed",
            Self::Failed   => "failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "system"   => Some(Self::System),
            "executed" => Some(Self::Executed),
            "failed"   => Some(Self::Failed),
            _          => None,
        }
    }
}
