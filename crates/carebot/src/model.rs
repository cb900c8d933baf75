use serde::{Deserialize, Serialize};

/// A single row of the reference catalog (e.g., "Common Cold").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Disease name, e.g. "Common Cold"
    pub disease_name: String,
    /// Free-text symptom description. Only ever used as embedding input.
    pub symptoms: String,
    /// Free-text recommendation shown to the user
    pub cure: String,
}

/// Outcome of matching one query against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Best-scoring record, present only when it cleared the similarity threshold.
    pub record: Option<CatalogRecord>,
    /// Cosine similarity of the best-scoring record, clamped to [0, 1].
    pub confidence: f32,
}

impl MatchResult {
    pub fn matched(record: CatalogRecord, confidence: f32) -> Self {
        Self {
            record: Some(record),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn unmatched(confidence: f32) -> Self {
        Self {
            record: None,
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
        }
    }

    pub fn is_match(&self) -> bool {
        self.record.is_some()
    }
}

/// Wellness-tip grouping used to personalize advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Sleep,
    Energy,
    Stress,
    Hydration,
    Diet,
    Mental,
    General,
}

impl TipCategory {
    pub const ALL: [TipCategory; 7] = [
        TipCategory::Sleep,
        TipCategory::Energy,
        TipCategory::Stress,
        TipCategory::Hydration,
        TipCategory::Diet,
        TipCategory::Mental,
        TipCategory::General,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TipCategory::Sleep => "sleep",
            TipCategory::Energy => "energy",
            TipCategory::Stress => "stress",
            TipCategory::Hydration => "hydration",
            TipCategory::Diet => "diet",
            TipCategory::Mental => "mental",
            TipCategory::General => "general",
        }
    }
}

/// A selectable output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Display name, e.g. "Hindi"
    pub name: &'static str,
    /// Code understood by the translation service, e.g. "hi" or "zh-CN"
    pub code: &'static str,
}

/// Final, possibly translated, answer for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub tips: Vec<String>,
    pub language: String,
}
