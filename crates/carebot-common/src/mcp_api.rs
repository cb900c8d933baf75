use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HandleQueryParams {
    /// Free-text description of the symptoms, e.g. "I have a bad cough and sore throat".
    pub text: String,
    /// Output language as a display name ("Hindi") or code ("hi"). Defaults to English.
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MatchSymptomsParams {
    /// Free-text description of the symptoms.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HandleQueryResponse {
    /// Recommended cure, or a refusal when no catalog entry is a confident match.
    pub answer: String,
    /// Wellness tips (at most three by default).
    pub tips: Vec<String>,
    /// Language code the answer was rendered in.
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MatchSymptomsResponse {
    pub matched: bool,
    pub disease_name: Option<String>,
    pub cure: Option<String>,
    /// Cosine similarity of the best catalog entry, in [0, 1].
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguageInfo {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguageListResponse {
    pub languages: Vec<LanguageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TipCategoryInfo {
    pub key: String,
    pub tip_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TipCategoryListResponse {
    pub categories: Vec<TipCategoryInfo>,
}
