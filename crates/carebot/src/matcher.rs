/// Symptom matcher over the reference catalog.
///
/// Catalog symptom descriptions are embedded once when the matcher is built. Each query
/// costs one query embedding plus a linear cosine scan, which is plenty for a catalog of
/// a few hundred rows.
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::model::MatchResult;
use carebot_common::embedding::TextEmbedder;
use carebot_common::error::CommonError;

/// Best scores strictly below this are reported as "no confident match".
pub const SIMILARITY_THRESHOLD: f32 = 0.5;

pub struct SymptomMatcher {
    catalog: Catalog,
    embeddings: Vec<Vec<f32>>,
    embedder: Arc<dyn TextEmbedder>,
}

impl SymptomMatcher {
    pub async fn build(
        catalog: Catalog,
        embedder: Arc<dyn TextEmbedder>,
    ) -> Result<Self, CommonError> {
        let texts = catalog.symptom_texts();
        info!(records = texts.len(), "embedding catalog symptoms");
        let embeddings = embedder.embed_documents(&texts).await?;

        if embeddings.len() != catalog.len() {
            return Err(CommonError::Embedding(format!(
                "embedding count mismatch: expected {}, got {}",
                catalog.len(),
                embeddings.len()
            )));
        }

        Ok(Self {
            catalog,
            embeddings,
            embedder,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Match free text against the catalog.
    ///
    /// Fails only when the embedder does; a weak best score is an unmatched result, not an error.
    pub async fn match_query(&self, query: &str) -> Result<MatchResult, CommonError> {
        let query_embedding = self.embedder.embed_query(query).await?;
        Ok(self.match_embedding(&query_embedding))
    }

    pub fn match_embedding(&self, query_embedding: &[f32]) -> MatchResult {
        let scores: Vec<f32> = self
            .embeddings
            .iter()
            .map(|e| cosine_similarity(query_embedding, e))
            .collect();

        match best_match(&scores) {
            Some((idx, score)) if score >= SIMILARITY_THRESHOLD => {
                let record = self.catalog.records()[idx].clone();
                debug!(disease = %record.disease_name, score, "catalog match");
                MatchResult::matched(record, score)
            }
            Some((_, score)) => {
                debug!(score, "best score below threshold");
                MatchResult::unmatched(score)
            }
            None => MatchResult::unmatched(0.0),
        }
    }
}

/// `(a·b) / (‖a‖·‖b‖)`. Zero-norm or length-mismatched inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Stable argmax: the earliest index wins ties, NaN never wins.
pub fn best_match(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((idx, score));
        }
    }
    best
}
