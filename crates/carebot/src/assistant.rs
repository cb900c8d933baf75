/// Query pipeline: match, pick tips, translate.
///
/// Only embedding failures (and empty input) abort a query. Translation problems are
/// absorbed by the [`Localizer`] and show up as placeholders in the output.
use std::sync::Arc;

use futures::future::join;
use tracing::info;

use crate::error::AppError;
use crate::localize::Localizer;
use crate::matcher::SymptomMatcher;
use crate::model::{MatchResult, QueryAnswer};
use crate::tips;

pub const REFUSAL_MESSAGE: &str =
    "I'm sorry, I don't have enough information on this. Please consult a healthcare professional.";

pub struct CareAssistant {
    matcher: Arc<SymptomMatcher>,
    localizer: Arc<Localizer>,
    max_tips: usize,
}

impl CareAssistant {
    pub fn new(matcher: Arc<SymptomMatcher>, localizer: Arc<Localizer>, max_tips: usize) -> Self {
        Self {
            matcher,
            localizer,
            max_tips,
        }
    }

    pub fn matcher(&self) -> &SymptomMatcher {
        &self.matcher
    }

    /// Match the text without selecting tips or translating.
    pub async fn match_symptoms(&self, user_text: &str) -> Result<MatchResult, AppError> {
        let user_text = validate(user_text)?;
        Ok(self.matcher.match_query(user_text).await?)
    }

    pub async fn handle_query(
        &self,
        user_text: &str,
        language_code: &str,
    ) -> Result<QueryAnswer, AppError> {
        let user_text = validate(user_text)?;
        let result = self.matcher.match_query(user_text).await?;

        let answer = format_answer(&result);
        // ThreadRng is !Send; keep it out of scope across the awaits below.
        let tips = {
            let mut rng = rand::rng();
            tips::select_tips(user_text, &result, self.max_tips, &mut rng)
        };
        info!(
            matched = result.is_match(),
            confidence = result.confidence,
            tips = tips.len(),
            language = language_code,
            "query handled"
        );

        let (answer, tips) = join(
            self.localizer.translate(&answer, language_code),
            self.localizer.translate_all(&tips, language_code),
        )
        .await;

        Ok(QueryAnswer {
            answer,
            tips,
            language: language_code.to_string(),
        })
    }
}

pub fn format_answer(result: &MatchResult) -> String {
    match &result.record {
        Some(record) => format!(
            "Possible Disease: {}\n\nRecommended Cure: {}",
            record.disease_name, record.cure
        ),
        None => REFUSAL_MESSAGE.to_string(),
    }
}

fn validate(user_text: &str) -> Result<&str, AppError> {
    let trimmed = user_text.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyQuery);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TranslationCache;
    use crate::catalog::Catalog;
    use crate::model::TipCategory;
    use crate::testing::{record, FailingTranslator, FakeEmbedder, TaggingTranslator};
    use crate::tips::tips_for;
    use carebot_common::error::CommonError;
    use carebot_common::translate::Translator;

    async fn assistant_with(
        embedder: FakeEmbedder,
        translator: Arc<dyn Translator>,
    ) -> CareAssistant {
        let catalog = Catalog::new(vec![
            record("Common Cold", "fever, cough, sore throat", "rest and fluids"),
            record("Migraine", "headache, nausea", "dark quiet room"),
        ])
        .unwrap();
        let matcher = SymptomMatcher::build(catalog, Arc::new(embedder)).await.unwrap();
        let localizer = Localizer::new(translator, Arc::new(TranslationCache::disabled()));
        CareAssistant::new(Arc::new(matcher), Arc::new(localizer), tips::DEFAULT_MAX_TIPS)
    }

    async fn assistant() -> CareAssistant {
        assistant_with(FakeEmbedder::new(), Arc::new(TaggingTranslator::default())).await
    }

    #[tokio::test]
    async fn confident_match_returns_cure_and_general_tips() {
        let assistant = assistant().await;

        let out = assistant
            .handle_query("I have a bad cough and sore throat", "en")
            .await
            .unwrap();

        assert_eq!(
            out.answer,
            "Possible Disease: Common Cold\n\nRecommended Cure: rest and fluids"
        );
        assert_eq!(out.tips.len(), 3);
        let general = tips_for(TipCategory::General);
        assert!(out.tips.iter().all(|t| general.contains(&t.as_str())));
        assert_eq!(out.language, "en");
    }

    #[tokio::test]
    async fn low_confidence_returns_refusal_and_keyword_tips() {
        let assistant = assistant().await;

        let out = assistant
            .handle_query("I feel so tired and can't sleep", "en")
            .await
            .unwrap();

        assert_eq!(out.answer, REFUSAL_MESSAGE);
        let energy = tips_for(TipCategory::Energy);
        assert!(out.tips.iter().all(|t| energy.contains(&t.as_str())));
    }

    #[tokio::test]
    async fn everything_is_translated() {
        let assistant = assistant().await;

        let out = assistant.handle_query("headache and nausea", "hi").await.unwrap();

        assert_eq!(
            out.answer,
            "[hi] Possible Disease: Migraine\n\nRecommended Cure: dark quiet room"
        );
        assert!(!out.tips.is_empty());
        assert!(out.tips.iter().all(|t| t.starts_with("[hi] ")));
        assert_eq!(out.language, "hi");
    }

    #[tokio::test]
    async fn translation_outage_still_answers() {
        let assistant = assistant_with(FakeEmbedder::new(), Arc::new(FailingTranslator)).await;

        let out = assistant.handle_query("cough", "fr").await.unwrap();

        assert!(!out.answer.is_empty());
        assert!(out.answer.starts_with("Translation failed: "));
        assert_eq!(out.tips.len(), 3);
        assert!(out.tips.iter().all(|t| t.starts_with("Translation failed: ")));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_embedding() {
        let embedder = Arc::new(FakeEmbedder::new());
        let catalog = Catalog::new(vec![record("Cold", "cough", "rest")]).unwrap();
        let matcher = SymptomMatcher::build(catalog, embedder.clone()).await.unwrap();
        let localizer = Localizer::new(
            Arc::new(TaggingTranslator::default()),
            Arc::new(TranslationCache::disabled()),
        );
        let assistant = CareAssistant::new(Arc::new(matcher), Arc::new(localizer), 3);

        assert!(matches!(
            assistant.handle_query("   ", "en").await,
            Err(AppError::EmptyQuery)
        ));
        assert!(matches!(
            assistant.match_symptoms("").await,
            Err(AppError::EmptyQuery)
        ));
        assert_eq!(embedder.query_calls(), 0);
    }

    #[tokio::test]
    async fn embedding_outage_fails_the_query() {
        let assistant = assistant_with(
            FakeEmbedder::new().failing_queries(),
            Arc::new(TaggingTranslator::default()),
        )
        .await;

        assert!(matches!(
            assistant.handle_query("cough", "en").await,
            Err(AppError::Common(CommonError::Embedding(_)))
        ));
    }

    #[test]
    fn refusal_is_used_for_unmatched_results() {
        assert_eq!(format_answer(&MatchResult::unmatched(0.49)), REFUSAL_MESSAGE);
    }
}
