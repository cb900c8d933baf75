/// Localization adapter.
///
/// Wraps a [`Translator`] so that translation never blocks an answer: failures turn into a
/// visible `"Translation failed: <reason>"` placeholder. English is the source language and
/// is returned untouched without a network round-trip.
use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::cache::TranslationStore;
use crate::model::Language;
use carebot_common::translate::{TranslationFailure, Translator};

pub const SOURCE_LANGUAGE: &str = "en";

/// Supported output languages, in display order.
pub const LANGUAGES: &[Language] = &[
    Language {
        name: "English",
        code: "en",
    },
    Language {
        name: "Hindi",
        code: "hi",
    },
    Language {
        name: "Gujarati",
        code: "gu",
    },
    Language {
        name: "Korean",
        code: "ko",
    },
    Language {
        name: "Turkish",
        code: "tr",
    },
    Language {
        name: "German",
        code: "de",
    },
    Language {
        name: "French",
        code: "fr",
    },
    Language {
        name: "Arabic",
        code: "ar",
    },
    Language {
        name: "Urdu",
        code: "ur",
    },
    Language {
        name: "Tamil",
        code: "ta",
    },
    Language {
        name: "Telugu",
        code: "te",
    },
    Language {
        name: "Chinese",
        code: "zh-CN",
    },
    Language {
        name: "Japanese",
        code: "ja",
    },
];

pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

/// Accepts either a display name ("Hindi") or a code ("hi").
pub fn resolve_language(selector: &str) -> Option<&'static Language> {
    let selector = selector.trim();
    LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(selector))
        .or_else(|| find_language(selector))
}

pub struct Localizer {
    translator: Arc<dyn Translator>,
    cache: Arc<dyn TranslationStore>,
}

impl Localizer {
    pub fn new(translator: Arc<dyn Translator>, cache: Arc<dyn TranslationStore>) -> Self {
        Self { translator, cache }
    }

    pub async fn try_translate(
        &self,
        text: &str,
        code: &str,
    ) -> Result<String, TranslationFailure> {
        if code.eq_ignore_ascii_case(SOURCE_LANGUAGE) || text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let language = find_language(code)
            .ok_or_else(|| TranslationFailure::UnsupportedLanguage(code.to_string()))?;

        if let Some(cached) = self.cache.get(language.code, text).await {
            return Ok(cached);
        }

        let translated = self.translator.translate(text, language.code).await?;
        self.cache.set(language.code, text, &translated).await;
        Ok(translated)
    }

    /// Never fails; see the module docs.
    pub async fn translate(&self, text: &str, code: &str) -> String {
        match self.try_translate(text, code).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(language = code, error = %e, "translation failed, returning placeholder");
                format!("Translation failed: {e}")
            }
        }
    }

    /// Translate each text independently and concurrently, preserving order.
    pub async fn translate_all(&self, texts: &[String], code: &str) -> Vec<String> {
        join_all(texts.iter().map(|t| self.translate(t, code))).await
    }
}
