/// Deterministic stand-ins for the embedding, translation and cache services.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::cache::TranslationStore;
use crate::model::CatalogRecord;
use carebot_common::embedding::TextEmbedder;
use carebot_common::error::CommonError;
use carebot_common::translate::{TranslationFailure, Translator};

const VOCAB: [&str; 12] = [
    "fever", "cough", "sore", "throat", "headache", "nausea", "tired", "sleep", "thirst",
    "dizziness", "anxious", "worry",
];

pub fn record(disease: &str, symptoms: &str, cure: &str) -> CatalogRecord {
    CatalogRecord {
        disease_name: disease.to_string(),
        symptoms: symptoms.to_string(),
        cure: cure.to_string(),
    }
}

/// Bag-of-words embedder over a fixed vocabulary: one dimension per word, value = count.
#[derive(Default)]
pub struct FakeEmbedder {
    fail_queries: bool,
    drop_last_document: bool,
    document_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn dropping_last_document(mut self) -> Self {
        self.drop_last_document = true;
        self
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        VOCAB
            .iter()
            .map(|v| words.iter().filter(|w| *w == v).count() as f32)
            .collect()
    }
}

#[async_trait]
impl TextEmbedder for FakeEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CommonError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        let mut out: Vec<Vec<f32>> = texts.iter().map(|t| Self::vectorize(t)).collect();
        if self.drop_last_document {
            out.pop();
        }
        Ok(out)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CommonError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(CommonError::Embedding("model unavailable".to_string()));
        }
        Ok(Self::vectorize(query))
    }
}

/// Translator that tags text with the target code: "[hi] text".
#[derive(Default)]
pub struct TaggingTranslator {
    calls: AtomicUsize,
}

impl TaggingTranslator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for TaggingTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{target}] {text}"))
    }
}

/// Translator whose upstream is always down.
pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String, TranslationFailure> {
        Err(TranslationFailure::MalformedResponse(
            "service unavailable".to_string(),
        ))
    }
}

/// In-process translation store keyed by (code, text).
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn get(&self, code: &str, text: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries.get(&(code.to_string(), text.to_string())).cloned()
    }

    async fn set(&self, code: &str, text: &str, translated: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert((code.to_string(), text.to_string()), translated.to_string());
    }
}
