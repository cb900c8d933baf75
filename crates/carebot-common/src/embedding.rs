/// Embedding wrapper around fastembed.
///
/// `TextEmbedding` from fastembed is synchronous and CPU-bound. All embed calls go through
/// `tokio::task::spawn_blocking` and are bounded by a timeout, so a wedged ONNX session
/// surfaces as an embedding error instead of hanging the request.
///
/// The all-MiniLM-L6-v2 model takes raw sentences: no task prefixes are added.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CommonError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that turns text into fixed-length vectors.
///
/// The matcher only depends on this trait, so tests can substitute a deterministic fake
/// for the ONNX model.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of catalog texts. Output order matches input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CommonError>;

    /// Embed a single user query.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CommonError>;
}

/// Wraps fastembed's `TextEmbedding` model for generating vector embeddings.
///
/// The inner model is not `Send`, so all operations are dispatched to a blocking thread.
pub struct Embedder {
    model: Arc<fastembed::TextEmbedding>,
    timeout: Duration,
}

impl Embedder {
    /// Initialize the embedding model (all-MiniLM-L6-v2).
    ///
    /// This downloads the model on first run (~90MB). The download happens synchronously
    /// inside a blocking task and is not subject to the per-call timeout.
    pub async fn new(timeout: Duration) -> Result<Self, CommonError> {
        let model = tokio::task::spawn_blocking(|| {
            let options = fastembed::InitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2)
                .with_show_download_progress(true);
            fastembed::TextEmbedding::try_new(options)
        })
        .await
        .map_err(|e| CommonError::Embedding(format!("spawn_blocking join error: {e}")))?
        .map_err(|e| CommonError::Embedding(format!("model initialization failed: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
            timeout,
        })
    }

    /// Read `EMBEDDING_TIMEOUT_SECS` (default 30).
    pub fn timeout_from_env() -> Duration {
        std::env::var("EMBEDDING_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Returns the dimensionality of the embedding vectors (384 for all-MiniLM-L6-v2).
    pub fn dimensions(&self) -> usize {
        384
    }

    async fn run(&self, texts: Vec<String>, what: &str) -> Result<Vec<Vec<f32>>, CommonError> {
        let model = Arc::clone(&self.model);
        run_blocking_with_timeout(self.timeout, what, move || model.embed(texts, Some(16))).await
    }
}

/// Run a CPU-bound embedding job on the blocking pool, giving up after `timeout`.
///
/// A timed-out job keeps its blocking thread until it finishes; only the caller is released.
async fn run_blocking_with_timeout<T, E, F>(
    timeout: Duration,
    what: &str,
    job: F,
) -> Result<T, CommonError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);
    tokio::time::timeout(timeout, task)
        .await
        .map_err(|_| {
            CommonError::Embedding(format!(
                "{what} embedding timed out after {}ms",
                timeout.as_millis()
            ))
        })?
        .map_err(|e| CommonError::Embedding(format!("spawn_blocking join error: {e}")))?
        .map_err(|e| CommonError::Embedding(format!("{what} embedding failed: {e}")))
}

#[async_trait]
impl TextEmbedder for Embedder {
    /// Documents are processed in small batches to bound peak memory during ONNX inference.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CommonError> {
        self.run(texts.to_vec(), "document").await
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CommonError> {
        let mut results = self.run(vec![query.to_string()], "query").await?;
        results
            .pop()
            .ok_or_else(|| CommonError::Embedding("empty embedding result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slow_jobs_time_out_as_embedding_errors() {
        let result = run_blocking_with_timeout(Duration::from_millis(10), "query", || {
            std::thread::sleep(Duration::from_millis(200));
            Ok::<_, String>(vec![vec![0.0_f32; 4]])
        })
        .await;

        match result {
            Err(CommonError::Embedding(msg)) => {
                assert!(msg.contains("timed out"), "{msg}");
                assert!(msg.starts_with("query"), "{msg}");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn job_errors_are_reported_with_context() {
        let result: Result<Vec<f32>, _> =
            run_blocking_with_timeout(Duration::from_secs(5), "document", || {
                Err::<Vec<f32>, _>("tokenizer exploded")
            })
            .await;

        match result {
            Err(CommonError::Embedding(msg)) => {
                assert_eq!(msg, "document embedding failed: tokenizer exploded");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fast_jobs_return_their_value() {
        let out = run_blocking_with_timeout(Duration::from_secs(5), "query", || {
            Ok::<_, String>(vec![1.0_f32, 2.0])
        })
        .await
        .unwrap();
        assert_eq!(out, vec![1.0, 2.0]);
    }
}
