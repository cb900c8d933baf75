/// HTTP client for the Google Translate `translate_a/single` endpoint.
///
/// Every call is a single GET with a per-request timeout. Transient failures (connect
/// errors, timeouts, 429 and 5xx) are retried with capped exponential backoff and jitter.
/// Failures come back as [`TranslationFailure`]; callers decide how to degrade.
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::StatusCode;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct TranslateClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl TranslateClientConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("TRANSLATE_BASE_URL")
            .unwrap_or_else(|_| "https://translate.googleapis.com".to_string());

        let timeout = std::env::var("TRANSLATE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        let max_retries = std::env::var("TRANSLATE_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(2);

        let initial_backoff = std::env::var("TRANSLATE_RETRY_INITIAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(200));

        let max_backoff = std::env::var("TRANSLATE_RETRY_MAX_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(2_000));

        let max_error_body_bytes = std::env::var("TRANSLATE_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries,
            initial_backoff,
            max_backoff,
            max_error_body_bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationFailure {
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// The request URL carries the text being translated in its query string, so it is
/// stripped before the error can reach logs or the placeholder shown to users.
impl From<reqwest::Error> for TranslationFailure {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

/// A translation backend. `target` is a language code such as "hi" or "zh-CN".
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationFailure>;
}

#[derive(Clone)]
pub struct GoogleTranslateClient {
    config: TranslateClientConfig,
    http: reqwest::Client,
}

impl GoogleTranslateClient {
    pub fn new(config: TranslateClientConfig) -> Result<Self, TranslationFailure> {
        let http = reqwest::Client::builder()
            .user_agent("carebot/translate")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &TranslateClientConfig {
        &self.config
    }

    async fn translate_once(&self, text: &str, target: &str) -> Result<String, TranslationFailure> {
        let url = format!("{}/translate_a/single", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(TranslationFailure::Upstream { status, body });
        }

        let body = resp.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        parse_translation(&value)
    }

    async fn request_with_retry<T, Fut, F>(&self, mut f: F) -> Result<T, TranslationFailure>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, TranslationFailure>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    if attempt > self.config.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    let delay = backoff_delay(
                        self.config.initial_backoff,
                        self.config.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "translation request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationFailure> {
        self.request_with_retry(|| self.translate_once(text, target)).await
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array: `[[["<translated>", "<source>", ...], ...], null, "<detected>", ...]`.
/// Long inputs are split into several segments that must be concatenated in order.
pub fn parse_translation(value: &serde_json::Value) -> Result<String, TranslationFailure> {
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslationFailure::MalformedResponse("missing segment list".to_string()))?;

    let mut out = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
            out.push_str(piece);
        }
    }

    if out.is_empty() {
        return Err(TranslationFailure::MalformedResponse(
            "no translated text in response".to_string(),
        ));
    }
    Ok(out)
}

fn should_retry(err: &TranslationFailure) -> bool {
    match err {
        TranslationFailure::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        TranslationFailure::Upstream { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        TranslationFailure::InvalidJson(_)
        | TranslationFailure::MalformedResponse(_)
        | TranslationFailure::UnsupportedLanguage(_) => false,
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let mult = 1u128.checked_shl(exponent).unwrap_or(u128::MAX);
    let base_ms = initial.as_millis().saturating_mul(mult);
    let capped_ms = std::cmp::min(base_ms, max.as_millis()) as u64;
    let jitter_cap = std::cmp::max(1, capped_ms / 4);
    Duration::from_millis(capped_ms.saturating_add(jitter_ms(jitter_cap)))
}

fn jitter_ms(max_inclusive: u64) -> u64 {
    rand::rng().random_range(0..=max_inclusive)
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}
