/// Redis caching layer for translations.
///
/// All operations return `Option<T>` or nothing for graceful degradation.
///
/// Key schema:
/// - `carebot:v1:translation:{sha256(code|text)}` — translated text (TTL 7 days)
use async_trait::async_trait;
use sha2::{Digest, Sha256};

use carebot_common::redis::RedisCache;

const KEY_PREFIX: &str = "carebot:v1:";
const TRANSLATION_TTL_SECS: u64 = 7 * 24 * 3600;

/// Where finished translations are remembered between queries.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    async fn get(&self, code: &str, text: &str) -> Option<String>;
    async fn set(&self, code: &str, text: &str, translated: &str);
}

pub struct TranslationCache {
    redis: RedisCache,
}

impl TranslationCache {
    pub fn new(redis: RedisCache) -> Self {
        Self { redis }
    }

    pub fn disabled() -> Self {
        Self::new(RedisCache::disabled())
    }
}

#[async_trait]
impl TranslationStore for TranslationCache {
    async fn get(&self, code: &str, text: &str) -> Option<String> {
        self.redis.get(&translation_key(code, text)).await
    }

    async fn set(&self, code: &str, text: &str, translated: &str) {
        self.redis
            .set_with_ttl(&translation_key(code, text), translated, TRANSLATION_TTL_SECS)
            .await;
    }
}

fn translation_key(code: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}translation:{:x}", hash)
}
