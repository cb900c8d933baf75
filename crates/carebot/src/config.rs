use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::tips::DEFAULT_MAX_TIPS;

/// Application configuration loaded explicitly from environment variables.
///
/// The catalog path has no default; the caller must provide it.
/// Redis URL is optional; if absent, translations are not cached.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// Filesystem path to the header-less `disease_name,symptoms,cure` CSV file.
    pub catalog_path: String,
    /// Upper bound on tips returned per query.
    pub max_tips: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `CAREBOT_CATALOG_PATH`: path to the catalog CSV
    ///
    /// Optional:
    /// - `CAREBOT_MAX_TIPS`: tips per answer (default 3, must be at least 1)
    /// - `REDIS_URL`: Redis connection string (omit to disable caching)
    pub fn from_env() -> Result<Self, AppError> {
        let catalog_path = std::env::var("CAREBOT_CATALOG_PATH").map_err(|_| {
            AppError::Config("CAREBOT_CATALOG_PATH environment variable is required".to_string())
        })?;

        if !Path::new(&catalog_path).is_file() {
            return Err(AppError::Config(format!(
                "catalog file not found: {catalog_path}"
            )));
        }

        let max_tips = parse_max_tips(std::env::var("CAREBOT_MAX_TIPS").ok().as_deref())?;

        Ok(Self {
            redis_url: std::env::var("REDIS_URL").ok(),
            catalog_path,
            max_tips,
        })
    }

    pub fn catalog_path(&self) -> PathBuf {
        Path::new(&self.catalog_path).to_path_buf()
    }
}

fn parse_max_tips(raw: Option<&str>) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MAX_TIPS);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::Config(format!(
            "CAREBOT_MAX_TIPS must be a positive integer, got {raw:?}"
        ))),
    }
}
