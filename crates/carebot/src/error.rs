use carebot_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("catalog error at line {line}: {message}")]
    CatalogLoad { line: u64, message: String },

    #[error("catalog contains no records")]
    EmptyCatalog,

    #[error("config error: {0}")]
    Config(String),

    #[error("query must not be empty")]
    EmptyQuery,
}
