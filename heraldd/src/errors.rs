use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("http error: {0}")]
    HttpError(String),
}
