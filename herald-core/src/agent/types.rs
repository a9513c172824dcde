use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use crate::comm::types::PackerError;

#[derive(Debug, PartialEq, Error, Clone)]
pub enum AgentError {
    #[error("io error: {0}")]
    IOError(String),

    #[error("unpack error: {0}")]
    UnpackError(PackerError),

    #[error("marshal error: {0}")]
    InternalMarshalError(String),
}

/// `AgentAPI` is the entrypoint of the agent logic
///
/// It takes a raw envelope and gives back the encoded reply, both as bytes
#[async_trait]
pub trait AgentAPI: Send + Sync {
    async fn handle(&self, payload: Vec<u8>) -> Result<Vec<u8>, AgentError>;
}
