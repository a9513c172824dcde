use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use super::message::BasicMessage;

pub const MEDIA_TYPE_PLAIN_MESSAGE: &str = "application/iden3comm-plain-json";
pub const MEDIA_TYPE_ZKP_MESSAGE: &str = "application/iden3-zkp-json";

/// `PackerError` is a base error types for the `comm` domain
///
/// The variants are grouped by the stage they come from:
///
/// - registration: [`PackerError::DuplicateMediaType`]
/// - decoding: [`PackerError::UnsupportedMediaType`], [`PackerError::MalformedPayload`]
/// - authentication: [`PackerError::UnknownNetwork`], [`PackerError::InvalidProof`],
///   [`PackerError::StateResolutionError`], [`PackerError::StaleState`]
/// - encoding: [`PackerError::MarshalError`], [`PackerError::PackUnsupported`]
#[derive(Debug, PartialEq, Error, Clone)]
pub enum PackerError {
    #[error("duplicate media type: {0}")]
    DuplicateMediaType(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("invalid proof: {0}")]
    InvalidProof(String),

    #[error("state resolution error: {0}")]
    StateResolutionError(String),

    #[error("stale state: {0}")]
    StaleState(String),

    #[error("marshal error: {0}")]
    MarshalError(String),

    #[error("pack unsupported for media type: {0}")]
    PackUnsupported(String),
}

/// `Unpacked` is the output of [`super::manager::PackageManager::unpack`]
///
/// Besides the decoded message, it also tells which packer handled the envelope, since the caller
/// may need it to decide how the reply should be packed
#[derive(Debug, Clone, PartialEq)]
pub struct Unpacked {
    pub message: BasicMessage,
    pub media_type: String,
}

/// `Packer` is a trait behavior of a single envelope format
///
/// A packer that authenticates its envelope must only return a message from `unpack` once the
/// authentication succeeded, the caller treats a decoded message as a trusted one
#[async_trait]
pub trait Packer: Send + Sync {
    fn media_type(&self) -> &str;

    async fn unpack(&self, envelope: &[u8]) -> Result<BasicMessage, PackerError>;

    fn pack(&self, message: &BasicMessage) -> Result<Vec<u8>, PackerError>;
}
