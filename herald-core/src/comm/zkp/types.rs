use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::with_errors::thiserror::{self, Error};

pub const ALG_GROTH16: &str = "groth16";
pub const CIRCUIT_AUTH_V2: &str = "authV2";

#[derive(Debug, PartialEq, Error, Clone)]
pub enum ProofError {
    #[error("invalid verification key: {0}")]
    InvalidVerificationKey(String),

    #[error("invalid proof format: {0}")]
    InvalidFormat(String),

    #[error("verification error: {0}")]
    VerificationError(String),
}

#[derive(Debug, PartialEq, Error, Clone)]
pub enum ResolverError {
    #[error("resolver request error: {0}")]
    RequestError(String),

    #[error("state not found: {0}")]
    NotFound(String),

    #[error("invalid resolver response: {0}")]
    InvalidResponse(String),
}

/// `ZKProof` is a `groth16` proof using the `snarkjs` JSON layout
///
/// Points are serialized in projective form using decimal strings, `pi_a` and `pi_c` are `G1`
/// points, `pi_b` is a `G2` point which each coordinate is a pair of `Fq` elements
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct ZKProof {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    pub protocol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

/// `FullProof` is the proof section of a `JWZ` token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct FullProof {
    pub proof: ZKProof,
    pub pub_signals: Vec<String>,
}

/// `StateInfo` describes an on-chain state root as seen by a [`StateResolver`]
///
/// A state without `replaced_at` is still the latest published one
#[derive(Debug, Clone, PartialEq)]
pub struct StateInfo {
    pub root: String,
    pub created_at: DateTime<Utc>,
    pub replaced_at: Option<DateTime<Utc>>,
}

impl StateInfo {
    pub fn is_latest(&self) -> bool {
        self.replaced_at.is_none()
    }
}

/// `ProofVerifier` checks a zero-knowledge proof against a verification key
///
/// The verification key is an opaque material owned by the [`super::context::VerificationContext`],
/// its format is defined by the implementer
pub trait ProofVerifier: Send + Sync {
    fn verify(
        &self,
        verification_key: &[u8],
        proof: &ZKProof,
        pub_signals: &[String],
    ) -> Result<(), ProofError>;
}

/// `StateResolver` answers the state of the identities published on a single network
#[async_trait]
pub trait StateResolver: Send + Sync {
    async fn resolve_gist(&self, root: String) -> Result<StateInfo, ResolverError>;
}
