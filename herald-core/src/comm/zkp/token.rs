use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use crate::comm::message::BasicMessage;
use crate::comm::types::{PackerError, MEDIA_TYPE_ZKP_MESSAGE};

use super::types::{FullProof, ALG_GROTH16, CIRCUIT_AUTH_V2};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Header {
    pub alg: String,

    #[serde(rename = "circuitId")]
    pub circuit_id: String,

    #[serde(default)]
    pub crit: Vec<String>,

    pub typ: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: ALG_GROTH16.to_string(),
            circuit_id: CIRCUIT_AUTH_V2.to_string(),
            crit: vec!["circuitId".to_string()],
            typ: MEDIA_TYPE_ZKP_MESSAGE.to_string(),
        }
    }
}

/// `Token` is a parsed `JWZ` compact token: `base64url(header).base64url(payload).base64url(proof)`
///
/// The encoded header and payload segments are kept as received, the signing input the proof
/// commits to is built from them and never from a re-serialization
#[derive(Debug, Clone)]
pub struct Token {
    header: Header,
    raw_header: String,
    raw_payload: String,
    payload: Vec<u8>,
    proof: FullProof,
}

impl Token {
    /// `new` prepares a token from its header and message payload, the proof has to be
    /// attached through [`Token::with_proof`] once it's computed over [`Token::signing_input`]
    pub fn new(header: Header, payload: Vec<u8>) -> Result<Self, PackerError> {
        let header_bytes =
            serde_json::to_vec(&header).map_err(|err| PackerError::MarshalError(err.to_string()))?;

        Ok(Self {
            header,
            raw_header: URL_SAFE_NO_PAD.encode(header_bytes),
            raw_payload: URL_SAFE_NO_PAD.encode(&payload),
            payload,
            proof: FullProof::default(),
        })
    }

    pub fn parse(envelope: &[u8]) -> Result<Self, PackerError> {
        let token = std::str::from_utf8(envelope)
            .map_err(|err| PackerError::MalformedPayload(err.to_string()))?;

        let segments = token.trim().split('.').collect::<Vec<&str>>();
        if segments.len() != 3 {
            return Err(PackerError::MalformedPayload(format!(
                "token: expected 3 segments, got {}",
                segments.len()
            )));
        }

        let header: Header = serde_json::from_slice(&decode_segment(segments[0])?)
            .map_err(|err| PackerError::MalformedPayload(format!("token: header: {}", err)))?;

        let payload = decode_segment(segments[1])?;

        let proof: FullProof = serde_json::from_slice(&decode_segment(segments[2])?)
            .map_err(|err| PackerError::MalformedPayload(format!("token: proof: {}", err)))?;

        Ok(Self {
            header,
            raw_header: segments[0].to_string(),
            raw_payload: segments[1].to_string(),
            payload,
            proof,
        })
    }

    pub fn with_proof(mut self, proof: FullProof) -> Self {
        self.proof = proof;
        self
    }

    pub fn get_header(&self) -> &Header {
        &self.header
    }

    pub fn get_proof(&self) -> &FullProof {
        &self.proof
    }

    pub fn signing_input(&self) -> Vec<u8> {
        format!("{}.{}", self.raw_header, self.raw_payload).into_bytes()
    }

    pub fn message(&self) -> Result<BasicMessage, PackerError> {
        BasicMessage::try_from(self.payload.as_slice())
    }

    pub fn compact(&self) -> Result<String, PackerError> {
        let proof_bytes = serde_json::to_vec(&self.proof)
            .map_err(|err| PackerError::MarshalError(err.to_string()))?;

        Ok(format!(
            "{}.{}.{}",
            self.raw_header,
            self.raw_payload,
            URL_SAFE_NO_PAD.encode(proof_bytes)
        ))
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, PackerError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|err| PackerError::MalformedPayload(format!("token: {}", err)))
}
