use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::comm::types::PackerError;

pub const ID_LENGTH: usize = 31;
pub const ID_GENESIS_LENGTH: usize = 27;

pub const DID_METHOD_IDEN3: u8 = 0b0000_0001;
pub const DID_METHOD_POLYGON_ID: u8 = 0b0000_0010;

/// BN254 scalar field modulus, big-endian
const BN254_SCALAR_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

/// `Network` maps the two type bytes of an [`Id`] to its DID segments and its chain id
#[derive(Debug, PartialEq)]
pub struct Network {
    pub method: &'static str,
    pub method_byte: u8,
    pub blockchain: &'static str,
    pub network: &'static str,
    pub network_byte: u8,
    pub chain_id: u64,
}

pub const NETWORKS: [Network; 8] = [
    Network {
        method: "iden3",
        method_byte: DID_METHOD_IDEN3,
        blockchain: "polygon",
        network: "main",
        network_byte: 0b0001_0001,
        chain_id: 137,
    },
    Network {
        method: "iden3",
        method_byte: DID_METHOD_IDEN3,
        blockchain: "polygon",
        network: "amoy",
        network_byte: 0b0001_0011,
        chain_id: 80002,
    },
    Network {
        method: "iden3",
        method_byte: DID_METHOD_IDEN3,
        blockchain: "privado",
        network: "main",
        network_byte: 0b1010_0001,
        chain_id: 21000,
    },
    Network {
        method: "iden3",
        method_byte: DID_METHOD_IDEN3,
        blockchain: "privado",
        network: "test",
        network_byte: 0b1010_0010,
        chain_id: 21001,
    },
    Network {
        method: "polygonid",
        method_byte: DID_METHOD_POLYGON_ID,
        blockchain: "polygon",
        network: "main",
        network_byte: 0b0001_0001,
        chain_id: 137,
    },
    Network {
        method: "polygonid",
        method_byte: DID_METHOD_POLYGON_ID,
        blockchain: "polygon",
        network: "amoy",
        network_byte: 0b0001_0011,
        chain_id: 80002,
    },
    Network {
        method: "polygonid",
        method_byte: DID_METHOD_POLYGON_ID,
        blockchain: "privado",
        network: "main",
        network_byte: 0b1010_0001,
        chain_id: 21000,
    },
    Network {
        method: "polygonid",
        method_byte: DID_METHOD_POLYGON_ID,
        blockchain: "privado",
        network: "test",
        network_byte: 0b1010_0010,
        chain_id: 21001,
    },
];

/// `Id` is the 31 bytes identifier of an iden3 identity
///
/// Layout: `type (2) || genesis (27) || checksum (2)`. The first type byte is the DID method, the
/// second one is the blockchain and network pair. The checksum is the sum of all previous bytes,
/// big-endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id([u8; ID_LENGTH]);

impl Id {
    pub fn new(id_type: [u8; 2], genesis: [u8; ID_GENESIS_LENGTH]) -> Self {
        let mut bytes = [0u8; ID_LENGTH];
        bytes[..2].copy_from_slice(&id_type);
        bytes[2..2 + ID_GENESIS_LENGTH].copy_from_slice(&genesis);

        let checksum = checksum(&bytes[..ID_LENGTH - 2]);
        bytes[ID_LENGTH - 2..].copy_from_slice(&checksum);
        Self(bytes)
    }

    pub fn from_bytes(value: &[u8]) -> Result<Self, PackerError> {
        let bytes: [u8; ID_LENGTH] = value.try_into().map_err(|_| {
            PackerError::MalformedPayload(format!("id: invalid length: {}", value.len()))
        })?;

        if checksum(&bytes[..ID_LENGTH - 2]) != bytes[ID_LENGTH - 2..] {
            return Err(PackerError::MalformedPayload(
                "id: checksum mismatch".to_string(),
            ));
        }

        Ok(Self(bytes))
    }

    /// `from_decimal` parses the form used in public signals, the decimal of the little-endian
    /// integer of the id bytes
    pub fn from_decimal(value: &str) -> Result<Self, PackerError> {
        let bytes = parse_decimal(value)?.to_bytes_le();
        if bytes.len() > ID_LENGTH {
            return Err(PackerError::MalformedPayload(
                "id: value out of range".to_string(),
            ));
        }

        let mut padded = [0u8; ID_LENGTH];
        padded[..bytes.len()].copy_from_slice(&bytes);
        Self::from_bytes(&padded)
    }

    /// `from_did` parses `did:<method>:<blockchain>:<network>:<base58 id>`, the DID segments must
    /// match the network encoded in the id itself
    pub fn from_did(did: &str) -> Result<Self, PackerError> {
        let segments = did.split(':').collect::<Vec<&str>>();
        if segments.len() != 5 || segments[0] != "did" {
            return Err(PackerError::MalformedPayload(format!(
                "id: unsupported did: {}",
                did
            )));
        }

        let bytes = bs58::decode(segments[4])
            .into_vec()
            .map_err(|err| PackerError::MalformedPayload(err.to_string()))?;

        let id = Self::from_bytes(&bytes)?;
        let network = id
            .network()
            .ok_or(PackerError::UnknownNetwork(did.to_string()))?;

        if network.method != segments[1]
            || network.blockchain != segments[2]
            || network.network != segments[3]
        {
            return Err(PackerError::MalformedPayload(format!(
                "id: did segments doesn't match the id type: {}",
                did
            )));
        }

        Ok(id)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn id_type(&self) -> [u8; 2] {
        [self.0[0], self.0[1]]
    }

    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_le(&self.0).to_str_radix(10)
    }

    pub fn network(&self) -> Option<&'static Network> {
        let [method_byte, network_byte] = self.id_type();
        NETWORKS
            .iter()
            .find(|net| net.method_byte == method_byte && net.network_byte == network_byte)
    }

    pub fn to_did(&self) -> Result<String, PackerError> {
        let network = self
            .network()
            .ok_or(PackerError::UnknownNetwork(hex_type(self.id_type())))?;

        Ok(format!(
            "did:{}:{}:{}:{}",
            network.method,
            network.blockchain,
            network.network,
            bs58::encode(self.0).into_string()
        ))
    }
}

/// `AuthV2PubSignals` are the public signals of the `authV2` circuit, in order:
/// `userID`, `challenge`, `gistRoot`
#[derive(Debug, Clone, PartialEq)]
pub struct AuthV2PubSignals {
    pub user_id: Id,
    pub challenge: BigUint,
    pub gist_root: String,
}

impl AuthV2PubSignals {
    pub fn parse(signals: &[String]) -> Result<Self, PackerError> {
        if signals.len() != 3 {
            return Err(PackerError::MalformedPayload(format!(
                "signals: authV2 expects 3 public signals, got {}",
                signals.len()
            )));
        }

        let user_id = Id::from_decimal(&signals[0])?;
        let challenge = parse_decimal(&signals[1])?;
        let gist_root = parse_decimal(&signals[2])?.to_str_radix(10);

        Ok(Self {
            user_id,
            challenge,
            gist_root,
        })
    }
}

/// `message_challenge` is the value an `authV2` proof must commit to for a given token: the
/// `sha256` of the token signing input, big-endian, reduced into the BN254 scalar field
pub fn message_challenge(signing_input: &[u8]) -> BigUint {
    let digest = Sha256::digest(signing_input);
    BigUint::from_bytes_be(&digest) % BigUint::from_bytes_be(&BN254_SCALAR_MODULUS)
}

fn parse_decimal(value: &str) -> Result<BigUint, PackerError> {
    BigUint::parse_bytes(value.as_bytes(), 10).ok_or(PackerError::MalformedPayload(format!(
        "signals: invalid decimal value: {}",
        value
    )))
}

fn checksum(bytes: &[u8]) -> [u8; 2] {
    let sum = bytes
        .iter()
        .fold(0u16, |acc, byte| acc.wrapping_add(*byte as u16));

    sum.to_be_bytes()
}

fn hex_type(id_type: [u8; 2]) -> String {
    format!("id type: 0x{:02x}{:02x}", id_type[0], id_type[1])
}
