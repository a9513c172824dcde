use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};

use rst_common::standard::serde::{self, Deserialize};
use rst_common::standard::serde_json;
use rst_common::with_logging::log::debug;

use prople_herald_core::comm::zkp::types::{ProofError, ProofVerifier, ZKProof};

/// `VerificationKeyJSON` is the `snarkjs` verification key export
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
struct VerificationKeyJSON {
    protocol: String,
    vk_alpha_1: Vec<String>,
    vk_beta_2: Vec<Vec<String>>,
    vk_gamma_2: Vec<Vec<String>>,
    vk_delta_2: Vec<Vec<String>>,

    #[serde(rename = "IC")]
    ic: Vec<Vec<String>>,
}

fn parse_fq(value: &str) -> Result<Fq, String> {
    Fq::from_str(value).map_err(|_| format!("invalid field element: {}", value))
}

fn parse_fr(value: &str) -> Result<Fr, String> {
    Fr::from_str(value).map_err(|_| format!("invalid scalar: {}", value))
}

fn parse_g1(point: &[String]) -> Result<G1Affine, String> {
    if point.len() != 3 || point[2] != "1" {
        return Err("g1: expected an affine point [x, y, 1]".to_string());
    }

    let g1 = G1Affine::new_unchecked(parse_fq(&point[0])?, parse_fq(&point[1])?);
    if !g1.is_on_curve() || !g1.is_in_correct_subgroup_assuming_on_curve() {
        return Err("g1: point is not on the curve".to_string());
    }

    Ok(g1)
}

fn parse_fq2(value: &[String]) -> Result<Fq2, String> {
    if value.len() != 2 {
        return Err("fq2: expected [c0, c1]".to_string());
    }

    Ok(Fq2::new(parse_fq(&value[0])?, parse_fq(&value[1])?))
}

fn parse_g2(point: &[Vec<String>]) -> Result<G2Affine, String> {
    let is_affine = point.len() == 3 && point[2].len() == 2 && point[2][0] == "1" && point[2][1] == "0";
    if !is_affine {
        return Err("g2: expected an affine point [x, y, [1, 0]]".to_string());
    }

    let g2 = G2Affine::new_unchecked(parse_fq2(&point[0])?, parse_fq2(&point[1])?);
    if !g2.is_on_curve() || !g2.is_in_correct_subgroup_assuming_on_curve() {
        return Err("g2: point is not on the curve".to_string());
    }

    Ok(g2)
}

/// `Groth16Verifier` verifies `snarkjs` proofs over `bn254`
///
/// The verification key is the `snarkjs` verification key JSON export of the circuit. It's
/// parsed and prepared once when building the verifier, a different key given to
/// [`ProofVerifier::verify`] is prepared for that call only
#[derive(Clone)]
pub struct Groth16Verifier {
    verification_key: Arc<Vec<u8>>,
    prepared: Arc<PreparedVerifyingKey<Bn254>>,
}

impl Groth16Verifier {
    pub fn new(verification_key: &[u8]) -> Result<Self, ProofError> {
        let vk = Self::parse_verification_key(verification_key)?;

        Ok(Self {
            verification_key: Arc::new(verification_key.to_vec()),
            prepared: Arc::new(PreparedVerifyingKey::from(vk)),
        })
    }

    /// `parse_verification_key` loads and checks a `snarkjs` verification key
    pub fn parse_verification_key(
        verification_key: &[u8],
    ) -> Result<VerifyingKey<Bn254>, ProofError> {
        let vk: VerificationKeyJSON = serde_json::from_slice(verification_key)
            .map_err(|err| ProofError::InvalidVerificationKey(err.to_string()))?;

        if vk.protocol != "groth16" {
            return Err(ProofError::InvalidVerificationKey(format!(
                "unsupported protocol: {}",
                vk.protocol
            )));
        }

        if vk.ic.is_empty() {
            return Err(ProofError::InvalidVerificationKey("IC is empty".to_string()));
        }

        let gamma_abc_g1 = vk
            .ic
            .iter()
            .map(|point| parse_g1(point))
            .collect::<Result<Vec<G1Affine>, String>>()
            .map_err(ProofError::InvalidVerificationKey)?;

        Ok(VerifyingKey {
            alpha_g1: parse_g1(&vk.vk_alpha_1).map_err(ProofError::InvalidVerificationKey)?,
            beta_g2: parse_g2(&vk.vk_beta_2).map_err(ProofError::InvalidVerificationKey)?,
            gamma_g2: parse_g2(&vk.vk_gamma_2).map_err(ProofError::InvalidVerificationKey)?,
            delta_g2: parse_g2(&vk.vk_delta_2).map_err(ProofError::InvalidVerificationKey)?,
            gamma_abc_g1,
        })
    }

    fn parse_proof(proof: &ZKProof) -> Result<Proof<Bn254>, ProofError> {
        if proof.protocol != "groth16" {
            return Err(ProofError::InvalidFormat(format!(
                "unsupported protocol: {}",
                proof.protocol
            )));
        }

        Ok(Proof {
            a: parse_g1(&proof.pi_a).map_err(ProofError::InvalidFormat)?,
            b: parse_g2(&proof.pi_b).map_err(ProofError::InvalidFormat)?,
            c: parse_g1(&proof.pi_c).map_err(ProofError::InvalidFormat)?,
        })
    }
}

impl ProofVerifier for Groth16Verifier {
    fn verify(
        &self,
        verification_key: &[u8],
        proof: &ZKProof,
        pub_signals: &[String],
    ) -> Result<(), ProofError> {
        let pvk = if verification_key == self.verification_key.as_slice() {
            Cow::Borrowed(self.prepared.as_ref())
        } else {
            let vk = Self::parse_verification_key(verification_key)?;
            Cow::Owned(PreparedVerifyingKey::from(vk))
        };

        let ic_len = pvk.vk.gamma_abc_g1.len();
        if ic_len != pub_signals.len() + 1 {
            return Err(ProofError::InvalidFormat(format!(
                "expected {} public signals, got {}",
                ic_len - 1,
                pub_signals.len()
            )));
        }

        let inputs = pub_signals
            .iter()
            .map(|signal| parse_fr(signal))
            .collect::<Result<Vec<Fr>, String>>()
            .map_err(ProofError::InvalidFormat)?;

        let proof = Self::parse_proof(proof)?;
        let verified = Groth16::<Bn254>::verify_proof(&pvk, &proof, &inputs)
            .map_err(|err| ProofError::VerificationError(err.to_string()))?;

        debug!("[groth16:verify] verified: {}", verified);
        if !verified {
            return Err(ProofError::VerificationError(
                "pairing check failed".to_string(),
            ));
        }

        Ok(())
    }
}
