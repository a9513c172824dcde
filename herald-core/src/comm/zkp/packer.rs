use std::time::Duration;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::chrono::{Duration as ChronoDuration, Utc};
use rst_common::with_logging::log::{debug, warn};

use crate::comm::message::BasicMessage;
use crate::comm::types::{Packer, PackerError, MEDIA_TYPE_ZKP_MESSAGE};

use super::context::VerificationContext;
use super::signals::{message_challenge, AuthV2PubSignals, Id};
use super::token::Token;
use super::types::{ALG_GROTH16, CIRCUIT_AUTH_V2};

/// `AuthenticatedMessage` is a message whose sender has been proven by an `authV2` proof
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedMessage {
    pub message: BasicMessage,
    pub sender: Id,
    pub chain_id: u64,
}

/// `ZKPPacker` unpacks `JWZ` tokens, authenticating them with the [`VerificationContext`]
///
/// Decoding and authentication are a single operation, a message is only returned once its proof,
/// its bindings and its on-chain state have been checked. Packing is not supported, this packer
/// doesn't own any prover
#[derive(Clone)]
pub struct ZKPPacker {
    context: VerificationContext,
}

impl ZKPPacker {
    pub fn new(context: VerificationContext) -> Self {
        Self { context }
    }

    pub async fn authenticate(&self, envelope: &[u8]) -> Result<AuthenticatedMessage, PackerError> {
        let token = Token::parse(envelope)?;
        let header = token.get_header();
        if header.alg != ALG_GROTH16 || header.circuit_id != CIRCUIT_AUTH_V2 {
            return Err(PackerError::MalformedPayload(format!(
                "zkp: unsupported alg or circuit: {}/{}",
                header.alg, header.circuit_id
            )));
        }

        let message = token.message()?;
        message.validate()?;

        let full_proof = token.get_proof();
        let signals = AuthV2PubSignals::parse(&full_proof.pub_signals)?;

        let network = signals
            .user_id
            .network()
            .ok_or(PackerError::UnknownNetwork(signals.user_id.to_decimal()))?;

        let resolver = self
            .context
            .resolver(network.chain_id)
            .ok_or(PackerError::UnknownNetwork(network.chain_id.to_string()))?;

        self.context
            .verifier()
            .verify(
                self.context.verification_key(),
                &full_proof.proof,
                &full_proof.pub_signals,
            )
            .map_err(|err| PackerError::InvalidProof(err.to_string()))?;

        if signals.challenge != message_challenge(&token.signing_input()) {
            return Err(PackerError::InvalidProof(
                "zkp: proof challenge doesn't match the message".to_string(),
            ));
        }

        let sender = Id::from_did(message.get_from())?;
        if sender != signals.user_id {
            return Err(PackerError::InvalidProof(
                "zkp: sender doesn't match the proven identity".to_string(),
            ));
        }

        let state = resolver
            .resolve_gist(signals.gist_root.clone())
            .await
            .map_err(|err| PackerError::StateResolutionError(err.to_string()))?;

        if let Some(replaced_at) = state.replaced_at {
            let window = to_time_delta(self.context.freshness_window())?;
            let oldest_accepted = Utc::now().checked_sub_signed(window).ok_or(
                PackerError::StaleState("zkp: freshness window out of range".to_string()),
            )?;

            if replaced_at < oldest_accepted {
                warn!(
                    "[zkp:authenticate] gist root replaced at {}, outside of the freshness window",
                    replaced_at
                );

                return Err(PackerError::StaleState(format!(
                    "zkp: gist root replaced at {}",
                    replaced_at
                )));
            }
        }

        debug!(
            "[zkp:authenticate] sender authenticated: {} | chain id: {}",
            message.get_from(),
            network.chain_id
        );

        Ok(AuthenticatedMessage {
            message,
            sender,
            chain_id: network.chain_id,
        })
    }
}

#[async_trait]
impl Packer for ZKPPacker {
    fn media_type(&self) -> &str {
        MEDIA_TYPE_ZKP_MESSAGE
    }

    async fn unpack(&self, envelope: &[u8]) -> Result<BasicMessage, PackerError> {
        let authenticated = self.authenticate(envelope).await?;
        Ok(authenticated.message)
    }

    fn pack(&self, _message: &BasicMessage) -> Result<Vec<u8>, PackerError> {
        Err(PackerError::PackUnsupported(
            MEDIA_TYPE_ZKP_MESSAGE.to_string(),
        ))
    }
}

fn to_time_delta(window: Duration) -> Result<ChronoDuration, PackerError> {
    ChronoDuration::from_std(window).map_err(|err| PackerError::StaleState(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use mockall::mock;

    use rst_common::standard::serde_json;
    use rst_common::with_tokio::tokio;

    use crate::comm::types::MEDIA_TYPE_PLAIN_MESSAGE;
    use crate::comm::zkp::signals::{ID_GENESIS_LENGTH, DID_METHOD_IDEN3};
    use crate::comm::zkp::token::Header;
    use crate::comm::zkp::types::{
        FullProof, ProofError, ProofVerifier, ResolverError, StateInfo, StateResolver, ZKProof,
    };

    mock!(
        FakeVerifier{}

        impl ProofVerifier for FakeVerifier {
            fn verify(
                &self,
                verification_key: &[u8],
                proof: &ZKProof,
                pub_signals: &[String],
            ) -> Result<(), ProofError>;
        }
    );

    mock!(
        FakeResolver{}

        #[async_trait]
        impl StateResolver for FakeResolver {
            async fn resolve_gist(&self, root: String) -> Result<StateInfo, ResolverError>;
        }
    );

    const PRIVADO_MAIN: u8 = 0b1010_0001;
    const PRIVADO_MAIN_CHAIN_ID: u64 = 21000;

    fn generate_id(network_byte: u8) -> Id {
        let mut genesis = [0u8; ID_GENESIS_LENGTH];
        for (idx, byte) in genesis.iter_mut().enumerate() {
            *byte = (idx as u8).wrapping_mul(13).wrapping_add(7);
        }

        Id::new([DID_METHOD_IDEN3, network_byte], genesis)
    }

    fn generate_message(from: String) -> BasicMessage {
        BasicMessage::new(
            MEDIA_TYPE_PLAIN_MESSAGE,
            "https://iden3-communication.io/credentials/0.1/proposal-request",
            from,
            "did:iden3:polygon:amoy:x6x5sor7zpxpkZP8J8ZL5uuFm4hXdM76EDvKpu6fj".to_string(),
        )
        .with_thread_id(Some("thread-1".to_string()))
    }

    /// builds a token whose challenge signal is bound to its own signing input
    fn generate_token(prover: Id, message: &BasicMessage) -> Vec<u8> {
        let payload = serde_json::to_vec(message).unwrap();
        let token = Token::new(Header::default(), payload).unwrap();
        let challenge = message_challenge(&token.signing_input());

        let proof = FullProof {
            proof: ZKProof {
                protocol: "groth16".to_string(),
                ..Default::default()
            },
            pub_signals: vec![
                prover.to_decimal(),
                challenge.to_str_radix(10),
                "9876543210".to_string(),
            ],
        };

        token.with_proof(proof).compact().unwrap().into_bytes()
    }

    fn verifier_ok() -> Arc<dyn ProofVerifier> {
        let mut verifier = MockFakeVerifier::new();
        verifier.expect_verify().returning(|_, _, _| Ok(()));
        Arc::new(verifier)
    }

    fn resolver_with(state: Result<StateInfo, ResolverError>) -> Arc<dyn StateResolver> {
        let mut resolver = MockFakeResolver::new();
        resolver
            .expect_resolve_gist()
            .return_once(move |_| state);
        Arc::new(resolver)
    }

    fn latest_state() -> StateInfo {
        StateInfo {
            root: "9876543210".to_string(),
            created_at: Utc::now() - ChronoDuration::days(3),
            replaced_at: None,
        }
    }

    fn generate_packer(
        verifier: Arc<dyn ProofVerifier>,
        resolver: Arc<dyn StateResolver>,
    ) -> ZKPPacker {
        let context = VerificationContext::new(b"verification-key".to_vec(), verifier)
            .with_resolver(PRIVADO_MAIN_CHAIN_ID, resolver)
            .with_freshness_window(Duration::from_secs(15 * 60));

        ZKPPacker::new(context)
    }

    mod expect_success {
        use super::*;

        #[tokio::test]
        async fn test_unpack_latest_state() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let mut verifier = MockFakeVerifier::new();
            verifier
                .expect_verify()
                .withf(|key, _, signals| key == b"verification-key" && signals.len() == 3)
                .times(1)
                .returning(|_, _, _| Ok(()));

            let mut resolver = MockFakeResolver::new();
            resolver
                .expect_resolve_gist()
                .withf(|root| root == "9876543210")
                .times(1)
                .return_once(|_| Ok(latest_state()));

            let packer = generate_packer(Arc::new(verifier), Arc::new(resolver));
            let authenticated = packer.authenticate(&envelope).await.unwrap();

            assert_eq!(authenticated.message, message);
            assert_eq!(authenticated.sender, prover);
            assert_eq!(authenticated.chain_id, PRIVADO_MAIN_CHAIN_ID);
        }

        #[tokio::test]
        async fn test_unpack_recently_replaced_state() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let mut state = latest_state();
            state.replaced_at = Some(Utc::now() - ChronoDuration::minutes(5));

            let packer = generate_packer(verifier_ok(), resolver_with(Ok(state)));
            let unpacked = packer.unpack(&envelope).await;
            assert_eq!(unpacked.unwrap(), message);
        }
    }

    mod expect_error {
        use super::*;

        #[tokio::test]
        async fn test_stale_state() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let mut state = latest_state();
            state.replaced_at = Some(Utc::now() - ChronoDuration::minutes(20));

            let packer = generate_packer(verifier_ok(), resolver_with(Ok(state)));
            let unpacked = packer.unpack(&envelope).await;
            assert!(matches!(unpacked, Err(PackerError::StaleState(_))));
        }

        #[tokio::test]
        async fn test_freshness_window_out_of_range() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let mut state = latest_state();
            state.replaced_at = Some(Utc::now() - ChronoDuration::minutes(1));

            let context = VerificationContext::new(b"verification-key".to_vec(), verifier_ok())
                .with_resolver(PRIVADO_MAIN_CHAIN_ID, resolver_with(Ok(state)))
                .with_freshness_window(Duration::from_secs(100_000_000_000_000));

            let unpacked = ZKPPacker::new(context).unpack(&envelope).await;
            assert!(matches!(
                unpacked,
                Err(PackerError::StaleState(msg)) if msg.contains("out of range")
            ));
        }

        #[tokio::test]
        async fn test_invalid_proof() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let mut verifier = MockFakeVerifier::new();
            verifier.expect_verify().returning(|_, _, _| {
                Err(ProofError::VerificationError(
                    "pairing check failed".to_string(),
                ))
            });

            let mut resolver = MockFakeResolver::new();
            resolver.expect_resolve_gist().never();

            let packer = generate_packer(Arc::new(verifier), Arc::new(resolver));
            let unpacked = packer.unpack(&envelope).await;
            assert!(matches!(unpacked, Err(PackerError::InvalidProof(_))));
        }

        #[tokio::test]
        async fn test_unknown_network() {
            let prover = generate_id(0b0001_0001);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let mut verifier = MockFakeVerifier::new();
            verifier.expect_verify().never();

            let packer = generate_packer(Arc::new(verifier), resolver_with(Ok(latest_state())));
            let unpacked = packer.unpack(&envelope).await;
            assert!(matches!(
                unpacked,
                Err(PackerError::UnknownNetwork(chain_id)) if chain_id == "137"
            ));
        }

        #[tokio::test]
        async fn test_resolver_failure() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let packer = generate_packer(
                verifier_ok(),
                resolver_with(Err(ResolverError::RequestError(
                    "connection refused".to_string(),
                ))),
            );

            let unpacked = packer.unpack(&envelope).await;
            assert!(matches!(
                unpacked,
                Err(PackerError::StateResolutionError(_))
            ));
        }

        #[tokio::test]
        async fn test_challenge_not_bound_to_message() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            // reuse the proof section of a valid token with another payload
            let tampered = generate_message(prover.to_did().unwrap())
                .with_thread_id(Some("another-thread".to_string()));
            let tampered_envelope = generate_token(prover, &tampered);

            let envelope_str = String::from_utf8(envelope).unwrap();
            let tampered_str = String::from_utf8(tampered_envelope).unwrap();
            let segments = envelope_str.split('.').collect::<Vec<&str>>();
            let tampered_segments = tampered_str.split('.').collect::<Vec<&str>>();
            let forged = format!(
                "{}.{}.{}",
                segments[0], tampered_segments[1], segments[2]
            );

            let packer = generate_packer(verifier_ok(), resolver_with(Ok(latest_state())));
            let unpacked = packer.unpack(forged.as_bytes()).await;
            assert!(matches!(unpacked, Err(PackerError::InvalidProof(_))));
            assert!(unpacked.unwrap_err().to_string().contains("challenge"));
        }

        #[tokio::test]
        async fn test_sender_mismatch() {
            let prover = generate_id(PRIVADO_MAIN);
            let mut other_genesis = [1u8; ID_GENESIS_LENGTH];
            other_genesis[0] = 42;
            let other = Id::new([DID_METHOD_IDEN3, PRIVADO_MAIN], other_genesis);

            let message = generate_message(other.to_did().unwrap());
            let envelope = generate_token(prover, &message);

            let packer = generate_packer(verifier_ok(), resolver_with(Ok(latest_state())));
            let unpacked = packer.unpack(&envelope).await;
            assert!(matches!(unpacked, Err(PackerError::InvalidProof(_))));
            assert!(unpacked.unwrap_err().to_string().contains("sender"));
        }

        #[tokio::test]
        async fn test_unsupported_circuit() {
            let prover = generate_id(PRIVADO_MAIN);
            let message = generate_message(prover.to_did().unwrap());

            let header = Header {
                circuit_id: "credentialAtomicQueryV3".to_string(),
                ..Header::default()
            };
            let token = Token::new(header, serde_json::to_vec(&message).unwrap())
                .unwrap()
                .compact()
                .unwrap();

            let packer = generate_packer(verifier_ok(), resolver_with(Ok(latest_state())));
            let unpacked = packer.unpack(token.as_bytes()).await;
            assert!(matches!(unpacked, Err(PackerError::MalformedPayload(_))));
        }

        #[test]
        fn test_pack_unsupported() {
            let packer = generate_packer(verifier_ok(), resolver_with(Ok(latest_state())));
            let packed = packer.pack(&generate_message("did:iden3:privado:main:a".to_string()));
            assert!(matches!(packed, Err(PackerError::PackUnsupported(_))));
        }

        #[test]
        fn test_state_info_latest() {
            let state = latest_state();
            assert!(state.is_latest());

            let replaced = StateInfo {
                replaced_at: Some(Utc::now() - ChronoDuration::days(1)),
                ..state
            };
            assert!(!replaced.is_latest());
        }
    }
}
