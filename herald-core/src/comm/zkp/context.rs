use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::types::{ProofVerifier, StateResolver};

pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(15 * 60);

/// `VerificationContext` holds everything needed to authenticate a `JWZ` token
///
/// - the verification key of the `authV2` circuit
/// - the proof verifier using that key
/// - a state resolver per chain id
/// - the freshness window, the maximum age of a replaced state which is still accepted
///
/// The context is built once at startup and never mutated after, it's shared between requests
/// through an [`Arc`]
#[derive(Clone)]
pub struct VerificationContext {
    verification_key: Arc<Vec<u8>>,
    verifier: Arc<dyn ProofVerifier>,
    resolvers: HashMap<u64, Arc<dyn StateResolver>>,
    freshness_window: Duration,
}

impl VerificationContext {
    pub fn new(verification_key: Vec<u8>, verifier: Arc<dyn ProofVerifier>) -> Self {
        Self {
            verification_key: Arc::new(verification_key),
            verifier,
            resolvers: HashMap::new(),
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }

    pub fn with_resolver(mut self, chain_id: u64, resolver: Arc<dyn StateResolver>) -> Self {
        self.resolvers.insert(chain_id, resolver);
        self
    }

    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn verification_key(&self) -> &[u8] {
        self.verification_key.as_slice()
    }

    pub fn verifier(&self) -> Arc<dyn ProofVerifier> {
        self.verifier.clone()
    }

    pub fn resolver(&self, chain_id: u64) -> Option<Arc<dyn StateResolver>> {
        self.resolvers.get(&chain_id).cloned()
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }
}
