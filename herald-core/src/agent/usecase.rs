use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json;
use rst_common::with_logging::log::{debug, info, warn};

use crate::comm::manager::PackageManager;
use crate::comm::message::BasicMessage;
use crate::comm::types::{MEDIA_TYPE_PLAIN_MESSAGE, MEDIA_TYPE_ZKP_MESSAGE};
use crate::protocol::proposal::{ProposalTemplate, CREDENTIAL_PROPOSAL_MESSAGE_TYPE};

use super::types::{AgentAPI, AgentError};

/// `Agent` answers an incoming message with a credential proposal
///
/// The reply goes back to the sender of the incoming message, in the same thread, and it's
/// always encoded as a plain message. Only envelopes using one of the accepted media types
/// are unpacked, by default that's only `JWZ` tokens
#[derive(Clone)]
pub struct Agent {
    manager: Arc<PackageManager>,
    verification_url: String,
    proposal: ProposalTemplate,
    accept_media_types: Vec<String>,
}

impl Agent {
    pub fn new(manager: Arc<PackageManager>, verification_url: String) -> Self {
        Self {
            manager,
            verification_url,
            proposal: ProposalTemplate::default(),
            accept_media_types: vec![MEDIA_TYPE_ZKP_MESSAGE.to_string()],
        }
    }

    pub fn with_proposal(mut self, proposal: ProposalTemplate) -> Self {
        self.proposal = proposal;
        self
    }

    pub fn with_accept_media_types(mut self, media_types: Vec<String>) -> Self {
        self.accept_media_types = media_types;
        self
    }

    /// `claim_url` points the wallet to the issuer endpoint, the sender is the user asking
    /// for a credential and the recipient is the issuer
    pub fn claim_url(&self, message: &BasicMessage) -> String {
        format!(
            "{}/claim?userID={}&issuerID={}",
            self.verification_url,
            message.get_from(),
            message.get_to()
        )
    }

    fn build_reply(&self, message: &BasicMessage) -> Result<BasicMessage, AgentError> {
        let proposal = self.proposal.build(self.claim_url(message));
        let body = serde_json::to_value(&proposal)
            .map_err(|err| AgentError::InternalMarshalError(err.to_string()))?;

        let reply = BasicMessage::new(
            MEDIA_TYPE_PLAIN_MESSAGE,
            CREDENTIAL_PROPOSAL_MESSAGE_TYPE,
            message.get_to().to_owned(),
            message.get_from().to_owned(),
        )
        .with_thread_id(message.get_thread_id().cloned())
        .with_body(body);

        Ok(reply)
    }
}

#[async_trait]
impl AgentAPI for Agent {
    async fn handle(&self, payload: Vec<u8>) -> Result<Vec<u8>, AgentError> {
        let unpacked = self
            .manager
            .unpack_accepting(&payload, &self.accept_media_types)
            .await
            .map_err(|err| {
                warn!("[agent:handle] unpack failed: {}", err);
                AgentError::UnpackError(err)
            })?;

        debug!(
            "[agent:handle] message id: {}, type: {}",
            unpacked.message.get_id(),
            unpacked.message.get_type()
        );

        let reply = self.build_reply(&unpacked.message)?;
        let output = self
            .manager
            .pack(MEDIA_TYPE_PLAIN_MESSAGE, &reply)
            .map_err(|err| AgentError::InternalMarshalError(err.to_string()))?;

        info!(
            "[agent:handle] proposal sent to: {}, thread: {:?}",
            reply.get_to(),
            reply.get_thread_id()
        );

        Ok(output)
    }
}
