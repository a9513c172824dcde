use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json;

use super::message::BasicMessage;
use super::types::{Packer, PackerError, MEDIA_TYPE_PLAIN_MESSAGE};

/// `PlainPacker` packs and unpacks the unprotected JSON message
///
/// It doesn't provide any authentication, a message unpacked through this packer must not be
/// treated as coming from its declared sender
#[derive(Clone, Default)]
pub struct PlainPacker;

impl PlainPacker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Packer for PlainPacker {
    fn media_type(&self) -> &str {
        MEDIA_TYPE_PLAIN_MESSAGE
    }

    async fn unpack(&self, envelope: &[u8]) -> Result<BasicMessage, PackerError> {
        let message = BasicMessage::try_from(envelope)?;
        if message.get_typ() != MEDIA_TYPE_PLAIN_MESSAGE {
            return Err(PackerError::MalformedPayload(format!(
                "plain: unexpected typ: {}",
                message.get_typ()
            )));
        }

        message.validate()?;
        Ok(message)
    }

    fn pack(&self, message: &BasicMessage) -> Result<Vec<u8>, PackerError> {
        serde_json::to_vec(message).map_err(|err| PackerError::MarshalError(err.to_string()))
    }
}
