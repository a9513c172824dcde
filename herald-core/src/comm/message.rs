use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};
use rst_common::standard::uuid::Uuid;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

use super::types::PackerError;

/// `BasicMessage` is the logical unit of agent communication
///
/// The `typ` property is the media type of the envelope carrying the message, while `message_type`
/// (`type` on the wire) is the URI identifying its semantic purpose. The `thread_id` groups a
/// request and its replies, a message without thread id starts a new thread
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct BasicMessage {
    pub(crate) id: String,
    pub(crate) typ: String,

    #[serde(rename = "type")]
    pub(crate) message_type: String,

    #[serde(rename = "thid")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) thread_id: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub(crate) body: Value,

    pub(crate) from: String,
    pub(crate) to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) expires_time: Option<i64>,
}

impl BasicMessage {
    pub fn new(typ: &str, message_type: &str, from: String, to: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            typ: typ.to_string(),
            message_type: message_type.to_string(),
            thread_id: None,
            body: Value::Null,
            from,
            to,
            created_time: None,
            expires_time: None,
        }
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    pub fn with_thread_id(mut self, thread_id: Option<String>) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_created_time(mut self, created_time: Option<i64>) -> Self {
        self.created_time = created_time;
        self
    }

    pub fn with_expires_time(mut self, expires_time: Option<i64>) -> Self {
        self.expires_time = expires_time;
        self
    }

    pub fn get_id(&self) -> &String {
        &self.id
    }

    pub fn get_typ(&self) -> &String {
        &self.typ
    }

    pub fn get_type(&self) -> &String {
        &self.message_type
    }

    pub fn get_thread_id(&self) -> Option<&String> {
        self.thread_id.as_ref()
    }

    pub fn get_body(&self) -> &Value {
        &self.body
    }

    pub fn get_from(&self) -> &String {
        &self.from
    }

    pub fn get_to(&self) -> &String {
        &self.to
    }

    pub fn get_created_time(&self) -> Option<i64> {
        self.created_time
    }

    pub fn get_expires_time(&self) -> Option<i64> {
        self.expires_time
    }

    /// `validate` checks the invariants of a well-formed message, both of sender and recipient
    /// must be filled
    pub fn validate(&self) -> Result<(), PackerError> {
        if self.from.is_empty() {
            return Err(PackerError::MalformedPayload(
                "message: from is missing".to_string(),
            ));
        }

        if self.to.is_empty() {
            return Err(PackerError::MalformedPayload(
                "message: to is missing".to_string(),
            ));
        }

        Ok(())
    }
}

impl ToJSON for BasicMessage {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}

impl TryInto<Vec<u8>> for BasicMessage {
    type Error = PackerError;

    fn try_into(self) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(&self).map_err(|err| PackerError::MarshalError(err.to_string()))
    }
}

impl TryFrom<Vec<u8>> for BasicMessage {
    type Error = PackerError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        BasicMessage::try_from(value.as_slice())
    }
}

impl TryFrom<&[u8]> for BasicMessage {
    type Error = PackerError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let message: BasicMessage = serde_json::from_slice(value)
            .map_err(|err| PackerError::MalformedPayload(err.to_string()))?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rst_common::standard::serde_json::json;

    use crate::comm::types::MEDIA_TYPE_PLAIN_MESSAGE;

    #[test]
    fn test_serialize_without_thread_id() {
        let message = BasicMessage::new(
            MEDIA_TYPE_PLAIN_MESSAGE,
            "https://iden3-communication.io/authorization/1.0/response",
            "did:iden3:privado:main:sender".to_string(),
            "did:iden3:privado:main:recipient".to_string(),
        )
        .with_id("id-1".to_string());

        let json_str = message.to_json().unwrap();
        assert!(!json_str.contains("thid"));
        assert!(!json_str.contains("body"));
        assert!(!json_str.contains("created_time"));
        assert!(json_str.contains(r#""type":"https://iden3-communication.io/authorization/1.0/response""#));
    }

    #[test]
    fn test_deserialize_wire_format() {
        let raw = json!({
            "id": "f0885dd0-e60e-11ee-b3e8-de17148ce1ce",
            "typ": "application/iden3comm-plain-json",
            "type": "https://iden3-communication.io/authorization/1.0/response",
            "thid": "thread-1",
            "body": {"message": "hello"},
            "from": "did:iden3:privado:main:sender",
            "to": "did:iden3:privado:main:recipient",
            "created_time": 1711000000
        });

        let bytes = rst_common::standard::serde_json::to_vec(&raw).unwrap();
        let message = BasicMessage::try_from(bytes).unwrap();

        assert_eq!(message.get_thread_id(), Some(&"thread-1".to_string()));
        assert_eq!(message.get_body(), &json!({"message": "hello"}));
        assert_eq!(message.get_created_time(), Some(1711000000));
        assert_eq!(message.get_expires_time(), None);
        assert!(message.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_sender() {
        let message = BasicMessage::new(
            MEDIA_TYPE_PLAIN_MESSAGE,
            "type",
            "".to_string(),
            "did:iden3:privado:main:recipient".to_string(),
        );

        let validation = message.validate();
        assert!(matches!(validation, Err(PackerError::MalformedPayload(_))));
        assert!(validation.unwrap_err().to_string().contains("from"));
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let parsed = BasicMessage::try_from(b"not a json".to_vec());
        assert!(matches!(parsed, Err(PackerError::MalformedPayload(_))));
    }
}
