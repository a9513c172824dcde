use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use rst_common::standard::serde_json::{self, Value};

use super::types::PackerError;

/// `detect_media_type` reads the media type declared by an envelope without decoding it
///
/// Two envelope shapes are recognized:
///
/// - a JSON object, which declares its media type in its top level `typ` field
/// - a compact token `header.payload.signature`, which declares it in the `typ` field of its
///   base64url encoded header
///
/// An envelope matching none of those shapes is a [`PackerError::MalformedPayload`], while a
/// recognized envelope without a usable `typ` is a [`PackerError::UnsupportedMediaType`]
pub fn detect_media_type(envelope: &[u8]) -> Result<String, PackerError> {
    let start = envelope
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(envelope.len());

    let trimmed = &envelope[start..];
    let header = match trimmed.first() {
        Some(b'{') => serde_json::from_slice::<Value>(trimmed)
            .map_err(|err| PackerError::MalformedPayload(err.to_string()))?,
        Some(_) => compact_header(trimmed)?,
        None => {
            return Err(PackerError::MalformedPayload(
                "envelope: empty payload".to_string(),
            ))
        }
    };

    match header.get("typ") {
        Some(Value::String(typ)) if !typ.is_empty() => Ok(typ.to_owned()),
        Some(other) => Err(PackerError::UnsupportedMediaType(other.to_string())),
        None => Err(PackerError::UnsupportedMediaType(
            "envelope: typ is missing".to_string(),
        )),
    }
}

fn compact_header(envelope: &[u8]) -> Result<Value, PackerError> {
    let token = std::str::from_utf8(envelope)
        .map_err(|err| PackerError::MalformedPayload(err.to_string()))?;

    let segments = token.trim_end().split('.').collect::<Vec<&str>>();
    if segments.len() != 3 {
        return Err(PackerError::MalformedPayload(format!(
            "envelope: expected 3 token segments, got {}",
            segments.len()
        )));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|err| PackerError::MalformedPayload(err.to_string()))?;

    let header: Value = serde_json::from_slice(&header_bytes)
        .map_err(|err| PackerError::MalformedPayload(err.to_string()))?;

    if !header.is_object() {
        return Err(PackerError::MalformedPayload(
            "envelope: token header is not an object".to_string(),
        ));
    }

    Ok(header)
}
