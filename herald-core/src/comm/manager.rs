use std::collections::HashMap;

use rst_common::with_logging::log::debug;

use super::envelope::detect_media_type;
use super::message::BasicMessage;
use super::types::{Packer, PackerError, Unpacked};

/// `PackageManager` is the registry of all supported [`Packer`] implementations
///
/// Packers are keyed by their media type, and each media type can only be registered once.
/// Registration needs a mutable access and should only happen while building the agent, after
/// that the manager is expected to be shared read-only between concurrent requests
#[derive(Default)]
pub struct PackageManager {
    packers: HashMap<String, Box<dyn Packer>>,
}

impl PackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, packer: Box<dyn Packer>) -> Result<&mut Self, PackerError> {
        let media_type = packer.media_type().to_string();
        if self.packers.contains_key(&media_type) {
            return Err(PackerError::DuplicateMediaType(media_type));
        }

        debug!("[manager:register] media type: {}", media_type);
        self.packers.insert(media_type, packer);
        Ok(self)
    }

    /// `register_packers` registers all given packers in order, it stops at the first
    /// media type collision
    pub fn register_packers(
        &mut self,
        packers: Vec<Box<dyn Packer>>,
    ) -> Result<&mut Self, PackerError> {
        for packer in packers {
            self.register(packer)?;
        }

        Ok(self)
    }

    pub fn media_types(&self) -> Vec<String> {
        let mut media_types = self.packers.keys().cloned().collect::<Vec<String>>();
        media_types.sort();
        media_types
    }

    pub fn is_registered(&self, media_type: &str) -> bool {
        self.packers.contains_key(media_type)
    }

    /// `unpack` detects the media type declared by the envelope and delegates the decoding to the
    /// packer registered for it
    pub async fn unpack(&self, envelope: &[u8]) -> Result<Unpacked, PackerError> {
        let media_type = detect_media_type(envelope)?;
        self.dispatch(envelope, media_type).await
    }

    /// `unpack_accepting` works like [`PackageManager::unpack`] but only for the given media
    /// types, any other declared media type is rejected before reaching its packer
    pub async fn unpack_accepting(
        &self,
        envelope: &[u8],
        accept_media_types: &[String],
    ) -> Result<Unpacked, PackerError> {
        let media_type = detect_media_type(envelope)?;
        if !accept_media_types.contains(&media_type) {
            return Err(PackerError::UnsupportedMediaType(media_type));
        }

        self.dispatch(envelope, media_type).await
    }

    async fn dispatch(&self, envelope: &[u8], media_type: String) -> Result<Unpacked, PackerError> {
        let packer = self
            .packers
            .get(&media_type)
            .ok_or(PackerError::UnsupportedMediaType(media_type.clone()))?;

        debug!("[manager:unpack] media type: {}", media_type);
        let message = packer.unpack(envelope).await?;
        Ok(Unpacked {
            message,
            media_type,
        })
    }

    pub fn pack(&self, media_type: &str, message: &BasicMessage) -> Result<Vec<u8>, PackerError> {
        self.packers
            .get(media_type)
            .ok_or(PackerError::UnsupportedMediaType(media_type.to_string()))?
            .pack(message)
    }
}
