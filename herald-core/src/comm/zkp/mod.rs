//! `zkp` provides the packer for `JWZ` (JSON Web Zero-knowledge) envelopes
//!
//! A `JWZ` token carries the message together with an `authV2` zero-knowledge proof. Unpacking a token
//! authenticates its sender, the flow is:
//!
//! ```text
//! token
//! ├── parse header, message and proof
//! ├── derive the network from the proven identity, pick its state resolver
//! ├── verify the proof using the verification key
//! ├── check the proof commits to this message and to its sender
//! └── resolve the proven GIST root and reject it when it has been replaced too long ago
//! ```
//!
//! The proof system and the on-chain resolution are abstracted behind [`types::ProofVerifier`] and
//! [`types::StateResolver`], both of them are provided by the caller through the
//! [`context::VerificationContext`]
pub mod context;
pub mod packer;
pub mod signals;
pub mod token;
pub mod types;
