//! `verifier` verifies `groth16` proofs over the `bn254` curve
pub mod groth16;

pub use groth16::Groth16Verifier;
