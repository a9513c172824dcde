//! `prople-herald-http` provides the adapters needed to serve the herald agent over HTTP
//!
//! - `config`: TOML configuration
//! - `http`: the `axum` handler of the agent endpoint
//! - `resolver`: the state resolver backed by a resolver service
//! - `verifier`: the `groth16` proof verifier
pub mod common;
pub mod config;
pub mod http;
pub mod resolver;
pub mod verifier;

mod herald;
pub use herald::HeraldHTTP;
