//! `comm` is the wire layer of the agent.
//!
//! Each supported envelope format is a [`types::Packer`] identified by its media type. All packers
//! are registered into a [`manager::PackageManager`] once at startup, and after that the manager is
//! shared read-only between requests.
//!
//! Two packers are provided:
//!
//! - [`plain::PlainPacker`], the unprotected JSON message
//! - [`zkp::packer::ZKPPacker`], a `JWZ` token which authenticates its sender through a zero-knowledge
//!   proof, checked against the on-chain identity state
pub mod envelope;
pub mod manager;
pub mod message;
pub mod plain;
pub mod types;
pub mod zkp;
