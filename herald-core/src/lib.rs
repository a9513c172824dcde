//! `prople-herald-core` provides the message exchange logic behind the `herald` agent endpoint.
//!
//! The endpoint receives an `iden3comm` message from a remote identity wallet, authenticates it and
//! replies with a credential proposal. The crate is split into three sub-domains:
//!
//! - `comm`, the wire layer. It contains the [`comm::message::BasicMessage`] entity, the
//!   [`comm::manager::PackageManager`] registry and the packers registered into it
//! - `protocol`, the message bodies exchanged through `comm`, like the credential proposal
//! - `agent`, the orchestration used per request: unpack, build the reply and pack it back
//!
//! Anything related to transport, configuration and concrete collaborators (state resolvers,
//! proof verifiers) lives outside of this crate, the core only defines their abstractions
pub mod agent;
pub mod comm;
pub mod protocol;
