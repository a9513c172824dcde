//! `agent` is the credential proposal agent
//!
//! It receives an authenticated message from a wallet and answers it with a credential proposal
//! telling the wallet where it can claim its credential from
pub mod types;
pub mod usecase;

pub use usecase::Agent;
