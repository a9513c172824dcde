//! `protocol` contains the message bodies exchanged by the agent
pub mod proposal;
