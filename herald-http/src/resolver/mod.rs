//! `resolver` implements the state resolver through an external resolver service
pub mod client;

pub use client::HttpResolver;
