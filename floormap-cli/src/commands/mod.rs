//! CLI command implementations.

pub mod common;
pub mod preview;
pub mod resolve;
