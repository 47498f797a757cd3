//! CLI command implementations

pub mod render;
pub mod serve;
pub mod tone;
