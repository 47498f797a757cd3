//! tonewire CLI library.
//!
//! Holds the command implementations behind the `tonewire` binary: the
//! streaming server, the standalone tone player and the offline renderer,
//! plus the configuration, logging and playback plumbing they share.

pub mod commands;
pub mod config;
pub mod logging;
pub mod playback;
