//! orbipax-cli
//!
//! Configuration and command implementations behind the `orbipax` binary.

pub mod commands;
pub mod config;
