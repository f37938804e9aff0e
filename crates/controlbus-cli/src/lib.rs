//! # Control Bus Deploy CLI
//!
//! Command-line front end for the control bus deployment client.
//!
//! ## Architecture
//!
//! - Clap-based argument parsing with derive macros
//! - Layered configuration (defaults, TOML file, environment, flags)
//! - Handler-based command processing on top of `controlbus-client`

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::*;
pub use error::*;
