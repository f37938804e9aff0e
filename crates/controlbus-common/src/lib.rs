//! # Control bus common
//!
//! Pieces shared by the control bus deployment crates:
//! - Logging initialisation for binaries
//! - The configuration error type used by every configuration layer

pub mod error;
pub mod logging;

pub use error::ConfigurationError;
