//! Command handlers for the control bus deploy CLI

pub mod config;
pub mod deploy;
