//! Data models and configuration.

pub mod bundle;
pub mod config;
