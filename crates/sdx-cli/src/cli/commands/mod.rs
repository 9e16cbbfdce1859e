//! CLI command handlers.

pub mod chat;
pub mod config;
pub mod diagnose;
pub mod status;
pub mod symptoms;
