//! Core SDX library (config, logging, service client, session state).

pub mod config;
pub mod logging;
pub mod service;
pub mod session;
