// ABOUTME: Library root for the EMS development workflow tool
// ABOUTME: Exposes commands, configuration, the migration runner and process plumbing

pub mod commands;
pub mod config;
pub mod devserver;
pub mod error;
pub mod migrate;
pub mod output;
pub mod preflight;
pub mod process;
pub mod utils;
