//! Subcommand implementations

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod doctor;
pub mod headlines;
