//! Shared types and configuration for Osprey.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes with decimal-precision money helpers
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
