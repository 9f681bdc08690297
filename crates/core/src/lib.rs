//! Pantry Tracker Core - Shared domain types.
//!
//! This crate provides the types shared by the pantry tracker components:
//! - `tracker` - The web application (session gate, tracker page, item actions)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Store and identity integrations live in the
//! tracker crate.
//!
//! # Modules
//!
//! - [`types`] - Opaque IDs, emails, pantry items and collection paths
//! - [`search`] - The name filter applied to the displayed item list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod search;
pub mod types;

pub use search::filter_by_name;
pub use types::*;
