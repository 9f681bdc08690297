//! Core types for the pantry tracker.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the web application and the CLI.

pub mod collection;
pub mod email;
pub mod id;
pub mod item;

pub use collection::CollectionPath;
pub use email::{Email, EmailError};
pub use id::*;
pub use item::{DEFAULT_QUANTITY, ItemFields, ItemPatch, PantryItem};
