//! Pantry Tracker web application library.
//!
//! The server-rendered tracker: a signed-in user lists, searches, adds,
//! edits and deletes pantry items. Built as a library so the binary and the
//! integration tests assemble the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod view;
