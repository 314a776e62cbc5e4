//! JSON state file persistence for the gamewatch bot.
//!
//! The whole bot state lives in one pretty-printed JSON file (see
//! [`gamewatch_types::StateFile`] for the layout). [`JsonFileStore`] loads and
//! validates it once at startup and rewrites it after every catalog mutation.
//!
//! # Modules
//!
//! - [`error`] -- [`StoreError`] for load and write failures.
//! - [`file`] -- [`JsonFileStore`], the [`Persistence`] implementation.
//!
//! [`Persistence`]: gamewatch_core::Persistence

pub mod error;
pub mod file;

pub use error::StoreError;
pub use file::JsonFileStore;
