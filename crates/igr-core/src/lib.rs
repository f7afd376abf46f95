//! Core domain + application logic for the Instagram relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Instagram
//! API live behind ports (traits) implemented in adapter crates.

pub mod account;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod media;
pub mod messaging;
pub mod relay;
pub mod security;
pub mod session;

pub use errors::{Error, Result};

#[cfg(test)]
pub(crate) mod testing;
