//! clickup-bridge
//!
//! Turns chat messages such as `create task Fix login` or
//! `update project Website Redesign` into ClickUp API calls. Human-typed
//! names for spaces, folders, lists and users are resolved to ids by fuzzy
//! matching against freshly fetched directory listings.

#[cfg(feature = "server")]
pub mod api;
pub mod clickup;
pub mod commands;
pub mod config;
pub mod error;
pub mod resolver;

pub use clickup::{ClickUpApi, ClickUpClient};
pub use commands::{CommandInterpreter, CommandResponse};
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
