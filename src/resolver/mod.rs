//! Name resolution
//!
//! Turns human-typed names for spaces, folders, lists and users into ClickUp
//! ids. [`matching`] holds the pure scoring and selection rules;
//! [`directory`] fetches fresh candidate sets and chains lookups into a
//! space → folder → list pipeline.

pub mod directory;
pub mod matching;

use serde::Serialize;
use thiserror::Error;

pub use directory::{DirectoryResolver, ListPath, ResolvedList};
pub use matching::{
    looks_like_email, normalize_name, resolve_best_match, resolve_user_match,
    DEFAULT_MATCH_THRESHOLD,
};

/// The lookup step a resolution failed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Space,
    Folder,
    List,
    User,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::Space => "space",
            Stage::Folder => "folder",
            Stage::List => "list",
            Stage::User => "user",
        };
        f.write_str(label)
    }
}

/// No candidate at `stage` matched `name`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not find a {stage} matching '{name}'")]
pub struct ResolutionFailure {
    pub stage: Stage,
    pub name: String,
}

impl ResolutionFailure {
    pub fn new(stage: Stage, name: impl Into<String>) -> Self {
        Self {
            stage,
            name: name.into(),
        }
    }
}
