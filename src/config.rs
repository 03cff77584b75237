//! Bridge configuration
//!
//! Loaded once at startup and shared read-only with every component.
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. Optional YAML file named by `BRIDGE_CONFIG`
//! 3. Environment variables (a `.env` file is honoured by the binary)
//!
//! Every container id a command writes into lives here, never in the
//! command handlers.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::resolver::DEFAULT_MATCH_THRESHOLD;

pub const DEFAULT_API_BASE: &str = "https://api.clickup.com/api/v2";
pub const DEFAULT_APP_BASE: &str = "https://app.clickup.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub clickup: ClickUpConfig,
    pub server: ServerConfig,
    pub matching: MatchingConfig,
    pub targets: CommandTargets,
    pub assignees: AssigneeConfig,
    pub projects: ProjectLookup,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ClickUpConfig {
    pub api_key: String,
    pub team_id: String,
    pub api_base: String,
    /// Base of the web app, used to build links returned to the chat
    pub app_base: String,
    pub timeout_secs: u64,
}

impl Default for ClickUpConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            team_id: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            app_base: DEFAULT_APP_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// The API key must never reach the logs.
impl std::fmt::Debug for ClickUpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickUpConfig")
            .field("api_key", &"<redacted>")
            .field("team_id", &self.team_id)
            .field("api_base", &self.api_base)
            .field("app_base", &self.app_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClickUpConfig {
    /// Web link to a list view.
    pub fn list_link(&self, list_id: &str) -> String {
        format!(
            "{}/{}/v/l/{}",
            self.app_base.trim_end_matches('/'),
            self.team_id,
            list_id
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Distance cutoff in `[0, 1]`; smaller demands closer matches
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Where new lists are created
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListContainer {
    Folder { id: String },
    Space { id: String },
}

/// How `export prd` places its tasks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PrdTarget {
    /// Append every PRD to one existing list
    ExistingList { list_id: String },
    /// Create a new list named after the project in `project_container`
    NewList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandTargets {
    /// List used by `create task`
    pub task_list_id: Option<String>,
    /// List used by `create tasks`; falls back to `task_list_id`
    pub bulk_list_id: Option<String>,
    pub prd: Option<PrdTarget>,
    /// Container for `create list`, `create detailed project` and new-list PRDs
    pub project_container: Option<ListContainer>,
}

impl CommandTargets {
    pub fn bulk_list_id(&self) -> Option<&str> {
        self.bulk_list_id
            .as_deref()
            .or(self.task_list_id.as_deref())
    }

    /// Effective PRD target. Without an explicit choice a configured
    /// project container wins over the single-task list.
    pub fn prd_target(&self) -> Option<PrdTarget> {
        if let Some(target) = &self.prd {
            return Some(target.clone());
        }
        if self.project_container.is_some() {
            return Some(PrdTarget::NewList);
        }
        self.task_list_id
            .as_ref()
            .map(|list_id| PrdTarget::ExistingList {
                list_id: list_id.clone(),
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssigneeConfig {
    /// Used when no assignee is named or the named one cannot be resolved
    pub default_assignee_id: Option<String>,
    /// Resolved against workspace members for `create task`
    pub default_assignee_name: Option<String>,
    /// Resolve per-task `assignee` fields in PRD payloads
    pub resolve_prd_assignees: bool,
}

/// Names used to locate a project's list for `update project`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectLookup {
    pub space_name: String,
    /// `None` searches lists directly under the space
    pub folder_name: Option<String>,
}

impl Default for ProjectLookup {
    fn default() -> Self {
        Self {
            space_name: "Development".to_string(),
            folder_name: Some("Q4 Projects".to_string()),
        }
    }
}

impl BridgeConfig {
    /// Load from `BRIDGE_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("BRIDGE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            team_id = %config.clickup.team_id,
            threshold = config.matching.threshold,
            "Loaded bridge configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading bridge configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlay environment variables. `lookup` is injectable for tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = var("CLICKUP_API_KEY") {
            self.clickup.api_key = v;
        }
        if let Some(v) = var("CLICKUP_TEAM_ID") {
            self.clickup.team_id = v;
        }
        if let Some(v) = var("CLICKUP_API_BASE") {
            self.clickup.api_base = v;
        }
        if let Some(v) = var("CLICKUP_APP_BASE") {
            self.clickup.app_base = v;
        }
        if let Some(v) = var("CLICKUP_TIMEOUT_SECS") {
            self.clickup.timeout_secs = v
                .parse()
                .with_context(|| format!("CLICKUP_TIMEOUT_SECS is not a number: {v}"))?;
        }

        if let Some(v) = var("BRIDGE_BIND_HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("PORT") {
            self.server.port = v
                .parse()
                .with_context(|| format!("PORT is not a valid port: {v}"))?;
        }

        if let Some(v) = var("BRIDGE_MATCH_THRESHOLD") {
            self.matching.threshold = v
                .parse()
                .with_context(|| format!("BRIDGE_MATCH_THRESHOLD is not a number: {v}"))?;
        }

        if let Some(v) = var("BRIDGE_TASK_LIST_ID") {
            self.targets.task_list_id = Some(v);
        }
        if let Some(v) = var("BRIDGE_BULK_LIST_ID") {
            self.targets.bulk_list_id = Some(v);
        }
        if let Some(v) = var("BRIDGE_PRD_LIST_ID") {
            self.targets.prd = Some(PrdTarget::ExistingList { list_id: v });
        }
        if let Some(v) = var("BRIDGE_PROJECT_FOLDER_ID") {
            self.targets.project_container = Some(ListContainer::Folder { id: v });
        } else if let Some(v) = var("BRIDGE_PROJECT_SPACE_ID") {
            self.targets.project_container = Some(ListContainer::Space { id: v });
        }

        if let Some(v) = var("BRIDGE_DEFAULT_ASSIGNEE_ID") {
            self.assignees.default_assignee_id = Some(v);
        }
        if let Some(v) = var("BRIDGE_DEFAULT_ASSIGNEE_NAME") {
            self.assignees.default_assignee_name = Some(v);
        }
        if let Some(v) = var("BRIDGE_RESOLVE_PRD_ASSIGNEES") {
            self.assignees.resolve_prd_assignees = parse_bool(&v)
                .ok_or_else(|| anyhow!("BRIDGE_RESOLVE_PRD_ASSIGNEES is not a boolean: {v}"))?;
        }

        if let Some(v) = var("BRIDGE_PROJECT_SPACE") {
            self.projects.space_name = v;
        }
        // Set-but-empty means "no folder": look for lists directly in the space.
        if let Some(v) = lookup("BRIDGE_PROJECT_FOLDER") {
            let v = v.trim();
            self.projects.folder_name = (!v.is_empty()).then(|| v.to_string());
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.clickup.api_key.trim().is_empty() {
            bail!("CLICKUP_API_KEY is not set");
        }
        if self.clickup.team_id.trim().is_empty() {
            bail!("CLICKUP_TEAM_ID is not set");
        }
        if self.clickup.timeout_secs == 0 {
            bail!("ClickUp timeout must be at least one second");
        }
        let threshold = self.matching.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!("Match threshold must be within [0, 1], got {threshold}");
        }
        if self.projects.space_name.trim().is_empty() {
            bail!("Project space name must not be empty");
        }
        if matches!(self.targets.prd, Some(PrdTarget::NewList))
            && self.targets.project_container.is_none()
        {
            bail!("PRD mode new_list requires a project container (BRIDGE_PROJECT_FOLDER_ID or BRIDGE_PROJECT_SPACE_ID)");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
