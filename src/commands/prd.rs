//! PRD payloads
//!
//! `export prd` and `create detailed project` carry a JSON document
//! describing a project and its tasks:
//!
//! ```json
//! {
//!   "projectName": "Checkout v2",
//!   "description": "optional, becomes the list description",
//!   "tasks": [
//!     {
//!       "name": "Payment form",
//!       "description": "Card + wallet",
//!       "priority": "high",
//!       "dueDate": "2025-11-30",
//!       "tags": ["frontend"],
//!       "assignee": "nadia",
//!       "subtasks": [{ "name": "Validation" }]
//!     }
//!   ]
//! }
//! ```

use chrono::{DateTime, NaiveDate};
use clickup_types::{NewTask, Priority};
use serde::Deserialize;
use tracing::warn;

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdDocument {
    pub project_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tasks: Vec<PrdTask>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdTask {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<PrdSubtask>,
}

/// Same fields as [`PrdTask`] without further nesting
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdSubtask {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

/// Parse and validate a PRD payload.
pub fn parse_prd(payload: &str) -> Result<PrdDocument> {
    if payload.trim().is_empty() {
        return Err(BridgeError::InvalidPayload(
            "Expected a JSON PRD payload after the command".to_string(),
        ));
    }

    let doc: PrdDocument = serde_json::from_str(payload)?;

    if doc.project_name.trim().is_empty() {
        return Err(BridgeError::InvalidPayload(
            "projectName must not be empty".to_string(),
        ));
    }
    for (i, task) in doc.tasks.iter().enumerate() {
        if task.name.trim().is_empty() {
            return Err(BridgeError::InvalidPayload(format!(
                "tasks[{}].name must not be empty",
                i
            )));
        }
        if let Some(j) = task.subtasks.iter().position(|s| s.name.trim().is_empty()) {
            return Err(BridgeError::InvalidPayload(format!(
                "tasks[{}].subtasks[{}].name must not be empty",
                i, j
            )));
        }
    }

    Ok(doc)
}

/// Fields shared by tasks and subtasks, mapped onto a ClickUp payload.
fn build_task(
    name: &str,
    description: Option<&str>,
    priority: Option<&str>,
    due_date: Option<&str>,
    tags: &[String],
    assignees: Vec<String>,
) -> NewTask {
    NewTask {
        name: name.trim().to_string(),
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        assignees,
        priority: priority.map(Priority::from_label),
        due_date: due_date.and_then(|raw| {
            let parsed = parse_due_date(raw);
            if parsed.is_none() {
                warn!(due_date = raw, task = name, "Ignoring unparseable due date");
            }
            parsed
        }),
        tags: tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        parent: None,
    }
}

impl PrdTask {
    pub fn to_new_task(&self, assignees: Vec<String>) -> NewTask {
        build_task(
            &self.name,
            self.description.as_deref(),
            self.priority.as_deref(),
            self.due_date.as_deref(),
            &self.tags,
            assignees,
        )
    }
}

impl PrdSubtask {
    pub fn to_new_task(&self, parent_id: &str, assignees: Vec<String>) -> NewTask {
        NewTask {
            parent: Some(parent_id.to_string()),
            ..build_task(
                &self.name,
                self.description.as_deref(),
                self.priority.as_deref(),
                self.due_date.as_deref(),
                &self.tags,
                assignees,
            )
        }
    }
}

/// `YYYY-MM-DD` (midnight UTC) or RFC 3339, as epoch milliseconds.
pub fn parse_due_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp_millis())
}
