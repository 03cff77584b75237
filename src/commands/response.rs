//! Command results as returned to the chat frontend (camelCase JSON).

use std::collections::BTreeMap;

use clickup_types::{Task, TaskList};
use serde::Serialize;

use crate::error::BridgeError;
use crate::resolver::Stage;

/// Summary of one created task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedTask {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Task> for CreatedTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            url: task.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedList {
    pub id: String,
    pub name: String,
}

impl From<&TaskList> for CreatedList {
    fn from(list: &TaskList) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCreated {
    pub success: bool,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksCreated {
    pub success: bool,
    pub created_count: usize,
    pub tasks: Vec<CreatedTask>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreated {
    pub success: bool,
    pub project_name: String,
    pub list_id: String,
    pub created_count: usize,
    pub subtask_count: usize,
    pub tasks: Vec<CreatedTask>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListCreated {
    pub success: bool,
    pub list: CreatedList,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project: String,
    pub list_id: String,
    pub total: usize,
    /// Lower-cased status → task count
    pub summary: BTreeMap<String, usize>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailed {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Work completed before the failure, when a multi-step command stopped
    /// part way
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<CreatedTask>,
}

impl CommandFailed {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            stage: None,
            name: None,
            created_count: None,
            subtask_count: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_progress(mut self, created: Vec<CreatedTask>) -> Self {
        if !created.is_empty() {
            self.created_count = Some(created.len());
            self.tasks = created;
        }
        self
    }

    /// Subtasks created before the failure, alongside [`Self::with_progress`]
    pub fn with_subtasks(mut self, count: usize) -> Self {
        if count > 0 {
            self.subtask_count = Some(count);
        }
        self
    }
}

impl From<&BridgeError> for CommandFailed {
    fn from(err: &BridgeError) -> Self {
        match err {
            BridgeError::Resolution(failure) => Self {
                stage: Some(failure.stage),
                name: Some(failure.name.clone()),
                ..Self::message(failure.to_string())
            },
            other => Self::message(other.to_string()),
        }
    }
}

impl From<BridgeError> for CommandFailed {
    fn from(err: BridgeError) -> Self {
        Self::from(&err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandResponse {
    TaskCreated(TaskCreated),
    TasksCreated(TasksCreated),
    ProjectCreated(ProjectCreated),
    ListCreated(ListCreated),
    ProjectSummary(ProjectSummary),
    Failed(CommandFailed),
}

impl CommandResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        CommandResponse::Failed(CommandFailed::message(error))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CommandResponse::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolutionFailure;
    use serde_json::json;

    #[test]
    fn test_resolution_failure_shape() {
        let err = BridgeError::from(ResolutionFailure::new(Stage::Folder, "Q4 Projects"));
        let body = serde_json::to_value(CommandResponse::Failed((&err).into())).unwrap();
        assert_eq!(
            body,
            json!({
                "error": "Could not find a folder matching 'Q4 Projects'",
                "stage": "folder",
                "name": "Q4 Projects"
            })
        );
    }

    #[test]
    fn test_unknown_command_shape() {
        let body = serde_json::to_value(CommandResponse::failed("Unknown command")).unwrap();
        assert_eq!(body, json!({ "error": "Unknown command" }));
    }

    #[test]
    fn test_partial_progress_shape() {
        let failed = CommandFailed::message("boom").with_progress(vec![CreatedTask {
            id: "t1".into(),
            name: "First".into(),
            url: None,
        }]);
        let body = serde_json::to_value(CommandResponse::Failed(failed)).unwrap();
        assert_eq!(
            body,
            json!({
                "error": "boom",
                "createdCount": 1,
                "tasks": [{ "id": "t1", "name": "First" }]
            })
        );
    }

    #[test]
    fn test_subtask_progress_shape() {
        let failed = CommandFailed::message("boom")
            .with_progress(vec![CreatedTask {
                id: "t1".into(),
                name: "First".into(),
                url: None,
            }])
            .with_subtasks(2);
        let body = serde_json::to_value(CommandResponse::Failed(failed)).unwrap();
        assert_eq!(body["createdCount"], json!(1));
        assert_eq!(body["subtaskCount"], json!(2));

        let none = CommandFailed::message("boom").with_subtasks(0);
        assert_eq!(none.subtask_count, None);
    }
}
