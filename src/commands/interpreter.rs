//! Command interpreter
//!
//! Runs one parsed command to completion. Every remote call is awaited in
//! sequence, including per-item work in bulk commands, so a failure stops
//! the run and reports what was created before it.

use std::collections::BTreeMap;
use std::sync::Arc;

use clickup_types::{NewList, NewTask, TaskList};
use tracing::{debug, error, info, warn};

use super::bulk::parse_task_lines;
use super::parser::{parse_command, Command};
use super::prd::{parse_prd, PrdDocument};
use super::response::{
    CommandFailed, CommandResponse, CreatedList, CreatedTask, ListCreated, ProjectCreated,
    ProjectSummary, TaskCreated, TasksCreated,
};
use crate::clickup::ClickUpApi;
use crate::config::{BridgeConfig, ListContainer, PrdTarget};
use crate::error::{BridgeError, Result};
use crate::resolver::{DirectoryResolver, ListPath};

type Outcome = std::result::Result<CommandResponse, CommandFailed>;

pub struct CommandInterpreter {
    api: Arc<dyn ClickUpApi>,
    config: Arc<BridgeConfig>,
}

impl CommandInterpreter {
    pub fn new(api: Arc<dyn ClickUpApi>, config: Arc<BridgeConfig>) -> Self {
        Self { api, config }
    }

    /// Parse and run a chat message. Failures come back as
    /// [`CommandResponse::Failed`], never as an `Err`.
    pub async fn process(&self, message: &str) -> CommandResponse {
        let command = parse_command(message);
        let kind = command.kind();
        info!(command = kind, "Processing chat command");

        match self.execute(command).await {
            Ok(response) => response,
            Err(failed) => {
                error!(command = kind, error = %failed.error, "Command failed");
                CommandResponse::Failed(failed)
            }
        }
    }

    async fn execute(&self, command: Command) -> Outcome {
        match command {
            Command::CreateTask { name } => self.create_task(&name).await,
            Command::BulkCreateTasks { block } => self.bulk_create_tasks(&block).await,
            Command::ExportPrd { payload } => self.export_prd(&payload).await,
            Command::CreateDetailedProject { payload } => {
                self.create_detailed_project(&payload).await
            }
            Command::CreateList { name } => self.create_list(&name).await,
            Command::UpdateProject { name } => self.update_project(&name).await,
            Command::Unknown => Ok(CommandResponse::failed("Unknown command")),
        }
    }

    fn resolver(&self) -> DirectoryResolver<'_> {
        DirectoryResolver::new(self.api.as_ref(), self.config.matching.threshold)
    }

    fn team_id(&self) -> &str {
        &self.config.clickup.team_id
    }

    // ------------------------------------------------------------------
    // create task
    // ------------------------------------------------------------------

    async fn create_task(&self, name: &str) -> Outcome {
        if name.is_empty() {
            return Err(CommandFailed::message(
                "No task name provided. Use 'create task <name>'.",
            ));
        }
        let list_id = self
            .config
            .targets
            .task_list_id
            .as_deref()
            .ok_or(BridgeError::MissingTarget("'create task' (set BRIDGE_TASK_LIST_ID)"))?;

        let payload = NewTask {
            name: name.to_string(),
            assignees: self.default_assignees().await,
            ..Default::default()
        };
        debug!(list_id, payload = ?payload, "Creating task");

        let task = self.api.create_task(list_id, &payload).await?;
        info!(task_id = %task.id, list_id, "Created task");

        Ok(CommandResponse::TaskCreated(TaskCreated {
            success: true,
            task,
        }))
    }

    // ------------------------------------------------------------------
    // create tasks / create task list
    // ------------------------------------------------------------------

    async fn bulk_create_tasks(&self, block: &str) -> Outcome {
        if block.is_empty() {
            return Err(CommandFailed::message(
                "No tasks provided. Provide newline-separated task names after 'create tasks'.",
            ));
        }
        let names = parse_task_lines(block);
        if names.is_empty() {
            return Err(CommandFailed::message(
                "No valid task names found after parsing input lines.",
            ));
        }
        let list_id = self
            .config
            .targets
            .bulk_list_id()
            .ok_or(BridgeError::MissingTarget("'create tasks' (set BRIDGE_BULK_LIST_ID)"))?;

        let mut created = Vec::with_capacity(names.len());
        for name in &names {
            match self.api.create_task(list_id, &NewTask::named(name)).await {
                Ok(task) => created.push(CreatedTask::from(&task)),
                Err(e) => return Err(CommandFailed::from(&e).with_progress(created)),
            }
        }
        info!(list_id, count = created.len(), "Bulk-created tasks");

        Ok(CommandResponse::TasksCreated(TasksCreated {
            success: true,
            created_count: created.len(),
            tasks: created,
            link: self.config.clickup.list_link(list_id),
        }))
    }

    // ------------------------------------------------------------------
    // export prd / create detailed project
    // ------------------------------------------------------------------

    async fn export_prd(&self, payload: &str) -> Outcome {
        let doc = parse_prd(payload)?;
        let target = self.config.targets.prd_target().ok_or(BridgeError::MissingTarget(
            "'export prd' (set BRIDGE_PRD_LIST_ID or BRIDGE_PROJECT_FOLDER_ID)",
        ))?;

        let list_id = match target {
            PrdTarget::ExistingList { list_id } => list_id,
            PrdTarget::NewList => self.create_project_list(&doc).await?.id,
        };

        self.create_prd_tasks(&doc, &list_id).await
    }

    async fn create_detailed_project(&self, payload: &str) -> Outcome {
        let doc = parse_prd(payload)?;
        let list = self.create_project_list(&doc).await?;
        self.create_prd_tasks(&doc, &list.id).await
    }

    async fn create_project_list(&self, doc: &PrdDocument) -> Result<TaskList> {
        let list = NewList {
            name: doc.project_name.trim().to_string(),
            content: doc.description.clone(),
        };
        self.create_list_in_container(&list).await
    }

    async fn create_prd_tasks(&self, doc: &PrdDocument, list_id: &str) -> Outcome {
        let defaults = self.default_assignees().await;
        let mut created = Vec::with_capacity(doc.tasks.len());
        let mut subtask_count = 0;

        for task in &doc.tasks {
            let assignees = self.prd_assignees(task.assignee.as_deref(), &defaults).await;
            let parent = match self.api.create_task(list_id, &task.to_new_task(assignees)).await {
                Ok(parent) => parent,
                Err(e) => {
                    return Err(CommandFailed::from(&e)
                        .with_progress(created)
                        .with_subtasks(subtask_count))
                }
            };
            created.push(CreatedTask::from(&parent));

            for subtask in &task.subtasks {
                let assignees = self
                    .prd_assignees(subtask.assignee.as_deref(), &defaults)
                    .await;
                let payload = subtask.to_new_task(&parent.id, assignees);
                if let Err(e) = self.api.create_task(list_id, &payload).await {
                    return Err(CommandFailed::from(&e)
                        .with_progress(created)
                        .with_subtasks(subtask_count));
                }
                subtask_count += 1;
            }
        }
        info!(
            project = %doc.project_name,
            list_id,
            tasks = created.len(),
            subtasks = subtask_count,
            "Created project tasks"
        );

        Ok(CommandResponse::ProjectCreated(ProjectCreated {
            success: true,
            project_name: doc.project_name.clone(),
            list_id: list_id.to_string(),
            created_count: created.len(),
            subtask_count,
            tasks: created,
            link: self.config.clickup.list_link(list_id),
        }))
    }

    // ------------------------------------------------------------------
    // create list
    // ------------------------------------------------------------------

    async fn create_list(&self, name: &str) -> Outcome {
        if name.is_empty() {
            return Err(CommandFailed::message(
                "No list name provided. Use 'create list <name>'.",
            ));
        }
        let list = self
            .create_list_in_container(&NewList {
                name: name.to_string(),
                content: None,
            })
            .await?;
        info!(list_id = %list.id, "Created list");

        Ok(CommandResponse::ListCreated(ListCreated {
            success: true,
            link: self.config.clickup.list_link(&list.id),
            list: CreatedList::from(&list),
        }))
    }

    async fn create_list_in_container(&self, list: &NewList) -> Result<TaskList> {
        match &self.config.targets.project_container {
            Some(ListContainer::Folder { id }) => self.api.create_folder_list(id, list).await,
            Some(ListContainer::Space { id }) => self.api.create_space_list(id, list).await,
            None => Err(BridgeError::MissingTarget(
                "new lists (set BRIDGE_PROJECT_FOLDER_ID or BRIDGE_PROJECT_SPACE_ID)",
            )),
        }
    }

    // ------------------------------------------------------------------
    // update project
    // ------------------------------------------------------------------

    async fn update_project(&self, name: &str) -> Outcome {
        if name.is_empty() {
            return Err(CommandFailed::message(
                "No project name provided. Use 'update project <name>'.",
            ));
        }
        let path = ListPath {
            space: self.config.projects.space_name.clone(),
            folder: self.config.projects.folder_name.clone(),
            list: name.to_string(),
        };
        let resolved = self
            .resolver()
            .resolve_list_path(self.team_id(), &path)
            .await
            .map_err(BridgeError::from)?;

        let tasks = self.api.tasks(&resolved.list.id).await?;
        let mut summary: BTreeMap<String, usize> = BTreeMap::new();
        for task in &tasks {
            *summary.entry(task.status_label()).or_default() += 1;
        }

        Ok(CommandResponse::ProjectSummary(ProjectSummary {
            project: resolved.list.label().to_string(),
            total: tasks.len(),
            summary,
            link: self.config.clickup.list_link(&resolved.list.id),
            list_id: resolved.list.id,
        }))
    }

    // ------------------------------------------------------------------
    // assignees
    // ------------------------------------------------------------------

    /// Configured default assignee: a resolvable name first, then the
    /// fixed id, otherwise nobody.
    async fn default_assignees(&self) -> Vec<String> {
        let assignees = &self.config.assignees;
        if let Some(name) = assignees.default_assignee_name.as_deref() {
            if let Some(user) = self.resolver().user(self.team_id(), name).await {
                return vec![user.id];
            }
            warn!(name, "Default assignee not found, using fallback id");
        }
        assignees.default_assignee_id.iter().cloned().collect()
    }

    /// Per-task assignee for PRD payloads. Unresolvable names fall back to
    /// `defaults`.
    async fn prd_assignees(&self, named: Option<&str>, defaults: &[String]) -> Vec<String> {
        let named = named.map(str::trim).filter(|n| !n.is_empty());
        match named {
            Some(name) if self.config.assignees.resolve_prd_assignees => {
                match self.resolver().user(self.team_id(), name).await {
                    Some(user) => vec![user.id],
                    None => {
                        warn!(name, "PRD assignee not found, using default");
                        defaults.to_vec()
                    }
                }
            }
            _ => defaults.to_vec(),
        }
    }
}
