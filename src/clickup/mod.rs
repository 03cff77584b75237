//! ClickUp integration
//!
//! [`ClickUpApi`] is the seam the resolver and interpreter depend on;
//! [`ClickUpClient`] is the reqwest implementation. Tests substitute an
//! in-memory implementation.

pub mod client;

use async_trait::async_trait;
use clickup_types::{Folder, NewList, NewTask, Space, Task, TaskList, User};

use crate::error::Result;

pub use client::ClickUpClient;

#[async_trait]
pub trait ClickUpApi: Send + Sync {
    /// Spaces under a team (workspace)
    async fn spaces(&self, team_id: &str) -> Result<Vec<Space>>;

    /// Folders under a space
    async fn folders(&self, space_id: &str) -> Result<Vec<Folder>>;

    /// Lists inside a folder
    async fn folder_lists(&self, folder_id: &str) -> Result<Vec<TaskList>>;

    /// Folderless lists directly under a space
    async fn space_lists(&self, space_id: &str) -> Result<Vec<TaskList>>;

    /// Workspace members
    async fn members(&self, team_id: &str) -> Result<Vec<User>>;

    /// Every task in a list, closed ones included
    async fn tasks(&self, list_id: &str) -> Result<Vec<Task>>;

    async fn create_task(&self, list_id: &str, task: &NewTask) -> Result<Task>;

    async fn create_folder_list(&self, folder_id: &str, list: &NewList) -> Result<TaskList>;

    async fn create_space_list(&self, space_id: &str, list: &NewList) -> Result<TaskList>;
}
