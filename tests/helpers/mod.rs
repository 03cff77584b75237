//! In-memory ClickUp used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clickup_bridge::config::{BridgeConfig, ListContainer};
use clickup_bridge::{BridgeError, ClickUpApi, CommandInterpreter, Result};
use clickup_types::{Folder, NewList, NewTask, Space, Task, TaskList, TaskStatus, User};

pub const TEAM_ID: &str = "team-1";

/// Directory contents plus a record of every write.
#[derive(Default)]
pub struct FakeClickUp {
    pub spaces: Vec<Space>,
    pub folders: HashMap<String, Vec<Folder>>,
    pub folder_lists: HashMap<String, Vec<TaskList>>,
    pub space_lists: HashMap<String, Vec<TaskList>>,
    pub members: Vec<User>,
    pub tasks: HashMap<String, Vec<Task>>,

    /// Listing endpoints that answer with an API error
    pub failing_reads: Vec<&'static str>,
    /// Task creation fails once this many tasks have been created
    pub fail_create_after: Option<usize>,

    pub created_tasks: Mutex<Vec<(String, NewTask)>>,
    pub created_lists: Mutex<Vec<(String, NewList)>>,
}

pub fn space(id: &str, name: &str) -> Space {
    Space {
        id: id.to_string(),
        name: Some(name.to_string()),
    }
}

pub fn folder(id: &str, name: &str) -> Folder {
    Folder {
        id: id.to_string(),
        name: Some(name.to_string()),
    }
}

pub fn list(id: &str, name: &str) -> TaskList {
    TaskList {
        id: id.to_string(),
        name: Some(name.to_string()),
    }
}

pub fn user(id: &str, username: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        username: Some(username.to_string()),
        email: Some(email.to_string()),
    }
}

pub fn task(id: &str, name: &str, status: Option<&str>) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        url: None,
        status: status.map(|s| TaskStatus {
            status: s.to_string(),
        }),
        parent: None,
    }
}

impl FakeClickUp {
    /// Development / Q4 Projects / Website Redesign, plus two members.
    pub fn workspace() -> Self {
        let mut fake = FakeClickUp {
            spaces: vec![space("s1", "Development"), space("s2", "Marketing")],
            members: vec![
                user("u1", "farid", "f@x.com"),
                user("u2", "nadia", "nadia@example.com"),
            ],
            ..Default::default()
        };
        fake.folders.insert(
            "s1".into(),
            vec![folder("f1", "Q3 Projects"), folder("f2", "Q4 Projects")],
        );
        fake.folder_lists.insert(
            "f2".into(),
            vec![list("l1", "Website Redesign"), list("l2", "Mobile App")],
        );
        fake.space_lists
            .insert("s1".into(), vec![list("l9", "Backlog")]);
        fake.tasks.insert(
            "l1".into(),
            vec![
                task("t1", "Wireframes", Some("Complete")),
                task("t2", "Copy", Some("in progress")),
                task("t3", "Images", Some("In Progress")),
                task("t4", "QA", None),
            ],
        );
        fake
    }

    pub fn created_tasks(&self) -> Vec<(String, NewTask)> {
        self.created_tasks.lock().unwrap().clone()
    }

    pub fn created_lists(&self) -> Vec<(String, NewList)> {
        self.created_lists.lock().unwrap().clone()
    }

    fn read<T: Clone>(&self, endpoint: &'static str, items: Option<&Vec<T>>) -> Result<Vec<T>> {
        if self.failing_reads.contains(&endpoint) {
            return Err(api_error(endpoint));
        }
        Ok(items.cloned().unwrap_or_default())
    }
}

fn api_error(payload: &str) -> BridgeError {
    BridgeError::api(
        reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"err":"boom"}"#,
        payload,
    )
}

#[async_trait]
impl ClickUpApi for FakeClickUp {
    async fn spaces(&self, _team_id: &str) -> Result<Vec<Space>> {
        self.read("spaces", Some(&self.spaces))
    }

    async fn folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        self.read("folders", self.folders.get(space_id))
    }

    async fn folder_lists(&self, folder_id: &str) -> Result<Vec<TaskList>> {
        self.read("folder_lists", self.folder_lists.get(folder_id))
    }

    async fn space_lists(&self, space_id: &str) -> Result<Vec<TaskList>> {
        self.read("space_lists", self.space_lists.get(space_id))
    }

    async fn members(&self, _team_id: &str) -> Result<Vec<User>> {
        self.read("members", Some(&self.members))
    }

    async fn tasks(&self, list_id: &str) -> Result<Vec<Task>> {
        self.read("tasks", self.tasks.get(list_id))
    }

    async fn create_task(&self, list_id: &str, new_task: &NewTask) -> Result<Task> {
        let mut created = self.created_tasks.lock().unwrap();
        if self.fail_create_after == Some(created.len()) {
            return Err(api_error(&new_task.name));
        }
        created.push((list_id.to_string(), new_task.clone()));
        let id = format!("new-{}", created.len());
        Ok(Task {
            url: Some(format!("https://app.clickup.com/t/{id}")),
            parent: new_task.parent.clone(),
            ..task(&id, &new_task.name, Some("to do"))
        })
    }

    async fn create_folder_list(&self, folder_id: &str, new_list: &NewList) -> Result<TaskList> {
        let mut created = self.created_lists.lock().unwrap();
        created.push((format!("folder:{folder_id}"), new_list.clone()));
        Ok(list(&format!("list-{}", created.len()), &new_list.name))
    }

    async fn create_space_list(&self, space_id: &str, new_list: &NewList) -> Result<TaskList> {
        let mut created = self.created_lists.lock().unwrap();
        created.push((format!("space:{space_id}"), new_list.clone()));
        Ok(list(&format!("list-{}", created.len()), &new_list.name))
    }
}

/// Valid config with a task list and a project folder configured.
pub fn test_config() -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.clickup.api_key = "pk_test".into();
    config.clickup.team_id = TEAM_ID.into();
    config.targets.task_list_id = Some("task-list".into());
    config.targets.project_container = Some(ListContainer::Folder { id: "proj".into() });
    config
}

pub fn interpreter(fake: FakeClickUp, config: BridgeConfig) -> (Arc<FakeClickUp>, CommandInterpreter) {
    let fake = Arc::new(fake);
    let api: Arc<dyn ClickUpApi> = fake.clone();
    (fake, CommandInterpreter::new(api, Arc::new(config)))
}
