//! ClickUp API client
//!
//! HTTP client for the ClickUp v2 REST API using a static API token.
//! Collections are decoded record by record: a malformed entry is logged and
//! skipped instead of failing the whole response.

use std::time::Duration;

use async_trait::async_trait;
use clickup_types::{Folder, NewList, NewTask, Space, Task, TaskList, TaskPage, User};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::ClickUpApi;
use crate::config::ClickUpConfig;
use crate::error::{BridgeError, Result};

/// Upper bound on task pages read for one list (100 tasks per page)
const MAX_TASK_PAGES: u32 = 50;

pub struct ClickUpClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl ClickUpClient {
    /// Create a client against `base_url` (e.g. `https://api.clickup.com/api/v2`)
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClickUpConfig) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            &config.api_base,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Send an authenticated request and return the decoded JSON body.
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, path, "ClickUp request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(%method, path, error = %e, "ClickUp request failed without a response");
            BridgeError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let payload = body.as_ref().map(Value::to_string).unwrap_or_default();
            let err = BridgeError::api(status, &text, &payload);
            error!(%method, path, "{}", err);
            return Err(err);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| BridgeError::decode(path, e.to_string()))
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    async fn post<B: serde::Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body)).await
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let body = self.get(path).await?;
        decode_collection(path, &body, key)
    }
}

#[derive(Deserialize)]
struct MemberRecord {
    user: User,
}

#[async_trait]
impl ClickUpApi for ClickUpClient {
    async fn spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        self.get_collection(&format!("/team/{}/space", team_id), "spaces")
            .await
    }

    async fn folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        self.get_collection(&format!("/space/{}/folder", space_id), "folders")
            .await
    }

    async fn folder_lists(&self, folder_id: &str) -> Result<Vec<TaskList>> {
        self.get_collection(&format!("/folder/{}/list", folder_id), "lists")
            .await
    }

    async fn space_lists(&self, space_id: &str) -> Result<Vec<TaskList>> {
        self.get_collection(&format!("/space/{}/list", space_id), "lists")
            .await
    }

    async fn members(&self, team_id: &str) -> Result<Vec<User>> {
        let members: Vec<MemberRecord> = self
            .get_collection(&format!("/team/{}/user", team_id), "members")
            .await?;
        Ok(members.into_iter().map(|m| m.user).collect())
    }

    async fn tasks(&self, list_id: &str) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();

        for page in 0..MAX_TASK_PAGES {
            let path = format!("/list/{}/task?page={}&include_closed=true", list_id, page);
            let body = self.get(&path).await?;
            let page_body: TaskPage = serde_json::from_value(body)
                .map_err(|e| BridgeError::decode(&path, e.to_string()))?;

            let fetched = page_body.tasks.len();
            tasks.extend(decode_records::<Task>(&path, &page_body.tasks));

            if fetched == 0 || page_body.last_page.unwrap_or(true) {
                break;
            }
        }

        debug!(list_id, count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    async fn create_task(&self, list_id: &str, task: &NewTask) -> Result<Task> {
        let path = format!("/list/{}/task", list_id);
        let body = self.post(&path, task).await?;
        decode_record(&path, body)
    }

    async fn create_folder_list(&self, folder_id: &str, list: &NewList) -> Result<TaskList> {
        let path = format!("/folder/{}/list", folder_id);
        let body = self.post(&path, list).await?;
        decode_record(&path, body)
    }

    async fn create_space_list(&self, space_id: &str, list: &NewList) -> Result<TaskList> {
        let path = format!("/space/{}/list", space_id);
        let body = self.post(&path, list).await?;
        decode_record(&path, body)
    }
}

/// Pull `body[key]` as an array and decode each element independently.
fn decode_collection<T: DeserializeOwned>(path: &str, body: &Value, key: &str) -> Result<Vec<T>> {
    let items = body
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| BridgeError::decode(path, format!("missing '{}' array", key)))?;
    Ok(decode_records(path, items))
}

fn decode_records<T: DeserializeOwned>(path: &str, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path, index = i, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

fn decode_record<T: DeserializeOwned>(path: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| BridgeError::decode(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_collection_skips_bad_records() {
        let body = json!({
            "spaces": [
                { "id": "1", "name": "Development" },
                { "name": "no id here" },
                { "id": 3 }
            ]
        });
        let spaces: Vec<Space> = decode_collection("/team/9/space", &body, "spaces").unwrap();
        assert_eq!(spaces.len(), 2);
        assert_eq!(spaces[0].name.as_deref(), Some("Development"));
        assert_eq!(spaces[1].id, "3");
        assert_eq!(spaces[1].name, None);
    }

    #[test]
    fn test_decode_collection_requires_key() {
        let body = json!({ "err": "Team not authorized", "ECODE": "OAUTH_027" });
        let err = decode_collection::<Space>("/team/9/space", &body, "spaces").unwrap_err();
        assert!(matches!(err, BridgeError::Decode { .. }));
        assert!(err.to_string().contains("missing 'spaces' array"));
    }

    #[test]
    fn test_member_records_unwrap_user() {
        let body = json!({
            "members": [
                { "user": { "id": 63075093, "username": "farid", "email": "f@x.com" } },
                { "invited_by": {} }
            ]
        });
        let members: Vec<MemberRecord> = decode_collection("/team/9/user", &body, "members").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.id, "63075093");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ClickUpClient::new("pk", "https://api.clickup.com/api/v2/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://api.clickup.com/api/v2");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Nothing listens on the discard port locally.
        let client = ClickUpClient::new("pk", "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.spaces("1").await.unwrap_err();
        assert!(matches!(err, BridgeError::Transport(_)));
    }
}
