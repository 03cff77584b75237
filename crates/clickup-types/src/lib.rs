//! ClickUp data contracts
//!
//! Typed records for the subset of the ClickUp v2 API the bridge touches.
//! Every response is decoded into these shapes at the HTTP boundary, so the
//! resolver and the command layer never see raw JSON.
//!
//! ## Rules
//!
//! 1. Ids are strings. ClickUp sends user ids as integers and everything else
//!    as strings; both decode into `String`.
//! 2. Names are optional on directory records. A record without a name is
//!    still a valid record, it just never wins a name match.
//! 3. Outbound payloads skip absent fields instead of sending `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// ID HELPERS
// ============================================================================

/// Deserialize a ClickUp id sent either as a string or as an integer.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct IdVisitor;

    impl<'de> de::Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "deserialize_id")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}

/// Numeric ids go out as JSON numbers, which is what ClickUp expects for
/// assignees. Anything else is sent verbatim.
#[allow(clippy::ptr_arg)]
fn serialize_ids<S>(ids: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(ids.len()))?;
    for id in ids {
        match id.parse::<u64>() {
            Ok(n) => seq.serialize_element(&n)?,
            Err(_) => seq.serialize_element(id)?,
        }
    }
    seq.end()
}

// ============================================================================
// DIRECTORY RECORDS
// ============================================================================

/// A workspace space (`GET /team/{team_id}/space`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A folder inside a space (`GET /space/{space_id}/folder`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A list, either inside a folder or directly under a space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A workspace member as returned under `members[].user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ============================================================================
// TASKS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<String>,
}

impl Task {
    /// Lower-cased status label, `"unknown"` when ClickUp omitted it.
    pub fn status_label(&self) -> String {
        self.status
            .as_ref()
            .map(|s| s.status.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// One page of `GET /list/{list_id}/task`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPage {
    /// Raw records, decoded one by one so a bad task cannot sink the page
    pub tasks: Vec<serde_json::Value>,
    #[serde(default)]
    pub last_page: Option<bool>,
}

// ============================================================================
// OUTBOUND PAYLOADS
// ============================================================================

/// ClickUp task priority. Lower numbers are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Map a free-text label. Unknown labels fall back to `Normal`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "urgent" => Priority::Urgent,
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Normal,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Priority::Urgent => 1,
            Priority::High => 2,
            Priority::Normal => 3,
            Priority::Low => 4,
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Body of `POST /list/{list_id}/task`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_ids"
    )]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Unix epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl NewTask {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Body of `POST /folder/{folder_id}/list` and `POST /space/{space_id}/list`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewList {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ============================================================================
// NAMED ENTITY
// ============================================================================

/// The normalized `{id, name}` shape every directory record is reduced to
/// before name matching. `email` is only populated for users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NamedEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Display name, falling back to the id for nameless records.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl From<&Space> for NamedEntity {
    fn from(space: &Space) -> Self {
        Self {
            id: space.id.clone(),
            name: space.name.clone(),
            email: None,
        }
    }
}

impl From<&Folder> for NamedEntity {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.clone(),
            name: folder.name.clone(),
            email: None,
        }
    }
}

impl From<&TaskList> for NamedEntity {
    fn from(list: &TaskList) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone(),
            email: None,
        }
    }
}

impl From<&User> for NamedEntity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
