//! Text command parsing
//!
//! Commands are recognised by a case-insensitive prefix on the left-trimmed
//! message. A prefix only counts at a word boundary, so `create taskforce`
//! is not `create task`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create task <name>`
    CreateTask { name: String },
    /// `create tasks` / `create task list`, one task per line
    BulkCreateTasks { block: String },
    /// `export prd <json>`
    ExportPrd { payload: String },
    /// `create detailed project <json>`
    CreateDetailedProject { payload: String },
    /// `create list <name>`
    CreateList { name: String },
    /// `update project <name>`
    UpdateProject { name: String },
    Unknown,
}

impl Command {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Command::CreateTask { .. } => "create_task",
            Command::BulkCreateTasks { .. } => "bulk_create_tasks",
            Command::ExportPrd { .. } => "export_prd",
            Command::CreateDetailedProject { .. } => "create_detailed_project",
            Command::CreateList { .. } => "create_list",
            Command::UpdateProject { .. } => "update_project",
            Command::Unknown => "unknown",
        }
    }
}

/// Checked in order; longer prefixes that share a stem come first.
const BULK_PREFIXES: &[&str] = &["create tasks", "create task list"];
const CREATE_TASK: &str = "create task";
const EXPORT_PRD: &str = "export prd";
const CREATE_DETAILED_PROJECT: &str = "create detailed project";
const CREATE_LIST: &str = "create list";
const UPDATE_PROJECT: &str = "update project";

pub fn parse_command(message: &str) -> Command {
    let message = message.trim_start();

    for prefix in BULK_PREFIXES {
        if let Some(rest) = strip_prefix_ci(message, prefix) {
            return Command::BulkCreateTasks {
                block: rest.trim().to_string(),
            };
        }
    }
    if let Some(rest) = strip_prefix_ci(message, CREATE_TASK) {
        return Command::CreateTask {
            name: rest.trim().to_string(),
        };
    }
    if let Some(rest) = strip_prefix_ci(message, EXPORT_PRD) {
        return Command::ExportPrd {
            payload: rest.trim().to_string(),
        };
    }
    if let Some(rest) = strip_prefix_ci(message, CREATE_DETAILED_PROJECT) {
        return Command::CreateDetailedProject {
            payload: rest.trim().to_string(),
        };
    }
    if let Some(rest) = strip_prefix_ci(message, CREATE_LIST) {
        return Command::CreateList {
            name: rest.trim().to_string(),
        };
    }
    if let Some(rest) = strip_prefix_ci(message, UPDATE_PROJECT) {
        return Command::UpdateProject {
            name: rest.trim().to_string(),
        };
    }

    Command::Unknown
}

/// Strip `prefix` (ASCII case-insensitive) when it ends on a word boundary.
fn strip_prefix_ci<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let head = message.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &message[prefix.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(rest),
    }
}
