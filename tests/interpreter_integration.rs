//! End-to-end command tests against the in-memory ClickUp.

mod helpers;

use clickup_bridge::config::{ListContainer, PrdTarget};
use clickup_bridge::CommandResponse;
use clickup_types::Priority;
use helpers::{interpreter, test_config, FakeClickUp};
use serde_json::{json, Value};

fn to_json(response: &CommandResponse) -> Value {
    serde_json::to_value(response).expect("response serializes")
}

// ── create task ─────────────────────────────────────────────────

#[tokio::test]
async fn test_create_task_in_configured_list() {
    let (fake, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let response = interp.process("create task Fix login redirect").await;
    let body = to_json(&response);

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["task"]["id"], json!("new-1"));
    assert_eq!(body["task"]["name"], json!("Fix login redirect"));

    let created = fake.created_tasks();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "task-list");
    assert!(created[0].1.assignees.is_empty());
}

#[tokio::test]
async fn test_create_task_resolves_default_assignee() {
    let mut config = test_config();
    config.assignees.default_assignee_name = Some("Nadia".into());
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    interp.process("create task Review copy").await;

    assert_eq!(fake.created_tasks()[0].1.assignees, vec!["u2"]);
}

#[tokio::test]
async fn test_create_task_falls_back_to_default_assignee_id() {
    let mut config = test_config();
    config.assignees.default_assignee_name = Some("zzz".into());
    config.assignees.default_assignee_id = Some("99".into());
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    interp.process("create task Review copy").await;

    assert_eq!(fake.created_tasks()[0].1.assignees, vec!["99"]);
}

#[tokio::test]
async fn test_create_task_without_target_list() {
    let mut config = test_config();
    config.targets.task_list_id = None;
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    let response = interp.process("create task Orphan").await;

    assert!(response.is_failure());
    let error = to_json(&response)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("No target configured for 'create task'"));
    assert!(fake.created_tasks().is_empty());
}

#[tokio::test]
async fn test_create_task_without_name() {
    let (fake, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let response = interp.process("create task   ").await;

    assert!(response.is_failure());
    assert!(fake.created_tasks().is_empty());
}

// ── bulk creation ───────────────────────────────────────────────

#[tokio::test]
async fn test_bulk_create_cleans_lines() {
    let (fake, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let response = interp
        .process("create tasks\n- Write docs\n2. Review PR\n✅ Deploy\n\n")
        .await;
    let body = to_json(&response);

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["createdCount"], json!(3));
    assert_eq!(body["link"], json!("https://app.clickup.com/team-1/v/l/task-list"));

    let names: Vec<String> = fake
        .created_tasks()
        .into_iter()
        .map(|(_, task)| task.name)
        .collect();
    assert_eq!(names, vec!["Write docs", "Review PR", "Deploy"]);
}

#[tokio::test]
async fn test_bulk_create_prefers_bulk_list() {
    let mut config = test_config();
    config.targets.bulk_list_id = Some("bulk-list".into());
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    interp.process("create task list\n1. One\n2. Two").await;

    assert!(fake
        .created_tasks()
        .iter()
        .all(|(list_id, _)| list_id == "bulk-list"));
}

#[tokio::test]
async fn test_bulk_create_empty_inputs() {
    let (_, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let empty = to_json(&interp.process("create tasks").await);
    assert_eq!(
        empty["error"],
        json!("No tasks provided. Provide newline-separated task names after 'create tasks'.")
    );

    let blank = to_json(&interp.process("create tasks\n- \n*").await);
    assert_eq!(
        blank["error"],
        json!("No valid task names found after parsing input lines.")
    );
}

#[tokio::test]
async fn test_bulk_create_reports_partial_progress() {
    let fake = FakeClickUp {
        fail_create_after: Some(2),
        ..FakeClickUp::workspace()
    };
    let (fake, interp) = interpreter(fake, test_config());

    let body = to_json(&interp.process("create tasks\nA\nB\nC\nD").await);

    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("ClickUp API error 500"));
    assert_eq!(body["createdCount"], json!(2));
    assert_eq!(body["tasks"][1]["name"], json!("B"));
    assert_eq!(fake.created_tasks().len(), 2);
}

// ── update project ──────────────────────────────────────────────

#[tokio::test]
async fn test_update_project_summarises_statuses() {
    let (_, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process("update project website redesign").await);

    assert_eq!(
        body,
        json!({
            "project": "Website Redesign",
            "listId": "l1",
            "total": 4,
            "summary": { "complete": 1, "in progress": 2, "unknown": 1 },
            "link": "https://app.clickup.com/team-1/v/l/l1"
        })
    );
}

#[tokio::test]
async fn test_update_project_tolerates_typos() {
    let (_, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process("update project Websit Redesign").await);

    assert_eq!(body["listId"], json!("l1"));
}

#[tokio::test]
async fn test_update_project_unknown_list() {
    let (_, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process("update project Marketing Plan").await);

    assert_eq!(
        body,
        json!({
            "error": "Could not find a list matching 'Marketing Plan'",
            "stage": "list",
            "name": "Marketing Plan"
        })
    );
}

#[tokio::test]
async fn test_update_project_unknown_folder() {
    let mut config = test_config();
    config.projects.folder_name = Some("Archive".into());
    let (_, interp) = interpreter(FakeClickUp::workspace(), config);

    let body = to_json(&interp.process("update project Website Redesign").await);

    assert_eq!(body["stage"], json!("folder"));
    assert_eq!(body["name"], json!("Archive"));
}

#[tokio::test]
async fn test_update_project_space_fetch_failure_is_no_match() {
    let fake = FakeClickUp {
        failing_reads: vec!["spaces"],
        ..FakeClickUp::workspace()
    };
    let (_, interp) = interpreter(fake, test_config());

    let body = to_json(&interp.process("update project Website Redesign").await);

    assert_eq!(body["stage"], json!("space"));
    assert_eq!(body["name"], json!("Development"));
}

#[tokio::test]
async fn test_update_project_without_folder_searches_space() {
    let mut config = test_config();
    config.projects.folder_name = None;
    let (_, interp) = interpreter(FakeClickUp::workspace(), config);

    let body = to_json(&interp.process("update project backlog").await);

    assert_eq!(body["listId"], json!("l9"));
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn test_update_project_task_fetch_failure() {
    let fake = FakeClickUp {
        failing_reads: vec!["tasks"],
        ..FakeClickUp::workspace()
    };
    let (_, interp) = interpreter(fake, test_config());

    let body = to_json(&interp.process("update project Website Redesign").await);

    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("ClickUp API error 500"));
    assert!(body.get("stage").is_none());
}

// ── PRD export / detailed project ───────────────────────────────

const PRD: &str = r#"{
    "projectName": "Checkout v2",
    "description": "Rebuild checkout",
    "tasks": [
        {
            "name": "Payment form",
            "priority": "urgent",
            "assignee": "nadia@example.com",
            "subtasks": [{ "name": "Validation" }, { "name": "Error states", "assignee": "nobody" }]
        },
        { "name": "Receipts", "tags": ["email"] }
    ]
}"#;

#[tokio::test]
async fn test_export_prd_into_existing_list() {
    let mut config = test_config();
    config.targets.prd = Some(PrdTarget::ExistingList {
        list_id: "prd-list".into(),
    });
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    let body = to_json(&interp.process(&format!("export prd {PRD}")).await);

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["projectName"], json!("Checkout v2"));
    assert_eq!(body["listId"], json!("prd-list"));
    assert_eq!(body["createdCount"], json!(2));
    assert_eq!(body["subtaskCount"], json!(2));
    assert_eq!(body["tasks"][0]["id"], json!("new-1"));
    assert_eq!(body["tasks"][1]["id"], json!("new-4"));

    let created = fake.created_tasks();
    assert_eq!(created.len(), 4);
    assert!(created.iter().all(|(list_id, _)| list_id == "prd-list"));
    assert_eq!(created[0].1.priority, Some(Priority::Urgent));
    assert_eq!(created[1].1.parent.as_deref(), Some("new-1"));
    assert_eq!(created[2].1.parent.as_deref(), Some("new-1"));
    assert_eq!(created[3].1.parent, None);
    assert_eq!(created[3].1.tags, vec!["email"]);
    assert!(fake.created_lists().is_empty());
}

#[tokio::test]
async fn test_export_prd_creates_list_in_container() {
    let (fake, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process(&format!("export prd {PRD}")).await);

    assert_eq!(body["listId"], json!("list-1"));
    let lists = fake.created_lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].0, "folder:proj");
    assert_eq!(lists[0].1.name, "Checkout v2");
    assert_eq!(lists[0].1.content.as_deref(), Some("Rebuild checkout"));
}

#[tokio::test]
async fn test_detailed_project_always_creates_list() {
    let mut config = test_config();
    config.targets.prd = Some(PrdTarget::ExistingList {
        list_id: "prd-list".into(),
    });
    config.targets.project_container = Some(ListContainer::Space { id: "s1".into() });
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    let body = to_json(&interp.process(&format!("create detailed project {PRD}")).await);

    assert_eq!(body["listId"], json!("list-1"));
    assert_eq!(fake.created_lists()[0].0, "space:s1");
    assert!(fake
        .created_tasks()
        .iter()
        .all(|(list_id, _)| list_id == "list-1"));
}

#[tokio::test]
async fn test_prd_assignees_resolved_when_enabled() {
    let mut config = test_config();
    config.assignees.resolve_prd_assignees = true;
    config.assignees.default_assignee_id = Some("99".into());
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    interp.process(&format!("export prd {PRD}")).await;

    let assignees: Vec<Vec<String>> = fake
        .created_tasks()
        .into_iter()
        .map(|(_, task)| task.assignees)
        .collect();
    assert_eq!(assignees[0], vec!["u2"]);
    // no assignee named
    assert_eq!(assignees[1], vec!["99"]);
    // "nobody" matches no member
    assert_eq!(assignees[2], vec!["99"]);
}

#[tokio::test]
async fn test_prd_assignees_ignored_when_disabled() {
    let mut config = test_config();
    config.assignees.default_assignee_id = Some("99".into());
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    interp.process(&format!("export prd {PRD}")).await;

    assert!(fake
        .created_tasks()
        .iter()
        .all(|(_, task)| task.assignees == vec!["99".to_string()]));
}

#[tokio::test]
async fn test_prd_partial_progress() {
    let fake = FakeClickUp {
        fail_create_after: Some(1),
        ..FakeClickUp::workspace()
    };
    let (_, interp) = interpreter(fake, test_config());

    let body = to_json(&interp.process(&format!("export prd {PRD}")).await);

    assert_eq!(body["createdCount"], json!(1));
    assert_eq!(body["tasks"][0]["name"], json!("Payment form"));
    assert!(body.get("subtaskCount").is_none());
}

#[tokio::test]
async fn test_prd_partial_progress_counts_subtasks() {
    let fake = FakeClickUp {
        fail_create_after: Some(2),
        ..FakeClickUp::workspace()
    };
    let (fake, interp) = interpreter(fake, test_config());

    let body = to_json(&interp.process(&format!("export prd {PRD}")).await);

    // parent + "Validation" made it, "Error states" failed
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("ClickUp API error 500"));
    assert_eq!(body["createdCount"], json!(1));
    assert_eq!(body["subtaskCount"], json!(1));
    assert_eq!(fake.created_tasks().len(), 2);
}

#[tokio::test]
async fn test_prd_invalid_json() {
    let (fake, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process("export prd {not json").await);

    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON payload"));
    assert!(fake.created_lists().is_empty());
    assert!(fake.created_tasks().is_empty());
}

// ── create list / unknown ───────────────────────────────────────

#[tokio::test]
async fn test_create_list_in_folder() {
    let (fake, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process("create list Sprint 12").await);

    assert_eq!(
        body,
        json!({
            "success": true,
            "list": { "id": "list-1", "name": "Sprint 12" },
            "link": "https://app.clickup.com/team-1/v/l/list-1"
        })
    );
    assert_eq!(fake.created_lists()[0].0, "folder:proj");
}

#[tokio::test]
async fn test_create_list_without_container() {
    let mut config = test_config();
    config.targets.project_container = None;
    let (fake, interp) = interpreter(FakeClickUp::workspace(), config);

    let response = interp.process("create list Sprint 12").await;

    assert!(response.is_failure());
    assert!(fake.created_lists().is_empty());
}

#[tokio::test]
async fn test_unknown_command() {
    let (_, interp) = interpreter(FakeClickUp::workspace(), test_config());

    let body = to_json(&interp.process("delete everything").await);

    assert_eq!(body, json!({ "error": "Unknown command" }));
}
