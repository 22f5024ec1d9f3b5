//! HTTP-level integration tests for the project and task endpoints.
//!
//! Uses tower::ServiceExt to send requests directly to the router without
//! an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_project, create_task, delete, get, patch_json, post_json, post_raw, put_json,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_project_returns_201_with_zero_tasks() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/projects",
        json!({ "name": "  Launch ", "description": "v1 release" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Launch");
    assert_eq!(json["data"]["task_count"], 0);
    assert!(json["data"]["id"].is_number());
}

#[tokio::test]
async fn blank_project_name_is_validation_error() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/projects",
        json!({ "name": "   ", "description": "v1 release" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().starts_with("name:"));
}

#[tokio::test]
async fn missing_project_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/projects/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id 999 not found");
}

#[tokio::test]
async fn update_and_list_projects() {
    let app = common::build_test_app();
    let first = create_project(&app, "Alpha").await;
    let second = create_project(&app, "Beta").await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/projects/{first}"),
        json!({ "name": "Alpha v2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Alpha v2");
    assert_eq!(json["data"]["description"], "Alpha description");

    let json = body_json(get(app, "/api/v1/projects").await).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first) && ids.contains(&second));
}

// ---------------------------------------------------------------------------
// Launch scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn launch_scenario_orders_and_stats() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;

    let t1 = create_task(
        &app,
        json!({ "title": "Design", "description": "mock UI", "project_id": project }),
    )
    .await;
    let t2 = create_task(
        &app,
        json!({ "title": "Build", "description": "impl", "project_id": project }),
    )
    .await;
    assert_eq!(t1["status"], "To Do");
    assert_eq!(t1["priority"], "Medium");
    assert_eq!(t1["order"], 0);
    assert_eq!(t2["order"], 1);

    let t2_id = t2["id"].as_i64().unwrap();
    let response = patch_json(
        app.clone(),
        &format!("/api/v1/tasks/{t2_id}/status"),
        json!({ "status": "Done" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "Done");

    let stats = body_json(get(app.clone(), &format!("/api/v1/projects/{project}/stats")).await).await;
    assert_eq!(stats["data"]["total_tasks"], 2);
    assert_eq!(stats["data"]["tasks_by_status"]["To Do"], 1);
    assert_eq!(stats["data"]["tasks_by_status"]["In Progress"], 0);
    assert_eq!(stats["data"]["tasks_by_status"]["Done"], 1);
    assert_eq!(stats["data"]["completion_rate"], 50);

    let project_json = body_json(get(app, &format!("/api/v1/projects/{project}")).await).await;
    assert_eq!(project_json["data"]["task_count"], 2);
}

#[tokio::test]
async fn empty_project_stats_and_grouping() {
    let app = common::build_test_app();
    let project = create_project(&app, "Empty").await;

    let stats = body_json(get(app.clone(), &format!("/api/v1/projects/{project}/stats")).await).await;
    assert_eq!(stats["data"]["completion_rate"], 0);

    let grouped = body_json(get(app, &format!("/api/v1/projects/{project}/tasks")).await).await;
    for key in ["To Do", "In Progress", "Done"] {
        assert_eq!(grouped["data"][key], json!([]));
    }
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_moves_task_between_columns() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let t1 = create_task(
        &app,
        json!({ "title": "Design", "description": "mock UI", "project_id": project }),
    )
    .await;
    let t1_id = t1["id"].as_i64().unwrap();

    let response = patch_json(
        app.clone(),
        "/api/v1/tasks/reorder",
        json!({ "tasks": [{ "id": t1_id, "status": "In Progress", "order": 0 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"].as_array().unwrap().len(), 1);
    assert!(json["data"]["failed"].is_null());

    let grouped = body_json(get(app, &format!("/api/v1/projects/{project}/tasks")).await).await;
    assert_eq!(grouped["data"]["To Do"], json!([]));
    assert_eq!(grouped["data"]["In Progress"][0]["id"], t1_id);
    assert_eq!(grouped["data"]["In Progress"][0]["order"], 0);
}

#[tokio::test]
async fn reorder_stops_at_unknown_task() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let a = create_task(
        &app,
        json!({ "title": "A", "description": "a", "project_id": project }),
    )
    .await;
    let b = create_task(
        &app,
        json!({ "title": "B", "description": "b", "project_id": project }),
    )
    .await;
    let (a_id, b_id) = (a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap());

    let response = patch_json(
        app.clone(),
        "/api/v1/tasks/reorder",
        json!({ "tasks": [
            { "id": a_id, "status": "Done", "order": 0 },
            { "id": 4242, "status": "Done", "order": 1 },
            { "id": b_id, "status": "Done", "order": 2 }
        ] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["data"]["updated"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["failed"]["index"], 1);
    assert_eq!(json["data"]["failed"]["id"], 4242);

    let a = body_json(get(app.clone(), &format!("/api/v1/tasks/{a_id}")).await).await;
    let b = body_json(get(app, &format!("/api/v1/tasks/{b_id}")).await).await;
    assert_eq!(a["data"]["status"], "Done");
    assert_eq!(b["data"]["status"], "To Do");
}

#[tokio::test]
async fn reorder_with_invalid_status_applies_nothing() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let a = create_task(
        &app,
        json!({ "title": "A", "description": "a", "project_id": project }),
    )
    .await;
    let a_id = a["id"].as_i64().unwrap();

    let response = patch_json(
        app.clone(),
        "/api/v1/tasks/reorder",
        json!({ "tasks": [
            { "id": a_id, "status": "Done", "order": 0 },
            { "id": a_id, "status": "Archived", "order": 1 }
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATUS");

    let a = body_json(get(app, &format!("/api/v1/tasks/{a_id}")).await).await;
    assert_eq!(a["data"]["status"], "To Do");
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_transition_leaves_task_unchanged() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        json!({ "title": "A", "description": "a", "project_id": project }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = patch_json(
        app.clone(),
        &format!("/api/v1/tasks/{id}/status"),
        json!({ "status": "Blocked", "order": 9 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATUS");
    assert!(json["error"].as_str().unwrap().contains("Blocked"));

    let task = body_json(get(app, &format!("/api/v1/tasks/{id}")).await).await;
    assert_eq!(task["data"]["status"], "To Do");
    assert_eq!(task["data"]["order"], 0);
}

#[tokio::test]
async fn create_task_rejects_bad_references_and_enums() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;

    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "A", "description": "a", "project_id": 777 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project with id 777 not found");

    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "A", "description": "a", "project_id": project, "priority": "Urgent" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "A", "description": "a", "project_id": project, "status": "Later" }),
    )
    .await;
    assert_eq!(body_json(response).await["code"], "INVALID_STATUS");

    let response = post_json(
        app,
        "/api/v1/tasks",
        json!({
            "title": "A",
            "description": "a",
            "project_id": project,
            "tags": ["this tag is far too long to be accepted"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_task_fields_keeps_position() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        json!({
            "title": "Design",
            "description": "mock UI",
            "project_id": project,
            "status": "In Progress",
            "due_date": "2030-01-01T00:00:00Z"
        }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/tasks/{id}"),
        json!({ "title": "Design v2", "priority": "High", "due_date": null, "tags": [" ui "] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Design v2");
    assert_eq!(json["data"]["priority"], "High");
    assert!(json["data"]["due_date"].is_null());
    assert_eq!(json["data"]["tags"], json!(["ui"]));
    assert_eq!(json["data"]["status"], "In Progress");
    assert_eq!(json["data"]["order"], 0);
}

#[tokio::test]
async fn put_with_status_or_order_is_rejected() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        json!({ "title": "A", "description": "a", "project_id": project }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/tasks/{id}"),
        json!({ "status": "Done", "order": 7 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("PATCH /api/v1/tasks/{id}/status"));

    let task = body_json(get(app, &format!("/api/v1/tasks/{id}")).await).await;
    assert_eq!(task["data"]["status"], "To Do");
    assert_eq!(task["data"]["order"], 0);
}

#[tokio::test]
async fn blank_tags_are_rejected() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;

    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "A", "description": "a", "project_id": project, "tags": ["ui", "   "] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("Tags must not be empty"));

    let json = body_json(get(app, &format!("/api/v1/tasks?project_id={project}")).await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn list_tasks_filters() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let other = create_project(&app, "Other").await;
    create_task(
        &app,
        json!({
            "title": "Late",
            "description": "past due",
            "project_id": project,
            "due_date": "2020-01-01T00:00:00Z"
        }),
    )
    .await;
    create_task(
        &app,
        json!({ "title": "Doing", "description": "d", "project_id": project, "status": "In Progress" }),
    )
    .await;
    create_task(
        &app,
        json!({ "title": "Elsewhere", "description": "e", "project_id": other }),
    )
    .await;

    let json = body_json(get(app.clone(), &format!("/api/v1/tasks?project_id={project}")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app.clone(), "/api/v1/tasks?status=In%20Progress").await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Doing"]);

    let json = body_json(get(app.clone(), "/api/v1/tasks?overdue=true").await).await;
    assert_eq!(json["data"][0]["title"], "Late");
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get(app, "/api/v1/tasks?status=Someday").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATUS");
}

#[tokio::test]
async fn task_count_follows_task_deletes() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        json!({ "title": "A", "description": "a", "project_id": project }),
    )
    .await;
    create_task(
        &app,
        json!({ "title": "B", "description": "b", "project_id": project }),
    )
    .await;

    let id = task["id"].as_i64().unwrap();
    let response = delete(app.clone(), &format!("/api/v1/tasks/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app.clone(), &format!("/api/v1/projects/{project}")).await).await;
    assert_eq!(json["data"]["task_count"], 1);

    let response = delete(app, &format!("/api/v1/tasks/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_project_cascades_to_tasks() {
    let app = common::build_test_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        json!({ "title": "A", "description": "a", "project_id": project }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/projects/{project}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/api/v1/tasks/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], format!("Task with id {id} not found"));

    let response = get(app, &format!("/api/v1/projects/{project}/tasks")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Malformed requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_requests_are_bad_request_json() {
    let app = common::build_test_app();

    let response = post_raw(app.clone(), "/api/v1/projects", "{ not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = get(app, "/api/v1/tasks/not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
