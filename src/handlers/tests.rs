use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use crate::config::test_config;
use crate::services::Dataset;
use crate::state::AppState;

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    body: Value,
}

fn router() -> Router {
    crate::app(AppState::new(Dataset::sample(), test_config()))
}

async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(String::from);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    Reply { status, cookie, body }
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let reply = send(app, "POST", "/login", None, Some(json!({ "email": email, "password": password }))).await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.cookie.expect("login should set a session cookie")
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .map(|items| items.iter().filter_map(|t| t["id"].as_str().map(String::from)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn health_is_public_and_the_rest_is_not() {
    let app = router();
    assert_eq!(send(&app, "GET", "/health", None, None).await.status, StatusCode::OK);

    let reply = send(&app, "GET", "/tasks", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(reply.body["error"].as_str().is_some());
}

#[tokio::test]
async fn admin_login_and_profile() {
    let app = router();
    let reply = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "admin@devtask.com", "password": "admin123" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["ok"], json!(true));
    assert_eq!(reply.body["user"]["id"], json!("1"));
    assert!(reply.body["user"].get("password").is_none());
    assert_eq!(reply.body["notifications"][0]["title"], json!("Login successful"));

    let cookie = reply.cookie.unwrap();
    let me = send(&app, "GET", "/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["isAdmin"], json!(true));
    assert_eq!(me.body["user"]["email"], json!("admin@devtask.com"));
}

#[tokio::test]
async fn bad_login_is_rejected_with_a_notice() {
    let app = router();
    let reply = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "admin@devtask.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["ok"], json!(false));
    assert!(reply.body["user"].is_null());
    assert_eq!(reply.body["notifications"][0]["severity"], json!("destructive"));
}

#[tokio::test]
async fn signup_then_duplicate_signup() {
    let app = router();
    let form = json!({ "name": "Dana", "email": "dana@devtask.com", "password": "pw", "role": "user" });

    let reply = send(&app, "POST", "/signup", None, Some(form.clone())).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let cookie = reply.cookie.unwrap();
    let me = send(&app, "GET", "/me", Some(&cookie), None).await;
    assert_eq!(me.body["user"]["name"], json!("Dana"));
    assert_eq!(me.body["isAdmin"], json!(false));

    let again = send(&app, "POST", "/signup", None, Some(form)).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["notifications"][0]["message"], json!("Email is already in use"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = router();
    let cookie = login(&app, "john@devtask.com", "john123").await;

    let reply = send(&app, "POST", "/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["notifications"][0]["title"], json!("Logged out"));

    assert_eq!(send(&app, "GET", "/me", Some(&cookie), None).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn assignee_walks_a_task_through_its_lifecycle() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;
    let sarah = login(&app, "sarah@devtask.com", "sarah123").await;

    let early = send(&app, "POST", "/tasks/3/complete", Some(&john), None).await;
    assert_eq!(early.body["applied"], json!(false));
    assert_eq!(early.body["task"]["status"], json!("pending"));

    let approved = send(&app, "POST", "/tasks/3/approve", Some(&john), None).await;
    assert_eq!(approved.body["applied"], json!(true));
    assert_eq!(approved.body["task"]["status"], json!("approved"));
    assert_eq!(approved.body["notifications"].as_array().map(Vec::len), Some(1));

    let other = send(&app, "POST", "/tasks/3/complete", Some(&sarah), None).await;
    assert_eq!(other.body["applied"], json!(false));
    assert!(other.body["notifications"].as_array().is_some_and(|n| n.is_empty()));

    let done = send(&app, "POST", "/tasks/3/complete", Some(&john), None).await;
    assert_eq!(done.body["task"]["status"], json!("completed"));
}

#[tokio::test]
async fn task_list_is_role_scoped_and_filterable() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;
    let admin = login(&app, "admin@devtask.com", "admin123").await;

    let all = send(&app, "GET", "/tasks", Some(&john), None).await;
    assert_eq!(ids(&all.body["tasks"]), vec!["1", "3"]);
    let pending = send(&app, "GET", "/tasks?filter=pending", Some(&john), None).await;
    assert_eq!(ids(&pending.body["tasks"]), vec!["3"]);
    let active = send(&app, "GET", "/tasks?filter=active", Some(&john), None).await;
    assert_eq!(ids(&active.body["tasks"]), vec!["1"]);

    let everything = send(&app, "GET", "/tasks", Some(&admin), None).await;
    assert_eq!(ids(&everything.body["tasks"]).len(), 4);
}

#[tokio::test]
async fn only_admins_manage_tasks() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;
    let admin = login(&app, "admin@devtask.com", "admin123").await;
    let form = json!({ "title": "Docs", "description": "Write the docs", "assignedTo": "unassigned" });

    let denied = send(&app, "POST", "/tasks", Some(&john), Some(form.clone())).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    let denied = send(&app, "DELETE", "/tasks/1", Some(&john), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = send(&app, "POST", "/tasks", Some(&admin), Some(form)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body["task"]["assignedTo"].is_null());
    assert_eq!(created.body["task"]["assignedBy"], json!("1"));
    assert_eq!(created.body["task"]["status"], json!("pending"));
    let id = created.body["task"]["id"].as_str().unwrap().to_string();

    let patched = send(
        &app,
        "PATCH",
        &format!("/tasks/{}", id),
        Some(&admin),
        Some(json!({ "assignedTo": "3", "title": "Docs v2" })),
    )
    .await;
    assert_eq!(patched.body["task"]["assignedTo"], json!("3"));
    assert_eq!(patched.body["task"]["title"], json!("Docs v2"));
    assert_eq!(patched.body["notifications"][0]["title"], json!("Task updated"));

    let deleted = send(&app, "DELETE", &format!("/tasks/{}", id), Some(&admin), None).await;
    assert_eq!(deleted.body["deleted"], json!(true));
    let gone = send(&app, "GET", &format!("/tasks/{}", id), Some(&admin), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tasks_cannot_go_to_admins_or_strangers() {
    let app = router();
    let admin = login(&app, "admin@devtask.com", "admin123").await;
    let form = json!({ "title": "Docs", "description": "Write the docs", "assignedTo": "1" });
    let reply = send(&app, "POST", "/tasks", Some(&admin), Some(form)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let blank = json!({ "title": "  ", "description": "x" });
    let reply = send(&app, "POST", "/tasks", Some(&admin), Some(blank)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edits_keep_assignees_and_assigners_valid() {
    let app = router();
    let admin = login(&app, "admin@devtask.com", "admin123").await;

    let swapped = send(
        &app,
        "PATCH",
        "/tasks/3",
        Some(&admin),
        Some(json!({ "assignedTo": "1", "assignedBy": "2" })),
    )
    .await;
    assert_eq!(swapped.status, StatusCode::BAD_REQUEST);

    let ghost = send(&app, "PATCH", "/tasks/3", Some(&admin), Some(json!({ "assignedTo": "ghost" }))).await;
    assert_eq!(ghost.status, StatusCode::BAD_REQUEST);

    let by_member = send(&app, "PATCH", "/tasks/3", Some(&admin), Some(json!({ "assignedBy": "2" }))).await;
    assert_eq!(by_member.status, StatusCode::BAD_REQUEST);

    let task = send(&app, "GET", "/tasks/3", Some(&admin), None).await;
    assert_eq!(task.body["task"]["assignedTo"], json!("2"));
    assert_eq!(task.body["task"]["assignedBy"], json!("1"));

    let released = send(&app, "PATCH", "/tasks/3", Some(&admin), Some(json!({ "assignedTo": "unassigned" }))).await;
    assert_eq!(released.status, StatusCode::OK);
    assert!(released.body["task"]["assignedTo"].is_null());

    let missing = send(&app, "PATCH", "/tasks/nope", Some(&admin), Some(json!({ "title": "x" }))).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn member_delete_is_forbidden_whether_or_not_the_task_exists() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;

    let existing = send(&app, "DELETE", "/tasks/1", Some(&john), None).await;
    assert_eq!(existing.status, StatusCode::FORBIDDEN);
    let unknown = send(&app, "DELETE", "/tasks/does-not-exist", Some(&john), None).await;
    assert_eq!(unknown.status, StatusCode::FORBIDDEN);
    let patch = send(&app, "PATCH", "/tasks/does-not-exist", Some(&john), Some(json!({ "title": "x" }))).await;
    assert_eq!(patch.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn members_only_see_their_own_tasks() {
    let app = router();
    let sarah = login(&app, "sarah@devtask.com", "sarah123").await;

    assert_eq!(send(&app, "GET", "/tasks/2", Some(&sarah), None).await.status, StatusCode::OK);
    assert_eq!(send(&app, "GET", "/tasks/3", Some(&sarah), None).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unread_count_clears_after_reading() {
    let app = router();
    let admin = login(&app, "admin@devtask.com", "admin123").await;

    let list = send(&app, "GET", "/conversations", Some(&admin), None).await;
    let conversations = list.body["conversations"].as_array().cloned().unwrap_or_default();
    assert_eq!(conversations.len(), 2);
    let with_sarah = conversations
        .iter()
        .find(|c| c["other"]["id"] == json!("3"))
        .unwrap();
    assert_eq!(with_sarah["unread"], json!(1));
    let id = with_sarah["id"].as_str().unwrap().to_string();

    let read = send(&app, "POST", &format!("/conversations/{}/read", id), Some(&admin), None).await;
    assert_eq!(read.body["marked"], json!(1));
    let again = send(&app, "POST", &format!("/conversations/{}/read", id), Some(&admin), None).await;
    assert_eq!(again.body["marked"], json!(0));

    let list = send(&app, "GET", "/conversations", Some(&admin), None).await;
    let unread: Vec<_> = list.body["conversations"]
        .as_array()
        .map(|cs| cs.iter().map(|c| c["unread"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(unread, vec![json!(0), json!(0)]);
}

#[tokio::test]
async fn sending_starts_a_conversation_for_a_new_pair() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;
    let sarah = login(&app, "sarah@devtask.com", "sarah123").await;

    let sent = send(&app, "POST", "/messages", Some(&john), Some(json!({ "receiverId": "3", "content": "hello" }))).await;
    assert_eq!(sent.status, StatusCode::CREATED);
    assert_eq!(sent.body["notifications"][0]["title"], json!("Message sent"));
    send(&app, "POST", "/messages", Some(&sarah), Some(json!({ "receiverId": "2", "content": "hi john" }))).await;

    let list = send(&app, "GET", "/conversations", Some(&sarah), None).await;
    let conversations = list.body["conversations"].as_array().cloned().unwrap_or_default();
    let pair: Vec<_> = conversations.iter().filter(|c| c["other"]["id"] == json!("2")).collect();
    assert_eq!(pair.len(), 1);
    assert_eq!(pair[0]["lastMessage"]["content"], json!("hi john"));

    let id = pair[0]["id"].as_str().unwrap();
    let thread = send(&app, "GET", &format!("/conversations/{}/messages", id), Some(&john), None).await;
    let contents: Vec<_> = thread.body["messages"]
        .as_array()
        .map(|ms| ms.iter().map(|m| m["content"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(contents, vec![json!("hello"), json!("hi john")]);

    let admin = login(&app, "admin@devtask.com", "admin123").await;
    let hidden = send(&app, "GET", &format!("/conversations/{}/messages", id), Some(&admin), None).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_and_misaddressed_messages_are_rejected() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;

    let blank = send(&app, "POST", "/messages", Some(&john), Some(json!({ "receiverId": "1", "content": "   " }))).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    let stranger = send(&app, "POST", "/messages", Some(&john), Some(json!({ "receiverId": "99", "content": "hi" }))).await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_messages_route_by_role() {
    let app = router();
    let sarah = login(&app, "sarah@devtask.com", "sarah123").await;
    let admin = login(&app, "admin@devtask.com", "admin123").await;

    let to_admin = send(&app, "POST", "/tasks/2/messages", Some(&sarah), Some(json!({ "content": "Mockups attached" }))).await;
    assert_eq!(to_admin.status, StatusCode::CREATED);
    assert_eq!(to_admin.body["message"]["receiverId"], json!("1"));

    let to_john = send(&app, "POST", "/tasks/3/messages", Some(&admin), Some(json!({ "content": "Any blockers?" }))).await;
    assert_eq!(to_john.body["message"]["receiverId"], json!("2"));

    let nobody = send(&app, "POST", "/tasks/4/messages", Some(&admin), Some(json!({ "content": "Anyone?" }))).await;
    assert_eq!(nobody.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn member_directory_is_admin_only() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;
    let admin = login(&app, "admin@devtask.com", "admin123").await;

    assert_eq!(send(&app, "GET", "/users", Some(&john), None).await.status, StatusCode::FORBIDDEN);

    let found = send(&app, "GET", "/users?search=SARAH", Some(&admin), None).await;
    assert_eq!(ids(&found.body["users"]), vec!["3"]);

    let user = send(&app, "GET", "/users/2", Some(&john), None).await;
    assert_eq!(user.body["user"]["name"], json!("John Developer"));
    assert_eq!(send(&app, "GET", "/users/42", Some(&john), None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_and_calendar() {
    let app = router();
    let john = login(&app, "john@devtask.com", "john123").await;

    let dashboard = send(&app, "GET", "/dashboard", Some(&john), None).await;
    assert_eq!(dashboard.body["summary"]["total"], json!(2));
    assert_eq!(dashboard.body["summary"]["pending"], json!(1));
    assert_eq!(dashboard.body["summary"]["active"], json!(1));
    assert_eq!(ids(&dashboard.body["pending"]), vec!["3"]);

    let calendar = send(&app, "GET", "/calendar", Some(&john), None).await;
    assert_eq!(ids(&calendar.body["tasks"]), vec!["1", "3"]);
}
