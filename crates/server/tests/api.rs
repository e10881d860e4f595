//! Router-level tests: requests go through the full axum stack against an
//! in-memory store.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use sitework_server::{AppConfig, AppState, build_router};
use sitework_store::Store;

fn app() -> Router {
    app_with(|_| None)
}

/// Router with extra config on top of a fixed JWT secret.
fn app_with(extra: impl Fn(&str) -> Option<String>) -> Router {
    let store = Store::open_in_memory().unwrap();
    let config = AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        _ => extra(key),
    })
    .unwrap();
    build_router(AppState { store, config })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

async fn put(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Sign up and return `(token, user)`.
async fn signup(app: &Router, username: &str, role: &str, company: Option<&str>) -> (String, Value) {
    let mut body = json!({
        "username": username,
        "password": "hunter2abc",
        "email": format!("{username}@example.com"),
        "first_name": "Test",
        "last_name": "User",
        "role": role,
    });
    if let Some(company) = company {
        body["company_name"] = json!(company);
    }
    let (status, resp) = send(app, Method::POST, "/api/auth/signup", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {resp}");
    (
        resp["access_token"].as_str().unwrap().to_string(),
        resp["user"].clone(),
    )
}

/// An owner with a company plus a field manager and an engineer in it.
struct Crew {
    company_id: String,
    owner: String,
    manager: String,
    manager_id: String,
    engineer: String,
    engineer_id: String,
}

async fn crew(app: &Router) -> Crew {
    let (owner, owner_user) = signup(app, "olivia", "Owner", Some("Acme Builders")).await;
    let company_id = owner_user["company_id"].as_str().unwrap().to_string();
    let (manager, manager_user) = signup(app, "fred", "Field Manager", None).await;
    let (engineer, engineer_user) = signup(app, "erin", "Engineer", None).await;

    let members = format!("/api/companies/{company_id}/members");
    for username in ["fred", "erin"] {
        let (status, _) = post(app, &members, &owner, json!({ "username": username })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    Crew {
        company_id,
        owner,
        manager,
        manager_id: manager_user["id"].as_str().unwrap().to_string(),
        engineer,
        engineer_id: engineer_user["id"].as_str().unwrap().to_string(),
    }
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_signup_login_and_me() {
    let app = app();
    let (token, user) = signup(&app, "Olivia", "Owner", Some("Acme Builders")).await;
    assert_eq!(user["username"], "olivia");
    assert!(user["company_id"].is_string());

    let (status, me) = get(&app, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "OLIVIA", "password": "hunter2abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(login["access_token"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "olivia", "password": "wrong-pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid username or password");
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let app = app();
    let (token, _) = signup(&app, "carl", "Engineer", None).await;
    let req = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("sitework_token={token}"))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication required");

    let (status, _) = get(&app, "/api/auth/me", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_and_conflict_errors() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "bob",
            "password": "hunter2abc",
            "email": "not-an-email",
            "first_name": "Bob",
            "last_name": "Builder",
            "role": "Engineer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid email: not a valid email address");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    signup(&app, "bob", "Engineer", None).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "Bob",
            "password": "hunter2abc",
            "email": "bob2@example.com",
            "first_name": "Bob",
            "last_name": "Builder",
            "role": "Engineer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "username already taken");
}

#[tokio::test]
async fn test_role_permissions() {
    let app = app();
    let c = crew(&app).await;

    let (status, body) = post(&app, "/api/projects", &c.engineer, json!({ "name": "Depot" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Engineer role cannot create projects");

    let (status, _) = post(&app, "/api/projects", &c.manager, json!({ "name": "Depot" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, project) = post(
        &app,
        "/api/projects",
        &c.owner,
        json!({ "name": "Depot", "budget": 125000.0, "members": [c.engineer_id] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["company_id"], c.company_id.as_str());
    assert_eq!(project["status"], "Planning");
    let project_id = project["id"].as_str().unwrap();

    let uri = format!("/api/projects/{project_id}");
    let (status, _) = put(&app, &uri, &c.engineer, json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, updated) = put(&app, &uri, &c.manager, json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "In Progress");

    let (status, _) = delete(&app, &uri, &c.manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tenant_isolation() {
    let app = app();
    let c = crew(&app).await;
    let (rival, _) = signup(&app, "rita", "Owner", Some("Rival Construction")).await;

    let (_, project) = post(&app, "/api/projects", &c.owner, json!({ "name": "Tower" })).await;
    let project_id = project["id"].as_str().unwrap();

    let (status, body) = get(&app, &format!("/api/projects/{project_id}"), &rival).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "resource belongs to another company");

    let (status, _) = post(
        &app,
        "/api/tasks",
        &rival,
        json!({ "project_id": project_id, "title": "Sabotage" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app, &format!("/api/companies/{}", c.company_id), &rival).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = get(&app, "/api/projects", &rival).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["projects"], json!([]));
}

#[tokio::test]
async fn test_missing_references() {
    let app = app();
    let c = crew(&app).await;

    let (status, body) = post(
        &app,
        "/api/tasks",
        &c.manager,
        json!({ "project_id": "no-such-project", "title": "Pour slab" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "project not found");

    let (_, project) = post(&app, "/api/projects", &c.owner, json!({ "name": "Bridge" })).await;
    let project_id = project["id"].as_str().unwrap();
    let (status, _) = post(
        &app,
        "/api/tasks",
        &c.manager,
        json!({ "project_id": project_id, "title": "Pour slab", "assigned_to": "ghost" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_site_workflow_and_project_cascade() {
    let app = app();
    let c = crew(&app).await;

    let (_, project) = post(
        &app,
        "/api/projects",
        &c.owner,
        json!({
            "name": "Harbor Warehouse",
            "start_date": "2026-11-01",
            "end_date": "2027-06-30",
            "members": [c.manager_id, c.engineer_id],
        }),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    // Tasks: managers create, engineers move them along.
    let (status, task) = post(
        &app,
        "/api/tasks",
        &c.manager,
        json!({
            "project_id": project_id,
            "title": "Survey site",
            "assigned_to": c.engineer_id,
            "priority": "High",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "To Do");
    let task_uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, task) = put(&app, &task_uri, &c.engineer, json!({ "status": "Done" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "Done");
    let (status, _) = delete(&app, &task_uri, &c.engineer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Blueprints.
    let (status, blueprint) = post(
        &app,
        "/api/blueprints",
        &c.engineer,
        json!({
            "project_id": project_id,
            "title": "Ground floor",
            "file_url": "https://files.example.com/ground-floor.pdf",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(blueprint["version"], 1);
    assert_eq!(blueprint["uploaded_by"], c.engineer_id.as_str());
    let (status, _) = post(
        &app,
        "/api/blueprints",
        &c.engineer,
        json!({ "project_id": project_id, "title": "Roof", "file_url": "ftp://nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Reports with embedded issues.
    let (status, report) = post(
        &app,
        "/api/reports",
        &c.engineer,
        json!({
            "project_id": project_id,
            "title": "Day 1",
            "date": "2026-11-01",
            "weather": "Rain",
            "issues": [{ "description": "Flooded trench", "severity": "High" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["issues"][0]["status"], "Open");
    let report_id = report["id"].as_str().unwrap().to_string();
    let issues_uri = format!("/api/reports/{report_id}/issues");

    let (status, issue) = post(
        &app,
        &issues_uri,
        &c.manager,
        json!({ "description": "Missing rebar delivery", "severity": "Critical" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let issue_uri = format!("{issues_uri}/{}", issue["id"].as_str().unwrap());

    let (status, issue) = put(&app, &issue_uri, &c.engineer, json!({ "status": "Resolved" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issue["status"], "Resolved");
    let (status, _) = delete(&app, &issue_uri, &c.engineer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = delete(&app, &issue_uri, &c.manager).await;
    assert_eq!(status, StatusCode::OK);

    let (_, report) = get(&app, &format!("/api/reports/{report_id}"), &c.owner).await;
    assert_eq!(report["issues"].as_array().unwrap().len(), 1);

    let (_, reports) = get(&app, &format!("/api/projects/{project_id}/reports"), &c.owner).await;
    assert_eq!(reports["reports"].as_array().unwrap().len(), 1);

    // Deleting the project takes every child with it.
    let (status, _) = delete(&app, &format!("/api/projects/{project_id}"), &c.owner).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &task_uri, &c.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, &format!("/api/reports/{report_id}"), &c.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let blueprint_uri = format!("/api/blueprints/{}", blueprint["id"].as_str().unwrap());
    let (status, _) = get(&app, &blueprint_uri, &c.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_company_delete_removes_its_users() {
    let app = app();
    let c = crew(&app).await;
    post(&app, "/api/projects", &c.owner, json!({ "name": "Mall" })).await;

    let company_uri = format!("/api/companies/{}", c.company_id);
    let (status, detail) = get(&app, &company_uri, &c.engineer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["member_count"], 3);
    assert_eq!(detail["project_count"], 1);

    let (status, _) = delete(&app, &company_uri, &c.manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = delete(&app, &company_uri, &c.owner).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/api/auth/me", &c.engineer).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "account no longer exists");
}

#[tokio::test]
async fn test_pages_redirect_and_render() {
    let app = app();

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/login");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "username=paula&password=hunter2abc&email=paula%40example.com&first_name=Paula\
&last_name=Park&phone=&role=Owner&company_name=Park+%26+Sons",
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/dashboard");
    let cookie = resp.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("Welcome, Paula Park"));
    assert!(html.contains("Park &amp; Sons"));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=paula&password=wrongpass1"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_role_cannot_join_another_company() {
    let app = app();
    let c = crew(&app).await;
    let (rogue, rogue_user) = signup(&app, "rogue", "Owner", None).await;

    let members = format!("/api/companies/{}/members", c.company_id);
    let (status, body) = post(&app, &members, &c.owner, json!({ "username": "rogue" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "users with the Owner role cannot join another company"
    );
    let (_, me) = get(&app, "/api/auth/me", &rogue).await;
    assert_eq!(me["id"], rogue_user["id"]);
    assert!(me["company_id"].is_null());

    let (_, project) = post(&app, "/api/projects", &c.owner, json!({ "name": "Pier" })).await;
    let project_uri = format!("/api/projects/{}", project["id"].as_str().unwrap());
    let (status, _) = delete(&app, &project_uri, &rogue).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = get(&app, &project_uri, &c.owner).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_issue_description_keeps_line_breaks() {
    let app = app();
    let c = crew(&app).await;
    let (_, project) = post(&app, "/api/projects", &c.owner, json!({ "name": "Annex" })).await;

    let (status, report) = post(
        &app,
        "/api/reports",
        &c.engineer,
        json!({
            "project_id": project["id"],
            "title": "Day 2",
            "date": "2026-11-02",
            "issues": [{
                "description": "Crack in slab.\nNeeds engineer review.",
                "severity": "Medium",
            }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{report}");
    assert_eq!(
        report["issues"][0]["description"],
        "Crack in slab.\nNeeds engineer review."
    );

    let (status, _) = post(
        &app,
        "/api/reports",
        &c.engineer,
        json!({
            "project_id": project["id"],
            "title": "Day 2\nand 3",
            "date": "2026-11-02",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_profile_and_role_changes() {
    let app = app();
    let c = crew(&app).await;
    let engineer_uri = format!("/api/users/{}", c.engineer_id);

    let promote = json!({ "role": "Field Manager" });
    let (status, body) = put(&app, &engineer_uri, &c.engineer, promote).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only the company owner can change a member's role");

    let (status, body) = put(&app, &engineer_uri, &c.manager, json!({ "first_name": "Eve" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot edit another user's profile");

    let (status, me) = put(&app, &engineer_uri, &c.engineer, json!({ "phone": "555-0100" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["phone"], "555-0100");

    let (status, updated) = put(
        &app,
        &engineer_uri,
        &c.owner,
        json!({ "first_name": "Erin", "role": "Field Manager" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["first_name"], "Erin");
    assert_eq!(updated["role"], "Field Manager");

    let (_, me) = get(&app, "/api/auth/me", &c.engineer).await;
    assert_eq!(me["role"], "Field Manager");
}

#[tokio::test]
async fn test_user_deletion() {
    let app = app();
    let c = crew(&app).await;
    let (_, owner) = get(&app, "/api/auth/me", &c.owner).await;
    let owner_uri = format!("/api/users/{}", owner["id"].as_str().unwrap());

    let (status, body) = delete(&app, &owner_uri, &c.owner).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "user owns a company; delete the company instead");

    let engineer_uri = format!("/api/users/{}", c.engineer_id);
    let (status, _) = delete(&app, &engineer_uri, &c.manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = delete(&app, &engineer_uri, &c.owner).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &engineer_uri, &c.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let manager_uri = format!("/api/users/{}", c.manager_id);
    let (status, _) = delete(&app, &manager_uri, &c.manager).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, "/api/auth/me", &c.manager).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = app();
    let (token, _) = signup(&app, "pete", "Engineer", None).await;

    let (status, body) = put(
        &app,
        "/api/auth/password",
        &token,
        json!({ "current_password": "wrongpass9", "new_password": "newpass123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "current password is incorrect");

    let (status, _) = put(
        &app,
        "/api/auth/password",
        &token,
        json!({ "current_password": "hunter2abc", "new_password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = put(
        &app,
        "/api/auth/password",
        &token,
        json!({ "current_password": "hunter2abc", "new_password": "newpass123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    for (password, expected) in [
        ("newpass123", StatusCode::OK),
        ("hunter2abc", StatusCode::UNAUTHORIZED),
    ] {
        let body = json!({ "username": "pete", "password": password });
        let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(body)).await;
        assert_eq!(status, expected, "login with {password}");
    }
}

#[tokio::test]
async fn test_closed_registration() {
    let app = app_with(|key| (key == "SITEWORK_REGISTRATION").then(|| "closed".to_string()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "nina",
            "password": "hunter2abc",
            "email": "nina@example.com",
            "first_name": "Nina",
            "last_name": "Novak",
            "role": "Engineer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "registration is currently closed");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "username=nina&password=hunter2abc&email=nina%40example.com&first_name=Nina\
&last_name=Novak&phone=&role=Engineer&company_name=",
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("registration is currently closed"));
}
