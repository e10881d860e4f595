//! Shared API types, input services, crypto, and SQL builders for Sitework.
//!
//! This crate is the single source of truth for request/response shapes. With
//! the `backend` feature it also carries password/JWT crypto, the input
//! validation services, and the sea-query builders used by the store.

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod crypto;
#[cfg(feature = "backend")]
pub mod db;
#[cfg(feature = "backend")]
pub mod service;

// Re-export domain documents for convenience
pub use sitework_core::{
    Blueprint, Company, Issue, IssueSeverity, IssueStatus, Priority, Project, ProjectStatus,
    Report, Role, Task, TaskStatus, User,
};

// ─── Auth ────────────────────────────────────────────────────────────────────

/// `POST /api/auth/signup`. Owners may pass `company_name` to create their
/// company in the same step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned on successful signup / login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Generic success response for operations that don't return data.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// `PUT /api/users/{id}`. Anything not listed here is ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Empty string clears the phone number.
    pub phone: Option<String>,
    /// Only the company owner may change roles.
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
}

// ─── Companies ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `PUT /api/companies/{id}`. Empty strings clear optional fields.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyDetailResponse {
    #[serde(flatten)]
    pub company: Company,
    pub member_count: i64,
    pub project_count: i64,
}

/// Add an existing, unaffiliated user to a company by username.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddCompanyMemberRequest {
    pub username: String,
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Defaults to the requester's company.
    #[serde(default)]
    pub company_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<String>>,
}

/// `PUT /api/projects/{id}`. Empty strings clear optional fields.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub budget: Option<f64>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectMemberRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<Project>,
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// `PUT /api/tasks/{id}`. An empty `assigned_to` unassigns the task.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

// ─── Blueprints ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBlueprintRequest {
    pub project_id: String,
    pub title: String,
    pub file_url: String,
    #[serde(default)]
    pub version: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateBlueprintRequest {
    pub title: Option<String>,
    pub file_url: Option<String>,
    pub version: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBlueprintsResponse {
    pub blueprints: Vec<Blueprint>,
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub project_id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub issues: Vec<CreateIssueRequest>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateReportRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    pub weather: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueRequest {
    pub description: String,
    pub severity: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateIssueRequest {
    pub description: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListReportsResponse {
    pub reports: Vec<Report>,
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Service Error ───────────────────────────────────────────────────────────

/// Framework-agnostic service error.
///
/// Each variant maps to an HTTP status code; the server turns it into the
/// `{"error": "..."}` JSON shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }

    /// Build a closure that wraps a DB/IO error as `Internal`.
    pub fn from_db<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> Self + '_ {
        move |e| Self::Internal(format!("{context}: {e}"))
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ServiceError {}

impl From<sitework_core::ValidationError> for ServiceError {
    fn from(e: sitework_core::ValidationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

/// JSON error shape `{ "error": "..." }` returned by all error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl From<&ServiceError> for ApiError {
    fn from(e: &ServiceError) -> Self {
        Self {
            error: e.message().to_string(),
        }
    }
}
