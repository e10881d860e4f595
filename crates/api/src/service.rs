//! Shared business logic: framework-agnostic pure functions.
//!
//! Request bodies come in as loosely typed wire structs; these functions
//! allow-list, normalize and validate them into the `New*` / `*Patch` inputs
//! the store accepts. Route handlers stay thin adapters.

use std::str::FromStr;

use chrono::NaiveDate;
use sitework_core::validate::{self, ISSUE_MAX_LEN, TITLE_MAX_LEN, ValidationError};
use sitework_core::{
    BlueprintPatch, CompanyPatch, IssuePatch, NewBlueprint, NewCompany, NewIssue, NewProject,
    NewReport, NewTask, NewUser, ProjectPatch, ReportPatch, Role, TaskPatch, User, UserPatch,
};

use crate::{
    AuthResponse, CreateBlueprintRequest, CreateCompanyRequest, CreateIssueRequest,
    CreateProjectRequest, CreateReportRequest, CreateTaskRequest, ServiceError, SignupRequest,
    UpdateBlueprintRequest, UpdateCompanyRequest, UpdateIssueRequest, UpdateProjectRequest,
    UpdateReportRequest, UpdateTaskRequest, UpdateUserRequest,
};

// ─── Field helpers ──────────────────────────────────────────────────────────

fn parse_enum<T>(value: Option<&str>) -> Result<Option<T>, ServiceError>
where
    T: FromStr<Err = ValidationError>,
{
    value.map(|v| v.trim().parse::<T>()).transpose().map_err(Into::into)
}

/// Optional text on create: blank means absent.
fn optional_text(field: &str, value: Option<&str>) -> Result<Option<String>, ServiceError> {
    match value {
        Some(v) => Ok(validate::normalize_text(field, v)?),
        None => Ok(None),
    }
}

/// Optional text on update: absent leaves the field alone, blank clears it.
fn patch_text(field: &str, value: Option<&str>) -> Result<Option<Option<String>>, ServiceError> {
    value
        .map(|v| validate::normalize_text(field, v))
        .transpose()
        .map_err(Into::into)
}

fn optional_with<F>(value: Option<&str>, check: F) -> Result<Option<String>, ServiceError>
where
    F: FnOnce(&str) -> Result<String, ValidationError>,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(Some(check(v)?)),
        None => Ok(None),
    }
}

fn patch_with<F>(value: Option<&str>, check: F) -> Result<Option<Option<String>>, ServiceError>
where
    F: FnOnce(&str) -> Result<String, ValidationError>,
{
    match value {
        None => Ok(None),
        Some(v) => optional_with(Some(v), check).map(Some),
    }
}

fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ServiceError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(Some(validate::parse_date(field, v)?)),
        None => Ok(None),
    }
}

fn patch_date(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Option<NaiveDate>>, ServiceError> {
    match value {
        None => Ok(None),
        Some(v) => optional_date(field, Some(v)).map(Some),
    }
}

fn optional_id(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_id(field: &str, value: &str) -> Result<String, ServiceError> {
    optional_id(Some(value)).ok_or_else(|| {
        ValidationError::MissingField {
            field: field.to_string(),
        }
        .into()
    })
}

// ─── Auth ───────────────────────────────────────────────────────────────────

/// Validated signup: the user to create and, for owners, the company to found.
#[derive(Debug)]
pub struct Signup {
    pub user: NewUser,
    pub company_name: Option<String>,
}

/// Validate a signup request and hash its password.
pub fn signup(req: &SignupRequest) -> Result<Signup, ServiceError> {
    let username = validate::validate_username(&req.username)?;
    validate::validate_password(&req.password)?;
    let email = validate::validate_email(&req.email)?;
    let first_name = validate::validate_person_name("first_name", &req.first_name)?;
    let last_name = validate::validate_person_name("last_name", &req.last_name)?;
    let phone = optional_with(req.phone.as_deref(), validate::validate_phone)?;
    let role: Role = req.role.trim().parse()?;

    let company_name = optional_with(req.company_name.as_deref(), validate::validate_company_name)?;
    if company_name.is_some() && role != Role::Owner {
        return Err(ServiceError::BadRequest(
            "only owners can create a company at signup".into(),
        ));
    }

    let (password_hash, password_salt) = crate::crypto::hash_password(&req.password)?;

    Ok(Signup {
        user: NewUser {
            username,
            email,
            first_name,
            last_name,
            phone,
            role,
            password_hash,
            password_salt,
        },
        company_name,
    })
}

/// Normalize a login username. Malformed names can never match, so they fail
/// the same way a wrong password does.
pub fn login_username(username: &str) -> Result<String, ServiceError> {
    validate::validate_username(username)
        .map_err(|_| ServiceError::Unauthorized("invalid username or password".into()))
}

/// Validate a new password and hash it. Returns `(hash_hex, salt_hex)`.
pub fn new_password(password: &str) -> Result<(String, String), ServiceError> {
    validate::validate_password(password)?;
    crate::crypto::hash_password(password)
}

/// Verify a bearer token and return the user id it was issued to.
pub fn resolve_auth_token(token: &str, jwt_secret: &str, now: u64) -> Result<String, ServiceError> {
    if jwt_secret.is_empty() {
        return Err(ServiceError::Unauthorized(
            "token authentication not configured".into(),
        ));
    }
    crate::crypto::verify_jwt(token, jwt_secret, now)
}

/// Issue an access token for `user`.
pub fn auth_response(user: User, jwt_secret: &str, now_unix: u64) -> AuthResponse {
    AuthResponse {
        access_token: crate::crypto::sign_jwt(&user.id, jwt_secret, now_unix),
        expires_in: crate::crypto::JWT_EXPIRY_SECS,
        user,
    }
}

pub fn now_unix() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

// ─── Users ──────────────────────────────────────────────────────────────────

pub fn user_patch(req: &UpdateUserRequest) -> Result<UserPatch, ServiceError> {
    Ok(UserPatch {
        email: req
            .email
            .as_deref()
            .map(validate::validate_email)
            .transpose()?,
        first_name: req
            .first_name
            .as_deref()
            .map(|v| validate::validate_person_name("first_name", v))
            .transpose()?,
        last_name: req
            .last_name
            .as_deref()
            .map(|v| validate::validate_person_name("last_name", v))
            .transpose()?,
        phone: patch_with(req.phone.as_deref(), validate::validate_phone)?,
        role: parse_enum(req.role.as_deref())?,
    })
}

// ─── Companies ──────────────────────────────────────────────────────────────

pub fn company_input(req: &CreateCompanyRequest, owner_id: &str) -> Result<NewCompany, ServiceError> {
    Ok(NewCompany {
        name: validate::validate_company_name(&req.name)?,
        owner_id: owner_id.to_string(),
        address: optional_text("address", req.address.as_deref())?,
        phone: optional_with(req.phone.as_deref(), validate::validate_phone)?,
        email: optional_with(req.email.as_deref(), validate::validate_email)?,
    })
}

pub fn company_patch(req: &UpdateCompanyRequest) -> Result<CompanyPatch, ServiceError> {
    Ok(CompanyPatch {
        name: req
            .name
            .as_deref()
            .map(validate::validate_company_name)
            .transpose()?,
        address: patch_text("address", req.address.as_deref())?,
        phone: patch_with(req.phone.as_deref(), validate::validate_phone)?,
        email: patch_with(req.email.as_deref(), validate::validate_email)?,
    })
}

// ─── Projects ───────────────────────────────────────────────────────────────

pub fn project_input(
    req: &CreateProjectRequest,
    company_id: &str,
) -> Result<NewProject, ServiceError> {
    let start_date = optional_date("start_date", req.start_date.as_deref())?;
    let end_date = optional_date("end_date", req.end_date.as_deref())?;
    validate::validate_date_range(start_date, end_date)?;

    let mut members: Vec<String> = Vec::new();
    for id in req.members.iter().flatten() {
        let id = required_id("members", id)?;
        if !members.contains(&id) {
            members.push(id);
        }
    }

    Ok(NewProject {
        company_id: company_id.to_string(),
        name: validate::validate_title("name", &req.name, TITLE_MAX_LEN)?,
        description: optional_text("description", req.description.as_deref())?,
        location: optional_text("location", req.location.as_deref())?,
        budget: validate::validate_budget(req.budget.unwrap_or(0.0))?,
        status: parse_enum(req.status.as_deref())?.unwrap_or_default(),
        start_date,
        end_date,
        members,
    })
}

/// Date ordering against the stored values is checked by the store once the
/// patch is merged.
pub fn project_patch(req: &UpdateProjectRequest) -> Result<ProjectPatch, ServiceError> {
    Ok(ProjectPatch {
        name: req
            .name
            .as_deref()
            .map(|v| validate::validate_title("name", v, TITLE_MAX_LEN))
            .transpose()?,
        description: patch_text("description", req.description.as_deref())?,
        location: patch_text("location", req.location.as_deref())?,
        budget: req.budget.map(validate::validate_budget).transpose()?,
        status: parse_enum(req.status.as_deref())?,
        start_date: patch_date("start_date", req.start_date.as_deref())?,
        end_date: patch_date("end_date", req.end_date.as_deref())?,
    })
}

// ─── Tasks ──────────────────────────────────────────────────────────────────

pub fn task_input(req: &CreateTaskRequest) -> Result<NewTask, ServiceError> {
    Ok(NewTask {
        project_id: required_id("project_id", &req.project_id)?,
        title: validate::validate_title("title", &req.title, TITLE_MAX_LEN)?,
        description: optional_text("description", req.description.as_deref())?,
        assigned_to: optional_id(req.assigned_to.as_deref()),
        status: parse_enum(req.status.as_deref())?.unwrap_or_default(),
        priority: parse_enum(req.priority.as_deref())?.unwrap_or_default(),
        due_date: optional_date("due_date", req.due_date.as_deref())?,
    })
}

pub fn task_patch(req: &UpdateTaskRequest) -> Result<TaskPatch, ServiceError> {
    Ok(TaskPatch {
        title: req
            .title
            .as_deref()
            .map(|v| validate::validate_title("title", v, TITLE_MAX_LEN))
            .transpose()?,
        description: patch_text("description", req.description.as_deref())?,
        assigned_to: req.assigned_to.as_deref().map(|v| optional_id(Some(v))),
        status: parse_enum(req.status.as_deref())?,
        priority: parse_enum(req.priority.as_deref())?,
        due_date: patch_date("due_date", req.due_date.as_deref())?,
    })
}

// ─── Blueprints ─────────────────────────────────────────────────────────────

pub fn blueprint_input(
    req: &CreateBlueprintRequest,
    uploaded_by: &str,
) -> Result<NewBlueprint, ServiceError> {
    Ok(NewBlueprint {
        project_id: required_id("project_id", &req.project_id)?,
        title: validate::validate_title("title", &req.title, TITLE_MAX_LEN)?,
        file_url: validate::validate_file_url(&req.file_url)?,
        version: validate::validate_version(req.version.unwrap_or(1))?,
        uploaded_by: uploaded_by.to_string(),
    })
}

pub fn blueprint_patch(req: &UpdateBlueprintRequest) -> Result<BlueprintPatch, ServiceError> {
    Ok(BlueprintPatch {
        title: req
            .title
            .as_deref()
            .map(|v| validate::validate_title("title", v, TITLE_MAX_LEN))
            .transpose()?,
        file_url: req
            .file_url
            .as_deref()
            .map(validate::validate_file_url)
            .transpose()?,
        version: req.version.map(validate::validate_version).transpose()?,
    })
}

// ─── Reports & issues ───────────────────────────────────────────────────────

pub fn report_input(
    req: &CreateReportRequest,
    author_id: &str,
) -> Result<NewReport, ServiceError> {
    Ok(NewReport {
        project_id: required_id("project_id", &req.project_id)?,
        author_id: author_id.to_string(),
        title: validate::validate_title("title", &req.title, TITLE_MAX_LEN)?,
        date: validate::parse_date("date", &req.date)?,
        summary: optional_text("summary", req.summary.as_deref())?,
        weather: optional_text("weather", req.weather.as_deref())?,
        issues: req
            .issues
            .iter()
            .map(issue_input)
            .collect::<Result<_, _>>()?,
    })
}

pub fn report_patch(req: &UpdateReportRequest) -> Result<ReportPatch, ServiceError> {
    Ok(ReportPatch {
        title: req
            .title
            .as_deref()
            .map(|v| validate::validate_title("title", v, TITLE_MAX_LEN))
            .transpose()?,
        date: req
            .date
            .as_deref()
            .map(|v| validate::parse_date("date", v))
            .transpose()?,
        summary: patch_text("summary", req.summary.as_deref())?,
        weather: patch_text("weather", req.weather.as_deref())?,
    })
}

pub fn issue_input(req: &CreateIssueRequest) -> Result<NewIssue, ServiceError> {
    Ok(NewIssue {
        description: validate::validate_text("description", &req.description, 1, ISSUE_MAX_LEN)?,
        severity: req.severity.trim().parse()?,
    })
}

pub fn issue_patch(req: &UpdateIssueRequest) -> Result<IssuePatch, ServiceError> {
    Ok(IssuePatch {
        description: req
            .description
            .as_deref()
            .map(|v| validate::validate_text("description", v, 1, ISSUE_MAX_LEN))
            .transpose()?,
        severity: parse_enum(req.severity.as_deref())?,
        status: parse_enum(req.status.as_deref())?,
    })
}
