use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Declares a closed set of wire strings as an enum with `as_str`, `Display`
/// and `FromStr`. The wire string is what the API and the database store.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::validate::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(crate::validate::ValidationError::UnknownVariant {
                        field: stringify!($name).to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Access-control tag carried by every user.
    pub enum Role {
        Owner => "Owner",
        FieldManager => "Field Manager",
        Engineer => "Engineer",
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum ProjectStatus {
        #[default]
        Planning => "Planning",
        InProgress => "In Progress",
        OnHold => "On Hold",
        Completed => "Completed",
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum TaskStatus {
        #[default]
        Todo => "To Do",
        InProgress => "In Progress",
        Done => "Done",
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum Priority {
        Low => "Low",
        #[default]
        Medium => "Medium",
        High => "High",
    }
}

wire_enum! {
    pub enum IssueSeverity {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum IssueStatus {
        #[default]
        Open => "Open",
        Resolved => "Resolved",
    }
}

// ─── Stored documents ───────────────────────────────────────────────────────

/// A user as exposed over the API. Credentials never leave the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub company_id: Option<String>,
    pub created_at: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub budget: f64,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// User ids, in the order they were added.
    pub members: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Blueprint {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub file_url: String,
    pub version: u32,
    pub uploaded_by: String,
    pub created_at: String,
}

/// Daily site report. Issues are embedded and only exist inside their report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: String,
    pub project_id: String,
    pub author_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub summary: Option<String>,
    pub weather: Option<String>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    pub created_at: String,
}

impl Report {
    pub fn open_issue_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.status == IssueStatus::Open)
            .count()
    }

    pub fn issue_mut(&mut self, issue_id: &str) -> Option<&mut Issue> {
        self.issues.iter_mut().find(|i| i.id == issue_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: String,
    pub description: String,
    pub severity: IssueSeverity,
    #[serde(default)]
    pub status: IssueStatus,
    pub reported_at: String,
}

// ─── Validated inputs ───────────────────────────────────────────────────────
//
// Produced by the service layer after normalization and validation; consumed
// by the store, which only adds referential checks on top.

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub password_hash: String,
    pub password_salt: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub owner_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub address: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub budget: f64,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub budget: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assigned_to: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone)]
pub struct NewBlueprint {
    pub project_id: String,
    pub title: String,
    pub file_url: String,
    pub version: u32,
    pub uploaded_by: String,
}

#[derive(Debug, Clone, Default)]
pub struct BlueprintPatch {
    pub title: Option<String>,
    pub file_url: Option<String>,
    pub version: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub project_id: String,
    pub author_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub summary: Option<String>,
    pub weather: Option<String>,
    pub issues: Vec<NewIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub summary: Option<Option<String>>,
    pub weather: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewIssue {
    pub description: String,
    pub severity: IssueSeverity,
}

#[derive(Debug, Clone, Default)]
pub struct IssuePatch {
    pub description: Option<String>,
    pub severity: Option<IssueSeverity>,
    pub status: Option<IssueStatus>,
}

impl NewIssue {
    /// Materialize into an embedded issue with a fresh id.
    pub fn into_issue(self, reported_at: &str) -> Issue {
        Issue {
            id: uuid::Uuid::new_v4().to_string(),
            description: self.description,
            severity: self.severity,
            status: IssueStatus::Open,
            reported_at: reported_at.to_string(),
        }
    }
}

// ─── Patch application ──────────────────────────────────────────────────────
//
// `Some(None)` clears an optional field; `None` leaves it untouched.

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        set(&mut user.email, self.email);
        set(&mut user.first_name, self.first_name);
        set(&mut user.last_name, self.last_name);
        set(&mut user.phone, self.phone);
        set(&mut user.role, self.role);
    }
}

impl CompanyPatch {
    pub fn apply(self, company: &mut Company) {
        set(&mut company.name, self.name);
        set(&mut company.address, self.address);
        set(&mut company.phone, self.phone);
        set(&mut company.email, self.email);
    }
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        set(&mut project.name, self.name);
        set(&mut project.description, self.description);
        set(&mut project.location, self.location);
        set(&mut project.budget, self.budget);
        set(&mut project.status, self.status);
        set(&mut project.start_date, self.start_date);
        set(&mut project.end_date, self.end_date);
    }
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        set(&mut task.title, self.title);
        set(&mut task.description, self.description);
        set(&mut task.assigned_to, self.assigned_to);
        set(&mut task.status, self.status);
        set(&mut task.priority, self.priority);
        set(&mut task.due_date, self.due_date);
    }
}

impl BlueprintPatch {
    pub fn apply(self, blueprint: &mut Blueprint) {
        set(&mut blueprint.title, self.title);
        set(&mut blueprint.file_url, self.file_url);
        set(&mut blueprint.version, self.version);
    }
}

impl ReportPatch {
    pub fn apply(self, report: &mut Report) {
        set(&mut report.title, self.title);
        set(&mut report.date, self.date);
        set(&mut report.summary, self.summary);
        set(&mut report.weather, self.weather);
    }
}

impl IssuePatch {
    pub fn apply(self, issue: &mut Issue) {
        set(&mut issue.description, self.description);
        set(&mut issue.severity, self.severity);
        set(&mut issue.status, self.status);
    }
}
