use crate::model::{
    IssueSeverity, NewBlueprint, NewCompany, NewIssue, NewProject, NewReport, NewTask, NewUser,
    Priority, ProjectStatus, Role, TaskStatus,
};
use chrono::NaiveDate;

/// User input with a unique username derived from `name`.
pub fn new_user(name: &str, role: Role) -> NewUser {
    let username = format!("{}{}", name.to_lowercase(), next_id());
    NewUser {
        email: format!("{username}@example.com"),
        username,
        first_name: name.to_string(),
        last_name: "Tester".to_string(),
        phone: None,
        role,
        password_hash: "hash".to_string(),
        password_salt: "salt".to_string(),
    }
}

pub fn new_company(name: &str, owner_id: &str) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        owner_id: owner_id.to_string(),
        address: None,
        phone: None,
        email: None,
    }
}

pub fn new_project(company_id: &str, name: &str) -> NewProject {
    NewProject {
        company_id: company_id.to_string(),
        name: name.to_string(),
        description: None,
        location: Some("Lot 7".to_string()),
        budget: 250_000.0,
        status: ProjectStatus::Planning,
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1),
        end_date: None,
        members: Vec::new(),
    }
}

pub fn new_task(project_id: &str, title: &str) -> NewTask {
    NewTask {
        project_id: project_id.to_string(),
        title: title.to_string(),
        description: None,
        assigned_to: None,
        status: TaskStatus::Todo,
        priority: Priority::Medium,
        due_date: None,
    }
}

pub fn new_blueprint(project_id: &str, uploaded_by: &str) -> NewBlueprint {
    NewBlueprint {
        project_id: project_id.to_string(),
        title: "Ground floor plan".to_string(),
        file_url: "https://files.example.com/ground-floor.pdf".to_string(),
        version: 1,
        uploaded_by: uploaded_by.to_string(),
    }
}

pub fn new_report(project_id: &str, author_id: &str) -> NewReport {
    NewReport {
        project_id: project_id.to_string(),
        author_id: author_id.to_string(),
        title: "Daily log".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap_or_default(),
        summary: None,
        weather: Some("Sunny".to_string()),
        issues: Vec::new(),
    }
}

pub fn new_issue(description: &str, severity: IssueSeverity) -> NewIssue {
    NewIssue {
        description: description.to_string(),
        severity,
    }
}

fn next_id() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
