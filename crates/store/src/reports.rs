//! Reports with their embedded issues.
//!
//! Issues have no table of their own: the whole list is read and written
//! back as the report's `issues` JSON column.

use rusqlite::{Connection, Row};
use sitework_api::db::reports as sql;
use sitework_core::{Issue, IssuePatch, NewIssue, NewReport, Report, ReportPatch};

use crate::error::{OptionalRow, Result};
use crate::projects::project_company;
use crate::sql::{parse_col, sq_execute, sq_query_map, sq_query_row};
use crate::users::load_user;
use crate::{Store, StoreError, new_id, now_rfc3339};

/// A report row whose `issues` column has not been decoded yet.
struct ReportRow {
    report: Report,
    issues_json: String,
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        report: Report {
            id: row.get(0)?,
            project_id: row.get(1)?,
            author_id: row.get(2)?,
            title: row.get(3)?,
            date: parse_col(row, 4)?,
            summary: row.get(5)?,
            weather: row.get(6)?,
            issues: Vec::new(),
            created_at: row.get(8)?,
        },
        issues_json: row.get(7)?,
    })
}

fn decode(row: ReportRow) -> Result<Report> {
    let mut report = row.report;
    report.issues = serde_json::from_str(&row.issues_json)?;
    Ok(report)
}

fn load_report(conn: &Connection, id: &str) -> Result<Report> {
    let row = sq_query_row(conn, sql::get_by_id(id), report_from_row).or_not_found("report")?;
    decode(row)
}

fn save_report(conn: &Connection, report: &Report) -> Result<()> {
    let issues_json = serde_json::to_string(&report.issues)?;
    sq_execute(conn, sql::update(report, &issues_json))?;
    Ok(())
}

impl Store {
    /// Create a report, optionally with its first issues.
    pub fn create_report(&self, report: &NewReport) -> Result<Report> {
        let conn = self.conn();
        project_company(&conn, &report.project_id)?;
        load_user(&conn, &report.author_id)?;

        let id = new_id();
        let now = now_rfc3339();
        let issues: Vec<Issue> = report
            .issues
            .iter()
            .cloned()
            .map(|issue| issue.into_issue(&now))
            .collect();
        let issues_json = serde_json::to_string(&issues)?;
        sq_execute(&conn, sql::insert(&id, report, &issues_json, &now))?;
        load_report(&conn, &id)
    }

    pub fn get_report(&self, id: &str) -> Result<Report> {
        load_report(&self.conn(), id)
    }

    /// Reports of a project, latest site date first.
    pub fn list_project_reports(&self, project_id: &str) -> Result<Vec<Report>> {
        let conn = self.conn();
        project_company(&conn, project_id)?;
        sq_query_map(&conn, sql::list_by_project(project_id), report_from_row)?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub fn update_report(&self, id: &str, patch: ReportPatch) -> Result<Report> {
        let conn = self.conn();
        let mut report = load_report(&conn, id)?;
        patch.apply(&mut report);
        save_report(&conn, &report)?;
        Ok(report)
    }

    pub fn delete_report(&self, id: &str) -> Result<()> {
        if sq_execute(&self.conn(), sql::delete(id))? == 0 {
            return Err(StoreError::NotFound("report"));
        }
        Ok(())
    }

    pub fn add_issue(&self, report_id: &str, issue: NewIssue) -> Result<Issue> {
        let conn = self.conn();
        let mut report = load_report(&conn, report_id)?;
        let issue = issue.into_issue(&now_rfc3339());
        report.issues.push(issue.clone());
        save_report(&conn, &report)?;
        Ok(issue)
    }

    pub fn update_issue(&self, report_id: &str, issue_id: &str, patch: IssuePatch) -> Result<Issue> {
        let conn = self.conn();
        let mut report = load_report(&conn, report_id)?;
        let issue = report
            .issue_mut(issue_id)
            .ok_or(StoreError::NotFound("issue"))?;
        patch.apply(issue);
        let updated = issue.clone();
        save_report(&conn, &report)?;
        Ok(updated)
    }

    pub fn remove_issue(&self, report_id: &str, issue_id: &str) -> Result<()> {
        let conn = self.conn();
        let mut report = load_report(&conn, report_id)?;
        let before = report.issues.len();
        report.issues.retain(|i| i.id != issue_id);
        if report.issues.len() == before {
            return Err(StoreError::NotFound("issue"));
        }
        save_report(&conn, &report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sitework_core::testing;
    use sitework_core::{IssuePatch, IssueSeverity, IssueStatus, ReportPatch, Role};

    use super::*;
    use crate::test_store;

    fn project(store: &Store) -> (String, String) {
        let owner = store
            .signup(&testing::new_user("Wes", Role::Owner), Some("Wes Roads"))
            .unwrap();
        let project = store
            .create_project(&testing::new_project(
                owner.company_id.as_deref().unwrap(),
                "Bypass",
            ))
            .unwrap();
        (project.id, owner.id)
    }

    #[test]
    fn test_create_with_issues() {
        let store = test_store();
        let (project_id, author_id) = project(&store);

        assert!(matches!(
            store.create_report(&testing::new_report(&project_id, "ghost")),
            Err(StoreError::NotFound("user"))
        ));

        let mut input = testing::new_report(&project_id, &author_id);
        input.issues = vec![
            testing::new_issue("Drainage blocked", IssueSeverity::High),
            testing::new_issue("Signage missing", IssueSeverity::Low),
        ];
        let report = store.create_report(&input).unwrap();
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.open_issue_count(), 2);
        assert_ne!(report.issues[0].id, report.issues[1].id);
        assert_eq!(store.get_report(&report.id).unwrap(), report);
    }

    #[test]
    fn test_issue_lifecycle() {
        let store = test_store();
        let (project_id, author_id) = project(&store);
        let report = store
            .create_report(&testing::new_report(&project_id, &author_id))
            .unwrap();
        assert!(report.issues.is_empty());

        let issue = store
            .add_issue(&report.id, testing::new_issue("Crane fault", IssueSeverity::Critical))
            .unwrap();
        assert_eq!(issue.status, IssueStatus::Open);

        let resolved = store
            .update_issue(
                &report.id,
                &issue.id,
                IssuePatch {
                    status: Some(IssueStatus::Resolved),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(resolved.status, IssueStatus::Resolved);
        assert_eq!(resolved.severity, IssueSeverity::Critical);
        assert_eq!(store.get_report(&report.id).unwrap().open_issue_count(), 0);

        assert!(matches!(
            store.update_issue(&report.id, "nope", IssuePatch::default()),
            Err(StoreError::NotFound("issue"))
        ));
        store.remove_issue(&report.id, &issue.id).unwrap();
        assert!(store.get_report(&report.id).unwrap().issues.is_empty());
        assert!(matches!(
            store.remove_issue(&report.id, &issue.id),
            Err(StoreError::NotFound("issue"))
        ));
    }

    #[test]
    fn test_update_keeps_issues() {
        let store = test_store();
        let (project_id, author_id) = project(&store);
        let mut input = testing::new_report(&project_id, &author_id);
        input.issues = vec![testing::new_issue("Dust", IssueSeverity::Medium)];
        let report = store.create_report(&input).unwrap();

        let updated = store
            .update_report(
                &report.id,
                ReportPatch {
                    date: NaiveDate::from_ymd_opt(2024, 4, 3),
                    weather: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.weather, None);
        assert_eq!(updated.issues, report.issues);
        assert_eq!(store.get_report(&report.id).unwrap(), updated);
    }

    #[test]
    fn test_list_latest_first() {
        let store = test_store();
        let (project_id, author_id) = project(&store);
        let mut older = testing::new_report(&project_id, &author_id);
        older.date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        store.create_report(&older).unwrap();
        store
            .create_report(&testing::new_report(&project_id, &author_id))
            .unwrap();

        let dates: Vec<NaiveDate> = store
            .list_project_reports(&project_id)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(
            dates,
            [
                NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
            ]
        );
    }
}
