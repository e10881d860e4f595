use rusqlite::{Connection, Row};
use sitework_api::db::{
    blueprints as blueprint_sql, projects as sql, reports as report_sql, tasks as task_sql,
};
use sitework_core::{NewProject, Project, ProjectPatch, validate};

use crate::companies::load_company;
use crate::error::{OptionalRow, Result, StoreError};
use crate::sql::{
    parse_col, parse_opt_col, sq_count, sq_execute, sq_query_map, sq_query_row,
};
use crate::users::load_user;
use crate::{Removed, Store, new_id, now_rfc3339};

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        company_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        budget: row.get(5)?,
        status: parse_col(row, 6)?,
        start_date: parse_opt_col(row, 7)?,
        end_date: parse_opt_col(row, 8)?,
        members: Vec::new(),
        created_at: row.get(9)?,
    })
}

fn with_members(conn: &Connection, mut project: Project) -> Result<Project> {
    project.members = sq_query_map(conn, sql::member_ids(&project.id), |row| row.get(0))?;
    Ok(project)
}

pub(crate) fn load_project(conn: &Connection, id: &str) -> Result<Project> {
    let project =
        sq_query_row(conn, sql::get_by_id(id), project_from_row).or_not_found("project")?;
    with_members(conn, project)
}

/// Company that owns `project_id`.
pub(crate) fn project_company(conn: &Connection, project_id: &str) -> Result<String> {
    sq_query_row(conn, sql::get_company_id(project_id), |row| row.get(0))
        .or_not_found("project")
}

/// A user may only be linked to a project (as member or assignee) when they
/// belong to the project's company.
pub(crate) fn require_company_user(
    conn: &Connection,
    user_id: &str,
    company_id: &str,
) -> Result<()> {
    let user = load_user(conn, user_id)?;
    if user.company_id.as_deref() != Some(company_id) {
        return Err(StoreError::Invalid(format!(
            "user {} does not belong to the project's company",
            user.username
        )));
    }
    Ok(())
}

/// Remove a project and everything hanging off it. Runs inside the caller's
/// transaction.
pub(crate) fn delete_project_tree(conn: &Connection, project_id: &str) -> Result<Removed> {
    let removed = Removed {
        tasks: sq_execute(conn, task_sql::delete_by_project(project_id))?,
        blueprints: sq_execute(conn, blueprint_sql::delete_by_project(project_id))?,
        reports: sq_execute(conn, report_sql::delete_by_project(project_id))?,
        project_members: sq_execute(conn, sql::members_delete_all(project_id))?,
        projects: sq_execute(conn, sql::delete(project_id))?,
        users: 0,
    };
    Ok(removed)
}

impl Store {
    pub fn create_project(&self, project: &NewProject) -> Result<Project> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        load_company(&tx, &project.company_id)?;
        for user_id in &project.members {
            require_company_user(&tx, user_id, &project.company_id)?;
        }

        let id = new_id();
        let now = now_rfc3339();
        sq_execute(&tx, sql::insert(&id, project, &now))?;
        for user_id in &project.members {
            sq_execute(&tx, sql::member_insert(&id, user_id, &now))?;
        }
        let created = load_project(&tx, &id)?;
        tx.commit()?;
        tracing::info!(project_id = %created.id, company_id = %created.company_id, "created project");
        Ok(created)
    }

    pub fn get_project(&self, id: &str) -> Result<Project> {
        load_project(&self.conn(), id)
    }

    pub fn project_company(&self, project_id: &str) -> Result<String> {
        project_company(&self.conn(), project_id)
    }

    /// Projects of a company, newest first.
    pub fn list_company_projects(&self, company_id: &str) -> Result<Vec<Project>> {
        let conn = self.conn();
        load_company(&conn, company_id)?;
        let projects = sq_query_map(&conn, sql::list_by_company(company_id), project_from_row)?;
        projects
            .into_iter()
            .map(|p| with_members(&conn, p))
            .collect()
    }

    /// Apply a patch. The date range is checked on the merged document.
    pub fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<Project> {
        let conn = self.conn();
        let mut project = load_project(&conn, id)?;
        patch.apply(&mut project);
        validate::validate_date_range(project.start_date, project.end_date)?;
        sq_execute(&conn, sql::update(&project))?;
        Ok(project)
    }

    pub fn delete_project(&self, id: &str) -> Result<Removed> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        load_project(&tx, id)?;
        let removed = delete_project_tree(&tx, id)?;
        tx.commit()?;
        tracing::info!(
            project_id = id,
            tasks = removed.tasks,
            blueprints = removed.blueprints,
            reports = removed.reports,
            "deleted project"
        );
        Ok(removed)
    }

    pub fn add_project_member(&self, project_id: &str, user_id: &str) -> Result<Project> {
        let conn = self.conn();
        let company_id = project_company(&conn, project_id)?;
        require_company_user(&conn, user_id, &company_id)?;
        if sq_count(&conn, sql::member_exists(project_id, user_id))? > 0 {
            return Err(StoreError::Conflict(
                "user is already a project member".into(),
            ));
        }
        sq_execute(&conn, sql::member_insert(project_id, user_id, &now_rfc3339()))?;
        load_project(&conn, project_id)
    }

    pub fn remove_project_member(&self, project_id: &str, user_id: &str) -> Result<Project> {
        let conn = self.conn();
        load_project(&conn, project_id)?;
        if sq_execute(&conn, sql::member_delete(project_id, user_id))? == 0 {
            return Err(StoreError::NotFound("project member"));
        }
        load_project(&conn, project_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sitework_core::testing;
    use sitework_core::{ProjectPatch, ProjectStatus, Role, ValidationError};

    use super::*;
    use crate::test_store;

    fn setup(store: &Store) -> (String, String) {
        let owner = store
            .signup(&testing::new_user("Pam", Role::Owner), Some("Pam Projects"))
            .unwrap();
        let company_id = owner.company_id.unwrap();
        let eng = store
            .create_user(&testing::new_user("Quin", Role::Engineer))
            .unwrap();
        store.add_company_member(&company_id, &eng.username).unwrap();
        (company_id, eng.id)
    }

    #[test]
    fn test_create_checks_company_and_members() {
        let store = test_store();
        let (company_id, eng_id) = setup(&store);

        let err = store
            .create_project(&testing::new_project("missing", "Nowhere"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("company")));

        let outsider = store
            .create_user(&testing::new_user("Rex", Role::Engineer))
            .unwrap();
        let mut input = testing::new_project(&company_id, "Mall");
        input.members = vec![eng_id.clone(), outsider.id];
        assert!(matches!(
            store.create_project(&input),
            Err(StoreError::Invalid(_))
        ));

        input.members = vec![eng_id.clone()];
        let project = store.create_project(&input).unwrap();
        assert_eq!(project.members, vec![eng_id]);
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(store.get_project(&project.id).unwrap(), project);
        assert_eq!(store.project_company(&project.id).unwrap(), company_id);
    }

    #[test]
    fn test_update_checks_merged_dates() {
        let store = test_store();
        let (company_id, _) = setup(&store);
        let project = store
            .create_project(&testing::new_project(&company_id, "Stadium"))
            .unwrap();

        let err = store
            .update_project(
                &project.id,
                ProjectPatch {
                    end_date: Some(NaiveDate::from_ymd_opt(2024, 3, 1)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DateOrder { .. })
        ));

        let updated = store
            .update_project(
                &project.id,
                ProjectPatch {
                    status: Some(ProjectStatus::InProgress),
                    budget: Some(1.5e6),
                    end_date: Some(NaiveDate::from_ymd_opt(2025, 1, 31)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::InProgress);
        assert_eq!(updated.budget, 1.5e6);
        assert_eq!(store.get_project(&project.id).unwrap(), updated);
    }

    #[test]
    fn test_member_add_remove() {
        let store = test_store();
        let (company_id, eng_id) = setup(&store);
        let project = store
            .create_project(&testing::new_project(&company_id, "School"))
            .unwrap();

        let project = store.add_project_member(&project.id, &eng_id).unwrap();
        assert_eq!(project.members, vec![eng_id.clone()]);
        assert!(matches!(
            store.add_project_member(&project.id, &eng_id),
            Err(StoreError::Conflict(_))
        ));

        let project = store.remove_project_member(&project.id, &eng_id).unwrap();
        assert!(project.members.is_empty());
        assert!(matches!(
            store.remove_project_member(&project.id, &eng_id),
            Err(StoreError::NotFound("project member"))
        ));
    }

    #[test]
    fn test_list_company_projects() {
        let store = test_store();
        let (company_id, _) = setup(&store);
        store
            .create_project(&testing::new_project(&company_id, "A"))
            .unwrap();
        store
            .create_project(&testing::new_project(&company_id, "B"))
            .unwrap();
        assert_eq!(store.list_company_projects(&company_id).unwrap().len(), 2);
        assert!(store.list_company_projects("missing").is_err());
    }

    #[test]
    fn test_delete_project_cascades() {
        let store = test_store();
        let (company_id, eng_id) = setup(&store);
        let mut input = testing::new_project(&company_id, "Dam");
        input.members = vec![eng_id.clone()];
        let project = store.create_project(&input).unwrap();
        let keep = store
            .create_project(&testing::new_project(&company_id, "Weir"))
            .unwrap();

        let task = store
            .create_task(&testing::new_task(&project.id, "Excavate"))
            .unwrap();
        store
            .create_task(&testing::new_task(&keep.id, "Fence"))
            .unwrap();
        let blueprint = store
            .create_blueprint(&testing::new_blueprint(&project.id, &eng_id))
            .unwrap();
        let report = store
            .create_report(&testing::new_report(&project.id, &eng_id))
            .unwrap();

        let removed = store.delete_project(&project.id).unwrap();
        assert_eq!(removed.projects, 1);
        assert_eq!(removed.tasks, 1);
        assert_eq!(removed.blueprints, 1);
        assert_eq!(removed.reports, 1);
        assert_eq!(removed.project_members, 1);

        assert!(store.get_task(&task.id).is_err());
        assert!(store.get_blueprint(&blueprint.id).is_err());
        assert!(store.get_report(&report.id).is_err());
        assert_eq!(store.list_project_tasks(&keep.id).unwrap().len(), 1);
        assert!(matches!(
            store.delete_project(&project.id),
            Err(StoreError::NotFound("project"))
        ));
    }
}
