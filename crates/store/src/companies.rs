use rusqlite::{Connection, Row};
use sitework_api::db::{companies as sql, projects as project_sql, users as user_sql};
use sitework_core::{Company, CompanyPatch, NewCompany, Role, User};

use crate::error::{OptionalRow, Result, StoreError};
use crate::sql::{sq_count, sq_execute, sq_query_map, sq_query_row};
use crate::users::{load_user, user_from_row};
use crate::{Removed, Store, new_id, now_rfc3339};

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_id: row.get(2)?,
        address: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub(crate) fn load_company(conn: &Connection, id: &str) -> Result<Company> {
    sq_query_row(conn, sql::get_by_id(id), company_from_row).or_not_found("company")
}

/// Insert a company and attach its owner. The owner must exist, hold the
/// `Owner` role and not belong to another company yet.
pub(crate) fn insert_company(conn: &Connection, company: &NewCompany) -> Result<Company> {
    let owner = load_user(conn, &company.owner_id)?;
    if owner.role != Role::Owner {
        return Err(StoreError::Invalid(
            "company owner must have the Owner role".into(),
        ));
    }
    if owner.company_id.is_some() {
        return Err(StoreError::Conflict(
            "user already belongs to a company".into(),
        ));
    }

    let id = new_id();
    sq_execute(conn, sql::insert(&id, company, &now_rfc3339()))?;
    sq_execute(conn, user_sql::set_company(&owner.id, Some(&id)))?;
    load_company(conn, &id)
}

/// A company with its member and project counts.
#[derive(Debug, Clone)]
pub struct CompanySummary {
    pub company: Company,
    pub member_count: usize,
    pub project_count: usize,
}

impl Store {
    pub fn create_company(&self, company: &NewCompany) -> Result<Company> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let created = insert_company(&tx, company)?;
        tx.commit()?;
        tracing::info!(company_id = %created.id, owner_id = %created.owner_id, "created company");
        Ok(created)
    }

    pub fn get_company(&self, id: &str) -> Result<Company> {
        load_company(&self.conn(), id)
    }

    pub fn company_summary(&self, id: &str) -> Result<CompanySummary> {
        let conn = self.conn();
        let company = load_company(&conn, id)?;
        Ok(CompanySummary {
            member_count: sq_count(&conn, user_sql::count_by_company(id))?,
            project_count: sq_count(&conn, project_sql::count_by_company(id))?,
            company,
        })
    }

    pub fn update_company(&self, id: &str, patch: CompanyPatch) -> Result<Company> {
        let conn = self.conn();
        let mut company = load_company(&conn, id)?;
        patch.apply(&mut company);
        sq_execute(&conn, sql::update(&company))?;
        Ok(company)
    }

    /// Delete a company with all of its projects (and their dependents) and
    /// all of its users, owner included.
    pub fn delete_company(&self, id: &str) -> Result<Removed> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        load_company(&tx, id)?;

        let mut removed = Removed::default();
        let project_ids: Vec<String> =
            sq_query_map(&tx, project_sql::list_ids_by_company(id), |row| row.get(0))?;
        for project_id in &project_ids {
            removed.add(crate::projects::delete_project_tree(&tx, project_id)?);
        }

        let user_ids: Vec<String> =
            sq_query_map(&tx, user_sql::list_ids_by_company(id), |row| row.get(0))?;
        for user_id in &user_ids {
            removed.project_members += sq_execute(&tx, user_sql::remove_from_all_projects(user_id))?;
            sq_execute(&tx, user_sql::unassign_all_tasks(user_id))?;
        }
        removed.users = sq_execute(&tx, user_sql::delete_by_company(id))?;
        sq_execute(&tx, sql::delete(id))?;
        tx.commit()?;

        tracing::info!(
            company_id = id,
            projects = removed.projects,
            tasks = removed.tasks,
            blueprints = removed.blueprints,
            reports = removed.reports,
            users = removed.users,
            "deleted company"
        );
        Ok(removed)
    }

    /// Attach an existing user without a company. Owners found their own
    /// company instead; a company has exactly one user with the Owner role.
    pub fn add_company_member(&self, company_id: &str, username: &str) -> Result<User> {
        let conn = self.conn();
        load_company(&conn, company_id)?;
        let mut user = sq_query_row(&conn, user_sql::get_by_username(username), user_from_row)
            .or_not_found("user")?;
        if user.role == Role::Owner {
            return Err(StoreError::Invalid(
                "users with the Owner role cannot join another company".into(),
            ));
        }
        if user.company_id.is_some() {
            return Err(StoreError::Conflict(
                "user already belongs to a company".into(),
            ));
        }
        sq_execute(&conn, user_sql::set_company(&user.id, Some(company_id)))?;
        user.company_id = Some(company_id.to_string());
        Ok(user)
    }

    /// Detach a member from a company. They also leave the company's project
    /// rosters and lose its task assignments. The owner cannot be removed.
    pub fn remove_company_member(&self, company_id: &str, user_id: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let company = load_company(&tx, company_id)?;
        let user = load_user(&tx, user_id)?;
        if user.company_id.as_deref() != Some(company_id) {
            return Err(StoreError::NotFound("company member"));
        }
        if company.owner_id == user.id {
            return Err(StoreError::Conflict(
                "the company owner cannot be removed".into(),
            ));
        }

        let memberships =
            sq_execute(&tx, user_sql::remove_from_company_projects(user_id, company_id))?;
        let unassigned = sq_execute(&tx, user_sql::unassign_company_tasks(user_id, company_id))?;
        sq_execute(&tx, user_sql::set_company(user_id, None))?;
        tx.commit()?;

        tracing::info!(
            company_id,
            user_id,
            memberships,
            unassigned_tasks = unassigned,
            "removed company member"
        );
        Ok(())
    }
}
