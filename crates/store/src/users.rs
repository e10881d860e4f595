use rusqlite::{Connection, OptionalExtension, Row};
use sitework_api::db::{companies as company_sql, users as sql};
use sitework_core::{NewCompany, NewUser, Role, User, UserPatch};

use crate::error::{OptionalRow, Result, StoreError};
use crate::sql::{parse_col, sq_count, sq_execute, sq_query_map, sq_query_row};
use crate::{Removed, Store, new_id, now_rfc3339};

/// Stored password material for a user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password_hash: String,
    pub password_salt: String,
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        phone: row.get(5)?,
        role: parse_col(row, 6)?,
        company_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub(crate) fn load_user(conn: &Connection, id: &str) -> Result<User> {
    sq_query_row(conn, sql::get_by_id(id), user_from_row).or_not_found("user")
}

fn insert_user(conn: &Connection, user: &NewUser) -> Result<String> {
    if sq_count(conn, sql::username_exists(&user.username))? > 0 {
        return Err(StoreError::Conflict("username already taken".into()));
    }
    let id = new_id();
    sq_execute(conn, sql::insert(&id, user, &now_rfc3339()))?;
    Ok(id)
}

impl Store {
    /// Create a user with no company.
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn();
        let id = insert_user(&conn, user)?;
        load_user(&conn, &id)
    }

    /// Create a user and, when `company_name` is given, the company they own.
    /// Both rows are written in one transaction.
    pub fn signup(&self, user: &NewUser, company_name: Option<&str>) -> Result<User> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let id = insert_user(&tx, user)?;
        if let Some(name) = company_name {
            let company = NewCompany {
                name: name.to_string(),
                owner_id: id.clone(),
                address: None,
                phone: None,
                email: None,
            };
            crate::companies::insert_company(&tx, &company)?;
        }
        let created = load_user(&tx, &id)?;
        tx.commit()?;
        tracing::info!(user = %created.username, role = %created.role, "user signed up");
        Ok(created)
    }

    pub fn get_user(&self, id: &str) -> Result<User> {
        load_user(&self.conn(), id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(sq_query_row(&self.conn(), sql::get_by_username(username), user_from_row)
            .optional()?)
    }

    /// Password material for login. `None` when the username is unknown.
    pub fn credentials_by_username(&self, username: &str) -> Result<Option<Credentials>> {
        Ok(sq_query_row(
            &self.conn(),
            sql::get_credentials_by_username(username),
            |row| {
                Ok(Credentials {
                    user_id: row.get(0)?,
                    password_hash: row.get(1)?,
                    password_salt: row.get(2)?,
                })
            },
        )
        .optional()?)
    }

    pub fn credentials_by_id(&self, id: &str) -> Result<Credentials> {
        sq_query_row(&self.conn(), sql::get_password_fields(id), |row| {
            Ok(Credentials {
                user_id: id.to_string(),
                password_hash: row.get(0)?,
                password_salt: row.get(1)?,
            })
        })
        .or_not_found("user")
    }

    pub fn set_password(&self, id: &str, password_hash: &str, password_salt: &str) -> Result<()> {
        let changed = sq_execute(
            &self.conn(),
            sql::update_password(id, password_hash, password_salt),
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }

    /// Members of a company, ordered by username.
    pub fn list_company_users(&self, company_id: &str) -> Result<Vec<User>> {
        Ok(sq_query_map(
            &self.conn(),
            sql::list_by_company(company_id),
            user_from_row,
        )?)
    }

    /// Apply a profile patch. The `Owner` role can be neither granted nor
    /// revoked this way.
    pub fn update_user(&self, id: &str, patch: UserPatch) -> Result<User> {
        let conn = self.conn();
        let mut user = load_user(&conn, id)?;
        if let Some(role) = patch.role {
            if role != user.role && (role == Role::Owner || user.role == Role::Owner) {
                return Err(StoreError::Invalid(
                    "the Owner role cannot be granted or revoked".into(),
                ));
            }
        }
        patch.apply(&mut user);
        sq_execute(&conn, sql::update_profile(&user))?;
        Ok(user)
    }

    /// Delete a user, dropping them from project rosters and task assignments.
    /// Company owners must delete their company instead. Blueprints and
    /// reports keep the id of whoever uploaded or filed them as history.
    pub fn delete_user(&self, id: &str) -> Result<Removed> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        load_user(&tx, id)?;
        if sq_count(&tx, company_sql::count_owned_by(id))? > 0 {
            return Err(StoreError::Conflict(
                "user owns a company; delete the company instead".into(),
            ));
        }

        let project_members = sq_execute(&tx, sql::remove_from_all_projects(id))?;
        let unassigned = sq_execute(&tx, sql::unassign_all_tasks(id))?;
        let removed = Removed {
            project_members,
            users: sq_execute(&tx, sql::delete(id))?,
            ..Removed::default()
        };
        tx.commit()?;

        tracing::info!(
            user_id = id,
            memberships = removed.project_members,
            unassigned_tasks = unassigned,
            "deleted user"
        );
        Ok(removed)
    }
}
