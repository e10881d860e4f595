//! User query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};
use sitework_core::{NewUser, User};

use super::Built;
use super::tables::{ProjectMembers, Projects, Tasks, Users};

/// Public user columns, in the order `user_from_row` reads them.
fn user_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column((Users::Table, Users::Id))
        .column((Users::Table, Users::Username))
        .column((Users::Table, Users::Email))
        .column((Users::Table, Users::FirstName))
        .column((Users::Table, Users::LastName))
        .column((Users::Table, Users::Phone))
        .column((Users::Table, Users::Role))
        .column((Users::Table, Users::CompanyId))
        .column((Users::Table, Users::CreatedAt))
}

// ── Lookups ────────────────────────────────────────────────────────────────

pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    user_columns(&mut q);
    q.from(Users::Table)
        .and_where(Expr::col((Users::Table, Users::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn get_by_username(username: &str) -> Built {
    let mut q = Query::select().to_owned();
    user_columns(&mut q);
    q.from(Users::Table)
        .and_where(Expr::col((Users::Table, Users::Username)).eq(username))
        .build(SqliteQueryBuilder)
}

/// Credentials for login: `(id, password_hash, password_salt)`.
pub fn get_credentials_by_username(username: &str) -> Built {
    Query::select()
        .columns([Users::Id, Users::PasswordHash, Users::PasswordSalt])
        .from(Users::Table)
        .and_where(Expr::col(Users::Username).eq(username))
        .build(SqliteQueryBuilder)
}

/// Credentials by id: `(password_hash, password_salt)`.
pub fn get_password_fields(id: &str) -> Built {
    Query::select()
        .columns([Users::PasswordHash, Users::PasswordSalt])
        .from(Users::Table)
        .and_where(Expr::col(Users::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn username_exists(username: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Users::Table)
        .and_where(Expr::col(Users::Username).eq(username))
        .build(SqliteQueryBuilder)
}

pub fn list_by_company(company_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    user_columns(&mut q);
    q.from(Users::Table)
        .and_where(Expr::col((Users::Table, Users::CompanyId)).eq(company_id))
        .order_by((Users::Table, Users::Username), Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn list_ids_by_company(company_id: &str) -> Built {
    Query::select()
        .column(Users::Id)
        .from(Users::Table)
        .and_where(Expr::col(Users::CompanyId).eq(company_id))
        .build(SqliteQueryBuilder)
}

pub fn count_by_company(company_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Users::Table)
        .and_where(Expr::col(Users::CompanyId).eq(company_id))
        .build(SqliteQueryBuilder)
}

// ── Writes ─────────────────────────────────────────────────────────────────

pub fn insert(id: &str, user: &NewUser, created_at: &str) -> Built {
    Query::insert()
        .into_table(Users::Table)
        .columns([
            Users::Id,
            Users::Username,
            Users::Email,
            Users::FirstName,
            Users::LastName,
            Users::Phone,
            Users::Role,
            Users::PasswordHash,
            Users::PasswordSalt,
            Users::CreatedAt,
        ])
        .values_panic([
            id.into(),
            user.username.as_str().into(),
            user.email.as_str().into(),
            user.first_name.as_str().into(),
            user.last_name.as_str().into(),
            user.phone.clone().into(),
            user.role.as_str().into(),
            user.password_hash.as_str().into(),
            user.password_salt.as_str().into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Write back the mutable profile fields of `user`.
pub fn update_profile(user: &User) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::Email, user.email.as_str())
        .value(Users::FirstName, user.first_name.as_str())
        .value(Users::LastName, user.last_name.as_str())
        .value(Users::Phone, user.phone.clone())
        .value(Users::Role, user.role.as_str())
        .and_where(Expr::col(Users::Id).eq(user.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn update_password(id: &str, password_hash: &str, password_salt: &str) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::PasswordHash, password_hash)
        .value(Users::PasswordSalt, password_salt)
        .and_where(Expr::col(Users::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Attach a user to a company, or detach with `None`.
pub fn set_company(id: &str, company_id: Option<&str>) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::CompanyId, company_id.map(str::to_string))
        .and_where(Expr::col(Users::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Users::Table)
        .and_where(Expr::col(Users::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_company(company_id: &str) -> Built {
    Query::delete()
        .from_table(Users::Table)
        .and_where(Expr::col(Users::CompanyId).eq(company_id))
        .build(SqliteQueryBuilder)
}

// ── Dangling references ────────────────────────────────────────────────────

/// Drop a user from every project roster.
pub fn remove_from_all_projects(user_id: &str) -> Built {
    Query::delete()
        .from_table(ProjectMembers::Table)
        .and_where(Expr::col(ProjectMembers::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Drop a user from the rosters of one company's projects.
pub fn remove_from_company_projects(user_id: &str, company_id: &str) -> Built {
    Query::delete()
        .from_table(ProjectMembers::Table)
        .and_where(Expr::col(ProjectMembers::UserId).eq(user_id))
        .and_where(
            Expr::col(ProjectMembers::ProjectId).in_subquery(company_project_ids(company_id)),
        )
        .build(SqliteQueryBuilder)
}

pub fn unassign_all_tasks(user_id: &str) -> Built {
    Query::update()
        .table(Tasks::Table)
        .value(Tasks::AssignedTo, Option::<String>::None)
        .and_where(Expr::col(Tasks::AssignedTo).eq(user_id))
        .build(SqliteQueryBuilder)
}

pub fn unassign_company_tasks(user_id: &str, company_id: &str) -> Built {
    Query::update()
        .table(Tasks::Table)
        .value(Tasks::AssignedTo, Option::<String>::None)
        .and_where(Expr::col(Tasks::AssignedTo).eq(user_id))
        .and_where(Expr::col(Tasks::ProjectId).in_subquery(company_project_ids(company_id)))
        .build(SqliteQueryBuilder)
}

fn company_project_ids(company_id: &str) -> sea_query::SelectStatement {
    Query::select()
        .column(Projects::Id)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::CompanyId).eq(company_id))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_username_sql() {
        let (sql, values) = get_by_username("ada");
        assert!(sql.starts_with("SELECT \"users\".\"id\", \"users\".\"username\""));
        assert!(sql.contains("WHERE \"users\".\"username\" = ?"));
        assert_eq!(values.0.len(), 1);
    }

    #[test]
    fn test_remove_from_company_projects_uses_subquery() {
        let (sql, values) = remove_from_company_projects("u1", "c1");
        assert!(sql.starts_with("DELETE FROM \"project_members\""));
        assert!(sql.contains("IN (SELECT \"id\" FROM \"projects\""));
        assert_eq!(values.0.len(), 2);
    }
}
