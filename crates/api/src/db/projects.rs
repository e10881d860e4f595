//! Project + project member query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};
use sitework_core::{NewProject, Project};

use super::Built;
use super::tables::{ProjectMembers, Projects};

/// Column list for project SELECT queries. Members are loaded separately.
fn project_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column(Projects::Id)
        .column(Projects::CompanyId)
        .column(Projects::Name)
        .column(Projects::Description)
        .column(Projects::Location)
        .column(Projects::Budget)
        .column(Projects::Status)
        .column(Projects::StartDate)
        .column(Projects::EndDate)
        .column(Projects::CreatedAt)
}

// ── Project queries ────────────────────────────────────────────────────────

pub fn insert(id: &str, project: &NewProject, created_at: &str) -> Built {
    Query::insert()
        .into_table(Projects::Table)
        .columns([
            Projects::Id,
            Projects::CompanyId,
            Projects::Name,
            Projects::Description,
            Projects::Location,
            Projects::Budget,
            Projects::Status,
            Projects::StartDate,
            Projects::EndDate,
            Projects::CreatedAt,
        ])
        .values_panic([
            id.into(),
            project.company_id.as_str().into(),
            project.name.as_str().into(),
            project.description.clone().into(),
            project.location.clone().into(),
            project.budget.into(),
            project.status.as_str().into(),
            project.start_date.map(|d| d.to_string()).into(),
            project.end_date.map(|d| d.to_string()).into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    project_columns(&mut q);
    q.from(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn list_by_company(company_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    project_columns(&mut q);
    q.from(Projects::Table)
        .and_where(Expr::col(Projects::CompanyId).eq(company_id))
        .order_by(Projects::CreatedAt, Order::Desc)
        .order_by(Projects::Name, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn list_ids_by_company(company_id: &str) -> Built {
    Query::select()
        .column(Projects::Id)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::CompanyId).eq(company_id))
        .build(SqliteQueryBuilder)
}

pub fn count_by_company(company_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Projects::Table)
        .and_where(Expr::col(Projects::CompanyId).eq(company_id))
        .build(SqliteQueryBuilder)
}

/// The owning company of a project.
pub fn get_company_id(id: &str) -> Built {
    Query::select()
        .column(Projects::CompanyId)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Write back the mutable fields of `project`.
pub fn update(project: &Project) -> Built {
    Query::update()
        .table(Projects::Table)
        .value(Projects::Name, project.name.as_str())
        .value(Projects::Description, project.description.clone())
        .value(Projects::Location, project.location.clone())
        .value(Projects::Budget, project.budget)
        .value(Projects::Status, project.status.as_str())
        .value(Projects::StartDate, project.start_date.map(|d| d.to_string()))
        .value(Projects::EndDate, project.end_date.map(|d| d.to_string()))
        .and_where(Expr::col(Projects::Id).eq(project.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}

// ── Member queries ─────────────────────────────────────────────────────────

pub fn member_insert(project_id: &str, user_id: &str, added_at: &str) -> Built {
    Query::insert()
        .into_table(ProjectMembers::Table)
        .columns([
            ProjectMembers::ProjectId,
            ProjectMembers::UserId,
            ProjectMembers::AddedAt,
        ])
        .values_panic([project_id.into(), user_id.into(), added_at.into()])
        .build(SqliteQueryBuilder)
}

pub fn member_delete(project_id: &str, user_id: &str) -> Built {
    Query::delete()
        .from_table(ProjectMembers::Table)
        .and_where(Expr::col(ProjectMembers::ProjectId).eq(project_id))
        .and_where(Expr::col(ProjectMembers::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

pub fn member_exists(project_id: &str, user_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(ProjectMembers::Table)
        .and_where(Expr::col(ProjectMembers::ProjectId).eq(project_id))
        .and_where(Expr::col(ProjectMembers::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Member user ids of a project in insertion order.
pub fn member_ids(project_id: &str) -> Built {
    Query::select()
        .column(ProjectMembers::UserId)
        .from(ProjectMembers::Table)
        .and_where(Expr::col(ProjectMembers::ProjectId).eq(project_id))
        .order_by(ProjectMembers::AddedAt, Order::Asc)
        .order_by(Alias::new("rowid"), Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn members_delete_all(project_id: &str) -> Built {
    Query::delete()
        .from_table(ProjectMembers::Table)
        .and_where(Expr::col(ProjectMembers::ProjectId).eq(project_id))
        .build(SqliteQueryBuilder)
}
