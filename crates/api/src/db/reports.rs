//! Report query builders. Issues live in the `issues` JSON column.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};
use sitework_core::{NewReport, Report};

use super::Built;
use super::tables::Reports;

fn report_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column(Reports::Id)
        .column(Reports::ProjectId)
        .column(Reports::AuthorId)
        .column(Reports::Title)
        .column(Reports::Date)
        .column(Reports::Summary)
        .column(Reports::Weather)
        .column(Reports::Issues)
        .column(Reports::CreatedAt)
}

/// `issues_json` is the already-serialized embedded issue list.
pub fn insert(id: &str, report: &NewReport, issues_json: &str, created_at: &str) -> Built {
    Query::insert()
        .into_table(Reports::Table)
        .columns([
            Reports::Id,
            Reports::ProjectId,
            Reports::AuthorId,
            Reports::Title,
            Reports::Date,
            Reports::Summary,
            Reports::Weather,
            Reports::Issues,
            Reports::CreatedAt,
        ])
        .values_panic([
            id.into(),
            report.project_id.as_str().into(),
            report.author_id.as_str().into(),
            report.title.as_str().into(),
            report.date.to_string().into(),
            report.summary.clone().into(),
            report.weather.clone().into(),
            issues_json.into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    report_columns(&mut q);
    q.from(Reports::Table)
        .and_where(Expr::col(Reports::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Reports of a project, most recent site date first.
pub fn list_by_project(project_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    report_columns(&mut q);
    q.from(Reports::Table)
        .and_where(Expr::col(Reports::ProjectId).eq(project_id))
        .order_by(Reports::Date, Order::Desc)
        .order_by(Reports::CreatedAt, Order::Desc)
        .build(SqliteQueryBuilder)
}

/// Write back the mutable fields of `report`, issues included.
pub fn update(report: &Report, issues_json: &str) -> Built {
    Query::update()
        .table(Reports::Table)
        .value(Reports::Title, report.title.as_str())
        .value(Reports::Date, report.date.to_string())
        .value(Reports::Summary, report.summary.clone())
        .value(Reports::Weather, report.weather.clone())
        .value(Reports::Issues, issues_json)
        .and_where(Expr::col(Reports::Id).eq(report.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Reports::Table)
        .and_where(Expr::col(Reports::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_project(project_id: &str) -> Built {
    Query::delete()
        .from_table(Reports::Table)
        .and_where(Expr::col(Reports::ProjectId).eq(project_id))
        .build(SqliteQueryBuilder)
}
