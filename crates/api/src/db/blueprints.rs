//! Blueprint query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};
use sitework_core::{Blueprint, NewBlueprint};

use super::Built;
use super::tables::Blueprints;

fn blueprint_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column(Blueprints::Id)
        .column(Blueprints::ProjectId)
        .column(Blueprints::Title)
        .column(Blueprints::FileUrl)
        .column(Blueprints::Version)
        .column(Blueprints::UploadedBy)
        .column(Blueprints::CreatedAt)
}

pub fn insert(id: &str, blueprint: &NewBlueprint, created_at: &str) -> Built {
    Query::insert()
        .into_table(Blueprints::Table)
        .columns([
            Blueprints::Id,
            Blueprints::ProjectId,
            Blueprints::Title,
            Blueprints::FileUrl,
            Blueprints::Version,
            Blueprints::UploadedBy,
            Blueprints::CreatedAt,
        ])
        .values_panic([
            id.into(),
            blueprint.project_id.as_str().into(),
            blueprint.title.as_str().into(),
            blueprint.file_url.as_str().into(),
            blueprint.version.into(),
            blueprint.uploaded_by.as_str().into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    blueprint_columns(&mut q);
    q.from(Blueprints::Table)
        .and_where(Expr::col(Blueprints::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Blueprints of a project, grouped by title with the newest version first.
pub fn list_by_project(project_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    blueprint_columns(&mut q);
    q.from(Blueprints::Table)
        .and_where(Expr::col(Blueprints::ProjectId).eq(project_id))
        .order_by(Blueprints::Title, Order::Asc)
        .order_by(Blueprints::Version, Order::Desc)
        .build(SqliteQueryBuilder)
}

pub fn count_by_project(project_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Blueprints::Table)
        .and_where(Expr::col(Blueprints::ProjectId).eq(project_id))
        .build(SqliteQueryBuilder)
}

pub fn update(blueprint: &Blueprint) -> Built {
    Query::update()
        .table(Blueprints::Table)
        .value(Blueprints::Title, blueprint.title.as_str())
        .value(Blueprints::FileUrl, blueprint.file_url.as_str())
        .value(Blueprints::Version, blueprint.version)
        .and_where(Expr::col(Blueprints::Id).eq(blueprint.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Blueprints::Table)
        .and_where(Expr::col(Blueprints::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_project(project_id: &str) -> Built {
    Query::delete()
        .from_table(Blueprints::Table)
        .and_where(Expr::col(Blueprints::ProjectId).eq(project_id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_orders_newest_version_first() {
        let (sql, values) = list_by_project("p1");
        assert!(sql.contains("ORDER BY \"title\" ASC, \"version\" DESC"));
        assert_eq!(values.0.len(), 1);
    }
}
