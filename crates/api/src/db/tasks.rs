//! Task query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};
use sitework_core::{NewTask, Task};

use super::Built;
use super::tables::Tasks;

fn task_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column(Tasks::Id)
        .column(Tasks::ProjectId)
        .column(Tasks::Title)
        .column(Tasks::Description)
        .column(Tasks::AssignedTo)
        .column(Tasks::Status)
        .column(Tasks::Priority)
        .column(Tasks::DueDate)
        .column(Tasks::CreatedAt)
}

pub fn insert(id: &str, task: &NewTask, created_at: &str) -> Built {
    Query::insert()
        .into_table(Tasks::Table)
        .columns([
            Tasks::Id,
            Tasks::ProjectId,
            Tasks::Title,
            Tasks::Description,
            Tasks::AssignedTo,
            Tasks::Status,
            Tasks::Priority,
            Tasks::DueDate,
            Tasks::CreatedAt,
        ])
        .values_panic([
            id.into(),
            task.project_id.as_str().into(),
            task.title.as_str().into(),
            task.description.clone().into(),
            task.assigned_to.clone().into(),
            task.status.as_str().into(),
            task.priority.as_str().into(),
            task.due_date.map(|d| d.to_string()).into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    task_columns(&mut q);
    q.from(Tasks::Table)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Tasks of a project: earliest due date first, undated last.
pub fn list_by_project(project_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    task_columns(&mut q);
    q.from(Tasks::Table)
        .and_where(Expr::col(Tasks::ProjectId).eq(project_id))
        .order_by_expr(Expr::col(Tasks::DueDate).is_null().into(), Order::Asc)
        .order_by(Tasks::DueDate, Order::Asc)
        .order_by(Tasks::CreatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn count_open_by_project(project_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Tasks::Table)
        .and_where(Expr::col(Tasks::ProjectId).eq(project_id))
        .and_where(Expr::col(Tasks::Status).ne(sitework_core::TaskStatus::Done.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn update(task: &Task) -> Built {
    Query::update()
        .table(Tasks::Table)
        .value(Tasks::Title, task.title.as_str())
        .value(Tasks::Description, task.description.clone())
        .value(Tasks::AssignedTo, task.assigned_to.clone())
        .value(Tasks::Status, task.status.as_str())
        .value(Tasks::Priority, task.priority.as_str())
        .value(Tasks::DueDate, task.due_date.map(|d| d.to_string()))
        .and_where(Expr::col(Tasks::Id).eq(task.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Tasks::Table)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete_by_project(project_id: &str) -> Built {
    Query::delete()
        .from_table(Tasks::Table)
        .and_where(Expr::col(Tasks::ProjectId).eq(project_id))
        .build(SqliteQueryBuilder)
}
