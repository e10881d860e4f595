use rusqlite::{Connection, Row};
use sitework_api::db::tasks as sql;
use sitework_core::{NewTask, Task, TaskPatch};

use crate::error::{OptionalRow, Result};
use crate::projects::{project_company, require_company_user};
use crate::sql::{parse_col, parse_opt_col, sq_count, sq_execute, sq_query_map, sq_query_row};
use crate::{Store, StoreError, new_id, now_rfc3339};

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        assigned_to: row.get(4)?,
        status: parse_col(row, 5)?,
        priority: parse_col(row, 6)?,
        due_date: parse_opt_col(row, 7)?,
        created_at: row.get(8)?,
    })
}

fn load_task(conn: &Connection, id: &str) -> Result<Task> {
    sq_query_row(conn, sql::get_by_id(id), task_from_row).or_not_found("task")
}

impl Store {
    /// Create a task. The assignee, if any, must belong to the project's
    /// company.
    pub fn create_task(&self, task: &NewTask) -> Result<Task> {
        let conn = self.conn();
        let company_id = project_company(&conn, &task.project_id)?;
        if let Some(assignee) = &task.assigned_to {
            require_company_user(&conn, assignee, &company_id)?;
        }
        let id = new_id();
        sq_execute(&conn, sql::insert(&id, task, &now_rfc3339()))?;
        load_task(&conn, &id)
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        load_task(&self.conn(), id)
    }

    /// Tasks of a project, soonest due first.
    pub fn list_project_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn();
        project_company(&conn, project_id)?;
        Ok(sq_query_map(
            &conn,
            sql::list_by_project(project_id),
            task_from_row,
        )?)
    }

    /// Tasks of a project that are not done yet.
    pub fn count_open_tasks(&self, project_id: &str) -> Result<usize> {
        Ok(sq_count(
            &self.conn(),
            sql::count_open_by_project(project_id),
        )?)
    }

    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let conn = self.conn();
        let mut task = load_task(&conn, id)?;
        if let Some(Some(assignee)) = &patch.assigned_to {
            let company_id = project_company(&conn, &task.project_id)?;
            require_company_user(&conn, assignee, &company_id)?;
        }
        patch.apply(&mut task);
        sq_execute(&conn, sql::update(&task))?;
        Ok(task)
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        if sq_execute(&self.conn(), sql::delete(id))? == 0 {
            return Err(StoreError::NotFound("task"));
        }
        Ok(())
    }
}
