use rusqlite::{Connection, Row};
use sitework_api::db::blueprints as sql;
use sitework_core::{Blueprint, BlueprintPatch, NewBlueprint};

use crate::error::{OptionalRow, Result};
use crate::projects::project_company;
use crate::sql::{sq_execute, sq_query_map, sq_query_row};
use crate::users::load_user;
use crate::{Store, StoreError, new_id, now_rfc3339};

fn blueprint_from_row(row: &Row<'_>) -> rusqlite::Result<Blueprint> {
    Ok(Blueprint {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        file_url: row.get(3)?,
        version: row.get(4)?,
        uploaded_by: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn load_blueprint(conn: &Connection, id: &str) -> Result<Blueprint> {
    sq_query_row(conn, sql::get_by_id(id), blueprint_from_row).or_not_found("blueprint")
}

impl Store {
    pub fn create_blueprint(&self, blueprint: &NewBlueprint) -> Result<Blueprint> {
        let conn = self.conn();
        project_company(&conn, &blueprint.project_id)?;
        load_user(&conn, &blueprint.uploaded_by)?;
        let id = new_id();
        sq_execute(&conn, sql::insert(&id, blueprint, &now_rfc3339()))?;
        load_blueprint(&conn, &id)
    }

    pub fn get_blueprint(&self, id: &str) -> Result<Blueprint> {
        load_blueprint(&self.conn(), id)
    }

    pub fn list_project_blueprints(&self, project_id: &str) -> Result<Vec<Blueprint>> {
        let conn = self.conn();
        project_company(&conn, project_id)?;
        Ok(sq_query_map(
            &conn,
            sql::list_by_project(project_id),
            blueprint_from_row,
        )?)
    }

    pub fn update_blueprint(&self, id: &str, patch: BlueprintPatch) -> Result<Blueprint> {
        let conn = self.conn();
        let mut blueprint = load_blueprint(&conn, id)?;
        patch.apply(&mut blueprint);
        sq_execute(&conn, sql::update(&blueprint))?;
        Ok(blueprint)
    }

    pub fn delete_blueprint(&self, id: &str) -> Result<()> {
        if sq_execute(&self.conn(), sql::delete(id))? == 0 {
            return Err(StoreError::NotFound("blueprint"));
        }
        Ok(())
    }
}
