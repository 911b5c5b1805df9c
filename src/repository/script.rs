use chrono::Utc;
use diesel::prelude::*;

use crate::domain::script::{NewSqlScript, SqlScript, UpdateSqlScript};
use crate::domain::types::ScriptId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ScriptListQuery, ScriptReader, ScriptWriter};

fn base_query(
    query: &ScriptListQuery,
) -> crate::schema::scripts::BoxedQuery<'static, diesel::sqlite::Sqlite> {
    use crate::schema::scripts;

    let mut q = scripts::table.into_boxed();
    if let Some(project_id) = query.project_id {
        q = q.filter(scripts::project_id.eq(project_id.get()));
    }
    if let Some(term) = &query.search {
        let pattern = format!("%{term}%");
        q = q.filter(
            scripts::name
                .like(pattern.clone())
                .or(scripts::description.like(pattern)),
        );
    }
    q
}

impl ScriptReader for DieselRepository {
    fn get_script_by_id(&self, id: ScriptId) -> RepositoryResult<Option<SqlScript>> {
        use crate::models::script::SqlScript as DbSqlScript;
        use crate::schema::scripts;

        let mut conn = self.conn()?;
        let script = scripts::table
            .find(id.get())
            .first::<DbSqlScript>(&mut conn)
            .optional()?;

        Ok(script.map(Into::into))
    }

    fn list_scripts(&self, query: ScriptListQuery) -> RepositoryResult<(usize, Vec<SqlScript>)> {
        use crate::models::script::SqlScript as DbSqlScript;
        use crate::schema::scripts;

        let mut conn = self.conn()?;

        let total: i64 = base_query(&query).count().get_result(&mut conn)?;

        let mut items = base_query(&query).order(scripts::updated_at.desc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let scripts = items
            .load::<DbSqlScript>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total as usize, scripts))
    }
}

impl ScriptWriter for DieselRepository {
    fn create_script(&self, new_script: &NewSqlScript) -> RepositoryResult<SqlScript> {
        use crate::models::script::{NewSqlScript as DbNewSqlScript, SqlScript as DbSqlScript};
        use crate::schema::scripts;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let created = diesel::insert_into(scripts::table)
            .values(DbNewSqlScript::from_domain(new_script, now))
            .get_result::<DbSqlScript>(&mut conn)?;

        Ok(created.into())
    }

    fn update_script(
        &self,
        id: ScriptId,
        updates: &UpdateSqlScript,
    ) -> RepositoryResult<SqlScript> {
        use crate::models::script::{SqlScript as DbSqlScript, UpdateSqlScript as DbUpdateSqlScript};
        use crate::schema::scripts;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(scripts::table.find(id.get()))
            .set(DbUpdateSqlScript::from_domain(updates, now))
            .get_result::<DbSqlScript>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_script(&self, id: ScriptId) -> RepositoryResult<()> {
        use crate::schema::scripts;

        let mut conn = self.conn()?;
        diesel::delete(scripts::table.find(id.get())).execute(&mut conn)?;

        Ok(())
    }
}
