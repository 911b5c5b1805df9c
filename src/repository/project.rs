use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::project::{NewProject, Project, ProjectStatus, UpdateProject};
use crate::domain::types::ProjectId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProjectListQuery, ProjectReader, ProjectWriter};

fn base_query(
    query: &ProjectListQuery,
) -> crate::schema::projects::BoxedQuery<'static, diesel::sqlite::Sqlite> {
    use crate::schema::projects;

    let mut q = projects::table.into_boxed();
    if let Some(status) = query.status {
        q = q.filter(projects::status.eq(status.as_str()));
    }
    if let Some(term) = &query.search {
        let pattern = format!("%{term}%");
        q = q.filter(
            projects::name
                .like(pattern.clone())
                .or(projects::tags.like(pattern)),
        );
    }
    q
}

impl ProjectReader for DieselRepository {
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        use crate::models::project::Project as DbProject;
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let project = projects::table
            .find(id.get())
            .first::<DbProject>(&mut conn)
            .optional()?;

        Ok(project.map(Into::into))
    }

    fn list_projects(
        &self,
        query: ProjectListQuery,
    ) -> RepositoryResult<(usize, Vec<(Project, i64)>)> {
        use crate::models::project::Project as DbProject;
        use crate::schema::{projects, scripts};

        let mut conn = self.conn()?;

        let total: i64 = base_query(&query).count().get_result(&mut conn)?;

        let mut items = base_query(&query).order(projects::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let items = items.load::<DbProject>(&mut conn)?;

        // Script counts fetched separately to keep the filterable query simple.
        let ids: Vec<Option<i32>> = items.iter().map(|p| Some(p.id)).collect();
        let counts: HashMap<i32, i64> = scripts::table
            .filter(scripts::project_id.eq_any(&ids))
            .group_by(scripts::project_id)
            .select((scripts::project_id, diesel::dsl::count_star()))
            .load::<(Option<i32>, i64)>(&mut conn)?
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (id, count)))
            .collect();

        let projects = items
            .into_iter()
            .map(|p| {
                let count = counts.get(&p.id).copied().unwrap_or(0);
                (Project::from(p), count)
            })
            .collect();

        Ok((total as usize, projects))
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project> {
        use crate::models::project::{NewProject as DbNewProject, Project as DbProject};
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let created = diesel::insert_into(projects::table)
            .values(DbNewProject::from_domain(new_project, now))
            .get_result::<DbProject>(&mut conn)?;

        Ok(created.into())
    }

    fn update_project(&self, id: ProjectId, updates: &UpdateProject) -> RepositoryResult<Project> {
        use crate::models::project::{Project as DbProject, UpdateProject as DbUpdateProject};
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(projects::table.find(id.get()))
            .set(DbUpdateProject::from_domain(updates, now))
            .get_result::<DbProject>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> RepositoryResult<Project> {
        use crate::models::project::Project as DbProject;
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(projects::table.find(id.get()))
            .set((
                projects::status.eq(status.as_str()),
                projects::updated_at.eq(now),
            ))
            .get_result::<DbProject>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_project(&self, id: ProjectId) -> RepositoryResult<()> {
        use crate::schema::projects;

        let mut conn = self.conn()?;
        // Scripts keep existing with their project reference cleared (FK is
        // ON DELETE SET NULL).
        diesel::delete(projects::table.find(id.get())).execute(&mut conn)?;

        Ok(())
    }
}
