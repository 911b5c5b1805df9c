//! Project management services.

use validator::Validate;

use crate::domain::activity::NewActivityEntry;
use crate::domain::project::{NewProject, Project, ProjectStatus};
use crate::domain::types::ProjectId;
use crate::dto::projects::{ProjectWithScripts, ProjectsPageData, ProjectsQuery};
use crate::forms::projects::AddProjectForm;
use crate::models::auth::{ACCESS_ROLE, ADMIN_ROLE, AuthenticatedUser};
use crate::pagination::Paginated;
use crate::repository::{
    ActivityWriter, ProjectListQuery, ProjectReader, ProjectWriter, ScriptListQuery, ScriptReader,
    SettingsReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Loads the filtered project listing with each project's saved scripts.
pub fn load_projects_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProjectsQuery,
) -> ServiceResult<ProjectsPageData>
where
    R: ProjectReader + ScriptReader + SettingsReader + ?Sized,
{
    ensure_role(user, ACCESS_ROLE)?;

    let per_page = repo.load_settings()?.items_per_page;
    let page = query.page.unwrap_or(1);
    let mut list_query = ProjectListQuery::new().paginate(page, per_page);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let status_filter = match query.status.as_deref() {
        Some("active") => Some(ProjectStatus::Active),
        Some("inactive") => Some(ProjectStatus::Inactive),
        _ => None,
    };
    if let Some(status) = status_filter {
        list_query = list_query.status(status);
    }

    let (total, projects) = repo.list_projects(list_query).map_err(|err| {
        log::error!("Failed to list projects: {err}");
        err
    })?;

    let mut items = Vec::with_capacity(projects.len());
    for (project, script_count) in projects {
        // One page of projects at most, so the per-project lookups stay cheap.
        let scripts = match ProjectId::new(project.id) {
            Ok(id) => repo.list_scripts(ScriptListQuery::new().project(id))?.1,
            Err(_) => Vec::new(),
        };
        items.push(ProjectWithScripts {
            project,
            script_count,
            scripts,
        });
    }
    let projects = Paginated::new(items, page, total.div_ceil(per_page));

    Ok(ProjectsPageData {
        projects,
        total,
        search_query,
        status_filter: status_filter.map(|s| s.as_str().to_string()),
    })
}

/// Validates the add-project form and persists a new project.
pub fn add_project<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProjectForm,
) -> ServiceResult<Project>
where
    R: ProjectWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate project form: {err}");
        return Err(ServiceError::Form(
            "name and description are required".to_string(),
        ));
    }

    let new_project: NewProject = form.into();
    let project = repo.create_project(&new_project).map_err(|err| {
        log::error!("Failed to add a project: {err}");
        err
    })?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Project created").details(&project.name))?;

    Ok(project)
}

/// Flips a project between active and inactive.
pub fn toggle_project<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: ProjectId,
) -> ServiceResult<Project>
where
    R: ProjectReader + ProjectWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let project = repo
        .get_project_by_id(id)?
        .ok_or(ServiceError::NotFound)?;
    let updated = repo.set_project_status(id, project.status.toggled())?;
    repo.log_activity(
        &NewActivityEntry::new(&user.sub, "Project status changed")
            .details(format!("{} -> {}", updated.name, updated.status.as_str())),
    )?;

    Ok(updated)
}

/// Deletes a project; its scripts survive with the reference cleared.
pub fn delete_project<R>(repo: &R, user: &AuthenticatedUser, id: ProjectId) -> ServiceResult<()>
where
    R: ProjectReader + ProjectWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let project = repo
        .get_project_by_id(id)?
        .ok_or(ServiceError::NotFound)?;
    repo.delete_project(id)?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Project deleted").details(&project.name))?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    fn demo_user() -> AuthenticatedUser {
        AuthenticatedUser::demo()
    }

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser::admin("admin", "admin@localhost", 3600)
    }

    #[test]
    fn add_project_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_project().times(0);

        let form = AddProjectForm {
            name: "Reports".to_string(),
            description: "reporting scripts".to_string(),
            category: String::new(),
            priority: String::new(),
            tags: String::new(),
        };
        let result = add_project(&repo, &demo_user(), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_project_rejects_blank_names() {
        let mut repo = MockRepository::new();
        repo.expect_create_project().times(0);

        let form = AddProjectForm {
            name: String::new(),
            description: "reporting scripts".to_string(),
            category: String::new(),
            priority: String::new(),
            tags: String::new(),
        };
        let result = add_project(&repo, &admin_user(), form);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn listing_includes_scripts_per_project() {
        use crate::domain::script::SqlScript;

        let mut repo = MockRepository::new();
        repo.expect_load_settings()
            .returning(|| Ok(Default::default()));
        repo.expect_list_projects().returning(|_| {
            let now = chrono::Utc::now().naive_utc();
            let project = Project {
                id: 1,
                name: "Reports".to_string(),
                description: String::new(),
                category: String::new(),
                priority: Default::default(),
                status: Default::default(),
                tags: vec![],
                created_at: now,
                updated_at: now,
            };
            Ok((1, vec![(project, 1)]))
        });
        repo.expect_list_scripts().returning(|_| {
            let now = chrono::Utc::now().naive_utc();
            let script = SqlScript {
                id: 7,
                project_id: Some(1),
                name: "daily".to_string(),
                description: String::new(),
                body: "SELECT 1".to_string(),
                created_at: now,
                updated_at: now,
            };
            Ok((1, vec![script]))
        });

        let data = load_projects_page(&repo, &admin_user(), ProjectsQuery::default()).unwrap();
        assert_eq!(data.total, 1);
        assert_eq!(data.projects.items[0].scripts.len(), 1);
        assert_eq!(data.projects.items[0].script_count, 1);
    }

    #[test]
    fn toggle_missing_project_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_project_by_id().returning(|_| Ok(None));
        repo.expect_set_project_status().times(0);

        let id = ProjectId::new(9).unwrap();
        let result = toggle_project(&repo, &admin_user(), id);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
