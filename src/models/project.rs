use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::project::{
    NewProject as DomainNewProject, Project as DomainProject, ProjectPriority, ProjectStatus,
    UpdateProject as DomainUpdateProject,
};

/// Diesel model for [`crate::domain::project::Project`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::projects)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Project`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data used when updating a [`Project`] record.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::projects)]
pub struct UpdateProject<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub tags: String,
    pub updated_at: NaiveDateTime,
}

impl From<Project> for DomainProject {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            category: project.category,
            priority: ProjectPriority::parse(&project.priority),
            status: ProjectStatus::parse(&project.status),
            tags: split_tags(&project.tags),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl<'a> NewProject<'a> {
    pub fn from_domain(project: &'a DomainNewProject, now: NaiveDateTime) -> Self {
        Self {
            name: &project.name,
            description: &project.description,
            category: &project.category,
            priority: project.priority.as_str(),
            status: ProjectStatus::Active.as_str(),
            tags: join_tags(&project.tags),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateProject<'a> {
    pub fn from_domain(project: &'a DomainUpdateProject, now: NaiveDateTime) -> Self {
        Self {
            name: &project.name,
            description: &project.description,
            category: &project.category,
            priority: project.priority.as_str(),
            tags: join_tags(&project.tags),
            updated_at: now,
        }
    }
}

/// Tags are stored as one comma-separated column.
pub(crate) fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

pub(crate) fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn tags_round_trip_through_storage() {
        let tags = vec!["sql".to_string(), "backup".to_string()];
        assert_eq!(split_tags(&join_tags(&tags)), tags);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn project_into_domain_parses_enums() {
        let now = Utc::now().naive_utc();
        let row = Project {
            id: 1,
            name: "Maintenance".to_string(),
            description: "weekly jobs".to_string(),
            category: "maintenance".to_string(),
            priority: "critical".to_string(),
            status: "inactive".to_string(),
            tags: "sql, vacuum".to_string(),
            created_at: now,
            updated_at: now,
        };
        let domain: DomainProject = row.into();
        assert_eq!(domain.priority, ProjectPriority::Critical);
        assert_eq!(domain.status, ProjectStatus::Inactive);
        assert_eq!(domain.tags, vec!["sql".to_string(), "vacuum".to_string()]);
    }
}
