use serde::Deserialize;
use validator::Validate;

use crate::domain::project::{NewProject, ProjectPriority};

#[derive(Deserialize, Validate)]
pub struct AddProjectForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: String,
}

impl From<AddProjectForm> for NewProject {
    fn from(form: AddProjectForm) -> Self {
        let tags = form.tags.split(',').map(str::to_string).collect();
        NewProject::new(
            form.name,
            form.description,
            form.category,
            ProjectPriority::parse(&form.priority),
            tags,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_converts_into_new_project() {
        let form = AddProjectForm {
            name: " Reporting ".to_string(),
            description: "Daily reporting scripts".to_string(),
            category: "reports".to_string(),
            priority: "high".to_string(),
            tags: "sql, daily,,sql".to_string(),
        };
        let project: NewProject = form.into();
        assert_eq!(project.name, "Reporting");
        assert_eq!(project.priority, ProjectPriority::High);
        assert_eq!(project.tags, vec!["sql".to_string(), "daily".to_string()]);
    }
}
