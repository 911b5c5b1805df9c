use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::Description;

/// Lifecycle state of a script project.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
        }
    }

    /// Parses a stored status string, defaulting unknown values to active.
    pub fn parse(value: &str) -> Self {
        match value {
            "inactive" => ProjectStatus::Inactive,
            _ => ProjectStatus::Active,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ProjectStatus::Active => ProjectStatus::Inactive,
            ProjectStatus::Inactive => ProjectStatus::Active,
        }
    }
}

/// Priority label attached to a project.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl ProjectPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectPriority::Low => "low",
            ProjectPriority::Medium => "medium",
            ProjectPriority::High => "high",
            ProjectPriority::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "low" => ProjectPriority::Low,
            "high" => ProjectPriority::High,
            "critical" => ProjectPriority::Critical,
            _ => ProjectPriority::Medium,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: ProjectPriority,
    pub status: ProjectStatus,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: ProjectPriority,
    pub tags: Vec<String>,
}

impl NewProject {
    #[must_use]
    pub fn new(
        name: String,
        description: String,
        category: String,
        priority: ProjectPriority,
        tags: Vec<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            description: Description::new(description).into_inner(),
            category: category.trim().to_string(),
            priority,
            tags: normalize_tags(tags),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateProject {
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: ProjectPriority,
    pub tags: Vec<String>,
}

impl UpdateProject {
    #[must_use]
    pub fn new(
        name: String,
        description: String,
        category: String,
        priority: ProjectPriority,
        tags: Vec<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            description: Description::new(description).into_inner(),
            category: category.trim().to_string(),
            priority,
            tags: normalize_tags(tags),
        }
    }
}

/// Trims tags, drops empties, and removes duplicates preserving order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_and_toggles() {
        assert_eq!(ProjectStatus::parse("inactive"), ProjectStatus::Inactive);
        assert_eq!(ProjectStatus::parse("garbage"), ProjectStatus::Active);
        assert_eq!(ProjectStatus::Active.toggled(), ProjectStatus::Inactive);
    }

    #[test]
    fn new_project_normalizes_tags() {
        let project = NewProject::new(
            " Reports ".to_string(),
            String::new(),
            "analysis".to_string(),
            ProjectPriority::High,
            vec![
                " SQL ".to_string(),
                "sql".to_string(),
                String::new(),
                "backup".to_string(),
            ],
        );
        assert_eq!(project.name, "Reports");
        assert_eq!(project.tags, vec!["sql".to_string(), "backup".to_string()]);
    }
}
