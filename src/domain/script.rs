use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::Description;

/// A saved SQL script, optionally attached to a project.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SqlScript {
    pub id: i32,
    pub project_id: Option<i32>,
    pub name: String,
    pub description: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSqlScript {
    pub project_id: Option<i32>,
    pub name: String,
    pub description: String,
    pub body: String,
}

impl NewSqlScript {
    #[must_use]
    pub fn new(
        project_id: Option<i32>,
        name: String,
        description: String,
        body: String,
    ) -> Self {
        Self {
            project_id,
            name: name.trim().to_string(),
            // The SQL body is stored verbatim; only the description is rendered as HTML.
            description: Description::new(description).into_inner(),
            body: body.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateSqlScript {
    pub name: String,
    pub description: String,
    pub body: String,
}

impl UpdateSqlScript {
    #[must_use]
    pub fn new(name: String, description: String, body: String) -> Self {
        Self {
            name: name.trim().to_string(),
            description: Description::new(description).into_inner(),
            body: body.trim().to_string(),
        }
    }
}
