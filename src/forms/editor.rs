use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use validator::Validate;

use crate::domain::script::NewSqlScript;

/// Console submission from the editor page.
#[derive(Deserialize)]
pub struct ExecuteForm {
    pub sql: String,
}

/// Save-current-SQL form under the console.
#[derive(Deserialize, Validate)]
pub struct SaveScriptForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Empty string means "no project".
    #[serde(default)]
    pub project_id: String,
    pub sql: String,
}

impl From<SaveScriptForm> for NewSqlScript {
    fn from(form: SaveScriptForm) -> Self {
        let project_id = form.project_id.trim().parse::<i32>().ok().filter(|id| *id > 0);
        NewSqlScript::new(project_id, form.name, form.description, form.sql)
    }
}

/// Upload of a `.sql` file as a new saved script.
#[derive(MultipartForm)]
pub struct UploadScriptForm {
    #[multipart(limit = "1MB")]
    pub file: TempFile,
    /// Optional name override; defaults to the uploaded file name.
    pub name: Option<Text<String>>,
}

/// Export request re-running the query with a download format.
#[derive(Deserialize)]
pub struct ExportForm {
    pub sql: String,
    /// "csv" or "json".
    pub format: String,
}
