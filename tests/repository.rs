use sqldeck::domain::activity::NewActivityEntry;
use sqldeck::domain::project::{NewProject, ProjectPriority, ProjectStatus, UpdateProject};
use sqldeck::domain::query::{NewQueryRecord, QueryStatus};
use sqldeck::domain::script::{NewSqlScript, UpdateSqlScript};
use sqldeck::domain::settings::AppSettings;
use sqldeck::domain::types::{ProjectId, ScriptId};
use sqldeck::repository::{
    ActivityReader, ActivityWriter, DieselRepository, ProjectListQuery, ProjectReader,
    ProjectWriter, QueryHistoryReader, QueryHistoryWriter, ScriptListQuery, ScriptReader,
    ScriptWriter, SettingsReader, SettingsWriter,
};

mod common;

#[test]
fn test_project_repository_crud() {
    let test_db = common::TestDb::new("test_project_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let reports = repo
        .create_project(&NewProject::new(
            "Reports".to_string(),
            "daily reporting".to_string(),
            "analysis".to_string(),
            ProjectPriority::High,
            vec!["sql".to_string(), "daily".to_string()],
        ))
        .unwrap();
    let cleanup = repo
        .create_project(&NewProject::new(
            "Cleanup".to_string(),
            "vacuum jobs".to_string(),
            "maintenance".to_string(),
            ProjectPriority::Low,
            vec![],
        ))
        .unwrap();

    assert_eq!(reports.status, ProjectStatus::Active);
    assert_eq!(reports.tags, vec!["sql".to_string(), "daily".to_string()]);

    let (total, items) = repo.list_projects(ProjectListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);

    let (search_total, search_items) = repo
        .list_projects(ProjectListQuery::new().search("Clean"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].0.name, "Cleanup");

    // Tag text is searched too.
    let (tag_total, _) = repo
        .list_projects(ProjectListQuery::new().search("daily"))
        .unwrap();
    assert_eq!(tag_total, 1);

    let cleanup_id = ProjectId::new(cleanup.id).unwrap();
    let toggled = repo
        .set_project_status(cleanup_id, ProjectStatus::Inactive)
        .unwrap();
    assert_eq!(toggled.status, ProjectStatus::Inactive);

    let (active_total, active_items) = repo
        .list_projects(ProjectListQuery::new().status(ProjectStatus::Active))
        .unwrap();
    assert_eq!(active_total, 1);
    assert_eq!(active_items[0].0.name, "Reports");

    let updated = repo
        .update_project(
            cleanup_id,
            &UpdateProject::new(
                "Cleanup v2".to_string(),
                "vacuum and analyze".to_string(),
                "maintenance".to_string(),
                ProjectPriority::Medium,
                vec!["vacuum".to_string()],
            ),
        )
        .unwrap();
    assert_eq!(updated.name, "Cleanup v2");
    assert_eq!(updated.priority, ProjectPriority::Medium);

    repo.delete_project(cleanup_id).unwrap();
    assert!(repo.get_project_by_id(cleanup_id).unwrap().is_none());

    let (total_after, _) = repo.list_projects(ProjectListQuery::new()).unwrap();
    assert_eq!(total_after, 1);
}

#[test]
fn test_script_repository_crud() {
    let test_db = common::TestDb::new("test_script_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let project = repo
        .create_project(&NewProject::new(
            "Maintenance".to_string(),
            "weekly jobs".to_string(),
            String::new(),
            ProjectPriority::Medium,
            vec![],
        ))
        .unwrap();
    let project_id = ProjectId::new(project.id).unwrap();

    let vacuum = repo
        .create_script(&NewSqlScript::new(
            Some(project.id),
            "vacuum".to_string(),
            "weekly vacuum".to_string(),
            "VACUUM ANALYZE".to_string(),
        ))
        .unwrap();
    repo.create_script(&NewSqlScript::new(
        None,
        "orphan".to_string(),
        String::new(),
        "SELECT 1".to_string(),
    ))
    .unwrap();

    let (total, _) = repo.list_scripts(ScriptListQuery::new()).unwrap();
    assert_eq!(total, 2);

    let (project_total, project_scripts) = repo
        .list_scripts(ScriptListQuery::new().project(project_id))
        .unwrap();
    assert_eq!(project_total, 1);
    assert_eq!(project_scripts[0].name, "vacuum");

    // Script counts ride along with the project listing.
    let (_, projects) = repo.list_projects(ProjectListQuery::new()).unwrap();
    assert_eq!(projects[0].1, 1);

    let vacuum_id = ScriptId::new(vacuum.id).unwrap();
    let updated = repo
        .update_script(
            vacuum_id,
            &UpdateSqlScript::new(
                "vacuum full".to_string(),
                "monthly".to_string(),
                "VACUUM FULL".to_string(),
            ),
        )
        .unwrap();
    assert_eq!(updated.body, "VACUUM FULL");

    // Deleting the project keeps the script with its reference cleared.
    repo.delete_project(project_id).unwrap();
    let survivor = repo.get_script_by_id(vacuum_id).unwrap().unwrap();
    assert_eq!(survivor.project_id, None);

    repo.delete_script(vacuum_id).unwrap();
    assert!(repo.get_script_by_id(vacuum_id).unwrap().is_none());
}

#[test]
fn test_query_history_records_and_prunes() {
    let test_db = common::TestDb::new("test_query_history.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    repo.record_query(&NewQueryRecord::success("admin", "SELECT 1", 1, 3))
        .unwrap();
    repo.record_query(&NewQueryRecord::failure(
        "admin",
        "SELEC 2",
        "syntax error",
        1,
    ))
    .unwrap();

    let history = repo.list_query_history(10).unwrap();
    assert_eq!(history.len(), 2);
    // Newest first.
    assert_eq!(history[0].status, QueryStatus::Error);
    assert_eq!(history[0].error.as_deref(), Some("syntax error"));
    assert_eq!(history[1].sql, "SELECT 1");

    for i in 0..110 {
        repo.record_query(&NewQueryRecord::success(
            "admin",
            format!("SELECT {i}"),
            1,
            1,
        ))
        .unwrap();
    }
    let retained = repo.list_query_history(200).unwrap();
    assert_eq!(retained.len(), 100);
    assert_eq!(retained[0].sql, "SELECT 109");

    let removed = repo.clear_query_history().unwrap();
    assert_eq!(removed, 100);
    assert!(repo.list_query_history(10).unwrap().is_empty());
}

#[test]
fn test_activity_log_records_and_prunes() {
    let test_db = common::TestDb::new("test_activity_log.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    repo.log_activity(&NewActivityEntry::new("admin", "Signed in"))
        .unwrap();
    repo.log_activity(&NewActivityEntry::new("admin", "Query executed").details("SELECT 1"))
        .unwrap();

    let entries = repo.list_activity(10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "Query executed");
    assert_eq!(entries[0].details.as_deref(), Some("SELECT 1"));

    for i in 0..60 {
        repo.log_activity(&NewActivityEntry::new("admin", format!("Action {i}")))
            .unwrap();
    }
    let retained = repo.list_activity(100).unwrap();
    assert_eq!(retained.len(), 50);
    assert_eq!(retained[0].action, "Action 59");
}

#[test]
fn test_settings_round_trip() {
    let test_db = common::TestDb::new("test_settings.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    // An empty store serves the defaults.
    let defaults = repo.load_settings().unwrap();
    assert_eq!(defaults, AppSettings::default());

    let custom = AppSettings {
        items_per_page: 50,
        max_result_rows: 500,
        allow_writes: true,
        slow_query_ms: 2_000,
        monitored_tables: vec!["orders".to_string(), "customers".to_string()],
    };
    repo.save_settings(&custom).unwrap();
    assert_eq!(repo.load_settings().unwrap(), custom);

    // Saving again overwrites instead of duplicating rows.
    let trimmed = AppSettings {
        monitored_tables: vec!["orders".to_string()],
        ..custom.clone()
    };
    repo.save_settings(&trimmed).unwrap();
    assert_eq!(repo.load_settings().unwrap(), trimmed);
}
