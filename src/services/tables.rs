//! Tables page service: listing, search, sort, and per-table details.

use crate::dto::tables::{TableDetailsPageData, TablesPageData, TablesQuery};
use crate::inspector::DatabaseInspector;
use crate::models::auth::{ACCESS_ROLE, AuthenticatedUser};
use crate::services::{ServiceResult, ensure_role};

/// Loads the filtered, sorted table listing.
pub async fn load_tables(
    inspector: &dyn DatabaseInspector,
    user: &AuthenticatedUser,
    query: TablesQuery,
) -> ServiceResult<TablesPageData> {
    ensure_role(user, ACCESS_ROLE)?;

    let mut tables = inspector.list_tables().await.map_err(|err| {
        log::error!("Failed to list tables: {err}");
        err
    })?;

    let search_query = query
        .search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        tables.retain(|t| t.name.to_lowercase().contains(term));
    }

    let sort = match query.sort.as_deref() {
        Some("rows") => "rows",
        Some("size") => "size",
        Some("modified") => "modified",
        _ => "name",
    };
    match sort {
        "rows" => tables.sort_by(|a, b| b.row_estimate.cmp(&a.row_estimate)),
        "size" => tables.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes)),
        "modified" => tables.sort_by(|a, b| b.last_modified.cmp(&a.last_modified)),
        _ => tables.sort_by(|a, b| a.name.cmp(&b.name)),
    }

    let total_rows = tables.iter().map(|t| t.row_estimate).sum();
    let total_size_bytes = tables.iter().filter_map(|t| t.size_bytes).sum();

    Ok(TablesPageData {
        tables,
        total_rows,
        total_size_bytes,
        search_query,
        sort,
    })
}

/// Loads the detail view for one table.
pub async fn load_table_details(
    inspector: &dyn DatabaseInspector,
    user: &AuthenticatedUser,
    table: &str,
) -> ServiceResult<TableDetailsPageData> {
    ensure_role(user, ACCESS_ROLE)?;

    let details = inspector.table_details(table).await.map_err(|err| {
        log::error!("Failed to inspect table {table}: {err}");
        err
    })?;

    Ok(TableDetailsPageData { details })
}
