use crate::domain::inspect::{TableDetails, TableOverview};

/// Query parameters accepted by the tables page service.
#[derive(Debug, Default)]
pub struct TablesQuery {
    /// Optional substring filter on the table name.
    pub search: Option<String>,
    /// Sort key: "name", "rows", "size" or "modified".
    pub sort: Option<String>,
}

/// Data required to render the tables listing template.
pub struct TablesPageData {
    pub tables: Vec<TableOverview>,
    pub total_rows: i64,
    pub total_size_bytes: i64,
    pub search_query: Option<String>,
    pub sort: &'static str,
}

/// Data required to render one table's detail template.
pub struct TableDetailsPageData {
    pub details: TableDetails,
}
