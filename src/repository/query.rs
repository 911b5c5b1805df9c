use chrono::Utc;
use diesel::prelude::*;

use crate::domain::query::{NewQueryRecord, QueryRecord};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, QueryHistoryReader, QueryHistoryWriter};

/// Executions kept in the history table; older rows are pruned on insert.
pub const QUERY_HISTORY_RETENTION: i64 = 100;

impl QueryHistoryReader for DieselRepository {
    fn list_query_history(&self, limit: usize) -> RepositoryResult<Vec<QueryRecord>> {
        use crate::models::query::QueryRecord as DbQueryRecord;
        use crate::schema::query_history;

        let mut conn = self.conn()?;
        let records = query_history::table
            .order(query_history::id.desc())
            .limit(limit as i64)
            .load::<DbQueryRecord>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(records)
    }
}

impl QueryHistoryWriter for DieselRepository {
    fn record_query(&self, record: &NewQueryRecord) -> RepositoryResult<QueryRecord> {
        use crate::models::query::{NewQueryRecord as DbNewQueryRecord, QueryRecord as DbQueryRecord};
        use crate::schema::query_history;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let created = diesel::insert_into(query_history::table)
            .values(DbNewQueryRecord::from_domain(record, now))
            .get_result::<DbQueryRecord>(&mut conn)?;

        let keep = query_history::table
            .select(query_history::id)
            .order(query_history::id.desc())
            .limit(QUERY_HISTORY_RETENTION);
        diesel::delete(query_history::table.filter(query_history::id.ne_all(keep)))
            .execute(&mut conn)?;

        Ok(created.into())
    }

    fn clear_query_history(&self) -> RepositoryResult<usize> {
        use crate::schema::query_history;

        let mut conn = self.conn()?;
        let removed = diesel::delete(query_history::table).execute(&mut conn)?;

        Ok(removed)
    }
}
