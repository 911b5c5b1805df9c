use chrono::Utc;
use diesel::prelude::*;

use crate::domain::activity::{ActivityEntry, NewActivityEntry};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ActivityReader, ActivityWriter, DieselRepository};

/// Entries kept in the audit trail; older rows are pruned on insert.
pub const ACTIVITY_RETENTION: i64 = 50;

impl ActivityReader for DieselRepository {
    fn list_activity(&self, limit: usize) -> RepositoryResult<Vec<ActivityEntry>> {
        use crate::models::activity::ActivityEntry as DbActivityEntry;
        use crate::schema::activity_log;

        let mut conn = self.conn()?;
        let entries = activity_log::table
            .order(activity_log::id.desc())
            .limit(limit as i64)
            .load::<DbActivityEntry>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(entries)
    }
}

impl ActivityWriter for DieselRepository {
    fn log_activity(&self, entry: &NewActivityEntry) -> RepositoryResult<()> {
        use crate::models::activity::NewActivityEntry as DbNewActivityEntry;
        use crate::schema::activity_log;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        diesel::insert_into(activity_log::table)
            .values(DbNewActivityEntry::from_domain(entry, now))
            .execute(&mut conn)?;

        let keep = activity_log::table
            .select(activity_log::id)
            .order(activity_log::id.desc())
            .limit(ACTIVITY_RETENTION);
        diesel::delete(activity_log::table.filter(activity_log::id.ne_all(keep)))
            .execute(&mut conn)?;

        Ok(())
    }
}
