//! Trip day reads and memo updates.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::parse_column;
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Page, PageRequest, TripDay},
    store::DayRecords,
};

const TRIP_DAY_COLUMNS: &str = "id, trip_id, day_no, memo, created_at, updated_at";
const DELETE_TRIP_DAYS_SQL: &str = "DELETE FROM trip_days WHERE trip_id = ?1";
const COUNT_TRIP_DAYS_SQL: &str = "SELECT COUNT(*) FROM trip_days WHERE trip_id = ?1";
const UPDATE_TRIP_DAY_MEMO_SQL: &str =
    "UPDATE trip_days SET memo = ?1, updated_at = ?2 WHERE id = ?3";

impl super::Database {
    fn build_trip_day_from_row(row: &rusqlite::Row) -> rusqlite::Result<TripDay> {
        Ok(TripDay {
            id: row.get::<_, i64>(0)? as u64,
            trip_id: row.get::<_, i64>(1)? as u64,
            day_no: row.get(2)?,
            memo: row.get(3)?,
            created_at: parse_column(row, 4)?,
            updated_at: parse_column(row, 5)?,
        })
    }

    fn query_trip_days(&self, trip_id: u64, limit: i64, offset: i64) -> Result<Vec<TripDay>> {
        let sql = format!(
            "SELECT {TRIP_DAY_COLUMNS} FROM trip_days WHERE trip_id = ?1 \
             ORDER BY day_no LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = self
            .connection
            .prepare_cached(&sql)
            .db_context("Failed to prepare trip day query")?;
        let days = stmt
            .query_map(
                params![trip_id as i64, limit, offset],
                Self::build_trip_day_from_row,
            )
            .db_context("Failed to query trip days")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read trip day row")?;
        Ok(days)
    }
}

impl DayRecords for super::Database {
    fn delete_trip_days(&mut self, trip_id: u64) -> Result<()> {
        self.connection
            .execute(DELETE_TRIP_DAYS_SQL, params![trip_id as i64])
            .db_context("Failed to delete trip days")?;
        Ok(())
    }

    fn find_trip_day(&self, trip_id: u64, day_no: u32) -> Result<Option<TripDay>> {
        let sql =
            format!("SELECT {TRIP_DAY_COLUMNS} FROM trip_days WHERE trip_id = ?1 AND day_no = ?2");
        self.connection
            .query_row(
                &sql,
                params![trip_id as i64, day_no],
                Self::build_trip_day_from_row,
            )
            .optional()
            .db_context("Failed to get trip day")
    }

    fn list_trip_days(&self, trip_id: u64, page: PageRequest) -> Result<Page<TripDay>> {
        page.validate()?;

        let total: i64 = self
            .connection
            .query_row(COUNT_TRIP_DAYS_SQL, params![trip_id as i64], |row| row.get(0))
            .db_context("Failed to count trip days")?;
        let items = self.query_trip_days(trip_id, i64::from(page.size), page.offset() as i64)?;

        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total: total as u64,
        })
    }

    fn trip_days(&self, trip_id: u64) -> Result<Vec<TripDay>> {
        // LIMIT -1 means no limit in SQLite
        self.query_trip_days(trip_id, -1, 0)
    }

    fn update_trip_day_memo(&mut self, trip_day_id: u64, memo: Option<&str>) -> Result<()> {
        self.connection
            .execute(
                UPDATE_TRIP_DAY_MEMO_SQL,
                params![memo, Timestamp::now().to_string(), trip_day_id as i64],
            )
            .db_context("Failed to update trip day memo")?;
        Ok(())
    }
}
