//! Schedule item reads and non-structural updates.

use jiff::{civil::DateTime, Span, Timestamp};
use rusqlite::{params, OptionalExtension};

use super::{parse_column, parse_optional_column};
use crate::{
    error::{DatabaseResultExt, Result, TripmateError},
    models::{Page, PageRequest, ScheduleItem},
    store::ItemRecords,
};

const SCHEDULE_ITEM_COLUMNS: &str =
    "id, trip_day_id, seq_no, place_id, visit_time, memo, created_at, updated_at";
const COUNT_SCHEDULE_ITEMS_SQL: &str =
    "SELECT COUNT(*) FROM schedule_items WHERE trip_day_id = ?1";
const SELECT_VISIT_TIMES_SQL: &str =
    "SELECT id, visit_time FROM schedule_items WHERE trip_day_id = ?1 AND visit_time IS NOT NULL";
const UPDATE_VISIT_TIME_SQL: &str =
    "UPDATE schedule_items SET visit_time = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_SCHEDULE_ITEM_SQL: &str = "UPDATE schedule_items SET visit_time = COALESCE(?1, visit_time), memo = COALESCE(?2, memo), updated_at = ?3 WHERE id = ?4";

impl super::Database {
    fn build_schedule_item_from_row(row: &rusqlite::Row) -> rusqlite::Result<ScheduleItem> {
        Ok(ScheduleItem {
            id: row.get::<_, i64>(0)? as u64,
            trip_day_id: row.get::<_, i64>(1)? as u64,
            seq_no: row.get(2)?,
            place_id: row.get::<_, Option<i64>>(3)?.map(|id| id as u64),
            visit_time: parse_optional_column(row, 4)?,
            memo: row.get(5)?,
            created_at: parse_column(row, 6)?,
            updated_at: parse_column(row, 7)?,
        })
    }

    fn query_schedule_items(
        &self,
        trip_day_id: u64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ScheduleItem>> {
        let sql = format!(
            "SELECT {SCHEDULE_ITEM_COLUMNS} FROM schedule_items WHERE trip_day_id = ?1 \
             ORDER BY seq_no LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = self
            .connection
            .prepare_cached(&sql)
            .db_context("Failed to prepare schedule item query")?;
        let items = stmt
            .query_map(
                params![trip_day_id as i64, limit, offset],
                Self::build_schedule_item_from_row,
            )
            .db_context("Failed to query schedule items")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read schedule item row")?;
        Ok(items)
    }
}

impl ItemRecords for super::Database {
    fn offset_visit_times(&mut self, trip_day_id: u64, days: i64) -> Result<()> {
        let span = Span::new()
            .try_days(days)
            .map_err(|e| TripmateError::invalid_input("visit_time", e.to_string()))?;

        let visit_times: Vec<(i64, DateTime)> = {
            let mut stmt = self
                .connection
                .prepare(SELECT_VISIT_TIMES_SQL)
                .db_context("Failed to prepare visit time query")?;
            let rows = stmt
                .query_map(params![trip_day_id as i64], |row| {
                    Ok((row.get::<_, i64>(0)?, parse_column::<DateTime>(row, 1)?))
                })
                .db_context("Failed to query visit times")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .db_context("Failed to read visit time")?;
            rows
        };

        let now_str = Timestamp::now().to_string();
        for (id, visit_time) in visit_times {
            let shifted = visit_time
                .checked_add(span)
                .map_err(|e| TripmateError::invalid_input("visit_time", e.to_string()))?;
            self.connection
                .execute(UPDATE_VISIT_TIME_SQL, params![shifted.to_string(), &now_str, id])
                .db_context("Failed to offset visit time")?;
        }
        Ok(())
    }

    fn find_schedule_item(&self, item_id: u64) -> Result<Option<ScheduleItem>> {
        let sql = format!("SELECT {SCHEDULE_ITEM_COLUMNS} FROM schedule_items WHERE id = ?1");
        self.connection
            .query_row(
                &sql,
                params![item_id as i64],
                Self::build_schedule_item_from_row,
            )
            .optional()
            .db_context("Failed to get schedule item")
    }

    fn list_schedule_items(
        &self,
        trip_day_id: u64,
        page: PageRequest,
    ) -> Result<Page<ScheduleItem>> {
        page.validate()?;

        let total: i64 = self
            .connection
            .query_row(COUNT_SCHEDULE_ITEMS_SQL, params![trip_day_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to count schedule items")?;
        let items =
            self.query_schedule_items(trip_day_id, i64::from(page.size), page.offset() as i64)?;

        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total: total as u64,
        })
    }

    fn schedule_items(&self, trip_day_id: u64) -> Result<Vec<ScheduleItem>> {
        self.query_schedule_items(trip_day_id, -1, 0)
    }

    fn update_schedule_item(
        &mut self,
        item_id: u64,
        visit_time: Option<DateTime>,
        memo: Option<&str>,
    ) -> Result<()> {
        self.connection
            .execute(
                UPDATE_SCHEDULE_ITEM_SQL,
                params![
                    visit_time.map(|time| time.to_string()),
                    memo,
                    Timestamp::now().to_string(),
                    item_id as i64
                ],
            )
            .db_context("Failed to update schedule item")?;
        Ok(())
    }
}
