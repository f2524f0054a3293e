//! Trip CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::parse_column;
use crate::{
    error::{DatabaseResultExt, Result, TripmateError},
    models::{Page, PageRequest, Trip},
    params::TripDetails,
    store::TripRecords,
};

const INSERT_TRIP_SQL: &str = "INSERT INTO trips (owner_id, region_id, title, start_date, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_TRIP_SQL: &str = "UPDATE trips SET region_id = ?1, title = ?2, start_date = ?3, end_date = ?4, updated_at = ?5 WHERE id = ?6";
const DELETE_TRIP_SQL: &str = "DELETE FROM trips WHERE id = ?1";
const SELECT_TRIP_OWNER_SQL: &str = "SELECT owner_id FROM trips WHERE id = ?1";
const COUNT_TRIPS_BY_OWNER_SQL: &str = "SELECT COUNT(*) FROM trips WHERE owner_id = ?1";

const TRIP_SUMMARY_COLUMNS: &str =
    "id, owner_id, region_id, title, start_date, end_date, created_at, updated_at, day_count";
const TRIP_SUMMARIES_VIEW: &str = "trip_summaries";

impl super::Database {
    /// Helper function to construct a Trip from a `trip_summaries` row
    fn build_trip_from_row(row: &rusqlite::Row) -> rusqlite::Result<Trip> {
        Ok(Trip {
            id: row.get::<_, i64>(0)? as u64,
            owner_id: row.get::<_, i64>(1)? as u64,
            region_id: row.get::<_, i64>(2)? as u64,
            title: row.get(3)?,
            start_date: parse_column(row, 4)?,
            end_date: parse_column(row, 5)?,
            created_at: parse_column(row, 6)?,
            updated_at: parse_column(row, 7)?,
            day_count: row.get(8)?,
        })
    }
}

impl TripRecords for super::Database {
    fn insert_trip(&mut self, owner_id: u64, details: &TripDetails) -> Result<Trip> {
        let now = Timestamp::now();
        let now_str = now.to_string();

        self.connection
            .execute(
                INSERT_TRIP_SQL,
                params![
                    owner_id as i64,
                    details.region_id as i64,
                    &details.title,
                    details.start_date.to_string(),
                    details.end_date.to_string(),
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| TripmateError::database_error("Failed to insert trip", e))?;

        Ok(Trip {
            id: self.connection.last_insert_rowid() as u64,
            owner_id,
            region_id: details.region_id,
            title: details.title.clone(),
            start_date: details.start_date,
            end_date: details.end_date,
            day_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn update_trip(&mut self, trip_id: u64, details: &TripDetails) -> Result<bool> {
        let updated = self
            .connection
            .execute(
                UPDATE_TRIP_SQL,
                params![
                    details.region_id as i64,
                    &details.title,
                    details.start_date.to_string(),
                    details.end_date.to_string(),
                    Timestamp::now().to_string(),
                    trip_id as i64
                ],
            )
            .map_err(|e| TripmateError::database_error("Failed to update trip", e))?;
        Ok(updated > 0)
    }

    fn delete_trip(&mut self, trip_id: u64) -> Result<()> {
        // Days and their items go with it through ON DELETE CASCADE
        self.connection
            .execute(DELETE_TRIP_SQL, params![trip_id as i64])
            .db_context("Failed to delete trip")?;
        Ok(())
    }

    fn find_trip(&self, trip_id: u64) -> Result<Option<Trip>> {
        let sql = format!("SELECT {TRIP_SUMMARY_COLUMNS} FROM {TRIP_SUMMARIES_VIEW} WHERE id = ?1");
        self.connection
            .query_row(&sql, params![trip_id as i64], Self::build_trip_from_row)
            .optional()
            .db_context("Failed to get trip")
    }

    fn list_trips(&self, owner_id: u64, page: PageRequest) -> Result<Page<Trip>> {
        page.validate()?;

        let total: u64 = self
            .connection
            .query_row(COUNT_TRIPS_BY_OWNER_SQL, params![owner_id as i64], |row| {
                row.get::<_, i64>(0)
            })
            .map(|count| count as u64)
            .db_context("Failed to count trips")?;

        let sql = format!(
            "SELECT {TRIP_SUMMARY_COLUMNS} FROM {TRIP_SUMMARIES_VIEW} WHERE owner_id = ?1 \
             ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare trip listing")?;
        let trips = stmt
            .query_map(
                params![owner_id as i64, page.size, page.offset() as i64],
                Self::build_trip_from_row,
            )
            .db_context("Failed to list trips")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read trip row")?;

        Ok(Page {
            items: trips,
            page: page.page,
            size: page.size,
            total,
        })
    }

    fn trip_owner(&self, trip_id: u64) -> Result<Option<u64>> {
        self.connection
            .query_row(SELECT_TRIP_OWNER_SQL, params![trip_id as i64], |row| {
                row.get::<_, i64>(0)
            })
            .optional()
            .map(|owner| owner.map(|id| id as u64))
            .db_context("Failed to get trip owner")
    }
}
