//! Transaction control and the ordinal primitives.
//!
//! `trip_days.day_no` and `schedule_items.seq_no` are both covered by a
//! `UNIQUE` index that SQLite checks row by row, so every shift selects the
//! affected ids first and moves them one at a time in a safe order.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, TripmateError},
    models::{ScheduleItem, TripDay},
    params::ItemDetails,
    store::{OrdinalStore, Parent, Transactional, STAGING_OFFSET},
};

/// Statements for one kind of ordinal sequence.
struct OrdinalSql {
    parent_exists: &'static str,
    max_ordinal: &'static str,
    ids_from_desc: &'static str,
    ids_after_asc: &'static str,
    id_at: &'static str,
    set_ordinal: &'static str,
    delete_at: &'static str,
}

const DAY_SQL: OrdinalSql = OrdinalSql {
    parent_exists: "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)",
    max_ordinal: "SELECT COALESCE(MAX(day_no), 0) FROM trip_days WHERE trip_id = ?1",
    ids_from_desc: "SELECT id, day_no FROM trip_days WHERE trip_id = ?1 AND day_no >= ?2 AND day_no <= ?3 ORDER BY day_no DESC",
    ids_after_asc: "SELECT id, day_no FROM trip_days WHERE trip_id = ?1 AND day_no > ?2 AND day_no <= ?3 ORDER BY day_no ASC",
    id_at: "SELECT id FROM trip_days WHERE trip_id = ?1 AND day_no = ?2",
    set_ordinal: "UPDATE trip_days SET day_no = ?1, updated_at = ?2 WHERE id = ?3",
    delete_at: "DELETE FROM trip_days WHERE trip_id = ?1 AND day_no = ?2",
};

const ITEM_SQL: OrdinalSql = OrdinalSql {
    parent_exists: "SELECT EXISTS(SELECT 1 FROM trip_days WHERE id = ?1)",
    max_ordinal: "SELECT COALESCE(MAX(seq_no), 0) FROM schedule_items WHERE trip_day_id = ?1",
    ids_from_desc: "SELECT id, seq_no FROM schedule_items WHERE trip_day_id = ?1 AND seq_no >= ?2 AND seq_no <= ?3 ORDER BY seq_no DESC",
    ids_after_asc: "SELECT id, seq_no FROM schedule_items WHERE trip_day_id = ?1 AND seq_no > ?2 AND seq_no <= ?3 ORDER BY seq_no ASC",
    id_at: "SELECT id FROM schedule_items WHERE trip_day_id = ?1 AND seq_no = ?2",
    set_ordinal: "UPDATE schedule_items SET seq_no = ?1, updated_at = ?2 WHERE id = ?3",
    delete_at: "DELETE FROM schedule_items WHERE trip_day_id = ?1 AND seq_no = ?2",
};

const BEGIN_SQL: &str = "BEGIN IMMEDIATE";
const COMMIT_SQL: &str = "COMMIT";
const ROLLBACK_SQL: &str = "ROLLBACK";

const INSERT_DAY_SQL: &str = "INSERT INTO trip_days (trip_id, day_no, memo, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_ITEM_SQL: &str = "INSERT INTO schedule_items (trip_day_id, seq_no, place_id, visit_time, memo, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

fn sql_for(parent: Parent) -> &'static OrdinalSql {
    match parent {
        Parent::Trip(_) => &DAY_SQL,
        Parent::TripDay(_) => &ITEM_SQL,
    }
}

impl super::Database {
    fn ensure_transaction(&self) -> Result<()> {
        if self.connection.is_autocommit() {
            return Err(TripmateError::storage("no open transaction"));
        }
        Ok(())
    }

    /// `(id, ordinal)` of children with `low <= ordinal <= high`, highest
    /// first.
    fn children_desc(&self, parent: Parent, low: u32, high: u32) -> Result<Vec<(u64, u32)>> {
        self.select_children(sql_for(parent).ids_from_desc, parent, low, high)
    }

    /// `(id, ordinal)` of children with `low < ordinal <= high`, lowest first.
    fn children_asc(&self, parent: Parent, low: u32, high: u32) -> Result<Vec<(u64, u32)>> {
        self.select_children(sql_for(parent).ids_after_asc, parent, low, high)
    }

    fn select_children(
        &self,
        sql: &str,
        parent: Parent,
        low: u32,
        high: u32,
    ) -> Result<Vec<(u64, u32)>> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .db_context("Failed to prepare ordinal query")?;
        let rows = stmt
            .query_map(params![parent.id() as i64, low, high], |row| {
                Ok((row.get::<_, i64>(0)? as u64, row.get::<_, u32>(1)?))
            })
            .db_context("Failed to query ordinals")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read ordinals")
    }

    fn set_ordinal(&self, parent: Parent, id: u64, ordinal: u32) -> Result<()> {
        self.connection
            .execute(
                sql_for(parent).set_ordinal,
                params![ordinal, Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update ordinal")?;
        Ok(())
    }

    fn id_at(&self, parent: Parent, ordinal: u32) -> Result<Option<u64>> {
        self.connection
            .query_row(
                sql_for(parent).id_at,
                params![parent.id() as i64, ordinal],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map(|id| id.map(|id| id as u64))
            .db_context("Failed to look up ordinal")
    }
}

impl Transactional for super::Database {
    fn begin(&mut self) -> Result<()> {
        self.connection
            .execute_batch(BEGIN_SQL)
            .db_context("Failed to begin transaction")
    }

    fn commit(&mut self) -> Result<()> {
        self.ensure_transaction()?;
        self.connection
            .execute_batch(COMMIT_SQL)
            .db_context("Failed to commit transaction")
    }

    fn rollback(&mut self) -> Result<()> {
        if self.connection.is_autocommit() {
            return Ok(());
        }
        self.connection
            .execute_batch(ROLLBACK_SQL)
            .db_context("Failed to roll back transaction")
    }
}

impl OrdinalStore for super::Database {
    fn lock_parent(&mut self, parent: Parent) -> Result<()> {
        self.ensure_transaction()?;

        let exists: bool = self
            .connection
            .query_row(
                sql_for(parent).parent_exists,
                params![parent.id() as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check parent existence")?;

        if !exists {
            return Err(TripmateError::ParentNotFound { parent });
        }
        Ok(())
    }

    fn max_ordinal(&self, parent: Parent) -> Result<u32> {
        self.connection
            .query_row(
                sql_for(parent).max_ordinal,
                params![parent.id() as i64],
                |row| row.get(0),
            )
            .db_context("Failed to get max ordinal")
    }

    fn shift_up_from(&mut self, parent: Parent, from: u32) -> Result<()> {
        let children = self.children_desc(parent, from, u32::MAX)?;
        debug!("Shifting {} children of {parent} up from {from}", children.len());
        for (id, ordinal) in children {
            self.set_ordinal(parent, id, ordinal + 1)?;
        }
        Ok(())
    }

    fn shift_down_after(&mut self, parent: Parent, deleted: u32) -> Result<()> {
        let children = self.children_asc(parent, deleted, u32::MAX)?;
        debug!(
            "Shifting {} children of {parent} down after {deleted}",
            children.len()
        );
        for (id, ordinal) in children {
            self.set_ordinal(parent, id, ordinal - 1)?;
        }
        Ok(())
    }

    fn move_via_range(
        &mut self,
        parent: Parent,
        old: u32,
        new: u32,
        moving_id: u64,
    ) -> Result<()> {
        if self.id_at(parent, old)? != Some(moving_id) {
            return Err(TripmateError::storage(format!(
                "child {moving_id} is not at position {old} of {parent}"
            )));
        }

        let staged = self.max_ordinal(parent)? + STAGING_OFFSET;
        debug!("Moving {moving_id} of {parent} from {old} to {new} via {staged}");
        self.set_ordinal(parent, moving_id, staged)?;

        if old < new {
            for (id, ordinal) in self.children_asc(parent, old, new)? {
                self.set_ordinal(parent, id, ordinal - 1)?;
            }
        } else {
            for (id, ordinal) in self.children_desc(parent, new, old - 1)? {
                self.set_ordinal(parent, id, ordinal + 1)?;
            }
        }

        self.set_ordinal(parent, moving_id, new)
    }

    fn insert_day_at(&mut self, trip_id: u64, day_no: u32, memo: Option<&str>) -> Result<TripDay> {
        let now = Timestamp::now();
        let now_str = now.to_string();

        self.connection
            .execute(
                INSERT_DAY_SQL,
                params![trip_id as i64, day_no, memo, &now_str, &now_str],
            )
            .map_err(|e| TripmateError::database_error("Failed to insert trip day", e))?;

        Ok(TripDay {
            id: self.connection.last_insert_rowid() as u64,
            trip_id,
            day_no,
            memo: memo.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    fn insert_item_at(
        &mut self,
        trip_day_id: u64,
        seq_no: u32,
        details: &ItemDetails,
    ) -> Result<ScheduleItem> {
        let now = Timestamp::now();
        let now_str = now.to_string();

        self.connection
            .execute(
                INSERT_ITEM_SQL,
                params![
                    trip_day_id as i64,
                    seq_no,
                    details.place_id.map(|id| id as i64),
                    details.visit_time.map(|time| time.to_string()),
                    details.memo.as_deref(),
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| TripmateError::database_error("Failed to insert schedule item", e))?;

        Ok(ScheduleItem {
            id: self.connection.last_insert_rowid() as u64,
            trip_day_id,
            seq_no,
            place_id: details.place_id,
            visit_time: details.visit_time,
            memo: details.memo.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn delete_at(&mut self, parent: Parent, ordinal: u32) -> Result<bool> {
        let deleted = self
            .connection
            .execute(sql_for(parent).delete_at, params![parent.id() as i64, ordinal])
            .db_context("Failed to delete child")?;
        Ok(deleted > 0)
    }
}
