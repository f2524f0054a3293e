//! Region and place queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::parse_column;
use crate::{
    error::{DatabaseResultExt, Result, TripmateError},
    models::{Place, Region},
    params::PlaceDetails,
    store::CatalogRecords,
};

const REGION_COLUMNS: &str = "id, name, country_code";
const PLACE_COLUMNS: &str = "id, name, category, address, lat, lng, external_ref, created_at";
const INSERT_PLACE_SQL: &str = "INSERT INTO places (name, category, address, lat, lng, external_ref, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT (external_ref) DO NOTHING";

impl super::Database {
    fn build_region_from_row(row: &rusqlite::Row) -> rusqlite::Result<Region> {
        Ok(Region {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            country_code: row.get(2)?,
        })
    }

    fn build_place_from_row(row: &rusqlite::Row) -> rusqlite::Result<Place> {
        Ok(Place {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            category: row.get(2)?,
            address: row.get(3)?,
            lat: row.get(4)?,
            lng: row.get(5)?,
            external_ref: row.get(6)?,
            created_at: parse_column(row, 7)?,
        })
    }

    fn find_place_by_external_ref(&self, external_ref: &str) -> Result<Option<Place>> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places WHERE external_ref = ?1");
        self.connection
            .query_row(&sql, params![external_ref], Self::build_place_from_row)
            .optional()
            .db_context("Failed to get place by external reference")
    }
}

impl CatalogRecords for super::Database {
    fn find_region(&self, region_id: u64) -> Result<Option<Region>> {
        let sql = format!("SELECT {REGION_COLUMNS} FROM regions WHERE id = ?1");
        self.connection
            .query_row(&sql, params![region_id as i64], Self::build_region_from_row)
            .optional()
            .db_context("Failed to get region")
    }

    fn list_regions(&self, country_code: &str, query: Option<&str>) -> Result<Vec<Region>> {
        let (sql, arg) = match query {
            Some(query) => (
                format!(
                    "SELECT {REGION_COLUMNS} FROM regions \
                     WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id"
                ),
                query,
            ),
            None => (
                format!("SELECT {REGION_COLUMNS} FROM regions WHERE country_code = ?1 ORDER BY id"),
                country_code,
            ),
        };

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare region listing")?;
        let regions = stmt
            .query_map(params![arg], Self::build_region_from_row)
            .db_context("Failed to list regions")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read region row")?;
        Ok(regions)
    }

    fn upsert_place(&mut self, details: &PlaceDetails) -> Result<Place> {
        self.connection
            .execute(
                INSERT_PLACE_SQL,
                params![
                    &details.name,
                    &details.category,
                    &details.address,
                    details.lat,
                    details.lng,
                    &details.external_ref,
                    Timestamp::now().to_string()
                ],
            )
            .db_context("Failed to insert place")?;

        self.find_place_by_external_ref(&details.external_ref)?
            .ok_or_else(|| {
                TripmateError::storage(format!(
                    "place {} vanished after insert",
                    details.external_ref
                ))
            })
    }

    fn find_place(&self, place_id: u64) -> Result<Option<Place>> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = ?1");
        self.connection
            .query_row(&sql, params![place_id as i64], Self::build_place_from_row)
            .optional()
            .db_context("Failed to get place")
    }
}
