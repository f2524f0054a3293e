//! Database schema initialization.

use log::debug;
use rusqlite::params;

use crate::{
    catalog,
    error::{DatabaseResultExt, Result},
};

const SEED_REGION_SQL: &str =
    "INSERT OR IGNORE INTO regions (id, name, country_code) VALUES (?1, ?2, ?3)";

impl super::Database {
    /// Initializes the database schema using the embedded SQL file and
    /// switches the file to write-ahead logging so readers never wait on the
    /// writer.
    pub(crate) fn initialize_schema(&self) -> Result<()> {
        let journal_mode: String = self
            .connection
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .db_context("Failed to enable WAL journal")?;
        debug!("Database journal mode: {journal_mode}");

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.seed_regions()
    }

    fn seed_regions(&self) -> Result<()> {
        let mut stmt = self
            .connection
            .prepare(SEED_REGION_SQL)
            .db_context("Failed to prepare region seed")?;
        for region in catalog::seeded_regions() {
            stmt.execute(params![region.id as i64, region.name, region.country_code])
                .db_context("Failed to seed region")?;
        }
        Ok(())
    }
}
