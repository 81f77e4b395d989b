use crate::error::Result;
use crate::model::Location;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const CREATE_LOCATION_TABLE: &str = "CREATE TABLE Location (
    name         TEXT NOT NULL PRIMARY KEY,
    displayName  TEXT NOT NULL,
    lat          TEXT NOT NULL,
    lon          TEXT NOT NULL,
    timezone     TEXT NOT NULL
)";

/// Outcome of checking whether a location name is already stored.
#[derive(Debug)]
pub enum Lookup {
    Absent,
    Present,
    /// The query failed for a reason other than "no rows".
    Failed(rusqlite::Error),
}

/// Handle on the single-file location database.
///
/// The connection is closed when the handle is dropped.
pub struct LocationDb {
    conn: Connection,
}

impl LocationDb {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(LocationDb { conn })
    }

    /// Creates the `Location` table. Fails if it already exists.
    pub fn create_table(&self) -> Result<()> {
        self.conn.execute(CREATE_LOCATION_TABLE, [])?;
        Ok(())
    }

    /// Creates the `Location` table unless it is already there.
    pub fn ensure_table(&self) -> Result<()> {
        let exists = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'Location'",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .is_some();

        if !exists {
            self.create_table()?;
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Lookup {
        let result = self.conn.query_row(
            "SELECT name FROM Location WHERE name = ?1",
            [name],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(_) => Lookup::Present,
            Err(rusqlite::Error::QueryReturnedNoRows) => Lookup::Absent,
            Err(e) => Lookup::Failed(e),
        }
    }

    pub fn get(&self, name: &str) -> Result<Option<Location>> {
        let location = self
            .conn
            .query_row(
                "SELECT name, displayName, lat, lon, timezone FROM Location WHERE name = ?1",
                [name],
                |row| {
                    Ok(Location {
                        name: row.get(0)?,
                        display_name: row.get(1)?,
                        lat: row.get(2)?,
                        lon: row.get(3)?,
                        timezone: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(location)
    }

    /// Inserts a block of locations in one transaction, in the given order.
    ///
    /// Any failing row rolls back the whole block.
    pub fn bulk_insert(&mut self, block: &[Location]) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }

        let transaction = self.conn.transaction()?;
        {
            let mut stmt = transaction.prepare(
                "INSERT INTO Location (name, displayName, lat, lon, timezone)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for location in block {
                stmt.execute(params![
                    location.name,
                    location.display_name,
                    location.lat,
                    location.lon,
                    location.timezone
                ])?;
            }
        }
        transaction.commit()?;

        Ok(())
    }

    pub fn upsert(&self, location: &Location) -> Result<()> {
        self.conn.execute(
            "INSERT INTO Location (name, displayName, lat, lon, timezone)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name)
             DO UPDATE SET displayName = ?2, lat = ?3, lon = ?4, timezone = ?5",
            params![
                location.name,
                location.display_name,
                location.lat,
                location.lon,
                location.timezone
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
impl LocationDb {
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Location", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM Location ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }
}
