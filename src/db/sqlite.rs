use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use uuid::Uuid;

use crate::constants::VERSION_ALLOCATION_RETRIES;
use crate::db::DesignStore;
use crate::errors::ArchCopilotError;
use crate::models::artifact::ArtifactBundle;
use crate::models::design::{Design, DesignSummary};
use crate::models::version::{DesignVersion, VersionSummary};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed [`DesignStore`]. A single connection behind a mutex
/// serializes in-process callers; immediate transactions plus the
/// `UNIQUE (design_id, version_num)` constraint keep version allocation
/// correct when other processes share the database file.
pub struct SqliteDesignStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDesignStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchCopilotError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, ArchCopilotError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, ArchCopilotError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS designs (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                latest_version_id TEXT NOT NULL,
                latest_version_num INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS design_versions (
                id TEXT PRIMARY KEY,
                design_id TEXT NOT NULL REFERENCES designs (id),
                version_num INTEGER NOT NULL,
                spec_text TEXT NOT NULL,
                output_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (design_id, version_num)
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS ix_designs_owner_id ON designs (owner_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS ix_design_versions_design_id \
             ON design_versions (design_id)",
            [],
        )?;

        Ok(())
    }

    fn append_in_tx(
        conn: &mut Connection,
        design_id: Uuid,
        owner_id: &str,
        spec_text: &str,
        output_json: &str,
    ) -> rusqlite::Result<Option<(Uuid, i32, DateTime<Utc>)>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let latest: Option<(i32, String)> = tx
            .query_row(
                "SELECT d.latest_version_num, v.created_at \
                 FROM designs d JOIN design_versions v ON v.id = d.latest_version_id \
                 WHERE d.id = ?1 AND d.owner_id = ?2",
                params![design_id.to_string(), owner_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((latest_num, latest_created_at)) = latest else {
            return Ok(None);
        };

        // Wall clock can move backwards; timestamps within a design must not.
        let floor = parse_timestamp(&latest_created_at, 1)?;
        let created_at = Utc::now().max(floor);
        let version_id = Uuid::new_v4();
        let version_num = latest_num + 1;

        tx.execute(
            "INSERT INTO design_versions \
             (id, design_id, version_num, spec_text, output_json, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                version_id.to_string(),
                design_id.to_string(),
                version_num,
                spec_text,
                output_json,
                created_at.to_rfc3339()
            ],
        )?;
        tx.execute(
            "UPDATE designs SET latest_version_id = ?1, latest_version_num = ?2 WHERE id = ?3",
            params![version_id.to_string(), version_num, design_id.to_string()],
        )?;
        tx.commit()?;

        Ok(Some((version_id, version_num, created_at)))
    }
}

impl DesignStore for SqliteDesignStore {
    fn create_design(
        &self,
        owner_id: &str,
        spec_text: &str,
        output: &ArtifactBundle,
    ) -> Result<(Design, DesignVersion), ArchCopilotError> {
        let output_json = serde_json::to_string(output)?;
        let design_id = Uuid::new_v4();
        let version_id = Uuid::new_v4();
        let created_at = Utc::now();

        let mut conn = self.conn.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO designs (id, owner_id, created_at, latest_version_id, latest_version_num) \
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![
                design_id.to_string(),
                owner_id,
                created_at.to_rfc3339(),
                version_id.to_string()
            ],
        )?;
        tx.execute(
            "INSERT INTO design_versions \
             (id, design_id, version_num, spec_text, output_json, created_at) \
             VALUES (?1, ?2, 1, ?3, ?4, ?5)",
            params![
                version_id.to_string(),
                design_id.to_string(),
                spec_text,
                output_json,
                created_at.to_rfc3339()
            ],
        )?;
        tx.commit()?;

        let design = Design {
            id: design_id,
            owner_id: owner_id.to_string(),
            created_at,
            latest_version_id: version_id,
            latest_version_num: 1,
        };
        let version = DesignVersion {
            id: version_id,
            design_id,
            spec_text: spec_text.to_string(),
            version_num: 1,
            created_at,
            output: output.clone(),
        };

        Ok((design, version))
    }

    fn append_version(
        &self,
        design_id: Uuid,
        owner_id: &str,
        spec_text: &str,
        output: &ArtifactBundle,
    ) -> Result<DesignVersion, ArchCopilotError> {
        let output_json = serde_json::to_string(output)?;
        let mut last_conflict: Option<rusqlite::Error> = None;

        for attempt in 0..VERSION_ALLOCATION_RETRIES {
            if attempt > 0 {
                log::warn!(
                    "Version allocation conflict on design {}, retrying ({}/{})",
                    design_id,
                    attempt,
                    VERSION_ALLOCATION_RETRIES - 1
                );
            }

            let mut conn = self.conn.lock()?;
            match Self::append_in_tx(&mut conn, design_id, owner_id, spec_text, &output_json) {
                Ok(Some((version_id, version_num, created_at))) => {
                    return Ok(DesignVersion {
                        id: version_id,
                        design_id,
                        spec_text: spec_text.to_string(),
                        version_num,
                        created_at,
                        output: output.clone(),
                    });
                }
                Ok(None) => {
                    return Err(ArchCopilotError::NotFound(format!(
                        "Design {} not found",
                        design_id
                    )));
                }
                Err(e) if is_allocation_conflict(&e) => last_conflict = Some(e),
                Err(e) => return Err(e.into()),
            }
        }

        let detail = last_conflict
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown conflict".to_string());

        Err(ArchCopilotError::StorageUnavailable(format!(
            "Version allocation on design {} kept conflicting: {}",
            design_id, detail
        )))
    }

    fn get_design(&self, design_id: Uuid, owner_id: &str) -> Result<Design, ArchCopilotError> {
        let conn = self.conn.lock()?;

        conn.query_row(
            "SELECT id, owner_id, created_at, latest_version_id, latest_version_num \
             FROM designs WHERE id = ?1 AND owner_id = ?2",
            params![design_id.to_string(), owner_id],
            design_from_row,
        )
        .optional()?
        .ok_or_else(|| ArchCopilotError::NotFound(format!("Design {} not found", design_id)))
    }

    fn list_designs(&self, owner_id: &str) -> Result<Vec<DesignSummary>, ArchCopilotError> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT d.id, d.created_at, d.latest_version_id, d.latest_version_num, \
                    v.created_at, v.spec_text \
             FROM designs d JOIN design_versions v ON v.id = d.latest_version_id \
             WHERE d.owner_id = ?1",
        )?;
        let rows = stmt.query_map(params![owner_id], design_summary_from_row)?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }

        Ok(summaries)
    }

    fn get_version(
        &self,
        version_id: Uuid,
        owner_id: &str,
    ) -> Result<DesignVersion, ArchCopilotError> {
        let conn = self.conn.lock()?;

        conn.query_row(
            "SELECT v.id, v.design_id, v.version_num, v.spec_text, v.output_json, v.created_at \
             FROM design_versions v JOIN designs d ON d.id = v.design_id \
             WHERE v.id = ?1 AND d.owner_id = ?2",
            params![version_id.to_string(), owner_id],
            version_from_row,
        )
        .optional()?
        .ok_or_else(|| ArchCopilotError::NotFound(format!("Version {} not found", version_id)))
    }

    fn list_versions(
        &self,
        design_id: Uuid,
        owner_id: &str,
    ) -> Result<Vec<VersionSummary>, ArchCopilotError> {
        self.get_design(design_id, owner_id)?;

        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, design_id, version_num, created_at \
             FROM design_versions WHERE design_id = ?1 ORDER BY version_num ASC",
        )?;
        let rows = stmt.query_map(params![design_id.to_string()], version_summary_from_row)?;

        let mut versions = Vec::new();
        for row in rows {
            versions.push(row?);
        }

        Ok(versions)
    }
}

fn design_from_row(row: &Row) -> rusqlite::Result<Design> {
    Ok(Design {
        id: parse_uuid_column(row, 0)?,
        owner_id: row.get(1)?,
        created_at: parse_timestamp_column(row, 2)?,
        latest_version_id: parse_uuid_column(row, 3)?,
        latest_version_num: row.get(4)?,
    })
}

fn design_summary_from_row(row: &Row) -> rusqlite::Result<DesignSummary> {
    Ok(DesignSummary {
        design_id: parse_uuid_column(row, 0)?,
        created_at: parse_timestamp_column(row, 1)?,
        latest_version_id: parse_uuid_column(row, 2)?,
        latest_version_num: row.get(3)?,
        latest_version_created_at: parse_timestamp_column(row, 4)?,
        latest_spec_text: row.get(5)?,
    })
}

fn version_from_row(row: &Row) -> rusqlite::Result<DesignVersion> {
    let output_json: String = row.get(4)?;
    let output: ArtifactBundle = serde_json::from_str(&output_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(DesignVersion {
        id: parse_uuid_column(row, 0)?,
        design_id: parse_uuid_column(row, 1)?,
        version_num: row.get(2)?,
        spec_text: row.get(3)?,
        created_at: parse_timestamp_column(row, 5)?,
        output,
    })
}

fn version_summary_from_row(row: &Row) -> rusqlite::Result<VersionSummary> {
    Ok(VersionSummary {
        id: parse_uuid_column(row, 0)?,
        design_id: parse_uuid_column(row, 1)?,
        version_num: row.get(2)?,
        created_at: parse_timestamp_column(row, 3)?,
    })
}

fn parse_uuid_column(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;

    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;

    parse_timestamp(&raw, idx)
}

fn parse_timestamp(raw: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn is_allocation_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.code,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::ConstraintViolation
        ),
        _ => false,
    }
}
