//! SQLite-backed plan store.
//!
//! One row per owner; the item list is stored as a JSON column so the
//! opaque `meta` maps survive round-trips untouched. Timestamps are
//! seconds since the Unix epoch.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::{OwnerId, Plan, PlanItem};

use super::{Page, PlanPage, PlanStore, StoreError};

/// Errors raised while opening or preparing the SQLite plan store.
#[derive(Debug, Error)]
pub enum SqlitePlanStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the plans table failed.
    #[error("failed to prepare plans schema: {source}")]
    PrepareSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Plan store backed by a single SQLite database file.
///
/// The connection is guarded by a mutex so the store is `Send + Sync`;
/// plan traffic is low enough that serialised access is not a concern.
pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqlitePlanStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlanStore").finish_non_exhaustive()
    }
}

impl SqlitePlanStore {
    /// Open (creating if necessary) a plan store at `database_path`.
    pub fn open<P: AsRef<Path>>(database_path: P) -> Result<Self, SqlitePlanStoreError> {
        let database_path = database_path.as_ref();
        let connection = Connection::open(database_path).map_err(|source| {
            SqlitePlanStoreError::OpenDatabase {
                path: database_path.to_path_buf(),
                source,
            }
        })?;
        Self::prepare(connection)
    }

    /// An in-memory store, used by tests and throwaway tooling.
    pub fn open_in_memory() -> Result<Self, SqlitePlanStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqlitePlanStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::prepare(connection)
    }

    fn prepare(connection: Connection) -> Result<Self, SqlitePlanStoreError> {
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS plans (
                    owner TEXT PRIMARY KEY,
                    items TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                [],
            )
            .map_err(|source| SqlitePlanStoreError::PrepareSchema { source })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Backend("plan store lock poisoned".into()))
    }
}

fn backend(source: rusqlite::Error) -> StoreError {
    StoreError::Backend(source.to_string())
}

fn epoch_seconds(at: SystemTime) -> i64 {
    let seconds = at
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    i64::try_from(seconds).unwrap_or(i64::MAX)
}

fn from_epoch_seconds(seconds: i64) -> SystemTime {
    let seconds = u64::try_from(seconds).unwrap_or(0);
    UNIX_EPOCH + Duration::from_secs(seconds)
}

fn row_to_plan(owner: String, items_json: &str, updated_at: i64) -> Result<Plan, StoreError> {
    let items: Vec<PlanItem> = serde_json::from_str(items_json)?;
    Ok(Plan {
        owner: OwnerId::new(owner),
        items,
        updated_at: from_epoch_seconds(updated_at),
    })
}

impl PlanStore for SqlitePlanStore {
    fn find(&self, owner: &OwnerId) -> Result<Option<Plan>, StoreError> {
        let connection = self.lock()?;
        let row = connection
            .query_row(
                "SELECT owner, items, updated_at FROM plans WHERE owner = ?1",
                params![owner.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(backend)?;

        row.map(|(owner_id, items_json, updated_at)| {
            row_to_plan(owner_id, &items_json, updated_at)
        })
        .transpose()
    }

    fn upsert(&self, plan: &Plan) -> Result<(), StoreError> {
        let items_json = serde_json::to_string(&plan.items)?;
        let connection = self.lock()?;
        connection
            .execute(
                "INSERT INTO plans (owner, items, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(owner) DO UPDATE SET
                    items = excluded.items,
                    updated_at = excluded.updated_at",
                params![
                    plan.owner.as_str(),
                    items_json,
                    epoch_seconds(plan.updated_at)
                ],
            )
            .map_err(backend)?;
        log::debug!(
            "stored plan for {} with {} items",
            plan.owner,
            plan.items.len()
        );
        Ok(())
    }

    fn delete(&self, owner: &OwnerId) -> Result<(), StoreError> {
        let connection = self.lock()?;
        let removed = connection
            .execute(
                "DELETE FROM plans WHERE owner = ?1",
                params![owner.as_str()],
            )
            .map_err(backend)?;
        log::debug!("deleted {removed} plan rows for {owner}");
        Ok(())
    }

    fn list(&self, filter: Option<&OwnerId>, page: Page) -> Result<PlanPage, StoreError> {
        let connection = self.lock()?;
        let limit = i64::try_from(page.size).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let (total, rows) = match filter {
            Some(owner) => {
                let total: i64 = connection
                    .query_row(
                        "SELECT COUNT(*) FROM plans WHERE owner = ?1",
                        params![owner.as_str()],
                        |row| row.get(0),
                    )
                    .map_err(backend)?;
                let mut statement = connection
                    .prepare(
                        "SELECT owner, items, updated_at FROM plans WHERE owner = ?1
                         ORDER BY owner LIMIT ?2 OFFSET ?3",
                    )
                    .map_err(backend)?;
                let rows = statement
                    .query_map(params![owner.as_str(), limit, offset], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, i64>(2)?,
                        ))
                    })
                    .map_err(backend)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(backend)?;
                (total, rows)
            }
            None => {
                let total: i64 = connection
                    .query_row("SELECT COUNT(*) FROM plans", [], |row| row.get(0))
                    .map_err(backend)?;
                let mut statement = connection
                    .prepare(
                        "SELECT owner, items, updated_at FROM plans
                         ORDER BY owner LIMIT ?1 OFFSET ?2",
                    )
                    .map_err(backend)?;
                let rows = statement
                    .query_map(params![limit, offset], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, i64>(2)?,
                        ))
                    })
                    .map_err(backend)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(backend)?;
                (total, rows)
            }
        };

        let plans = rows
            .into_iter()
            .map(|(owner_id, items_json, updated_at)| {
                row_to_plan(owner_id, &items_json, updated_at)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlanPage {
            plans,
            total: u64::try_from(total).unwrap_or(0),
            page,
        })
    }
}
