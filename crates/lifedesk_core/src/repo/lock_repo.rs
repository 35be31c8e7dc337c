//! Locked-resource repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist lock markers keyed by `(resource_id, kind, module)`.
//! - Answer point lookups for permission checks.
//!
//! # Invariants
//! - Inserting an already-present marker is rejected at the call site,
//!   not papered over; toggling lives in the service layer.
//! - Listing is deterministic: `module ASC, kind ASC, resource_id ASC`.

use crate::db::DbError;
use crate::model::locked_resource::{parse_resource_kind, LockedResource, ResourceKind};
use crate::modules::{parse_module_id, ModuleId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by lock repository operations.
pub type LockRepoResult<T> = Result<T, LockRepoError>;

/// Errors from lock repository operations.
#[derive(Debug)]
pub enum LockRepoError {
    Db(DbError),
    /// Marker already exists for the triple.
    AlreadyLocked {
        resource_id: String,
        module: ModuleId,
    },
    /// No marker exists for the triple.
    NotLocked {
        resource_id: String,
        module: ModuleId,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for LockRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyLocked {
                resource_id,
                module,
            } => write!(
                f,
                "resource already locked: {resource_id} in module {}",
                module.as_str()
            ),
            Self::NotLocked {
                resource_id,
                module,
            } => write!(
                f,
                "resource not locked: {resource_id} in module {}",
                module.as_str()
            ),
            Self::InvalidData(message) => write!(f, "invalid lock data: {message}"),
        }
    }
}

impl Error for LockRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for LockRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LockRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for lock marker operations.
///
/// Read-only from the visibility component's perspective; mutation entry
/// points exist for the lock toggle use case only.
pub trait LockRepository {
    /// Returns whether an active marker exists for the triple.
    fn is_locked(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<bool>;
    /// Inserts one marker. Fails when the triple is already locked.
    fn insert_lock(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<()>;
    /// Removes one marker. Fails when the triple is not locked.
    fn remove_lock(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<()>;
    /// Lists all active markers.
    fn list_locks(&self) -> LockRepoResult<Vec<LockedResource>>;
}

/// SQLite-backed lock repository.
pub struct SqliteLockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLockRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LockRepository for SqliteLockRepository<'_> {
    fn is_locked(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM locked_resources
                WHERE resource_id = ?1
                  AND kind = ?2
                  AND module = ?3
            );",
            params![resource_id, kind.as_str(), module.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_lock(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<()> {
        if self.is_locked(resource_id, kind, module)? {
            return Err(LockRepoError::AlreadyLocked {
                resource_id: resource_id.to_string(),
                module,
            });
        }

        self.conn.execute(
            "INSERT INTO locked_resources (resource_id, kind, module)
             VALUES (?1, ?2, ?3);",
            params![resource_id, kind.as_str(), module.as_str()],
        )?;
        Ok(())
    }

    fn remove_lock(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        module: ModuleId,
    ) -> LockRepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM locked_resources
             WHERE resource_id = ?1
               AND kind = ?2
               AND module = ?3;",
            params![resource_id, kind.as_str(), module.as_str()],
        )?;
        if changed == 0 {
            return Err(LockRepoError::NotLocked {
                resource_id: resource_id.to_string(),
                module,
            });
        }
        Ok(())
    }

    fn list_locks(&self) -> LockRepoResult<Vec<LockedResource>> {
        let mut stmt = self.conn.prepare(
            "SELECT resource_id, kind, module, created_at
             FROM locked_resources
             ORDER BY module ASC, kind ASC, resource_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut locks = Vec::new();
        while let Some(row) = rows.next()? {
            locks.push(parse_lock_row(row)?);
        }
        Ok(locks)
    }
}

fn parse_lock_row(row: &Row<'_>) -> LockRepoResult<LockedResource> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_resource_kind(&kind_text).ok_or_else(|| {
        LockRepoError::InvalidData(format!(
            "invalid resource kind `{kind_text}` in locked_resources.kind"
        ))
    })?;

    let module_text: String = row.get("module")?;
    let module = parse_module_id(&module_text).map_err(|_| {
        LockRepoError::InvalidData(format!(
            "invalid module `{module_text}` in locked_resources.module"
        ))
    })?;

    Ok(LockedResource {
        resource_id: row.get("resource_id")?,
        kind,
        module,
        created_at: row.get("created_at")?,
    })
}
