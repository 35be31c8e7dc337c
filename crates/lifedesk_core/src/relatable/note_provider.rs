//! Relatable-entity provider for the notes module.
//!
//! # Responsibility
//! - List active notes as relation candidates for todos.
//! - Flag notes already taken by an active todo as inactive.
//!
//! # Invariants
//! - Candidate order is deterministic: `created_at ASC, uuid ASC`.

use crate::modules::ModuleId;
use crate::relatable::registry::{EntityData, RelatableError, RelatableProvider};
use rusqlite::Connection;

/// Provider listing active notes as todo relation candidates.
pub struct NoteRelatableProvider<'conn> {
    conn: &'conn Connection,
}

impl<'conn> NoteRelatableProvider<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RelatableProvider for NoteRelatableProvider<'_> {
    fn module(&self) -> ModuleId {
        ModuleId::Notes
    }

    fn relatable_entities(&self) -> Result<Vec<EntityData>, RelatableError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT
                    n.uuid,
                    n.title,
                    NOT EXISTS(
                        SELECT 1
                        FROM todos t
                        WHERE t.module = ?1
                          AND t.related_entity_id = n.uuid
                          AND t.is_deleted = 0
                    ) AS available
                 FROM notes n
                 WHERE n.is_deleted = 0
                 ORDER BY n.created_at ASC, n.uuid ASC;",
            )
            .map_err(wrap)?;

        let mut rows = stmt.query([ModuleId::Notes.as_str()]).map_err(wrap)?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next().map_err(wrap)? {
            let available: i64 = row.get(2).map_err(wrap)?;
            entities.push(EntityData {
                id: row.get(0).map_err(wrap)?,
                name: row.get(1).map_err(wrap)?,
                active: available == 1,
            });
        }
        Ok(entities)
    }

    fn entity_exists(&self, entity_id: &str) -> Result<bool, RelatableError> {
        let exists: i64 = self
            .conn
            .query_row(
                "SELECT EXISTS(
                    SELECT 1
                    FROM notes
                    WHERE uuid = ?1
                      AND is_deleted = 0
                );",
                [entity_id],
                |row| row.get(0),
            )
            .map_err(wrap)?;
        Ok(exists == 1)
    }
}

fn wrap(err: rusqlite::Error) -> RelatableError {
    RelatableError::Lookup(Box::new(err))
}
