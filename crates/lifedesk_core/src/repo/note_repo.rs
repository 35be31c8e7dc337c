//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `notes` storage.
//! - Answer "fetch notes for these category ids" for the visibility walk.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Set listing excludes notes under tombstoned categories.
//! - Set listing is deterministic: `created_at ASC, uuid ASC`.

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::note::{Note, NoteId, NoteValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    category_uuid,
    title,
    body,
    preview_text,
    is_deleted,
    created_at,
    updated_at
FROM notes";

/// Result type used by note repository operations.
pub type NoteRepoResult<T> = Result<T, NoteRepoError>;

/// Errors from note repository operations.
#[derive(Debug)]
pub enum NoteRepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
}

impl Display for NoteRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for NoteRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for NoteRepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for NoteRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for NoteRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    fn create_note(&self, note: &Note) -> NoteRepoResult<NoteId>;
    fn update_note(&self, note: &Note) -> NoteRepoResult<()>;
    fn get_note(&self, id: NoteId, include_deleted: bool) -> NoteRepoResult<Option<Note>>;
    /// Lists active notes attached to any active category in the set.
    fn notes_for_categories(&self, category_uuids: &[CategoryId]) -> NoteRepoResult<Vec<Note>>;
    fn soft_delete_note(&self, id: NoteId) -> NoteRepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> NoteRepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (
                uuid,
                category_uuid,
                title,
                body,
                preview_text,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note.uuid.to_string(),
                note.category_uuid.to_string(),
                note.title.as_str(),
                note.body.as_str(),
                note.preview_text.as_deref(),
                bool_to_int(note.is_deleted),
            ],
        )?;

        Ok(note.uuid)
    }

    fn update_note(&self, note: &Note) -> NoteRepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                category_uuid = ?1,
                title = ?2,
                body = ?3,
                preview_text = ?4,
                is_deleted = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                note.category_uuid.to_string(),
                note.title.as_str(),
                note.body.as_str(),
                note.preview_text.as_deref(),
                bool_to_int(note.is_deleted),
                note.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(NoteRepoError::NotFound(note.uuid));
        }

        Ok(())
    }

    fn get_note(&self, id: NoteId, include_deleted: bool) -> NoteRepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn notes_for_categories(&self, category_uuids: &[CategoryId]) -> NoteRepoResult<Vec<Note>> {
        if category_uuids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT
                n.uuid,
                n.category_uuid,
                n.title,
                n.body,
                n.preview_text,
                n.is_deleted,
                n.created_at,
                n.updated_at
             FROM notes n
             INNER JOIN categories c
                ON c.uuid = n.category_uuid
               AND c.is_deleted = 0
             WHERE n.is_deleted = 0
               AND n.category_uuid IN ({})
             ORDER BY n.created_at ASC, n.uuid ASC;",
            sql_placeholders(category_uuids.len())
        );
        let bind_values: Vec<Value> = category_uuids
            .iter()
            .map(|id| Value::Text(id.to_string()))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();

        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn soft_delete_note(&self, id: NoteId) -> NoteRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(NoteRepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> NoteRepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        NoteRepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let category_text: String = row.get("category_uuid")?;
    let category_uuid = Uuid::parse_str(&category_text).map_err(|_| {
        NoteRepoError::InvalidData(format!(
            "invalid uuid value `{category_text}` in notes.category_uuid"
        ))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(NoteRepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in notes.is_deleted"
            )));
        }
    };

    let note = Note {
        uuid,
        category_uuid,
        title: row.get("title")?,
        body: row.get("body")?,
        preview_text: row.get("preview_text")?,
        is_deleted,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    note.validate()?;
    Ok(note)
}

fn sql_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
