//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for the category hierarchy.
//! - Answer the set-oriented queries the visibility walk depends on:
//!   "does any category in this set have notes?" and "fetch immediate
//!   children ids for these category ids".
//!
//! # Invariants
//! - Only active (`is_deleted=0`) categories are returned by default.
//! - Child listing is deterministic: `name ASC, uuid ASC`.
//! - Set queries ignore soft-deleted rows on both sides of the join.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::category::{
    validate_category_input, Category, CategoryId, CategoryValidationError,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    parent_uuid,
    name,
    icon,
    is_deleted,
    created_at,
    updated_at
FROM categories";

/// Result type used by category repository operations.
pub type CategoryRepoResult<T> = Result<T, CategoryRepoError>;

/// Errors from category repository operations.
#[derive(Debug)]
pub enum CategoryRepoError {
    /// Model-level validation failure.
    Validation(CategoryValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target category does not exist or is soft-deleted.
    CategoryNotFound(CategoryId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for CategoryRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "category repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "category repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "category repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid category data: {message}"),
        }
    }
}

impl Error for CategoryRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CategoryValidationError> for CategoryRepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for CategoryRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CategoryRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for category hierarchy operations.
pub trait CategoryRepository {
    /// Creates one category under an optional parent.
    fn create_category(
        &self,
        parent_uuid: Option<CategoryId>,
        name: &str,
        icon: Option<&str>,
    ) -> CategoryRepoResult<Category>;
    /// Loads one category by id.
    fn get_category(
        &self,
        uuid: CategoryId,
        include_deleted: bool,
    ) -> CategoryRepoResult<Option<Category>>;
    /// Lists active children under one parent.
    fn list_children(&self, parent_uuid: Option<CategoryId>) -> CategoryRepoResult<Vec<Category>>;
    /// Renames one category.
    fn rename_category(&self, uuid: CategoryId, name: &str) -> CategoryRepoResult<()>;
    /// Soft-deletes one category.
    fn soft_delete_category(&self, uuid: CategoryId) -> CategoryRepoResult<()>;
    /// Returns whether any category in the set has at least one active note.
    fn any_has_notes(&self, category_uuids: &[CategoryId]) -> CategoryRepoResult<bool>;
    /// Returns active immediate-children ids for all categories in the set.
    fn children_ids(&self, category_uuids: &[CategoryId]) -> CategoryRepoResult<Vec<CategoryId>>;
}

/// SQLite-backed category repository.
#[derive(Debug)]
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn rusqlite::Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn rusqlite::Connection) -> CategoryRepoResult<Self> {
        ensure_category_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(
        &self,
        parent_uuid: Option<CategoryId>,
        name: &str,
        icon: Option<&str>,
    ) -> CategoryRepoResult<Category> {
        let uuid = Uuid::new_v4();
        validate_category_input(uuid, parent_uuid, name)?;

        if let Some(parent_uuid) = parent_uuid {
            if self.get_category(parent_uuid, false)?.is_none() {
                return Err(CategoryRepoError::CategoryNotFound(parent_uuid));
            }
        }

        self.conn.execute(
            "INSERT INTO categories (uuid, parent_uuid, name, icon, is_deleted)
             VALUES (?1, ?2, ?3, ?4, 0);",
            params![
                uuid.to_string(),
                parent_uuid.map(|value| value.to_string()),
                name.trim(),
                icon,
            ],
        )?;

        load_required_category(self.conn, uuid)
    }

    fn get_category(
        &self,
        uuid: CategoryId,
        include_deleted: bool,
    ) -> CategoryRepoResult<Option<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![
            uuid.to_string(),
            if include_deleted { 1_i64 } else { 0_i64 }
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_children(&self, parent_uuid: Option<CategoryId>) -> CategoryRepoResult<Vec<Category>> {
        let mut items = Vec::new();
        if let Some(parent_uuid) = parent_uuid {
            let mut stmt = self.conn.prepare(&format!(
                "{CATEGORY_SELECT_SQL}
                 WHERE parent_uuid = ?1
                   AND is_deleted = 0
                 ORDER BY name ASC, uuid ASC;"
            ))?;
            let mut rows = stmt.query([parent_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                items.push(parse_category_row(row)?);
            }
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "{CATEGORY_SELECT_SQL}
                 WHERE parent_uuid IS NULL
                   AND is_deleted = 0
                 ORDER BY name ASC, uuid ASC;"
            ))?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                items.push(parse_category_row(row)?);
            }
        }
        Ok(items)
    }

    fn rename_category(&self, uuid: CategoryId, name: &str) -> CategoryRepoResult<()> {
        validate_category_input(uuid, None, name)?;

        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![uuid.to_string(), name.trim()],
        )?;
        if changed == 0 {
            return Err(CategoryRepoError::CategoryNotFound(uuid));
        }
        Ok(())
    }

    fn soft_delete_category(&self, uuid: CategoryId) -> CategoryRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            [uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(CategoryRepoError::CategoryNotFound(uuid));
        }
        Ok(())
    }

    fn any_has_notes(&self, category_uuids: &[CategoryId]) -> CategoryRepoResult<bool> {
        if category_uuids.is_empty() {
            return Ok(false);
        }

        let sql = format!(
            "SELECT EXISTS(
                SELECT 1
                FROM notes n
                INNER JOIN categories c ON c.uuid = n.category_uuid
                WHERE n.is_deleted = 0
                  AND c.is_deleted = 0
                  AND n.category_uuid IN ({})
            );",
            sql_placeholders(category_uuids.len())
        );
        let exists: i64 = self
            .conn
            .query_row(&sql, params_from_iter(uuid_values(category_uuids)), |row| {
                row.get(0)
            })?;
        Ok(exists == 1)
    }

    fn children_ids(&self, category_uuids: &[CategoryId]) -> CategoryRepoResult<Vec<CategoryId>> {
        if category_uuids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT uuid
             FROM categories
             WHERE is_deleted = 0
               AND parent_uuid IN ({})
             ORDER BY uuid ASC;",
            sql_placeholders(category_uuids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(uuid_values(category_uuids)))?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "categories.uuid")?);
        }
        Ok(ids)
    }
}

fn load_required_category(
    conn: &rusqlite::Connection,
    uuid: CategoryId,
) -> CategoryRepoResult<Category> {
    let mut stmt = conn.prepare(&format!(
        "{CATEGORY_SELECT_SQL}
         WHERE uuid = ?1
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query([uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_category_row(row);
    }
    Err(CategoryRepoError::CategoryNotFound(uuid))
}

fn parse_category_row(row: &Row<'_>) -> CategoryRepoResult<Category> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "categories.uuid")?;

    let parent_uuid = row
        .get::<_, Option<String>>("parent_uuid")?
        .map(|value| parse_uuid(&value, "categories.parent_uuid"))
        .transpose()?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(CategoryRepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in categories.is_deleted"
            )));
        }
    };

    Ok(Category {
        uuid,
        parent_uuid,
        name: row.get("name")?,
        icon: row.get("icon")?,
        is_deleted,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn sql_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn uuid_values(ids: &[CategoryId]) -> Vec<Value> {
    ids.iter()
        .map(|id| Value::Text(id.to_string()))
        .collect()
}

fn parse_uuid(value: &str, column: &'static str) -> CategoryRepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| CategoryRepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn ensure_category_connection_ready(conn: &rusqlite::Connection) -> CategoryRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(CategoryRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "categories")? {
        return Err(CategoryRepoError::MissingRequiredTable("categories"));
    }

    for column in [
        "uuid",
        "parent_uuid",
        "name",
        "icon",
        "is_deleted",
        "created_at",
        "updated_at",
    ] {
        if !table_has_column(conn, "categories", column)? {
            return Err(CategoryRepoError::MissingRequiredColumn {
                table: "categories",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &rusqlite::Connection, table: &str) -> CategoryRepoResult<bool> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1
             FROM sqlite_master
             WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_column(
    conn: &rusqlite::Connection,
    table: &str,
    column: &str,
) -> CategoryRepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
