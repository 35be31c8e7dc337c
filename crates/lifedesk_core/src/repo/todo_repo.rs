//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `todos` and `todo_elements` storage.
//! - Answer module-relation lookups for the relatable-entity flow.
//!
//! # Invariants
//! - Write paths call `Todo::validate()` before SQL mutations.
//! - Todo listing is deterministic: `created_at ASC, uuid ASC`.
//! - Element listing is deterministic: `sort_order ASC, uuid ASC`.

use crate::db::DbError;
use crate::model::todo::{Todo, TodoElement, TodoElementId, TodoId, TodoValidationError};
use crate::modules::{parse_module_id, ModuleId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    completed,
    show_on_dashboard,
    module,
    related_entity_id,
    is_deleted,
    created_at,
    updated_at
FROM todos";

/// Result type used by todo repository operations.
pub type TodoRepoResult<T> = Result<T, TodoRepoError>;

/// Errors from todo repository operations.
#[derive(Debug)]
pub enum TodoRepoError {
    Validation(TodoValidationError),
    Db(DbError),
    TodoNotFound(TodoId),
    ElementNotFound(TodoElementId),
    InvalidData(String),
}

impl Display for TodoRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::ElementNotFound(id) => write!(f, "todo element not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for TodoRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoRepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for TodoRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for TodoRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for todo operations.
pub trait TodoRepository {
    fn create_todo(&self, todo: &Todo) -> TodoRepoResult<TodoId>;
    fn update_todo(&self, todo: &Todo) -> TodoRepoResult<()>;
    fn find_one_by_id(&self, id: TodoId) -> TodoRepoResult<Option<Todo>>;
    /// Lists todos by tombstone state.
    fn get_all(&self, deleted: bool) -> TodoRepoResult<Vec<Todo>>;
    /// Lists active todos related to one module.
    fn get_for_module(&self, module: ModuleId) -> TodoRepoResult<Vec<Todo>>;
    /// Finds the active todo related to one entity of one module.
    fn find_by_module_and_entity(
        &self,
        module: ModuleId,
        entity_id: &str,
    ) -> TodoRepoResult<Option<Todo>>;
    fn soft_delete_todo(&self, id: TodoId) -> TodoRepoResult<()>;
    /// Appends one checklist element at the end of the todo.
    fn add_element(&self, todo_id: TodoId, name: &str) -> TodoRepoResult<TodoElement>;
    fn set_element_done(&self, element_id: TodoElementId, is_done: bool) -> TodoRepoResult<()>;
    fn elements_for_todo(&self, todo_id: TodoId) -> TodoRepoResult<Vec<TodoElement>>;
    /// Returns whether every element of the todo is done.
    ///
    /// Vacuously true for todos without elements.
    fn are_all_elements_done(&self, todo_id: TodoId) -> TodoRepoResult<bool>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &Todo) -> TodoRepoResult<TodoId> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO todos (
                uuid,
                name,
                description,
                completed,
                show_on_dashboard,
                module,
                related_entity_id,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                todo.uuid.to_string(),
                todo.name.as_str(),
                todo.description.as_str(),
                bool_to_int(todo.completed),
                bool_to_int(todo.show_on_dashboard),
                todo.module.map(ModuleId::as_str),
                todo.related_entity_id.as_deref(),
                bool_to_int(todo.is_deleted),
            ],
        )?;

        Ok(todo.uuid)
    }

    fn update_todo(&self, todo: &Todo) -> TodoRepoResult<()> {
        todo.validate()?;

        let changed = self.conn.execute(
            "UPDATE todos
             SET
                name = ?1,
                description = ?2,
                completed = ?3,
                show_on_dashboard = ?4,
                module = ?5,
                related_entity_id = ?6,
                is_deleted = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                todo.name.as_str(),
                todo.description.as_str(),
                bool_to_int(todo.completed),
                bool_to_int(todo.show_on_dashboard),
                todo.module.map(ModuleId::as_str),
                todo.related_entity_id.as_deref(),
                bool_to_int(todo.is_deleted),
                todo.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(TodoRepoError::TodoNotFound(todo.uuid));
        }

        Ok(())
    }

    fn find_one_by_id(&self, id: TodoId) -> TodoRepoResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE uuid = ?1
               AND is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn get_all(&self, deleted: bool) -> TodoRepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE is_deleted = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([bool_to_int(deleted)])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn get_for_module(&self, module: ModuleId) -> TodoRepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE module = ?1
               AND is_deleted = 0
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([module.as_str()])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn find_by_module_and_entity(
        &self,
        module: ModuleId,
        entity_id: &str,
    ) -> TodoRepoResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE module = ?1
               AND related_entity_id = ?2
               AND is_deleted = 0
             ORDER BY created_at ASC, uuid ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query(params![module.as_str(), entity_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn soft_delete_todo(&self, id: TodoId) -> TodoRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(TodoRepoError::TodoNotFound(id));
        }

        Ok(())
    }

    fn add_element(&self, todo_id: TodoId, name: &str) -> TodoRepoResult<TodoElement> {
        if self.find_one_by_id(todo_id)?.is_none() {
            return Err(TodoRepoError::TodoNotFound(todo_id));
        }

        let uuid = Uuid::new_v4();
        let sort_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1
             FROM todo_elements
             WHERE todo_uuid = ?1;",
            [todo_id.to_string()],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO todo_elements (uuid, todo_uuid, name, is_done, sort_order)
             VALUES (?1, ?2, ?3, 0, ?4);",
            params![uuid.to_string(), todo_id.to_string(), name, sort_order],
        )?;

        Ok(TodoElement {
            uuid,
            todo_uuid: todo_id,
            name: name.to_string(),
            is_done: false,
            sort_order,
        })
    }

    fn set_element_done(&self, element_id: TodoElementId, is_done: bool) -> TodoRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todo_elements
             SET is_done = ?2
             WHERE uuid = ?1;",
            params![element_id.to_string(), bool_to_int(is_done)],
        )?;
        if changed == 0 {
            return Err(TodoRepoError::ElementNotFound(element_id));
        }
        Ok(())
    }

    fn elements_for_todo(&self, todo_id: TodoId) -> TodoRepoResult<Vec<TodoElement>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, todo_uuid, name, is_done, sort_order
             FROM todo_elements
             WHERE todo_uuid = ?1
             ORDER BY sort_order ASC, uuid ASC;",
        )?;

        let mut rows = stmt.query([todo_id.to_string()])?;
        let mut elements = Vec::new();
        while let Some(row) = rows.next()? {
            elements.push(parse_element_row(row)?);
        }
        Ok(elements)
    }

    fn are_all_elements_done(&self, todo_id: TodoId) -> TodoRepoResult<bool> {
        if self.find_one_by_id(todo_id)?.is_none() {
            return Err(TodoRepoError::TodoNotFound(todo_id));
        }

        let open_count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM todo_elements
             WHERE todo_uuid = ?1
               AND is_done = 0;",
            [todo_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(open_count == 0)
    }
}

fn parse_todo_row(row: &Row<'_>) -> TodoRepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        TodoRepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let module = match row.get::<_, Option<String>>("module")? {
        Some(value) => Some(parse_module_id(&value).map_err(|_| {
            TodoRepoError::InvalidData(format!("invalid module `{value}` in todos.module"))
        })?),
        None => None,
    };

    let todo = Todo {
        uuid,
        name: row.get("name")?,
        description: row.get("description")?,
        completed: int_to_bool(row.get("completed")?, "todos.completed")?,
        show_on_dashboard: int_to_bool(row.get("show_on_dashboard")?, "todos.show_on_dashboard")?,
        module,
        related_entity_id: row.get("related_entity_id")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "todos.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    todo.validate()?;
    Ok(todo)
}

fn parse_element_row(row: &Row<'_>) -> TodoRepoResult<TodoElement> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        TodoRepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in todo_elements.uuid"
        ))
    })?;

    let todo_text: String = row.get("todo_uuid")?;
    let todo_uuid = Uuid::parse_str(&todo_text).map_err(|_| {
        TodoRepoError::InvalidData(format!(
            "invalid uuid value `{todo_text}` in todo_elements.todo_uuid"
        ))
    })?;

    Ok(TodoElement {
        uuid,
        todo_uuid,
        name: row.get("name")?,
        is_done: int_to_bool(row.get("is_done")?, "todo_elements.is_done")?,
        sort_order: row.get("sort_order")?,
    })
}

fn int_to_bool(value: i64, column: &'static str) -> TodoRepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(TodoRepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
