//! Module identifiers shared by lock markers and relatable-entity lookups.
//!
//! # Responsibility
//! - Define the closed set of module names known to the core.
//! - Provide stable string ids used as persistence keys.
//!
//! # Invariants
//! - String ids are lowercase and never change once released; they key
//!   `locked_resources.module` and `todos.module` rows.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of one application module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleId {
    #[serde(rename = "my_notes")]
    Notes,
    #[serde(rename = "my_notes_category")]
    NotesCategory,
    #[serde(rename = "my_todo")]
    Todo,
}

impl ModuleId {
    /// Stable string id used in persistence and lock markers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => MODULE_NOTES,
            Self::NotesCategory => MODULE_NOTES_CATEGORY,
            Self::Todo => MODULE_TODO,
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Notes => "Personal notes grouped into a category hierarchy.",
            Self::NotesCategory => "Category tree nodes grouping notes.",
            Self::Todo => "Todo lists with optional checklist elements.",
        }
    }
}

/// Persistence string value for the notes module.
pub const MODULE_NOTES: &str = "my_notes";
/// Persistence string value for the notes-category module.
pub const MODULE_NOTES_CATEGORY: &str = "my_notes_category";
/// Persistence string value for the todo module.
pub const MODULE_TODO: &str = "my_todo";

const SUPPORTED_MODULE_STRINGS: &[&str] = &[MODULE_NOTES, MODULE_NOTES_CATEGORY, MODULE_TODO];

/// Returns supported module id strings.
pub fn supported_module_strings() -> &'static [&'static str] {
    SUPPORTED_MODULE_STRINGS
}

/// Parses one module id from its persistence string value.
pub fn parse_module_id(value: &str) -> Result<ModuleId, ModuleIdError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ModuleIdError::EmptyModule);
    }

    match normalized {
        MODULE_NOTES => Ok(ModuleId::Notes),
        MODULE_NOTES_CATEGORY => Ok(ModuleId::NotesCategory),
        MODULE_TODO => Ok(ModuleId::Todo),
        other => Err(ModuleIdError::UnsupportedModule(other.to_string())),
    }
}

/// Module id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleIdError {
    EmptyModule,
    UnsupportedModule(String),
}

impl Display for ModuleIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyModule => write!(f, "module id value must not be empty"),
            Self::UnsupportedModule(value) => {
                write!(f, "module id is unsupported: {value}")
            }
        }
    }
}

impl Error for ModuleIdError {}

#[cfg(test)]
mod tests {
    use super::{parse_module_id, supported_module_strings, ModuleId, ModuleIdError};

    #[test]
    fn parses_all_supported_modules() {
        assert_eq!(
            parse_module_id("my_notes").expect("notes parse"),
            ModuleId::Notes
        );
        assert_eq!(
            parse_module_id("my_notes_category").expect("category parse"),
            ModuleId::NotesCategory
        );
        assert_eq!(
            parse_module_id("my_todo").expect("todo parse"),
            ModuleId::Todo
        );
    }

    #[test]
    fn rejects_empty_module_id() {
        let err = parse_module_id("   ").expect_err("empty module must fail");
        assert_eq!(err, ModuleIdError::EmptyModule);
    }

    #[test]
    fn rejects_unsupported_module_id() {
        let err = parse_module_id("my_passwords").expect_err("unknown module must fail");
        assert_eq!(
            err,
            ModuleIdError::UnsupportedModule("my_passwords".to_string())
        );
    }

    #[test]
    fn rejects_non_lowercase_module_variants() {
        let err = parse_module_id("My_Notes").expect_err("capitalized module must fail");
        assert_eq!(err, ModuleIdError::UnsupportedModule("My_Notes".to_string()));
    }

    #[test]
    fn every_module_has_a_description() {
        for value in supported_module_strings() {
            let module = parse_module_id(value).expect("supported module parses");
            assert!(!module.description().is_empty());
        }
    }

    #[test]
    fn returns_supported_module_strings() {
        let values = supported_module_strings();
        assert!(values.contains(&"my_notes"));
        assert!(values.contains(&"my_notes_category"));
        assert!(values.contains(&"my_todo"));
    }
}
