//! Locked-resource access-control marker.
//!
//! # Responsibility
//! - Define the marker record keyed by `(resource_id, kind, module)`.
//! - Keep resource ids as strings so uuid-backed records and upload
//!   directory paths share one marker shape.
//!
//! # Invariants
//! - Presence of an active marker means the resource is locked.
//! - One `(resource_id, kind, module)` triple carries at most one marker.

use crate::modules::ModuleId;
use serde::{Deserialize, Serialize};

/// Kind of resource a lock marker protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A single persisted record (note, category, todo).
    Entity,
    /// An upload directory path.
    Directory,
}

impl ResourceKind {
    /// Stable string id used in persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Directory => "directory",
        }
    }
}

/// Parses one resource kind from its persistence string value.
pub fn parse_resource_kind(value: &str) -> Option<ResourceKind> {
    match value {
        "entity" => Some(ResourceKind::Entity),
        "directory" => Some(ResourceKind::Directory),
        _ => None,
    }
}

/// Access-control marker read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedResource {
    /// Locked resource id. Uuid string for entities, path for directories.
    pub resource_id: String,
    /// Resource kind.
    pub kind: ResourceKind,
    /// Module the resource belongs to.
    pub module: ModuleId,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
}
