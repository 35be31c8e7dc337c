//! In-process registry of relatable-entity providers.
//!
//! # Responsibility
//! - Key providers by module id and dispatch candidate lookups to them.
//! - Reject duplicate registrations and unknown-module lookups.
//!
//! # Invariants
//! - At most one provider per module id.
//! - Lookup dispatch never falls back to a hard-coded module switch.

use crate::modules::ModuleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// One candidate entity a todo may relate to.
///
/// `active == false` means the candidate is already taken by another todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityData {
    /// Stable entity id inside its module.
    pub id: String,
    /// User-facing display name.
    pub name: String,
    /// Whether the candidate is still available for a new relation.
    pub active: bool,
}

/// Provider registration/lookup errors.
#[derive(Debug)]
pub enum RelatableError {
    /// A provider is already registered for the module.
    DuplicateModule(ModuleId),
    /// No provider is registered for the module.
    ProviderNotFound(ModuleId),
    /// Provider-side lookup failure.
    Lookup(Box<dyn Error + Send + Sync>),
}

impl Display for RelatableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateModule(module) => {
                write!(f, "provider already registered for module: {}", module.as_str())
            }
            Self::ProviderNotFound(module) => {
                write!(f, "no provider registered for module: {}", module.as_str())
            }
            Self::Lookup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RelatableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lookup(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Strategy interface listing relatable entities of one module.
pub trait RelatableProvider {
    /// Module this provider serves.
    fn module(&self) -> ModuleId;
    /// Lists candidate entities, flagging already-related ones inactive.
    fn relatable_entities(&self) -> Result<Vec<EntityData>, RelatableError>;
    /// Returns whether one active entity with this id exists.
    fn entity_exists(&self, entity_id: &str) -> Result<bool, RelatableError>;
}

/// Registry of relatable-entity providers keyed by module id.
#[derive(Default)]
pub struct RelatableRegistry<'p> {
    providers: BTreeMap<ModuleId, Arc<dyn RelatableProvider + 'p>>,
}

impl<'p> RelatableRegistry<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one provider for its module.
    pub fn register(
        &mut self,
        provider: Arc<dyn RelatableProvider + 'p>,
    ) -> Result<(), RelatableError> {
        let module = provider.module();
        if self.providers.contains_key(&module) {
            return Err(RelatableError::DuplicateModule(module));
        }
        self.providers.insert(module, provider);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns registered module ids in sorted order.
    pub fn modules(&self) -> Vec<ModuleId> {
        self.providers.keys().copied().collect()
    }

    /// Returns one provider by module id.
    pub fn get(
        &self,
        module: ModuleId,
    ) -> Result<Arc<dyn RelatableProvider + 'p>, RelatableError> {
        self.providers
            .get(&module)
            .cloned()
            .ok_or(RelatableError::ProviderNotFound(module))
    }

    /// Lists candidate entities for one module.
    pub fn relatable_entities(&self, module: ModuleId) -> Result<Vec<EntityData>, RelatableError> {
        self.get(module)?.relatable_entities()
    }

    /// Lists candidate entities grouped by every registered module.
    pub fn relatable_entities_by_module(
        &self,
    ) -> Result<BTreeMap<ModuleId, Vec<EntityData>>, RelatableError> {
        let mut grouped = BTreeMap::new();
        for (module, provider) in &self.providers {
            grouped.insert(*module, provider.relatable_entities()?);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityData, RelatableError, RelatableProvider, RelatableRegistry};
    use crate::modules::ModuleId;
    use std::sync::Arc;

    struct FixedProvider {
        module: ModuleId,
        entities: Vec<EntityData>,
    }

    impl RelatableProvider for FixedProvider {
        fn module(&self) -> ModuleId {
            self.module
        }

        fn relatable_entities(&self) -> Result<Vec<EntityData>, RelatableError> {
            Ok(self.entities.clone())
        }

        fn entity_exists(&self, entity_id: &str) -> Result<bool, RelatableError> {
            Ok(self.entities.iter().any(|entity| entity.id == entity_id))
        }
    }

    fn note_provider() -> Arc<FixedProvider> {
        Arc::new(FixedProvider {
            module: ModuleId::Notes,
            entities: vec![
                EntityData {
                    id: "n1".to_string(),
                    name: "First".to_string(),
                    active: true,
                },
                EntityData {
                    id: "n2".to_string(),
                    name: "Second".to_string(),
                    active: false,
                },
            ],
        })
    }

    #[test]
    fn registers_and_lists_by_module() {
        let mut registry = RelatableRegistry::new();
        registry.register(note_provider()).expect("register");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.modules(), vec![ModuleId::Notes]);

        let entities = registry
            .relatable_entities(ModuleId::Notes)
            .expect("entities");
        assert_eq!(entities.len(), 2);
        assert!(entities[0].active);
        assert!(!entities[1].active);
    }

    #[test]
    fn rejects_duplicate_module_registration() {
        let mut registry = RelatableRegistry::new();
        registry.register(note_provider()).expect("first register");
        let err = registry
            .register(note_provider())
            .expect_err("duplicate must fail");
        assert!(matches!(err, RelatableError::DuplicateModule(ModuleId::Notes)));
    }

    #[test]
    fn unknown_module_lookup_fails() {
        let registry = RelatableRegistry::new();
        let err = registry
            .relatable_entities(ModuleId::Notes)
            .expect_err("missing provider must fail");
        assert!(matches!(
            err,
            RelatableError::ProviderNotFound(ModuleId::Notes)
        ));
    }

    #[test]
    fn groups_entities_per_registered_module() {
        let mut registry = RelatableRegistry::new();
        registry.register(note_provider()).expect("register");

        let grouped = registry
            .relatable_entities_by_module()
            .expect("grouped lookup");
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&ModuleId::Notes].len(), 2);
    }
}
