//! The module instance tree.
//!
//! Module instances are registered during elaboration into an
//! arena-plus-index table: each entry holds its definition name, instance
//! name, and the `ModuleId` of its parent. Children never hold references
//! to their parents, so teardown order is unconstrained. Registration
//! enforces the tree shape: exactly one root, and every other module names
//! a parent that was registered earlier.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use silica_common::{Arena, EntityId};

/// Opaque ID of a registered module instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ModuleId(u32);

impl EntityId for ModuleId {
    fn from_index(index: u32) -> Self {
        Self(index)
    }

    fn index(self) -> u32 {
        self.0
    }
}

/// Static facts about one module instance.
#[derive(Debug, Clone)]
struct ModuleInfo {
    def_name: String,
    inst_name: String,
    parent: Option<ModuleId>,
}

/// The elaborated module instance tree.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    modules: Arena<ModuleId, ModuleInfo>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module instance.
    ///
    /// The first registration must be the root (`parent == None`); every
    /// later one must name an already-registered parent. Violations are
    /// elaboration errors and abort model construction.
    pub fn register(
        &mut self,
        def_name: impl Into<String>,
        inst_name: impl Into<String>,
        parent: Option<ModuleId>,
    ) -> Result<ModuleId, SimError> {
        let inst_name = inst_name.into();
        match parent {
            None => {
                if let Some(root) = self.modules.values().next() {
                    return Err(SimError::SecondRoot {
                        root: root.inst_name.clone(),
                        inst: inst_name,
                    });
                }
            }
            Some(p) => {
                if self.modules.try_get(p).is_none() {
                    return Err(SimError::UnknownParent { inst: inst_name });
                }
            }
        }
        Ok(self.modules.insert(ModuleInfo {
            def_name: def_name.into(),
            inst_name,
            parent,
        }))
    }

    /// Returns the definition (type) name of a module.
    pub fn def_name(&self, id: ModuleId) -> &str {
        &self.modules[id].def_name
    }

    /// Returns the instance name of a module.
    pub fn inst_name(&self, id: ModuleId) -> &str {
        &self.modules[id].inst_name
    }

    /// Returns the parent of a module, or `None` for the root.
    pub fn parent(&self, id: ModuleId) -> Option<ModuleId> {
        self.modules[id].parent
    }

    /// Returns the dotted instance path from the root down to `id`.
    pub fn path(&self, id: ModuleId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(m) = cursor {
            names.push(self.modules[m].inst_name.as_str());
            cursor = self.modules[m].parent;
        }
        names.reverse();
        names.join(".")
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` before any module has been registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates all registered module IDs in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.iter().map(|(id, _)| id)
    }
}
