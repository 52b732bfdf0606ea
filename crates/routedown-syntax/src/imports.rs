//! The resolved import table.
//!
//! Built once by the frontend from the module graph, before any symbol
//! resolution happens, and read-only afterward. The core never interprets
//! import specifiers itself; every entry already points at a resolved module
//! path.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Where a locally bound import name points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportTarget {
    /// `import { original as local } from "module"` (or a default import,
    /// with `imported` set to the exporter's declared name).
    Named { module: String, imported: String },
    /// `import * as local from "module"`.
    Namespace { module: String },
}

impl ImportTarget {
    /// The target module path, regardless of import shape.
    pub fn module(&self) -> &str {
        match self {
            ImportTarget::Named { module, .. } => module,
            ImportTarget::Namespace { module } => module,
        }
    }
}

/// Lookup table from (importing module, local name) to the import target.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ImportTable {
    entries: FxHashMap<(String, String), ImportTarget>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named import binding.
    pub fn add_named(
        &mut self,
        module: impl Into<String>,
        local: impl Into<String>,
        target_module: impl Into<String>,
        imported: impl Into<String>,
    ) {
        self.entries.insert(
            (module.into(), local.into()),
            ImportTarget::Named {
                module: target_module.into(),
                imported: imported.into(),
            },
        );
    }

    /// Registers a namespace import binding.
    pub fn add_namespace(
        &mut self,
        module: impl Into<String>,
        local: impl Into<String>,
        target_module: impl Into<String>,
    ) {
        self.entries.insert(
            (module.into(), local.into()),
            ImportTarget::Namespace {
                module: target_module.into(),
            },
        );
    }

    /// Looks up what `local` is bound to inside `module`.
    pub fn lookup(&self, module: &str, local: &str) -> Option<&ImportTarget> {
        // FxHashMap keys are owned pairs; the borrow-key workaround is not
        // worth it for a cold lookup path.
        self.entries.get(&(module.to_string(), local.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
