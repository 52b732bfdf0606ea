//! Modules and their top-level declarations.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::{PropertySignature, TypeExpr, TypeReference};

/// The full set of modules handed to the documentation core.
///
/// Keys are module paths as the frontend resolved them; the core never
/// normalizes or re-resolves paths, it only looks them up verbatim.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SyntaxForest {
    modules: FxHashMap<String, Module>,
}

impl SyntaxForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, replacing any previous module at the same path.
    pub fn add_module(&mut self, module: Module) {
        self.modules.insert(module.path.clone(), module);
    }

    /// Looks up a module by path.
    pub fn module(&self, path: &str) -> Option<&Module> {
        self.modules.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Module paths in sorted order, so callers iterate deterministically.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// One source module: a path plus its top-level declarations in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub path: String,
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            declarations: Vec::new(),
        }
    }

    pub fn with_declarations(path: impl Into<String>, declarations: Vec<Declaration>) -> Self {
        Self {
            path: path.into(),
            declarations,
        }
    }

    pub fn push(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// Finds a top-level declaration by name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }
}

/// A named top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    /// Attached documentation comment, with comment delimiters stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub kind: DeclarationKind,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            kind,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// The declaration kinds the resolver searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Variable(VariableDeclaration),
    Function,
    Class,
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Enum(EnumDeclaration),
    /// `export * as name from "module"` — a whole-module re-export bound to
    /// a namespace name.
    NamespaceExport { target_module: String },
}

/// A `const`/`let`/`var` declaration. Only an object-literal initializer is
/// retained, because that is the only shape qualified-name resolution can
/// descend into.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<ObjectLiteral>,
}

/// An `interface` declaration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    /// Generic parameter names. Non-empty means the core rejects the
    /// interface.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    /// `extends` heritage clauses, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TypeReference>,
    pub members: Vec<PropertySignature>,
}

/// A `type X = ...` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAliasDeclaration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    pub aliased: TypeExpr,
}

/// An `enum` declaration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EnumDeclaration {
    pub members: Vec<EnumMember>,
}

/// One enum member, with its explicit initializer when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<EnumInitializer>,
}

impl EnumMember {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initializer: None,
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            initializer: Some(EnumInitializer::Number(value)),
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initializer: Some(EnumInitializer::String(value.into())),
        }
    }
}

/// Explicit enum member initializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumInitializer {
    Number(f64),
    String(String),
}

/// An object-literal initializer, kept only as a member-name index.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ObjectLiteral {
    pub members: Vec<ObjectMember>,
}

/// One member of an object literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMember {
    pub name: String,
    pub kind: ObjectMemberKind,
}

impl ObjectMember {
    pub fn new(name: impl Into<String>, kind: ObjectMemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The member shapes qualified-name resolution matches inside an object
/// literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectMemberKind {
    Property,
    Shorthand,
    Method,
    Accessor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forest_paths_are_sorted() {
        let mut forest = SyntaxForest::new();
        forest.add_module(Module::new("src/b.ts"));
        forest.add_module(Module::new("src/a.ts"));
        forest.add_module(Module::new("lib/z.ts"));
        assert_eq!(forest.paths(), vec!["lib/z.ts", "src/a.ts", "src/b.ts"]);
    }

    #[test]
    fn module_lookup_finds_declarations_by_name() {
        let mut module = Module::new("src/api.ts");
        module.push(Declaration::new(
            "Routes",
            DeclarationKind::Interface(InterfaceDeclaration::default()),
        ));
        assert!(module.declaration("Routes").is_some());
        assert!(module.declaration("Missing").is_none());
    }
}
