//! # routedown-syntax
//!
//! Pure data structures describing a pre-built syntax-and-symbol forest.
//!
//! The routedown core does not parse source text or resolve module
//! specifiers. Instead it consumes two read-only views that a frontend
//! (parser, bundler plugin, language-server bridge) builds ahead of time:
//!
//! - [`SyntaxForest`] — top-level declarations per module path.
//! - [`ImportTable`] — for each module, where every locally bound import
//!   name actually comes from.
//!
//! Everything in this crate is a plain value type: no I/O, no interior
//! mutability, serde-serializable throughout.

pub mod imports;
pub mod module;
pub mod types;

pub use imports::{ImportTable, ImportTarget};
pub use module::{
    Declaration, DeclarationKind, EnumDeclaration, EnumInitializer, EnumMember,
    InterfaceDeclaration, Module, ObjectLiteral, ObjectMember, ObjectMemberKind, SyntaxForest,
    TypeAliasDeclaration, VariableDeclaration,
};
pub use types::{EntityName, Literal, PropertyName, PropertySignature, TypeExpr, TypeKeyword, TypeReference};
