#![deny(clippy::all)]

//! Route-documentation extraction and generation for routedown.
//!
//! This crate provides:
//! - A semantic type model and Router/Route/RouteMethod records.
//! - A cross-module symbol resolver and type-expression translator over the
//!   read-only syntax forest from `routedown-syntax`.
//! - A route-model extractor driven by `#ExportRoute("...")` markers.
//! - An immutable text-block layout algebra and generators for Markdown and
//!   JSON output.
//!
//! The crate is fully synchronous and performs no I/O: it consumes the
//! pre-built forest and import table and returns strings.

pub mod error;
pub mod extractor;
pub mod layout;
pub mod model;
pub mod resolver;
pub mod translate;

#[cfg(any(feature = "markdown", feature = "json"))]
pub mod generators;

pub use error::{DocsError, Result};
pub use extractor::{ExtractOptions, RouteExtractor};
pub use layout::Block;
pub use model::{
    LiteralSet, Param, QueryParam, Response, Route, RouteMethod, Router, Type, TypeKind, Verb,
};
pub use resolver::{MemberNode, Resolution, Resolver};
pub use translate::Translator;

#[cfg(feature = "markdown")]
pub use generators::markdown::{render_documents, render_markdown, render_router};

#[cfg(feature = "json")]
pub use generators::json::render_json;
