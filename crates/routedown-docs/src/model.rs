use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Semantic type representation, fully resolved and source-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub kind: TypeKind,
    /// Display name, set when the type came from a named declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text documentation carried along for rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Type {
    /// An anonymous, undocumented type of the given kind.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            name: None,
            documentation: None,
        }
    }

    /// An opaque named object with no members — the degraded form for
    /// references that could not be resolved.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Object(IndexMap::new()),
            name: Some(name.into()),
            documentation: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Closed tagged union of the supported type shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Number(LiteralSet<f64>),
    Boolean(LiteralSet<bool>),
    String(LiteralSet<String>),
    Array(Box<Type>),
    Tuple(Vec<Type>),
    /// Ordered member mapping; insertion order is rendering order and later
    /// inserts during heritage merging overwrite earlier values.
    Object(IndexMap<String, Type>),
    Null,
    Undefined,
    Union(Vec<Type>),
    Intersection(Vec<Type>),
}

impl TypeKind {
    /// An object kind with no members.
    pub fn empty_object() -> Self {
        TypeKind::Object(IndexMap::new())
    }
}

/// Either every value of a primitive kind, or an ordered set of literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralSet<T> {
    All,
    Literals(Vec<T>),
}

impl<T> LiteralSet<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, LiteralSet::All)
    }

    /// Single-literal set.
    pub fn of(value: T) -> Self {
        LiteralSet::Literals(vec![value])
    }
}

/// One HTTP verb's documented contract on a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMethod {
    pub verb: Verb,
    /// Display name from the `name` field; "UNNAMED" when absent.
    pub name: String,
    /// Documentation attached to the method's property signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Type>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub query: Vec<QueryParam>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub responses: Vec<Response>,
}

impl RouteMethod {
    /// A method with the default display name and no sections.
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            name: "UNNAMED".to_string(),
            documentation: None,
            authorization: None,
            body: None,
            params: Vec::new(),
            query: Vec::new(),
            responses: Vec::new(),
        }
    }
}

/// The fixed verb set recognized as route members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Trace,
}

impl Verb {
    /// Parses a member name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        const ALL: [Verb; 8] = [
            Verb::Get,
            Verb::Head,
            Verb::Post,
            Verb::Put,
            Verb::Delete,
            Verb::Patch,
            Verb::Options,
            Verb::Trace,
        ];
        ALL.into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
            Verb::Options => "OPTIONS",
            Verb::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// A query-string parameter. `required` is true unless the member was
/// declared optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub required: bool,
    pub ty: Type,
}

/// A documented response. `body` is `None` when the member was typed as the
/// `undefined` keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Type>,
}

/// One path pattern and its method contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub methods: Vec<RouteMethod>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            methods: Vec::new(),
        }
    }
}

/// A group of routes sharing one path prefix, built from one annotated
/// declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Router {
    /// Name of the declaration carrying the marker; used as the file name in
    /// per-router output.
    pub name: String,
    /// The path prefix from the marker argument.
    pub base: String,
    /// Declaration documentation with the marker substring stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub routes: Vec<Route>,
}
