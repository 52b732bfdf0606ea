use thiserror::Error;

/// Result type alias for documentation operations.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Error variants for route extraction and type translation.
///
/// Resolution misses are not errors — they degrade to opaque types at the
/// call site. Everything here is fatal for the run.
#[derive(Debug, Error)]
pub enum DocsError {
    /// An import or reference pointed at a module absent from the forest.
    #[error("unknown module '{path}'")]
    UnknownModule {
        /// Module path that could not be found.
        path: String,
    },

    /// A construct outside the supported type subset.
    #[error("unsupported construct: {details}")]
    Unsupported {
        /// What was encountered.
        details: String,
    },

    /// A reference re-entered a declaration that is still being translated.
    #[error("recursive type reference to '{name}' in '{module}'")]
    RecursiveReference {
        /// Module holding the declaration.
        module: String,
        /// Declaration name.
        name: String,
    },

    /// A route member whose name is not one of the HTTP verbs.
    #[error("invalid HTTP method '{method}' on route '{route}'")]
    InvalidMethod {
        /// Route path pattern containing the offending member.
        route: String,
        /// The member name that failed verb parsing.
        method: String,
    },

    /// A method type-literal field outside the recognized set.
    #[error("unrecognized field '{field}' in method '{method}'")]
    UnknownMethodField {
        /// Display name of the method being built.
        method: String,
        /// The offending field name.
        field: String,
    },

    /// A response member whose name does not parse as a status code.
    #[error("invalid response status '{key}' in method '{method}'")]
    InvalidStatus {
        /// Display name of the method being built.
        method: String,
        /// The member name that failed to parse.
        key: String,
    },

    /// Generic error variant.
    #[error("{message}")]
    Other {
        /// Human-readable error message.
        message: String,
    },

    /// Context frame recording which type expression was being translated
    /// when the underlying failure occurred. Frames accumulate innermost
    /// first, so the rendered message unwinds the full nesting.
    #[error("{source}; in `{expr}`")]
    InType {
        /// Source-like text of the enclosing expression.
        expr: String,
        /// The underlying failure.
        #[source]
        source: Box<DocsError>,
    },
}

impl DocsError {
    /// Helper for the common unsupported-construct case.
    pub fn unsupported(details: impl Into<String>) -> Self {
        Self::Unsupported {
            details: details.into(),
        }
    }

    /// Wraps `source` with the expression being translated.
    pub fn in_expr(expr: impl ToString, source: DocsError) -> Self {
        Self::InType {
            expr: expr.to_string(),
            source: Box::new(source),
        }
    }
}
