//! Route-model extraction from annotated declarations.
//!
//! Scans every top-level declaration in the forest for the marker annotation
//! (`#ExportRoute("<prefix>")` by default), then walks the annotated type
//! down two property levels — routes, then methods — translating the typed
//! sections along the way.

use routedown_syntax::{
    Declaration, DeclarationKind, ImportTable, Literal, PropertySignature, SyntaxForest, TypeExpr,
    TypeKeyword,
};
use tracing::debug;

use crate::error::{DocsError, Result};
use crate::model::{Param, QueryParam, Response, Route, RouteMethod, Router, Verb};
use crate::resolver::{Resolution, Resolver};
use crate::translate::Translator;

/// Options controlling route extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Marker tag name; a declaration is exported when its documentation
    /// contains `#<marker>("<prefix>")`.
    pub marker: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            marker: "ExportRoute".to_string(),
        }
    }
}

/// Extracts [`Router`] records from a pre-built syntax forest.
#[derive(Debug, Clone, Default)]
pub struct RouteExtractor {
    options: ExtractOptions,
}

impl RouteExtractor {
    /// Create a new extractor with the provided options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Scans every module (in path order) and builds one router per marked
    /// declaration that yields at least one route.
    pub fn extract(&self, forest: &SyntaxForest, imports: &ImportTable) -> Result<Vec<Router>> {
        let resolver = Resolver::new(forest, imports);
        let mut translator = Translator::new(resolver);
        let mut routers = Vec::new();

        for path in forest.paths() {
            let module = resolver.module(path)?;
            for decl in &module.declarations {
                let Some(doc) = decl.documentation.as_deref() else {
                    continue;
                };
                let Some(marker) = find_marker(&self.options.marker, doc) else {
                    continue;
                };
                debug!(module = path, declaration = decl.name.as_str(), "found route marker");
                if let Some(router) =
                    build_router(&resolver, &mut translator, path, decl, marker)?
                {
                    routers.push(router);
                }
            }
        }
        Ok(routers)
    }
}

/// A successfully parsed marker annotation.
struct MarkerMatch {
    /// The route base from the marker argument.
    prefix: String,
    /// The documentation with the marker substring removed, or `None` when
    /// nothing else remains.
    documentation: Option<String>,
}

/// Finds and parses `#<tag>("...")` inside a documentation comment. Any
/// malformed marker (missing quotes, bad JSON escape, missing close paren)
/// yields `None` — the declaration is simply not exported.
fn find_marker(tag: &str, documentation: &str) -> Option<MarkerMatch> {
    let needle = format!("#{tag}(");
    let start = documentation.find(&needle)?;
    let arg_start = start + needle.len();
    let rest = &documentation[arg_start..];
    if !rest.starts_with('"') {
        return None;
    }

    // Scan for the closing unescaped quote; the argument is a JSON string
    // and may contain escaped quotes.
    let mut escaped = false;
    let mut quote_end = None;
    for (offset, ch) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            quote_end = Some(offset);
            break;
        }
    }
    let quote_end = quote_end?;
    if !rest[quote_end + 1..].starts_with(')') {
        return None;
    }

    let prefix: String = serde_json::from_str(&rest[..=quote_end]).ok()?;
    let marker_end = arg_start + quote_end + 2;

    let mut remaining = String::with_capacity(documentation.len());
    remaining.push_str(&documentation[..start]);
    remaining.push_str(&documentation[marker_end..]);
    let remaining = remaining.trim();
    Some(MarkerMatch {
        prefix,
        documentation: (!remaining.is_empty()).then(|| remaining.to_string()),
    })
}

fn build_router(
    resolver: &Resolver<'_>,
    translator: &mut Translator<'_>,
    module: &str,
    decl: &Declaration,
    marker: MarkerMatch,
) -> Result<Option<Router>> {
    let Some((routes_module, route_sigs)) = declaration_members(resolver, module, decl)? else {
        return Ok(None);
    };

    let mut routes = Vec::new();
    for route_sig in route_sigs {
        let path = route_sig.name.as_ident().ok_or_else(|| {
            DocsError::unsupported(format!("computed route name `{}`", route_sig.name))
        })?;
        let type_ann = route_sig.type_ann.as_ref().ok_or_else(|| {
            DocsError::unsupported(format!("route '{path}' has no type annotation"))
        })?;
        let Some((methods_module, method_sigs)) =
            literal_members(resolver, routes_module, type_ann)?
        else {
            return Err(DocsError::unsupported(format!(
                "route '{path}' is not described by a type literal"
            )));
        };

        let mut route = Route::new(path);
        for method_sig in method_sigs {
            route
                .methods
                .push(build_method(resolver, translator, methods_module, path, method_sig)?);
        }
        routes.push(route);
    }

    if routes.is_empty() {
        debug!(declaration = decl.name.as_str(), "marked declaration has no routes");
        return Ok(None);
    }
    Ok(Some(Router {
        name: decl.name.clone(),
        base: marker.prefix,
        documentation: marker.documentation,
        routes,
    }))
}

fn build_method(
    resolver: &Resolver<'_>,
    translator: &mut Translator<'_>,
    module: &str,
    route_path: &str,
    sig: &PropertySignature,
) -> Result<RouteMethod> {
    let member_name = sig.name.as_ident().ok_or_else(|| {
        DocsError::unsupported(format!("computed method name `{}`", sig.name))
    })?;
    let verb = Verb::parse(member_name).ok_or_else(|| DocsError::InvalidMethod {
        route: route_path.to_string(),
        method: member_name.to_string(),
    })?;
    let type_ann = sig.type_ann.as_ref().ok_or_else(|| {
        DocsError::unsupported(format!(
            "method '{member_name}' on route '{route_path}' has no type annotation"
        ))
    })?;
    let Some((fields_module, fields)) = literal_members(resolver, module, type_ann)? else {
        return Err(DocsError::unsupported(format!(
            "method '{member_name}' on route '{route_path}' is not described by a type literal"
        )));
    };

    let mut method = RouteMethod::new(verb);
    method.documentation = sig.documentation.clone();

    // The display name is picked up first so later failures can report it.
    for field in fields {
        if field.name.as_ident() == Some("name") {
            match &field.type_ann {
                Some(TypeExpr::Literal(Literal::String(value))) => {
                    method.name = value.clone();
                }
                _ => {
                    return Err(DocsError::unsupported(format!(
                        "method name on route '{route_path}' must be a string-literal type"
                    )))
                }
            }
        }
    }

    for field in fields {
        let field_name = field.name.as_ident().ok_or_else(|| {
            DocsError::unsupported(format!("computed field name `{}`", field.name))
        })?;
        let type_ann = field.type_ann.as_ref().ok_or_else(|| {
            DocsError::unsupported(format!(
                "field '{field_name}' in method '{}' has no type annotation",
                method.name
            ))
        })?;
        match field_name {
            "name" => {}
            "authorization" => {
                method.authorization =
                    Some(translator.translate(fields_module, type_ann, None, false)?);
            }
            "body" => {
                method.body = Some(translator.translate(fields_module, type_ann, None, false)?);
            }
            "param" => {
                let (params_module, param_sigs) =
                    expect_literal(resolver, fields_module, type_ann, "param", &method.name)?;
                for param_sig in param_sigs {
                    let (name, ann) = named_member(param_sig, "param", &method.name)?;
                    method.params.push(Param {
                        name: name.to_string(),
                        ty: translator.translate(params_module, ann, None, false)?,
                    });
                }
            }
            "query" => {
                let (query_module, query_sigs) =
                    expect_literal(resolver, fields_module, type_ann, "query", &method.name)?;
                for query_sig in query_sigs {
                    let (name, ann) = named_member(query_sig, "query", &method.name)?;
                    method.query.push(QueryParam {
                        name: name.to_string(),
                        required: !query_sig.optional,
                        ty: translator.translate(query_module, ann, None, false)?,
                    });
                }
            }
            "response" => {
                let (responses_module, response_sigs) =
                    expect_literal(resolver, fields_module, type_ann, "response", &method.name)?;
                for response_sig in response_sigs {
                    let (key, ann) = named_member(response_sig, "response", &method.name)?;
                    let status: u16 = key.parse().map_err(|_| DocsError::InvalidStatus {
                        method: method.name.clone(),
                        key: key.to_string(),
                    })?;
                    let body = match ann {
                        TypeExpr::Keyword(TypeKeyword::Undefined) => None,
                        other => {
                            Some(translator.translate(responses_module, other, None, false)?)
                        }
                    };
                    method.responses.push(Response { status, body });
                }
            }
            other => {
                return Err(DocsError::UnknownMethodField {
                    method: method.name.clone(),
                    field: other.to_string(),
                })
            }
        }
    }
    Ok(method)
}

/// The property signatures of a marked declaration, following type-alias
/// indirection until an interface or type literal is reached.
fn declaration_members<'f>(
    resolver: &Resolver<'f>,
    module: &'f str,
    decl: &'f Declaration,
) -> Result<Option<(&'f str, &'f [PropertySignature])>> {
    match &decl.kind {
        DeclarationKind::Interface(interface) => {
            if !interface.type_params.is_empty() {
                return Err(DocsError::unsupported(format!(
                    "generic interface '{}'",
                    decl.name
                )));
            }
            Ok(Some((module, &interface.members)))
        }
        DeclarationKind::TypeAlias(alias) => {
            if !alias.type_params.is_empty() {
                return Err(DocsError::unsupported(format!(
                    "generic type alias '{}'",
                    decl.name
                )));
            }
            literal_members(resolver, module, &alias.aliased)
        }
        _ => Ok(None),
    }
}

/// Resolves `expr` down to a property-signature list, hopping through
/// references and aliases. Returns the module the literal actually lives in,
/// which becomes the context for translating its annotations.
fn literal_members<'f>(
    resolver: &Resolver<'f>,
    module: &'f str,
    expr: &'f TypeExpr,
) -> Result<Option<(&'f str, &'f [PropertySignature])>> {
    let mut module = module;
    let mut expr = expr;
    let mut visited: Vec<(&str, &str)> = Vec::new();
    loop {
        match expr {
            TypeExpr::TypeLiteral(members) => return Ok(Some((module, members))),
            TypeExpr::Reference(reference) if reference.type_args.is_empty() => {
                match resolver.resolve_entity(module, &reference.name)? {
                    Some(Resolution::Decl { module: target, decl }) => match &decl.kind {
                        DeclarationKind::Interface(interface) => {
                            if !interface.type_params.is_empty() {
                                return Err(DocsError::unsupported(format!(
                                    "generic interface '{}'",
                                    decl.name
                                )));
                            }
                            return Ok(Some((target, &interface.members)));
                        }
                        DeclarationKind::TypeAlias(alias) => {
                            if !alias.type_params.is_empty() {
                                return Err(DocsError::unsupported(format!(
                                    "generic type alias '{}'",
                                    decl.name
                                )));
                            }
                            let key = (target, decl.name.as_str());
                            if visited.contains(&key) {
                                return Err(DocsError::RecursiveReference {
                                    module: target.to_string(),
                                    name: decl.name.clone(),
                                });
                            }
                            visited.push(key);
                            module = target;
                            expr = &alias.aliased;
                        }
                        _ => return Ok(None),
                    },
                    _ => return Ok(None),
                }
            }
            _ => return Ok(None),
        }
    }
}

fn expect_literal<'f>(
    resolver: &Resolver<'f>,
    module: &'f str,
    expr: &'f TypeExpr,
    field: &str,
    method: &str,
) -> Result<(&'f str, &'f [PropertySignature])> {
    literal_members(resolver, module, expr)?.ok_or_else(|| {
        DocsError::unsupported(format!(
            "field '{field}' in method '{method}' must be a type literal"
        ))
    })
}

fn named_member<'f>(
    sig: &'f PropertySignature,
    field: &str,
    method: &str,
) -> Result<(&'f str, &'f TypeExpr)> {
    let name = sig.name.as_ident().ok_or_else(|| {
        DocsError::unsupported(format!(
            "computed member name `{}` in field '{field}' of method '{method}'",
            sig.name
        ))
    })?;
    let ann = sig.type_ann.as_ref().ok_or_else(|| {
        DocsError::unsupported(format!(
            "member '{name}' in field '{field}' of method '{method}' has no type annotation"
        ))
    })?;
    Ok((name, ann))
}
