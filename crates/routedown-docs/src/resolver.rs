//! Cross-module symbol resolution.
//!
//! The "current module" is an explicit argument on every method rather than
//! ambient state, so context restoration after descending into another
//! module is structural — there is nothing to restore, the caller's binding
//! is untouched on every exit path.

use routedown_syntax::{
    Declaration, DeclarationKind, EntityName, ImportTable, ImportTarget, Module, ObjectMember,
    PropertySignature, SyntaxForest, TypeExpr,
};
use tracing::trace;

use crate::error::{DocsError, Result};

/// Resolves module-local and imported names against the syntax forest.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    forest: &'a SyntaxForest,
    imports: &'a ImportTable,
}

/// What a name resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    /// A top-level declaration, with the module it lives in.
    Decl {
        module: &'a str,
        decl: &'a Declaration,
    },
    /// A whole module bound to a namespace name.
    Namespace { module: &'a str },
    /// A member reached through a dotted name.
    Member {
        module: &'a str,
        member: MemberNode<'a>,
    },
}

/// The member shapes a qualified-name step can land on.
#[derive(Debug, Clone, Copy)]
pub enum MemberNode<'a> {
    /// A property signature on an interface or type literal.
    Property(&'a PropertySignature),
    /// A member of an object-literal initializer.
    ObjectEntry(&'a ObjectMember),
}

impl<'a> Resolver<'a> {
    pub fn new(forest: &'a SyntaxForest, imports: &'a ImportTable) -> Self {
        Self { forest, imports }
    }

    /// The module at `path`, or a fatal error — a dangling module path means
    /// the supplied forest and import table disagree and no reliable model
    /// can be produced.
    pub fn module(&self, path: &str) -> Result<&'a Module> {
        self.forest.module(path).ok_or_else(|| DocsError::UnknownModule {
            path: path.to_string(),
        })
    }

    /// Searches `module`'s own top-level declarations for `name`.
    pub fn resolve_in_module(&self, module: &str, name: &str) -> Result<Option<Resolution<'a>>> {
        let found = self.module(module)?.declaration(name);
        let Some(decl) = found else {
            trace!(module, name, "no top-level declaration");
            return Ok(None);
        };
        match &decl.kind {
            DeclarationKind::NamespaceExport { target_module } => {
                // The re-export target must exist; resolve the name to the
                // whole target module.
                self.module(target_module)?;
                Ok(Some(Resolution::Namespace {
                    module: target_module,
                }))
            }
            _ => Ok(Some(Resolution::Decl {
                module: self.module_key(module)?,
                decl,
            })),
        }
    }

    /// Resolves `name` in `module`, following an import binding when one
    /// exists and falling back to the module's own declarations.
    pub fn resolve_identifier(&self, module: &str, name: &str) -> Result<Option<Resolution<'a>>> {
        match self.imports.lookup(module, name) {
            Some(ImportTarget::Named {
                module: target,
                imported,
            }) => {
                trace!(module, name, target = target.as_str(), "following named import");
                self.module(target)?;
                self.resolve_in_module(target, imported)
            }
            Some(ImportTarget::Namespace { module: target }) => {
                trace!(module, name, target = target.as_str(), "following namespace import");
                self.module(target)?;
                Ok(Some(Resolution::Namespace { module: target }))
            }
            None => self.resolve_in_module(module, name),
        }
    }

    /// Resolves a plain or dotted entity name.
    ///
    /// Dotted names resolve the head first, then walk each member segment.
    /// Any unresolvable step is a soft miss (`Ok(None)`).
    pub fn resolve_entity(
        &self,
        module: &str,
        entity: &EntityName,
    ) -> Result<Option<Resolution<'a>>> {
        match entity {
            EntityName::Ident(name) => self.resolve_identifier(module, name),
            EntityName::Qualified(segments) => {
                let Some((head, rest)) = segments.split_first() else {
                    return Ok(None);
                };
                let mut current = match self.resolve_identifier(module, head)? {
                    Some(resolution) => resolution,
                    None => return Ok(None),
                };
                for segment in rest {
                    current = match self.resolve_member(current, segment)? {
                        Some(resolution) => resolution,
                        None => return Ok(None),
                    };
                }
                Ok(Some(current))
            }
        }
    }

    /// Looks up `name` as a member of an already-resolved target.
    fn resolve_member(
        &self,
        base: Resolution<'a>,
        name: &str,
    ) -> Result<Option<Resolution<'a>>> {
        match base {
            Resolution::Namespace { module } => self.resolve_in_module(module, name),
            Resolution::Decl { module, decl } => match &decl.kind {
                DeclarationKind::Interface(interface) => {
                    Ok(find_property(&interface.members, name)
                        .map(|sig| Resolution::Member {
                            module,
                            member: MemberNode::Property(sig),
                        }))
                }
                DeclarationKind::TypeAlias(alias) => match &alias.aliased {
                    TypeExpr::TypeLiteral(members) => Ok(find_property(members, name).map(|sig| {
                        Resolution::Member {
                            module,
                            member: MemberNode::Property(sig),
                        }
                    })),
                    _ => Ok(None),
                },
                DeclarationKind::Variable(variable) => {
                    let Some(initializer) = &variable.initializer else {
                        return Ok(None);
                    };
                    Ok(initializer
                        .members
                        .iter()
                        .find(|member| member.name == name)
                        .map(|member| Resolution::Member {
                            module,
                            member: MemberNode::ObjectEntry(member),
                        }))
                }
                _ => Ok(None),
            },
            Resolution::Member { .. } => Ok(None),
        }
    }

    // Re-borrows the module path with the forest's lifetime so resolutions
    // never borrow from the caller's temporary.
    fn module_key(&self, path: &str) -> Result<&'a str> {
        Ok(self.module(path)?.path.as_str())
    }
}

fn find_property<'a>(members: &'a [PropertySignature], name: &str) -> Option<&'a PropertySignature> {
    members
        .iter()
        .find(|sig| sig.name.as_ident() == Some(name))
}
