//! Translation from type-expression syntax into the semantic [`Type`] model.
//!
//! The translator is a plain tree recursion. Named references go through the
//! [`Resolver`]; a reference that cannot be resolved degrades to an opaque
//! named object instead of failing, while unsupported constructs abort with
//! the chain of enclosing expressions attached.

use indexmap::IndexMap;
use routedown_syntax::{
    Declaration, DeclarationKind, EnumInitializer, Literal, PropertySignature, TypeExpr,
    TypeKeyword, TypeReference,
};

use crate::error::{DocsError, Result};
use crate::model::{LiteralSet, Type, TypeKind};
use crate::resolver::{MemberNode, Resolution, Resolver};

/// Translates type expressions, tracking which declarations are currently
/// being expanded so reference cycles fail instead of recursing forever.
pub struct Translator<'a> {
    resolver: Resolver<'a>,
    visiting: Vec<(String, String)>,
}

impl<'a> Translator<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self {
            resolver,
            visiting: Vec::new(),
        }
    }

    /// Translates `expr` as seen from `module`.
    ///
    /// `name` is propagated onto the result when the expression itself does
    /// not produce one. `keyof` marks that the expression is being expanded
    /// under a `keyof` operator, which relaxes bare function types to empty
    /// objects.
    pub fn translate(
        &mut self,
        module: &str,
        expr: &TypeExpr,
        name: Option<&str>,
        keyof: bool,
    ) -> Result<Type> {
        self.translate_expr(module, expr, name, keyof)
            .map_err(|error| DocsError::in_expr(expr, error))
    }

    fn translate_expr(
        &mut self,
        module: &str,
        expr: &TypeExpr,
        name: Option<&str>,
        keyof: bool,
    ) -> Result<Type> {
        let ty = match expr {
            TypeExpr::Keyword(keyword) => Type::new(match keyword {
                TypeKeyword::Boolean => TypeKind::Boolean(LiteralSet::All),
                TypeKeyword::Number => TypeKind::Number(LiteralSet::All),
                TypeKeyword::String => TypeKind::String(LiteralSet::All),
                TypeKeyword::Object => TypeKind::empty_object(),
                TypeKeyword::Null => TypeKind::Null,
                TypeKeyword::Undefined => TypeKind::Undefined,
            }),
            TypeExpr::Literal(literal) => Type::new(match literal {
                Literal::Number(value) => TypeKind::Number(LiteralSet::of(*value)),
                Literal::String(value) => TypeKind::String(LiteralSet::of(value.clone())),
                Literal::Boolean(value) => TypeKind::Boolean(LiteralSet::of(*value)),
            }),
            TypeExpr::Array(element) => {
                let element = self.translate(module, element, None, keyof)?;
                Type::new(TypeKind::Array(Box::new(element)))
            }
            TypeExpr::Tuple(elements) => {
                let mut translated = Vec::with_capacity(elements.len());
                for element in elements {
                    translated.push(self.translate(module, element, None, keyof)?);
                }
                Type::new(TypeKind::Tuple(translated))
            }
            TypeExpr::TypeLiteral(members) => {
                Type::new(TypeKind::Object(self.translate_members(module, members, keyof)?))
            }
            TypeExpr::Union(operands) => {
                let mut translated = Vec::with_capacity(operands.len());
                for operand in operands {
                    translated.push(self.translate(module, operand, None, keyof)?);
                }
                Type::new(TypeKind::Union(translated))
            }
            TypeExpr::Intersection(operands) => {
                let mut translated = Vec::with_capacity(operands.len());
                for operand in operands {
                    translated.push(self.translate(module, operand, None, keyof)?);
                }
                Type::new(TypeKind::Intersection(translated))
            }
            TypeExpr::KeyOf(inner) => {
                let inner = self.translate(module, inner, None, true)?;
                key_set(&inner)?
            }
            TypeExpr::Function => {
                if keyof {
                    // Under keyof, methods mixed into a record must not sink
                    // the property-key computation.
                    Type::new(TypeKind::empty_object())
                } else {
                    return Err(DocsError::unsupported("bare function type"));
                }
            }
            TypeExpr::Reference(reference) => {
                self.translate_reference(module, reference, name, keyof)?
            }
        };
        Ok(apply_name(ty, name))
    }

    fn translate_reference(
        &mut self,
        module: &str,
        reference: &TypeReference,
        name: Option<&str>,
        keyof: bool,
    ) -> Result<Type> {
        if !reference.type_args.is_empty() {
            return Err(DocsError::unsupported(format!(
                "generic type instantiation `{reference}`"
            )));
        }
        let referenced = reference.name.to_string();
        let effective = name.unwrap_or(&referenced);
        match self.resolver.resolve_entity(module, &reference.name)? {
            Some(Resolution::Decl { module, decl }) => {
                self.translate_decl(module, decl, Some(effective), keyof)
            }
            Some(Resolution::Member { module, member }) => match member {
                MemberNode::Property(sig) => {
                    self.translate_property_target(module, sig, effective, keyof)
                }
                // A value member (object-literal entry) carries no type
                // information we can expand.
                MemberNode::ObjectEntry(_) => Ok(Type::opaque(effective)),
            },
            // A namespace is not a type; only its members are.
            Some(Resolution::Namespace { .. }) => Ok(Type::opaque(effective)),
            None => Ok(Type::opaque(effective)),
        }
    }

    fn translate_property_target(
        &mut self,
        module: &str,
        sig: &PropertySignature,
        name: &str,
        keyof: bool,
    ) -> Result<Type> {
        let type_ann = sig.type_ann.as_ref().ok_or_else(|| {
            DocsError::unsupported(format!("property '{}' has no type annotation", sig.name))
        })?;
        let mut ty = self.translate(module, type_ann, Some(name), keyof)?;
        if ty.documentation.is_none() {
            ty.documentation = sig.documentation.clone();
        }
        Ok(ty)
    }

    /// Translates a referenced declaration inside its own module context.
    fn translate_decl(
        &mut self,
        module: &str,
        decl: &Declaration,
        name: Option<&str>,
        keyof: bool,
    ) -> Result<Type> {
        let key = (module.to_string(), decl.name.clone());
        if self.visiting.contains(&key) {
            return Err(DocsError::RecursiveReference {
                module: module.to_string(),
                name: decl.name.clone(),
            });
        }
        self.visiting.push(key);
        let result = self.translate_decl_inner(module, decl, name, keyof);
        self.visiting.pop();
        result
    }

    fn translate_decl_inner(
        &mut self,
        module: &str,
        decl: &Declaration,
        name: Option<&str>,
        keyof: bool,
    ) -> Result<Type> {
        match &decl.kind {
            DeclarationKind::Interface(interface) => {
                if !interface.type_params.is_empty() {
                    return Err(DocsError::unsupported(format!(
                        "generic interface '{}'",
                        decl.name
                    )));
                }
                let mut members: IndexMap<String, Type> = IndexMap::new();
                for heritage in &interface.extends {
                    let base = self.translate(
                        module,
                        &TypeExpr::Reference(heritage.clone()),
                        None,
                        keyof,
                    )?;
                    if let TypeKind::Object(inherited) = base.kind {
                        for (member_name, member_type) in inherited {
                            members.insert(member_name, member_type);
                        }
                    }
                }
                // Own members override inherited ones of the same name.
                for (member_name, member_type) in
                    self.translate_members(module, &interface.members, keyof)?
                {
                    members.insert(member_name, member_type);
                }
                let mut ty = Type::new(TypeKind::Object(members));
                ty.name = Some(name.unwrap_or(&decl.name).to_string());
                ty.documentation = decl.documentation.clone();
                Ok(ty)
            }
            DeclarationKind::TypeAlias(alias) => {
                if !alias.type_params.is_empty() {
                    return Err(DocsError::unsupported(format!(
                        "generic type alias '{}'",
                        decl.name
                    )));
                }
                let alias_name = name.unwrap_or(&decl.name);
                let mut ty = self.translate(module, &alias.aliased, Some(alias_name), keyof)?;
                if ty.documentation.is_none() {
                    ty.documentation = decl.documentation.clone();
                }
                Ok(ty)
            }
            DeclarationKind::Enum(enumeration) => {
                let variants = enumeration
                    .members
                    .iter()
                    .enumerate()
                    .map(|(position, member)| {
                        Type::new(match &member.initializer {
                            Some(EnumInitializer::Number(value)) => {
                                TypeKind::Number(LiteralSet::of(*value))
                            }
                            Some(EnumInitializer::String(value)) => {
                                TypeKind::String(LiteralSet::of(value.clone()))
                            }
                            // Ordinal is the member's position, not a
                            // continuation of any prior explicit literal.
                            None => TypeKind::Number(LiteralSet::of(position as f64)),
                        })
                    })
                    .collect();
                let mut ty = Type::new(TypeKind::Union(variants));
                ty.name = Some(name.unwrap_or(&decl.name).to_string());
                ty.documentation = decl.documentation.clone();
                Ok(ty)
            }
            // Value declarations referenced in type position have no
            // expandable structure; keep the name, drop the rest.
            DeclarationKind::Variable(_)
            | DeclarationKind::Function
            | DeclarationKind::Class
            | DeclarationKind::NamespaceExport { .. } => {
                Ok(Type::opaque(name.unwrap_or(&decl.name)))
            }
        }
    }

    /// Translates property signatures into an ordered member map. Optional
    /// members widen to `T | undefined`.
    pub(crate) fn translate_members(
        &mut self,
        module: &str,
        members: &[PropertySignature],
        keyof: bool,
    ) -> Result<IndexMap<String, Type>> {
        let mut translated = IndexMap::new();
        for sig in members {
            let member_name = sig.name.as_ident().ok_or_else(|| {
                DocsError::unsupported(format!("computed property name `{}`", sig.name))
            })?;
            let type_ann = sig.type_ann.as_ref().ok_or_else(|| {
                DocsError::unsupported(format!(
                    "property '{member_name}' has no type annotation"
                ))
            })?;
            let mut ty = self.translate(module, type_ann, None, keyof)?;
            if sig.optional {
                ty = Type::new(TypeKind::Union(vec![ty, Type::new(TypeKind::Undefined)]));
            }
            if ty.documentation.is_none() {
                ty.documentation = sig.documentation.clone();
            }
            translated.insert(member_name.to_string(), ty);
        }
        Ok(translated)
    }
}

fn apply_name(mut ty: Type, name: Option<&str>) -> Type {
    if ty.name.is_none() {
        if let Some(name) = name {
            ty.name = Some(name.to_string());
        }
    }
    ty
}

/// The `keyof` computation: the result is always a string type whose literal
/// set holds the property keys (or `All` when the keys cover every string).
fn key_set(ty: &Type) -> Result<Type> {
    Ok(Type::new(TypeKind::String(keys_of(ty)?)))
}

fn keys_of(ty: &Type) -> Result<LiteralSet<String>> {
    match &ty.kind {
        TypeKind::Object(members) => Ok(LiteralSet::Literals(members.keys().cloned().collect())),
        TypeKind::String(LiteralSet::All) => Ok(LiteralSet::All),
        TypeKind::Union(operands) => {
            let mut keys: Vec<String> = Vec::new();
            for operand in operands {
                match keys_of(operand)? {
                    // One all-strings operand widens the whole union.
                    LiteralSet::All => return Ok(LiteralSet::All),
                    LiteralSet::Literals(operand_keys) => {
                        for key in operand_keys {
                            if !keys.contains(&key) {
                                keys.push(key);
                            }
                        }
                    }
                }
            }
            Ok(LiteralSet::Literals(keys))
        }
        TypeKind::Intersection(operands) => {
            let mut narrowed: Option<Vec<String>> = None;
            for operand in operands {
                match keys_of(operand)? {
                    // All-strings operands do not narrow an intersection.
                    LiteralSet::All => {}
                    LiteralSet::Literals(operand_keys) => {
                        narrowed = Some(match narrowed {
                            None => operand_keys,
                            Some(previous) => previous
                                .into_iter()
                                .filter(|key| operand_keys.contains(key))
                                .collect(),
                        });
                    }
                }
            }
            Ok(match narrowed {
                Some(keys) => LiteralSet::Literals(keys),
                None => LiteralSet::All,
            })
        }
        _ => Err(DocsError::unsupported(
            "keyof over a non-object, non-composite type",
        )),
    }
}

#[cfg(test)]
mod tests {
    use routedown_syntax::{
        Declaration, DeclarationKind, EnumDeclaration, EnumMember, ImportTable,
        InterfaceDeclaration, Module, PropertySignature, SyntaxForest, TypeAliasDeclaration,
        TypeExpr, TypeKeyword, TypeReference,
    };

    use super::*;

    fn forest_of(module: Module) -> SyntaxForest {
        let mut forest = SyntaxForest::new();
        forest.add_module(module);
        forest
    }

    fn translate_one(
        forest: &SyntaxForest,
        imports: &ImportTable,
        module: &str,
        expr: &TypeExpr,
    ) -> Result<Type> {
        let resolver = Resolver::new(forest, imports);
        Translator::new(resolver).translate(module, expr, None, false)
    }

    fn object_literal(members: Vec<(&str, TypeExpr)>) -> TypeExpr {
        TypeExpr::TypeLiteral(
            members
                .into_iter()
                .map(|(name, expr)| PropertySignature::required(name, expr))
                .collect(),
        )
    }

    #[test]
    fn optional_members_widen_to_union_with_undefined() {
        let forest = forest_of(Module::new("m.ts"));
        let imports = ImportTable::new();
        let expr = TypeExpr::TypeLiteral(vec![PropertySignature::optional(
            "tag",
            TypeExpr::Keyword(TypeKeyword::String),
        )]);
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        let TypeKind::Object(members) = ty.kind else {
            panic!("expected object");
        };
        match &members["tag"].kind {
            TypeKind::Union(operands) => {
                assert_eq!(operands.len(), 2);
                assert_eq!(operands[0].kind, TypeKind::String(LiteralSet::All));
                assert_eq!(operands[1].kind, TypeKind::Undefined);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn enum_ordinals_count_by_position() {
        // enum { A, B = "b", C } => 0 | "b" | 2
        let mut module = Module::new("m.ts");
        module.push(Declaration::new(
            "Status",
            DeclarationKind::Enum(EnumDeclaration {
                members: vec![
                    EnumMember::plain("A"),
                    EnumMember::string("B", "b"),
                    EnumMember::plain("C"),
                ],
            }),
        ));
        let forest = forest_of(module);
        let imports = ImportTable::new();
        let expr = TypeExpr::Reference(TypeReference::ident("Status"));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        assert_eq!(ty.name.as_deref(), Some("Status"));
        let TypeKind::Union(variants) = ty.kind else {
            panic!("expected union");
        };
        assert_eq!(variants[0].kind, TypeKind::Number(LiteralSet::of(0.0)));
        assert_eq!(
            variants[1].kind,
            TypeKind::String(LiteralSet::of("b".to_string()))
        );
        assert_eq!(variants[2].kind, TypeKind::Number(LiteralSet::of(2.0)));
    }

    #[test]
    fn interface_heritage_merges_with_child_members_winning() {
        let mut module = Module::new("m.ts");
        module.push(Declaration::new(
            "Base",
            DeclarationKind::Interface(InterfaceDeclaration {
                members: vec![
                    PropertySignature::required("id", TypeExpr::Keyword(TypeKeyword::Number)),
                    PropertySignature::required("tag", TypeExpr::Keyword(TypeKeyword::Number)),
                ],
                ..InterfaceDeclaration::default()
            }),
        ));
        module.push(Declaration::new(
            "Child",
            DeclarationKind::Interface(InterfaceDeclaration {
                extends: vec![TypeReference::ident("Base")],
                members: vec![PropertySignature::required(
                    "tag",
                    TypeExpr::Keyword(TypeKeyword::String),
                )],
                ..InterfaceDeclaration::default()
            }),
        ));
        let forest = forest_of(module);
        let imports = ImportTable::new();
        let expr = TypeExpr::Reference(TypeReference::ident("Child"));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        let TypeKind::Object(members) = ty.kind else {
            panic!("expected object");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members["id"].kind, TypeKind::Number(LiteralSet::All));
        assert_eq!(members["tag"].kind, TypeKind::String(LiteralSet::All));
    }

    #[test]
    fn keyof_intersection_intersects_key_sets() {
        let forest = forest_of(Module::new("m.ts"));
        let imports = ImportTable::new();
        let expr = TypeExpr::KeyOf(Box::new(TypeExpr::Intersection(vec![
            object_literal(vec![
                ("a", TypeExpr::Keyword(TypeKeyword::Number)),
                ("b", TypeExpr::Keyword(TypeKeyword::Number)),
                ("c", TypeExpr::Keyword(TypeKeyword::Number)),
            ]),
            object_literal(vec![
                ("b", TypeExpr::Keyword(TypeKeyword::Number)),
                ("c", TypeExpr::Keyword(TypeKeyword::Number)),
                ("d", TypeExpr::Keyword(TypeKeyword::Number)),
            ]),
        ])));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        assert_eq!(
            ty.kind,
            TypeKind::String(LiteralSet::Literals(vec!["b".into(), "c".into()]))
        );
    }

    #[test]
    fn keyof_union_unions_key_sets() {
        let forest = forest_of(Module::new("m.ts"));
        let imports = ImportTable::new();
        let expr = TypeExpr::KeyOf(Box::new(TypeExpr::Union(vec![
            object_literal(vec![
                ("a", TypeExpr::Keyword(TypeKeyword::Number)),
                ("b", TypeExpr::Keyword(TypeKeyword::Number)),
                ("c", TypeExpr::Keyword(TypeKeyword::Number)),
            ]),
            object_literal(vec![
                ("b", TypeExpr::Keyword(TypeKeyword::Number)),
                ("c", TypeExpr::Keyword(TypeKeyword::Number)),
                ("d", TypeExpr::Keyword(TypeKeyword::Number)),
            ]),
        ])));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        assert_eq!(
            ty.kind,
            TypeKind::String(LiteralSet::Literals(vec![
                "a".into(),
                "b".into(),
                "c".into(),
                "d".into()
            ]))
        );
    }

    #[test]
    fn keyof_union_with_all_strings_operand_collapses() {
        let forest = forest_of(Module::new("m.ts"));
        let imports = ImportTable::new();
        let expr = TypeExpr::KeyOf(Box::new(TypeExpr::Union(vec![
            object_literal(vec![("a", TypeExpr::Keyword(TypeKeyword::Number))]),
            TypeExpr::Keyword(TypeKeyword::String),
        ])));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        assert_eq!(ty.kind, TypeKind::String(LiteralSet::All));
    }

    #[test]
    fn function_type_degrades_under_keyof_and_fails_outside() {
        let forest = forest_of(Module::new("m.ts"));
        let imports = ImportTable::new();

        let mixed = TypeExpr::KeyOf(Box::new(TypeExpr::Intersection(vec![
            object_literal(vec![("a", TypeExpr::Keyword(TypeKeyword::Number))]),
            TypeExpr::Function,
        ])));
        let ty = translate_one(&forest, &imports, "m.ts", &mixed).unwrap();
        // The function operand contributes an empty key set; intersection
        // with {} narrows to nothing, which is still a successful result.
        assert_eq!(ty.kind, TypeKind::String(LiteralSet::Literals(vec![])));

        let bare = TypeExpr::Function;
        let error = translate_one(&forest, &imports, "m.ts", &bare).unwrap_err();
        assert!(error.to_string().contains("bare function type"));
    }

    #[test]
    fn unresolved_references_degrade_to_opaque_named_objects() {
        let forest = forest_of(Module::new("m.ts"));
        let imports = ImportTable::new();
        let expr = TypeExpr::Reference(TypeReference::ident("Ghost"));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        assert_eq!(ty.name.as_deref(), Some("Ghost"));
        assert_eq!(ty.kind, TypeKind::empty_object());
    }

    #[test]
    fn alias_propagates_name_and_fills_missing_documentation() {
        let mut module = Module::new("m.ts");
        module.push(
            Declaration::new(
                "UserId",
                DeclarationKind::TypeAlias(TypeAliasDeclaration {
                    type_params: Vec::new(),
                    aliased: TypeExpr::Keyword(TypeKeyword::Number),
                }),
            )
            .with_documentation("Opaque user identifier."),
        );
        let forest = forest_of(module);
        let imports = ImportTable::new();
        let expr = TypeExpr::Reference(TypeReference::ident("UserId"));
        let ty = translate_one(&forest, &imports, "m.ts", &expr).unwrap();
        assert_eq!(ty.name.as_deref(), Some("UserId"));
        assert_eq!(ty.documentation.as_deref(), Some("Opaque user identifier."));
        assert_eq!(ty.kind, TypeKind::Number(LiteralSet::All));
    }

    #[test]
    fn generic_aliases_are_rejected_with_expression_context() {
        let mut module = Module::new("m.ts");
        module.push(Declaration::new(
            "Box",
            DeclarationKind::TypeAlias(TypeAliasDeclaration {
                type_params: vec!["T".into()],
                aliased: TypeExpr::Keyword(TypeKeyword::Object),
            }),
        ));
        let forest = forest_of(module);
        let imports = ImportTable::new();
        let expr = TypeExpr::Reference(TypeReference::ident("Box"));
        let error = translate_one(&forest, &imports, "m.ts", &expr).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("generic type alias 'Box'"), "{message}");
        assert!(message.contains("in `Box`"), "{message}");
    }

    #[test]
    fn self_referential_aliases_fail_instead_of_recursing() {
        let mut module = Module::new("m.ts");
        module.push(Declaration::new(
            "Loop",
            DeclarationKind::TypeAlias(TypeAliasDeclaration {
                type_params: Vec::new(),
                aliased: TypeExpr::Reference(TypeReference::ident("Loop")),
            }),
        ));
        let forest = forest_of(module);
        let imports = ImportTable::new();
        let expr = TypeExpr::Reference(TypeReference::ident("Loop"));
        let error = translate_one(&forest, &imports, "m.ts", &expr).unwrap_err();
        assert!(error.to_string().contains("recursive type reference"));
    }
}
