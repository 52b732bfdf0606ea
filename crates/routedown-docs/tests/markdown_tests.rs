#![cfg(feature = "markdown")]

use routedown_docs::{render_markdown, RouteExtractor};
use routedown_syntax::{
    Declaration, DeclarationKind, ImportTable, InterfaceDeclaration, Literal, Module,
    PropertySignature, SyntaxForest, TypeExpr, TypeKeyword, TypeReference,
};

fn item_forest() -> SyntaxForest {
    let mut models = Module::new("src/models.ts");
    models.push(Declaration::new(
        "Item",
        DeclarationKind::Interface(InterfaceDeclaration {
            members: vec![
                PropertySignature::required("id", TypeExpr::Keyword(TypeKeyword::Number)),
                PropertySignature::required("label", TypeExpr::Keyword(TypeKeyword::String))
                    .with_documentation("Human-readable label."),
            ],
            ..InterfaceDeclaration::default()
        }),
    ));

    let get_method = TypeExpr::TypeLiteral(vec![
        PropertySignature::required(
            "name",
            TypeExpr::Literal(Literal::String("List items".into())),
        ),
        PropertySignature::required(
            "param",
            TypeExpr::TypeLiteral(vec![PropertySignature::required(
                "shelf",
                TypeExpr::Keyword(TypeKeyword::Number),
            )]),
        ),
        PropertySignature::required(
            "query",
            TypeExpr::TypeLiteral(vec![PropertySignature::optional(
                "limit",
                TypeExpr::Keyword(TypeKeyword::Number),
            )]),
        ),
        PropertySignature::required(
            "response",
            TypeExpr::TypeLiteral(vec![
                PropertySignature::required(
                    "200",
                    TypeExpr::Array(Box::new(TypeExpr::Reference(TypeReference::ident("Item")))),
                ),
                PropertySignature::required("204", TypeExpr::Keyword(TypeKeyword::Undefined)),
            ]),
        ),
    ]);

    models.push(
        Declaration::new(
            "ItemRoutes",
            DeclarationKind::Interface(InterfaceDeclaration {
                members: vec![PropertySignature::required(
                    "/items",
                    TypeExpr::TypeLiteral(vec![PropertySignature::required("get", get_method)]),
                )],
                ..InterfaceDeclaration::default()
            }),
        )
        .with_documentation("Item catalogue.\n#ExportRoute(\"/api\")"),
    );

    let mut forest = SyntaxForest::new();
    forest.add_module(models);
    forest
}

fn rendered() -> String {
    let routers = RouteExtractor::default()
        .extract(&item_forest(), &ImportTable::new())
        .expect("extraction should succeed");
    render_markdown(&routers)
}

#[test]
fn renders_the_full_document_structure() {
    let output = rendered();

    assert!(output.contains("# ItemRoutes\n"), "{output}");
    assert!(output.contains("Item catalogue.\n"), "{output}");
    assert!(output.contains("## /items\n"), "{output}");
    assert!(output.contains("### List items\n"), "{output}");
    assert!(output.contains("`GET /api/items`\n"), "{output}");
    assert!(output.contains("**Parameters**"), "{output}");
    assert!(output.contains("**Query**"), "{output}");
    assert!(output.contains("**Responses**"), "{output}");
    // No authorization or body on this method, so those sections are absent.
    assert!(!output.contains("**Authorization**"), "{output}");
    assert!(!output.contains("**Body**"), "{output}");
}

#[test]
fn each_typed_section_gets_one_fence() {
    let output = rendered();
    let fences = output.matches("```ts").count();
    // Parameters, Query, Responses.
    assert_eq!(fences, 3, "{output}");
    assert_eq!(output.matches("```").count(), 6, "{output}");
}

#[test]
fn responses_render_statuses_and_empty_bodies() {
    let output = rendered();
    assert!(output.contains("200: Array<"), "{output}");
    assert!(output.contains("204: (empty)"), "{output}");
}

#[test]
fn optional_query_parameters_are_suffixed() {
    let output = rendered();
    assert!(output.contains("limit?: number"), "{output}");
}

#[test]
fn property_documentation_becomes_comments() {
    let output = rendered();
    assert!(output.contains("/* Human-readable label. */"), "{output}");
}

#[test]
fn output_is_normalized() {
    let output = rendered();
    assert!(!output.contains("\n\n\n"), "blank-line run:\n{output}");
    assert!(output.ends_with('\n'), "{output}");
    assert!(!output.ends_with("\n\n"), "{output}");
    assert!(!output.starts_with('\n'), "{output}");
    for line in output.lines() {
        assert_eq!(line, line.trim_end(), "trailing whitespace on {line:?}");
    }
}
