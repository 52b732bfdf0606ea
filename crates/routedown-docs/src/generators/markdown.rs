//! Render routers as GitHub-flavoured Markdown.
//!
//! Every typed section becomes one fenced code region containing the inline
//! type rendering, built with the block layout algebra so multi-line types
//! and column alignment compose instead of being string-spliced.

use crate::layout::Block;
use crate::model::{
    LiteralSet, Param, QueryParam, Response, Route, RouteMethod, Router, Type, TypeKind,
};

/// Render all routers as one concatenated document.
pub fn render_markdown(routers: &[Router]) -> String {
    let blocks: Vec<Block> = routers.iter().map(router_block).collect();
    postprocess(&Block::vjoin(&Block::blank(), &blocks).render())
}

/// Render a single router as its own document.
pub fn render_router(router: &Router) -> String {
    postprocess(&router_block(router).render())
}

/// One `(file name, document)` pair per router; the file name is the
/// router's declaration name. Writing the files is the caller's job.
pub fn render_documents(routers: &[Router]) -> Vec<(String, String)> {
    routers
        .iter()
        .map(|router| (router.name.clone(), render_router(router)))
        .collect()
}

fn router_block(router: &Router) -> Block {
    let mut sections = vec![Block::line(format!("# {}", router.name))];
    if let Some(documentation) = &router.documentation {
        sections.push(Block::text(documentation));
    }
    for route in &router.routes {
        sections.push(route_block(&router.base, route));
    }
    Block::vjoin(&Block::blank(), &sections)
}

fn route_block(base: &str, route: &Route) -> Block {
    let mut sections = vec![Block::line(format!("## {}", route.path))];
    for method in &route.methods {
        sections.push(method_block(base, &route.path, method));
    }
    Block::vjoin(&Block::blank(), &sections)
}

fn method_block(base: &str, path: &str, method: &RouteMethod) -> Block {
    let mut sections = vec![
        Block::line(format!("### {}", method.name)),
        Block::line(format!("`{} {}{}`", method.verb, base, path)),
    ];
    if let Some(documentation) = &method.documentation {
        sections.push(Block::text(documentation));
    }
    if let Some(authorization) = &method.authorization {
        sections.push(typed_section("Authorization", type_block(authorization)));
    }
    if let Some(body) = &method.body {
        sections.push(typed_section("Body", type_block(body)));
    }
    if !method.params.is_empty() {
        sections.push(typed_section("Parameters", params_block(&method.params)));
    }
    if !method.query.is_empty() {
        sections.push(typed_section("Query", query_block(&method.query)));
    }
    if !method.responses.is_empty() {
        sections.push(typed_section("Responses", responses_block(&method.responses)));
    }
    Block::vjoin(&Block::blank(), &sections)
}

fn typed_section(title: &str, content: Block) -> Block {
    Block::vjoin(
        &Block::blank(),
        &[Block::line(format!("**{title}**")), fenced(content)],
    )
}

fn fenced(content: Block) -> Block {
    Block::vcat(&[Block::line("```ts"), content, Block::line("```")])
}

fn params_block(params: &[Param]) -> Block {
    aligned_rows(
        params
            .iter()
            .map(|param| (format!("{}:", param.name), type_block(&param.ty)))
            .collect(),
    )
}

fn query_block(query: &[QueryParam]) -> Block {
    aligned_rows(
        query
            .iter()
            .map(|param| {
                let marker = if param.required { "" } else { "?" };
                (format!("{}{marker}:", param.name), type_block(&param.ty))
            })
            .collect(),
    )
}

fn responses_block(responses: &[Response]) -> Block {
    aligned_rows(
        responses
            .iter()
            .map(|response| {
                let body = match &response.body {
                    Some(ty) => type_block(ty),
                    None => Block::line("(empty)"),
                };
                (format!("{}:", response.status), body)
            })
            .collect(),
    )
}

/// Rows of `label value` with every value column starting at the same
/// offset, padded to the longest label.
fn aligned_rows(entries: Vec<(String, Block)>) -> Block {
    let width = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let rows: Vec<Block> = entries
        .into_iter()
        .map(|(label, value)| Block::hcat(&[Block::line(format!("{label:<width$} ")), value]))
        .collect();
    Block::vcat(&rows)
}

/// Inline rendering of a semantic type, with its documentation attached as a
/// trailing comment.
fn type_block(ty: &Type) -> Block {
    let base = kind_block(ty);
    match &ty.documentation {
        Some(documentation) => with_doc_comment(base, documentation),
        None => base,
    }
}

fn kind_block(ty: &Type) -> Block {
    match &ty.kind {
        TypeKind::Number(LiteralSet::All) => Block::line("number"),
        TypeKind::Boolean(LiteralSet::All) => Block::line("boolean"),
        TypeKind::String(LiteralSet::All) => Block::line("string"),
        TypeKind::Number(LiteralSet::Literals(values)) => Block::line(
            values
                .iter()
                .map(|value| format_number(*value))
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        TypeKind::Boolean(LiteralSet::Literals(values)) => Block::line(
            values
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        TypeKind::String(LiteralSet::Literals(values)) => Block::line(
            values
                .iter()
                .map(|value| format!("\"{value}\""))
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        TypeKind::Null => Block::line("null"),
        TypeKind::Undefined => Block::line("undefined"),
        TypeKind::Array(element) => {
            let element_block = type_block(element);
            if is_simple(element) {
                element_block.suffix_last("[]")
            } else {
                // The closing delimiter goes on the element before padding
                // so it lands right after the element's last character.
                Block::hcat(&[Block::line("Array<"), element_block.suffix_last(">")])
            }
        }
        TypeKind::Tuple(elements) => {
            let mut blocks: Vec<Block> = elements.iter().map(type_block).collect();
            match blocks.last_mut() {
                Some(last) => {
                    let closed = last.suffix_last("]");
                    *last = closed;
                }
                None => blocks.push(Block::line("]")),
            }
            Block::hcat(&[
                Block::line("["),
                Block::hjoin(&Block::line(", "), &blocks),
            ])
        }
        TypeKind::Object(members) if members.is_empty() => match &ty.name {
            Some(name) => Block::line(name.clone()),
            None => Block::line("{}"),
        },
        TypeKind::Object(members) => {
            let entries = members
                .iter()
                .map(|(name, member)| (format!("{name}:"), type_block(member).suffix_last(";")))
                .collect();
            Block::vcat(&[
                Block::line("{"),
                aligned_rows(entries).indent(2),
                Block::line("}"),
            ])
        }
        TypeKind::Union(operands) => {
            let blocks: Vec<Block> = operands.iter().map(type_block).collect();
            Block::hjoin(&Block::line(" | "), &blocks)
        }
        TypeKind::Intersection(operands) => {
            let blocks: Vec<Block> = operands.iter().map(type_block).collect();
            Block::hjoin(&Block::line(" & "), &blocks)
        }
    }
}

/// Simple types keep the `T[]` suffix form; everything else is wrapped as
/// `Array<T>`.
fn is_simple(ty: &Type) -> bool {
    match &ty.kind {
        TypeKind::Number(LiteralSet::All)
        | TypeKind::Boolean(LiteralSet::All)
        | TypeKind::String(LiteralSet::All)
        | TypeKind::Null
        | TypeKind::Undefined
        | TypeKind::Tuple(_) => true,
        TypeKind::Array(element) => is_simple(element),
        _ => false,
    }
}

/// Attach `documentation` as a trailing comment, with the closing marker on
/// the base block's last line when the comment is shorter.
fn with_doc_comment(base: Block, documentation: &str) -> Block {
    let doc_lines: Vec<&str> = documentation.lines().collect();
    let comment = if doc_lines.len() <= 1 {
        Block::line(format!("/* {} */", documentation.trim()))
    } else {
        let mut lines = Vec::with_capacity(doc_lines.len());
        for (index, doc_line) in doc_lines.iter().enumerate() {
            if index == 0 {
                lines.push(format!("/* {doc_line}"));
            } else {
                lines.push(format!("   {doc_line}"));
            }
        }
        if let Some(last) = lines.last_mut() {
            last.push_str(" */");
        }
        Block::from_lines(lines)
    };
    let comment = if base.height() > comment.height() {
        let mut lines = vec![String::new(); base.height() - comment.height()];
        lines.extend(comment.lines().iter().cloned());
        Block::from_lines(lines)
    } else {
        comment
    };
    Block::hcat(&[base, Block::line(" "), comment])
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Final cleanup: trailing whitespace stripped per line, runs of three or
/// more blank lines collapsed to one, leading/trailing blank lines trimmed,
/// exactly one trailing newline.
fn postprocess(text: &str) -> String {
    let mut collapsed: Vec<String> = Vec::new();
    let mut pending_blanks = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blanks += 1;
            continue;
        }
        if pending_blanks > 0 && !collapsed.is_empty() {
            let keep = if pending_blanks >= 3 { 1 } else { pending_blanks };
            for _ in 0..keep {
                collapsed.push(String::new());
            }
        }
        pending_blanks = 0;
        collapsed.push(line.to_string());
    }
    let mut output = collapsed.join("\n");
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::model::{Type, TypeKind, Verb};

    fn number() -> Type {
        Type::new(TypeKind::Number(LiteralSet::All))
    }

    fn string() -> Type {
        Type::new(TypeKind::String(LiteralSet::All))
    }

    #[test]
    fn object_members_align_on_the_value_column() {
        let mut members = IndexMap::new();
        members.insert("id".to_string(), number());
        members.insert("item".to_string(), string());
        let rendered = type_block(&Type::new(TypeKind::Object(members))).render();
        assert_eq!(rendered, "{\n  id:   number;\n  item: string;\n}");
    }

    #[test]
    fn empty_objects_render_as_their_name_when_named() {
        let anonymous = Type::new(TypeKind::empty_object());
        assert_eq!(type_block(&anonymous).render(), "{}");
        let named = Type::opaque("Pagination");
        assert_eq!(type_block(&named).render(), "Pagination");
    }

    #[test]
    fn simple_arrays_use_the_suffix_form() {
        let numbers = Type::new(TypeKind::Array(Box::new(number())));
        assert_eq!(type_block(&numbers).render(), "number[]");

        let mut members = IndexMap::new();
        members.insert("id".to_string(), number());
        let objects = Type::new(TypeKind::Array(Box::new(Type::new(TypeKind::Object(
            members,
        )))));
        let rendered = type_block(&objects).render();
        let lines: Vec<&str> = rendered.lines().map(str::trim_end).collect();
        assert_eq!(lines, ["Array<{", "        id: number;", "      }>"]);
    }

    #[test]
    fn multi_line_tuples_close_after_the_last_element() {
        let mut members = IndexMap::new();
        members.insert("id".to_string(), number());
        let tuple = Type::new(TypeKind::Tuple(vec![
            number(),
            Type::new(TypeKind::Object(members)),
        ]));
        let rendered = type_block(&tuple).render();
        let lines: Vec<&str> = rendered.lines().map(str::trim_end).collect();
        assert_eq!(lines.len(), 3, "{rendered}");
        assert_eq!(lines[0], "[number, {");
        assert!(lines[2].ends_with("}]"), "{rendered}");
    }

    #[test]
    fn literal_sets_join_with_pipes() {
        let statuses = Type::new(TypeKind::String(LiteralSet::Literals(vec![
            "open".into(),
            "closed".into(),
        ])));
        assert_eq!(type_block(&statuses).render(), "\"open\" | \"closed\"");
        let codes = Type::new(TypeKind::Number(LiteralSet::Literals(vec![1.0, 2.5])));
        assert_eq!(type_block(&codes).render(), "1 | 2.5");
    }

    #[test]
    fn single_line_documentation_becomes_a_trailing_comment() {
        let ty = number().with_documentation("item count");
        assert_eq!(type_block(&ty).render(), "number /* item count */");
    }

    #[test]
    fn multi_line_documentation_closes_on_the_last_line() {
        let mut members = IndexMap::new();
        members.insert("id".to_string(), number());
        let ty = Type::new(TypeKind::Object(members)).with_documentation("first\nsecond");
        let rendered = type_block(&ty).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("/* first"));
        assert!(lines[2].trim_end().ends_with("second */"));
    }

    #[test]
    fn postprocess_collapses_long_blank_runs_and_trims() {
        let input = "\n\na\n\n\n\nb  \n\n";
        assert_eq!(postprocess(input), "a\n\nb\n");
    }

    #[test]
    fn method_sections_emit_one_fence_per_typed_section() {
        let mut method = RouteMethod::new(Verb::Get);
        method.name = "List items".to_string();
        method.body = Some(number());
        method.responses.push(Response {
            status: 200,
            body: Some(string()),
        });
        method.responses.push(Response {
            status: 204,
            body: None,
        });
        let rendered = method_block("/api", "/items", &method).render();
        assert_eq!(rendered.matches("```ts").count(), 2);
        assert!(rendered.contains("`GET /api/items`"));
        assert!(rendered.contains("204: (empty)"));
    }
}
