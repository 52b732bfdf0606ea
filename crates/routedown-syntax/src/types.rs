//! Type-expression syntax nodes.
//!
//! This is deliberately a closed subset: the shapes the documentation core
//! knows how to translate, plus just enough extra structure (type arguments,
//! computed property names, bare function types) for the core to reject the
//! unsupported cases with a useful message instead of silently skipping them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A type expression as it appears in source, before any resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// A primitive keyword: `boolean`, `number`, `string`, `object`, `null`,
    /// `undefined`.
    Keyword(TypeKeyword),
    /// A literal type: `42`, `"created"`, `true`.
    Literal(Literal),
    /// An array type `T[]` / `Array<T>`.
    Array(Box<TypeExpr>),
    /// A tuple type `[A, B, C]`.
    Tuple(Vec<TypeExpr>),
    /// A reference to a named type, possibly qualified and possibly carrying
    /// type arguments (which the core rejects).
    Reference(TypeReference),
    /// An inline type literal `{ a: T; b?: U }`.
    TypeLiteral(Vec<PropertySignature>),
    /// A union `A | B`.
    Union(Vec<TypeExpr>),
    /// An intersection `A & B`.
    Intersection(Vec<TypeExpr>),
    /// The `keyof T` operator.
    KeyOf(Box<TypeExpr>),
    /// A bare function type. Only meaningful to the core under `keyof`.
    Function,
}

/// Primitive type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKeyword {
    Boolean,
    Number,
    String,
    Object,
    Null,
    Undefined,
}

impl TypeKeyword {
    /// The source keyword for this primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKeyword::Boolean => "boolean",
            TypeKeyword::Number => "number",
            TypeKeyword::String => "string",
            TypeKeyword::Object => "object",
            TypeKeyword::Null => "null",
            TypeKeyword::Undefined => "undefined",
        }
    }
}

/// A literal type value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
}

/// A reference to a named type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeReference {
    /// The referenced name, plain or dotted.
    pub name: EntityName,
    /// Type arguments, if any. Generic instantiation is not supported by the
    /// core; the field exists so the reference can be rejected with context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<TypeExpr>,
}

impl TypeReference {
    /// A plain, argument-free reference to `name`.
    pub fn ident(name: impl Into<String>) -> Self {
        Self {
            name: EntityName::Ident(name.into()),
            type_args: Vec::new(),
        }
    }

    /// A dotted reference such as `Api.Routes`.
    pub fn qualified<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: EntityName::Qualified(segments.into_iter().map(Into::into).collect()),
            type_args: Vec::new(),
        }
    }
}

/// A plain or dotted entity name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityName {
    Ident(String),
    /// Dotted name segments, in source order. Always two or more entries.
    Qualified(Vec<String>),
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityName::Ident(name) => f.write_str(name),
            EntityName::Qualified(segments) => f.write_str(&segments.join(".")),
        }
    }
}

/// A property signature inside a type literal or an interface body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySignature {
    pub name: PropertyName,
    /// Whether the property was declared with `?`.
    #[serde(default)]
    pub optional: bool,
    /// Documentation comment attached to the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// The type annotation. Absent for bare `name;` signatures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ann: Option<TypeExpr>,
}

impl PropertySignature {
    /// A required property with a type annotation and no documentation.
    pub fn required(name: impl Into<String>, type_ann: TypeExpr) -> Self {
        Self {
            name: PropertyName::Ident(name.into()),
            optional: false,
            documentation: None,
            type_ann: Some(type_ann),
        }
    }

    /// An optional (`?`) property with a type annotation.
    pub fn optional(name: impl Into<String>, type_ann: TypeExpr) -> Self {
        Self {
            name: PropertyName::Ident(name.into()),
            optional: true,
            documentation: None,
            type_ann: Some(type_ann),
        }
    }

    /// Attach a documentation comment.
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A property name: a plain identifier (or string key), or a computed name,
/// which the core treats as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyName {
    Ident(String),
    /// Raw source text of the bracketed expression.
    Computed(String),
}

impl PropertyName {
    /// The identifier text, when the name is not computed.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            PropertyName::Ident(name) => Some(name),
            PropertyName::Computed(_) => None,
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyName::Ident(name) => f.write_str(name),
            PropertyName::Computed(raw) => write!(f, "[{raw}]"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(value) => {
                if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            Literal::String(value) => write!(f, "\"{value}\""),
            Literal::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.type_args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Source-like rendering, used when reporting which expression a failure
/// occurred in. Always single-line.
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Keyword(keyword) => f.write_str(keyword.as_str()),
            TypeExpr::Literal(literal) => write!(f, "{literal}"),
            TypeExpr::Array(element) => {
                if element.needs_parens() {
                    write!(f, "({element})[]")
                } else {
                    write!(f, "{element}[]")
                }
            }
            TypeExpr::Tuple(elements) => {
                f.write_str("[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            TypeExpr::Reference(reference) => write!(f, "{reference}"),
            TypeExpr::TypeLiteral(members) => {
                f.write_str("{ ")?;
                for member in members {
                    write!(f, "{}", member.name)?;
                    if member.optional {
                        f.write_str("?")?;
                    }
                    match &member.type_ann {
                        Some(type_ann) => write!(f, ": {type_ann}; ")?,
                        None => f.write_str("; ")?,
                    }
                }
                f.write_str("}")
            }
            TypeExpr::Union(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
            TypeExpr::Intersection(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" & ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
            TypeExpr::KeyOf(inner) => write!(f, "keyof {inner}"),
            TypeExpr::Function => f.write_str("(...) => unknown"),
        }
    }
}

impl TypeExpr {
    fn needs_parens(&self) -> bool {
        matches!(
            self,
            TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::KeyOf(_) | TypeExpr::Function
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_nested_expressions_like_source() {
        let expr = TypeExpr::Array(Box::new(TypeExpr::Union(vec![
            TypeExpr::Keyword(TypeKeyword::Number),
            TypeExpr::Literal(Literal::String("a".into())),
        ])));
        assert_eq!(expr.to_string(), "(number | \"a\")[]");
    }

    #[test]
    fn displays_type_literals_single_line() {
        let expr = TypeExpr::TypeLiteral(vec![
            PropertySignature::required("id", TypeExpr::Keyword(TypeKeyword::Number)),
            PropertySignature::optional("tag", TypeExpr::Keyword(TypeKeyword::String)),
        ]);
        assert_eq!(expr.to_string(), "{ id: number; tag?: string; }");
    }

    #[test]
    fn displays_qualified_references() {
        let expr = TypeExpr::Reference(TypeReference::qualified(["Api", "Routes"]));
        assert_eq!(expr.to_string(), "Api.Routes");
    }

    #[test]
    fn displays_integral_number_literals_without_fraction() {
        assert_eq!(Literal::Number(404.0).to_string(), "404");
        assert_eq!(Literal::Number(1.5).to_string(), "1.5");
    }
}
