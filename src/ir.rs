// Strongly-typed IR on both sides of the translator. No serde_json::Value here.

use std::fmt;

// ————————————————————————————————————————————————————————————————————————————
// SOURCE SIDE: MODEL SCHEMA
// ————————————————————————————————————————————————————————————————————————————

/// One node of a model's nested type description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Primitive { scalar_type: String },
    Struct { name: String, fields: Vec<Member> },
    /// Variant payloads are opaque; only the discriminant is tracked downstream.
    Enum { name: String },
    Tuple { elements: Vec<SchemaNode> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub ty: SchemaNode,
}

impl SchemaNode {
    pub fn primitive(scalar_type: impl Into<String>) -> Self {
        Self::Primitive { scalar_type: scalar_type.into() }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum { name: name.into() }
    }

    pub fn structure<N, I>(name: impl Into<String>, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, SchemaNode)>,
    {
        Self::Struct {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(name, ty)| Member { name: name.into(), ty })
                .collect(),
        }
    }

    pub fn tuple(elements: impl IntoIterator<Item = SchemaNode>) -> Self {
        Self::Tuple { elements: elements.into_iter().collect() }
    }

    /// Wire tag of the active variant (`struct`, `primitive`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive { .. } => "primitive",
            Self::Struct { .. } => "struct",
            Self::Enum { .. } => "enum",
            Self::Tuple { .. } => "tuple",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TARGET SIDE: RECS TYPE EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

/// Scalar members of `@dojoengine/recs`'s `Type` enum that we emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecsType {
    Boolean,
    Number,
    BigInt,
    NumberArray,
    String,
}

impl RecsType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "RecsType.Boolean",
            Self::Number => "RecsType.Number",
            Self::BigInt => "RecsType.BigInt",
            Self::NumberArray => "RecsType.NumberArray",
            Self::String => "RecsType.String",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Scalar(RecsType),
    Record(Vec<(String, TypeExpr)>),  // declaration order
    Tuple(Vec<TypeExpr>),             // exact arity
}

impl fmt::Display for RecsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{ty}"),
            Self::Record(fields) => {
                f.write_str("{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{name}: {ty}")?;
                }
                f.write_str(" }")
            }
            Self::Tuple(elems) => {
                f.write_str("[ ")?;
                for (i, ty) in elems.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{ty}")?;
                }
                f.write_str(" ]")
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT UNIT
// ————————————————————————————————————————————————————————————————————————————

/// Translated, emission-ready form of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFragment {
    pub model_name: String,
    pub type_expr: TypeExpr,
    /// Struct/enum names found below the root, pre-order, duplicates kept.
    pub custom_types: Vec<String>,
}
