//! Recursive descent from [`SchemaNode`] to [`TypeExpr`].
//!
//! The translator is a pure fold: the only output besides the returned
//! expression is the [`CustomTypeRegistry`] the caller threads through.
use crate::ir::{Member, RecsType, SchemaNode, TypeExpr};
use crate::mapping::{self, ScalarKind, TypeMode};

/// Struct and enum names met below a model's root, in pre-order.
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTypeRegistry {
    names: Vec<String>,
}

impl CustomTypeRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    pub fn names(&self) -> &[String] { &self.names }

    pub fn into_names(self) -> Vec<String> { self.names }
}

/// Translate a non-root node. Nested structs register their own name.
pub fn translate(node: &SchemaNode, mode: TypeMode, registry: &mut CustomTypeRegistry) -> TypeExpr {
    match node {
        SchemaNode::Primitive { scalar_type } => {
            if ScalarKind::parse(scalar_type).is_none() {
                tracing::debug!(scalar_type = %scalar_type, "unknown scalar kind, falling back to string");
            }
            TypeExpr::Scalar(mapping::map_primitive(scalar_type, mode))
        }
        SchemaNode::Struct { name, fields } => {
            registry.record(name);
            translate_fields(fields, mode, registry)
        }
        SchemaNode::Enum { name } => {
            registry.record(name);
            TypeExpr::Scalar(RecsType::Number)
        }
        SchemaNode::Tuple { elements } => TypeExpr::Tuple(
            elements.iter().map(|elem| translate(elem, mode, registry)).collect(),
        ),
    }
}

/// Translate a struct body without registering the struct itself. This is
/// what a model root goes through: its name is the model name.
pub fn translate_fields(fields: &[Member], mode: TypeMode, registry: &mut CustomTypeRegistry) -> TypeExpr {
    TypeExpr::Record(
        fields
            .iter()
            .map(|member| (member.name.clone(), translate(&member.ty, mode, registry)))
            .collect(),
    )
}
