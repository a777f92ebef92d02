//! Wire format of a model schema document (`sozo model schema --json`).
//!
//! ```json
//! { "type": "struct",
//!   "content": { "name": "Position",
//!                "children": [ { "name": "x",
//!                                "member_type": { "type": "primitive",
//!                                                 "content": { "scalar_type": "u32" } } } ] } }
//! ```
//!
//! Every node is `{ type, content }`; the tag picks the content shape. Parsing
//! is two-phase: a loose `RawNode` tree first, then a checked descent into
//! [`SchemaNode`] that knows which JSON path it is at.
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SchemaError;
use crate::ir::{Member, SchemaNode};
use crate::path_de;

// ————————————————————————————————————————————————————————————————————————————
// RAW WIRE SHAPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct PrimitiveContent {
    scalar_type: String,
}

#[derive(Debug, Deserialize)]
struct StructContent {
    name: String,
    children: Vec<RawMember>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    name: String,
    member_type: RawNode,
}

// variant payloads (`children`, `option`) are ignored on purpose
#[derive(Debug, Deserialize)]
struct EnumContent {
    name: String,
}

// ————————————————————————————————————————————————————————————————————————————
// API
// ————————————————————————————————————————————————————————————————————————————

/// Parse one schema document into a [`SchemaNode`] tree.
pub fn parse_schema_document(src: &str) -> Result<SchemaNode, SchemaError> {
    let raw: RawNode = path_de::from_str_with_path(src)
        .map_err(|err| SchemaError::Malformed(err.under("$")))?;
    lower_node(raw, "$")
}

fn lower_node(raw: RawNode, at: &str) -> Result<SchemaNode, SchemaError> {
    match raw.tag.as_str() {
        "primitive" => {
            let content: PrimitiveContent = parse_content(raw.content, at)?;
            Ok(SchemaNode::Primitive { scalar_type: content.scalar_type })
        }
        "struct" => {
            let content: StructContent = parse_content(raw.content, at)?;
            let fields = content
                .children
                .into_iter()
                .enumerate()
                .map(|(i, member)| {
                    let child_at = format!("{at}.content.children[{i}].member_type");
                    Ok(Member { name: member.name, ty: lower_node(member.member_type, &child_at)? })
                })
                .collect::<Result<Vec<_>, SchemaError>>()?;
            Ok(SchemaNode::Struct { name: content.name, fields })
        }
        "enum" => {
            let content: EnumContent = parse_content(raw.content, at)?;
            Ok(SchemaNode::Enum { name: content.name })
        }
        "tuple" => {
            let content: Vec<RawNode> = parse_content(raw.content, at)?;
            let elements = content
                .into_iter()
                .enumerate()
                .map(|(i, elem)| lower_node(elem, &format!("{at}.content[{i}]")))
                .collect::<Result<Vec<_>, SchemaError>>()?;
            Ok(SchemaNode::Tuple { elements })
        }
        other => Err(SchemaError::UnsupportedVariant {
            tag: other.to_string(),
            path: at.to_string(),
        }),
    }
}

fn parse_content<T: DeserializeOwned>(content: Value, at: &str) -> Result<T, SchemaError> {
    path_de::from_value_with_path(content)
        .map_err(|err| SchemaError::Malformed(err.under(&format!("{at}.content"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Result<SchemaNode, SchemaError> {
        parse_schema_document(&v.to_string())
    }

    fn prim(scalar: &str) -> Value {
        json!({ "type": "primitive", "content": { "scalar_type": scalar } })
    }

    #[test]
    fn struct_with_primitive_children() {
        let doc = json!({
            "type": "struct",
            "content": {
                "name": "Position",
                "children": [
                    { "name": "player", "member_type": prim("ContractAddress") },
                    { "name": "x", "member_type": prim("u32") },
                ]
            }
        });
        let node = parse(doc).unwrap();
        assert_eq!(
            node,
            SchemaNode::structure("Position", [
                ("player", SchemaNode::primitive("ContractAddress")),
                ("x", SchemaNode::primitive("u32")),
            ])
        );
    }

    #[test]
    fn enum_payload_is_ignored() {
        let doc = json!({
            "type": "enum",
            "content": {
                "name": "Direction",
                "option": null,
                "children": [ { "name": "Left", "member_type": { "type": "tuple", "content": [] } } ]
            }
        });
        assert_eq!(parse(doc).unwrap(), SchemaNode::enumeration("Direction"));
    }

    #[test]
    fn tuple_keeps_element_order() {
        let doc = json!({ "type": "tuple", "content": [prim("u8"), prim("bool"), prim("u256")] });
        assert_eq!(
            parse(doc).unwrap(),
            SchemaNode::tuple([
                SchemaNode::primitive("u8"),
                SchemaNode::primitive("bool"),
                SchemaNode::primitive("u256"),
            ])
        );
    }

    #[test]
    fn unknown_tag_is_unsupported_variant_with_path() {
        let doc = json!({
            "type": "struct",
            "content": {
                "name": "Inventory",
                "children": [ { "name": "items", "member_type": { "type": "array", "content": [] } } ]
            }
        });
        match parse(doc) {
            Err(SchemaError::UnsupportedVariant { tag, path }) => {
                assert_eq!(tag, "array");
                assert_eq!(path, "$.content.children[0].member_type");
            }
            other => panic!("expected UnsupportedVariant, got {other:?}"),
        }
    }

    #[test]
    fn missing_content_field_is_malformed() {
        let doc = json!({ "type": "primitive", "content": { "scalar": "u8" } });
        match parse(doc) {
            Err(SchemaError::Malformed(err)) => {
                assert_eq!(err.path, "$.content");
                assert!(err.message.contains("scalar_type"), "{}", err.message);
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn nested_malformed_member_keeps_its_full_path() {
        let doc = json!({
            "type": "struct",
            "content": {
                "name": "Moves",
                "children": [
                    { "name": "ok", "member_type": prim("u8") },
                    { "name": "bad", "member_type": { "type": "struct", "content": { "name": 7, "children": [] } } },
                ]
            }
        });
        let err = parse(doc).unwrap_err();
        let SchemaError::Malformed(inner) = &err else { panic!("expected Malformed, got {err:?}") };
        assert_eq!(inner.path, "$.content.children[1].member_type.content.name");
        assert_eq!(
            err.to_string(),
            format!("malformed schema document at JSON path {} → {}", inner.path, inner.message)
        );
    }

    #[test]
    fn non_json_output_is_malformed() {
        assert!(matches!(
            parse_schema_document("error: model not found"),
            Err(SchemaError::Malformed(_))
        ));
    }
}
