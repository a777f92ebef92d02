//! TypeScript emission. Templating only; fragments are trusted.
use std::fmt::Write;

use crate::ir::ComponentFragment;

pub const HEADER: &str = "/* Autogenerated file. Do not edit manually. */\n";
pub const IMPORTS: &str = "import { defineComponent, Type as RecsType, World } from \"@dojoengine/recs\";\n";

pub fn emit(fragments: &[ComponentFragment]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(IMPORTS);
    out.push('\n');
    out.push_str("export function defineContractComponents(world: World) {\n");
    out.push_str("  return {\n");
    for fragment in fragments {
        emit_fragment(&mut out, fragment);
    }
    out.push_str("  };\n");
    out.push_str("}\n");
    out
}

fn emit_fragment(out: &mut String, fragment: &ComponentFragment) {
    let name = &fragment.model_name;
    // writing into a String cannot fail
    let _ = writeln!(out, "    {name}: (() => {{");
    let _ = writeln!(out, "      return defineComponent(");
    let _ = writeln!(out, "        world,");
    let _ = writeln!(out, "        {},", fragment.type_expr);
    let _ = writeln!(out, "        {{");
    let _ = writeln!(out, "          metadata: {{");
    let _ = writeln!(out, "            name: {},", json_string(name));
    let _ = writeln!(out, "            types: {},", json_string_list(&fragment.custom_types));
    let _ = writeln!(out, "          }},");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "      );");
    let _ = writeln!(out, "    }})(),");
}

fn json_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn json_string_list(names: &[String]) -> String {
    serde_json::Value::from(names.to_vec()).to_string()
}
