//! Compile a world's on-chain model schemas into statically-typed RECS
//! component definitions.
//!
//! Pipeline:
//!
//! ```text
//! manifest ─> compile ─┬─> fetch (sozo model schema --json) ─> schema ─> SchemaNode
//!                      └─> translate (mapping) ─> ComponentFragment ─> emit ─> .ts
//! ```
pub mod cli;
pub mod compile;
pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod ir;
pub mod manifest;
pub mod mapping;
pub mod path_de;
pub mod schema;
pub mod translate;

pub use compile::{compile, compile_parallel};
pub use emit::emit;
pub use error::{CompileError, FetchError, ManifestError, SchemaError};
pub use fetch::{SchemaSource, SozoSchemaSource, StaticSchemaSource};
pub use ir::{ComponentFragment, RecsType, SchemaNode, TypeExpr};
pub use manifest::Manifest;
pub use mapping::{TypeMode, map_primitive};
