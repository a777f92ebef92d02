//! Manifest walker: fetch → validate root → translate, one model at a time.
//!
//! All or nothing. The first failing model aborts the run and no fragments
//! are returned.
use rayon::prelude::*;

use crate::error::CompileError;
use crate::fetch::SchemaSource;
use crate::ir::{ComponentFragment, SchemaNode};
use crate::manifest::Manifest;
use crate::mapping::TypeMode;
use crate::translate::{CustomTypeRegistry, translate_fields};

/// Compile every model in manifest order, strictly sequentially.
pub fn compile(
    manifest: &Manifest,
    mode: TypeMode,
    source: &dyn SchemaSource,
) -> Result<Vec<ComponentFragment>, CompileError> {
    manifest
        .names()
        .map(|model| compile_model(model, mode, source))
        .collect()
}

/// Same result as [`compile`], fetching on a bounded rayon pool.
/// Output stays in manifest order; any failure discards every fragment.
pub fn compile_parallel(
    manifest: &Manifest,
    mode: TypeMode,
    source: &dyn SchemaSource,
    jobs: usize,
) -> Result<Vec<ComponentFragment>, CompileError> {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(jobs.max(1)).build() {
        Ok(pool) => pool,
        Err(error) => {
            tracing::warn!(%error, "failed to build fetch pool, compiling sequentially");
            return compile(manifest, mode, source);
        }
    };
    pool.install(|| {
        manifest
            .models
            .par_iter()
            .map(|model| compile_model(&model.name, mode, source))
            .collect()
    })
}

/// Fetch one model's schema and turn it into a fragment.
pub fn compile_model(
    model: &str,
    mode: TypeMode,
    source: &dyn SchemaSource,
) -> Result<ComponentFragment, CompileError> {
    let schema = source.fetch_schema(model).map_err(|source| CompileError::SchemaFetch {
        model: model.to_string(),
        source,
    })?;
    fragment_from_schema(model, &schema, mode)
}

/// The root must be a struct. Its fields become the component's record type;
/// its own name is carried as the model name and never registered.
pub fn fragment_from_schema(
    model: &str,
    schema: &SchemaNode,
    mode: TypeMode,
) -> Result<ComponentFragment, CompileError> {
    let SchemaNode::Struct { fields, .. } = schema else {
        return Err(CompileError::InvalidRootSchema {
            model: model.to_string(),
            found: schema.kind(),
        });
    };
    let mut registry = CustomTypeRegistry::new();
    let type_expr = translate_fields(fields, mode, &mut registry);
    tracing::debug!(model, custom_types = registry.names().len(), "translated model");
    Ok(ComponentFragment {
        model_name: model.to_string(),
        type_expr,
        custom_types: registry.into_names(),
    })
}
