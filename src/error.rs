//! Error kinds for the whole pipeline. All of them are fatal to a run.
use thiserror::Error;

use crate::path_de::PathError;

/// A schema document that does not describe a valid `SchemaNode` tree.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed schema document {0}")]
    Malformed(PathError),
    #[error("unsupported schema variant `{tag}` at {path}")]
    UnsupportedVariant { tag: String, path: String },
}

/// The external schema query failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read output of `{program}`: {source}")]
    Read {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("`{program}` timed out after {secs}s")]
    Timeout { program: String, secs: u64 },
    #[error("`{program}` produced non UTF-8 output")]
    Encoding { program: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("no schema available")]
    Missing,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse manifest: {0}")]
    Parse(String),
    #[error("manifest entry #{index} has an empty model name")]
    EmptyName { index: usize },
    #[error("model `{name}` is declared more than once")]
    Duplicate { name: String },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("error when fetching schema for model '{model}'")]
    SchemaFetch {
        model: String,
        #[source]
        source: FetchError,
    },
    #[error("model '{model}' has unsupported root schema type `{found}` (expected `struct`)")]
    InvalidRootSchema { model: String, found: &'static str },
}

impl CompileError {
    /// Name of the model that aborted the run.
    pub fn model(&self) -> &str {
        match self {
            Self::SchemaFetch { model, .. } | Self::InvalidRootSchema { model, .. } => model,
        }
    }
}
