//! Run configuration: which RECS major we target and how to reach the world.
use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::mapping::TypeMode;

/// Package that decides the mode.
pub const RECS_PACKAGE: &str = "@dojoengine/recs";

// `2.1.0`, `^2.0.0`, `~2.3` → recs 2.x
static RECS_V2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\^~]?2\.").expect("static regex"));

/// Wide mode iff the constraint pins major version 2.
pub fn mode_from_version_constraint(constraint: &str) -> TypeMode {
    if RECS_V2.is_match(constraint.trim()) {
        TypeMode::Wide
    } else {
        TypeMode::Narrow
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: serde_json::Map<String, serde_json::Value>,
}

/// The `@dojoengine/recs` constraint declared in a `package.json` body.
/// Missing entry or unreadable document → empty string.
pub fn recs_constraint_from_package_json(src: &str) -> String {
    let package = match serde_json::from_str::<PackageJson>(src) {
        Ok(package) => package,
        Err(error) => {
            tracing::warn!(%error, "package.json is not valid JSON, assuming recs 1.x");
            return String::new();
        }
    };
    package
        .dependencies
        .get(RECS_PACKAGE)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Where the mode decision came from, for the startup log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOrigin {
    Override,
    Constraint(String),
    PackageJson { constraint: String },
    Default,
}

/// Resolve the mode once: explicit mode, then explicit constraint, then the
/// package manifest on disk. A missing `package.json` means narrow.
pub fn resolve_mode(
    explicit: Option<TypeMode>,
    constraint: Option<&str>,
    package_json: &Path,
) -> (TypeMode, ModeOrigin) {
    if let Some(mode) = explicit {
        return (mode, ModeOrigin::Override);
    }
    if let Some(constraint) = constraint {
        return (mode_from_version_constraint(constraint), ModeOrigin::Constraint(constraint.to_string()));
    }
    match std::fs::read_to_string(package_json) {
        Ok(src) => {
            let constraint = recs_constraint_from_package_json(&src);
            (mode_from_version_constraint(&constraint), ModeOrigin::PackageJson { constraint })
        }
        Err(error) => {
            tracing::debug!(path = %package_json.display(), %error, "no package.json");
            (TypeMode::Narrow, ModeOrigin::Default)
        }
    }
}

/// Everything a `generate` run needs besides the manifest text.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub mode: TypeMode,
    pub rpc_url: String,
    pub world_address: String,
    pub sozo_program: String,
    pub timeout: Option<Duration>,
    /// Concurrent schema queries; 1 means sequential.
    pub jobs: usize,
}

impl GenerateConfig {
    pub fn schema_source(&self) -> crate::fetch::SozoSchemaSource {
        let mut source = crate::fetch::SozoSchemaSource::new(&self.rpc_url, &self.world_address);
        source.program = self.sozo_program.clone();
        source.timeout = self.timeout;
        source
    }
}
