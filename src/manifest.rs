//! Manifest document: the ordered list of models to generate components for.
use indexmap::IndexSet;
use serde::Deserialize;

use crate::error::ManifestError;
use crate::path_de;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub models: Vec<ModelDescriptor>,
}

/// Only `name` is read; the rest of a manifest entry (class hash, members,
/// abi, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
}

impl Manifest {
    /// Parse and validate: names must be non-empty and unique.
    pub fn parse(src: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = path_de::from_str_with_path(src)
            .map_err(|err| ManifestError::Parse(err.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: names.into_iter().map(|name| ModelDescriptor { name: name.into() }).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = IndexSet::with_capacity(self.models.len());
        for (index, model) in self.models.iter().enumerate() {
            if model.name.trim().is_empty() {
                return Err(ManifestError::EmptyName { index });
            }
            if !seen.insert(model.name.as_str()) {
                return Err(ManifestError::Duplicate { name: model.name.clone() });
            }
        }
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_in_order_and_ignores_extra_fields() {
        let src = r#"{
            "world": { "name": "world", "address": "0x1" },
            "models": [
                { "name": "Moves", "class_hash": "0x64" },
                { "name": "Position", "members": [] }
            ]
        }"#;
        let manifest = Manifest::parse(src).unwrap();
        assert_eq!(manifest.names().collect::<Vec<_>>(), ["Moves", "Position"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let src = r#"{ "models": [ { "name": "A" }, { "name": "B" }, { "name": "A" } ] }"#;
        match Manifest::parse(src) {
            Err(ManifestError::Duplicate { name }) => assert_eq!(name, "A"),
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let src = r#"{ "models": [ { "name": "A" }, { "name": " " } ] }"#;
        assert!(matches!(Manifest::parse(src), Err(ManifestError::EmptyName { index: 1 })));
    }

    #[test]
    fn missing_models_key_reports_path() {
        match Manifest::parse(r#"{ "models": [ { "title": "A" } ] }"#) {
            Err(ManifestError::Parse(msg)) => assert!(msg.contains("models[0]"), "{msg}"),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
