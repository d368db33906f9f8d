//! Whole-program input model

use super::method::{MethodBody, MethodId, SourceFile};
use crate::errors::{Result, VerifierError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Program handed to the verifier: files plus relation constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramModel {
    pub files: Vec<SourceFile>,

    /// Compile-time values of relation members, keyed `Owner.Member` or `Member`
    #[serde(default)]
    pub relations: BTreeMap<String, String>,
}

impl ProgramModel {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self {
            files,
            relations: BTreeMap::new(),
        }
    }

    pub fn with_relation(mut self, member: impl Into<String>, value: impl Into<String>) -> Self {
        self.relations.insert(member.into(), value.into());
        self
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|e| VerifierError::Serialization(e.to_string()))
    }

    /// Load by extension: `.yaml`/`.yml` as YAML, everything else as JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Every method with the path of its file
    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodBody)> {
        self.files
            .iter()
            .flat_map(|f| f.methods.iter().map(move |m| (f.path.as_str(), m)))
    }

    pub fn find_method(&self, id: &MethodId) -> Option<(&str, &MethodBody)> {
        self.methods().find(|(_, m)| &m.id == id)
    }
}
