//! Redirect map: interface → sole concrete implementation

use crate::features::redirection::infrastructure::GatheringIndex;
use crate::shared::models::{MethodId, TextSpan};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Interfaces whose calls are retargeted, with the chosen concrete type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectMap {
    redirects: BTreeMap<String, String>,

    /// Interface → declared methods; interfaces absent here redirect every call
    #[serde(skip)]
    declared: BTreeMap<String, BTreeSet<String>>,
}

/// Interface left unredirected: zero or several implementers, no explicit
/// declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectWarning {
    pub interface: String,
    pub implementers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
}

impl RedirectWarning {
    pub fn implementer_count(&self) -> usize {
        self.implementers.len()
    }
}

impl RedirectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide redirects from a completed gathering pass
    ///
    /// Explicit declaration wins; otherwise exactly one implementer is
    /// required. Every other interface yields one warning, sorted by name.
    /// Only methods the interface declares are redirected.
    pub fn from_index(index: &GatheringIndex) -> (RedirectMap, Vec<RedirectWarning>) {
        let mut map = RedirectMap::new();
        let mut warnings = Vec::new();

        for name in index.interface_names() {
            let Some(decl) = index.interface(&name) else {
                continue;
            };
            let implementers = index.implementers_of(&name);

            if let Some(concrete) = decl.explicit_redirect {
                debug!(interface = %name, concrete = %concrete, "Explicit redirect");
                map.insert_declared(name, concrete, decl.methods);
                continue;
            }

            if let [only] = implementers.as_slice() {
                debug!(interface = %name, concrete = %only, "Single-implementer redirect");
                map.insert_declared(name.clone(), only.clone(), decl.methods);
                continue;
            }

            warnings.push(RedirectWarning {
                interface: name,
                implementers,
                file: Some(decl.file),
                span: decl.span,
            });
        }

        (map, warnings)
    }

    /// Redirect every call on `interface`
    pub fn insert(&mut self, interface: impl Into<String>, concrete: impl Into<String>) {
        let interface = interface.into();
        self.declared.remove(&interface);
        self.redirects.insert(interface, concrete.into());
    }

    /// Redirect only the listed interface methods
    pub fn insert_declared<I, S>(
        &mut self,
        interface: impl Into<String>,
        concrete: impl Into<String>,
        methods: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let interface = interface.into();
        self.declared
            .insert(interface.clone(), methods.into_iter().map(Into::into).collect());
        self.redirects.insert(interface, concrete.into());
    }

    pub fn concrete_for(&self, interface: &str) -> Option<&str> {
        self.redirects.get(interface).map(String::as_str)
    }

    /// Retargeted method when its declaring type is redirected
    pub fn redirect_method(&self, method: &MethodId) -> Option<MethodId> {
        let concrete = self.concrete_for(&method.declaring_type)?;
        match self.declared.get(&method.declaring_type) {
            Some(methods) if !methods.contains(&method.name) => None,
            _ => Some(method.on_type(concrete)),
        }
    }

    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.redirects.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{
        CfgModel, MethodBody, Parameter, ProgramModel, SourceFile, TypeDecl,
    };

    fn user_of(types: &[&str]) -> MethodBody {
        MethodBody {
            id: MethodId::new("Controller", "Get"),
            parameters: types
                .iter()
                .enumerate()
                .map(|(i, t)| Parameter::new(format!("p{}", i), *t))
                .collect(),
            annotations: Vec::new(),
            type_references: Vec::new(),
            aliases: Vec::new(),
            entry_point: true,
            cfg: CfgModel {
                entry: "b0".to_string(),
                exit: "b0".to_string(),
                blocks: Vec::new(),
                edges: Vec::new(),
            },
        }
    }

    fn plan(types: Vec<TypeDecl>, used: &[&str]) -> (RedirectMap, Vec<RedirectWarning>) {
        let program = ProgramModel::new(vec![SourceFile {
            path: "App.cs".to_string(),
            text: String::new(),
            types,
            methods: vec![user_of(used)],
        }]);
        RedirectMap::from_index(&GatheringIndex::build(&program, false))
    }

    #[test]
    fn test_single_implementer_redirects() {
        let (map, warnings) = plan(
            vec![
                TypeDecl::interface("IStore", &["Get"]),
                TypeDecl::class("SqlStore", &["IStore"]),
            ],
            &["IStore"],
        );
        assert_eq!(map.concrete_for("IStore"), Some("SqlStore"));
        assert_eq!(
            map.redirect_method(&MethodId::new("IStore", "Get")),
            Some(MethodId::new("SqlStore", "Get"))
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_explicit_redirect_wins_over_ambiguity() {
        let (map, warnings) = plan(
            vec![
                TypeDecl::interface("IStore", &["Get"]).with_redirect("MemStore"),
                TypeDecl::class("SqlStore", &["IStore"]),
                TypeDecl::class("MemStore", &["IStore"]),
            ],
            &["IStore"],
        );
        assert_eq!(map.concrete_for("IStore"), Some("MemStore"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_ambiguous_interface_warns_even_unreferenced() {
        let (map, warnings) = plan(
            vec![
                TypeDecl::interface("IStore", &["Get"]),
                TypeDecl::interface("IClock", &["Now"]),
                TypeDecl::interface("IUnused", &[]),
                TypeDecl::class("SqlStore", &["IStore"]),
                TypeDecl::class("MemStore", &["IStore"]),
            ],
            &["IStore", "IClock"],
        );
        assert!(map.is_empty());
        let names: Vec<&str> = warnings.iter().map(|w| w.interface.as_str()).collect();
        assert_eq!(names, vec!["IClock", "IStore", "IUnused"]);
        assert_eq!(warnings[0].implementer_count(), 0);
        assert_eq!(warnings[1].implementers, vec!["MemStore", "SqlStore"]);
        assert_eq!(warnings[2].file.as_deref(), Some("App.cs"));
    }

    #[test]
    fn test_undeclared_method_not_redirected() {
        let (map, _) = plan(
            vec![
                TypeDecl::interface("IStore", &["Get"]),
                TypeDecl::class("SqlStore", &["IStore"]),
            ],
            &[],
        );
        assert_eq!(
            map.redirect_method(&MethodId::new("IStore", "Get")),
            Some(MethodId::new("SqlStore", "Get"))
        );
        assert!(map.redirect_method(&MethodId::new("IStore", "Dispose")).is_none());

        let mut open = RedirectMap::new();
        open.insert("IStore", "SqlStore");
        assert!(open.redirect_method(&MethodId::new("IStore", "Dispose")).is_some());
    }

    #[test]
    fn test_unredirected_method_is_none() {
        let map = RedirectMap::new();
        assert!(map.redirect_method(&MethodId::new("IStore", "Get")).is_none());
    }
}
