//! Gathering index (per-file discovery pass)
//!
//! Lock-free concurrent index filled by one task per file:
//! - interface declarations and their explicit redirects
//! - interface → implementing classes
//! - type names referenced from signatures, type references, call targets
//! - parameter annotations of entry points
//!
//! Readers only run after `build` returns, i.e. after every file task has
//! joined. All accessors return sorted data.

use crate::shared::models::{
    MethodBody, MethodId, Operation, ParameterAnnotation, ProgramModel, SourceFile, TextSpan,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Interface declaration as discovered in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    pub file: String,
    pub span: Option<TextSpan>,
    pub explicit_redirect: Option<String>,
    /// Declared method names, sorted and deduplicated
    pub methods: Vec<String>,
}

impl InterfaceDecl {
    /// Fold a second declaration of the same interface (partial interfaces)
    ///
    /// The declaration from the smallest file path provides location and
    /// explicit redirect; a redirect declared only elsewhere is still kept.
    /// Methods are unioned.
    fn merge(&mut self, other: InterfaceDecl) {
        let InterfaceDecl {
            file,
            span,
            explicit_redirect,
            methods,
            ..
        } = other;
        if file < self.file {
            self.file = file;
            self.span = span;
            if explicit_redirect.is_some() {
                self.explicit_redirect = explicit_redirect;
            }
        } else if self.explicit_redirect.is_none() {
            self.explicit_redirect = explicit_redirect;
        }
        self.methods.extend(methods);
        self.methods.sort();
        self.methods.dedup();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GatheringStats {
    pub files: usize,
    pub interfaces: usize,
    pub implementers: usize,
    pub referenced_types: usize,
    pub annotated_methods: usize,
}

#[derive(Default)]
pub struct GatheringIndex {
    /// Interface name → declaration
    interfaces: DashMap<String, InterfaceDecl>,

    /// Interface name → implementing classes
    implementers: DashMap<String, Vec<String>>,

    /// Type name → number of references
    references: DashMap<String, usize>,

    /// Method → declared parameter annotations
    annotations: DashMap<MethodId, Vec<ParameterAnnotation>>,

    files: AtomicUsize,
}

impl GatheringIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather every file, in parallel when `parallel` is set
    pub fn build(program: &ProgramModel, parallel: bool) -> Self {
        let index = Self::new();

        if parallel {
            program.files.par_iter().for_each(|file| index.gather_file(file));
        } else {
            program.files.iter().for_each(|file| index.gather_file(file));
        }

        let stats = index.stats();
        debug!(
            files = stats.files,
            interfaces = stats.interfaces,
            implementers = stats.implementers,
            referenced_types = stats.referenced_types,
            parallel,
            "Gathering complete"
        );
        index
    }

    fn gather_file(&self, file: &SourceFile) {
        for decl in &file.types {
            if decl.is_interface() {
                let mut methods = decl.methods.clone();
                methods.sort();
                methods.dedup();
                let found = InterfaceDecl {
                    name: decl.name.clone(),
                    file: file.path.clone(),
                    span: decl.span,
                    explicit_redirect: decl.explicit_redirect.clone(),
                    methods,
                };
                match self.interfaces.entry(decl.name.clone()) {
                    Entry::Occupied(mut existing) => existing.get_mut().merge(found),
                    Entry::Vacant(slot) => {
                        slot.insert(found);
                    }
                }
            } else {
                for interface in &decl.implements {
                    self.implementers
                        .entry(interface.clone())
                        .or_default()
                        .push(decl.name.clone());
                }
            }
        }

        for method in &file.methods {
            self.gather_method(method);
        }

        self.files.fetch_add(1, Ordering::Relaxed);
    }

    fn gather_method(&self, method: &MethodBody) {
        for parameter in &method.parameters {
            self.reference(&parameter.type_name);
        }
        for reference in &method.type_references {
            self.reference(&reference.type_name);
        }
        for block in &method.cfg.blocks {
            for op in &block.operations {
                if let Operation::Call(site) = op {
                    self.reference(&site.target.declaring_type);
                }
            }
        }

        if !method.annotations.is_empty() {
            self.annotations
                .insert(method.id.clone(), method.annotations.clone());
        }
    }

    fn reference(&self, type_name: &str) {
        *self.references.entry(type_name.to_string()).or_insert(0) += 1;
    }

    /// Interface names, sorted
    pub fn interface_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.interfaces.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn interface(&self, name: &str) -> Option<InterfaceDecl> {
        self.interfaces.get(name).map(|e| e.value().clone())
    }

    /// Implementing classes, sorted and deduplicated
    pub fn implementers_of(&self, interface: &str) -> Vec<String> {
        let mut classes = self
            .implementers
            .get(interface)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        classes.sort();
        classes.dedup();
        classes
    }

    pub fn is_referenced(&self, type_name: &str) -> bool {
        self.references.contains_key(type_name)
    }

    pub fn reference_count(&self, type_name: &str) -> usize {
        self.references.get(type_name).map(|e| *e.value()).unwrap_or(0)
    }

    pub fn annotations_for(&self, method: &MethodId) -> Vec<ParameterAnnotation> {
        self.annotations
            .get(method)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> GatheringStats {
        GatheringStats {
            files: self.files.load(Ordering::Relaxed),
            interfaces: self.interfaces.len(),
            implementers: self.implementers.iter().map(|e| e.value().len()).sum(),
            referenced_types: self.references.len(),
            annotated_methods: self.annotations.len(),
        }
    }
}
