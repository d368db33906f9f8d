/*
 * Union-Find Alias Oracle
 *
 * Flow-insensitive, Steensgaard-style: every (method, variable) pair is an
 * element; copies between variables and declared may-alias pairs merge
 * classes. Each class gets one location, named after its lexicographically
 * smallest member key (`Type.Method::name`), so identities are stable
 * across runs.
 *
 * `x = element of xs` binds x's class to the element summary of xs
 * (`Type.Method::xs[*]`). Cyclic element bindings fall back to the class's
 * own key.
 */

use super::union_find::UnionFind;
use crate::features::permissions::{AbstractLocation, LocationSet};
use crate::features::points_to::ports::{AliasOracle, ProgramPoint, Reference};
use crate::shared::models::{Expr, MethodBody, MethodId, Operation, ProgramModel};
use rustc_hash::{FxHashMap, FxHashSet};

fn variable_key(method: &MethodId, name: &str) -> String {
    format!("{}::{}", method, name)
}

#[derive(Debug, Clone, Default)]
pub struct UnionFindAliasOracle {
    ids: FxHashMap<String, u32>,
    classes: UnionFind,
    /// Class root → resolved location
    resolved: FxHashMap<u32, AbstractLocation>,
}

impl UnionFindAliasOracle {
    pub fn build(program: &ProgramModel) -> Self {
        let mut builder = OracleBuilder::default();
        for (_, method) in program.methods() {
            builder.add_method(method);
        }
        builder.finish()
    }

    /// Location of a named parameter or local
    pub fn location_of(&self, method: &MethodId, name: &str) -> AbstractLocation {
        let key = variable_key(method, name);
        match self.ids.get(&key) {
            Some(&id) => self
                .resolved
                .get(&self.classes.find_readonly(id))
                .cloned()
                .unwrap_or_else(|| AbstractLocation::new(key)),
            None => AbstractLocation::new(key),
        }
    }

    pub fn variable_count(&self) -> usize {
        self.classes.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.count()
    }
}

impl AliasOracle for UnionFindAliasOracle {
    fn locations(
        &self,
        method: &MethodId,
        reference: &Reference,
        point: ProgramPoint,
    ) -> LocationSet {
        match reference {
            Reference::Parameter(name) | Reference::Local(name) => {
                std::iter::once(self.location_of(method, name)).collect()
            }
            Reference::ElementOf(inner) => self
                .locations(method, inner, point)
                .iter()
                .map(AbstractLocation::element)
                .collect(),
        }
    }
}

#[derive(Default)]
struct OracleBuilder {
    ids: FxHashMap<String, u32>,
    keys: Vec<String>,
    classes: UnionFind,
    /// (bound variable, collection variable)
    element_bindings: Vec<(u32, u32)>,
}

impl OracleBuilder {
    fn intern(&mut self, method: &MethodId, name: &str) -> u32 {
        let key = variable_key(method, name);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.classes.push();
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        id
    }

    fn add_method(&mut self, method: &MethodBody) {
        let id = &method.id;
        for parameter in &method.parameters {
            self.intern(id, &parameter.name);
        }

        for (a, b) in &method.aliases {
            let a = self.intern(id, a);
            let b = self.intern(id, b);
            self.classes.union(a, b);
        }

        for block in &method.cfg.blocks {
            for op in &block.operations {
                let Operation::Assign { target, value, .. } = op else {
                    continue;
                };
                let target = self.intern(id, target);
                match value.unwrapped() {
                    Expr::Parameter { name } | Expr::Local { name } => {
                        let source = self.intern(id, name);
                        self.classes.union(target, source);
                    }
                    Expr::ElementOf { inner } => {
                        if let Expr::Parameter { name } | Expr::Local { name } = inner.unwrapped() {
                            let collection = self.intern(id, name);
                            self.element_bindings.push((target, collection));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn finish(mut self) -> UnionFindAliasOracle {
        self.classes.flatten();

        let mut class_key: FxHashMap<u32, &str> = FxHashMap::default();
        for (id, key) in self.keys.iter().enumerate() {
            let root = self.classes.find_readonly(id as u32);
            class_key
                .entry(root)
                .and_modify(|current| {
                    if key.as_str() < *current {
                        *current = key.as_str();
                    }
                })
                .or_insert(key.as_str());
        }

        // One collection per bound class; the smallest key wins on conflict.
        let mut element_source: FxHashMap<u32, u32> = FxHashMap::default();
        for &(target, collection) in &self.element_bindings {
            let target = self.classes.find_readonly(target);
            let collection = self.classes.find_readonly(collection);
            match element_source.get(&target) {
                Some(existing) if class_key[existing] <= class_key[&collection] => {}
                _ => {
                    element_source.insert(target, collection);
                }
            }
        }

        let mut resolved = FxHashMap::default();
        let mut visiting = FxHashSet::default();
        let mut roots: Vec<u32> = class_key.keys().copied().collect();
        roots.sort_by(|a, b| class_key[a].cmp(class_key[b]));
        for root in roots {
            resolve(root, &class_key, &element_source, &mut resolved, &mut visiting);
        }

        UnionFindAliasOracle {
            ids: self.ids,
            classes: self.classes,
            resolved,
        }
    }
}

fn resolve(
    root: u32,
    class_key: &FxHashMap<u32, &str>,
    element_source: &FxHashMap<u32, u32>,
    resolved: &mut FxHashMap<u32, AbstractLocation>,
    visiting: &mut FxHashSet<u32>,
) -> AbstractLocation {
    if let Some(location) = resolved.get(&root) {
        return location.clone();
    }
    let own = AbstractLocation::new(class_key.get(&root).copied().unwrap_or_default());
    if !visiting.insert(root) {
        return own;
    }

    let location = match element_source.get(&root) {
        Some(&collection) if collection != root => {
            resolve(collection, class_key, element_source, resolved, visiting).element()
        }
        _ => own,
    };

    visiting.remove(&root);
    resolved.insert(root, location.clone());
    location
}
