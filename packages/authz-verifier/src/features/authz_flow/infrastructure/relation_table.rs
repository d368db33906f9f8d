//! Relation constants from the program model

use crate::features::authz_flow::ports::SemanticModel;
use crate::shared::models::ProgramModel;
use std::collections::BTreeMap;

/// `Owner.Member` / `Member` → relation token
#[derive(Debug, Clone, Default)]
pub struct RelationTable {
    values: BTreeMap<String, String>,
}

impl RelationTable {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn from_program(program: &ProgramModel) -> Self {
        Self::new(program.relations.clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SemanticModel for RelationTable {
    /// Qualified key first, then the bare member
    fn relation_constant(&self, owner: Option<&str>, member: &str) -> Option<String> {
        owner
            .and_then(|owner| self.values.get(&format!("{}.{}", owner, member)))
            .or_else(|| self.values.get(member))
            .cloned()
    }
}
