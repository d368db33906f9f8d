//! Operand resolution for check/require arguments
//!
//! Objects resolve to abstract locations through the alias oracle; relations
//! resolve to permission tokens through literals, constant values, the
//! semantic model, or (optionally) the member name itself. Any other shape
//! is "unknown" and yields nothing.

use crate::features::authz_flow::ports::SemanticModel;
use crate::features::permissions::{AbstractLocation, LocationSet, Permission};
use crate::features::points_to::{AliasOracle, ProgramPoint, Reference};
use crate::shared::models::{Expr, MethodId};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::trace;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid regex"));

/// `CanView` → `can_view`
pub fn infer_relation(member: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(member, "${1}_${2}")
        .to_lowercase()
}

/// Method activation being analyzed
///
/// A callee frame carries the binding of its formal parameter locations to
/// the caller's actual argument locations.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub method: &'a MethodId,
    pub file: &'a str,
    pub depth: usize,
    bindings: FxHashMap<AbstractLocation, LocationSet>,
}

impl<'a> Frame<'a> {
    pub fn entry(method: &'a MethodId, file: &'a str) -> Self {
        Self {
            method,
            file,
            depth: 0,
            bindings: FxHashMap::default(),
        }
    }

    pub fn callee(
        method: &'a MethodId,
        file: &'a str,
        depth: usize,
        bindings: FxHashMap<AbstractLocation, LocationSet>,
    ) -> Self {
        Self {
            method,
            file,
            depth,
            bindings,
        }
    }

    /// Replace bound formal locations (and their element summaries)
    pub fn substitute(&self, locations: LocationSet) -> LocationSet {
        if self.bindings.is_empty() {
            return locations;
        }
        let mut out = LocationSet::new();
        for location in locations {
            if let Some(bound) = self.bindings.get(&location) {
                out.extend(bound.iter().cloned());
                continue;
            }
            if let Some(bound) = location
                .element_base()
                .and_then(|base| self.bindings.get(&base))
            {
                out.extend(bound.iter().map(AbstractLocation::element));
                continue;
            }
            out.insert(location);
        }
        out
    }
}

pub struct OperandResolver<'a> {
    oracle: &'a dyn AliasOracle,
    semantics: &'a dyn SemanticModel,
    infer_from_member: bool,
}

impl<'a> OperandResolver<'a> {
    pub fn new(
        oracle: &'a dyn AliasOracle,
        semantics: &'a dyn SemanticModel,
        infer_from_member: bool,
    ) -> Self {
        Self {
            oracle,
            semantics,
            infer_from_member,
        }
    }

    /// Reference named by an argument, after stripping wrappers
    pub fn reference(expr: &Expr) -> Option<Reference> {
        match expr.unwrapped() {
            Expr::Parameter { name } => Some(Reference::Parameter(name.clone())),
            Expr::Local { name } => Some(Reference::Local(name.clone())),
            Expr::ElementOf { inner } => Self::reference(inner).map(Reference::element_of),
            _ => None,
        }
    }

    pub fn reference_locations(
        &self,
        frame: &Frame<'_>,
        reference: &Reference,
        point: ProgramPoint,
    ) -> LocationSet {
        frame.substitute(self.oracle.locations(frame.method, reference, point))
    }

    /// Locations an argument may denote; empty when unknown or absent
    pub fn locations(&self, frame: &Frame<'_>, expr: Option<&Expr>, point: ProgramPoint) -> LocationSet {
        let Some(expr) = expr else {
            return LocationSet::new();
        };
        match Self::reference(expr) {
            Some(reference) => self.reference_locations(frame, &reference, point),
            None => {
                trace!(method = %frame.method, ?expr, "Unknown object shape");
                LocationSet::new()
            }
        }
    }

    /// Permission token named by an argument
    pub fn permission(&self, expr: Option<&Expr>) -> Option<Permission> {
        match expr?.unwrapped() {
            Expr::StringLiteral { value } if !value.is_empty() => Some(Permission::new(value.clone())),
            Expr::Constant {
                value: Some(value), ..
            } => Some(Permission::new(value.clone())),
            Expr::Constant {
                owner,
                name,
                value: None,
            } => self.relation(owner.as_deref(), name),
            Expr::Member { receiver, member } => {
                let owner = receiver.as_deref().and_then(|r| match r.unwrapped() {
                    Expr::Local { name } | Expr::Parameter { name } => Some(name.as_str()),
                    Expr::Member { member, .. } => Some(member.as_str()),
                    _ => None,
                });
                self.relation(owner, member)
            }
            other => {
                trace!(?other, "Unknown permission shape");
                None
            }
        }
    }

    /// Permission token for a relation named in an annotation
    pub fn annotation_permission(&self, relation: &str) -> Permission {
        Permission::new(
            self.semantics
                .relation_constant(None, relation)
                .unwrap_or_else(|| relation.to_string()),
        )
    }

    fn relation(&self, owner: Option<&str>, member: &str) -> Option<Permission> {
        self.semantics
            .relation_constant(owner, member)
            .or_else(|| self.infer_from_member.then(|| infer_relation(member)))
            .map(Permission::new)
    }
}
