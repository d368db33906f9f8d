/*
 * Authorization Lattice
 *
 * Must-dataflow state: AbstractLocation → PermissionSet, plus two sentinels.
 *
 *   ⊤ (Top)    : everything trivially proven (unreachable / error paths)
 *   ⊥ (Bottom) : nothing proven (empty map)
 *
 * Meet (⊓) combines states at a confluence: per-location intersection, a
 * location known on one side only is dropped. Top is the identity and
 * Bottom the zero.
 *
 * Join (⊔) widens a state with extra facts: per-location union. Top absorbs,
 * Bottom is the identity.
 *
 * A location absent from the map is equivalent to the empty set; the map
 * never stores empty sets, so Bottom is exactly the empty map.
 *
 * Height is bounded by |permissions| × |tracked locations|.
 */

use super::abstract_location::AbstractLocation;
use super::permission_set::{Permission, PermissionSet};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

type FactMap = FxHashMap<AbstractLocation, PermissionSet>;

#[derive(Clone)]
pub enum AuthorizationLattice {
    Top,
    Facts(Arc<FactMap>),
}

impl AuthorizationLattice {
    pub fn top() -> Self {
        AuthorizationLattice::Top
    }

    pub fn bottom() -> Self {
        AuthorizationLattice::Facts(Arc::new(FactMap::default()))
    }

    pub fn singleton(location: AbstractLocation, permission: Permission) -> Self {
        Self::bottom().with_permission(&location, permission)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, AuthorizationLattice::Top)
    }

    pub fn is_bottom(&self) -> bool {
        match self {
            AuthorizationLattice::Top => false,
            AuthorizationLattice::Facts(facts) => facts.is_empty(),
        }
    }

    /// Proven permissions at `location`; `None` on Top
    pub fn permissions_at(&self, location: &AbstractLocation) -> Option<PermissionSet> {
        match self {
            AuthorizationLattice::Top => None,
            AuthorizationLattice::Facts(facts) => {
                Some(facts.get(location).cloned().unwrap_or_default())
            }
        }
    }

    pub fn has_permission(&self, location: &AbstractLocation, permission: &Permission) -> bool {
        match self {
            AuthorizationLattice::Top => true,
            AuthorizationLattice::Facts(facts) => facts
                .get(location)
                .map_or(false, |held| held.contains(permission)),
        }
    }

    pub fn has_all_permissions(&self, location: &AbstractLocation, required: &PermissionSet) -> bool {
        self.missing_permissions(location, required).is_empty()
    }

    /// `required − proven(location)`; always empty on Top
    pub fn missing_permissions(
        &self,
        location: &AbstractLocation,
        required: &PermissionSet,
    ) -> PermissionSet {
        match self {
            AuthorizationLattice::Top => PermissionSet::empty(),
            AuthorizationLattice::Facts(facts) => match facts.get(location) {
                Some(held) => held.missing(required),
                None => required.clone(),
            },
        }
    }

    pub fn with_permission(&self, location: &AbstractLocation, permission: Permission) -> Self {
        match self {
            AuthorizationLattice::Top => AuthorizationLattice::Top,
            AuthorizationLattice::Facts(facts) => {
                if facts
                    .get(location)
                    .map_or(false, |held| held.contains(&permission))
                {
                    return self.clone();
                }
                let mut next = (**facts).clone();
                let held = next.remove(location).unwrap_or_default();
                next.insert(location.clone(), held.with(permission));
                AuthorizationLattice::Facts(Arc::new(next))
            }
        }
    }

    pub fn with_permissions(&self, location: &AbstractLocation, permissions: &PermissionSet) -> Self {
        match self {
            AuthorizationLattice::Top => AuthorizationLattice::Top,
            AuthorizationLattice::Facts(facts) => {
                let held = facts.get(location).cloned().unwrap_or_default();
                if permissions.is_subset_of(&held) {
                    return self.clone();
                }
                let mut next = (**facts).clone();
                next.insert(location.clone(), held.union(permissions));
                AuthorizationLattice::Facts(Arc::new(next))
            }
        }
    }

    /// Greatest lower bound
    pub fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (AuthorizationLattice::Top, x) | (x, AuthorizationLattice::Top) => x.clone(),
            (AuthorizationLattice::Facts(a), AuthorizationLattice::Facts(b)) => {
                if Arc::ptr_eq(a, b) {
                    return self.clone();
                }
                let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                let mut out = FactMap::default();
                for (location, held) in small.iter() {
                    if let Some(other_held) = large.get(location) {
                        let common = held.intersect(other_held);
                        if !common.is_empty() {
                            out.insert(location.clone(), common);
                        }
                    }
                }
                AuthorizationLattice::Facts(Arc::new(out))
            }
        }
    }

    /// Least upper bound
    pub fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (AuthorizationLattice::Top, _) | (_, AuthorizationLattice::Top) => {
                AuthorizationLattice::Top
            }
            (AuthorizationLattice::Facts(a), AuthorizationLattice::Facts(b)) => {
                if Arc::ptr_eq(a, b) {
                    return self.clone();
                }
                let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                let mut out = (**large).clone();
                for (location, held) in small.iter() {
                    match out.get_mut(location) {
                        Some(existing) => *existing = existing.union(held),
                        None => {
                            out.insert(location.clone(), held.clone());
                        }
                    }
                }
                AuthorizationLattice::Facts(Arc::new(out))
            }
        }
    }

    /// Every fact proven in `self` is also proven in `other`
    pub fn is_subset_of(&self, other: &Self) -> bool {
        match (self, other) {
            (_, AuthorizationLattice::Top) => true,
            (AuthorizationLattice::Top, AuthorizationLattice::Facts(_)) => false,
            (AuthorizationLattice::Facts(a), AuthorizationLattice::Facts(b)) => {
                a.iter().all(|(location, held)| {
                    b.get(location)
                        .map_or(false, |other_held| held.is_subset_of(other_held))
                })
            }
        }
    }

    /// Number of locations with at least one proven permission
    pub fn location_count(&self) -> usize {
        match self {
            AuthorizationLattice::Top => 0,
            AuthorizationLattice::Facts(facts) => facts.len(),
        }
    }

    /// Facts in location order; empty on Top
    pub fn entries(&self) -> Vec<(&AbstractLocation, &PermissionSet)> {
        match self {
            AuthorizationLattice::Top => Vec::new(),
            AuthorizationLattice::Facts(facts) => {
                let mut entries: Vec<_> = facts.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                entries
            }
        }
    }
}

impl Default for AuthorizationLattice {
    fn default() -> Self {
        Self::bottom()
    }
}

impl PartialEq for AuthorizationLattice {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AuthorizationLattice::Top, AuthorizationLattice::Top) => true,
            (AuthorizationLattice::Facts(a), AuthorizationLattice::Facts(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(location, held)| b.get(location) == Some(held))
            }
            _ => false,
        }
    }
}

impl Eq for AuthorizationLattice {}

impl fmt::Display for AuthorizationLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            return f.write_str("⊤");
        }
        if self.is_bottom() {
            return f.write_str("⊥");
        }
        f.write_str("{")?;
        for (i, (location, held)) in self.entries().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", location, held)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for AuthorizationLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthorizationLattice({})", self)
    }
}
