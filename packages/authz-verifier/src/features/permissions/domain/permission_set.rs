/*
 * Permission tokens and immutable permission sets
 *
 * A PermissionSet is a persistent value: every operation returns a new set
 * and the backing storage is shared between snapshots behind an Arc, so a
 * lattice value can be cloned per CFG edge without copying.
 *
 * # Time Complexity
 * - contains: O(1)
 * - union / intersect / missing: O(min(|a|, |b|)) lookups plus one copy of
 *   the result
 */

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque relation name checked against a subject/object pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Permission {
    fn from(name: String) -> Self {
        Self(name)
    }
}

static EMPTY: Lazy<PermissionSet> = Lazy::new(|| PermissionSet {
    items: Arc::new(FxHashSet::default()),
});

/// Immutable set of permissions
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "Vec<Permission>", into = "Vec<Permission>")]
pub struct PermissionSet {
    items: Arc<FxHashSet<Permission>>,
}

impl PermissionSet {
    /// The unique bottom value
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    pub fn single(permission: impl Into<Permission>) -> Self {
        Self::empty().with(permission.into())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.items.contains(permission)
    }

    pub fn contains_all(&self, permissions: &PermissionSet) -> bool {
        permissions.is_subset_of(self)
    }

    /// `required − self`
    pub fn missing(&self, required: &PermissionSet) -> PermissionSet {
        if required.is_empty() || required.is_subset_of(self) {
            return Self::empty();
        }
        required
            .items
            .iter()
            .filter(|p| !self.items.contains(*p))
            .cloned()
            .collect()
    }

    pub fn with(&self, permission: Permission) -> PermissionSet {
        if self.items.contains(&permission) {
            return self.clone();
        }
        let mut items = (*self.items).clone();
        items.insert(permission);
        Self {
            items: Arc::new(items),
        }
    }

    pub fn with_all<I>(&self, permissions: I) -> PermissionSet
    where
        I: IntoIterator<Item = Permission>,
    {
        let mut items: Option<FxHashSet<Permission>> = None;
        for p in permissions {
            if self.items.contains(&p) {
                continue;
            }
            items
                .get_or_insert_with(|| (*self.items).clone())
                .insert(p);
        }
        match items {
            Some(items) => Self {
                items: Arc::new(items),
            },
            None => self.clone(),
        }
    }

    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        let (large, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        large.with_all(small.items.iter().cloned())
    }

    pub fn intersect(&self, other: &PermissionSet) -> PermissionSet {
        let (large, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        if small.is_subset_of(large) {
            return small.clone();
        }
        small
            .items
            .iter()
            .filter(|p| large.items.contains(*p))
            .cloned()
            .collect()
    }

    pub fn is_subset_of(&self, other: &PermissionSet) -> bool {
        if Arc::ptr_eq(&self.items, &other.items) {
            return true;
        }
        self.len() <= other.len() && self.items.iter().all(|p| other.items.contains(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.items.iter()
    }

    /// Permissions in ascending order
    pub fn sorted(&self) -> Vec<&Permission> {
        let mut items: Vec<&Permission> = self.items.iter().collect();
        items.sort();
        items
    }

    /// Sorted, comma-joined listing (`can_edit, can_view`)
    pub fn to_comma_list(&self) -> String {
        self.sorted()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for PermissionSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }
}

impl Eq for PermissionSet {}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sorted()).finish()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_comma_list())
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let items: FxHashSet<Permission> = iter.into_iter().collect();
        if items.is_empty() {
            return Self::empty();
        }
        Self {
            items: Arc::new(items),
        }
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Permission::from).collect()
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(items: Vec<Permission>) -> Self {
        items.into_iter().collect()
    }
}

impl From<PermissionSet> for Vec<Permission> {
    fn from(set: PermissionSet) -> Self {
        set.sorted().into_iter().cloned().collect()
    }
}
