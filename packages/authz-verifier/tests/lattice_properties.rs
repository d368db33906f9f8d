//! Property-based tests for the permission algebra
//!
//! Laws that hold for ALL inputs:
//! - PermissionSet: union is an upper bound, intersection a lower bound,
//!   both idempotent
//! - AuthorizationLattice: Top is the meet identity and join absorber,
//!   Bottom the join identity and meet absorber; meet/join commutative and
//!   associative

use authz_verifier::{AbstractLocation, AuthorizationLattice, Permission, PermissionSet};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

const PERMISSIONS: &[&str] = &["can_view", "can_edit", "can_delete", "owner", "viewer"];
const LOCATIONS: &[&str] = &["Api.Get::secret", "Api.Get::user", "Api.Get::items[*]"];

fn set_from_mask(mask: u8) -> PermissionSet {
    PERMISSIONS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, p)| Permission::new(*p))
        .collect()
}

// ============================================================================
// QuickCheck Tests (PermissionSet)
// ============================================================================

#[quickcheck]
fn qc_union_is_upper_bound(a: u8, b: u8) -> bool {
    let (a, b) = (set_from_mask(a), set_from_mask(b));
    let u = a.union(&b);
    a.is_subset_of(&u) && b.is_subset_of(&u)
}

#[quickcheck]
fn qc_intersection_is_lower_bound(a: u8, b: u8) -> bool {
    let (a, b) = (set_from_mask(a), set_from_mask(b));
    let i = a.intersect(&b);
    i.is_subset_of(&a) && i.is_subset_of(&b)
}

#[quickcheck]
fn qc_set_operations_idempotent(a: u8) -> bool {
    let a = set_from_mask(a);
    a.union(&a) == a && a.intersect(&a) == a
}

#[quickcheck]
fn qc_missing_is_disjoint_from_held(held: u8, required: u8) -> bool {
    let (held, required) = (set_from_mask(held), set_from_mask(required));
    let missing = held.missing(&required);
    missing.is_subset_of(&required) && missing.intersect(&held).is_empty()
}

// ============================================================================
// Proptest (AuthorizationLattice)
// ============================================================================

fn arb_facts() -> impl Strategy<Value = AuthorizationLattice> {
    prop::collection::vec((0..LOCATIONS.len(), 0..PERMISSIONS.len()), 0..8).prop_map(|facts| {
        facts.into_iter().fold(AuthorizationLattice::bottom(), |acc, (l, p)| {
            acc.with_permission(&AbstractLocation::new(LOCATIONS[l]), Permission::new(PERMISSIONS[p]))
        })
    })
}

fn arb_lattice() -> impl Strategy<Value = AuthorizationLattice> {
    prop_oneof![
        1 => Just(AuthorizationLattice::top()),
        6 => arb_facts(),
    ]
}

proptest! {
    #[test]
    fn prop_top_is_meet_identity(l in arb_lattice()) {
        prop_assert_eq!(l.meet(&AuthorizationLattice::top()), l);
    }

    #[test]
    fn prop_bottom_absorbs_meet(l in arb_lattice()) {
        prop_assert!(l.meet(&AuthorizationLattice::bottom()).is_bottom());
    }

    #[test]
    fn prop_top_absorbs_join(l in arb_lattice()) {
        prop_assert!(l.join(&AuthorizationLattice::top()).is_top());
    }

    #[test]
    fn prop_bottom_is_join_identity(l in arb_lattice()) {
        prop_assert_eq!(l.join(&AuthorizationLattice::bottom()), l);
    }

    #[test]
    fn prop_meet_commutative(a in arb_lattice(), b in arb_lattice()) {
        prop_assert_eq!(a.meet(&b), b.meet(&a));
    }

    #[test]
    fn prop_join_commutative(a in arb_lattice(), b in arb_lattice()) {
        prop_assert_eq!(a.join(&b), b.join(&a));
    }

    #[test]
    fn prop_meet_associative(a in arb_lattice(), b in arb_lattice(), c in arb_lattice()) {
        prop_assert_eq!(a.meet(&b).meet(&c), a.meet(&b.meet(&c)));
    }

    #[test]
    fn prop_join_associative(a in arb_lattice(), b in arb_lattice(), c in arb_lattice()) {
        prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
    }

    #[test]
    fn prop_meet_below_both(a in arb_lattice(), b in arb_lattice()) {
        let m = a.meet(&b);
        prop_assert!(m.is_subset_of(&a));
        prop_assert!(m.is_subset_of(&b));
    }

    #[test]
    fn prop_with_permission_never_mutates(l in arb_facts(), p in 0..PERMISSIONS.len()) {
        let before = l.clone();
        let location = AbstractLocation::new(LOCATIONS[0]);
        let after = l.with_permission(&location, Permission::new(PERMISSIONS[p]));
        prop_assert_eq!(&l, &before);
        prop_assert!(after.has_permission(&location, &Permission::new(PERMISSIONS[p])));
    }
}
