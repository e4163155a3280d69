//! Namespace resolution and delivery admission.
//!
//! An object's owning isolation context is found by walking its parent chain
//! and asking each node's type descriptor for a namespace tag. One documented
//! special case: when the walk lands on a collection's representative object
//! whose own type has no namespace capability, resolution extends exactly one
//! hop through that representative's parent link and the answer there is
//! final. This is not a general recursive fallback.
//!
//! Admission is asymmetric between the two delivery channels:
//! - broadcast excludes an endpoint only when object and endpoint contexts
//!   are both concretely known and differ;
//! - the usermode helper only ever runs for the global/initial context, with
//!   unresolvable objects treated as global.

use crate::hierarchy::Hierarchy;
use crate::types::{NamespaceId, ObjectId};

/// Resolves the isolation context owning `object`.
///
/// `None` means unconstrained: the event is visible to every endpoint.
pub fn owning_namespace(hierarchy: &Hierarchy, object: ObjectId) -> Option<NamespaceId> {
    let mut cursor = Some(object);
    while let Some(id) = cursor {
        if let Some(ns) = hierarchy.kind_of(id).namespace_of(id) {
            return Some(ns);
        }

        if let Some(collection) = hierarchy.represented_collection(id) {
            // Single extra hop through the representative's parent; a
            // representative without a parent resolves as unconstrained.
            let representative = hierarchy.representative(collection);
            return hierarchy
                .parent_of(representative)
                .and_then(|parent| hierarchy.kind_of(parent).namespace_of(parent));
        }

        cursor = hierarchy.parent_of(id);
    }
    None
}

/// Broadcast admission for one endpoint.
///
/// Excludes only when the object's context is known and differs from the
/// endpoint's; unconstrained objects reach every endpoint.
pub fn broadcast_admits(endpoint_ns: NamespaceId, object_ns: Option<NamespaceId>) -> bool {
    match object_ns {
        Some(ns) => ns == endpoint_ns,
        None => true,
    }
}

/// Usermode-helper admission.
///
/// Only objects in the global/initial context (or with no resolvable
/// context at all) may reach the helper.
pub fn usermode_admits(object_ns: Option<NamespaceId>) -> bool {
    object_ns.map_or(true, |ns| ns == NamespaceId::INITIAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{NoHooks, ObjectKind, PlainKind};
    use std::sync::Arc;

    struct TaggedKind(NamespaceId);

    impl ObjectKind for TaggedKind {
        fn namespace_of(&self, _object: ObjectId) -> Option<NamespaceId> {
            Some(self.0)
        }
    }

    #[test]
    fn direct_namespace_wins() {
        let ns = NamespaceId::new(3);
        let mut h = Hierarchy::new();
        let obj = h.add_object("eth0", Arc::new(TaggedKind(ns)), None, None);
        assert_eq!(owning_namespace(&h, obj), Some(ns));
    }

    #[test]
    fn walk_finds_namespace_on_an_ancestor() {
        let ns = NamespaceId::new(9);
        let mut h = Hierarchy::new();
        let root = h.add_object("netdev", Arc::new(TaggedKind(ns)), None, None);
        let child = h.add_object("queues", Arc::new(PlainKind), Some(root), None);
        let leaf = h.add_object("rx-0", Arc::new(PlainKind), Some(child), None);
        assert_eq!(owning_namespace(&h, leaf), Some(ns));
    }

    #[test]
    fn plain_tree_is_unconstrained() {
        let mut h = Hierarchy::new();
        let root = h.add_object("devices", Arc::new(PlainKind), None, None);
        let leaf = h.add_object("disk", Arc::new(PlainKind), Some(root), None);
        assert_eq!(owning_namespace(&h, leaf), None);
    }

    #[test]
    fn representative_extends_one_hop_through_its_parent() {
        let ns = NamespaceId::new(5);
        let mut h = Hierarchy::new();
        let anchor = h.add_object("net-root", Arc::new(TaggedKind(ns)), None, None);
        let coll = h.add_collection("net", Some(anchor), Arc::new(NoHooks));
        let repr = h.representative(coll);
        assert_eq!(owning_namespace(&h, repr), Some(ns));
    }

    #[test]
    fn hop_result_is_final_even_when_unresolved() {
        let ns = NamespaceId::new(5);
        let mut h = Hierarchy::new();
        // grandparent is tagged, parent of the representative is not: the
        // single hop stops at the untagged parent and does not recurse.
        let grandparent = h.add_object("top", Arc::new(TaggedKind(ns)), None, None);
        let parent = h.add_object("mid", Arc::new(PlainKind), Some(grandparent), None);
        let coll = h.add_collection("leafset", Some(parent), Arc::new(NoHooks));
        let repr = h.representative(coll);
        assert_eq!(owning_namespace(&h, repr), None);
    }

    #[test]
    fn parentless_representative_is_unconstrained() {
        let mut h = Hierarchy::new();
        let coll = h.add_collection("block", None, Arc::new(NoHooks));
        let repr = h.representative(coll);
        assert_eq!(owning_namespace(&h, repr), None);
    }

    #[test]
    fn broadcast_admission_truth_table() {
        let n1 = NamespaceId::new(1);
        let n2 = NamespaceId::new(2);
        assert!(broadcast_admits(n1, Some(n1)));
        assert!(!broadcast_admits(n1, Some(n2)));
        assert!(broadcast_admits(n1, None));
        assert!(broadcast_admits(n2, None));
    }

    #[test]
    fn usermode_admission_truth_table() {
        assert!(usermode_admits(None));
        assert!(usermode_admits(Some(NamespaceId::INITIAL)));
        assert!(!usermode_admits(Some(NamespaceId::new(4))));
    }
}
