//! Object/Collection hierarchy.
//!
//! The tracked hierarchy is an explicit arena: nodes live in vectors inside
//! [`Hierarchy`] and refer to each other by handle, never by owning pointer.
//! Parents must exist before their children are inserted, so the tree is
//! acyclic by construction and every parent walk terminates.
//!
//! Collaborators create and destroy objects and collections; this crate only
//! reads the tree during dispatch and flips per-object announcement flags.
//! The flags are atomics so concurrent dispatches work through `&Hierarchy`.
//!
//! Two capability seams customize delivery:
//! - [`ObjectKind`]: per-type descriptor with an optional namespace tag
//!   method (absent by default);
//! - [`CollectionHooks`]: per-collection `filter` / `name_of` / `on_emit`
//!   hooks, each defaulting to a no-op.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::envbuf::EnvBuffer;
use crate::types::{CollectionId, HookError, NamespaceId, ObjectId};

/// Type descriptor attached to every object.
///
/// A kind that overrides [`ObjectKind::namespace_of`] makes its objects
/// namespace-aware: events for them are only broadcast to endpoints bound to
/// the same isolation context.
pub trait ObjectKind: Send + Sync {
    /// Isolation-context tag of the object. Default: not namespace-capable.
    fn namespace_of(&self, _object: ObjectId) -> Option<NamespaceId> {
        None
    }
}

/// Kind with no namespace capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainKind;

impl ObjectKind for PlainKind {}

/// Delivery-customization hooks owned by a collection.
///
/// Collections may implement all, some, or none of the hooks; every absent
/// hook behaves as a no-op.
pub trait CollectionHooks: Send + Sync {
    /// Per-object delivery gate. Returning `false` drops the event before
    /// any buffer is built.
    fn filter(&self, _hierarchy: &Hierarchy, _object: ObjectId) -> bool {
        true
    }

    /// Subsystem name override. `None` falls back to the collection's
    /// display name.
    fn name_of(&self, _hierarchy: &Hierarchy, _object: ObjectId) -> Option<String> {
        None
    }

    /// Last chance for collection-specific entries before the event is
    /// sequenced and sent. An error aborts the dispatch.
    fn on_emit(
        &self,
        _hierarchy: &Hierarchy,
        _object: ObjectId,
        _env: &mut EnvBuffer,
    ) -> std::result::Result<(), HookError> {
        Ok(())
    }
}

/// Hook table implementing none of the hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl CollectionHooks for NoHooks {}

struct ObjectNode {
    name: String,
    parent: Option<ObjectId>,
    collection: Option<CollectionId>,
    kind: Arc<dyn ObjectKind>,
    /// Collection this object represents, if it is a collection's own object.
    represents: Option<CollectionId>,
    suppressed: AtomicBool,
    add_announced: AtomicBool,
    remove_announced: AtomicBool,
}

struct CollectionNode {
    name: String,
    representative: ObjectId,
    hooks: Arc<dyn CollectionHooks>,
}

/// Arena holding the lifecycle-tracked object tree.
#[derive(Default)]
pub struct Hierarchy {
    objects: Vec<ObjectNode>,
    collections: Vec<CollectionNode>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object. The parent and collection, when given, must already
    /// exist in this hierarchy.
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        kind: Arc<dyn ObjectKind>,
        parent: Option<ObjectId>,
        collection: Option<CollectionId>,
    ) -> ObjectId {
        let id = ObjectId::from_index(self.objects.len());
        self.objects.push(ObjectNode {
            name: name.into(),
            parent,
            collection,
            kind,
            represents: None,
            suppressed: AtomicBool::new(false),
            add_announced: AtomicBool::new(false),
            remove_announced: AtomicBool::new(false),
        });
        id
    }

    /// Inserts a collection together with its representative object.
    ///
    /// The representative carries the collection's name, the given parent
    /// link, and a plain (non-namespace-aware) kind.
    pub fn add_collection(
        &mut self,
        name: impl Into<String>,
        parent: Option<ObjectId>,
        hooks: Arc<dyn CollectionHooks>,
    ) -> CollectionId {
        let name = name.into();
        let collection_id = CollectionId::from_index(self.collections.len());

        let representative = ObjectId::from_index(self.objects.len());
        self.objects.push(ObjectNode {
            name: name.clone(),
            parent,
            collection: None,
            kind: Arc::new(PlainKind),
            represents: Some(collection_id),
            suppressed: AtomicBool::new(false),
            add_announced: AtomicBool::new(false),
            remove_announced: AtomicBool::new(false),
        });

        self.collections.push(CollectionNode {
            name,
            representative,
            hooks,
        });
        collection_id
    }

    // =========================================================================
    // Object accessors
    // =========================================================================

    pub fn name_of(&self, object: ObjectId) -> &str {
        &self.node(object).name
    }

    pub fn parent_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.node(object).parent
    }

    pub fn collection_of(&self, object: ObjectId) -> Option<CollectionId> {
        self.node(object).collection
    }

    pub fn kind_of(&self, object: ObjectId) -> &dyn ObjectKind {
        self.node(object).kind.as_ref()
    }

    /// Collection this object represents, if it is a collection's own object.
    pub fn represented_collection(&self, object: ObjectId) -> Option<CollectionId> {
        self.node(object).represents
    }

    pub fn is_suppressed(&self, object: ObjectId) -> bool {
        self.node(object).suppressed.load(Ordering::Relaxed)
    }

    /// Sets the suppression flag; a suppressed object announces nothing.
    pub fn set_suppressed(&self, object: ObjectId, suppressed: bool) {
        self.node(object)
            .suppressed
            .store(suppressed, Ordering::Relaxed);
    }

    pub fn add_announced(&self, object: ObjectId) -> bool {
        self.node(object).add_announced.load(Ordering::Relaxed)
    }

    pub fn remove_announced(&self, object: ObjectId) -> bool {
        self.node(object).remove_announced.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_add_announced(&self, object: ObjectId) {
        self.node(object).add_announced.store(true, Ordering::Relaxed);
    }

    pub(crate) fn mark_remove_announced(&self, object: ObjectId) {
        self.node(object)
            .remove_announced
            .store(true, Ordering::Relaxed);
    }

    // =========================================================================
    // Collection accessors
    // =========================================================================

    pub fn collection_name(&self, collection: CollectionId) -> &str {
        &self.collections[collection.index()].name
    }

    pub fn representative(&self, collection: CollectionId) -> ObjectId {
        self.collections[collection.index()].representative
    }

    pub fn collection_hooks(&self, collection: CollectionId) -> Arc<dyn CollectionHooks> {
        Arc::clone(&self.collections[collection.index()].hooks)
    }

    // =========================================================================
    // Walks
    // =========================================================================

    /// Full hierarchical path, `/grandparent/parent/name`.
    ///
    /// Iterative parent walk; bounded by tree depth.
    pub fn path_of(&self, object: ObjectId) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(object);
        while let Some(id) = cursor {
            let node = self.node(id);
            segments.push(node.name.as_str());
            cursor = node.parent;
        }

        let mut path = String::new();
        for segment in segments.iter().rev() {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    /// Nearest collection on the parent chain, starting at the object itself.
    pub fn owning_collection(&self, object: ObjectId) -> Option<CollectionId> {
        let mut cursor = Some(object);
        while let Some(id) = cursor {
            let node = self.node(id);
            if let Some(collection) = node.collection {
                return Some(collection);
            }
            cursor = node.parent;
        }
        None
    }

    fn node(&self, object: ObjectId) -> &ObjectNode {
        &self.objects[object.index()]
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("objects", &self.objects.len())
            .field("collections", &self.collections.len())
            .finish()
    }
}
