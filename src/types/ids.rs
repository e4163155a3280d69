//! Strongly-typed identifiers.
//!
//! Hierarchy handles (`ObjectId`, `CollectionId`) are arena indices: non-owning
//! back-references into a [`Hierarchy`](crate::hierarchy::Hierarchy), never
//! pointers. `NamespaceId` is the opaque isolation-context tag handed in by the
//! namespace lifecycle provider.

use std::fmt;

/// Macro to define an arena-handle newtype.
///
/// Generates: struct, crate-internal `from_index()`/`index()`, Display.
macro_rules! define_handle {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize);
                Self(index as u32)
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_handle!(ObjectId, "obj#");
define_handle!(CollectionId, "coll#");

/// Opaque isolation-context tag.
///
/// The value is assigned by whoever manages context lifecycles; this crate
/// only ever compares tags for equality. Tag `0` is reserved for the
/// global/initial context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(u64);

impl NamespaceId {
    /// The global/initial isolation context.
    pub const INITIAL: NamespaceId = NamespaceId(0);

    pub fn new(tag: u64) -> Self {
        Self(tag)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_namespace_is_tag_zero() {
        assert_eq!(NamespaceId::INITIAL, NamespaceId::new(0));
        assert_ne!(NamespaceId::INITIAL, NamespaceId::new(7));
    }

    #[test]
    fn handles_round_trip_their_index() {
        let id = ObjectId::from_index(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "obj#42");
    }
}
