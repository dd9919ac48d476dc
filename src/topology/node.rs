//! `NodeId` and `ElementId`: strong, zero-cost handles for mesh entities
//!
//! Every node and element in a mesh is represented by a unique, opaque
//! identifier. Both handles wrap a nonzero `u64` to enforce at compile- and
//! runtime that 0 is reserved as an invalid or sentinel value, so an
//! unresolved connectivity slot can never masquerade as a real node.
//!
//! This module provides:
//! - Transparent newtypes around `NonZeroU64` for zero-cost memory layout.
//! - Fallible constructors with safety checks.
//! - Implementations of common traits (`Debug`, `Display`, ordering,
//!   hashing) so the handles can be used in maps, sets, and printed easily.

use crate::refine_error::RefineError;
use std::{fmt, num::NonZeroU64};

/// Identifier of a mesh node (rank-0 entity).
///
/// # Memory layout
/// This type is `repr(transparent)`: it has the same ABI and alignment as
/// its single field (`NonZeroU64`) and `Option<NodeId>` is 8 bytes.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns [`RefineError::InvalidNodeId`] if `raw == 0`; 0 is reserved
    /// as the invalid/sentinel value.
    #[inline]
    pub fn new(raw: u64) -> Result<Self, RefineError> {
        NonZeroU64::new(raw)
            .map(NodeId)
            .ok_or(RefineError::InvalidNodeId)
    }

    /// Returns the inner `u64` value of this `NodeId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.get()).finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Identifier of a mesh element (highest-rank entity).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ElementId(NonZeroU64);

impl ElementId {
    /// Creates a new `ElementId` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns [`RefineError::InvalidElementId`] if `raw == 0`.
    #[inline]
    pub fn new(raw: u64) -> Result<Self, RefineError> {
        NonZeroU64::new(raw)
            .map(ElementId)
            .ok_or(RefineError::InvalidElementId)
    }

    /// Returns the inner `u64` value of this `ElementId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementId").field(&self.get()).finish()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ids_are_rejected() {
        assert_eq!(NodeId::new(0), Err(RefineError::InvalidNodeId));
        assert_eq!(ElementId::new(0), Err(RefineError::InvalidElementId));
    }

    #[test]
    fn round_trip() {
        assert_eq!(NodeId::new(42).unwrap().get(), 42);
        assert_eq!(ElementId::new(7).unwrap().to_string(), "7");
    }
}
