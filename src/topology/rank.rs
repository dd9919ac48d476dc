//! Entity ranks for mesh sub-entities.

/// Rank (dimension class) of a mesh entity.
///
/// Ordered from lowest to highest so rank comparisons read naturally:
/// `EntityRank::Node < EntityRank::Edge < EntityRank::Element`.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum EntityRank {
    /// 0D node/vertex.
    Node,
    /// 1D edge.
    Edge,
    /// 2D face.
    Face,
    /// Highest-rank entity of the mesh (the element itself).
    Element,
}
