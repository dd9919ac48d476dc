//! Cell type metadata for mesh elements.

/// Element topologies covered by the line refinement family.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 1D linear segment with 2 end nodes.
    Line2,
    /// 1D quadratic segment with 2 end nodes and a midside node.
    Line3,
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub const fn dimension(self) -> u8 {
        match self {
            CellType::Line2 | CellType::Line3 => 1,
        }
    }

    /// Total connectivity length, including higher-order nodes.
    pub const fn node_count(self) -> usize {
        match self {
            CellType::Line2 => 2,
            CellType::Line3 => 3,
        }
    }

    /// Number of corner vertices, excluding higher-order nodes.
    pub const fn vertex_count(self) -> usize {
        match self {
            CellType::Line2 | CellType::Line3 => 2,
        }
    }
}
