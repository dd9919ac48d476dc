//! # mesh-refine
//!
//! mesh-refine is a topology-parameterized uniform mesh-refinement engine
//! for finite-element preprocessing. Given a mesh of elements of a fixed
//! topology, it produces a finer mesh by subdividing each parent element
//! into a fixed number of children, inserting new nodes along parent
//! sub-entities and deduplicating nodes shared between adjacent elements.
//!
//! ## Components
//! - [`registry::NodeRegistry`]: concurrent keyed store guaranteeing
//!   at-most-one node allocation per shared sub-entity.
//! - [`topology::RefineTemplate`]: static per-topology tables describing
//!   sub-entities needing new nodes and the child connectivity slots.
//! - [`pattern::RefinerPattern`]: the per-topology algorithm object that
//!   declares needed entities and assembles children into a pre-sized pool.
//! - [`driver::refine_uniform`]: a minimal one-pass driver wiring the
//!   above together (`refine_uniform_par` behind the `rayon` feature).
//!
//! ## Determinism
//! For a fixed input mesh, child element ids, ordering, and connectivities
//! are identical run to run; the serial and parallel drivers produce the
//! same elements.
//!
//! ## Usage
//! ```
//! use mesh_refine::prelude::*;
//!
//! let mesh = MeshContext::new(2);
//! let pattern = LineRefiner::new(&mesh, CellType::Line2)?;
//! let parents = vec![
//!     Element::new(ElementId::new(10)?, CellType::Line2,
//!                  [NodeId::new(1)?, NodeId::new(2)?])?,
//! ];
//! let refined = refine_uniform(&pattern, &parents)?;
//! assert_eq!(refined.elements.len(), 2);
//! # Ok::<(), mesh_refine::refine_error::RefineError>(())
//! ```

pub mod driver;
pub mod mesh;
pub mod pattern;
pub mod refine_error;
pub mod registry;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::driver::{refine_uniform, UniformRefinement};
    #[cfg(feature = "rayon")]
    pub use crate::driver::refine_uniform_par;
    pub use crate::mesh::{Connectivity, Element, ElementPool, MeshContext, PartName};
    pub use crate::pattern::{LineRefiner, NeededEntity, RefinerPattern};
    pub use crate::refine_error::RefineError;
    pub use crate::registry::{NodeRegistry, NodeVec, SubEntityKey};
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::node::{ElementId, NodeId};
    pub use crate::topology::rank::EntityRank;
    pub use crate::topology::template::{template_for, ChildSlot, RefineTemplate, SubEntity};
}
