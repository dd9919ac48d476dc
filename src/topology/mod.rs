//! Top-level module for mesh topology abstractions.
//!
//! This module provides the core types for describing element topologies to
//! the refinement engine:
//! - Strong identifier types for nodes and elements
//! - Entity ranks and cell-type metadata
//! - Static refinement templates (the per-topology connectivity tables)

pub mod cell_type;
pub mod node;
pub mod rank;
pub mod template;

pub use cell_type::CellType;
pub use node::{ElementId, NodeId};
pub use rank::EntityRank;
pub use template::{template_for, ChildSlot, RefineTemplate, SubEntity};
