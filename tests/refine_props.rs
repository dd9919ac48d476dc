//! Property-based checks over chains of line elements.

use mesh_refine::driver::refine_uniform;
use mesh_refine::mesh::{Element, MeshContext};
use mesh_refine::pattern::{LineRefiner, RefinerPattern};
use mesh_refine::topology::cell_type::CellType;
use mesh_refine::topology::node::{ElementId, NodeId};
use proptest::prelude::*;

fn chain(n: usize) -> Vec<Element> {
    (0..n)
        .map(|i| {
            Element::new(
                ElementId::new(1_000 + i as u64).unwrap(),
                CellType::Line2,
                [
                    NodeId::new(i as u64 + 1).unwrap(),
                    NodeId::new(i as u64 + 2).unwrap(),
                ],
            )
            .unwrap()
        })
        .collect()
}

proptest! {
    #[test]
    fn fan_out_is_exact(n in 1usize..40) {
        let mesh = MeshContext::new(2);
        let pattern = LineRefiner::new(&mesh, CellType::Line2).unwrap();
        let refined = refine_uniform(&pattern, &chain(n)).unwrap();
        prop_assert_eq!(
            refined.elements.len(),
            pattern.num_children_per_element() * n
        );
    }

    #[test]
    fn passes_are_reproducible(n in 1usize..40) {
        let mesh = MeshContext::new(2);
        let pattern = LineRefiner::new(&mesh, CellType::Line2).unwrap();
        let first = refine_uniform(&pattern, &chain(n)).unwrap();
        let second = refine_uniform(&pattern, &chain(n)).unwrap();
        prop_assert_eq!(first.elements, second.elements);
    }

    #[test]
    fn children_tile_each_parent(n in 1usize..40) {
        let mesh = MeshContext::new(2);
        let pattern = LineRefiner::new(&mesh, CellType::Line2).unwrap();
        let parents = chain(n);
        let refined = refine_uniform(&pattern, &parents).unwrap();

        for (parent, pair) in parents.iter().zip(refined.elements.chunks(2)) {
            // Left end, shared split node, right end.
            prop_assert_eq!(pair[0].connectivity[0], parent.connectivity[0]);
            prop_assert_eq!(pair[0].connectivity[1], pair[1].connectivity[0]);
            prop_assert_eq!(pair[1].connectivity[1], parent.connectivity[1]);
        }
    }

    #[test]
    fn one_allocation_per_interior_edge(n in 1usize..40) {
        let mesh = MeshContext::new(2);
        let pattern = LineRefiner::new(&mesh, CellType::Line2).unwrap();
        let refined = refine_uniform(&pattern, &chain(n)).unwrap();
        // One distinct sub-entity per parent in a simple chain.
        prop_assert_eq!(refined.registry.allocation_events(), n as u64);
    }
}
