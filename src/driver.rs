//! One-pass uniform refinement driver.
//!
//! The driver owns everything the pattern contract leaves to the caller:
//! pre-sizing the output pool to `fan_out × parent_count`, resolving needed
//! nodes through the [`NodeRegistry`], and halting the pass on the first
//! error rather than emitting a half-refined mesh.

use crate::mesh::{Element, ElementPool};
use crate::pattern::{NeededEntity, RefinerPattern};
use crate::refine_error::RefineError;
use crate::registry::{NodeRegistry, NodeVec};

/// Result of one uniform refinement pass.
#[derive(Debug)]
pub struct UniformRefinement {
    /// Children in parent order, `fan_out` consecutive entries per parent.
    pub elements: Vec<Element>,
    /// Node registry from the pass, retaining the provenance of every node
    /// it allocated so downstream interpolation can locate them.
    pub registry: NodeRegistry,
}

/// Refine every parent element with `pattern`, serially.
///
/// Parents whose topology does not match the pattern are a caller error and
/// abort the pass, matching the rule that a failed pass beats a partially
/// refined mesh.
///
/// # Errors
/// Any [`RefineError`] from key construction, node resolution, or child
/// assembly; the pass stops at the first one.
pub fn refine_uniform(
    pattern: &dyn RefinerPattern,
    parents: &[Element],
) -> Result<UniformRefinement, RefineError> {
    pattern.do_break();
    let fan_out = pattern.num_children_per_element();
    let needed = pattern.needed_entities();
    let registry = NodeRegistry::starting_after(max_node_id(parents));

    let mut slots: Vec<Option<Element>> = (0..fan_out * parents.len()).map(|_| None).collect();
    let mut pool = ElementPool::new(&mut slots, first_child_id(parents));

    for parent in parents {
        let resolved = resolve_new_nodes(pattern, &registry, &needed, parent)?;
        let written = pattern.create_children(parent, &resolved, &mut pool)?;
        if written != fan_out {
            return Err(RefineError::FanOutMismatch {
                expected: fan_out,
                written,
            });
        }
    }

    log::debug!(
        "uniform pass: {} parents -> {} children, {} new node key(s)",
        parents.len(),
        slots.len(),
        registry.len()
    );
    Ok(UniformRefinement {
        elements: collect_slots(slots),
        registry,
    })
}

/// Refine every parent element with `pattern`, in parallel.
///
/// Each parent owns an exclusive `fan_out`-sized chunk of the pre-sized
/// pool, so child ids and ordering are identical to the serial pass; the
/// registry's per-key insert-or-get keeps shared-node allocation correct
/// under the races this creates.
#[cfg(feature = "rayon")]
pub fn refine_uniform_par(
    pattern: &dyn RefinerPattern,
    parents: &[Element],
) -> Result<UniformRefinement, RefineError> {
    use rayon::prelude::*;

    pattern.do_break();
    let fan_out = pattern.num_children_per_element();
    let needed = pattern.needed_entities();
    let registry = NodeRegistry::starting_after(max_node_id(parents));
    let first_id = first_child_id(parents);

    let mut slots: Vec<Option<Element>> = (0..fan_out * parents.len()).map(|_| None).collect();
    if fan_out > 0 {
        slots
            .par_chunks_mut(fan_out)
            .zip(parents.par_iter())
            .enumerate()
            .try_for_each(|(parent_idx, (chunk, parent))| {
                let chunk_first_id = first_id
                    .checked_add(parent_idx as u64 * fan_out as u64)
                    .ok_or(RefineError::InvalidElementId)?;
                let mut pool = ElementPool::new(chunk, chunk_first_id);
                let resolved = resolve_new_nodes(pattern, &registry, &needed, parent)?;
                let written = pattern.create_children(parent, &resolved, &mut pool)?;
                if written != fan_out {
                    return Err(RefineError::FanOutMismatch {
                        expected: fan_out,
                        written,
                    });
                }
                Ok(())
            })?;
    }

    Ok(UniformRefinement {
        elements: collect_slots(slots),
        registry,
    })
}

fn resolve_new_nodes(
    pattern: &dyn RefinerPattern,
    registry: &NodeRegistry,
    needed: &[NeededEntity],
    parent: &Element,
) -> Result<Vec<NodeVec>, RefineError> {
    let mut resolved = Vec::with_capacity(needed.len());
    for (entity, descriptor) in needed.iter().enumerate() {
        let key = pattern.sub_entity_key(parent, entity)?;
        resolved.push(registry.request_nodes(key, descriptor.nodes_per_entity)?);
    }
    Ok(resolved)
}

fn max_node_id(parents: &[Element]) -> u64 {
    parents
        .iter()
        .flat_map(|element| element.connectivity.iter())
        .map(|node| node.get())
        .max()
        .unwrap_or(0)
}

fn first_child_id(parents: &[Element]) -> u64 {
    parents
        .iter()
        .map(|element| element.id.get())
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

fn collect_slots(slots: Vec<Option<Element>>) -> Vec<Element> {
    // Every slot is Some: each parent wrote exactly `fan_out` children or
    // the pass already aborted.
    let expected = slots.len();
    let elements: Vec<Element> = slots.into_iter().flatten().collect();
    debug_assert_eq!(elements.len(), expected);
    elements
}
