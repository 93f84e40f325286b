//! Forest assembly for hierarchical project listings.
//!
//! Converts a flat, campaign-scoped list of records into rooted trees for
//! presentation. The input is expected in the store's default listing order
//! (grouped by parent, creation-ascending); sibling order within a node's
//! `children` preserves input order, and the pass makes no assumption about
//! parents appearing before their children in the flat list.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::DbId;

/// A record that can be placed in a parent/child forest.
pub trait TreeItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// A record plus its assembled children.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Assemble a flat list of records into a forest of root nodes.
///
/// Records whose parent is absent from the input (filtered out of the query
/// scope, or soft-deleted) are promoted to roots rather than discarded, so a
/// truncated listing never silently drops reachable records. Records caught
/// in a corrupt parent cycle are likewise promoted instead of looping.
pub fn build_forest<T: TreeItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let mut index_by_id: HashMap<DbId, usize> = HashMap::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        index_by_id.insert(item.id(), idx);
    }

    // Resolve each record to either a parent slot or the root list, keeping
    // input order within both. A record naming itself as parent is treated
    // as a root so it cannot vanish into itself.
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut root_indices: Vec<usize> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let parent_slot = item
            .parent_id()
            .and_then(|pid| index_by_id.get(&pid).copied())
            .filter(|&pidx| pidx != idx);
        match parent_slot {
            Some(pidx) => children_of[pidx].push(idx),
            None => root_indices.push(idx),
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut roots: Vec<TreeNode<T>> = root_indices
        .into_iter()
        .filter_map(|idx| assemble(idx, &mut slots, &children_of))
        .collect();

    // Anything still unconsumed is unreachable from every root (a corrupt
    // parent cycle); surface it as a root rather than dropping it.
    for idx in 0..slots.len() {
        if slots[idx].is_some() {
            if let Some(node) = assemble(idx, &mut slots, &children_of) {
                roots.push(node);
            }
        }
    }
    roots
}

/// Move the record at `idx` out of its slot and recursively attach its
/// children. Returns `None` if the slot was already consumed, which bounds
/// the recursion even on cyclic input: every call consumes one slot.
fn assemble<T>(
    idx: usize,
    slots: &mut [Option<T>],
    children_of: &[Vec<usize>],
) -> Option<TreeNode<T>> {
    let item = slots[idx].take()?;
    let children = children_of[idx]
        .iter()
        .filter_map(|&child_idx| assemble(child_idx, slots, children_of))
        .collect();
    Some(TreeNode { item, children })
}
