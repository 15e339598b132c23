//! Binary space partition of the world rectangle
//!
//! The tree lives in an arena (`Vec<PartitionNode>`) and nodes refer to each
//! other by index only. Leaves are additionally listed in a flat registry in
//! discovery order; a leaf's position in that registry is its room index.
//!
//! After partitioning, [`PartitionTree::set_up_intervals`] tags every node with
//! a pre-order `[start, end)` interval so "is X under Y" becomes an interval
//! containment test without parent pointers.
//!
//! Leaves are discovered in pre-order, so the leaves under any node form one
//! contiguous run of the registry.

use std::ops::Range;

use tracing::debug;

use crate::rng::RandomSource;

use super::rect::Rect;

/// Index of a node in the arena
pub type NodeId = usize;

/// Index of a leaf in the leaf registry (equals its room id)
pub type LeafId = usize;

/// A node of the partition tree
#[derive(Debug, Clone)]
pub struct PartitionNode {
    /// Area covered by this node
    pub rect: Rect,
    /// Both children or none
    pub children: Option<(NodeId, NodeId)>,
    /// Position in the leaf registry, leaves only
    pub room_index: Option<LeafId>,
    /// Adjacent leaves picked by the connectivity pass, leaves only
    pub connected: Vec<LeafId>,
    /// Pre-order `[start, end)` interval covering this node and its subtree
    pub interval: (usize, usize),
    /// Registry range `[first, end)` of the leaves under this node
    pub leaf_span: (LeafId, LeafId),
}

impl PartitionNode {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            children: None,
            room_index: None,
            connected: Vec::new(),
            interval: (0, 0),
            leaf_span: (0, 0),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena-backed partition tree with its flat leaf registry
#[derive(Debug, Clone)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
    leaves: Vec<NodeId>,
    root: NodeId,
    intervals_ready: bool,
}

impl PartitionTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    /// Leaf registry: node ids in discovery order
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaves.len()
    }

    /// Node backing a leaf
    pub fn leaf(&self, leaf: LeafId) -> &PartitionNode {
        &self.nodes[self.leaves[leaf]]
    }

    pub(crate) fn leaf_mut(&mut self, leaf: LeafId) -> &mut PartitionNode {
        let id = self.leaves[leaf];
        &mut self.nodes[id]
    }

    pub fn intervals_ready(&self) -> bool {
        self.intervals_ready
    }

    /// Tag every node with its pre-order `[start, end)` interval
    pub fn set_up_intervals(&mut self) {
        let mut counter = 0;
        self.assign_interval(self.root, &mut counter);
        self.intervals_ready = true;
    }

    fn assign_interval(&mut self, id: NodeId, counter: &mut usize) {
        let start = *counter;
        *counter += 1;
        if let Some((first, second)) = self.nodes[id].children {
            self.assign_interval(first, counter);
            self.assign_interval(second, counter);
        }
        self.nodes[id].interval = (start, *counter);
    }

    /// True if `node` is `ancestor` or lies in its subtree.
    /// Requires intervals to be set up.
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let (s, e) = self.nodes[ancestor].interval;
        let (ns, ne) = self.nodes[node].interval;
        s <= ns && ne <= e
    }

    /// Leaves under `id`, in registry order
    pub fn leaves_under(&self, id: NodeId) -> Range<LeafId> {
        let (first, end) = self.nodes[id].leaf_span;
        first..end
    }
}

/// Recursively partition `rect` until no piece can be split any further
pub fn partition_space<R: RandomSource>(
    rect: Rect,
    min_room_side: f64,
    rng: &mut R,
) -> PartitionTree {
    let mut tree = PartitionTree {
        nodes: Vec::new(),
        leaves: Vec::new(),
        root: 0,
        intervals_ready: false,
    };
    tree.root = partition_node(&mut tree, rect, min_room_side, rng);
    debug!(
        nodes = tree.nodes.len(),
        leaves = tree.leaves.len(),
        "space partitioned"
    );
    tree
}

fn partition_node<R: RandomSource>(
    tree: &mut PartitionTree,
    rect: Rect,
    min_room_side: f64,
    rng: &mut R,
) -> NodeId {
    let id = tree.nodes.len();
    let first_leaf = tree.leaves.len();
    tree.nodes.push(PartitionNode::new(rect));

    match split_rect(&rect, min_room_side, rng) {
        Some((first, second)) => {
            let first = partition_node(tree, first, min_room_side, rng);
            let second = partition_node(tree, second, min_room_side, rng);
            tree.nodes[id].children = Some((first, second));
        }
        None => {
            tree.nodes[id].room_index = Some(tree.leaves.len());
            tree.leaves.push(id);
        }
    }
    tree.nodes[id].leaf_span = (first_leaf, tree.leaves.len());
    id
}

/// Cut `rect` in two, trying a random orientation first and the other one
/// second. `None` means the rect is a leaf.
pub fn split_rect<R: RandomSource>(
    rect: &Rect,
    min_room_side: f64,
    rng: &mut R,
) -> Option<(Rect, Rect)> {
    if rect.width < min_room_side || rect.height < min_room_side {
        return None;
    }

    let vertical_first = rng.coin();
    for vertical in [vertical_first, !vertical_first] {
        let side = if vertical { rect.width } else { rect.height };
        // Both halves must keep at least the minimal side
        if side < 2.0 * min_room_side {
            continue;
        }

        // The second half is measured back from the parent's far edge so it
        // ends on that edge instead of one rounding step past it
        let cut = rng.range_f64(min_room_side, side - min_room_side);
        return Some(if vertical {
            let line = rect.x + cut;
            (
                Rect::new(rect.x, rect.y, cut, rect.height),
                Rect::new(line, rect.y, rect.right() - line, rect.height),
            )
        } else {
            let line = rect.y + cut;
            (
                Rect::new(rect.x, rect.y, rect.width, cut),
                Rect::new(rect.x, line, rect.width, rect.top() - line),
            )
        });
    }

    None
}
