//! Room connectivity over the partition tree
//!
//! Every internal node of the tree adds exactly one bridge edge between a
//! leaf under its first child and a leaf under its second child. A tree with
//! `n` leaves has `n - 1` internal nodes, so this yields `n - 1` edges that
//! span all rooms.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::GeometryError;

use super::partition::{LeafId, NodeId, PartitionTree};

/// Undirected hallway graph over rooms
///
/// Reachability is answered by a breadth-first walk from one room.
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    neighbours: Vec<Vec<usize>>,
}

impl RoomGraph {
    /// Graph with `room_count` rooms and no hallways
    pub fn new(room_count: usize) -> Self {
        Self {
            neighbours: vec![Vec::new(); room_count],
        }
    }

    pub fn from_edges(room_count: usize, edges: &[(LeafId, LeafId)]) -> Self {
        let mut graph = Self::new(room_count);
        for &(a, b) in edges {
            graph.link(a, b);
        }
        graph
    }

    pub fn room_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Add an undirected edge. Out-of-range rooms are ignored.
    pub fn link(&mut self, a: usize, b: usize) {
        if a >= self.room_count() || b >= self.room_count() {
            return;
        }
        self.neighbours[a].push(b);
        if a != b {
            self.neighbours[b].push(a);
        }
    }

    /// Rooms reachable from `start`, itself included, in visiting order
    pub fn walk(&self, start: usize) -> Vec<usize> {
        if start >= self.room_count() {
            return Vec::new();
        }
        let mut seen = vec![false; self.room_count()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(room) = queue.pop_front() {
            order.push(room);
            for &nb in &self.neighbours[room] {
                if !seen[nb] {
                    seen[nb] = true;
                    queue.push_back(nb);
                }
            }
        }
        order
    }

    /// Number of rooms reachable from `room`, itself included
    pub fn reachable_from(&self, room: usize) -> usize {
        self.walk(room).len()
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        b < self.room_count() && self.walk(a).contains(&b)
    }

    /// Every room reachable from room 0. An empty graph counts as connected.
    pub fn all_connected(&self) -> bool {
        self.room_count() == 0 || self.reachable_from(0) == self.room_count()
    }
}

/// Add one bridge edge per internal node, bottom-up
///
/// Sets up the node intervals first if the caller has not. Returns the number
/// of edges added.
pub fn connect_partition(
    tree: &mut PartitionTree,
    min_overlap: f64,
) -> Result<usize, GeometryError> {
    if !tree.intervals_ready() {
        tree.set_up_intervals();
    }
    let root = tree.root();
    let edges = connect_subtree(tree, root, min_overlap)?;
    debug!(edges, "partition connected");
    Ok(edges)
}

fn connect_subtree(
    tree: &mut PartitionTree,
    id: NodeId,
    min_overlap: f64,
) -> Result<usize, GeometryError> {
    let Some((first, second)) = tree.node(id).children else {
        return Ok(0);
    };

    let mut edges = connect_subtree(tree, first, min_overlap)?;
    edges += connect_subtree(tree, second, min_overlap)?;
    connect_rooms(tree, first, second, min_overlap)?;
    Ok(edges + 1)
}

/// Link the first pair of edge-sharing leaves across two sibling subtrees
pub fn connect_rooms(
    tree: &mut PartitionTree,
    first: NodeId,
    second: NodeId,
    min_overlap: f64,
) -> Result<(LeafId, LeafId), GeometryError> {
    let second_leaves = tree.leaves_under(second);
    let bridge = tree.leaves_under(first).find_map(|child| {
        let rect = tree.leaf(child).rect;
        second_leaves
            .clone()
            .find(|&nb| rect.share_edge(&tree.leaf(nb).rect, min_overlap).is_some())
            .map(|nb| (child, nb))
    });

    let (child, nb) = bridge.ok_or(GeometryError::NoBridgeEdge { first, second })?;
    tree.leaf_mut(child).connected.push(nb);
    tree.leaf_mut(nb).connected.push(child);
    Ok((child, nb))
}

/// Every adjacency edge once, oriented from the earlier-registered leaf,
/// in registry order
pub fn adjacency_edges(tree: &PartitionTree) -> Vec<(LeafId, LeafId)> {
    let mut edges = Vec::with_capacity(tree.leaf_count().saturating_sub(1));
    for leaf in 0..tree.leaf_count() {
        for &nb in &tree.leaf(leaf).connected {
            if nb > leaf {
                edges.push((leaf, nb));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::partition::partition_space;
    use crate::level::rect::Rect;
    use crate::rng::GameRng;

    fn connected_tree(seed: u64, min_side: f64) -> PartitionTree {
        let mut rng = GameRng::new(seed);
        let mut tree = partition_space(Rect::new(0.0, 0.0, 100.0, 100.0), min_side, &mut rng);
        tree.set_up_intervals();
        connect_partition(&mut tree, 3.0).unwrap();
        tree
    }

    #[test]
    fn test_room_graph_walk() {
        let mut graph = RoomGraph::new(5);
        assert!(!graph.are_connected(0, 1));
        assert_eq!(graph.reachable_from(3), 1);

        graph.link(0, 1);
        graph.link(1, 2);
        assert!(graph.are_connected(0, 2));
        assert!(graph.are_connected(2, 0));
        assert_eq!(graph.walk(0), vec![0, 1, 2]);
        assert!(!graph.all_connected());

        graph.link(2, 3);
        graph.link(3, 4);
        assert!(graph.all_connected());
        assert_eq!(graph.reachable_from(4), 5);
    }

    #[test]
    fn test_room_graph_out_of_range() {
        let graph = RoomGraph::from_edges(2, &[(0, 7)]);
        assert!(graph.walk(9).is_empty());
        assert!(!graph.are_connected(0, 7));
        assert!(!graph.all_connected());
        assert!(RoomGraph::new(0).all_connected());
    }

    #[test]
    fn test_edge_count_is_leaves_minus_one() {
        for seed in 0..10 {
            let tree = connected_tree(seed, 5.0);
            let edges = adjacency_edges(&tree);
            assert_eq!(edges.len(), tree.leaf_count() - 1, "seed {}", seed);
        }
    }

    #[test]
    fn test_all_rooms_reachable() {
        let tree = connected_tree(42, 5.0);
        let edges = adjacency_edges(&tree);
        let graph = RoomGraph::from_edges(tree.leaf_count(), &edges);
        assert!(graph.all_connected());
    }

    #[test]
    fn test_edges_share_boundaries() {
        let tree = connected_tree(7, 6.0);
        for (a, b) in adjacency_edges(&tree) {
            assert!(a < b);
            let ra = tree.leaf(a).rect;
            let rb = tree.leaf(b).rect;
            assert!(ra.share_edge(&rb, 3.0).is_some(), "{} / {}", ra, rb);
        }
    }

    #[test]
    fn test_single_leaf_has_no_edges() {
        let mut rng = GameRng::new(0);
        let mut tree = partition_space(Rect::new(0.0, 0.0, 8.0, 8.0), 5.0, &mut rng);
        assert_eq!(connect_partition(&mut tree, 3.0), Ok(0));
        assert!(adjacency_edges(&tree).is_empty());
    }

    #[test]
    fn test_missing_bridge_is_error() {
        let mut rng = GameRng::new(0);
        let mut tree = partition_space(Rect::new(0.0, 0.0, 14.0, 8.0), 5.0, &mut rng);
        assert_eq!(tree.leaf_count(), 2);
        // Shared boundary is 8 long, ask for more than that
        let result = connect_partition(&mut tree, 9.0);
        assert!(matches!(result, Err(GeometryError::NoBridgeEdge { .. })));
    }
}
