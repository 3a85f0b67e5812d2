//! Arena-backed directed graph.
//!
//! [`DirectedGraph`] owns its node payloads in a contiguous vector and keeps
//! per-node adjacency lists in both directions. Edges are a set: adding an edge
//! that already exists between the same two nodes is a no-op, so predecessor and
//! successor lists never contain duplicates and always mirror each other.

use crate::{utils::graph::node::NodeId, Error, Result};

/// Internal storage for edge data and endpoints.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    /// Source node of the edge
    source: NodeId,
    /// Target node of the edge
    target: NodeId,
    /// User-provided edge data
    data: E,
}

/// A directed graph with typed node and edge data.
///
/// Node payloads are mutable in place, which the SSA passes rely on: blocks are
/// created and linked during CFG construction and later rewritten without ever
/// changing the graph shape.
///
/// # Ordering
///
/// Adjacency lists preserve insertion order. Iterating [`predecessors`](Self::predecessors)
/// or [`successors`](Self::successors) is therefore deterministic for identical
/// construction sequences.
///
/// # Thread Safety
///
/// `DirectedGraph<N, E>` is [`Send`] and [`Sync`] when both `N` and `E` are.
/// [`nodes_mut`](Self::nodes_mut) hands out the node slice so disjoint nodes can
/// be processed in parallel.
///
/// # Examples
///
/// ```rust,ignore
/// use ssaform::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
///
/// assert!(graph.add_edge(a, b, ())?);
/// assert!(!graph.add_edge(a, b, ())?); // already present
/// assert_eq!(graph.predecessors(b).collect::<Vec<_>>(), vec![a]);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    /// Node data storage
    nodes: Vec<N>,
    /// Edge data storage
    edges: Vec<EdgeData<E>>,
    /// Outgoing edge indices per node
    outgoing: Vec<Vec<usize>>,
    /// Incoming edge indices per node
    incoming: Vec<Vec<usize>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `node_capacity` - Expected number of nodes
    /// * `edge_capacity` - Expected number of edges
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a node and returns its sequential `NodeId`.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns the data of `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns mutable data of `node`, if it exists.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(node.index())
    }

    /// Returns all node payloads as a mutable slice indexed by `NodeId`.
    pub fn nodes_mut(&mut self) -> &mut [N] {
        &mut self.nodes
    }

    /// Returns an iterator over `(NodeId, &N)` pairs in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, data)| (NodeId::new(index), data))
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a directed edge from `source` to `target`.
    ///
    /// Registers `source` as a predecessor of `target` and `target` as a successor
    /// of `source` in one step. If an edge between the two nodes already exists the
    /// graph is left unchanged and the existing edge data is kept.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if a new edge was added
    /// * `Ok(false)` if the edge already existed
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<bool> {
        if source.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "Edge source {source} does not exist (node count: {})",
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "Edge target {target} does not exist (node count: {})",
                self.nodes.len()
            )));
        }

        if self.successors(source).any(|succ| succ == target) {
            return Ok(false);
        }

        let edge = self.edges.len();
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });
        self.outgoing[source.index()].push(edge);
        self.incoming[target.index()].push(edge);
        Ok(true)
    }

    /// Returns the successors of `node` in edge insertion order.
    ///
    /// Yields nothing for an unknown node.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&edge| self.edges[edge].target)
    }

    /// Returns the predecessors of `node` in edge insertion order.
    ///
    /// Yields nothing for an unknown node.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&edge| self.edges[edge].source)
    }

    /// Returns `(target, &edge data)` for every outgoing edge of `node`.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &E)> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&edge| (self.edges[edge].target, &self.edges[edge].data))
    }
}
