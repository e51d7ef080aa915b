use crate::error::{GraphError, Result};
use crate::types::{RelationshipType, UnifiedGraph};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Read-only traversal view over a finished [`UnifiedGraph`].
///
/// Node weights are node ids, edge weights are relationship types. Results are returned sorted by
/// id so callers see the same order on every run.
pub struct GraphView {
    graph: DiGraph<String, RelationshipType>,
    index: HashMap<String, NodeIndex>,
}

impl GraphView {
    pub fn new(unified: &UnifiedGraph) -> Self {
        let mut graph = DiGraph::with_capacity(unified.nodes.len(), unified.relationships.len());
        let mut index = HashMap::with_capacity(unified.nodes.len());
        for id in unified.nodes.keys() {
            index.insert(id.clone(), graph.add_node(id.clone()));
        }
        for relationship in &unified.relationships {
            if let (Some(&from), Some(&to)) = (
                index.get(&relationship.source_id),
                index.get(&relationship.target_id),
            ) {
                graph.add_edge(from, to, relationship.relationship_type);
            }
        }
        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Everything `id` points at, any relationship type.
    pub fn dependencies(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Outgoing, |_| true)
    }

    /// Everything pointing at `id`, any relationship type.
    pub fn dependents(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Incoming, |_| true)
    }

    /// Find all nodes that call `id` (incoming MethodCall edges)
    pub fn callers(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Incoming, |t| t == RelationshipType::MethodCall)
    }

    /// Find all nodes that `id` calls (outgoing MethodCall edges)
    pub fn callees(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Outgoing, |t| t == RelationshipType::MethodCall)
    }

    /// Types implementing interface `id`, and members implementing abstract member `id`.
    pub fn implementors(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Incoming, |t| {
            matches!(
                t,
                RelationshipType::Implementation | RelationshipType::MethodImplementation
            )
        })
    }

    /// Nodes reachable from `id` within `max_depth` hops, ignoring edge direction.
    ///
    /// Returns `(id, distance)` pairs sorted by distance, then id.
    pub fn related_nodes(&self, id: &str, max_depth: usize) -> Result<Vec<(String, usize)>> {
        let start = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        let mut distances: HashMap<NodeIndex, usize> = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let depth = distances[&current];
            if depth == max_depth {
                continue;
            }
            for next in self.graph.neighbors_undirected(current) {
                if !distances.contains_key(&next) {
                    distances.insert(next, depth + 1);
                    queue.push_back(next);
                }
            }
        }

        let mut related: Vec<(String, usize)> = distances
            .into_iter()
            .filter(|&(node, _)| node != start)
            .map(|(node, depth)| (self.graph[node].clone(), depth))
            .collect();
        related.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(related)
    }

    fn neighbors(
        &self,
        id: &str,
        direction: Direction,
        keep: impl Fn(RelationshipType) -> bool,
    ) -> Vec<String> {
        let Some(&node) = self.index.get(id) else {
            return Vec::new();
        };
        let found: BTreeSet<&String> = self
            .graph
            .edges_directed(node, direction)
            .filter(|edge| keep(*edge.weight()))
            .map(|edge| match direction {
                Direction::Outgoing => &self.graph[edge.target()],
                Direction::Incoming => &self.graph[edge.source()],
            })
            .collect();
        found.into_iter().cloned().collect()
    }
}
