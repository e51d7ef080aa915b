use crate::config::AnalysisConfig;
use crate::error::{GraphError, Result};
use crate::limits::WorkerPool;
use crate::registry::{NodeStore, SymbolRegistry};
use crate::types::{Relationship, RelationshipKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use semgraph_protocol::SymbolResolver;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// State owned by one analysis call and dropped with it.
///
/// The registry, node store and relationship store are the only shared mutable state; all three
/// are sharded concurrent maps so writers on different keys never wait on each other.
pub struct AnalysisContext {
    pub(crate) resolver: Arc<dyn SymbolResolver>,
    pub(crate) config: AnalysisConfig,
    pub(crate) registry: SymbolRegistry,
    pub(crate) nodes: NodeStore,
    relationships: DashMap<RelationshipKey, Relationship>,
    pub(crate) pool: WorkerPool,
    cancel: CancellationToken,
}

impl AnalysisContext {
    pub fn new(
        resolver: Arc<dyn SymbolResolver>,
        config: AnalysisConfig,
        cancel: CancellationToken,
    ) -> Self {
        let pool = WorkerPool::new(config.worker_concurrency);
        Self {
            resolver,
            config,
            registry: SymbolRegistry::new(),
            nodes: NodeStore::new(),
            relationships: DashMap::new(),
            pool,
            cancel,
        }
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(GraphError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Adds an edge unless one with the same (source, target, type) exists.
    pub fn add_relationship(&self, relationship: Relationship) -> bool {
        if relationship.source_id == relationship.target_id {
            return false;
        }
        match self.relationships.entry(relationship.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(relationship);
                true
            }
        }
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.relationships
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
