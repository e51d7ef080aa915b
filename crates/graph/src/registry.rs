use crate::types::SymbolNode;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use semgraph_protocol::SymbolHandle;
use std::sync::Arc;

/// Assigns stable ids to resolved symbols and remembers the first handle seen for each id.
///
/// The id is a pure function of the containing assembly and the fully qualified display form,
/// so it does not depend on which worker discovers the symbol first.
#[derive(Default)]
pub struct SymbolRegistry {
    symbols: DashMap<String, Arc<SymbolHandle>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_assign_id(&self, symbol: &SymbolHandle) -> String {
        let id = symbol.identity();
        // Entry lock is held only for this shard; the handle clone happens once per id.
        self.symbols
            .entry(id.clone())
            .or_insert_with(|| Arc::new(symbol.clone()));
        id
    }

    pub fn handle(&self, id: &str) -> Option<Arc<SymbolHandle>> {
        self.symbols.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Concurrent node map keyed by id. Nodes are inserted once and then only updated in place.
#[derive(Default)]
pub struct NodeStore {
    nodes: DashMap<String, SymbolNode>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` unless its id is already present. Returns whether this call inserted it.
    pub fn register(&self, node: SymbolNode) -> bool {
        match self.nodes.entry(node.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<SymbolNode> {
        self.nodes.get(id).map(|entry| entry.value().clone())
    }

    /// Applies `update` to the node in place. Returns false if the id is unknown.
    pub fn update<F>(&self, id: &str, update: F) -> bool
    where
        F: FnOnce(&mut SymbolNode),
    {
        match self.nodes.get_mut(id) {
            Some(mut entry) => {
                update(entry.value_mut());
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.nodes.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn snapshot(&self) -> Vec<SymbolNode> {
        self.nodes.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
