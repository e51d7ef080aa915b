use crate::config::AnalysisConfig;
use crate::registry::{NodeStore, SymbolRegistry};
use crate::roles::ArchitecturalRole;
use crate::types::{NodeMetrics, SymbolNode};
use semgraph_protocol::{ProjectHandle, SymbolHandle, SymbolKind};

/// What happened to one discovered symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Synthesized, namespace or framework symbol
    Skipped,

    /// This call created the node
    Registered(String),

    /// Another discovery already created the node; nothing changed
    Duplicate(String),
}

/// Converts resolved symbols into graph nodes
pub struct NodeBuilder<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Why `symbol` stays out of the graph, if it does.
    pub fn skip_reason(&self, symbol: &SymbolHandle) -> Option<&'static str> {
        if symbol.is_implicitly_declared {
            return Some("compiler-synthesized");
        }
        if symbol.kind == SymbolKind::Namespace {
            return Some("namespace");
        }
        if symbol
            .containing_assembly
            .as_deref()
            .is_some_and(|assembly| self.config.is_excluded_assembly(assembly))
        {
            return Some("framework assembly");
        }
        None
    }

    /// Build a node without registering it.
    pub fn build(&self, symbol: &SymbolHandle, project: &ProjectHandle) -> Option<SymbolNode> {
        if let Some(reason) = self.skip_reason(symbol) {
            log::trace!("Skipping {} ({reason})", symbol.display_name);
            return None;
        }
        Some(self.node_for(symbol.identity(), symbol, project))
    }

    /// Build a node and register it; the first registration of an id wins.
    pub fn build_into(
        &self,
        registry: &SymbolRegistry,
        store: &NodeStore,
        symbol: &SymbolHandle,
        project: &ProjectHandle,
    ) -> BuildOutcome {
        if self.skip_reason(symbol).is_some() {
            return BuildOutcome::Skipped;
        }

        let id = registry.get_or_assign_id(symbol);
        if store.contains(&id) {
            return BuildOutcome::Duplicate(id);
        }

        let node = self.node_for(id.clone(), symbol, project);
        if store.register(node) {
            BuildOutcome::Registered(id)
        } else {
            BuildOutcome::Duplicate(id)
        }
    }

    fn node_for(&self, id: String, symbol: &SymbolHandle, project: &ProjectHandle) -> SymbolNode {
        let declared_type_category = if symbol.kind == SymbolKind::Type {
            symbol.type_category
        } else {
            None
        };

        SymbolNode {
            id,
            name: symbol.name.clone(),
            fully_qualified_name: symbol.display_name.clone(),
            kind: symbol.kind,
            declared_type_category,
            location: symbol.location.clone(),
            accessibility: symbol.accessibility,
            modifiers: symbol.modifiers.clone(),
            project_id: project.id.clone(),
            assembly_name: symbol
                .containing_assembly
                .clone()
                .unwrap_or_else(|| project.assembly_name.clone()),
            containing_namespace: symbol.containing_namespace.clone(),
            interfaces: symbol
                .interfaces
                .iter()
                .map(|i| i.display_name.clone())
                .collect(),
            base_type: symbol.base_types.first().map(|b| b.display_name.clone()),
            generic_parameters: symbol.generic_parameters.clone(),
            role: ArchitecturalRole::Unknown,
            feature_boundary: None,
            metrics: metrics_for(symbol),
        }
    }
}

fn metrics_for(symbol: &SymbolHandle) -> NodeMetrics {
    match symbol.kind {
        SymbolKind::Type => {
            let count = |kind: SymbolKind| symbol.members.iter().filter(|m| m.kind == kind).count();
            NodeMetrics {
                method_count: Some(count(SymbolKind::Method)),
                property_count: Some(count(SymbolKind::Property)),
                field_count: Some(count(SymbolKind::Field)),
                parameter_count: None,
                inheritance_depth: Some(symbol.base_types.len()),
            }
        }
        SymbolKind::Method => NodeMetrics {
            parameter_count: Some(symbol.parameters.len()),
            ..NodeMetrics::default()
        },
        _ => NodeMetrics::default(),
    }
}
