use crate::context::AnalysisContext;
use crate::error::Result;
use crate::types::{Relationship, RelationshipType, SymbolNode};
use semgraph_protocol::{
    Location, ReferenceContext, ReferenceSite, SymbolHandle, SymbolKind, TypeRef,
};

/// Queries the resolution service for the edges around one node.
///
/// Edges go straight into the shared relationship store, so a lookup failing halfway leaves the
/// edges found before it in place.
pub struct RelationshipCollector<'a> {
    ctx: &'a AnalysisContext,
}

impl<'a> RelationshipCollector<'a> {
    pub fn new(ctx: &'a AnalysisContext) -> Self {
        Self { ctx }
    }

    /// Collect every edge touching `node`. Returns how many new edges were stored.
    pub async fn collect(&self, node: &SymbolNode, symbol: &SymbolHandle) -> Result<usize> {
        let mut added = self.collect_structural(node, symbol);
        added += self.collect_references(node, symbol).await?;
        added += self.collect_implementations(node, symbol).await?;
        added += self.collect_derived_types(node, symbol).await?;
        Ok(added)
    }

    /// Every referencing location becomes an edge referencing node -> `node`.
    async fn collect_references(&self, node: &SymbolNode, symbol: &SymbolHandle) -> Result<usize> {
        self.ctx.check_cancelled()?;
        let sites = self.ctx.resolver.find_references(symbol).await?;

        let mut added = 0;
        for site in sites {
            let Some(source_id) = self.referencing_node(&site).await? else {
                continue;
            };
            let relationship_type = match site.context {
                ReferenceContext::Call => RelationshipType::MethodCall,
                ReferenceContext::Access => RelationshipType::PropertyAccess,
                ReferenceContext::Unknown => RelationshipType::Association,
            };
            if self.emit(&source_id, &node.id, relationship_type, Some(site.location)) {
                added += 1;
            }
        }
        Ok(added)
    }

    async fn referencing_node(&self, site: &ReferenceSite) -> Result<Option<String>> {
        let enclosing = match &site.enclosing {
            Some(symbol) => Some(symbol.clone()),
            None => {
                self.ctx.check_cancelled()?;
                self.ctx
                    .resolver
                    .resolve_symbol_at_location(&site.location)
                    .await?
            }
        };
        Ok(enclosing.and_then(|symbol| self.known_id(&symbol.identity())))
    }

    /// implementer -> `node` for interfaces and abstract members.
    async fn collect_implementations(
        &self,
        node: &SymbolNode,
        symbol: &SymbolHandle,
    ) -> Result<usize> {
        let relationship_type = if symbol.is_interface() {
            RelationshipType::Implementation
        } else if symbol.is_abstract_member() {
            RelationshipType::MethodImplementation
        } else {
            return Ok(0);
        };

        self.ctx.check_cancelled()?;
        let implementations = self.ctx.resolver.find_implementations(symbol).await?;
        Ok(self.emit_from_each(&implementations, node, relationship_type))
    }

    /// derived -> `node` for classes.
    async fn collect_derived_types(
        &self,
        node: &SymbolNode,
        symbol: &SymbolHandle,
    ) -> Result<usize> {
        if !symbol.is_class() {
            return Ok(0);
        }

        self.ctx.check_cancelled()?;
        let derived = self.ctx.resolver.find_derived_types(symbol).await?;
        Ok(self.emit_from_each(&derived, node, RelationshipType::Inheritance))
    }

    /// Edges implied by the declaration itself; no service calls.
    fn collect_structural(&self, node: &SymbolNode, symbol: &SymbolHandle) -> usize {
        let mut targets: Vec<(&TypeRef, RelationshipType)> = Vec::new();

        match symbol.kind {
            SymbolKind::Type => {
                if let Some(base) = symbol.base_types.first() {
                    targets.push((base, RelationshipType::Inheritance));
                }
                for interface in &symbol.interfaces {
                    targets.push((interface, RelationshipType::Implementation));
                }
                for member in &symbol.members {
                    if member.is_static
                        || !matches!(member.kind, SymbolKind::Field | SymbolKind::Property)
                    {
                        continue;
                    }
                    if let Some(ty) = &member.declared_type {
                        targets.push((ty, RelationshipType::Composition));
                    }
                }
            }
            SymbolKind::Method => {
                for parameter in &symbol.parameters {
                    targets.push((&parameter.parameter_type, RelationshipType::Association));
                }
                if let Some(ret) = symbol.return_type.as_ref().filter(|t| !t.is_void()) {
                    targets.push((ret, RelationshipType::Association));
                }
                if let Some(overridden) = &symbol.overridden {
                    targets.push((overridden, RelationshipType::MethodOverride));
                }
            }
            SymbolKind::Field => {
                if let Some(ty) = &symbol.declared_type {
                    let relationship_type = if symbol.is_read_only {
                        RelationshipType::Composition
                    } else {
                        RelationshipType::Aggregation
                    };
                    targets.push((ty, relationship_type));
                }
            }
            SymbolKind::Property => {
                if let Some(ty) = &symbol.declared_type {
                    targets.push((ty, RelationshipType::Association));
                }
            }
            _ => {}
        }

        targets
            .into_iter()
            .filter_map(|(ty, relationship_type)| {
                self.known_id(&ty.identity())
                    .map(|target| (target, relationship_type))
            })
            .filter(|(target, relationship_type)| {
                self.emit(&node.id, target, *relationship_type, node.location.clone())
            })
            .count()
    }

    fn emit_from_each(
        &self,
        sources: &[SymbolHandle],
        node: &SymbolNode,
        relationship_type: RelationshipType,
    ) -> usize {
        sources
            .iter()
            .filter_map(|source| self.known_id(&source.identity()))
            .filter(|source_id| {
                let location = self
                    .ctx
                    .nodes
                    .get(source_id)
                    .and_then(|source| source.location);
                self.emit(source_id, &node.id, relationship_type, location)
            })
            .count()
    }

    /// Symbols that never became nodes (framework, synthesized) are dropped here.
    fn known_id(&self, id: &str) -> Option<String> {
        self.ctx.nodes.contains(id).then(|| id.to_string())
    }

    fn emit(
        &self,
        source_id: &str,
        target_id: &str,
        relationship_type: RelationshipType,
        location: Option<Location>,
    ) -> bool {
        self.ctx.add_relationship(
            Relationship::new(source_id, target_id, relationship_type).at(location),
        )
    }
}
