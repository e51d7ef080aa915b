use crate::error::Result;
use crate::snapshot::WorkspaceSnapshot;
use async_trait::async_trait;
use semgraph_protocol::{
    self as protocol, Location, ProjectHandle, ReferenceSite, ResolverError, SymbolHandle,
    SymbolResolver, WorkspaceHandle,
};
use std::collections::HashMap;
use std::path::Path;

/// Resolver answering every question from a [`WorkspaceSnapshot`].
pub struct SnapshotResolver {
    snapshot: WorkspaceSnapshot,
    /// identity -> declared symbol
    symbols: HashMap<String, SymbolHandle>,
}

impl SnapshotResolver {
    pub fn new(snapshot: WorkspaceSnapshot) -> Self {
        let symbols = snapshot
            .projects
            .iter()
            .flat_map(|p| &p.symbols)
            .map(|s| (s.identity(), s.clone()))
            .collect();
        Self { snapshot, symbols }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(WorkspaceSnapshot::load(path).await?))
    }

    pub fn snapshot(&self) -> &WorkspaceSnapshot {
        &self.snapshot
    }

    fn check_lookup(&self, symbol: &SymbolHandle) -> protocol::Result<String> {
        let identity = symbol.identity();
        if self.snapshot.faults.fail_lookups.contains(&identity) {
            return Err(ResolverError::LookupFailed {
                symbol: identity,
                reason: "lookup fault injected".to_string(),
            });
        }
        Ok(identity)
    }

    fn resolve_all(&self, identities: Option<&Vec<String>>) -> Vec<SymbolHandle> {
        identities
            .into_iter()
            .flatten()
            .filter_map(|id| {
                let found = self.symbols.get(id).cloned();
                if found.is_none() {
                    log::debug!("Snapshot names undeclared symbol {id}");
                }
                found
            })
            .collect()
    }
}

#[async_trait]
impl SymbolResolver for SnapshotResolver {
    async fn enumerate_projects(
        &self,
        workspace: &WorkspaceHandle,
    ) -> protocol::Result<Vec<ProjectHandle>> {
        if self.snapshot.faults.fail_workspace {
            return Err(ResolverError::WorkspaceUnavailable(workspace.path.clone()));
        }
        Ok(self
            .snapshot
            .projects
            .iter()
            .map(|p| p.project.clone())
            .collect())
    }

    async fn enumerate_declared_symbols(
        &self,
        project: &ProjectHandle,
    ) -> protocol::Result<Vec<SymbolHandle>> {
        if self.snapshot.faults.fail_projects.contains(&project.id) {
            return Err(ResolverError::ProjectFailed {
                project: project.id.clone(),
                reason: "compilation fault injected".to_string(),
            });
        }
        self.snapshot
            .projects
            .iter()
            .find(|p| p.project.id == project.id)
            .map(|p| p.symbols.clone())
            .ok_or_else(|| ResolverError::ProjectFailed {
                project: project.id.clone(),
                reason: "not in snapshot".to_string(),
            })
    }

    async fn find_references(&self, symbol: &SymbolHandle) -> protocol::Result<Vec<ReferenceSite>> {
        let identity = self.check_lookup(symbol)?;
        Ok(self
            .snapshot
            .references
            .get(&identity)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_implementations(
        &self,
        symbol: &SymbolHandle,
    ) -> protocol::Result<Vec<SymbolHandle>> {
        let identity = self.check_lookup(symbol)?;
        Ok(self.resolve_all(self.snapshot.implementations.get(&identity)))
    }

    async fn find_derived_types(
        &self,
        symbol: &SymbolHandle,
    ) -> protocol::Result<Vec<SymbolHandle>> {
        let identity = self.check_lookup(symbol)?;
        Ok(self.resolve_all(self.snapshot.derived_types.get(&identity)))
    }

    async fn resolve_symbol_at_location(
        &self,
        location: &Location,
    ) -> protocol::Result<Option<SymbolHandle>> {
        // Innermost span wins; on identical spans members beat their containing type.
        Ok(self
            .symbols
            .values()
            .filter_map(|symbol| {
                let span = symbol.location.as_ref()?;
                span.contains(location).then_some((span, symbol))
            })
            .max_by(|(a_span, a), (b_span, b)| {
                (a_span.start_line, a_span.start_column)
                    .cmp(&(b_span.start_line, b_span.start_column))
                    .then_with(|| {
                        (b_span.end_line, b_span.end_column)
                            .cmp(&(a_span.end_line, a_span.end_column))
                    })
                    .then_with(|| a.kind.cmp(&b.kind))
                    .then_with(|| b.display_name.cmp(&a.display_name))
            })
            .map(|(_, symbol)| symbol.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use semgraph_protocol::{ReferenceContext, SymbolKind, TypeCategory};

    fn service() -> SymbolHandle {
        SymbolHandle::type_in("Shop", "Shop.Orders", "OrderService", TypeCategory::Class)
            .at(Location::new("Shop/Orders/OrderService.cs", 5, 40))
    }

    fn submit() -> SymbolHandle {
        SymbolHandle::member_of(&service(), SymbolKind::Method, "Submit")
            .at(Location::new("Shop/Orders/OrderService.cs", 10, 20))
    }

    fn validator() -> SymbolHandle {
        SymbolHandle::type_in("Shop", "Shop.Orders", "Validator", TypeCategory::Class)
    }

    fn resolver() -> SnapshotResolver {
        let site = ReferenceSite {
            location: Location::new("Shop/Orders/OrderService.cs", 12, 12),
            enclosing: None,
            context: ReferenceContext::Call,
        };
        SnapshotResolver::new(
            WorkspaceSnapshot::new()
                .with_project(
                    ProjectHandle::new("shop", "Shop"),
                    vec![service(), submit(), validator()],
                )
                .with_reference(&validator(), site)
                .with_derived_type(&validator(), &service())
                .failing_lookup(&submit())
                .failing_project("ghost"),
        )
    }

    #[tokio::test]
    async fn answers_from_snapshot() {
        let resolver = resolver();
        let projects = resolver
            .enumerate_projects(&WorkspaceHandle::new("Shop.sln"))
            .await
            .unwrap();
        assert_eq!(projects.len(), 1);

        let symbols = resolver.enumerate_declared_symbols(&projects[0]).await.unwrap();
        assert_eq!(symbols.len(), 3);

        let references = resolver.find_references(&validator()).await.unwrap();
        assert_eq!(references.len(), 1);
        assert!(resolver.find_references(&service()).await.unwrap().is_empty());

        let derived = resolver.find_derived_types(&validator()).await.unwrap();
        assert_eq!(derived, vec![service()]);
    }

    #[tokio::test]
    async fn location_resolves_to_innermost_symbol() {
        let resolver = resolver();
        let inner = resolver
            .resolve_symbol_at_location(&Location::new("Shop/Orders/OrderService.cs", 12, 12))
            .await
            .unwrap();
        assert_eq!(inner.map(|s| s.identity()), Some(submit().identity()));

        let outer = resolver
            .resolve_symbol_at_location(&Location::new("Shop/Orders/OrderService.cs", 30, 30))
            .await
            .unwrap();
        assert_eq!(outer.map(|s| s.identity()), Some(service().identity()));

        let nowhere = resolver
            .resolve_symbol_at_location(&Location::new("Other.cs", 1, 1))
            .await
            .unwrap();
        assert!(nowhere.is_none());
    }

    #[tokio::test]
    async fn injected_faults_surface_as_resolver_errors() {
        let resolver = resolver();
        assert!(matches!(
            resolver.find_references(&submit()).await,
            Err(ResolverError::LookupFailed { .. })
        ));
        assert!(matches!(
            resolver
                .enumerate_declared_symbols(&ProjectHandle::new("ghost", "Ghost"))
                .await,
            Err(ResolverError::ProjectFailed { .. })
        ));

        let broken = SnapshotResolver::new(WorkspaceSnapshot::new().failing_workspace());
        assert!(matches!(
            broken.enumerate_projects(&WorkspaceHandle::new("x.sln")).await,
            Err(ResolverError::WorkspaceUnavailable(_))
        ));
    }
}
