#![allow(dead_code)]

use semgraph_graph::{AnalysisConfig, GraphOrchestrator, UnifiedGraph};
use semgraph_protocol::{
    Accessibility, Location, MemberInfo, Modifier, ProjectHandle, ReferenceContext, ReferenceSite,
    SymbolHandle, SymbolKind, TypeCategory, WorkspaceHandle,
};
use semgraph_snapshot::{SnapshotResolver, WorkspaceSnapshot};
use std::sync::Arc;

pub const WORKSPACE: &str = "/ws/Shop.sln";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn workspace() -> WorkspaceHandle {
    WorkspaceHandle::new(WORKSPACE)
}

pub fn orchestrator(snapshot: WorkspaceSnapshot) -> GraphOrchestrator {
    GraphOrchestrator::new(
        Arc::new(SnapshotResolver::new(snapshot)),
        AnalysisConfig {
            worker_concurrency: 4,
            ..AnalysisConfig::default()
        },
    )
    .expect("valid config")
}

pub async fn analyze(snapshot: WorkspaceSnapshot) -> UnifiedGraph {
    init_logging();
    orchestrator(snapshot)
        .analyze_solution(&workspace())
        .await
        .expect("analysis")
}

/// Symbols of a three-project shop: core (orders domain), data (repositories), web (controllers).
pub struct Shop;

impl Shop {
    pub fn order_repository() -> SymbolHandle {
        SymbolHandle::type_in(
            "Shop.Core",
            "Shop.Core.Orders",
            "IOrderRepository",
            TypeCategory::Interface,
        )
        .with_accessibility(Accessibility::Public)
        .at(Location::new("Shop.Core/Orders/IOrderRepository.cs", 3, 10))
    }

    pub fn order() -> SymbolHandle {
        SymbolHandle::type_in("Shop.Core", "Shop.Core.Orders", "Order", TypeCategory::Class)
            .with_accessibility(Accessibility::Public)
            .at(Location::new("Shop.Core/Orders/Order.cs", 3, 30))
    }

    pub fn order_service() -> SymbolHandle {
        SymbolHandle::type_in(
            "Shop.Core",
            "Shop.Core.Orders",
            "OrderService",
            TypeCategory::Class,
        )
        .with_accessibility(Accessibility::Public)
        .with_member(
            MemberInfo::new(SymbolKind::Field, "_repository")
                .of_type(Self::order_repository().type_ref()),
        )
        .with_member(MemberInfo::new(SymbolKind::Method, "Submit").with_parameters(1))
        .at(Location::new("Shop.Core/Orders/OrderService.cs", 5, 60))
    }

    pub fn submit() -> SymbolHandle {
        SymbolHandle::member_of(&Self::order_service(), SymbolKind::Method, "Submit")
            .with_accessibility(Accessibility::Public)
            .with_parameter("order", Self::order().type_ref())
            .at(Location::new("Shop.Core/Orders/OrderService.cs", 20, 40))
    }

    pub fn repository_base() -> SymbolHandle {
        SymbolHandle::type_in("Shop.Data", "Shop.Data", "RepositoryBase", TypeCategory::Class)
            .with_modifier(Modifier::Abstract)
            .at(Location::new("Shop.Data/RepositoryBase.cs", 1, 20))
    }

    pub fn sql_repository() -> SymbolHandle {
        SymbolHandle::type_in(
            "Shop.Data",
            "Shop.Data",
            "SqlOrderRepository",
            TypeCategory::Class,
        )
        .implementing(Self::order_repository().type_ref())
        .deriving_from(Self::repository_base().type_ref())
        .at(Location::new("Shop.Data/SqlOrderRepository.cs", 1, 50))
    }

    pub fn controller() -> SymbolHandle {
        SymbolHandle::type_in(
            "Shop.Web",
            "Shop.Web.Controllers",
            "OrdersController",
            TypeCategory::Class,
        )
        .at(Location::new("Shop.Web/Controllers/OrdersController.cs", 1, 40))
    }

    pub fn post() -> SymbolHandle {
        SymbolHandle::member_of(&Self::controller(), SymbolKind::Method, "Post")
            .at(Location::new("Shop.Web/Controllers/OrdersController.cs", 10, 20))
    }

    /// Declared by the data project but owned by the framework.
    pub fn framework_object() -> SymbolHandle {
        SymbolHandle::type_in("System.Runtime", "System", "Object", TypeCategory::Class)
    }

    /// Compiler-generated backing field.
    pub fn backing_field() -> SymbolHandle {
        SymbolHandle::member_of(
            &Self::sql_repository(),
            SymbolKind::Field,
            "<Items>k__BackingField",
        )
        .implicitly_declared()
    }

    pub fn snapshot() -> WorkspaceSnapshot {
        let call_site = ReferenceSite {
            location: Location::new("Shop.Web/Controllers/OrdersController.cs", 14, 14),
            enclosing: None,
            context: ReferenceContext::Call,
        };

        WorkspaceSnapshot::new()
            .with_project(
                ProjectHandle::new("core", "Shop.Core").with_language("C#"),
                vec![
                    Self::order_repository(),
                    Self::order(),
                    Self::order_service(),
                    Self::submit(),
                ],
            )
            .with_project(
                ProjectHandle::new("data", "Shop.Data")
                    .with_language("C#")
                    .referencing("core"),
                vec![
                    Self::repository_base(),
                    Self::sql_repository(),
                    Self::framework_object(),
                    Self::backing_field(),
                ],
            )
            .with_project(
                ProjectHandle::new("web", "Shop.Web")
                    .with_language("C#")
                    .referencing("core"),
                vec![Self::controller(), Self::post()],
            )
            .with_implementation(&Self::order_repository(), &Self::sql_repository())
            .with_derived_type(&Self::repository_base(), &Self::sql_repository())
            .with_reference(&Self::submit(), call_site)
    }
}
