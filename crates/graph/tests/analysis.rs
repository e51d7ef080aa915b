mod common;

use common::{analyze, Shop};
use pretty_assertions::assert_eq;
use semgraph_graph::{
    ArchitecturalRole, GraphView, RelationshipType, UnifiedGraph, UNKNOWN_FEATURE,
};
use std::collections::BTreeSet;

fn edge_keys(graph: &UnifiedGraph) -> BTreeSet<(String, String, RelationshipType)> {
    graph.relationships.iter().map(|r| r.key()).collect()
}

#[tokio::test]
async fn builds_nodes_for_declared_source_symbols_only() {
    let graph = analyze(Shop::snapshot()).await;

    let ids: BTreeSet<String> = graph.nodes.keys().cloned().collect();
    let expected: BTreeSet<String> = [
        Shop::order_repository(),
        Shop::order(),
        Shop::order_service(),
        Shop::submit(),
        Shop::repository_base(),
        Shop::sql_repository(),
        Shop::controller(),
        Shop::post(),
    ]
    .iter()
    .map(|s| s.identity())
    .collect();
    assert_eq!(ids, expected);
    assert!(!ids.contains(&Shop::framework_object().identity()));
    assert!(!ids.contains(&Shop::backing_field().identity()));

    let service = graph
        .node(&Shop::order_service().identity())
        .expect("service node");
    assert_eq!(service.project_id, "core");
    assert_eq!(service.metrics.method_count, Some(1));
    assert_eq!(service.metrics.field_count, Some(1));
    assert_eq!(service.metrics.inheritance_depth, Some(0));

    let sql = graph.find_by_name("SqlOrderRepository").expect("sql node");
    assert_eq!(sql.base_type.as_deref(), Some("Shop.Data.RepositoryBase"));
    assert_eq!(sql.interfaces, vec!["Shop.Core.Orders.IOrderRepository".to_string()]);
}

#[tokio::test]
async fn collects_structural_hierarchy_and_reference_edges() {
    let graph = analyze(Shop::snapshot()).await;

    let id = |s: semgraph_protocol::SymbolHandle| s.identity();
    let expected: BTreeSet<_> = [
        (
            id(Shop::sql_repository()),
            id(Shop::order_repository()),
            RelationshipType::Implementation,
        ),
        (
            id(Shop::sql_repository()),
            id(Shop::repository_base()),
            RelationshipType::Inheritance,
        ),
        (
            id(Shop::order_service()),
            id(Shop::order_repository()),
            RelationshipType::Composition,
        ),
        (
            id(Shop::submit()),
            id(Shop::order()),
            RelationshipType::Association,
        ),
        (id(Shop::post()), id(Shop::submit()), RelationshipType::MethodCall),
    ]
    .into_iter()
    .collect();

    assert_eq!(edge_keys(&graph), expected);
    assert_eq!(graph.relationships.len(), 5);
}

#[tokio::test]
async fn implementation_found_twice_is_stored_once() {
    let graph = analyze(Shop::snapshot()).await;

    let implementations: Vec<_> = graph
        .relationships_of_type(RelationshipType::Implementation)
        .filter(|r| {
            r.source_id == Shop::sql_repository().identity()
                && r.target_id == Shop::order_repository().identity()
        })
        .collect();
    assert_eq!(implementations.len(), 1);
    assert!(implementations[0].is_cross_project);
    assert!(!implementations[0].is_cross_language);
}

#[tokio::test]
async fn assigns_roles_and_feature_boundaries_to_every_node() {
    let graph = analyze(Shop::snapshot()).await;

    let role = |name: &str| graph.find_by_name(name).expect(name).role;
    assert_eq!(role("IOrderRepository"), ArchitecturalRole::Interface);
    assert_eq!(role("OrderService"), ArchitecturalRole::Service);
    assert_eq!(role("Order"), ArchitecturalRole::BusinessLogic);
    assert_eq!(role("SqlOrderRepository"), ArchitecturalRole::Repository);
    assert_eq!(role("RepositoryBase"), ArchitecturalRole::DataModel);
    assert_eq!(role("OrdersController"), ArchitecturalRole::Controller);
    assert_eq!(role("Post"), ArchitecturalRole::Unknown);

    assert!(graph.nodes.values().all(|n| n.feature_boundary.is_some()));
    let boundary = |name: &str| {
        graph
            .find_by_name(name)
            .and_then(|n| n.feature_boundary.clone())
            .expect(name)
    };
    assert_eq!(boundary("OrderService"), "Orders");
    assert_eq!(boundary("SqlOrderRepository"), "Shop.Data");
    assert_eq!(boundary("Post"), "Controllers");
    assert_ne!(boundary("Post"), UNKNOWN_FEATURE);
    assert_eq!(graph.metadata.feature_boundary_count, 3);
}

#[tokio::test]
async fn aggregates_cross_project_dependencies() {
    let graph = analyze(Shop::snapshot()).await;

    let pairs: Vec<_> = graph
        .cross_project_dependencies
        .iter()
        .map(|d| (d.source_project_id.as_str(), d.target_project_id.as_str()))
        .collect();
    assert_eq!(pairs, vec![("data", "core"), ("web", "core")]);

    let data = graph.dependency("data", "core").expect("data -> core");
    assert_eq!(data.reference_count, 1);
    assert_eq!(data.dependency_type, RelationshipType::Implementation);
    assert!((data.coupling_strength - 0.9).abs() < 1e-9);

    let web = graph.dependency("web", "core").expect("web -> core");
    assert_eq!(web.dependency_type, RelationshipType::MethodCall);
    assert_eq!(
        web.shared_symbol_ids,
        BTreeSet::from([Shop::submit().identity()])
    );
}

#[tokio::test]
async fn summarises_projects_and_run() {
    let graph = analyze(Shop::snapshot()).await;

    let core = &graph.project_info["core"];
    assert_eq!(core.metrics.total_symbols, 4);
    assert_eq!(core.metrics.total_relationships, 2);
    assert_eq!(core.metrics.cross_project_reference_count, 0);
    assert!(core.languages.contains("C#"));
    assert_eq!(core.role_distribution["Interface"], 1);

    let web = &graph.project_info["web"];
    assert_eq!(web.project_references, vec!["core".to_string()]);
    assert_eq!(web.metrics.cross_project_reference_count, 1);

    let metadata = &graph.metadata;
    assert_eq!(metadata.project_count, 3);
    assert_eq!(metadata.node_count, 8);
    assert_eq!(metadata.relationship_count, 5);
    assert_eq!(metadata.nodes_by_kind["Type"], 6);
    assert_eq!(metadata.nodes_by_kind["Method"], 2);
    assert_eq!(metadata.relationships_by_type["MethodCall"], 1);
    assert_eq!(metadata.cross_project_relationship_count, 2);
    assert_eq!(metadata.cross_language_relationship_count, 0);
    assert!(metadata.errors.is_empty());
}

#[tokio::test]
async fn repeated_runs_produce_identical_graphs() {
    let mut first = analyze(Shop::snapshot()).await;
    let mut second = analyze(Shop::snapshot()).await;
    first.metadata.duration_ms = 0;
    second.metadata.duration_ms = 0;

    assert_eq!(
        first.nodes.keys().collect::<Vec<_>>(),
        second.nodes.keys().collect::<Vec<_>>()
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn graph_survives_json_round_trip() {
    let graph = analyze(Shop::snapshot()).await;

    let raw = graph.to_json_pretty().expect("serialize");
    assert!(raw.contains("\"crossProjectDependencies\""));
    assert!(raw.contains("\"type\": \"Implementation\""));

    let restored = UnifiedGraph::from_json(&raw).expect("parse");
    assert_eq!(restored, graph);
}

#[tokio::test]
async fn view_answers_traversal_queries() {
    let graph = analyze(Shop::snapshot()).await;
    let view = GraphView::new(&graph);

    assert_eq!(view.callers(&Shop::submit().identity()), vec![Shop::post().identity()]);
    assert_eq!(
        view.implementors(&Shop::order_repository().identity()),
        vec![Shop::sql_repository().identity()]
    );

    let related = view
        .related_nodes(&Shop::post().identity(), 2)
        .expect("known node");
    let related: Vec<_> = related.into_iter().map(|(id, _)| id).collect();
    assert_eq!(
        related,
        vec![Shop::submit().identity(), Shop::order().identity()]
    );
}

#[tokio::test]
async fn three_cross_project_edges_collapse_into_one_dependency() {
    use semgraph_protocol::{ProjectHandle, SymbolHandle, SymbolKind, TypeCategory};
    use semgraph_snapshot::WorkspaceSnapshot;

    let target = |name: &str| SymbolHandle::type_in("B", "B", name, TypeCategory::Class);
    let (b1, b2, b3) = (target("Base"), target("Input"), target("Output"));
    let alpha = SymbolHandle::type_in("A", "A", "Alpha", TypeCategory::Class)
        .deriving_from(b1.type_ref());
    let run = SymbolHandle::member_of(&alpha, SymbolKind::Method, "Run")
        .with_parameter("input", b2.type_ref())
        .returning(b3.type_ref());

    let graph = analyze(
        WorkspaceSnapshot::new()
            .with_project(ProjectHandle::new("A", "A"), vec![alpha, run])
            .with_project(ProjectHandle::new("B", "B"), vec![b1, b2, b3]),
    )
    .await;

    assert_eq!(graph.cross_project_dependencies.len(), 1);
    let dependency = graph.dependency("A", "B").expect("A -> B");
    assert_eq!(dependency.reference_count, 3);
    assert_eq!(dependency.dependency_type, RelationshipType::Association);
    assert!((dependency.coupling_strength - 1.6 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn member_level_edges_cover_overrides_properties_and_access() {
    use semgraph_protocol::{
        Location, Modifier, ProjectHandle, ReferenceContext, ReferenceSite, SymbolHandle,
        SymbolKind, TypeCategory,
    };
    use semgraph_snapshot::WorkspaceSnapshot;

    let ty = |name: &str, lines: (u32, u32)| {
        SymbolHandle::type_in("Geo", "Geo.Shapes", name, TypeCategory::Class)
            .at(Location::new(format!("Geo/Shapes/{name}.cs"), lines.0, lines.1))
    };
    let shape = ty("Shape", (1, 20)).with_modifier(Modifier::Abstract);
    let area = SymbolHandle::member_of(&shape, SymbolKind::Method, "Area")
        .with_modifier(Modifier::Abstract)
        .at(Location::new("Geo/Shapes/Shape.cs", 5, 5));
    let circle = ty("Circle", (1, 30)).deriving_from(shape.type_ref());
    let circle_area = SymbolHandle::member_of(&circle, SymbolKind::Method, "Area")
        .overriding(area.type_ref())
        .at(Location::new("Geo/Shapes/Circle.cs", 5, 10));
    let radius = ty("Radius", (1, 10));
    let size = SymbolHandle::member_of(&circle, SymbolKind::Property, "Size")
        .of_type(radius.type_ref())
        .at(Location::new("Geo/Shapes/Circle.cs", 12, 12));
    let canvas = ty("Canvas", (1, 30));
    let draw = SymbolHandle::member_of(&canvas, SymbolKind::Method, "Draw")
        .at(Location::new("Geo/Shapes/Canvas.cs", 5, 20));

    // The site's location lies inside Radius; the supplied enclosing symbol takes precedence.
    let access = ReferenceSite {
        location: Location::new("Geo/Shapes/Radius.cs", 4, 4),
        enclosing: Some(draw.clone()),
        context: ReferenceContext::Access,
    };
    let snapshot = WorkspaceSnapshot::new()
        .with_project(
            ProjectHandle::new("geo", "Geo").with_language("C#"),
            vec![
                shape.clone(),
                area.clone(),
                circle.clone(),
                circle_area.clone(),
                radius.clone(),
                size.clone(),
                canvas,
                draw.clone(),
            ],
        )
        .with_implementation(&area, &circle_area)
        .with_reference(&size, access);

    let graph = analyze(snapshot).await;

    let expected: BTreeSet<_> = [
        (&circle, &shape, RelationshipType::Inheritance),
        (&circle_area, &area, RelationshipType::MethodOverride),
        (&circle_area, &area, RelationshipType::MethodImplementation),
        (&size, &radius, RelationshipType::Association),
        (&draw, &size, RelationshipType::PropertyAccess),
    ]
    .into_iter()
    .map(|(source, target, kind)| (source.identity(), target.identity(), kind))
    .collect();
    assert_eq!(edge_keys(&graph), expected);
    assert!(graph.metadata.errors.is_empty());
}
