use crate::types::{ProjectInfo, ProjectMetrics, Relationship, SymbolNode};
use semgraph_protocol::{ProjectHandle, SymbolKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Summary of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    /// Wall-clock time of the analysis in milliseconds
    pub duration_ms: u64,

    pub project_count: usize,

    pub node_count: usize,

    pub relationship_count: usize,

    pub nodes_by_kind: BTreeMap<String, usize>,

    pub relationships_by_type: BTreeMap<String, usize>,

    pub nodes_by_role: BTreeMap<String, usize>,

    pub feature_boundary_count: usize,

    pub cross_project_relationship_count: usize,

    pub cross_language_relationship_count: usize,

    /// Absorbed per-project and per-node failures
    #[serde(default)]
    pub errors: Vec<String>,
}

impl GraphMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: &SymbolNode) {
        self.node_count += 1;
        *self
            .nodes_by_kind
            .entry(kind_name(node.kind).to_string())
            .or_insert(0) += 1;
        *self
            .nodes_by_role
            .entry(node.role.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn add_relationship(&mut self, relationship: &Relationship) {
        self.relationship_count += 1;
        *self
            .relationships_by_type
            .entry(relationship.relationship_type.as_str().to_string())
            .or_insert(0) += 1;
        if relationship.is_cross_project {
            self.cross_project_relationship_count += 1;
        }
        if relationship.is_cross_language {
            self.cross_language_relationship_count += 1;
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

pub fn kind_name(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Namespace => "Namespace",
        SymbolKind::Type => "Type",
        SymbolKind::Method => "Method",
        SymbolKind::Property => "Property",
        SymbolKind::Field => "Field",
        SymbolKind::Event => "Event",
        SymbolKind::Parameter => "Parameter",
        SymbolKind::Local => "Local",
    }
}

/// Language name for a file extension.
pub fn language_for_extension(extension: &str) -> String {
    match extension {
        "cs" => "C#",
        "vb" => "Visual Basic",
        "fs" => "F#",
        "ts" | "tsx" => "TypeScript",
        "js" | "jsx" => "JavaScript",
        "xaml" | "axaml" => "XAML",
        "razor" | "cshtml" => "Razor",
        other => other,
    }
    .to_string()
}

/// Per-project summary over the final node and relationship sets.
pub fn project_info(
    project: &ProjectHandle,
    nodes: &BTreeMap<String, SymbolNode>,
    relationships: &[Relationship],
) -> ProjectInfo {
    let members: Vec<&SymbolNode> = nodes
        .values()
        .filter(|n| n.project_id == project.id)
        .collect();

    let mut languages: BTreeSet<String> = project.language.iter().cloned().collect();
    let mut language_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut role_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut feature_boundaries = BTreeSet::new();
    let mut complexity_total = 0usize;
    let mut measured = 0usize;

    for node in &members {
        if let Some(extension) = node.location.as_ref().and_then(|l| l.extension()) {
            let language = language_for_extension(&extension);
            *language_distribution.entry(language.clone()).or_insert(0) += 1;
            languages.insert(language);
        }
        *role_distribution
            .entry(node.role.as_str().to_string())
            .or_insert(0) += 1;
        if let Some(boundary) = &node.feature_boundary {
            feature_boundaries.insert(boundary.clone());
        }
        if !node.metrics.is_empty() {
            complexity_total += node.metrics.complexity();
            measured += 1;
        }
    }

    let outgoing: Vec<&Relationship> = relationships
        .iter()
        .filter(|r| {
            nodes
                .get(&r.source_id)
                .is_some_and(|source| source.project_id == project.id)
        })
        .collect();

    let average_complexity = if measured == 0 {
        0.0
    } else {
        complexity_total as f64 / measured as f64
    };

    ProjectInfo {
        project_id: project.id.clone(),
        name: project.name.clone(),
        path: project.path.clone(),
        target_framework: project.target_framework.clone(),
        languages,
        project_references: project.project_references.clone(),
        role_distribution,
        feature_boundaries,
        metrics: ProjectMetrics {
            total_symbols: members.len(),
            total_relationships: outgoing.len(),
            cross_project_reference_count: outgoing.iter().filter(|r| r.is_cross_project).count(),
            average_complexity,
            language_distribution,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::ArchitecturalRole;
    use crate::types::{NodeMetrics, RelationshipType};
    use semgraph_protocol::{Accessibility, Location};

    fn node(id: &str, project: &str, file: &str, metrics: NodeMetrics) -> SymbolNode {
        SymbolNode {
            id: id.to_string(),
            name: id.to_string(),
            fully_qualified_name: id.to_string(),
            kind: SymbolKind::Type,
            declared_type_category: None,
            location: Some(Location::new(file, 1, 2)),
            accessibility: Accessibility::Public,
            modifiers: BTreeSet::new(),
            project_id: project.to_string(),
            assembly_name: project.to_string(),
            containing_namespace: None,
            interfaces: Vec::new(),
            base_type: None,
            generic_parameters: Vec::new(),
            role: ArchitecturalRole::Service,
            feature_boundary: Some("Orders".to_string()),
            metrics,
        }
    }

    #[test]
    fn project_info_summarises_members() {
        let project = ProjectHandle::new("p1", "Shop").with_language("C#").referencing("p2");
        let nodes: BTreeMap<String, SymbolNode> = [
            node(
                "a",
                "p1",
                "Shop/A.cs",
                NodeMetrics {
                    method_count: Some(4),
                    inheritance_depth: Some(2),
                    ..NodeMetrics::default()
                },
            ),
            node("b", "p1", "Shop/B.xaml", NodeMetrics::default()),
            node(
                "c",
                "p2",
                "Web/C.ts",
                NodeMetrics {
                    parameter_count: Some(2),
                    ..NodeMetrics::default()
                },
            ),
        ]
        .into_iter()
        .map(|n| (n.id.clone(), n))
        .collect();
        let mut cross = Relationship::new("a", "c", RelationshipType::MethodCall);
        cross.is_cross_project = true;
        let relationships = vec![
            cross,
            Relationship::new("a", "b", RelationshipType::Association),
            Relationship::new("c", "a", RelationshipType::Association),
        ];

        let info = project_info(&project, &nodes, &relationships);

        assert_eq!(info.metrics.total_symbols, 2);
        assert_eq!(info.metrics.total_relationships, 2);
        assert_eq!(info.metrics.cross_project_reference_count, 1);
        assert!((info.metrics.average_complexity - 6.0).abs() < f64::EPSILON);
        assert_eq!(info.metrics.language_distribution["C#"], 1);
        assert_eq!(info.metrics.language_distribution["XAML"], 1);
        assert!(info.languages.contains("C#"));
        assert!(info.languages.contains("XAML"));
        assert_eq!(info.role_distribution["Service"], 2);
        assert_eq!(info.project_references, vec!["p2".to_string()]);
        assert!(info.feature_boundaries.contains("Orders"));
    }

    #[test]
    fn metadata_counts_by_category() {
        let mut metadata = GraphMetadata::new();
        let n = node("a", "p1", "A.cs", NodeMetrics::default());
        metadata.add_node(&n);
        let mut edge = Relationship::new("a", "b", RelationshipType::Inheritance);
        edge.is_cross_language = true;
        metadata.add_relationship(&edge);
        metadata.add_error("project p9: boom".to_string());

        assert_eq!(metadata.node_count, 1);
        assert_eq!(metadata.nodes_by_kind["Type"], 1);
        assert_eq!(metadata.nodes_by_role["Service"], 1);
        assert_eq!(metadata.relationships_by_type["Inheritance"], 1);
        assert_eq!(metadata.cross_language_relationship_count, 1);
        assert_eq!(metadata.cross_project_relationship_count, 0);
        assert_eq!(metadata.errors.len(), 1);
    }
}
