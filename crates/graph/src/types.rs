use crate::error::Result;
use crate::roles::ArchitecturalRole;
use crate::stats::GraphMetadata;
use semgraph_protocol::{Accessibility, Location, Modifier, SymbolKind, TypeCategory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Node of the unified graph: one resolved program entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolNode {
    /// `{assembly}::{fully qualified display form}`
    pub id: String,

    pub name: String,

    pub fully_qualified_name: String,

    pub kind: SymbolKind,

    /// Class/Interface/Struct/..., only for `Type` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type_category: Option<TypeCategory>,

    /// Absent for symbols with no source location
    #[serde(default)]
    pub location: Option<Location>,

    pub accessibility: Accessibility,

    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,

    pub project_id: String,

    pub assembly_name: String,

    #[serde(default)]
    pub containing_namespace: Option<String>,

    /// Display names of implemented interfaces
    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub base_type: Option<String>,

    #[serde(default)]
    pub generic_parameters: Vec<String>,

    #[serde(default)]
    pub role: ArchitecturalRole,

    #[serde(default)]
    pub feature_boundary: Option<String>,

    #[serde(default)]
    pub metrics: NodeMetrics,
}

impl SymbolNode {
    pub fn file_path(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.file_path.as_str())
    }

    pub fn is_interface(&self) -> bool {
        self.declared_type_category == Some(TypeCategory::Interface)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }
}

/// Size metrics; each is present only where it applies to the node kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance_depth: Option<usize>,
}

impl NodeMetrics {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Sum of every populated metric.
    pub fn complexity(&self) -> usize {
        [
            self.method_count,
            self.property_count,
            self.field_count,
            self.parameter_count,
            self.inheritance_depth,
        ]
        .iter()
        .flatten()
        .sum()
    }
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipType {
    /// A derives from class B
    Inheritance,

    /// A implements interface B
    Implementation,

    /// Method A overrides B
    MethodOverride,

    /// A implements abstract member B
    MethodImplementation,

    /// A owns a B (read-only field, structural member)
    Composition,

    /// A holds a replaceable B (mutable field)
    Aggregation,

    /// A mentions B (signature, unqualified reference)
    Association,

    /// A calls B
    MethodCall,

    /// A reads or writes B
    PropertyAccess,
}

impl RelationshipType {
    /// Coupling weight used by cross-project aggregation.
    pub fn weight(self) -> f64 {
        match self {
            Self::Inheritance => 1.0,
            Self::Implementation => 0.9,
            Self::Composition => 0.8,
            Self::MethodCall => 0.6,
            Self::PropertyAccess => 0.5,
            Self::Association => 0.3,
            _ => 0.1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inheritance => "Inheritance",
            Self::Implementation => "Implementation",
            Self::MethodOverride => "MethodOverride",
            Self::MethodImplementation => "MethodImplementation",
            Self::Composition => "Composition",
            Self::Aggregation => "Aggregation",
            Self::Association => "Association",
            Self::MethodCall => "MethodCall",
            Self::PropertyAccess => "PropertyAccess",
        }
    }
}

/// Dedupe key of a relationship: one edge per (source, target, type).
pub type RelationshipKey = (String, String, RelationshipType);

/// Directed, typed edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_id: String,

    pub target_id: String,

    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,

    #[serde(default)]
    pub location: Option<Location>,

    /// Endpoints belong to different projects
    #[serde(default)]
    pub is_cross_project: bool,

    /// Endpoint files have different extensions
    #[serde(default)]
    pub is_cross_language: bool,
}

impl Relationship {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type,
            location: None,
            is_cross_project: false,
            is_cross_language: false,
        }
    }

    #[must_use]
    pub fn at(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn key(&self) -> RelationshipKey {
        (
            self.source_id.clone(),
            self.target_id.clone(),
            self.relationship_type,
        )
    }
}

/// All edges from one project into another, collapsed into one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossProjectDependency {
    pub source_project_id: String,
    pub target_project_id: String,
    /// Most frequent edge type between the pair
    pub dependency_type: RelationshipType,
    pub shared_symbol_ids: BTreeSet<String>,
    pub reference_count: usize,
    /// Mean edge weight, within [0, 1]
    pub coupling_strength: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub total_symbols: usize,
    pub total_relationships: usize,
    pub cross_project_reference_count: usize,
    pub average_complexity: f64,
    pub language_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub target_framework: Option<String>,
    pub languages: BTreeSet<String>,
    pub project_references: Vec<String>,
    /// Role name -> node count
    pub role_distribution: BTreeMap<String, usize>,
    pub feature_boundaries: BTreeSet<String>,
    pub metrics: ProjectMetrics,
}

/// Result document of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedGraph {
    pub nodes: BTreeMap<String, SymbolNode>,
    pub relationships: Vec<Relationship>,
    pub project_info: BTreeMap<String, ProjectInfo>,
    pub cross_project_dependencies: Vec<CrossProjectDependency>,
    pub metadata: GraphMetadata,
}

impl UnifiedGraph {
    pub fn node(&self, id: &str) -> Option<&SymbolNode> {
        self.nodes.get(id)
    }

    /// First node with the given simple name.
    pub fn find_by_name(&self, name: &str) -> Option<&SymbolNode> {
        self.nodes.values().find(|n| n.name == name)
    }

    pub fn relationships_of_type(
        &self,
        relationship_type: RelationshipType,
    ) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.relationship_type == relationship_type)
    }

    pub fn dependency(&self, source: &str, target: &str) -> Option<&CrossProjectDependency> {
        self.cross_project_dependencies
            .iter()
            .find(|d| d.source_project_id == source && d.target_project_id == target)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
