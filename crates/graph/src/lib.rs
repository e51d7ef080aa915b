//! # Semantic Graph
//!
//! Builds one unified semantic graph for a multi-project workspace: program entities become
//! nodes, their structural and usage relationships become typed weighted edges, and the result
//! is annotated with architectural roles, feature boundaries and cross-project coupling.
//!
//! ## Architecture
//!
//! ```text
//! WorkspaceHandle
//!     │
//!     ├──> Project discovery (one task per project)
//!     │      └─ Node Builder + Symbol Registry (bounded worker pool)
//!     │
//!     ├──> Relationship Collector (one task per node)
//!     │      ├─ Structural edges (base types, members, signatures)
//!     │      └─ Resolver queries (references, implementations, derived types)
//!     │
//!     ├──> Role Classifier (rayon, per node)
//!     │
//!     ├──> Feature Boundary Detector (path tokens + greedy merge)
//!     │
//!     └──> Cross-Project Aggregator
//!            └─ UnifiedGraph { nodes, relationships, projectInfo,
//!                              crossProjectDependencies, metadata }
//! ```
//!
//! Symbol resolution is delegated to a [`SymbolResolver`](semgraph_protocol::SymbolResolver).

mod boundaries;
mod builder;
mod collector;
mod config;
mod context;
mod coupling;
mod error;
mod graph;
mod limits;
mod orchestrator;
mod registry;
mod roles;
mod stats;
mod types;

pub use boundaries::{coupling_strength, FeatureBoundaryDetector, UNKNOWN_FEATURE};
pub use builder::{BuildOutcome, NodeBuilder};
pub use collector::RelationshipCollector;
pub use config::AnalysisConfig;
pub use context::AnalysisContext;
pub use coupling::aggregate as aggregate_cross_project;
pub use error::{GraphError, Result};
pub use graph::GraphView;
pub use limits::{default_worker_concurrency, MAX_WORKER_CONCURRENCY, WORKER_CONCURRENCY_ENV};
pub use orchestrator::GraphOrchestrator;
pub use registry::{NodeStore, SymbolRegistry};
pub use roles::{classify, classify_input, ArchitecturalRole, RoleInput};
pub use stats::{language_for_extension, project_info, GraphMetadata};
pub use types::{
    CrossProjectDependency, NodeMetrics, ProjectInfo, ProjectMetrics, Relationship,
    RelationshipKey, RelationshipType, SymbolNode, UnifiedGraph,
};
pub use tokio_util::sync::CancellationToken;
