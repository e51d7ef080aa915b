use crate::symbol::{Location, ProjectHandle, ReferenceSite, SymbolHandle, WorkspaceHandle};
use async_trait::async_trait;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolverError>;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Workspace could not be opened: {0}")]
    WorkspaceUnavailable(String),

    #[error("Project {project} failed to compile: {reason}")]
    ProjectFailed { project: String, reason: String },

    #[error("Lookup failed for {symbol}: {reason}")]
    LookupFailed { symbol: String, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Questions the graph core asks of a semantic analysis front end.
///
/// Calls are the only suspension points of an analysis run. Implementations must be safe to call
/// concurrently from many tasks and must answer deterministically for a fixed input snapshot.
#[async_trait]
pub trait SymbolResolver: Send + Sync {
    /// Projects of the workspace. An error here aborts the analysis.
    async fn enumerate_projects(&self, workspace: &WorkspaceHandle) -> Result<Vec<ProjectHandle>>;

    /// Every symbol declared in the project's own sources, members included.
    async fn enumerate_declared_symbols(
        &self,
        project: &ProjectHandle,
    ) -> Result<Vec<SymbolHandle>>;

    /// Every location that references `symbol`.
    async fn find_references(&self, symbol: &SymbolHandle) -> Result<Vec<ReferenceSite>>;

    /// Implementers of an interface, or implementations of an abstract member.
    async fn find_implementations(&self, symbol: &SymbolHandle) -> Result<Vec<SymbolHandle>>;

    /// Classes deriving from `symbol`.
    async fn find_derived_types(&self, symbol: &SymbolHandle) -> Result<Vec<SymbolHandle>>;

    /// Innermost declared symbol enclosing `location`, if any.
    async fn resolve_symbol_at_location(&self, location: &Location) -> Result<Option<SymbolHandle>>;
}
