use crate::error::{Result, SnapshotError};
use semgraph_protocol::{ProjectHandle, ReferenceSite, SymbolHandle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Serialized view of a resolved workspace.
///
/// Cross-symbol maps are keyed by symbol identity (`{assembly}::{display name}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub projects: Vec<ProjectSnapshot>,

    /// Target identity -> sites referencing it
    #[serde(default)]
    pub references: BTreeMap<String, Vec<ReferenceSite>>,

    /// Interface or abstract member identity -> implementer identities
    #[serde(default)]
    pub implementations: BTreeMap<String, Vec<String>>,

    /// Base class identity -> derived class identities
    #[serde(default)]
    pub derived_types: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub faults: FaultPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(flatten)]
    pub project: ProjectHandle,

    #[serde(default)]
    pub symbols: Vec<SymbolHandle>,
}

/// Failures the resolver reports on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultPlan {
    #[serde(default)]
    pub fail_workspace: bool,

    /// Project ids whose symbols cannot be enumerated
    #[serde(default)]
    pub fail_projects: BTreeSet<String>,

    /// Symbol identities whose reference and hierarchy lookups fail
    #[serde(default)]
    pub fail_lookups: BTreeSet<String>,
}

impl WorkspaceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let snapshot = Self::from_json_str(&raw)?;
        log::debug!(
            "Loaded snapshot {} ({} projects, {} symbols)",
            path.display(),
            snapshot.projects.len(),
            snapshot.symbol_count()
        );
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for project in &self.projects {
            if !seen.insert(project.project.id.as_str()) {
                return Err(SnapshotError::DuplicateProject(project.project.id.clone()));
            }
        }
        Ok(())
    }

    pub fn symbol_count(&self) -> usize {
        self.projects.iter().map(|p| p.symbols.len()).sum()
    }

    #[must_use]
    pub fn with_project(mut self, project: ProjectHandle, symbols: Vec<SymbolHandle>) -> Self {
        self.projects.push(ProjectSnapshot { project, symbols });
        self
    }

    #[must_use]
    pub fn with_reference(mut self, target: &SymbolHandle, site: ReferenceSite) -> Self {
        self.references
            .entry(target.identity())
            .or_default()
            .push(site);
        self
    }

    #[must_use]
    pub fn with_implementation(mut self, of: &SymbolHandle, by: &SymbolHandle) -> Self {
        self.implementations
            .entry(of.identity())
            .or_default()
            .push(by.identity());
        self
    }

    #[must_use]
    pub fn with_derived_type(mut self, base: &SymbolHandle, derived: &SymbolHandle) -> Self {
        self.derived_types
            .entry(base.identity())
            .or_default()
            .push(derived.identity());
        self
    }

    #[must_use]
    pub fn failing_workspace(mut self) -> Self {
        self.faults.fail_workspace = true;
        self
    }

    #[must_use]
    pub fn failing_project(mut self, project_id: impl Into<String>) -> Self {
        self.faults.fail_projects.insert(project_id.into());
        self
    }

    #[must_use]
    pub fn failing_lookup(mut self, symbol: &SymbolHandle) -> Self {
        self.faults.fail_lookups.insert(symbol.identity());
        self
    }
}
