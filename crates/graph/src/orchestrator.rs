use crate::boundaries::FeatureBoundaryDetector;
use crate::builder::{BuildOutcome, NodeBuilder};
use crate::collector::RelationshipCollector;
use crate::config::AnalysisConfig;
use crate::context::AnalysisContext;
use crate::coupling;
use crate::error::{GraphError, Result};
use crate::roles;
use crate::stats::{self, GraphMetadata};
use crate::types::{Relationship, SymbolNode, UnifiedGraph};
use rayon::prelude::*;
use semgraph_protocol::{ProjectHandle, SymbolResolver, WorkspaceHandle};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Entry point: turns a workspace into a [`UnifiedGraph`].
///
/// Every call builds a fresh [`AnalysisContext`]; nothing survives between calls.
pub struct GraphOrchestrator {
    resolver: Arc<dyn SymbolResolver>,
    config: AnalysisConfig,
}

impl GraphOrchestrator {
    pub fn new(resolver: Arc<dyn SymbolResolver>, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { resolver, config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub async fn analyze_solution(&self, workspace: &WorkspaceHandle) -> Result<UnifiedGraph> {
        self.analyze_solution_with_cancel(workspace, CancellationToken::new())
            .await
    }

    /// Like [`analyze_solution`](Self::analyze_solution), stopping with
    /// [`GraphError::Cancelled`] once `cancel` fires.
    ///
    /// The token is checked at each phase entry and before each resolver call; calls already in
    /// flight run to completion.
    pub async fn analyze_solution_with_cancel(
        &self,
        workspace: &WorkspaceHandle,
        cancel: CancellationToken,
    ) -> Result<UnifiedGraph> {
        let started = Instant::now();
        let ctx = Arc::new(AnalysisContext::new(
            Arc::clone(&self.resolver),
            self.config.clone(),
            cancel,
        ));
        let mut errors = Vec::new();

        ctx.check_cancelled()?;
        let projects = discover_projects(&ctx, workspace).await?;
        log::info!(
            "Analyzing {} with {} projects ({} workers)",
            workspace.path,
            projects.len(),
            ctx.pool.limit()
        );

        ctx.check_cancelled()?;
        build_nodes(&ctx, &projects, &mut errors).await?;
        log::info!("Registered {} nodes", ctx.nodes.len());

        ctx.check_cancelled()?;
        collect_relationships(&ctx, &mut errors).await?;
        log::info!("Collected {} relationships", ctx.relationship_count());

        ctx.check_cancelled()?;
        classify_roles(&ctx).await?;

        ctx.check_cancelled()?;
        let mut nodes: BTreeMap<String, SymbolNode> = ctx
            .nodes
            .snapshot()
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        let relationships = finalize_relationships(&nodes, ctx.relationships());

        let boundaries = FeatureBoundaryDetector::new(&self.config)
            .with_root(workspace_root(workspace))
            .detect(&nodes, &relationships);
        for (name, members) in &boundaries {
            for id in members {
                if let Some(node) = nodes.get_mut(id) {
                    node.feature_boundary = Some(name.clone());
                }
            }
        }
        log::info!("Detected {} feature boundaries", boundaries.len());

        ctx.check_cancelled()?;
        let cross_project_dependencies = coupling::aggregate(&nodes, &relationships, &projects);

        let project_info = projects
            .iter()
            .map(|project| {
                (
                    project.id.clone(),
                    stats::project_info(project, &nodes, &relationships),
                )
            })
            .collect();

        let mut metadata = GraphMetadata::new();
        metadata.project_count = projects.len();
        nodes.values().for_each(|node| metadata.add_node(node));
        relationships
            .iter()
            .for_each(|relationship| metadata.add_relationship(relationship));
        metadata.feature_boundary_count = boundaries.len();
        errors.sort();
        errors.into_iter().for_each(|error| metadata.add_error(error));
        metadata.duration_ms = started.elapsed().as_millis() as u64;

        log::info!(
            "Analysis finished: {} nodes, {} relationships, {} dependencies, {} errors in {} ms",
            metadata.node_count,
            metadata.relationship_count,
            cross_project_dependencies.len(),
            metadata.errors.len(),
            metadata.duration_ms
        );

        Ok(UnifiedGraph {
            nodes,
            relationships,
            project_info,
            cross_project_dependencies,
            metadata,
        })
    }
}

async fn discover_projects(
    ctx: &AnalysisContext,
    workspace: &WorkspaceHandle,
) -> Result<Vec<ProjectHandle>> {
    let mut projects = ctx
        .resolver
        .enumerate_projects(workspace)
        .await
        .map_err(|e| GraphError::WorkspaceUnavailable(e.to_string()))?;
    if projects.is_empty() {
        return Err(GraphError::NoProjects(workspace.path.clone()));
    }
    projects.sort_by(|a, b| a.id.cmp(&b.id));
    projects.dedup_by(|a, b| a.id == b.id);
    Ok(projects)
}

/// One task per project; a failing project is recorded and skipped.
async fn build_nodes(
    ctx: &Arc<AnalysisContext>,
    projects: &[ProjectHandle],
    errors: &mut Vec<String>,
) -> Result<()> {
    let mut tasks = JoinSet::new();
    for project in projects {
        let ctx = Arc::clone(ctx);
        let project = project.clone();
        tasks.spawn(async move {
            let outcome = build_project_nodes(&ctx, project.clone()).await;
            (project.id, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((project_id, Ok(registered))) => {
                log::debug!("Project {project_id}: {registered} nodes registered");
            }
            Ok((_, Err(GraphError::Cancelled))) => {
                tasks.abort_all();
                return Err(GraphError::Cancelled);
            }
            Ok((project_id, Err(e))) => {
                log::warn!("Skipping project {project_id}: {e}");
                errors.push(format!("project {project_id}: {e}"));
            }
            Err(e) => {
                log::warn!("Project task failed: {e}");
                errors.push(format!("project task: {e}"));
            }
        }
    }
    Ok(())
}

async fn build_project_nodes(ctx: &Arc<AnalysisContext>, project: ProjectHandle) -> Result<usize> {
    ctx.check_cancelled()?;
    let symbols = ctx.resolver.enumerate_declared_symbols(&project).await?;
    let project = Arc::new(project);

    let mut tasks = JoinSet::new();
    for symbol in symbols {
        let permit = ctx.pool.acquire().await?;
        let ctx = Arc::clone(ctx);
        let project = Arc::clone(&project);
        tasks.spawn(async move {
            let _permit = permit;
            NodeBuilder::new(&ctx.config).build_into(&ctx.registry, &ctx.nodes, &symbol, &project)
        });
    }

    let mut registered = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(BuildOutcome::Registered(_)) => registered += 1,
            Ok(BuildOutcome::Duplicate(id)) => log::trace!("{id} already registered"),
            Ok(BuildOutcome::Skipped) => {}
            Err(e) => log::warn!("Node build task failed in {}: {e}", project.id),
        }
    }
    Ok(registered)
}

/// One task per node; a failing node keeps whatever edges it stored before the failure.
async fn collect_relationships(ctx: &Arc<AnalysisContext>, errors: &mut Vec<String>) -> Result<()> {
    let mut ids = ctx.nodes.ids();
    ids.sort();

    let mut tasks = JoinSet::new();
    for id in ids {
        ctx.check_cancelled()?;
        let permit = ctx.pool.acquire().await?;
        let ctx = Arc::clone(ctx);
        tasks.spawn(async move {
            let _permit = permit;
            let (Some(node), Some(symbol)) = (ctx.nodes.get(&id), ctx.registry.handle(&id)) else {
                return (id, Ok(0));
            };
            let outcome = RelationshipCollector::new(&ctx).collect(&node, &symbol).await;
            (id, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(_))) => {}
            Ok((_, Err(GraphError::Cancelled))) => {
                tasks.abort_all();
                return Err(GraphError::Cancelled);
            }
            Ok((id, Err(e))) => {
                log::warn!("Relationship collection incomplete for {id}: {e}");
                errors.push(format!("node {id}: {e}"));
            }
            Err(e) => {
                log::warn!("Relationship task failed: {e}");
                errors.push(format!("relationship task: {e}"));
            }
        }
    }
    Ok(())
}

/// CPU-bound; runs on the rayon pool off the async workers.
async fn classify_roles(ctx: &Arc<AnalysisContext>) -> Result<()> {
    let ctx = Arc::clone(ctx);
    let classified = tokio::task::spawn_blocking(move || {
        let ids = ctx.nodes.ids();
        ids.par_iter().for_each(|id| {
            ctx.nodes.update(id, |node| {
                let role = roles::classify(node);
                node.role = role;
            });
        });
        ids.len()
    })
    .await
    .map_err(|e| GraphError::Other(format!("role classification failed: {e}")))?;
    log::debug!("Classified {classified} nodes");
    Ok(())
}

/// Drop edges with an unregistered endpoint, derive the cross flags and sort.
fn finalize_relationships(
    nodes: &BTreeMap<String, SymbolNode>,
    relationships: Vec<Relationship>,
) -> Vec<Relationship> {
    let mut finalized: Vec<Relationship> = relationships
        .into_iter()
        .filter_map(|mut relationship| {
            let source = nodes.get(&relationship.source_id)?;
            let target = nodes.get(&relationship.target_id)?;
            relationship.is_cross_project = source.project_id != target.project_id;
            relationship.is_cross_language = match (
                source.location.as_ref().and_then(|l| l.extension()),
                target.location.as_ref().and_then(|l| l.extension()),
            ) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            };
            Some(relationship)
        })
        .collect();
    finalized.sort_by(|a, b| a.key().cmp(&b.key()));
    finalized
}

/// Directory the workspace lives in; a solution file path maps to its parent.
fn workspace_root(workspace: &WorkspaceHandle) -> String {
    let path = Path::new(&workspace.path);
    let root = if path.extension().is_some() {
        path.parent().unwrap_or(path)
    } else {
        path
    };
    root.to_string_lossy().into_owned()
}
