use crate::types::{CrossProjectDependency, Relationship, RelationshipType, SymbolNode};
use semgraph_protocol::ProjectHandle;
use std::collections::{BTreeMap, BTreeSet};

/// Collapse every edge crossing an ordered project pair into one weighted dependency record.
pub fn aggregate(
    nodes: &BTreeMap<String, SymbolNode>,
    relationships: &[Relationship],
    projects: &[ProjectHandle],
) -> Vec<CrossProjectDependency> {
    let known: BTreeSet<&str> = projects.iter().map(|p| p.id.as_str()).collect();

    let mut pairs: BTreeMap<(&str, &str), Vec<&Relationship>> = BTreeMap::new();
    for relationship in relationships {
        let (Some(source), Some(target)) = (
            nodes.get(&relationship.source_id),
            nodes.get(&relationship.target_id),
        ) else {
            continue;
        };
        let (from, to) = (source.project_id.as_str(), target.project_id.as_str());
        if from == to || !known.contains(from) || !known.contains(to) {
            continue;
        }
        pairs.entry((from, to)).or_default().push(relationship);
    }

    pairs
        .into_iter()
        .map(|((from, to), edges)| dependency(from, to, &edges))
        .collect()
}

fn dependency(from: &str, to: &str, edges: &[&Relationship]) -> CrossProjectDependency {
    let total_weight: f64 = edges.iter().map(|e| e.relationship_type.weight()).sum();
    let coupling_strength = (total_weight / edges.len() as f64).min(1.0);

    CrossProjectDependency {
        source_project_id: from.to_string(),
        target_project_id: to.to_string(),
        dependency_type: dominant_type(edges),
        shared_symbol_ids: edges.iter().map(|e| e.target_id.clone()).collect(),
        reference_count: edges.len(),
        coupling_strength,
    }
}

/// Most frequent type; ties go to the heavier type, then to declaration order.
fn dominant_type(edges: &[&Relationship]) -> RelationshipType {
    let mut counts: BTreeMap<RelationshipType, usize> = BTreeMap::new();
    for edge in edges {
        *counts.entry(edge.relationship_type).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_type, a_count), (b_type, b_count)| {
            a_count
                .cmp(b_count)
                .then(a_type.weight().total_cmp(&b_type.weight()))
                .then(b_type.cmp(a_type))
        })
        .map(|(relationship_type, _)| relationship_type)
        .unwrap_or(RelationshipType::Association)
}
