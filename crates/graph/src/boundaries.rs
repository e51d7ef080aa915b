use crate::config::AnalysisConfig;
use crate::types::{Relationship, SymbolNode};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Boundary assigned to nodes whose location yields no usable path.
pub const UNKNOWN_FEATURE: &str = "Unknown";

/// Groups nodes into feature clusters: seed by path token, then greedily merge dense pairs.
pub struct FeatureBoundaryDetector {
    threshold: f64,
    ignored_segments: BTreeSet<String>,
    root: Option<String>,
}

impl FeatureBoundaryDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        let ignored_segments = config
            .build_output_segments
            .iter()
            .chain(&config.non_source_segments)
            .map(|s| s.to_lowercase())
            .collect();
        Self {
            threshold: config.feature_merge_threshold,
            ignored_segments,
            root: None,
        }
    }

    /// Paths under `root` are tokenised relative to it.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into().replace('\\', "/");
        self.root = (!root.is_empty()).then(|| root.trim_end_matches('/').to_string());
        self
    }

    /// Feature token for a source file path.
    pub fn feature_token(&self, file_path: Option<&str>) -> String {
        let Some(path) = file_path else {
            return UNKNOWN_FEATURE.to_string();
        };
        let normalized = path.replace('\\', "/");
        let relative = self
            .root
            .as_deref()
            .and_then(|root| normalized.strip_prefix(root))
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(&normalized);

        let mut segments: Vec<&str> = relative.split('/').collect();
        // last segment is the file itself
        segments.pop();
        let meaningful: Vec<&str> = segments
            .into_iter()
            .filter(|s| self.is_meaningful(s))
            .collect();

        let token = match meaningful.len() {
            0 => UNKNOWN_FEATURE,
            1 => meaningful[0],
            2 => meaningful[1],
            _ => meaningful[2],
        };
        token.to_string()
    }

    fn is_meaningful(&self, segment: &str) -> bool {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && !segment.starts_with('.')
            && !segment.ends_with(':')
            && !self.ignored_segments.contains(&segment.to_lowercase())
    }

    /// Cluster `nodes` into named feature boundaries.
    pub fn detect(
        &self,
        nodes: &BTreeMap<String, SymbolNode>,
        relationships: &[Relationship],
    ) -> BTreeMap<String, BTreeSet<String>> {
        let mut seeded: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for node in nodes.values() {
            seeded
                .entry(self.feature_token(node.file_path()))
                .or_default()
                .insert(node.id.clone());
        }

        let mut groups: Vec<(String, BTreeSet<String>)> = seeded.into_iter().collect();
        log::debug!("Seeded {} feature groups", groups.len());

        while let Some((i, j, coupling)) = self.first_mergeable_pair(&groups, relationships) {
            let (right_name, right) = groups.remove(j);
            let (left_name, mut left) = groups.remove(i);
            log::debug!("Merging feature {left_name} with {right_name} (coupling {coupling:.3})");
            left.extend(right);
            groups.insert(i, (format!("{left_name}+{right_name}"), left));
        }

        let mut boundaries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, members) in groups {
            boundaries.entry(name).or_default().extend(members);
        }
        boundaries
    }

    /// First pair, in group order, whose coupling exceeds the threshold.
    ///
    /// The scan restarts from the first pair after every merge, so with several qualifying pairs
    /// the result depends on group order (groups start sorted by token).
    fn first_mergeable_pair(
        &self,
        groups: &[(String, BTreeSet<String>)],
        relationships: &[Relationship],
    ) -> Option<(usize, usize, f64)> {
        let mut membership: HashMap<&str, usize> = HashMap::new();
        for (index, (_, members)) in groups.iter().enumerate() {
            for id in members {
                membership.insert(id.as_str(), index);
            }
        }

        // Both directions count toward the same unordered pair.
        let mut cross_edges: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for relationship in relationships {
            let source = membership.get(relationship.source_id.as_str());
            let target = membership.get(relationship.target_id.as_str());
            if let (Some(&a), Some(&b)) = (source, target) {
                if a != b {
                    *cross_edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
                }
            }
        }

        cross_edges.into_iter().find_map(|((i, j), edges)| {
            let coupling = coupling_strength(edges, groups[i].1.len(), groups[j].1.len());
            (coupling > self.threshold).then_some((i, j, coupling))
        })
    }
}

/// `edges / (size_a * size_b)`, zero when no edge is possible.
pub fn coupling_strength(edges: usize, size_a: usize, size_b: usize) -> f64 {
    let possible = size_a * size_b;
    if possible == 0 {
        return 0.0;
    }
    edges as f64 / possible as f64
}
