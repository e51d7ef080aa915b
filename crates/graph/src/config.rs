use crate::error::{GraphError, Result};
use crate::limits::{
    default_worker_concurrency, parse_worker_concurrency, WORKER_CONCURRENCY_ENV,
};
use serde::{Deserialize, Serialize};

const MERGE_THRESHOLD_ENV: &str = "SEMGRAPH_FEATURE_MERGE_THRESHOLD";

/// Configuration for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound on concurrently running symbol and relationship tasks
    pub worker_concurrency: usize,

    /// Assemblies whose symbols never become nodes (framework code)
    pub excluded_assembly_prefixes: Vec<String>,

    /// Coupling above which two feature groups are merged
    pub feature_merge_threshold: f64,

    /// Path segments produced by builds, ignored when deriving feature tokens
    pub build_output_segments: Vec<String>,

    /// Source-root path segments carrying no feature meaning
    pub non_source_segments: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: default_worker_concurrency(),
            excluded_assembly_prefixes: strings(&[
                "System",
                "Microsoft",
                "mscorlib",
                "netstandard",
                "Windows",
            ]),
            feature_merge_threshold: 0.7,
            build_output_segments: strings(&[
                "bin",
                "obj",
                "out",
                "build",
                "target",
                "dist",
                "debug",
                "release",
                "node_modules",
            ]),
            non_source_segments: strings(&["src", "source", "sources", "lib", "app"]),
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SEMGRAPH_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let concurrency = std::env::var(WORKER_CONCURRENCY_ENV).ok();
        self.worker_concurrency =
            parse_worker_concurrency(concurrency.as_deref(), self.worker_concurrency);

        let threshold = std::env::var(MERGE_THRESHOLD_ENV).ok();
        self.feature_merge_threshold =
            parse_merge_threshold(threshold.as_deref(), self.feature_merge_threshold);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.worker_concurrency == 0 {
            return Err(GraphError::InvalidConfig(
                "worker_concurrency must be > 0".to_string(),
            ));
        }

        if !(self.feature_merge_threshold > 0.0 && self.feature_merge_threshold <= 1.0) {
            return Err(GraphError::InvalidConfig(format!(
                "feature_merge_threshold ({}) must lie in (0, 1]",
                self.feature_merge_threshold
            )));
        }

        Ok(())
    }

    /// Whether `assembly` is framework code excluded from the graph.
    pub fn is_excluded_assembly(&self, assembly: &str) -> bool {
        self.excluded_assembly_prefixes.iter().any(|prefix| {
            assembly == prefix
                || assembly
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

/// Threshold from a raw override; anything outside (0, 1] keeps `default_value`.
pub(crate) fn parse_merge_threshold(raw: Option<&str>, default_value: f64) -> f64 {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| *v > 0.0 && *v <= 1.0)
        .unwrap_or(default_value)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
