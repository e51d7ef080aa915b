use semgraph_protocol::ResolverError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Workspace unavailable: {0}")]
    WorkspaceUnavailable(String),

    #[error("Workspace {0} has no projects")]
    NoProjects(String),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}
