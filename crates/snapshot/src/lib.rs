//! # Semgraph Snapshot
//!
//! A [`SymbolResolver`](semgraph_protocol::SymbolResolver) that answers from a pre-resolved
//! workspace description instead of a live compiler front end. Snapshots are plain JSON, so a
//! front end can dump its view of a solution once and the graph can be rebuilt from it offline.
//!
//! Snapshots can also declare faults (an unopenable workspace, failing projects, failing
//! lookups) to exercise the graph's failure handling.

mod error;
mod resolver;
mod snapshot;

pub use error::{Result, SnapshotError};
pub use resolver::SnapshotResolver;
pub use snapshot::{FaultPlan, ProjectSnapshot, WorkspaceSnapshot};
