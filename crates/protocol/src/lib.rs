//! # Semgraph Protocol
//!
//! Contract between the graph core and an external symbol resolution service (a compiler's
//! semantic front end). The core never parses source or resolves overloads itself; it only asks
//! the questions listed on [`SymbolResolver`] and works with the plain-data handles returned.
//!
//! Every adapter must produce handles whose [`SymbolHandle::identity`] is stable for an unchanged
//! input snapshot, because the graph derives node ids from it.

mod resolver;
mod symbol;

pub use resolver::{ResolverError, Result, SymbolResolver};
pub use symbol::{
    symbol_identity, Accessibility, Location, MemberInfo, Modifier, ParameterInfo, ProjectHandle,
    ReferenceContext, ReferenceSite, SymbolHandle, SymbolKind, TypeCategory, TypeRef,
    WorkspaceHandle, UNKNOWN_ASSEMBLY,
};
