//! Heuristic architectural role labels.
//!
//! Rules are tried in priority order and the first one yielding a role wins. Layer rules
//! (UI, business, data) are broad buckets, so they come before the structural and helper rules
//! only because the namespace is the stronger signal; inside a layer the name suffix refines it.

use crate::types::SymbolNode;
use serde::{Deserialize, Serialize};

/// Closed taxonomy of roles; nothing outside this list is ever produced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ArchitecturalRole {
    #[default]
    Unknown,
    // Presentation
    UI,
    View,
    ViewModel,
    Window,
    Page,
    UserControl,
    CodeBehind,
    // Business
    BusinessLogic,
    Service,
    Entity,
    Domain,
    ValueObject,
    // Data
    DataModel,
    Repository,
    DbContext,
    DataAccess,
    // Infrastructure
    Controller,
    ApiController,
    Middleware,
    Configuration,
    // Structural
    Interface,
    AbstractClass,
    Factory,
    Builder,
    // Common
    Helper,
    Utility,
    Extension,
    Attribute,
}

impl ArchitecturalRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::UI => "UI",
            Self::View => "View",
            Self::ViewModel => "ViewModel",
            Self::Window => "Window",
            Self::Page => "Page",
            Self::UserControl => "UserControl",
            Self::CodeBehind => "CodeBehind",
            Self::BusinessLogic => "BusinessLogic",
            Self::Service => "Service",
            Self::Entity => "Entity",
            Self::Domain => "Domain",
            Self::ValueObject => "ValueObject",
            Self::DataModel => "DataModel",
            Self::Repository => "Repository",
            Self::DbContext => "DbContext",
            Self::DataAccess => "DataAccess",
            Self::Controller => "Controller",
            Self::ApiController => "ApiController",
            Self::Middleware => "Middleware",
            Self::Configuration => "Configuration",
            Self::Interface => "Interface",
            Self::AbstractClass => "AbstractClass",
            Self::Factory => "Factory",
            Self::Builder => "Builder",
            Self::Helper => "Helper",
            Self::Utility => "Utility",
            Self::Extension => "Extension",
            Self::Attribute => "Attribute",
        }
    }
}

const UI_NAMESPACES: &[&str] = &["ui", "view", "presentation"];
const BUSINESS_NAMESPACES: &[&str] = &["business", "domain", "service", "logic", "core"];
const DATA_NAMESPACES: &[&str] = &["data", "repositor", "persistence", "storage", "dal"];
const INFRA_NAMESPACES: &[&str] = &["infrastructure", "api", "web", "controller", "middleware"];
const COMMON_NAMESPACES: &[&str] = &["common", "shared", "utilit", "helper", "extension"];

const CODE_BEHIND_SUFFIXES: &[&str] = &[
    ".xaml.cs",
    ".xaml.vb",
    ".axaml.cs",
    ".razor.cs",
    ".aspx.cs",
    ".cshtml.cs",
];

/// Facts the classifier looks at.
#[derive(Debug, Clone, Copy)]
pub struct RoleInput<'a> {
    pub name: &'a str,
    pub namespace: Option<&'a str>,
    pub file_path: Option<&'a str>,
    pub is_interface: bool,
    pub is_abstract: bool,
}

impl<'a> From<&'a SymbolNode> for RoleInput<'a> {
    fn from(node: &'a SymbolNode) -> Self {
        Self {
            name: &node.name,
            namespace: node.containing_namespace.as_deref(),
            file_path: node.file_path(),
            is_interface: node.is_interface(),
            is_abstract: node.is_abstract() && node.declared_type_category.is_some(),
        }
    }
}

pub fn classify(node: &SymbolNode) -> ArchitecturalRole {
    classify_input(&RoleInput::from(node))
}

pub fn classify_input(input: &RoleInput<'_>) -> ArchitecturalRole {
    let namespace = input.namespace.unwrap_or_default().to_lowercase();
    let segments: Vec<&str> = namespace.split('.').filter(|s| !s.is_empty()).collect();
    let name = input.name;

    if is_ui(&segments, input.file_path) {
        return ui_role(name, input)
            .or_else(|| interface_role(input))
            .unwrap_or(ArchitecturalRole::UI);
    }

    if has_segment(&segments, BUSINESS_NAMESPACES) {
        return business_role(name, &segments)
            .or_else(|| interface_role(input))
            .unwrap_or(ArchitecturalRole::BusinessLogic);
    }

    if has_segment(&segments, DATA_NAMESPACES) {
        return data_role(name)
            .or_else(|| interface_role(input))
            .unwrap_or(ArchitecturalRole::DataModel);
    }

    if has_segment(&segments, INFRA_NAMESPACES) {
        if let Some(role) = infrastructure_role(name, &segments) {
            return role;
        }
    }

    if let Some(role) = structural_role(name, input) {
        return role;
    }

    if has_segment(&segments, COMMON_NAMESPACES) {
        if let Some(role) = common_role(name) {
            return role;
        }
    }

    ArchitecturalRole::Unknown
}

fn has_segment(segments: &[&str], indicators: &[&str]) -> bool {
    segments
        .iter()
        .any(|segment| indicators.iter().any(|i| segment.starts_with(i)))
}

fn is_ui(segments: &[&str], file_path: Option<&str>) -> bool {
    if has_segment(segments, UI_NAMESPACES) {
        return true;
    }
    let Some(path) = file_path else {
        return false;
    };
    let in_view_dir = path
        .split(['/', '\\'])
        .any(|s| s.eq_ignore_ascii_case("views") || s.eq_ignore_ascii_case("viewmodels"));
    in_view_dir || is_code_behind(path)
}

fn is_code_behind(path: &str) -> bool {
    let lower = path.to_lowercase();
    CODE_BEHIND_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

fn ends_with_any(name: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| name.ends_with(s))
}

fn ui_role(name: &str, input: &RoleInput<'_>) -> Option<ArchitecturalRole> {
    if name.ends_with("ViewModel") {
        Some(ArchitecturalRole::ViewModel)
    } else if name.ends_with("View") {
        Some(ArchitecturalRole::View)
    } else if name.ends_with("Window") {
        Some(ArchitecturalRole::Window)
    } else if name.ends_with("Page") {
        Some(ArchitecturalRole::Page)
    } else if ends_with_any(name, &["UserControl", "Control"]) {
        Some(ArchitecturalRole::UserControl)
    } else if input.file_path.is_some_and(is_code_behind) {
        Some(ArchitecturalRole::CodeBehind)
    } else {
        None
    }
}

fn business_role(name: &str, segments: &[&str]) -> Option<ArchitecturalRole> {
    if name.ends_with("Service") {
        Some(ArchitecturalRole::Service)
    } else if name.ends_with("Entity") {
        Some(ArchitecturalRole::Entity)
    } else if name.ends_with("ValueObject") {
        Some(ArchitecturalRole::ValueObject)
    } else if ends_with_any(name, &["Aggregate", "DomainEvent"])
        || segments.iter().any(|s| s.starts_with("domain"))
    {
        Some(ArchitecturalRole::Domain)
    } else {
        None
    }
}

fn data_role(name: &str) -> Option<ArchitecturalRole> {
    if ends_with_any(name, &["Repository", "Repo"]) {
        Some(ArchitecturalRole::Repository)
    } else if ends_with_any(name, &["DbContext", "Context"]) {
        Some(ArchitecturalRole::DbContext)
    } else if ends_with_any(name, &["Dao", "DataAccess", "Dal", "Gateway"]) {
        Some(ArchitecturalRole::DataAccess)
    } else {
        None
    }
}

fn infrastructure_role(name: &str, segments: &[&str]) -> Option<ArchitecturalRole> {
    if name.ends_with("Controller") {
        let api = name.ends_with("ApiController") || segments.iter().any(|s| s.starts_with("api"));
        Some(if api {
            ArchitecturalRole::ApiController
        } else {
            ArchitecturalRole::Controller
        })
    } else if name.ends_with("Middleware") {
        Some(ArchitecturalRole::Middleware)
    } else if ends_with_any(
        name,
        &["Configuration", "Config", "Settings", "Options", "Startup"],
    ) {
        Some(ArchitecturalRole::Configuration)
    } else {
        None
    }
}

fn interface_role(input: &RoleInput<'_>) -> Option<ArchitecturalRole> {
    input.is_interface.then_some(ArchitecturalRole::Interface)
}

fn structural_role(name: &str, input: &RoleInput<'_>) -> Option<ArchitecturalRole> {
    if input.is_interface {
        Some(ArchitecturalRole::Interface)
    } else if input.is_abstract {
        Some(ArchitecturalRole::AbstractClass)
    } else if name.ends_with("Factory") {
        Some(ArchitecturalRole::Factory)
    } else if name.ends_with("Builder") {
        Some(ArchitecturalRole::Builder)
    } else {
        None
    }
}

fn common_role(name: &str) -> Option<ArchitecturalRole> {
    if ends_with_any(name, &["Helper", "Helpers"]) {
        Some(ArchitecturalRole::Helper)
    } else if ends_with_any(name, &["Util", "Utils", "Utility", "Utilities"]) {
        Some(ArchitecturalRole::Utility)
    } else if ends_with_any(name, &["Extension", "Extensions"]) {
        Some(ArchitecturalRole::Extension)
    } else if name.ends_with("Attribute") {
        Some(ArchitecturalRole::Attribute)
    } else {
        None
    }
}
