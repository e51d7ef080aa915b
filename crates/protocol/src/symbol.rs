use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Assembly literal used for symbols that report no containing assembly.
pub const UNKNOWN_ASSEMBLY: &str = "Unknown";

/// Stable identity of a symbol: `{assembly}::{fully qualified display form}`.
pub fn symbol_identity(assembly: Option<&str>, display_name: &str) -> String {
    let assembly = assembly
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_ASSEMBLY);
    format!("{assembly}::{display_name}")
}

/// Opaque handle to an opened workspace (solution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceHandle {
    pub path: String,
}

impl WorkspaceHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHandle {
    pub id: String,
    pub name: String,
    pub path: String,
    pub assembly_name: String,
    #[serde(default)]
    pub target_framework: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Ids of projects this project references.
    #[serde(default)]
    pub project_references: Vec<String>,
}

impl ProjectHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            path: format!("{name}/{name}.csproj"),
            assembly_name: name.clone(),
            name,
            target_framework: None,
            language: None,
            project_references: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_target_framework(mut self, framework: impl Into<String>) -> Self {
        self.target_framework = Some(framework.into());
        self
    }

    #[must_use]
    pub fn referencing(mut self, project_id: impl Into<String>) -> Self {
        self.project_references.push(project_id.into());
        self
    }
}

/// Source span, 1-indexed lines and columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(file_path: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            file_path: file_path.into(),
            start_line,
            start_column: 1,
            end_line,
            end_column: 1,
        }
    }

    /// Lower-cased file extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        let file = self.file_path.rsplit(['/', '\\']).next()?;
        let (_, ext) = file.rsplit_once('.')?;
        (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }

    pub fn contains(&self, other: &Location) -> bool {
        self.file_path == other.file_path
            && (self.start_line, self.start_column) <= (other.start_line, other.start_column)
            && (other.end_line, other.end_column) <= (self.end_line, self.end_column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolKind {
    Namespace,
    Type,
    Method,
    Property,
    Field,
    Event,
    Parameter,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeCategory {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Record,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    Public,
    #[default]
    Private,
    Protected,
    Internal,
    ProtectedInternal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Static,
    Abstract,
    Virtual,
    Override,
    Sealed,
    Extern,
}

/// Reference to a type as it appears in a signature or declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub assembly: Option<String>,
}

impl TypeRef {
    pub fn new(
        assembly: impl Into<String>,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            assembly: Some(assembly.into()),
        }
    }

    pub fn identity(&self) -> String {
        symbol_identity(self.assembly.as_deref(), &self.display_name)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.display_name.as_str(), "void" | "System.Void")
    }
}

/// Summary of a member declared inside a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub declared_type: Option<TypeRef>,
    #[serde(default)]
    pub parameter_count: usize,
}

impl MemberInfo {
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            is_static: false,
            declared_type: None,
            parameter_count: 0,
        }
    }

    #[must_use]
    pub fn of_type(mut self, ty: TypeRef) -> Self {
        self.declared_type = Some(ty);
        self
    }

    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, count: usize) -> Self {
        self.parameter_count = count;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    pub parameter_type: TypeRef,
}

/// A resolved program entity as reported by the resolution service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolHandle {
    pub name: String,
    /// Fully qualified display form, e.g. `Shop.Orders.OrderService.Submit(Order)`.
    pub display_name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub type_category: Option<TypeCategory>,
    #[serde(default)]
    pub containing_assembly: Option<String>,
    #[serde(default)]
    pub containing_namespace: Option<String>,
    #[serde(default)]
    pub containing_type: Option<TypeRef>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    /// Compiler-synthesized (backing fields, default constructors, ...).
    #[serde(default)]
    pub is_implicitly_declared: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Base-type chain, nearest base first.
    #[serde(default)]
    pub base_types: Vec<TypeRef>,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberInfo>,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Declared type of a field, property or event.
    #[serde(default)]
    pub declared_type: Option<TypeRef>,
    #[serde(default)]
    pub overridden: Option<TypeRef>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl SymbolHandle {
    pub fn new(kind: SymbolKind, name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            kind,
            type_category: None,
            containing_assembly: None,
            containing_namespace: None,
            containing_type: None,
            accessibility: Accessibility::Public,
            modifiers: BTreeSet::new(),
            is_implicitly_declared: false,
            is_read_only: false,
            interfaces: Vec::new(),
            base_types: Vec::new(),
            generic_parameters: Vec::new(),
            members: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            declared_type: None,
            overridden: None,
            location: None,
        }
    }

    /// Type symbol `namespace.name` declared in `assembly`.
    pub fn type_in(
        assembly: &str,
        namespace: &str,
        name: &str,
        category: TypeCategory,
    ) -> Self {
        let display = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{namespace}.{name}")
        };
        let mut symbol = Self::new(SymbolKind::Type, name, display);
        symbol.type_category = Some(category);
        symbol.containing_assembly = Some(assembly.to_string());
        symbol.containing_namespace = (!namespace.is_empty()).then(|| namespace.to_string());
        symbol
    }

    /// Member symbol declared inside `owner`.
    pub fn member_of(owner: &SymbolHandle, kind: SymbolKind, name: &str) -> Self {
        let suffix = if kind == SymbolKind::Method {
            format!("{name}()")
        } else {
            name.to_string()
        };
        let mut symbol = Self::new(kind, name, format!("{}.{suffix}", owner.display_name));
        symbol.containing_assembly = owner.containing_assembly.clone();
        symbol.containing_namespace = owner.containing_namespace.clone();
        symbol.containing_type = Some(owner.type_ref());
        symbol.location = owner.location.clone();
        symbol
    }

    pub fn identity(&self) -> String {
        symbol_identity(self.containing_assembly.as_deref(), &self.display_name)
    }

    pub fn type_ref(&self) -> TypeRef {
        TypeRef {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            assembly: self.containing_assembly.clone(),
        }
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == SymbolKind::Type && self.type_category == Some(TypeCategory::Interface)
    }

    pub fn is_class(&self) -> bool {
        self.kind == SymbolKind::Type
            && matches!(
                self.type_category,
                Some(TypeCategory::Class | TypeCategory::Record)
            )
    }

    /// Abstract method, property or event; interface members count as abstract.
    pub fn is_abstract_member(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method | SymbolKind::Property | SymbolKind::Event
        ) && self.has_modifier(Modifier::Abstract)
    }

    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    #[must_use]
    pub fn implementing(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn deriving_from(mut self, base: TypeRef) -> Self {
        self.base_types.push(base);
        self
    }

    #[must_use]
    pub fn with_generic_parameter(mut self, name: impl Into<String>) -> Self {
        self.generic_parameters.push(name.into());
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, parameter_type: TypeRef) -> Self {
        self.parameters.push(ParameterInfo {
            name: name.into(),
            parameter_type,
        });
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    #[must_use]
    pub fn of_type(mut self, ty: TypeRef) -> Self {
        self.declared_type = Some(ty);
        self
    }

    #[must_use]
    pub fn overriding(mut self, member: TypeRef) -> Self {
        self.overridden = Some(member);
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    #[must_use]
    pub fn implicitly_declared(mut self) -> Self {
        self.is_implicitly_declared = true;
        self
    }
}

/// How a reference site uses the referenced symbol, when the service can tell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceContext {
    Call,
    Access,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSite {
    pub location: Location,
    /// Declared symbol containing the reference, when the service resolves it up front.
    #[serde(default)]
    pub enclosing: Option<SymbolHandle>,
    #[serde(default)]
    pub context: ReferenceContext,
}
