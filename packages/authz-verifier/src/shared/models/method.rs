//! Symbol-level model: types, methods, parameters, annotations

use super::cfg::CfgModel;
use super::span::TextSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable method identity (`DeclaringType.Name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId {
    pub declaring_type: String,
    pub name: String,
}

impl MethodId {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }

    /// Same method name on another declaring type
    pub fn on_type(&self, declaring_type: impl Into<String>) -> Self {
        Self::new(declaring_type, self.name.clone())
    }

    /// Parse `Type.Method`; the last dot separates the method name.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (ty, name) = qualified.rsplit_once('.')?;
        if ty.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(ty, name))
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Interface,
    Class,
}

/// Type declaration discovered in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,

    /// Interfaces this type implements
    #[serde(default)]
    pub implements: Vec<String>,

    /// Method names declared on the type
    #[serde(default)]
    pub methods: Vec<String>,

    /// Explicit redirect declaration on an interface (concrete type name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_redirect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
}

impl TypeDecl {
    pub fn interface(name: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            implements: Vec::new(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
            explicit_redirect: None,
            span: None,
        }
    }

    pub fn class(name: impl Into<String>, implements: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            implements: implements.iter().map(|i| i.to_string()).collect(),
            methods: Vec::new(),
            explicit_redirect: None,
            span: None,
        }
    }

    pub fn with_redirect(mut self, concrete: impl Into<String>) -> Self {
        self.explicit_redirect = Some(concrete.into());
        self
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextSpan>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            span: None,
        }
    }
}

/// Framework-level gate already enforced before the entry point runs
///
/// Shapes: `(X, R)`, `(X, R, id-parameter Y)`, `(X, R, list form)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterAnnotation {
    pub parameter: String,
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_parameter: Option<String>,
    #[serde(default)]
    pub list_form: bool,
}

impl ParameterAnnotation {
    pub fn new(parameter: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            relation: relation.into(),
            id_parameter: None,
            list_form: false,
        }
    }

    pub fn with_id_parameter(mut self, id_parameter: impl Into<String>) -> Self {
        self.id_parameter = Some(id_parameter.into());
        self
    }

    pub fn as_list(mut self) -> Self {
        self.list_form = true;
        self
    }
}

/// Occurrence of a type name in the method's source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    pub type_name: String,
    pub span: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodBody {
    pub id: MethodId,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub annotations: Vec<ParameterAnnotation>,

    /// Type-name occurrences eligible for redirect substitution
    #[serde(default)]
    pub type_references: Vec<TypeReference>,

    /// Declared may-alias pairs of parameter/local names
    #[serde(default)]
    pub aliases: Vec<(String, String)>,

    #[serde(default)]
    pub entry_point: bool,

    pub cfg: CfgModel,
}

impl MethodBody {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub types: Vec<TypeDecl>,

    #[serde(default)]
    pub methods: Vec<MethodBody>,
}
