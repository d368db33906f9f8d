//! Shared models used across features

pub mod cfg;
pub mod expression;
pub mod method;
pub mod program;
pub mod span;

pub use cfg::{CfgBlock, CfgEdge, CfgEdgeKind, CfgModel};
pub use expression::{CallSite, Expr, Operation};
pub use method::{
    MethodBody, MethodId, Parameter, ParameterAnnotation, SourceFile, TypeDecl, TypeKind,
    TypeReference,
};
pub use program::ProgramModel;
pub use span::{LineColumn, LineIndex, TextSpan};
