//! Expression and operation shapes carried by CFG blocks
//!
//! This is the slice of the host semantic model the verifier inspects:
//! call targets, call arguments, and the few reference shapes that can name
//! an object or a relation.

use super::method::MethodId;
use super::span::TextSpan;
use serde::{Deserialize, Serialize};

/// Expression shape as seen at a call argument or assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Method parameter reference
    Parameter { name: String },

    /// Local variable reference
    Local { name: String },

    /// Property or field access (`Relations.CanView`, `secret.Id`)
    Member {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<Box<Expr>>,
        member: String,
    },

    /// Named constant, optionally with its compile-time value
    Constant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },

    StringLiteral { value: String },

    /// Argument wrapper around the passed value
    Argument { inner: Box<Expr> },

    /// Implicit or explicit conversion
    Conversion { inner: Box<Expr> },

    /// Element of a collection (`foreach (var x in xs)` binds `x` to this)
    ElementOf { inner: Box<Expr> },

    /// Anything else
    Unknown,
}

impl Expr {
    pub fn parameter(name: impl Into<String>) -> Self {
        Expr::Parameter { name: name.into() }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Expr::Local { name: name.into() }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Expr::StringLiteral {
            value: value.into(),
        }
    }

    /// `Owner.Member` property reference
    pub fn member(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Expr::Member {
            receiver: Some(Box::new(Expr::Local { name: owner.into() })),
            member: member.into(),
        }
    }

    pub fn argument(inner: Expr) -> Self {
        Expr::Argument {
            inner: Box::new(inner),
        }
    }

    pub fn conversion(inner: Expr) -> Self {
        Expr::Conversion {
            inner: Box::new(inner),
        }
    }

    pub fn element_of(inner: Expr) -> Self {
        Expr::ElementOf {
            inner: Box::new(inner),
        }
    }

    /// Strip argument and conversion wrappers
    pub fn unwrapped(&self) -> &Expr {
        let mut current = self;
        while let Expr::Argument { inner } | Expr::Conversion { inner } = current {
            current = inner.as_ref();
        }
        current
    }
}

/// Call site inside a CFG block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub target: MethodId,
    #[serde(default)]
    pub arguments: Vec<Expr>,
    pub span: TextSpan,
    /// Interface target before redirection; `None` when never retargeted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_target: Option<MethodId>,
}

impl CallSite {
    pub fn new(target: MethodId, arguments: Vec<Expr>, span: TextSpan) -> Self {
        Self {
            target,
            arguments,
            span,
            original_target: None,
        }
    }

    /// Point the call at `target`, remembering the first declared target
    pub fn retarget(&mut self, target: MethodId) {
        let previous = std::mem::replace(&mut self.target, target);
        self.original_target.get_or_insert(previous);
    }

    /// Declared target as written in source
    pub fn declared_target(&self) -> &MethodId {
        self.original_target.as_ref().unwrap_or(&self.target)
    }
}

/// Operation inside a CFG block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Call(CallSite),

    /// `target = value` for a local
    Assign {
        target: String,
        value: Expr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<TextSpan>,
    },

    /// Abnormal exit; nothing after it in the block executes
    Throw {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<TextSpan>,
    },

    Other {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<TextSpan>,
    },
}

impl Operation {
    pub fn span(&self) -> Option<TextSpan> {
        match self {
            Operation::Call(site) => Some(site.span),
            Operation::Assign { span, .. }
            | Operation::Throw { span }
            | Operation::Other { span } => *span,
        }
    }

    /// Copy with every span passed through `f`
    pub fn map_spans(&self, mut f: impl FnMut(TextSpan) -> TextSpan) -> Operation {
        let mut op = self.clone();
        match &mut op {
            Operation::Call(site) => site.span = f(site.span),
            Operation::Assign { span, .. }
            | Operation::Throw { span }
            | Operation::Other { span } => *span = span.map(&mut f),
        }
        op
    }
}
