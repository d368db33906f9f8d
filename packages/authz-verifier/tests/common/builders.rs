//! Test data builders

use authz_verifier::config::VerifierConfig;
use authz_verifier::pipeline::{AuthzVerifier, VerificationReport};
use authz_verifier::shared::models::{
    CallSite, CfgBlock, CfgEdge, CfgEdgeKind, CfgModel, Expr, MethodBody, MethodId, Operation,
    Parameter, ParameterAnnotation, ProgramModel, SourceFile, TextSpan, TypeDecl, TypeReference,
};

/// Builder for a method body and its CFG
///
/// Entry defaults to the first block added, exit to the last.
#[derive(Debug)]
pub struct MethodBuilder {
    id: MethodId,
    parameters: Vec<Parameter>,
    annotations: Vec<ParameterAnnotation>,
    type_references: Vec<TypeReference>,
    aliases: Vec<(String, String)>,
    entry_point: bool,
    blocks: Vec<CfgBlock>,
    edges: Vec<CfgEdge>,
    entry: Option<String>,
    exit: Option<String>,
}

impl MethodBuilder {
    pub fn new(declaring_type: &str, name: &str) -> Self {
        Self {
            id: MethodId::new(declaring_type, name),
            parameters: Vec::new(),
            annotations: Vec::new(),
            type_references: Vec::new(),
            aliases: Vec::new(),
            entry_point: false,
            blocks: Vec::new(),
            edges: Vec::new(),
            entry: None,
            exit: None,
        }
    }

    pub fn entry_point(mut self) -> Self {
        self.entry_point = true;
        self
    }

    pub fn param(mut self, name: &str, type_name: &str) -> Self {
        self.parameters.push(Parameter::new(name, type_name));
        self
    }

    pub fn annotate(mut self, annotation: ParameterAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn alias(mut self, a: &str, b: &str) -> Self {
        self.aliases.push((a.to_string(), b.to_string()));
        self
    }

    pub fn type_ref(mut self, type_name: &str, span: TextSpan) -> Self {
        self.type_references.push(TypeReference {
            type_name: type_name.to_string(),
            span,
        });
        self
    }

    pub fn block(mut self, id: &str, operations: Vec<Operation>) -> Self {
        self.blocks.push(CfgBlock::new(id, operations));
        self
    }

    pub fn edge(self, from: &str, to: &str) -> Self {
        self.edge_kind(from, to, CfgEdgeKind::Sequential)
    }

    pub fn edge_kind(mut self, from: &str, to: &str, kind: CfgEdgeKind) -> Self {
        self.edges.push(CfgEdge::new(from, to, kind));
        self
    }

    pub fn exit(mut self, id: &str) -> Self {
        self.exit = Some(id.to_string());
        self
    }

    pub fn build(self) -> MethodBody {
        let first = self.blocks.first().map(|b| b.id.clone()).unwrap_or_default();
        let last = self.blocks.last().map(|b| b.id.clone()).unwrap_or_default();
        MethodBody {
            id: self.id,
            parameters: self.parameters,
            annotations: self.annotations,
            type_references: self.type_references,
            aliases: self.aliases,
            entry_point: self.entry_point,
            cfg: CfgModel {
                entry: self.entry.unwrap_or(first),
                exit: self.exit.unwrap_or(last),
                blocks: self.blocks,
                edges: self.edges,
            },
        }
    }
}

pub fn file(path: &str, text: &str, types: Vec<TypeDecl>, methods: Vec<MethodBody>) -> SourceFile {
    SourceFile {
        path: path.to_string(),
        text: text.to_string(),
        types,
        methods,
    }
}

pub fn single_file(methods: Vec<MethodBody>) -> ProgramModel {
    ProgramModel::new(vec![file("Api.cs", "", Vec::new(), methods)])
}

pub fn call(declaring_type: &str, name: &str, arguments: Vec<Expr>, at: usize) -> Operation {
    Operation::Call(CallSite::new(
        MethodId::new(declaring_type, name),
        arguments,
        TextSpan::new(at, 1),
    ))
}

/// `authz.Check(user, relation, object)`
pub fn check(object: &str, relation: &str, at: usize) -> Operation {
    check_expr(Expr::parameter(object), Expr::literal(relation), at)
}

pub fn check_expr(object: Expr, relation: Expr, at: usize) -> Operation {
    call(
        "IAuthorizationService",
        "Check",
        vec![Expr::parameter("user"), relation, object],
        at,
    )
}

/// `authz.Require(object, relations...)`
pub fn require(object: &str, relations: &[&str], at: usize) -> Operation {
    require_expr(Expr::parameter(object), relations, at)
}

pub fn require_expr(object: Expr, relations: &[&str], at: usize) -> Operation {
    let mut arguments = vec![object];
    arguments.extend(relations.iter().map(|r| Expr::literal(*r)));
    call("IAuthorizationService", "Require", arguments, at)
}

pub fn throw() -> Operation {
    Operation::Throw { span: None }
}

/// entry → {then, else} → join
pub fn diamond(then_ops: Vec<Operation>, else_ops: Vec<Operation>, join_ops: Vec<Operation>) -> MethodBuilder {
    MethodBuilder::new("SecretsController", "Get")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block("entry", Vec::new())
        .block("then", then_ops)
        .block("else", else_ops)
        .block("join", join_ops)
        .edge_kind("entry", "then", CfgEdgeKind::TrueBranch)
        .edge_kind("entry", "else", CfgEdgeKind::FalseBranch)
        .edge("then", "join")
        .edge("else", "join")
}

pub fn verify(program: &ProgramModel) -> VerificationReport {
    verify_with(program, VerifierConfig::default())
}

pub fn verify_with(program: &ProgramModel, config: VerifierConfig) -> VerificationReport {
    AuthzVerifier::new(config)
        .verify(program)
        .expect("verification failed")
}
