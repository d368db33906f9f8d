//! Program after redirection, ready for propagation
//!
//! Every method body becomes a `BlockGraph` whose calls are retargeted and
//! whose spans live in the rewritten text of its file. Each file keeps the
//! remapper that undoes the rewrite plus a line index over its original text.

use crate::errors::{Result, VerifierError};
use crate::features::authz_flow::{MethodResolver, MethodView};
use crate::features::flow_graph::BlockGraph;
use crate::features::redirection::{CallResolver, SourceLocationRemapper};
use crate::shared::models::{LineColumn, LineIndex, MethodId, Parameter, ProgramModel, TextSpan};
use rustc_hash::FxHashMap;
use tracing::debug;

struct PreparedMethod {
    id: MethodId,
    file: String,
    parameters: Vec<Parameter>,
    graph: BlockGraph,
}

struct PreparedFile {
    remapper: SourceLocationRemapper,
    lines: LineIndex,
}

pub struct PreparedProgram {
    methods: FxHashMap<MethodId, PreparedMethod>,
    files: FxHashMap<String, PreparedFile>,
    substitutions: usize,
    retargeted_calls: usize,
}

impl PreparedProgram {
    /// Rewrite every file and method body through `resolver`
    ///
    /// Fails on a malformed CFG or a method declared twice.
    pub fn prepare(program: &ProgramModel, resolver: &CallResolver<'_>) -> Result<Self> {
        let mut methods = FxHashMap::default();
        let mut files = FxHashMap::default();
        let mut substitutions = 0;
        let mut retargeted_calls = 0;

        for file in &program.files {
            let rewritten = resolver.rewrite_file(file);
            substitutions += rewritten.substitutions;

            for body in &file.methods {
                let graph = BlockGraph::from_model(&body.id, &body.cfg)?;
                let (graph, retargeted) = resolver.rewrite_graph(&graph, &rewritten.remapper);
                retargeted_calls += retargeted;

                let prepared = PreparedMethod {
                    id: body.id.clone(),
                    file: file.path.clone(),
                    parameters: body.parameters.clone(),
                    graph,
                };
                if methods.insert(body.id.clone(), prepared).is_some() {
                    return Err(VerifierError::model(format!(
                        "Method '{}' is declared more than once",
                        body.id
                    )));
                }
            }

            files.insert(
                file.path.clone(),
                PreparedFile {
                    remapper: rewritten.remapper,
                    lines: LineIndex::new(&file.text),
                },
            );
        }

        debug!(
            methods = methods.len(),
            substitutions,
            retargeted_calls,
            strategy = ?resolver.strategy(),
            "Program prepared"
        );

        Ok(Self {
            methods,
            files,
            substitutions,
            retargeted_calls,
        })
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn substitutions(&self) -> usize {
        self.substitutions
    }

    pub fn retargeted_calls(&self) -> usize {
        self.retargeted_calls
    }

    /// Analyzed-text span → original-text span; identity for unknown files
    pub fn original_span(&self, file: &str, span: TextSpan) -> TextSpan {
        match self.files.get(file) {
            Some(prepared) => prepared.remapper.map_span_to_original(span),
            None => span,
        }
    }

    /// Line/column of an original-text offset
    pub fn position(&self, file: &str, offset: usize) -> LineColumn {
        self.files
            .get(file)
            .map(|prepared| prepared.lines.line_column(offset))
            .unwrap_or(LineColumn::START)
    }
}

impl MethodResolver for PreparedProgram {
    fn resolve(&self, id: &MethodId) -> Option<MethodView<'_>> {
        self.methods.get(id).map(|method| MethodView {
            id: &method.id,
            file: &method.file,
            parameters: &method.parameters,
            cfg: &method.graph,
        })
    }
}
