/*
 * Call Resolver
 *
 * Applies the redirect map to one file:
 *
 * - TextSplice: every redirect-eligible interface type reference is replaced
 *   by the concrete type name in the file text; each substitution is recorded
 *   in the file's SourceLocationRemapper. Operation spans move into rewritten
 *   coordinates so they describe the rewritten tree, and call targets on a
 *   redirected interface are retargeted.
 *
 * - Ir: call targets are retargeted on the CFG only. The text is untouched
 *   and the remapper stays empty.
 *
 * A type reference whose span does not cover the expected name in the text
 * is skipped.
 */

use crate::config::RedirectStrategy;
use crate::features::flow_graph::BlockGraph;
use crate::features::redirection::domain::{RedirectMap, SourceLocationRemapper};
use crate::shared::models::{MethodId, Operation, SourceFile, TextSpan};
use tracing::{debug, trace};

/// Result of rewriting one file
#[derive(Debug, Clone)]
pub struct RewrittenFile {
    pub path: String,
    pub text: String,
    pub remapper: SourceLocationRemapper,
    pub substitutions: usize,
}

pub struct CallResolver<'a> {
    redirects: &'a RedirectMap,
    strategy: RedirectStrategy,
}

impl<'a> CallResolver<'a> {
    pub fn new(redirects: &'a RedirectMap, strategy: RedirectStrategy) -> Self {
        Self {
            redirects,
            strategy,
        }
    }

    pub fn strategy(&self) -> RedirectStrategy {
        self.strategy
    }

    pub fn retarget(&self, target: &MethodId) -> Option<MethodId> {
        self.redirects.redirect_method(target)
    }

    pub fn rewrite_file(&self, file: &SourceFile) -> RewrittenFile {
        match self.strategy {
            RedirectStrategy::Ir => RewrittenFile {
                path: file.path.clone(),
                text: file.text.clone(),
                remapper: SourceLocationRemapper::new(),
                substitutions: 0,
            },
            RedirectStrategy::TextSplice => self.splice(file),
        }
    }

    fn splice(&self, file: &SourceFile) -> RewrittenFile {
        let mut sites: Vec<(TextSpan, &str, &str)> = file
            .methods
            .iter()
            .flat_map(|m| m.type_references.iter())
            .filter_map(|r| {
                self.redirects
                    .concrete_for(&r.type_name)
                    .map(|concrete| (r.span, r.type_name.as_str(), concrete))
            })
            .collect();
        sites.sort_by_key(|(span, _, _)| (span.start, span.length));
        sites.dedup_by_key(|(span, _, _)| *span);

        let source = file.text.as_str();
        let mut remapper = SourceLocationRemapper::new();
        let mut text = String::with_capacity(source.len());
        let mut cursor = 0;

        for (span, type_name, concrete) in sites {
            if source.get(span.start..span.end()) != Some(type_name) {
                trace!(file = %file.path, start = span.start, type_name, "Type reference does not match text");
                continue;
            }
            if span.start < cursor || !remapper.add_mapping(span.start, span.length, concrete.len()) {
                continue;
            }
            text.push_str(&source[cursor..span.start]);
            text.push_str(concrete);
            cursor = span.end();
        }
        text.push_str(&source[cursor..]);

        let substitutions = remapper.len();
        if substitutions > 0 {
            debug!(file = %file.path, substitutions, "Spliced redirect targets");
        }

        RewrittenFile {
            path: file.path.clone(),
            text,
            remapper,
            substitutions,
        }
    }

    /// Graph with retargeted calls and spans in rewritten coordinates
    ///
    /// Returns the number of retargeted call sites alongside.
    pub fn rewrite_graph(
        &self,
        graph: &BlockGraph,
        remapper: &SourceLocationRemapper,
    ) -> (BlockGraph, usize) {
        let mut retargeted = 0;
        let rewritten = graph.map_operations(|op| {
            let op = if remapper.is_empty() {
                op.clone()
            } else {
                op.map_spans(|span| remapper.map_span_to_rewritten(span))
            };
            match op {
                Operation::Call(mut site) => {
                    if let Some(target) = self.redirects.redirect_method(&site.target) {
                        trace!(from = %site.target, to = %target, "Retargeted call");
                        site.retarget(target);
                        retargeted += 1;
                    }
                    Operation::Call(site)
                }
                other => other,
            }
        });
        (rewritten, retargeted)
    }
}
