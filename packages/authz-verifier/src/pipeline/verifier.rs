/*
 * Authorization Verifier Pipeline
 *
 * Stages:
 * 1. Gathering    : per-file interface/implementer/annotation discovery (rayon)
 * 2. Redirect map : decided only after gathering has joined
 * 3. Alias oracle : union-find over the original program
 * 4. Redirection  : text splice or IR retargeting, per file
 * 5. Propagation  : one single-threaded run per entry point, sorted
 * 6. Reporting    : remap spans to original text, fill line/column,
 *                   sort and dedup
 */

use super::prepared::PreparedProgram;
use super::report::{EntryPointReport, VerificationReport};
use crate::config::VerifierConfig;
use crate::errors::{Result, VerifierError};
use crate::features::authz_flow::{
    normalize, Diagnostic, MethodResolver, PropagationEngine, RelationTable,
};
use crate::features::points_to::UnionFindAliasOracle;
use crate::features::redirection::{CallResolver, GatheringIndex, RedirectMap};
use crate::shared::models::{MethodId, ProgramModel};
use std::time::Instant;
use tracing::{debug, info};

pub struct AuthzVerifier {
    config: VerifierConfig,
}

impl Default for AuthzVerifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl AuthzVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify every method flagged as an entry point
    pub fn verify(&self, program: &ProgramModel) -> Result<VerificationReport> {
        let entries = program
            .methods()
            .filter(|(_, m)| m.entry_point)
            .map(|(_, m)| m.id.clone())
            .collect();
        self.run(program, entries)
    }

    /// Verify the given methods as entry points, whatever their flag says
    pub fn verify_entries(
        &self,
        program: &ProgramModel,
        entries: &[MethodId],
    ) -> Result<VerificationReport> {
        if let Some(unknown) = entries.iter().find(|e| program.find_method(e).is_none()) {
            return Err(VerifierError::model(format!(
                "Unknown entry point '{}'",
                unknown
            )));
        }
        self.run(program, entries.to_vec())
    }

    fn run(&self, program: &ProgramModel, mut entries: Vec<MethodId>) -> Result<VerificationReport> {
        let start = Instant::now();
        self.config.validate()?;
        entries.sort();
        entries.dedup();

        let index = GatheringIndex::build(program, self.config.parallel_gathering);
        let (redirects, warnings) = RedirectMap::from_index(&index);
        info!(
            redirects = redirects.len(),
            ambiguous = warnings.len(),
            "Redirect map decided"
        );

        let oracle = UnionFindAliasOracle::build(program);
        let resolver = CallResolver::new(&redirects, self.config.redirect_strategy);
        let prepared = PreparedProgram::prepare(program, &resolver)?;
        let relations = RelationTable::from_program(program);
        let engine = PropagationEngine::new(&self.config, &oracle, &relations, &prepared);

        let mut diagnostics = Vec::new();
        let mut entry_points = Vec::with_capacity(entries.len());

        for entry in &entries {
            let annotations = index.annotations_for(entry);
            let Some(outcome) = engine.analyze_entry(entry, &annotations) else {
                continue;
            };
            let file = prepared
                .resolve(entry)
                .map(|view| view.file.to_string())
                .unwrap_or_default();

            debug!(
                entry = %entry,
                diagnostics = outcome.diagnostics.len(),
                nodes = outcome.stats.nodes_visited,
                "Entry point analyzed"
            );

            entry_points.push(EntryPointReport {
                method: entry.clone(),
                file,
                diagnostics: outcome.diagnostics.len(),
                stats: outcome.stats,
            });
            diagnostics.extend(outcome.diagnostics);
        }

        let mut diagnostics: Vec<Diagnostic> = diagnostics
            .into_iter()
            .map(|mut d| {
                d.span = prepared.original_span(&d.file, d.span);
                let position = prepared.position(&d.file, d.span.start);
                d.with_position(position)
            })
            .collect();

        if self.config.warn_on_ambiguous_redirect {
            diagnostics.extend(warnings.iter().map(|w| {
                let d = Diagnostic::ambiguous_redirect(w);
                let position = prepared.position(&d.file, d.span.start);
                d.with_position(position)
            }));
        }

        normalize(&mut diagnostics);

        let report = VerificationReport {
            diagnostics,
            entry_points,
            gathering: index.stats(),
            redirects,
            substitutions: prepared.substitutions(),
            retargeted_calls: prepared.retargeted_calls(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            entry_points = report.entry_points.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            duration_ms = report.duration_ms,
            "Verification complete"
        );

        Ok(report)
    }
}
