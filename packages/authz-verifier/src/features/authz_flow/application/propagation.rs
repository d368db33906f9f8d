/*
 * Authorization Propagation Engine
 *
 * Must-dataflow over the CFG of one entry point.
 *
 * # Algorithm
 * - Single forward pass in reverse postorder
 * - In-state of a node: meet (⊓) of the out-states of its already-visited
 *   predecessors, starting from ⊤; the entry node takes the initial state
 * - Loop back-edges reach an unvisited predecessor and contribute nothing;
 *   there is no fixpoint iteration
 * - Throw: state becomes ⊤ and the rest of the block is skipped
 *
 * # Transfer (call sites, in priority order)
 * 1. Check   (subject, permission, object): WithPermission(location, p)
 *    when the object resolves to exactly one location
 * 2. Require (object, permission...): one diagnostic per location with a
 *    non-empty missing set; state unchanged
 * 3. Other:  interprocedural descent into the (already redirected) target
 *
 * # Time Complexity
 * O(Σ nodes × operations) over the entry point and every descended callee,
 * each lattice step O(|locations| × |permissions|)
 */

use super::initial_state::build_initial_state;
use super::resolution::{Frame, OperandResolver};
use crate::config::VerifierConfig;
use crate::features::authz_flow::domain::{CallClassifier, CallKind, Diagnostic};
use crate::features::authz_flow::ports::{MethodResolver, MethodView, SemanticModel};
use crate::features::flow_graph::{reverse_postorder, ControlFlowGraph, NodeId};
use crate::features::permissions::{AbstractLocation, AuthorizationLattice, LocationSet, PermissionSet};
use crate::features::points_to::{AliasOracle, ProgramPoint, Reference};
use crate::shared::models::{CallSite, MethodId, Operation, ParameterAnnotation};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Propagation statistics for one entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationStats {
    /// CFG nodes visited, callees included
    pub nodes_visited: usize,

    pub checks_applied: usize,

    pub requires_verified: usize,

    pub descents: usize,

    /// Descents refused by the depth bound or the recursion guard
    pub skipped_descents: usize,

    /// Predecessors not yet visited at a confluence (loop back-edges)
    pub unvisited_predecessors: usize,

    pub max_depth: usize,
}

#[derive(Debug, Clone)]
pub struct PropagationOutcome {
    /// State at the entry point's exit; ⊤ when the exit is unreachable
    pub exit_state: AuthorizationLattice,

    /// Raw diagnostics, spans in analyzed-text coordinates
    pub diagnostics: Vec<Diagnostic>,

    pub stats: PropagationStats,
}

/// Mutable walk state shared across descents
struct Walk {
    diagnostics: Vec<Diagnostic>,
    stats: PropagationStats,
    /// Methods currently being analyzed (recursion guard)
    stack: Vec<MethodId>,
}

pub struct PropagationEngine<'a> {
    config: &'a VerifierConfig,
    classifier: CallClassifier,
    oracle: &'a dyn AliasOracle,
    operands: OperandResolver<'a>,
    methods: &'a dyn MethodResolver,
}

impl<'a> PropagationEngine<'a> {
    pub fn new(
        config: &'a VerifierConfig,
        oracle: &'a dyn AliasOracle,
        semantics: &'a dyn SemanticModel,
        methods: &'a dyn MethodResolver,
    ) -> Self {
        Self {
            config,
            classifier: CallClassifier::from_config(config),
            oracle,
            operands: OperandResolver::new(oracle, semantics, config.infer_relation_from_member),
            methods,
        }
    }

    /// Seed state for an entry point from its parameter annotations
    pub fn initial_state(
        &self,
        view: &MethodView<'_>,
        annotations: &[ParameterAnnotation],
    ) -> AuthorizationLattice {
        let frame = Frame::entry(view.id, view.file);
        let point = ProgramPoint::new(view.cfg.entry(), 0);
        build_initial_state(&frame, annotations, &self.operands, point)
    }

    /// Analyze one entry point; `None` when it has no body
    pub fn analyze_entry(
        &self,
        entry: &MethodId,
        annotations: &[ParameterAnnotation],
    ) -> Option<PropagationOutcome> {
        let view = self.methods.resolve(entry)?;
        let initial = self.initial_state(&view, annotations);
        Some(self.analyze(&view, initial))
    }

    pub fn analyze(&self, view: &MethodView<'_>, initial: AuthorizationLattice) -> PropagationOutcome {
        let frame = Frame::entry(view.id, view.file);
        let mut walk = Walk {
            diagnostics: Vec::new(),
            stats: PropagationStats::default(),
            stack: vec![view.id.clone()],
        };

        let exit_state = self.propagate(view, &frame, initial, &mut walk);

        debug!(
            method = %view.id,
            nodes = walk.stats.nodes_visited,
            descents = walk.stats.descents,
            diagnostics = walk.diagnostics.len(),
            "Propagation complete"
        );

        PropagationOutcome {
            exit_state,
            diagnostics: walk.diagnostics,
            stats: walk.stats,
        }
    }

    fn propagate(
        &self,
        view: &MethodView<'_>,
        frame: &Frame<'_>,
        initial: AuthorizationLattice,
        walk: &mut Walk,
    ) -> AuthorizationLattice {
        let cfg = view.cfg;
        let entry = cfg.entry();
        let mut out: Vec<Option<AuthorizationLattice>> = vec![None; cfg.node_count()];

        for node in reverse_postorder(cfg) {
            let mut state = if node == entry {
                initial.clone()
            } else {
                Self::confluence(cfg, node, &out, walk)
            };
            walk.stats.nodes_visited += 1;

            for (index, op) in cfg.operations(node).iter().enumerate() {
                match op {
                    Operation::Call(site) => {
                        let point = ProgramPoint::new(node, index);
                        state = self.transfer(site, state, frame, point, walk);
                    }
                    Operation::Throw { .. } => {
                        state = AuthorizationLattice::top();
                        break;
                    }
                    Operation::Assign { .. } | Operation::Other { .. } => {}
                }
            }

            out[node.index()] = Some(state);
        }

        out[cfg.exit().index()]
            .take()
            .unwrap_or_else(AuthorizationLattice::top)
    }

    fn confluence(
        cfg: &dyn ControlFlowGraph,
        node: NodeId,
        out: &[Option<AuthorizationLattice>],
        walk: &mut Walk,
    ) -> AuthorizationLattice {
        let mut state = AuthorizationLattice::top();
        for pred in cfg.predecessors(node) {
            match &out[pred.index()] {
                Some(pred_state) => state = state.meet(pred_state),
                None => {
                    walk.stats.unvisited_predecessors += 1;
                    if cfg.is_back_edge(pred, node) {
                        trace!(from = %pred, to = %node, "Back-edge not iterated");
                    }
                }
            }
        }
        state
    }

    fn transfer(
        &self,
        site: &CallSite,
        state: AuthorizationLattice,
        frame: &Frame<'_>,
        point: ProgramPoint,
        walk: &mut Walk,
    ) -> AuthorizationLattice {
        match self.classifier.classify_site(site) {
            CallKind::Check => self.apply_check(site, state, frame, point, walk),
            CallKind::Require => {
                self.verify_require(site, &state, frame, point, walk);
                state
            }
            CallKind::Other => self.descend(site, state, frame, point, walk),
        }
    }

    fn apply_check(
        &self,
        site: &CallSite,
        state: AuthorizationLattice,
        frame: &Frame<'_>,
        point: ProgramPoint,
        walk: &mut Walk,
    ) -> AuthorizationLattice {
        let layout = self.config.check_argument_layout;
        let locations = self
            .operands
            .locations(frame, site.arguments.get(layout.object_index), point);
        let permission = self
            .operands
            .permission(site.arguments.get(layout.permission_index));

        match (single(&locations), permission) {
            (Some(location), Some(permission)) => {
                walk.stats.checks_applied += 1;
                state.with_permission(location, permission)
            }
            _ => {
                trace!(
                    method = %frame.method,
                    target = %site.target,
                    locations = locations.len(),
                    "Check skipped: object or permission unresolved"
                );
                state
            }
        }
    }

    fn verify_require(
        &self,
        site: &CallSite,
        state: &AuthorizationLattice,
        frame: &Frame<'_>,
        point: ProgramPoint,
        walk: &mut Walk,
    ) {
        let locations = self.operands.locations(frame, site.arguments.first(), point);
        let required: PermissionSet = site
            .arguments
            .iter()
            .skip(1)
            .filter_map(|arg| self.operands.permission(Some(arg)))
            .collect();

        if locations.is_empty() || required.is_empty() {
            trace!(
                method = %frame.method,
                target = %site.target,
                "Require skipped: object or permissions unresolved"
            );
            return;
        }

        walk.stats.requires_verified += 1;
        for location in &locations {
            let missing = state.missing_permissions(location, &required);
            if missing.is_empty() {
                continue;
            }
            debug!(
                method = %frame.method,
                location = %location,
                missing = %missing,
                "Missing permission"
            );
            walk.diagnostics.push(Diagnostic::missing_permission(
                frame.file,
                site.span,
                frame.method,
                location,
                missing,
            ));
        }
    }

    fn descend(
        &self,
        site: &CallSite,
        state: AuthorizationLattice,
        frame: &Frame<'_>,
        point: ProgramPoint,
        walk: &mut Walk,
    ) -> AuthorizationLattice {
        if !self.config.interprocedural {
            return state;
        }
        let Some(callee) = self.methods.resolve(&site.target) else {
            trace!(target = %site.target, "No body; call not followed");
            return state;
        };
        if walk.stack.contains(&site.target) {
            debug!(target = %site.target, "Recursive call not re-entered");
            walk.stats.skipped_descents += 1;
            return state;
        }
        if frame.depth >= self.config.max_call_depth {
            debug!(
                target = %site.target,
                depth = frame.depth,
                "Call depth limit reached"
            );
            walk.stats.skipped_descents += 1;
            return state;
        }

        let callee_entry = ProgramPoint::new(callee.cfg.entry(), 0);
        let mut bindings: FxHashMap<AbstractLocation, LocationSet> = FxHashMap::default();
        for (parameter, argument) in callee.parameters.iter().zip(&site.arguments) {
            let actual = self.operands.locations(frame, Some(argument), point);
            if actual.is_empty() {
                continue;
            }
            let formal = Reference::parameter(parameter.name.as_str());
            for location in self.oracle.locations(callee.id, &formal, callee_entry) {
                bindings
                    .entry(location)
                    .or_default()
                    .extend(actual.iter().cloned());
            }
        }

        let depth = frame.depth + 1;
        let callee_frame = Frame::callee(callee.id, callee.file, depth, bindings);
        walk.stats.descents += 1;
        walk.stats.max_depth = walk.stats.max_depth.max(depth);
        walk.stack.push(site.target.clone());
        let exit = self.propagate(&callee, &callee_frame, state, walk);
        walk.stack.pop();
        exit
    }
}

fn single(locations: &LocationSet) -> Option<&AbstractLocation> {
    if locations.len() == 1 {
        locations.iter().next()
    } else {
        None
    }
}
