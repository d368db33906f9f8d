//! End-to-end authorization scenarios
//!
//! Each test builds a small program model, runs the full pipeline and
//! inspects the AUTHZ001 diagnostics.

mod common;

use authz_verifier::config::VerifierConfig;
use authz_verifier::shared::models::{
    CfgEdgeKind, Expr, MethodId, Operation, ParameterAnnotation, ProgramModel,
};
use authz_verifier::AuthzVerifier;
use common::*;
use pretty_assertions::assert_eq;

fn assign(target: &str, value: Expr) -> Operation {
    Operation::Assign {
        target: target.to_string(),
        value,
        span: None,
    }
}

// ============================================================================
// Confluence
// ============================================================================

#[test]
fn one_branch_check_reports_missing_view() {
    let method = diamond(
        vec![check("secret", "can_view", 10)],
        Vec::new(),
        vec![require("secret", &["can_view"], 50)],
    )
    .build();
    let report = verify(&single_file(vec![method]));

    assert_eq!(missing_lists(&report), vec!["can_view".to_string()]);
    let d = &report.diagnostics[0];
    assert_eq!(d.span.start, 50);
    assert_eq!(d.method, Some(MethodId::new("SecretsController", "Get")));
    assert!(d.message.contains("SecretsController.Get::secret"));
}

#[test]
fn both_branches_check_is_clean() {
    let method = diamond(
        vec![check("secret", "can_view", 10)],
        vec![check("secret", "can_view", 20)],
        vec![require("secret", &["can_view"], 50)],
    )
    .build();
    assert_clean(&verify(&single_file(vec![method])));
}

#[test]
fn confluence_keeps_only_common_permissions() {
    let method = diamond(
        vec![check("secret", "can_view", 10), check("secret", "can_edit", 11)],
        vec![check("secret", "can_view", 20)],
        vec![require("secret", &["can_view", "can_edit"], 50)],
    )
    .build();
    let report = verify(&single_file(vec![method]));
    assert_eq!(missing_lists(&report), vec!["can_edit".to_string()]);
}

#[test]
fn straight_line_checks_accumulate() {
    let method = MethodBuilder::new("SecretsController", "Update")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block("b0", vec![check("secret", "can_view", 1)])
        .block("b1", vec![check("secret", "can_edit", 2)])
        .block("b2", vec![require("secret", &["can_view", "can_edit"], 3)])
        .edge("b0", "b1")
        .edge("b1", "b2")
        .build();
    assert_clean(&verify(&single_file(vec![method])));
}

#[test]
fn throwing_branch_does_not_weaken_merge() {
    let method = diamond(
        vec![check("secret", "can_view", 10)],
        vec![throw()],
        vec![require("secret", &["can_view"], 50)],
    )
    .build();
    assert_clean(&verify(&single_file(vec![method])));
}

#[test]
fn check_on_other_object_does_not_count() {
    let method = MethodBuilder::new("SecretsController", "Get")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .param("other", "Secret")
        .block(
            "b0",
            vec![check("other", "can_view", 1), require("secret", &["can_view"], 2)],
        )
        .build();
    let report = verify(&single_file(vec![method]));
    assert_eq!(report.error_count(), 1);
}

// ============================================================================
// Loops
// ============================================================================

fn looping(pre: Vec<Operation>, body: Vec<Operation>, after: Vec<Operation>) -> ProgramModel {
    let method = MethodBuilder::new("SecretsController", "List")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block("entry", pre)
        .block("header", Vec::new())
        .block("body", body)
        .block("exit", after)
        .edge("entry", "header")
        .edge_kind("header", "body", CfgEdgeKind::TrueBranch)
        .edge_kind("body", "header", CfgEdgeKind::LoopBack)
        .edge_kind("header", "exit", CfgEdgeKind::LoopExit)
        .exit("exit")
        .build();
    single_file(vec![method])
}

#[test]
fn check_inside_loop_does_not_prove_after_loop() {
    let report = verify(&looping(
        Vec::new(),
        vec![check("secret", "can_view", 20)],
        vec![require("secret", &["can_view"], 40)],
    ));
    assert_eq!(missing_lists(&report), vec!["can_view".to_string()]);
}

#[test]
fn check_before_loop_proves_loop_body() {
    let report = verify(&looping(
        vec![check("secret", "can_view", 5)],
        vec![require("secret", &["can_view"], 20)],
        vec![require("secret", &["can_view"], 40)],
    ));
    assert_clean(&report);
    assert!(report.entry_points[0].stats.unvisited_predecessors >= 1);
}

// ============================================================================
// Annotations
// ============================================================================

#[test]
fn annotated_id_parameter_proves_view_only() {
    let method = MethodBuilder::new("SecretsController", "Edit")
        .entry_point()
        .param("user", "User")
        .param("secretId", "Guid")
        .param("secret", "Secret")
        .annotate(ParameterAnnotation::new("secretId", "can_view"))
        .alias("secret", "secretId")
        .block("b0", vec![require("secret", &["can_view", "can_edit"], 7)])
        .build();
    let report = verify(&single_file(vec![method]));
    assert_eq!(missing_lists(&report), vec!["can_edit".to_string()]);
}

#[test]
fn annotation_with_id_parameter_covers_both() {
    let method = MethodBuilder::new("SecretsController", "Show")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .param("secretId", "Guid")
        .annotate(ParameterAnnotation::new("secret", "can_view").with_id_parameter("secretId"))
        .block(
            "b0",
            vec![
                require("secret", &["can_view"], 1),
                require("secretId", &["can_view"], 2),
            ],
        )
        .build();
    assert_clean(&verify(&single_file(vec![method])));
}

#[test]
fn list_annotation_covers_elements() {
    let method = MethodBuilder::new("SecretsController", "Export")
        .entry_point()
        .param("user", "User")
        .param("secrets", "Secret[]")
        .annotate(ParameterAnnotation::new("secrets", "can_view").as_list())
        .block(
            "b0",
            vec![
                assign("item", Expr::element_of(Expr::parameter("secrets"))),
                require_expr(Expr::local("item"), &["can_view"], 3),
                require("secrets", &["can_view"], 4),
            ],
        )
        .build();
    let report = verify(&single_file(vec![method]));
    let flagged: Vec<usize> = report.diagnostics.iter().map(|d| d.span.start).collect();
    assert_eq!(flagged, vec![4]);
}

// ============================================================================
// Relation resolution
// ============================================================================

#[test]
fn member_relation_is_inferred() {
    let method = MethodBuilder::new("SecretsController", "Get")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block(
            "b0",
            vec![
                check_expr(
                    Expr::parameter("secret"),
                    Expr::member("Relations", "CanView"),
                    1,
                ),
                require("secret", &["can_view"], 2),
            ],
        )
        .build();
    assert_clean(&verify(&single_file(vec![method.clone()])));

    let mut config = VerifierConfig::default();
    config.infer_relation_from_member = false;
    let report = verify_with(&single_file(vec![method]), config);
    assert_eq!(report.error_count(), 1);
}

#[test]
fn relation_constant_overrides_inference() {
    let method = MethodBuilder::new("SecretsController", "Get")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block(
            "b0",
            vec![
                check_expr(
                    Expr::parameter("secret"),
                    Expr::member("Relations", "CanView"),
                    1,
                ),
                require("secret", &["viewer"], 2),
            ],
        )
        .build();
    let program = single_file(vec![method]).with_relation("Relations.CanView", "viewer");
    assert_clean(&verify(&program));
}

#[test]
fn unknown_object_shape_is_skipped() {
    let method = MethodBuilder::new("SecretsController", "Get")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block(
            "b0",
            vec![require_expr(Expr::member("secret", "Owner"), &["can_view"], 1)],
        )
        .build();
    assert_clean(&verify(&single_file(vec![method])));
}

// ============================================================================
// Interprocedural descent
// ============================================================================

fn helper_checks(name: &str) -> authz_verifier::shared::models::MethodBody {
    MethodBuilder::new("AuthzHelper", name)
        .param("user", "User")
        .param("target", "Secret")
        .block("h0", vec![check("target", "can_view", 100)])
        .build()
}

fn entry_calling(target: &str) -> authz_verifier::shared::models::MethodBody {
    MethodBuilder::new("SecretsController", "Fetch")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block(
            "b0",
            vec![
                call(
                    "AuthzHelper",
                    target,
                    vec![Expr::parameter("user"), Expr::parameter("secret")],
                    1,
                ),
                require("secret", &["can_view"], 2),
            ],
        )
        .build()
}

#[test]
fn helper_check_flows_back_to_caller() {
    let program = single_file(vec![entry_calling("EnsureView"), helper_checks("EnsureView")]);
    let report = verify(&program);
    assert_clean(&report);
    assert_eq!(report.entry_points[0].stats.descents, 1);

    let report = verify_with(&program, VerifierConfig::default().with_interprocedural(false));
    assert_eq!(report.error_count(), 1);
}

#[test]
fn require_in_callee_reported_in_callee_file() {
    let callee = MethodBuilder::new("SecretStore", "Load")
        .param("item", "Secret")
        .block("s0", vec![require("item", &["can_edit"], 30)])
        .build();
    let entry = MethodBuilder::new("SecretsController", "Get")
        .entry_point()
        .param("user", "User")
        .param("secret", "Secret")
        .block(
            "b0",
            vec![
                check("secret", "can_view", 1),
                call("SecretStore", "Load", vec![Expr::parameter("secret")], 2),
            ],
        )
        .build();
    let program = ProgramModel::new(vec![
        file("Controller.cs", "", Vec::new(), vec![entry]),
        file("Store.cs", "", Vec::new(), vec![callee]),
    ]);
    let report = verify(&program);

    assert_eq!(report.error_count(), 1);
    let d = &report.diagnostics[0];
    assert_eq!(d.file, "Store.cs");
    assert_eq!(d.span.start, 30);
    assert_eq!(d.method, Some(MethodId::new("SecretStore", "Load")));
    assert!(d.message.contains("SecretsController.Get::secret"));
    assert_eq!(d.missing.to_comma_list(), "can_edit");
}

#[test]
fn depth_limit_stops_descent() {
    let outer = MethodBuilder::new("AuthzHelper", "Outer")
        .param("user", "User")
        .param("target", "Secret")
        .block(
            "o0",
            vec![call(
                "AuthzHelper",
                "EnsureView",
                vec![Expr::parameter("user"), Expr::parameter("target")],
                60,
            )],
        )
        .build();
    let program = single_file(vec![entry_calling("Outer"), outer, helper_checks("EnsureView")]);

    assert_clean(&verify_with(&program, VerifierConfig::default().with_max_call_depth(2)));

    let report = verify_with(&program, VerifierConfig::default().with_max_call_depth(1));
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.entry_points[0].stats.skipped_descents, 1);
}

#[test]
fn recursion_terminates() {
    let recursive = MethodBuilder::new("AuthzHelper", "Walk")
        .param("user", "User")
        .param("target", "Secret")
        .block(
            "w0",
            vec![call(
                "AuthzHelper",
                "Walk",
                vec![Expr::parameter("user"), Expr::parameter("target")],
                70,
            )],
        )
        .build();
    let program = single_file(vec![entry_calling("Walk"), recursive]);
    let report = verify(&program);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.entry_points[0].stats.descents, 1);
    assert_eq!(report.entry_points[0].stats.skipped_descents, 1);
}

// ============================================================================
// Determinism and entry selection
// ============================================================================

#[test]
fn repeated_runs_are_identical() {
    let program = single_file(vec![
        diamond(
            vec![check("secret", "can_view", 10)],
            Vec::new(),
            vec![require("secret", &["can_view", "can_edit", "can_delete"], 50)],
        )
        .build(),
        entry_calling("EnsureView"),
        helper_checks("EnsureView"),
    ]);
    let first = verify(&program);
    let second = verify(&program);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(
        missing_lists(&first),
        vec!["can_delete, can_edit, can_view".to_string()]
    );
}

#[test]
fn explicit_entries_override_flags() {
    let helper = helper_checks("EnsureView");
    let lone = MethodBuilder::new("Jobs", "Purge")
        .param("secret", "Secret")
        .block("p0", vec![require("secret", &["can_delete"], 9)])
        .build();
    let program = single_file(vec![helper, lone]);

    assert!(verify(&program).entry_points.is_empty());

    let report = AuthzVerifier::default()
        .verify_entries(&program, &[MethodId::new("Jobs", "Purge")])
        .unwrap();
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.entry_points[0].method, MethodId::new("Jobs", "Purge"));
}
