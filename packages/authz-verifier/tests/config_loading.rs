//! Configuration and program-model loading from disk

mod common;

use authz_verifier::config::{ConfigError, Preset, RedirectStrategy, VerifierConfig};
use authz_verifier::{AuthzVerifier, ProgramModel, VerifierError};
use common::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::io::Write;
use tempfile::NamedTempFile;

const MODEL_YAML: &str = r#"
files:
  - path: Api.cs
    text: "class Api { }\n"
    methods:
      - id: { declaring_type: Api, name: Get }
        entry_point: true
        parameters:
          - { name: user, type_name: User }
          - { name: secret, type_name: Secret }
        cfg:
          entry: b0
          exit: b0
          blocks:
            - id: b0
              operations:
                - op: call
                  target: { declaring_type: Authz, name: Demand }
                  arguments:
                    - { kind: parameter, name: secret }
                    - { kind: string_literal, value: can_view }
                  span: { start: 4, length: 3 }
"#;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn yaml_model_loads_by_extension() {
    let file = write_temp(".yaml", MODEL_YAML);
    let program = ProgramModel::load(file.path()).unwrap();
    assert_eq!(program.files.len(), 1);
    assert_eq!(program.files[0].methods[0].cfg.blocks[0].operations.len(), 1);
}

#[test]
fn json_model_roundtrip_through_disk() {
    let program = ProgramModel::load(write_temp(".yaml", MODEL_YAML).path()).unwrap();
    let json = serde_json::to_string(&program).unwrap();
    let reloaded = ProgramModel::load(write_temp(".json", &json).path()).unwrap();
    assert_eq!(program, reloaded);
}

#[test]
fn configured_require_methods_are_honored() {
    let program = ProgramModel::load(write_temp(".yaml", MODEL_YAML).path()).unwrap();

    // `Demand` is not a require method by default
    assert_clean(&verify(&program));

    let config_file = write_temp(
        ".yaml",
        r#"
version: 1
preset: fast
overrides:
  require_methods: [Demand]
  redirect_strategy: ir
"#,
    );
    let config = VerifierConfig::from_yaml_file(config_file.path()).unwrap();
    assert_eq!(config.preset, Preset::Fast);
    assert_eq!(config.redirect_strategy, RedirectStrategy::Ir);

    let report = AuthzVerifier::new(config).verify(&program).unwrap();
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.diagnostics[0].position.column, 5);
}

#[test]
fn malformed_cfg_is_model_error() {
    let broken = MODEL_YAML.replace("exit: b0", "exit: b9");
    let program = ProgramModel::load(write_temp(".yaml", &broken).path()).unwrap();
    let err = AuthzVerifier::default().verify(&program).unwrap_err();
    assert!(matches!(err, VerifierError::Model(_)), "got {:?}", err);
}

#[test]
fn missing_model_file_is_io_error() {
    let err = ProgramModel::load(std::path::Path::new("/nonexistent/model.json")).unwrap_err();
    assert!(matches!(err, VerifierError::Io(_)));
}

#[test]
fn config_without_version_rejected() {
    let file = write_temp(".yaml", "preset: thorough\n");
    let err = VerifierConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVersion));
}

#[quickcheck]
fn qc_depth_validation_matches_limit(depth: usize) -> TestResult {
    if depth > 1000 {
        return TestResult::discard();
    }
    let config = VerifierConfig::default().with_max_call_depth(depth);
    TestResult::from_bool(config.validate().is_ok() == (depth <= 64))
}
