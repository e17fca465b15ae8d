//! Integration tests for the compile pipeline: module loading from disk,
//! import resolution, materialization and the emitted Python.


use std::fs;

use fleaux::{
    FleauxError, MaterializationError, ResolutionError, SessionConfig, compile_file,
};
use test_harness::TestHarness;

// =============================================================================
// Compiling programs
// =============================================================================

#[test]
fn test_statement_shapes() {
    let counts = TestHarness::new().count("Shapes.fleaux");
    assert_eq!(counts.import_count, 1);
    assert_eq!(counts.let_count, 1);
    assert_eq!(counts.expr_count, 3);
    assert_eq!(counts.pipeline_count, 8);
}

#[test]
fn test_dependencies_compile_first() {
    let compiled = TestHarness::new().compile_ok("Shapes.fleaux");
    let names: Vec<_> = compiled
        .modules
        .iter()
        .map(|m| m.source_name.as_str())
        .collect();
    assert_eq!(names, vec!["Geometry", "Shapes"]);
    assert_eq!(compiled.root, "fleaux_generated_module_Shapes");
    assert_eq!(
        compiled.root_module().unwrap().imports,
        vec!["fleaux_std_lib", "fleaux_generated_module_Geometry"]
    );
}

#[test]
fn test_unit_names_unique_across_modules() {
    let compiled = TestHarness::new().compile_ok("Shapes.fleaux");
    let units: Vec<_> = compiled
        .modules
        .iter()
        .flat_map(|m| m.units())
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(
        units,
        vec![
            "__fleaux_materialized_func_Square_0",
            "__fleaux_materialized_func_Area_1",
            "__fleaux_materialized_func_Hypot_2",
            "__fleaux_materialized_func_Describe_3",
        ]
    );
}

#[test]
fn test_emitted_python_references_imports() {
    let compiled = TestHarness::new().compile_ok("Shapes.fleaux");
    let emitted = compiled.emit();
    let (name, shapes) = &emitted[1];
    assert_eq!(name, "fleaux_generated_module_Shapes.py");
    assert!(shapes.starts_with("import fleaux_std_lib\nimport fleaux_generated_module_Geometry\n"));
    assert!(shapes.contains("((3, 4) | fleaux_generated_module_Geometry.Area())"));
    assert!(shapes.contains(
        "def __fleaux_materialized_func_Describe_3(w: float, h: float) -> tuple[float, float]:"
    ));
    assert!(shapes.contains("Describe = fleaux_std_lib.make_node(__fleaux_materialized_func_Describe_3)"));
}

#[test]
fn test_qualified_let_carries_qualifier() {
    let compiled = TestHarness::new().compile_ok("Scaling.fleaux");
    let module = compiled.root_module().unwrap();
    let double = module.unit("Double").unwrap();
    assert_eq!(double.name, "__fleaux_materialized_func_Scaling_Double_0");
    assert!(module.unit("Quadruple").is_some());
}

#[test]
fn test_write_to_directory() {
    let out = tempfile::tempdir().unwrap();
    let compiled = TestHarness::new().compile_ok("Shapes.fleaux");
    let written = compiled.write_to(out.path()).unwrap();

    assert_eq!(written.len(), 2);
    let geometry = fs::read_to_string(out.path().join("fleaux_generated_module_Geometry.py")).unwrap();
    assert!(geometry.contains("Square = fleaux_std_lib.make_node(__fleaux_materialized_func_Square_0)"));
}

// =============================================================================
// Module graphs on disk
// =============================================================================

#[test]
fn test_shared_import_compiled_once() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, source: &str| {
        fs::write(dir.path().join(format!("{name}.fleaux")), source).unwrap();
    };
    write("Shared", "let One(x: Number): Number :: x + 1;");
    write("Left", "import Shared;\nlet L(x: Number): Number :: (x) -> Shared.One;");
    write("Right", "let R(x: Number): Number :: (x) -> Shared.One;");
    write("Main", "import Left;\nimport Right;\n(1) -> Left.L -> Right.R -> Println;");

    let compiled = compile_file(&dir.path().join("Main.fleaux"), &SessionConfig::default()).unwrap();
    let names: Vec<_> = compiled
        .modules
        .iter()
        .map(|m| m.source_name.as_str())
        .collect();
    assert_eq!(names, vec!["Shared", "Left", "Right", "Main"]);

    let ids: Vec<_> = compiled.modules.iter().flat_map(|m| m.units()).map(|u| u.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_custom_extension_follows_root_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Lib.flx"), "let Id(x: Any): Any :: x;").unwrap();
    fs::write(dir.path().join("App.flx"), "(1) -> Lib.Id;").unwrap();

    let compiled = compile_file(&dir.path().join("App.flx"), &SessionConfig::default()).unwrap();
    assert_eq!(compiled.modules.len(), 2);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_import_cycle() {
    let err = TestHarness::new().compile_err("cycle/Ping.fleaux");
    assert_eq!(err.module, "Pong");
    match err.error {
        FleauxError::Resolution(ResolutionError::ImportCycle { chain, .. }) => {
            assert_eq!(chain, vec!["Ping", "Pong", "Ping"]);
        }
        other => panic!("expected import cycle, got {other}"),
    }
}

#[test]
fn test_self_import_is_a_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Main.fleaux");
    fs::write(&path, "import Main;\nlet F(x: Number): Number :: x;").unwrap();

    let err = match compile_file(&path, &SessionConfig::default()) {
        Err(fleaux::DriverError::Session(e)) => e,
        Err(e) => panic!("expected a session error, got {e}"),
        Ok(_) => panic!("expected Main importing itself to fail"),
    };
    assert_eq!(
        err.to_string(),
        "in module 'Main': at 1:8: import cycle Main -> Main"
    );
}

#[test]
fn test_missing_import() {
    let err = TestHarness::new().compile_err("errors/MissingImport.fleaux");
    assert_eq!(
        err.to_string(),
        "in module 'MissingImport': at 1:8: unknown module 'Nowhere'"
    );
}

#[test]
fn test_duplicate_parameter() {
    let err = TestHarness::new().compile_err("errors/DuplicateParam.fleaux");
    assert!(matches!(
        err.error,
        FleauxError::Materialization(MaterializationError::DuplicateParameter { .. })
    ));
    assert!(err.to_string().contains("duplicate parameter 'x' in 'Twice'"));
}

#[test]
fn test_unknown_name() {
    let err = TestHarness::new().compile_err("errors/UnknownName.fleaux");
    assert!(matches!(
        err.error,
        FleauxError::Resolution(ResolutionError::UnresolvedName { ref name, .. }) if name == "Frobnicate"
    ));
}

#[test]
fn test_foreign_definition() {
    let err = TestHarness::new().compile_err("errors/ForeignLet.fleaux");
    assert!(matches!(
        err.error,
        FleauxError::Resolution(ResolutionError::ForeignDefinition { .. })
    ));
}

#[test]
fn test_syntax_errors() {
    let harness = TestHarness::new();

    let lex = harness.compile_err("errors/Unterminated.fleaux");
    assert!(lex.error.is_lex());

    let parse = harness.compile_err("errors/MissingSemicolon.fleaux");
    assert!(parse.error.is_parse());
    let rendered = parse
        .error
        .display_with_source(&harness.source("errors/MissingSemicolon.fleaux"));
    assert!(rendered.contains("  2 | (2) -> Println;"));
}
