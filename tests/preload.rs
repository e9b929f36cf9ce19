use op_preload::{
    AttrValue, CompilerContext, ConfigSource, DataType, DryRunCompiler, EntryOutcome, JitMode,
    OperationRegistry, PreloadError, RegistryState, SchemaError, Stage, TensorDesc,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/preload.json")
}

fn text_registry(text: &str) -> OperationRegistry {
    OperationRegistry::new(ConfigSource::Text(text.to_string())).expect("valid config")
}

#[test]
fn add_compiles_and_bad_divide_is_skipped() {
    let mut registry = text_registry(
        r#"{"Operations": [
            {"name": "Add", "preload_list": [
                {"input_shape": "1,1,1;1,1,1", "input_type": "uint8;uint8",
                 "output_shape": "1,1,1", "output_type": "uint8"}
            ]},
            {"name": "Divide", "preload_list": [
                {"input_shape": "1,1,1", "input_type": "uint8",
                 "output_shape": "1,1,1", "output_type": "uint8"}
            ]}
        ]}"#,
    );
    let mut compiler = DryRunCompiler::new();
    let report = registry.preload(&mut compiler, &mut CompilerContext::new());

    assert_eq!(registry.state(), RegistryState::Done);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].outcome, EntryOutcome::Compiled { calls: 1 });
    assert!(matches!(
        report.records[1].outcome,
        EntryOutcome::Skipped { stage: Stage::Shape, .. }
    ));
    assert_eq!(compiler.calls().len(), 1);
    assert_eq!(compiler.calls()[0].family_id, "Add");
}

#[test]
fn duplicate_names_fail_construction() {
    let err = OperationRegistry::new(ConfigSource::Text(
        r#"{"Operations": [{"name": "Add"}, {"name": "Add"}]}"#.to_string(),
    ))
    .expect_err("duplicate name");
    assert!(matches!(
        err,
        PreloadError::Schema(SchemaError::DuplicateName(ref name)) if name == "Add"
    ));
}

#[test]
fn fixture_file_runs_to_completion() {
    let mut registry =
        OperationRegistry::new(ConfigSource::Path(fixture())).expect("fixture is valid");
    let mut compiler = DryRunCompiler::new();
    let mut ctx = CompilerContext::new();
    let report = registry.preload(&mut compiler, &mut ctx);

    let summary: Vec<_> = report
        .records
        .iter()
        .map(|r| (r.operation.as_str(), r.index, r.outcome.is_ok()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Add", 0, true),
            ("Add", 1, true),
            ("Divide", 0, false),
            ("Split", 0, true),
            ("Merge", 0, true),
            ("Sort", 0, true),
            ("SortIdx", 0, true),
            ("Reduce", 0, true),
            ("Rotate", 0, true),
        ]
    );
    // Add x2, Split, Merge, Sort, SortIdx, Reduce x4, Rotate x3.
    assert_eq!(report.totals.compile_calls, 13);
    assert_eq!(compiler.calls().len(), 13);
    assert_eq!(report.totals.skipped, 1);
}

#[test]
fn sort_idx_axis_zero_reaches_compiler_as_last_axis() {
    let mut registry = OperationRegistry::new(ConfigSource::Path(fixture())).expect("fixture");
    let mut compiler = DryRunCompiler::new();
    registry.preload(&mut compiler, &mut CompilerContext::new());

    let sort_idx = compiler
        .calls()
        .iter()
        .find(|c| c.family_id == "Sort" && c.outputs[0].dtype == DataType::Int32)
        .expect("SortIdx call");
    assert_eq!(sort_idx.inputs[0], TensorDesc::new(vec![32, 16], DataType::Float16));
    assert_eq!(sort_idx.inputs[1], TensorDesc::index(2));
    assert_eq!(sort_idx.outputs[0].shape, vec![32, 16]);

    let loader = registry.loader("SortIdx").expect("SortIdx loader");
    let op = registry.document().get_operation("SortIdx").expect("SortIdx op");
    let parsed = op_preload::parse::parse_entry(&op.preload_list[0]).expect("parses");
    let calls = loader.build_calls(&parsed).expect("builds");
    assert_eq!(calls[0].descriptor.attrs.get("axis"), Some(&AttrValue::Int(1)));
}

#[test]
fn compound_entries_share_one_mode() {
    let mut registry = OperationRegistry::new(ConfigSource::Path(fixture())).expect("fixture");
    let mut compiler = DryRunCompiler::new();
    registry.preload(&mut compiler, &mut CompilerContext::new());

    let reduce: Vec<_> = compiler
        .calls()
        .iter()
        .filter(|c| c.family_id.starts_with("Reduce"))
        .collect();
    assert_eq!(reduce.len(), 4);
    assert!(reduce.iter().all(|c| c.mode == JitMode::Enable));

    let adds: Vec<_> = compiler.calls().iter().filter(|c| c.family_id == "Add").collect();
    assert!(adds.iter().all(|c| c.mode == JitMode::Disable));
}

#[test]
fn check_matches_run_without_compiling() {
    let registry = OperationRegistry::new(ConfigSource::Path(fixture())).expect("fixture");
    let report = registry.check();
    assert_eq!(report.totals.compile_calls, 13);
    assert_eq!(report.totals.skipped, 1);
    assert_eq!(registry.state(), RegistryState::LoadersRegistered);
}

#[test]
fn report_serializes_to_json() {
    let mut registry = OperationRegistry::new(ConfigSource::Path(fixture())).expect("fixture");
    let report = registry.preload(&mut DryRunCompiler::new(), &mut CompilerContext::new());
    let json = serde_json::to_value(&report).expect("serializable");
    assert_eq!(json["totals"]["entries"], 9);
    assert_eq!(json["records"][2]["outcome"]["status"], "skipped");
    assert_eq!(json["records"][2]["outcome"]["stage"], "shape");
}

#[test]
fn extreme_dimensions_skip_only_their_entry() {
    let mut registry = OperationRegistry::new(ConfigSource::Text(
        r#"{"Operations": [
            {"name": "Merge", "preload_list": [
                {"input_shape": "2,2,9223372036854775807;2,2,9223372036854775807",
                 "input_type": "uint8;uint8",
                 "output_shape": "2,2,1", "output_type": "uint8"}
            ]},
            {"name": "Add", "preload_list": [
                {"input_shape": "1,1,1;1,1,1", "input_type": "uint8;uint8",
                 "output_shape": "1,1,1", "output_type": "uint8"}
            ]}
        ]}"#
        .to_string(),
    ))
    .expect("valid config");
    let mut compiler = DryRunCompiler::new();
    let report = registry.preload(&mut compiler, &mut CompilerContext::new());

    assert_eq!(registry.state(), RegistryState::Done);
    assert!(matches!(
        report.records[0].outcome,
        EntryOutcome::Skipped { stage: Stage::Shape, .. }
    ));
    assert_eq!(report.records[1].outcome, EntryOutcome::Compiled { calls: 1 });
    assert_eq!(compiler.calls().len(), 1);
}
