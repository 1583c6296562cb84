use jsonschema::validator_for;
use test_support::offline_cmd;

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

#[test]
fn daily_and_weekly_json_conform_to_schema() {
  let compiled = compile_schema("report.schema.json");

  for kind in ["daily", "weekly"] {
    let out = offline_cmd().args(["--format", "json", "--kind", kind]).output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(compiled.validate(&v).is_ok(), "schema validation failed for {} JSON", kind);
  }
}
