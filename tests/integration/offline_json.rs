use serde_json::Value;
use test_support::offline_cmd;

fn run_json(extra: &[&str]) -> Value {
  let out = offline_cmd().args(["--format", "json"]).args(extra).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn duplicate_listings_collapse_to_one_row_per_story() {
  let v = run_json(&[]);
  let ids: Vec<u64> = v["rows"].as_array().unwrap().iter().map(|r| r["id"].as_u64().unwrap()).collect();
  assert_eq!(ids, vec![101, 102, 103]);
  assert_eq!(v["window"]["kind"], "daily");
}

#[test]
fn rows_are_enriched_from_details() {
  let v = run_json(&[]);
  let rows = v["rows"].as_array().unwrap();

  let feature = &rows[0];
  assert_eq!(feature["estimate"], "3pt");
  assert_eq!(feature["is_new"], true);
  assert_eq!(feature["operating_time"], "2h");
  assert_eq!(feature["review_wait_time"], "—");
  assert_eq!(feature["artifacts"], serde_json::json!(["org/app/15"]));
  assert_eq!(
    feature["tasks"],
    serde_json::json!([":ballot_box_with_check: sketch api", ":white_large_square: write tests"])
  );
  assert_eq!(feature["timeline"]["started"], "2025-08-15T02:00:00Z");
  assert_eq!(feature["timeline"]["accepted"], Value::Null);

  let bug = &rows[1];
  assert_eq!(bug["estimate"], "—");
  assert_eq!(bug["is_new"], false);
  assert_eq!(bug["operating_time"], "1d");
  assert_eq!(bug["review_wait_time"], "1h");
  // no fetched pull requests for 102, so the listing's own survive
  assert_eq!(bug["artifacts"], serde_json::json!(["org/app/12"]));
  assert_eq!(bug["timeline"]["started"], "2025-08-10T09:00:00Z");

  let chore = &rows[2];
  assert_eq!(chore["state_icon"], "-");
  assert!(chore.get("timeline").is_none());
  assert_eq!(chore["operating_time"], "—");
  assert!(chore.get("review_wait_time").is_none());
}

#[test]
fn events_are_grouped_deduplicated_and_windowed() {
  let v = run_json(&[]);
  let groups = v["event_groups"].as_array().unwrap();
  let repos: Vec<&str> = groups.iter().map(|g| g["repo"].as_str().unwrap()).collect();
  assert_eq!(repos, vec!["org/app", "org/lib"]);

  let keys: Vec<&str> = groups[0]["rows"].as_array().unwrap().iter().map(|r| r["key"].as_str().unwrap()).collect();
  assert_eq!(
    keys,
    vec![
      "pull_request-https://github.com/org/app/pull/15",
      "closed_issue-https://github.com/org/app/issues/3",
      "comment-https://github.com/org/app/issues/3#issuecomment-1",
    ]
  );
  assert_eq!(groups[0]["rows"][2]["title"], "Fixed in #12 (Crash on save)");
}

#[test]
fn narrow_comment_width_truncates_titles() {
  let v = run_json(&["--comment-width", "5", "--parent-title-width", "5"]);
  assert_eq!(v["event_groups"][0]["rows"][2]["title"], "Fixed... (Crash...)");
}

#[test]
fn for_phrase_widens_every_cutoff() {
  let v = run_json(&["--for", "2 days"]);
  assert_eq!(v["window"]["events_since"], "2025-08-13T12:00:00Z");
  assert_eq!(v["rows"][2]["is_new"], true);
  assert_eq!(v["event_groups"][0]["rows"].as_array().unwrap().len(), 4);
}

#[test]
fn out_writes_a_file_instead_of_stdout() {
  let dir = test_support::tempdir();
  let path = dir.path().join("nested").join("report.json");

  let out = offline_cmd().args(["--format", "json", "--out"]).arg(&path).output().unwrap();
  assert!(out.status.success());
  assert!(out.stdout.is_empty());

  let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
  assert_eq!(written["rows"].as_array().unwrap().len(), 3);
}
