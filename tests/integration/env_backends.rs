use predicates::prelude::*;
use serde_json::Value;
use test_support::{cmd_bin, read_fixture_json, read_fixture_text, BIN, NOW};

fn env_cmd() -> assert_cmd::Command {
  let mut cmd = cmd_bin(BIN);
  cmd
    .args(["--now-override", NOW, "--project-id", "42", "--owner", "jc"])
    .env("ATR_TEST_STORIES_JSON", read_fixture_text("stories.json"));
  cmd
}

#[test]
fn env_listing_without_details_degrades_per_story() {
  let out = env_cmd().args(["--format", "json"]).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();

  let rows = v["rows"].as_array().unwrap();
  assert_eq!(rows.len(), 3);
  assert_eq!(rows[0]["operating_time"], "—");
  assert_eq!(rows[0]["artifacts"], serde_json::json!([]));
  assert_eq!(v["event_groups"], serde_json::json!([]));
}

#[test]
fn env_details_and_events_flow_through() {
  let details: Value = read_fixture_json("details.json");
  let out = env_cmd()
    .args(["--format", "json", "--github-user", "jc"])
    .env("ATR_TEST_STORY_DETAILS_JSON", details.to_string())
    .env("ATR_TEST_EVENTS_JSON", read_fixture_text("events.json"))
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();

  assert_eq!(v["rows"][0]["operating_time"], "2h");
  assert_eq!(v["event_groups"].as_array().unwrap().len(), 2);
}

#[test]
fn broken_listing_fails_the_run() {
  cmd_bin(BIN)
    .args(["--now-override", NOW, "--project-id", "42"])
    .env("ATR_TEST_STORIES_JSON", "not json")
    .assert()
    .failure()
    .stderr(predicate::str::contains("ATR_TEST_STORIES_JSON"));
}

#[test]
fn broken_event_stream_fails_the_run() {
  env_cmd()
    .args(["--github-user", "jc"])
    .env("ATR_TEST_EVENTS_JSON", "{\"message\": \"rate limited\"}")
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a JSON array"));
}

#[test]
fn slack_post_succeeds_silently() {
  env_cmd()
    .args(["--slack-channel", "#daily"])
    .env("SLACK_API_TOKEN", "xoxb-test")
    .env("ATR_TEST_SLACK_RESPONSE_JSON", "{\"ok\": true}")
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
}

#[test]
fn slack_rejection_fails_the_run() {
  env_cmd()
    .args(["--slack-channel", "#nowhere"])
    .env("SLACK_API_TOKEN", "xoxb-test")
    .env("ATR_TEST_SLACK_RESPONSE_JSON", "{\"ok\": false, \"error\": \"channel_not_found\"}")
    .assert()
    .failure()
    .stderr(predicate::str::contains("channel_not_found"));
}
