use predicates::prelude::*;
use test_support::{cmd_bin, fixture_path, BIN, NOW};

#[test]
fn errors_without_a_story_source() {
  cmd_bin(BIN)
    .args(["--now-override", NOW])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide --project-id"));
}

#[test]
fn errors_without_a_tracker_token() {
  cmd_bin(BIN)
    .args(["--now-override", NOW, "--project-id", "42"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No tracker token"));
}

#[test]
fn rejects_unknown_timezone() {
  cmd_bin(BIN)
    .args(["--tz", "Mars/Olympus"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--tz"));
}

#[test]
fn rejects_unparsable_for_phrase() {
  cmd_bin(BIN)
    .args(["--now-override", NOW, "--for", "whenever"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--for"));
}

#[test]
fn slack_channel_requires_token() {
  cmd_bin(BIN)
    .args(["--now-override", NOW, "--slack-channel", "#daily"])
    .arg("--stories-file")
    .arg(fixture_path("stories.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("SLACK_API_TOKEN"));
}

#[test]
fn missing_stories_file_names_the_path() {
  cmd_bin(BIN)
    .args(["--now-override", NOW, "--stories-file", "does/not/exist.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does/not/exist.json"));
}
