use serde_json::Value;
use test_support::offline_cmd;

fn messages(extra: &[&str]) -> Vec<Value> {
  let out = offline_cmd().args(extra).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn daily_default_is_three_slack_messages() {
  let msgs = messages(&[]);
  assert_eq!(msgs.len(), 3);
  assert_eq!(msgs[0]["text"], "*Daily Report 2025/08/15*");
  assert_eq!(msgs[1]["text"], ":pivotal: *Today's Activity*");
  assert_eq!(msgs[2]["text"], ":github: *Today's Activity*");
  assert!(msgs[0].get("channel").is_none());
}

#[test]
fn story_attachments_carry_timeline_tasks_and_prs() {
  let msgs = messages(&[]);
  let attachments = msgs[1]["attachments"].as_array().unwrap();
  assert_eq!(attachments.len(), 3);

  let feature = &attachments[0];
  assert_eq!(feature["title"], ":star: Checkout flow (3pt)");
  assert_eq!(feature["color"], "#F3F3D3");
  let titles: Vec<&str> = feature["fields"].as_array().unwrap().iter().map(|f| f["title"].as_str().unwrap()).collect();
  assert_eq!(titles, vec![":skier: Started at", ":heavy_check_mark: Tasks", ":merge: PRs"]);
  assert_eq!(feature["fields"][0]["value"], "2025/08/15 02:00:00");
  assert_eq!(feature["fields"][0]["short"], true);

  let bug = &attachments[1];
  let labels: Vec<&str> = bug["fields"].as_array().unwrap().iter().map(|f| f["title"].as_str().unwrap()).collect();
  assert_eq!(
    labels,
    vec![":skier: Started at", ":confetti_ball: Finished at", ":rocket: Delivered at", ":ok_woman: Accepted at", ":merge: PRs"]
  );

  assert_eq!(attachments[2]["title"], ":gear: Bump deps (—)");
  assert_eq!(attachments[2]["fields"], serde_json::json!([]));
}

#[test]
fn report_zone_shifts_times_and_daily_cutoff() {
  let msgs = messages(&["--tz", "Asia/Tokyo"]);
  assert_eq!(msgs[1]["attachments"][0]["fields"][0]["value"], "2025/08/15 11:00:00");

  // local midnight in Tokyo is 2025-08-14T15:00Z, so the 20:00Z issue is in range
  let repo = &msgs[2]["attachments"][0];
  assert_eq!(repo["title"], ":repo: org/app");
  assert_eq!(repo["fields"].as_array().unwrap().len(), 4);
}
