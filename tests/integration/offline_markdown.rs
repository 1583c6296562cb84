use test_support::{init_insta, offline_cmd};

fn weekly_digest() -> String {
  let out = offline_cmd().args(["--kind", "weekly"]).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  String::from_utf8(out.stdout).unwrap()
}

#[test]
fn weekly_table_rows() {
  let md = weekly_digest();
  assert!(md.starts_with("# Weekly Report 2025/08/15\n\n| Type | State | Title |"));
  assert!(md.contains(
    "| :star: | :construction: | :new: Checkout flow | 3pt | 2h | — | :ballot_box_with_check: sketch api<br />:white_large_square: write tests | org/app/15 | -- 2025/08/15 03:00:00 ---<br />Kickoff \\| notes |"
  ));
  assert!(md.contains("| :bug: | :ok_woman: | Fix crash on save | — | 1d | 1h |"));
  assert!(md.contains("| :gear: | - | :new: Bump deps | — | — | — |"));
}

#[test]
fn weekly_github_section() {
  init_insta();
  let md = weekly_digest();
  let (_, github) = md.split_once("## GitHub").unwrap();
  insta::assert_snapshot!(github.trim(), @r"
  ### org/app

  - [:merge: :new: Add checkout flow](https://github.com/org/app/pull/15)
  - [:speech_balloon: Crash on save](https://github.com/org/app/issues/3)
  - [:speech_balloon: Yesterday's issue](https://github.com/org/app/issues/2)
  - [:speech_balloon: Fixed in #12 (Crash on save)](https://github.com/org/app/issues/3#issuecomment-1)

  ### org/lib

  - [:merge: :clap: Bump serde](https://github.com/org/lib/pull/4)
  ");
}
