// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for text normalization, local time formatting, effective "now", and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; chrono_tz zones; clap CommandFactory
// outputs: Single-line/truncated text, formatted timestamps, man page text
// invariants:
// - cut never splits a char and only appends "..." when text was removed
// - plain output has no newlines and no leading/trailing whitespace
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::CommandFactory;

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn plain(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `width` chars, marking removed text with "...".
pub fn cut(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    return text.to_string();
  }

  let mut out: String = text.chars().take(width).collect();
  out.push_str("...");
  out
}

/// Timestamp as shown in reports: `%Y/%m/%d %H:%M:%S` in the report zone.
pub fn format_report_time(at: DateTime<Utc>, tz: Tz) -> String {
  at.with_timezone(&tz).format("%Y/%m/%d %H:%M:%S").to_string()
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current time is used. Centralizes our handling of test
/// determinism without sprinkling `Utc::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
