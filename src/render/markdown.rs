// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render the weekly Markdown digest: one table row per story, then a GitHub section per repository
// role: rendering/markdown
// inputs: &Report, RenderContext
// outputs: Markdown text ending with a newline
// invariants:
// - Cells never contain raw newlines or unescaped pipes
// - Event link text never contains unescaped brackets
// - GitHub section is omitted when there are no event groups
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono_tz::Tz;

use super::RenderContext;
use crate::classify::NEW_ICON;
use crate::duration::NOT_APPLICABLE;
use crate::model::{Comment, Report, ReportRow};
use crate::util::format_report_time;
use crate::window::ReportKind;

const LINE_BREAK: &str = "<br />";

const TABLE_HEADER: &str = "| Type | State | Title | Estimate | Operating time | Review wait | Tasks | PRs | Comments |\n\
                            |:---:|:---:|---|---:|---:|---:|---|---|---|\n";

/// Make text safe for a single table cell.
pub fn escape_cell(text: &str) -> String {
  text.replace('|', "\\|").replace("\r\n", LINE_BREAK).replace('\n', LINE_BREAK)
}

/// Make text safe inside `[...]` link text.
pub fn escape_link_text(text: &str) -> String {
  text.replace('[', "\\[").replace(']', "\\]")
}

fn join_cell<S: AsRef<str>>(lines: &[S]) -> String {
  lines.iter().map(|l| escape_cell(l.as_ref())).collect::<Vec<_>>().join(LINE_BREAK)
}

fn comment_cell(comments: &[Comment], tz: Tz) -> String {
  comments
    .iter()
    .map(|c| {
      let when = c.created_at.map(|at| format_report_time(at, tz)).unwrap_or_default();
      format!("-- {} ---{}{}", when, LINE_BREAK, escape_cell(&c.text))
    })
    .collect::<Vec<_>>()
    .join(LINE_BREAK)
}

pub fn table_row(row: &ReportRow, tz: Tz) -> String {
  let title = if row.is_new {
    format!("{} {}", NEW_ICON, escape_cell(&row.title))
  } else {
    escape_cell(&row.title)
  };

  let cells = [
    row.type_icon.to_string(),
    row.state_icon.to_string(),
    title,
    escape_cell(&row.estimate),
    row.operating_time.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()),
    row.review_wait_time.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()),
    join_cell(&row.tasks),
    join_cell(&row.artifacts),
    comment_cell(&row.comments, tz),
  ];

  format!("| {} |", cells.join(" | "))
}

pub fn render_digest(report: &Report, ctx: &RenderContext) -> String {
  let heading = match ctx.window.kind {
    ReportKind::Daily => "Daily Report",
    ReportKind::Weekly => "Weekly Report",
  };
  let date = ctx.window.now.with_timezone(&ctx.tz).format("%Y/%m/%d");

  let mut out = format!("# {} {}\n\n", heading, date);

  out.push_str(TABLE_HEADER);
  for row in &report.rows {
    out.push_str(&table_row(row, ctx.tz));
    out.push('\n');
  }

  if !report.event_groups.is_empty() {
    out.push_str("\n## GitHub\n");

    for group in &report.event_groups {
      out.push_str(&format!("\n### {}\n\n", group.repo));
      for row in &group.rows {
        out.push_str(&format!("- [{}]({})\n", escape_link_text(&row.heading()), row.link));
      }
    }
  }

  out
}
