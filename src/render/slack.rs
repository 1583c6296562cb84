// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build Slack chat.postMessage payloads (header, tracker attachments, GitHub attachments) from a Report
// role: rendering/slack
// inputs: &Report, RenderContext
// outputs: Vec<SlackMessage> in posting order
// invariants: One attachment per ReportRow and per EventGroup, in report order; empty sections omit their field
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Serialize;

use super::{state_label, RenderContext};
use crate::model::{EventGroup, Report, ReportRow};
use crate::util::format_report_time;
use crate::window::ReportKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackField {
  pub title: String,
  pub value: String,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub short: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackAttachment {
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  pub fields: Vec<SlackField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackMessage {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub channel: Option<String>,
  pub text: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub attachments: Vec<SlackAttachment>,
}

pub fn story_attachment(row: &ReportRow, ctx: &RenderContext) -> SlackAttachment {
  let mut fields: Vec<SlackField> = Vec::new();

  if let Some(timeline) = &row.timeline {
    for (state, at) in timeline.entries() {
      fields.push(SlackField {
        title: state_label(state).to_string(),
        value: format_report_time(at, ctx.tz),
        short: true,
      });
    }
  }

  if !row.tasks.is_empty() {
    fields.push(SlackField {
      title: ":heavy_check_mark: Tasks".into(),
      value: row.tasks.join("\n"),
      short: false,
    });
  }

  if !row.artifacts.is_empty() {
    fields.push(SlackField {
      title: ":merge: PRs".into(),
      value: row.artifacts.join("\n"),
      short: false,
    });
  }

  SlackAttachment {
    title: format!("{} {} ({})", row.type_icon, row.title, row.estimate),
    color: Some(row.state_color.to_string()).filter(|c| !c.is_empty()),
    fields,
  }
}

pub fn repo_attachment(group: &EventGroup) -> SlackAttachment {
  SlackAttachment {
    title: format!(":repo: {}", group.repo),
    color: None,
    fields: group
      .rows
      .iter()
      .map(|row| SlackField { title: row.heading(), value: row.link.clone(), short: false })
      .collect(),
  }
}

pub fn build_messages(report: &Report, ctx: &RenderContext) -> Vec<SlackMessage> {
  let (heading, activity) = match ctx.window.kind {
    ReportKind::Daily => ("Daily Report", "Today's Activity"),
    ReportKind::Weekly => ("Weekly Report", "This Week's Activity"),
  };
  let date = ctx.window.now.with_timezone(&ctx.tz).format("%Y/%m/%d");

  vec![
    SlackMessage {
      channel: ctx.channel.clone(),
      text: format!("*{} {}*", heading, date),
      attachments: Vec::new(),
    },
    SlackMessage {
      channel: ctx.channel.clone(),
      text: format!(":pivotal: *{}*", activity),
      attachments: report.rows.iter().map(|row| story_attachment(row, ctx)).collect(),
    },
    SlackMessage {
      channel: ctx.channel.clone(),
      text: format!(":github: *{}*", activity),
      attachments: report.event_groups.iter().map(repo_attachment).collect(),
    },
  ]
}
