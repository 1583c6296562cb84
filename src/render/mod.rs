// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Presentation layer over the assembled Report: Slack messages, a Markdown digest, or JSON
// role: rendering/namespace
// inputs: &Report, RenderContext (kind, window, timezone, channel)
// outputs: Rendered (text for stdout/file, or Slack message payloads)
// invariants: Pure formatting; no reordering or filtering of rows/groups
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod markdown;
pub mod slack;

use anyhow::Result;
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::{Report, TrackedState};
use crate::window::{ReportKind, ReportWindow};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Slack,
  Markdown,
  Json,
}

impl OutputFormat {
  pub fn default_for(kind: ReportKind) -> Self {
    match kind {
      ReportKind::Daily => OutputFormat::Slack,
      ReportKind::Weekly => OutputFormat::Markdown,
    }
  }
}

#[derive(Debug, Clone)]
pub struct RenderContext {
  pub window: ReportWindow,
  pub tz: Tz,
  pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
  Text(String),
  Slack(Vec<slack::SlackMessage>),
}

/// Label shown next to the first-entry time of a lifecycle state.
pub fn state_label(state: TrackedState) -> &'static str {
  match state {
    TrackedState::Started => ":skier: Started at",
    TrackedState::Finished => ":confetti_ball: Finished at",
    TrackedState::Delivered => ":rocket: Delivered at",
    TrackedState::Accepted => ":ok_woman: Accepted at",
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  window: &'a ReportWindow,
  #[serde(flatten)]
  report: &'a Report,
}

pub fn render(report: &Report, ctx: &RenderContext, format: OutputFormat) -> Result<Rendered> {
  let out = match format {
    OutputFormat::Slack => Rendered::Slack(slack::build_messages(report, ctx)),
    OutputFormat::Markdown => Rendered::Text(markdown::render_digest(report, ctx)),
    OutputFormat::Json => {
      let doc = JsonReport { window: &ctx.window, report };
      Rendered::Text(serde_json::to_string_pretty(&doc)?)
    }
  };

  Ok(out)
}
