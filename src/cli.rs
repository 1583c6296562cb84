// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Command-line surface and its normalisation into an EffectiveConfig (env fallbacks, window, validation)
// role: configuration/cli
// inputs: Cli (clap derive); env TRACKER_TOKEN, TRACKER_PROJECT_ID, TRACKER_OWNER, GITHUB_USER, SLACK_API_TOKEN
// outputs: EffectiveConfig with resolved window, zone, format and optional Slack target
// invariants:
// - Flags win over environment; blank env values count as unset
// - Invalid combinations fail here, before any fetch
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;
use clap::Parser;

use crate::events::EventOptions;
use crate::render::OutputFormat;
use crate::util;
use crate::window::{parse_now_override, resolve_window, ReportKind, ReportWindow};

#[derive(Parser, Debug)]
#[command(
    name = "tracker-activity-report",
    version,
    about = "Summarize tracker stories and GitHub activity as a daily or weekly report",
    long_about = None
)]
pub struct Cli {
  /// Report flavour: daily (Slack digest) or weekly (Markdown table)
  #[arg(long, value_enum, default_value_t = ReportKind::Daily)]
  pub kind: ReportKind,

  /// Output format (default: slack for daily, markdown for weekly)
  #[arg(long, value_enum)]
  pub format: Option<OutputFormat>,

  /// Tracker project id (env: TRACKER_PROJECT_ID)
  #[arg(long)]
  pub project_id: Option<String>,

  /// Only stories owned by this tracker user (env: TRACKER_OWNER)
  #[arg(long)]
  pub owner: Option<String>,

  /// Tracker API token (env: TRACKER_TOKEN)
  #[arg(long)]
  pub tracker_token: Option<String>,

  /// GitHub login whose public events are summarized (env: GITHUB_USER)
  #[arg(long)]
  pub github_user: Option<String>,

  /// Natural language span replacing the default window, e.g. "3 days"
  #[arg(long = "for")]
  pub for_str: Option<String>,

  /// IANA timezone for displayed times and the daily midnight cutoff
  #[arg(long, default_value = "UTC")]
  pub tz: String,

  /// Max characters of a comment body in event titles
  #[arg(long, default_value_t = 60)]
  pub comment_width: usize,

  /// Max characters of the parent issue/PR title in comment event titles
  #[arg(long, default_value_t = 50)]
  pub parent_title_width: usize,

  /// Read the story listing from a JSON file instead of the tracker API
  #[arg(long)]
  pub stories_file: Option<PathBuf>,

  /// JSON map of story id to supplementary fields (requires --stories-file)
  #[arg(long)]
  pub details_file: Option<PathBuf>,

  /// Read GitHub events from a JSON file instead of the events API
  #[arg(long)]
  pub events_file: Option<PathBuf>,

  /// Post to this Slack channel instead of printing (needs SLACK_API_TOKEN)
  #[arg(long)]
  pub slack_channel: Option<String>,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Debug logging to stderr (RUST_LOG still wins when set)
  #[arg(long, short)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlackTarget {
  pub channel: String,
  pub token: String,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub kind: ReportKind,
  pub format: OutputFormat,
  pub window: ReportWindow,
  pub tz: Tz,
  pub project_id: Option<String>,
  pub owner: Option<String>,
  pub tracker_token: Option<String>,
  pub github_user: Option<String>,
  pub events: EventOptions,
  pub stories_file: Option<PathBuf>,
  pub details_file: Option<PathBuf>,
  pub events_file: Option<PathBuf>,
  pub slack: Option<SlackTarget>,
  pub out: String,
}

/// Flag value, else a non-blank environment variable.
fn flag_or_env(flag: Option<String>, var: &str) -> Option<String> {
  flag.or_else(|| std::env::var(var).ok()).filter(|v| !v.trim().is_empty())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let tz: Tz = cli
    .tz
    .parse()
    .map_err(|e| anyhow!("--tz {:?} is not an IANA timezone: {}", cli.tz, e))?;

  let now_override = match cli.now_override.as_deref() {
    None => None,
    Some(raw) => match parse_now_override(Some(raw)) {
      Some(now) => Some(now),
      None => bail!("--now-override {:?} is neither RFC3339 nor %Y-%m-%dT%H:%M:%S", raw),
    },
  };

  let window = resolve_window(cli.kind, cli.for_str.as_deref(), util::effective_now(now_override), tz)?;

  let format = cli.format.unwrap_or_else(|| OutputFormat::default_for(cli.kind));

  if cli.details_file.is_some() && cli.stories_file.is_none() {
    bail!("--details-file requires --stories-file");
  }

  let slack = match cli.slack_channel {
    None => None,
    Some(channel) => {
      if format != OutputFormat::Slack {
        bail!("--slack-channel posts Slack messages; it cannot be combined with --format {:?}", format);
      }
      let Some(token) = flag_or_env(None, "SLACK_API_TOKEN") else {
        bail!("--slack-channel needs SLACK_API_TOKEN in the environment");
      };
      Some(SlackTarget { channel, token })
    }
  };

  Ok(EffectiveConfig {
    kind: cli.kind,
    format,
    window,
    tz,
    project_id: flag_or_env(cli.project_id, "TRACKER_PROJECT_ID"),
    owner: flag_or_env(cli.owner, "TRACKER_OWNER"),
    tracker_token: flag_or_env(cli.tracker_token, "TRACKER_TOKEN"),
    github_user: flag_or_env(cli.github_user, "GITHUB_USER"),
    events: EventOptions {
      comment_width: cli.comment_width,
      parent_title_width: cli.parent_title_width,
    },
    stories_file: cli.stories_file,
    details_file: cli.details_file,
    events_file: cli.events_file,
    slack,
    out: cli.out,
  })
}
