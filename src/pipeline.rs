// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run: fetch stories and events, assemble the Report, render, then print/write/post
// role: processing/orchestrator
// inputs: EffectiveConfig
// outputs: Rendered report on stdout or --out, or Slack posts
// side_effects: Network calls through the collaborators; writes the --out file; prints to stdout
// invariants:
// - Primary fetch failures abort the run; supplementary story fetches degrade per story
// - GitHub events are only fetched when a user or an events file is configured
// errors: Propagates fetch/render/write/post errors with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::cli::EffectiveConfig;
use crate::github_events;
use crate::model::{RepoEvent, WorkItem};
use crate::publish;
use crate::render::{render, RenderContext, Rendered};
use crate::report::{assemble, dedup_work_items, AssembleOptions};
use crate::tracker_api::{self, TrackerApi};

const OFFLINE_PROJECT: &str = "offline";

fn tracker_source(cfg: &EffectiveConfig) -> Result<Box<dyn TrackerApi>> {
  if let Some(stories) = &cfg.stories_file {
    return tracker_api::make_file_api(stories, cfg.details_file.as_deref());
  }

  if cfg.project_id.is_none() {
    bail!("Provide --project-id (or TRACKER_PROJECT_ID), or --stories-file for offline input");
  }

  match tracker_api::make_default_api(cfg.tracker_token.clone()) {
    Some(api) => Ok(api),
    None => bail!("No tracker token: pass --tracker-token or set TRACKER_TOKEN"),
  }
}

fn fetch_stories(cfg: &EffectiveConfig, api: &dyn TrackerApi) -> Result<Vec<WorkItem>> {
  let project_id = cfg.project_id.as_deref().unwrap_or(OFFLINE_PROJECT);
  let items = tracker_api::fetch_work_items(api, project_id, cfg.owner.as_deref(), cfg.window.updated_after)?;
  Ok(dedup_work_items(items))
}

fn fetch_events(cfg: &EffectiveConfig) -> Result<Vec<RepoEvent>> {
  let api = match (&cfg.events_file, &cfg.github_user) {
    (Some(path), _) => github_events::make_file_api(path)?,
    (None, Some(_)) => github_events::make_default_api(),
    (None, None) => {
      info!("no GitHub user configured; skipping events");
      return Ok(Vec::new());
    }
  };

  let user = cfg.github_user.as_deref().unwrap_or_default();
  github_events::fetch_repo_events(api.as_ref(), user, cfg.window.events_since, cfg.window.now)
}

/// Print to stdout for "-", otherwise write the file (creating parent dirs).
fn emit(out: &str, text: &str) -> Result<()> {
  if out == "-" {
    if text.ends_with('\n') {
      print!("{}", text);
    } else {
      println!("{}", text);
    }
    return Ok(());
  }

  let out_path = std::path::Path::new(out);
  if let Some(parent) = out_path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(out_path, text).with_context(|| format!("writing {}", out_path.display()))?;
  info!(path = %out_path.display(), "wrote report");
  Ok(())
}

pub fn run(cfg: &EffectiveConfig) -> Result<()> {
  let tracker = tracker_source(cfg)?;
  let items = fetch_stories(cfg, tracker.as_ref())?;

  let ids: Vec<u64> = items.iter().map(|item| item.id).collect();
  let details = tracker_api::fetch_all_details(tracker.as_ref(), &ids);

  let events = fetch_events(cfg)?;
  info!(stories = items.len(), events = events.len(), kind = ?cfg.kind, "assembling report");

  let opts = AssembleOptions { new_since: cfg.window.new_since, events: cfg.events };
  let report = assemble(items, &details, events, &opts);

  let ctx = RenderContext {
    window: cfg.window.clone(),
    tz: cfg.tz,
    channel: cfg.slack.as_ref().map(|s| s.channel.clone()),
  };

  match render(&report, &ctx, cfg.format)? {
    Rendered::Slack(messages) => match &cfg.slack {
      Some(target) => {
        let api = publish::make_default_api(target.token.clone());
        publish::post_messages(api.as_ref(), &messages)
      }
      None => emit(&cfg.out, &serde_json::to_string_pretty(&messages)?),
    },
    Rendered::Text(text) => emit(&cfg.out, &text),
  }
}
