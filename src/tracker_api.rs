// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Tracker collaborator: list an owner's stories and fetch per-story supplementary fields (cycle time, pull requests)
// role: integration/tracker-api
// inputs: project id, owner, updated-after cutoff, tracker token or offline JSON files; env ATR_TEST_* in tests
// outputs: Vec<WorkItem> (at-least-once; duplicates expected) and StoryDetails per story id
// side_effects: Network calls to the Pivotal Tracker v5 REST API; reads offline JSON files
// invariants:
// - Story listing failures are errors, never an empty list
// - Supplementary fetches are best-effort and isolated per story (parallel via rayon)
// - Individual story records that fail to parse are skipped with a warning
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::ext::serde_json::JsonFetch;
use crate::model::{CycleTimeDetails, LinkedArtifact, StoryDetails, WorkItem};

pub const TRACKER_API_BASE: &str = "https://www.pivotaltracker.com/services/v5";
const STORY_FIELDS: &str = ":default,tasks,transitions,comments";

/// Field selector for the per-story supplementary fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
  CycleTimeDetails,
  PullRequests,
}

impl DetailField {
  pub fn as_str(&self) -> &'static str {
    match self {
      DetailField::CycleTimeDetails => "cycle_time_details",
      DetailField::PullRequests => "pull_requests",
    }
  }
}

// --- Trait seam for the tracker API ---
pub trait TrackerApi: Sync {
  fn list_stories_json(&self, project_id: &str, filter: &str) -> Result<serde_json::Value>;
  fn get_story_json(&self, story_id: u64, field: DetailField) -> Option<serde_json::Value>;
}

struct TrackerHttpApi {
  token: String,
  base: String,
  agent: ureq::Agent,
}

impl TrackerHttpApi {
  fn new(token: String, base: &str) -> Self {
    Self {
      token,
      base: base.trim_end_matches('/').to_string(),
      agent: ureq::AgentBuilder::new().build(),
    }
  }

  fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
    let mut req = self
      .agent
      .get(url)
      .set("Accept", "application/json")
      .set("User-Agent", "tracker-activity-report")
      .set("X-TrackerToken", &self.token);

    for (k, v) in query {
      req = req.query(k, v);
    }

    let resp = req.call().with_context(|| format!("GET {}", url))?;
    resp
      .into_json::<serde_json::Value>()
      .with_context(|| format!("decoding JSON from {}", url))
  }
}

impl TrackerApi for TrackerHttpApi {
  fn list_stories_json(&self, project_id: &str, filter: &str) -> Result<serde_json::Value> {
    let url = format!("{}/projects/{}/stories", self.base, project_id);
    self.get_json(&url, &[("filter", filter), ("fields", STORY_FIELDS)])
  }

  fn get_story_json(&self, story_id: u64, field: DetailField) -> Option<serde_json::Value> {
    let url = format!("{}/stories/{}", self.base, story_id);

    match self.get_json(&url, &[("fields", field.as_str())]) {
      Ok(v) => Some(v),
      Err(e) => {
        debug!(story_id, field = field.as_str(), error = %format!("{:#}", e), "supplementary fetch failed");
        None
      }
    }
  }
}

/// Offline backend: a story listing plus an optional `{ "<id>": { ...fields } }` details map.
struct TrackerFileApi {
  stories: serde_json::Value,
  details: Option<serde_json::Value>,
}

impl TrackerApi for TrackerFileApi {
  fn list_stories_json(&self, _project_id: &str, _filter: &str) -> Result<serde_json::Value> {
    Ok(self.stories.clone())
  }

  fn get_story_json(&self, story_id: u64, _field: DetailField) -> Option<serde_json::Value> {
    details_for(self.details.as_ref()?, story_id)
  }
}

struct TrackerEnvApi;

impl TrackerApi for TrackerEnvApi {
  fn list_stories_json(&self, _project_id: &str, _filter: &str) -> Result<serde_json::Value> {
    let raw = std::env::var("ATR_TEST_STORIES_JSON").context("ATR_TEST_STORIES_JSON is not set")?;
    serde_json::from_str(&raw).context("parsing ATR_TEST_STORIES_JSON")
  }

  fn get_story_json(&self, story_id: u64, _field: DetailField) -> Option<serde_json::Value> {
    let raw = std::env::var("ATR_TEST_STORY_DETAILS_JSON").ok()?;
    let map = serde_json::from_str::<serde_json::Value>(&raw).ok()?;
    details_for(&map, story_id)
  }
}

fn details_for(map: &serde_json::Value, story_id: u64) -> Option<serde_json::Value> {
  map.fetch(&story_id.to_string()).value().cloned()
}

fn env_wants_mock() -> bool {
  std::env::var("ATR_TEST_STORIES_JSON").is_ok()
}

fn read_json_file(path: &Path) -> Result<serde_json::Value> {
  let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_slice(&data).with_context(|| format!("parsing JSON in {}", path.display()))
}

pub fn make_http_api(token: String) -> Box<dyn TrackerApi> {
  Box::new(TrackerHttpApi::new(token, TRACKER_API_BASE))
}

pub fn make_file_api(stories: &Path, details: Option<&Path>) -> Result<Box<dyn TrackerApi>> {
  let stories = read_json_file(stories)?;
  let details = details.map(read_json_file).transpose()?;
  Ok(Box::new(TrackerFileApi { stories, details }))
}

#[cfg(any(test, feature = "testutil"))]
pub fn make_env_api() -> Box<dyn TrackerApi> {
  Box::new(TrackerEnvApi)
}

/// Pick a backend: env fixtures win, then a token for HTTP; None when unconfigured.
pub fn make_default_api(token: Option<String>) -> Option<Box<dyn TrackerApi>> {
  if env_wants_mock() {
    return Some(Box::new(TrackerEnvApi));
  }
  token.map(make_http_api)
}

/// The two listing queries: recently updated, and everything still in flight.
pub fn story_filters(owner: Option<&str>, updated_after: DateTime<Utc>) -> [String; 2] {
  let owner_prefix = owner.map(|o| format!("owner:{} ", o)).unwrap_or_default();

  [
    format!(
      "{}updated_after:{}",
      owner_prefix,
      updated_after.to_rfc3339_opts(SecondsFormat::Secs, true)
    ),
    format!("{}state:started,finished,delivered", owner_prefix),
  ]
}

pub fn fetch_work_items(
  api: &dyn TrackerApi,
  project_id: &str,
  owner: Option<&str>,
  updated_after: DateTime<Utc>,
) -> Result<Vec<WorkItem>> {
  let mut out: Vec<WorkItem> = Vec::new();

  for filter in story_filters(owner, updated_after) {
    let listing = api
      .list_stories_json(project_id, &filter)
      .with_context(|| format!("listing stories for project {} ({})", project_id, filter))?;

    let records = listing
      .as_array()
      .with_context(|| format!("story listing for {:?} is not a JSON array", filter))?;

    for record in records {
      match serde_json::from_value::<WorkItem>(record.clone()) {
        Ok(item) => out.push(item),
        Err(e) => warn!(error = %e, id = ?record.fetch("id").value(), "skipping unparsable story"),
      }
    }
  }

  debug!(count = out.len(), "fetched stories (before dedup)");
  Ok(out)
}

/// Both supplementary fields for one story; each part is independently optional.
pub fn fetch_story_details(api: &dyn TrackerApi, story_id: u64) -> StoryDetails {
  let cycle_time = api
    .get_story_json(story_id, DetailField::CycleTimeDetails)
    .and_then(|v| v.fetch(DetailField::CycleTimeDetails.as_str()).to::<CycleTimeDetails>());

  let pull_requests = api.get_story_json(story_id, DetailField::PullRequests).and_then(|v| {
    v.fetch(DetailField::PullRequests.as_str()).value().and_then(|prs| prs.as_array()).map(|prs| {
      prs
        .iter()
        .filter_map(|pr| serde_json::from_value::<LinkedArtifact>(pr.clone()).ok())
        .collect::<Vec<_>>()
    })
  });

  StoryDetails { cycle_time, pull_requests }
}

/// Fetch details for every story concurrently; one story's failure never affects another.
pub fn fetch_all_details(api: &dyn TrackerApi, ids: &[u64]) -> HashMap<u64, StoryDetails> {
  ids.par_iter().map(|id| (*id, fetch_story_details(api, *id))).collect()
}
