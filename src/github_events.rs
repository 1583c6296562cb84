// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub collaborator: page through a user's public event stream and map each event into a RepoEvent
// role: integration/github-events
// inputs: GitHub login, [since, until] range; env GITHUB_TOKEN / GH_TOKEN / `gh auth token`; offline JSON file; env ATR_TEST_EVENTS_JSON in tests
// outputs: Vec<RepoEvent> in stream order (duplicates possible; dedup happens in the classifier)
// side_effects: Network calls to api.github.com; spawns `gh` for token discovery
// invariants:
// - Listing failures are errors, never an empty stream
// - Paging stops at an empty page, at the first event older than `since`, or after MAX_PAGES
// - Events that cannot be mapped (no type, repo or payload link) are skipped
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::events::Discriminator;
use crate::ext::serde_json::JsonFetch;
use crate::model::{EventAction, RawEventKind, RepoEvent};

pub const MAX_PAGES: u32 = 3;

// --- Trait seam for the GitHub events API ---
pub trait GithubEventsApi: Sync {
  fn list_user_events_json(&self, user: &str, page: u32) -> Result<serde_json::Value>;
}

struct GithubHttpApi {
  token: Option<String>,
  agent: ureq::Agent,
}

impl GithubEventsApi for GithubHttpApi {
  fn list_user_events_json(&self, user: &str, page: u32) -> Result<serde_json::Value> {
    let url = format!("https://api.github.com/users/{}/events", user);
    let page = page.to_string();

    let mut req = self
      .agent
      .get(&url)
      .set("Accept", "application/vnd.github+json")
      .set("User-Agent", "tracker-activity-report")
      .query("per_page", "100")
      .query("page", &page);

    if let Some(token) = &self.token {
      req = req.set("Authorization", &format!("Bearer {}", token));
    }

    let resp = req.call().with_context(|| format!("GET {} (page {})", url, page))?;
    resp
      .into_json::<serde_json::Value>()
      .with_context(|| format!("decoding JSON from {}", url))
  }
}

/// Offline backend: the whole stream is page 1.
struct GithubFileApi {
  events: serde_json::Value,
}

impl GithubEventsApi for GithubFileApi {
  fn list_user_events_json(&self, _user: &str, page: u32) -> Result<serde_json::Value> {
    if page == 1 {
      Ok(self.events.clone())
    } else {
      Ok(serde_json::json!([]))
    }
  }
}

struct GithubEnvApi;

impl GithubEventsApi for GithubEnvApi {
  fn list_user_events_json(&self, _user: &str, page: u32) -> Result<serde_json::Value> {
    if page > 1 {
      return Ok(serde_json::json!([]));
    }
    let raw = std::env::var("ATR_TEST_EVENTS_JSON").context("ATR_TEST_EVENTS_JSON is not set")?;
    serde_json::from_str(&raw).context("parsing ATR_TEST_EVENTS_JSON")
  }
}

fn env_wants_mock() -> bool {
  std::env::var("ATR_TEST_EVENTS_JSON").is_ok()
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(var) {
      if !t.trim().is_empty() {
        return Some(t);
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

pub fn make_http_api(token: Option<String>) -> Box<dyn GithubEventsApi> {
  Box::new(GithubHttpApi { token, agent: ureq::AgentBuilder::new().build() })
}

pub fn make_file_api(path: &Path) -> Result<Box<dyn GithubEventsApi>> {
  let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  let events = serde_json::from_slice(&data).with_context(|| format!("parsing JSON in {}", path.display()))?;
  Ok(Box::new(GithubFileApi { events }))
}

#[cfg(any(test, feature = "testutil"))]
pub fn make_env_api() -> Box<dyn GithubEventsApi> {
  Box::new(GithubEnvApi)
}

/// Env fixtures win; otherwise HTTP with whatever token discovery finds.
pub fn make_default_api() -> Box<dyn GithubEventsApi> {
  if env_wants_mock() {
    return Box::new(GithubEnvApi);
  }
  make_http_api(get_github_token())
}

/// Map one GitHub event payload into a RepoEvent.
pub fn event_from_json(v: &serde_json::Value) -> Option<RepoEvent> {
  let kind = RawEventKind::from(v.fetch("type").as_str()?);
  let repo = v.fetch("repo.name").as_str()?.to_string();
  let discriminator = Discriminator::from_raw(kind.as_str());
  let object = format!("payload.{}", discriminator.as_str());

  let title = v
    .fetch(&format!("{}.title", object))
    .as_str()
    .or_else(|| v.fetch(&format!("{}.name", object)).as_str())
    .map(str::to_string);

  let body = match discriminator {
    Discriminator::Comment => v.fetch("payload.comment.body").as_str().map(str::to_string),
    _ => None,
  };

  let parent_title = match kind {
    RawEventKind::IssueComment => v.fetch("payload.issue.title").as_str(),
    RawEventKind::PullRequestReviewComment => v.fetch("payload.pull_request.title").as_str(),
    _ => None,
  }
  .map(str::to_string);

  let link = v.fetch(&format!("{}.html_url", object)).to_or_default::<String>();
  if link.is_empty() {
    debug!(kind = kind.as_str(), repo = %repo, "skipping event without a payload link");
    return None;
  }

  Some(RepoEvent {
    action: EventAction::from(v.fetch("payload.action").to_or_default::<String>()),
    link,
    created_at: v.fetch("created_at").to::<DateTime<Utc>>(),
    kind,
    repo,
    title,
    body,
    parent_title,
  })
}

pub fn fetch_repo_events(
  api: &dyn GithubEventsApi,
  user: &str,
  since: DateTime<Utc>,
  until: DateTime<Utc>,
) -> Result<Vec<RepoEvent>> {
  let mut out: Vec<RepoEvent> = Vec::new();

  for page in 1..=MAX_PAGES {
    let listing = api
      .list_user_events_json(user, page)
      .with_context(|| format!("listing GitHub events for {}", user))?;

    let records = listing
      .as_array()
      .with_context(|| format!("GitHub events page {} is not a JSON array", page))?;

    if records.is_empty() {
      break;
    }

    let mut reached_older = false;

    for record in records {
      let Some(event) = event_from_json(record) else {
        debug!(id = ?record.fetch("id").value(), "skipping unmappable event");
        continue;
      };

      match event.created_at {
        Some(at) if at < since => reached_older = true,
        Some(at) if at > until => {}
        Some(_) => out.push(event),
        None => debug!(repo = %event.repo, "skipping event without created_at"),
      }
    }

    if reached_older {
      break;
    }
  }

  debug!(count = out.len(), user, "fetched GitHub events");
  Ok(out)
}
