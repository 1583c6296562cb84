// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Classify raw repository events, derive display titles and dedup keys, and group rows per repository
// role: classification/events
// inputs: RepoEvent records (unordered, may repeat across pages and repository groupings), EventOptions
// outputs: Vec<EventGroup> in first-seen repository order
// invariants:
// - At most one row per (type label, link) across the whole run; first occurrence wins
// - Rows are ordered by discriminator descending; equal discriminators keep input order
// - Unknown event kinds still produce a row (speech-bubble, raw title); nothing is rejected
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::classify::NEW_ICON;
use crate::model::{DisplayKind, EventAction, EventGroup, EventRow, RawEventKind, RepoEvent};
use crate::util::{cut, plain};

pub const MERGE_ICON: &str = ":merge:";
pub const SPEECH_ICON: &str = ":speech_balloon:";

/// Display widths for event titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions {
  pub comment_width: usize,
  pub parent_title_width: usize,
}

impl Default for EventOptions {
  fn default() -> Self {
    Self { comment_width: 60, parent_title_width: 50 }
  }
}

/// Payload family derived from the raw event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discriminator {
  Comment,
  Issue,
  PullRequest,
  Other(String),
}

impl Discriminator {
  /// `IssueCommentEvent` → comment, `IssuesEvent` → issue, `PullRequestEvent` → pull_request,
  /// anything else → its snake_cased name without the `Event` suffix.
  pub fn from_raw(raw: &str) -> Discriminator {
    static RE_ANY_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r".*Comment").expect("static regex"));

    let stripped = raw.replace("Event", "");
    let collapsed = RE_ANY_COMMENT.replace_all(&stripped, "Comment");
    let singular = collapsed.replace("Issues", "Issue");

    match underscore(&singular).as_str() {
      "comment" => Discriminator::Comment,
      "issue" => Discriminator::Issue,
      "pull_request" => Discriminator::PullRequest,
      other => Discriminator::Other(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Discriminator::Comment => "comment",
      Discriminator::Issue => "issue",
      Discriminator::PullRequest => "pull_request",
      Discriminator::Other(s) => s,
    }
  }
}

/// CamelCase → snake_case (`PullRequest` → `pull_request`, `HTTPThing` → `http_thing`).
fn underscore(s: &str) -> String {
  let chars: Vec<char> = s.chars().collect();
  let mut out = String::with_capacity(s.len() + 4);

  for (i, c) in chars.iter().enumerate() {
    if c.is_uppercase() && i > 0 {
      let prev = chars[i - 1];
      let next_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);

      if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
        out.push('_');
      }
    }
    out.extend(c.to_lowercase());
  }

  out
}

/// Type label used for display and dedup; issues carry their action verb.
pub fn type_label(event: &RepoEvent, discriminator: &Discriminator) -> String {
  match event.kind {
    RawEventKind::Issues => format!("{}_{}", event.action.as_str(), discriminator.as_str()),
    RawEventKind::PullRequestReviewComment => Discriminator::Comment.as_str().to_string(),
    _ => discriminator.as_str().to_string(),
  }
}

pub fn action_icon(action: &EventAction) -> &'static str {
  match action {
    EventAction::Opened => NEW_ICON,
    EventAction::Closed => ":clap:",
    EventAction::Created | EventAction::Other(_) => "",
  }
}

pub fn event_title(event: &RepoEvent, opts: &EventOptions) -> String {
  let body = || cut(&plain(event.body.as_deref().unwrap_or("")), opts.comment_width);
  let with_parent = |text: String| match event.parent_title.as_deref() {
    Some(parent) => format!("{} ({})", text, cut(&plain(parent), opts.parent_title_width)),
    None => text,
  };

  match event.kind {
    RawEventKind::IssueComment | RawEventKind::PullRequestReviewComment => with_parent(body()),
    RawEventKind::CommitComment => body(),
    RawEventKind::Issues => cut(&plain(event.title.as_deref().unwrap_or("")), opts.comment_width),
    RawEventKind::PullRequest | RawEventKind::Other(_) => plain(event.title.as_deref().unwrap_or("")),
  }
}

pub fn classify_event(event: &RepoEvent, opts: &EventOptions) -> EventRow {
  let discriminator = Discriminator::from_raw(event.kind.as_str());
  let label = type_label(event, &discriminator);
  let title = event_title(event, opts);

  let (display, icon, action) = if label == Discriminator::PullRequest.as_str() {
    (DisplayKind::PullRequest, MERGE_ICON, action_icon(&event.action))
  } else {
    (DisplayKind::Conversation, SPEECH_ICON, "")
  };

  EventRow {
    key: format!("{}-{}", label, event.link),
    display,
    icon,
    action_icon: action,
    title,
    link: event.link.clone(),
  }
}

/// Classify one repository's events: order by discriminator (descending,
/// stable), then keep the first row per (type label, link) not already in `seen`.
pub fn classify_repo_events(
  events: &[RepoEvent],
  opts: &EventOptions,
  seen: &mut HashSet<(String, String)>,
) -> Vec<EventRow> {
  let mut ordered: Vec<(Discriminator, &RepoEvent)> = events
    .iter()
    .map(|e| (Discriminator::from_raw(e.kind.as_str()), e))
    .collect();
  ordered.sort_by(|a, b| b.0.as_str().cmp(a.0.as_str()));

  ordered
    .into_iter()
    .filter(|(discriminator, event)| seen.insert((type_label(event, discriminator), event.link.clone())))
    .map(|(_, event)| classify_event(event, opts))
    .collect()
}

/// Split a flat event stream into per-repository buckets in first-seen order.
pub fn group_by_repo(events: Vec<RepoEvent>) -> Vec<(String, Vec<RepoEvent>)> {
  let mut index: HashMap<String, usize> = HashMap::new();
  let mut groups: Vec<(String, Vec<RepoEvent>)> = Vec::new();

  for event in events {
    match index.get(&event.repo) {
      Some(&i) => groups[i].1.push(event),
      None => {
        index.insert(event.repo.clone(), groups.len());
        groups.push((event.repo.clone(), vec![event]));
      }
    }
  }

  groups
}

/// Keys are unique across the whole run; a group left without rows is dropped.
pub fn build_event_groups(events: Vec<RepoEvent>, opts: &EventOptions) -> Vec<EventGroup> {
  let (groups, _seen) = group_by_repo(events).into_iter().fold(
    (Vec::new(), HashSet::new()),
    |(mut groups, mut seen): (Vec<EventGroup>, HashSet<(String, String)>), (repo, events)| {
      let rows = classify_repo_events(&events, opts, &mut seen);
      if rows.is_empty() {
        debug!(repo = %repo, "every event already reported under another repository");
      } else {
        groups.push(EventGroup { repo, rows });
      }
      (groups, seen)
    },
  );

  groups
}
