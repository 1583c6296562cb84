// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the record model (stories, transitions, tasks, repo events) and the report rows built from them
// role: model/types
// outputs: Deserializable input records with lenient defaults; serializable ReportRow/EventGroup/Report
// invariants: Unknown type/state/kind strings deserialize into catch-all variants, never errors; report types are immutable after construction
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timeline::StateTimeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
  Chore,
  Feature,
  Bug,
  Release,
  #[default]
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryState {
  Unstarted,
  Started,
  Finished,
  Delivered,
  Accepted,
  #[default]
  #[serde(other)]
  Unknown,
}

/// Lifecycle states whose first entry time is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedState {
  Started,
  Finished,
  Delivered,
  Accepted,
}

pub const TRACKED_STATES: [TrackedState; 4] = [
  TrackedState::Started,
  TrackedState::Finished,
  TrackedState::Delivered,
  TrackedState::Accepted,
];

impl TrackedState {
  pub fn from_state(state: StoryState) -> Option<TrackedState> {
    match state {
      StoryState::Started => Some(TrackedState::Started),
      StoryState::Finished => Some(TrackedState::Finished),
      StoryState::Delivered => Some(TrackedState::Delivered),
      StoryState::Accepted => Some(TrackedState::Accepted),
      StoryState::Unstarted | StoryState::Unknown => None,
    }
  }

  pub fn as_state(&self) -> StoryState {
    match self {
      TrackedState::Started => StoryState::Started,
      TrackedState::Finished => StoryState::Finished,
      TrackedState::Delivered => StoryState::Delivered,
      TrackedState::Accepted => StoryState::Accepted,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
  #[serde(default)]
  pub state: StoryState,
  pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub complete: bool,
  #[serde(default)]
  pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedArtifact {
  pub repo: String,
  pub number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// A tracked story as returned by the project tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(rename = "story_type", default)]
  pub kind: StoryType,
  #[serde(default)]
  pub current_state: StoryState,
  #[serde(default)]
  pub estimate: Option<f64>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub transitions: Vec<StateTransition>,
  #[serde(default)]
  pub tasks: Vec<Task>,
  #[serde(rename = "pull_requests", default)]
  pub artifacts: Vec<LinkedArtifact>,
  #[serde(default)]
  pub comments: Vec<Comment>,
}

/// Raw cycle-time magnitudes (milliseconds) as reported by the tracker.
///
/// Values stay untyped so that malformed magnitudes reach the duration
/// formatter instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeDetails {
  #[serde(default)]
  pub started_time: Option<serde_json::Value>,
  #[serde(default)]
  pub finished_time: Option<serde_json::Value>,
}

/// Per-story supplementary fetch result. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryDetails {
  pub cycle_time: Option<CycleTimeDetails>,
  pub pull_requests: Option<Vec<LinkedArtifact>>,
}

/// GitHub event type string (`IssueCommentEvent`, `PushEvent`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawEventKind {
  IssueComment,
  CommitComment,
  Issues,
  PullRequestReviewComment,
  PullRequest,
  Other(String),
}

impl RawEventKind {
  pub fn as_str(&self) -> &str {
    match self {
      RawEventKind::IssueComment => "IssueCommentEvent",
      RawEventKind::CommitComment => "CommitCommentEvent",
      RawEventKind::Issues => "IssuesEvent",
      RawEventKind::PullRequestReviewComment => "PullRequestReviewCommentEvent",
      RawEventKind::PullRequest => "PullRequestEvent",
      RawEventKind::Other(raw) => raw,
    }
  }
}

impl From<String> for RawEventKind {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "IssueCommentEvent" => RawEventKind::IssueComment,
      "CommitCommentEvent" => RawEventKind::CommitComment,
      "IssuesEvent" => RawEventKind::Issues,
      "PullRequestReviewCommentEvent" => RawEventKind::PullRequestReviewComment,
      "PullRequestEvent" => RawEventKind::PullRequest,
      _ => RawEventKind::Other(raw),
    }
  }
}

impl From<&str> for RawEventKind {
  fn from(raw: &str) -> Self {
    RawEventKind::from(raw.to_string())
  }
}

impl From<RawEventKind> for String {
  fn from(kind: RawEventKind) -> Self {
    kind.as_str().to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventAction {
  Opened,
  Closed,
  Created,
  Other(String),
}

impl Default for EventAction {
  fn default() -> Self {
    EventAction::Other(String::new())
  }
}

impl EventAction {
  pub fn as_str(&self) -> &str {
    match self {
      EventAction::Opened => "opened",
      EventAction::Closed => "closed",
      EventAction::Created => "created",
      EventAction::Other(raw) => raw,
    }
  }
}

impl From<String> for EventAction {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "opened" => EventAction::Opened,
      "closed" => EventAction::Closed,
      "created" => EventAction::Created,
      _ => EventAction::Other(raw),
    }
  }
}

impl From<EventAction> for String {
  fn from(action: EventAction) -> Self {
    action.as_str().to_string()
  }
}

/// One activity record from the code-hosting event stream, already
/// reduced to the fields the classifier needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoEvent {
  pub kind: RawEventKind,
  #[serde(default)]
  pub action: EventAction,
  pub repo: String,
  /// Title of the payload object itself (issue, pull request, release...).
  #[serde(default)]
  pub title: Option<String>,
  /// Comment body for comment events.
  #[serde(default)]
  pub body: Option<String>,
  /// Title of the issue / pull request a comment belongs to.
  #[serde(default)]
  pub parent_title: Option<String>,
  #[serde(default)]
  pub link: String,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// One normalized row per unique story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
  pub id: u64,
  pub title: String,
  pub story_type: StoryType,
  pub type_icon: &'static str,
  pub state: StoryState,
  pub state_icon: &'static str,
  pub state_color: &'static str,
  pub is_new: bool,
  pub estimate: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeline: Option<StateTimeline>,
  pub tasks: Vec<String>,
  pub artifacts: Vec<String>,
  pub comments: Vec<Comment>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub operating_time: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub review_wait_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
  PullRequest,
  Conversation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRow {
  pub key: String,
  pub display: DisplayKind,
  pub icon: &'static str,
  pub action_icon: &'static str,
  pub title: String,
  pub link: String,
}

impl EventRow {
  /// Display heading: icon, optional action glyph, then the title.
  pub fn heading(&self) -> String {
    match self.display {
      DisplayKind::PullRequest => format!("{} {} {}", self.icon, self.action_icon, self.title),
      DisplayKind::Conversation => format!("{} {}", self.icon, self.title),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventGroup {
  pub repo: String,
  pub rows: Vec<EventRow>,
}

/// Everything one run hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub rows: Vec<ReportRow>,
  pub event_groups: Vec<EventGroup>,
}
