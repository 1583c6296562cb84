// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build one ReportRow per story from classification, timeline, tasks, linked pull requests and cycle times
// role: enrichment/stories
// inputs: &WorkItem, optional StoryDetails from the supplementary fetch, reporting-window start
// outputs: ReportRow (immutable)
// invariants:
// - Tasks are ordered by position with a stable sort (ties keep arrival order)
// - Artifacts keep arrival order; fetched pull requests replace the inline list when present
// - Missing supplementary data degrades to the not-applicable sentinel, never an error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};

use crate::classify::classify_story;
use crate::duration::{format_elapsed, NOT_APPLICABLE};
use crate::model::{CycleTimeDetails, LinkedArtifact, ReportRow, StoryDetails, StoryType, Task, WorkItem};
use crate::timeline::extract_timeline;

pub const TASK_DONE: &str = ":ballot_box_with_check:";
pub const TASK_OPEN: &str = ":white_large_square:";

pub fn render_tasks(tasks: &[Task]) -> Vec<String> {
  let mut ordered: Vec<&Task> = tasks.iter().collect();
  ordered.sort_by_key(|task| task.position);

  ordered
    .into_iter()
    .map(|task| {
      let glyph = if task.complete { TASK_DONE } else { TASK_OPEN };
      format!("{} {}", glyph, task.description)
    })
    .collect()
}

pub fn render_artifacts(artifacts: &[LinkedArtifact]) -> Vec<String> {
  artifacts.iter().map(|a| format!("{}/{}", a.repo, a.number)).collect()
}

/// Points only mean something for features.
pub fn estimate_label(kind: StoryType, estimate: Option<f64>) -> String {
  match kind {
    StoryType::Feature => format!("{}pt", estimate.unwrap_or(0.0).trunc() as i64),
    _ => NOT_APPLICABLE.to_string(),
  }
}

/// (operating time, review-wait time) for the story type.
pub fn cycle_times(kind: StoryType, details: Option<&CycleTimeDetails>) -> (Option<String>, Option<String>) {
  let started = details.and_then(|d| d.started_time.as_ref());
  let finished = details.and_then(|d| d.finished_time.as_ref());

  match kind {
    StoryType::Feature | StoryType::Bug => (Some(format_elapsed(started)), Some(format_elapsed(finished))),
    StoryType::Chore => (Some(format_elapsed(started)), None),
    StoryType::Release | StoryType::Unknown => (None, None),
  }
}

pub fn enrich_story(item: &WorkItem, details: Option<&StoryDetails>, window_start: DateTime<Utc>) -> ReportRow {
  let class = classify_story(item.kind, item.current_state, item.created_at, window_start);

  let artifacts = match details.and_then(|d| d.pull_requests.as_deref()) {
    Some(fetched) => render_artifacts(fetched),
    None => render_artifacts(&item.artifacts),
  };

  let (operating_time, review_wait_time) = cycle_times(item.kind, details.and_then(|d| d.cycle_time.as_ref()));

  ReportRow {
    id: item.id,
    title: item.name.clone(),
    story_type: item.kind,
    type_icon: class.type_icon,
    state: item.current_state,
    state_icon: class.state.icon,
    state_color: class.state.color,
    is_new: class.is_new,
    estimate: estimate_label(item.kind, item.estimate),
    timeline: extract_timeline(item.current_state, &item.transitions),
    tasks: render_tasks(&item.tasks),
    artifacts,
    comments: item.comments.clone(),
    operating_time,
    review_wait_time,
  }
}
