// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble the report: collapse duplicate stories, enrich each into a row, and group classified events per repository
// role: assembly/report
// inputs: Vec<WorkItem> (at-least-once delivery), per-story StoryDetails keyed by id, Vec<RepoEvent>, AssembleOptions
// outputs: Report { rows, event_groups }
// invariants:
// - One row per story id; first-seen wins; rows keep the deduplicated input order
// - Stories and events are processed independently; no cross-referencing
// - Deterministic for identical inputs and window start
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::enrich::enrich_story;
use crate::events::{build_event_groups, EventOptions};
use crate::model::{RepoEvent, Report, StoryDetails, WorkItem};

#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
  /// Stories created strictly after this instant are flagged as new.
  pub new_since: DateTime<Utc>,
  pub events: EventOptions,
}

/// Collapse stories sharing an id, keeping the first one seen.
pub fn dedup_work_items(items: Vec<WorkItem>) -> Vec<WorkItem> {
  let before = items.len();

  let (kept, _seen) = items.into_iter().fold(
    (Vec::with_capacity(before), HashSet::new()),
    |(mut kept, mut seen): (Vec<WorkItem>, HashSet<u64>), item| {
      if seen.insert(item.id) {
        kept.push(item);
      }
      (kept, seen)
    },
  );

  if kept.len() != before {
    debug!(before, after = kept.len(), "collapsed duplicate stories");
  }

  kept
}

pub fn assemble(
  items: Vec<WorkItem>,
  details: &HashMap<u64, StoryDetails>,
  events: Vec<RepoEvent>,
  opts: &AssembleOptions,
) -> Report {
  let rows = dedup_work_items(items)
    .iter()
    .map(|item| enrich_story(item, details.get(&item.id), opts.new_since))
    .collect();

  let event_groups = build_event_groups(events, &opts.events);

  Report { rows, event_groups }
}
