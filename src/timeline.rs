// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Derive the first-entry timestamp per tracked lifecycle state from a story's transition history
// role: extraction/timeline
// inputs: current StoryState, &[StateTransition]
// outputs: Option<StateTimeline> (None when the current state is not tracked)
// invariants: Earliest occurrence wins for repeated entries; states never entered stay None (not zero-filled)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{StateTransition, StoryState, TrackedState, TRACKED_STATES};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateTimeline {
  pub started: Option<DateTime<Utc>>,
  pub finished: Option<DateTime<Utc>>,
  pub delivered: Option<DateTime<Utc>>,
  pub accepted: Option<DateTime<Utc>>,
}

impl StateTimeline {
  pub fn get(&self, state: TrackedState) -> Option<DateTime<Utc>> {
    match state {
      TrackedState::Started => self.started,
      TrackedState::Finished => self.finished,
      TrackedState::Delivered => self.delivered,
      TrackedState::Accepted => self.accepted,
    }
  }

  fn set(&mut self, state: TrackedState, at: Option<DateTime<Utc>>) {
    match state {
      TrackedState::Started => self.started = at,
      TrackedState::Finished => self.finished = at,
      TrackedState::Delivered => self.delivered = at,
      TrackedState::Accepted => self.accepted = at,
    }
  }

  /// Present entries in tracked-state order.
  pub fn entries(&self) -> impl Iterator<Item = (TrackedState, DateTime<Utc>)> + '_ {
    TRACKED_STATES.iter().filter_map(move |s| self.get(*s).map(|at| (*s, at)))
  }
}

/// Earliest transition into `state`, if any.
pub fn first_entry(transitions: &[StateTransition], state: TrackedState) -> Option<DateTime<Utc>> {
  transitions
    .iter()
    .filter(|tr| tr.state == state.as_state())
    .map(|tr| tr.occurred_at)
    .min()
}

pub fn extract_timeline(current: StoryState, transitions: &[StateTransition]) -> Option<StateTimeline> {
  TrackedState::from_state(current)?;

  let mut timeline = StateTimeline::default();
  for state in TRACKED_STATES {
    timeline.set(state, first_entry(transitions, state));
  }

  Some(timeline)
}
