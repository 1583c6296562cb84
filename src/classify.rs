// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map story type/state to display icons and colors; decide whether a story is new for the window
// role: classification/stories
// inputs: StoryType, StoryState, creation timestamp, reporting-window start
// outputs: StoryClass (type icon, state icon, state color, is_new)
// invariants: Pure and total; unknown type/state map to empty strings; lookup tables are immutable
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};

use crate::model::{StoryState, StoryType};

/// Marks stories and issues that appeared inside the window.
pub const NEW_ICON: &str = ":new:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateStyle {
  pub icon: &'static str,
  pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryClass {
  pub type_icon: &'static str,
  pub state: StateStyle,
  pub is_new: bool,
}

pub fn type_icon(kind: StoryType) -> &'static str {
  match kind {
    StoryType::Chore => ":gear:",
    StoryType::Feature => ":star:",
    StoryType::Bug => ":bug:",
    StoryType::Release => ":waving_black_flag:",
    StoryType::Unknown => "",
  }
}

pub fn state_style(state: StoryState) -> StateStyle {
  match state {
    StoryState::Finished => StateStyle { icon: ":checkered_flag:", color: "#223F62" },
    StoryState::Started => StateStyle { icon: ":construction:", color: "#F3F3D3" },
    StoryState::Unstarted => StateStyle { icon: "-", color: "#E0E2E5" },
    StoryState::Accepted => StateStyle { icon: ":ok_woman:", color: "#639019" },
    StoryState::Delivered => StateStyle { icon: ":truck:", color: "#F19225" },
    StoryState::Unknown => StateStyle { icon: "", color: "" },
  }
}

/// Strictly after the window start; a story without a creation time is never new.
pub fn is_new(created_at: Option<DateTime<Utc>>, window_start: DateTime<Utc>) -> bool {
  created_at.map(|t| t > window_start).unwrap_or(false)
}

pub fn classify_story(
  kind: StoryType,
  state: StoryState,
  created_at: Option<DateTime<Utc>>,
  window_start: DateTime<Utc>,
) -> StoryClass {
  StoryClass {
    type_icon: type_icon(kind),
    state: state_style(state),
    is_new: is_new(created_at, window_start),
  }
}
