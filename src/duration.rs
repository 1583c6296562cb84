// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render elapsed-time magnitudes (milliseconds) as whole days or hours
// role: formatting/helpers
// inputs: Optional raw JSON magnitude from cycle-time details, or an optional integer
// outputs: "{days}d", "{hours}h", or the not-applicable sentinel
// invariants: Never fails; zero/absent/malformed all render as NOT_APPLICABLE; integer division only (no rounding)
// errors: Malformed magnitudes are logged at warn and swallowed
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Result};
use tracing::warn;

/// Sentinel for values that do not apply to a row.
pub const NOT_APPLICABLE: &str = "—";

const MS_PER_HOUR: i64 = 1000 * 60 * 60;

/// Format a millisecond magnitude; zero or absent yields the sentinel.
pub fn format_elapsed_ms(ms: Option<i64>) -> String {
  let ms = match ms {
    Some(v) if v != 0 => v,
    _ => return NOT_APPLICABLE.to_string(),
  };

  let hours = ms / MS_PER_HOUR;
  let days = hours / 24;

  if days >= 1 {
    format!("{}d", days)
  } else {
    format!("{}h", hours)
  }
}

/// Format an untyped magnitude straight from a tracker payload.
pub fn format_elapsed(raw: Option<&serde_json::Value>) -> String {
  match magnitude_ms(raw) {
    Ok(ms) => format_elapsed_ms(ms),
    Err(e) => {
      warn!(error = %e, "unusable elapsed-time magnitude");
      NOT_APPLICABLE.to_string()
    }
  }
}

fn magnitude_ms(raw: Option<&serde_json::Value>) -> Result<Option<i64>> {
  let value = match raw {
    None | Some(serde_json::Value::Null) => return Ok(None),
    Some(v) => v,
  };

  let ms = match value {
    serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
      (Some(i), _) => i,
      (None, Some(f)) if f.is_finite() && f.abs() < i64::MAX as f64 => f.trunc() as i64,
      _ => bail!("magnitude out of range: {}", n),
    },
    serde_json::Value::String(s) => match s.trim().parse::<i64>() {
      Ok(i) => i,
      Err(_) => bail!("magnitude is not numeric: {:?}", s),
    },
    other => bail!("magnitude has unexpected shape: {}", other),
  };

  if ms < 0 {
    bail!("negative magnitude: {}", ms);
  }

  Ok(Some(ms))
}
