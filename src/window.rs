// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the reporting window (story query cutoff, event range, "new" cutoff) for a daily or weekly run
// role: time/windowing
// inputs: ReportKind, optional `--for` duration phrase, effective now, report timezone
// outputs: ReportWindow with UTC instants
// invariants:
// - All instants are <= now; `--for` replaces the span for every cutoff
// - Daily events start at local midnight in the report zone
// errors: Unparsable `--for` phrases surface with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Months, Utc};
use chrono_english::{parse_duration, Interval};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ReportKind {
  Daily,
  Weekly,
}

impl ReportKind {
  fn default_span(&self) -> Duration {
    match self {
      ReportKind::Daily => Duration::days(1),
      ReportKind::Weekly => Duration::days(7),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
  pub kind: ReportKind,
  pub now: DateTime<Utc>,
  /// Stories updated after this instant are queried.
  pub updated_after: DateTime<Utc>,
  /// Events created at or after this instant (and not after `now`) are kept.
  pub events_since: DateTime<Utc>,
  /// Stories created strictly after this instant are flagged new.
  pub new_since: DateTime<Utc>,
}

pub fn resolve_window(kind: ReportKind, for_phrase: Option<&str>, now: DateTime<Utc>, tz: Tz) -> Result<ReportWindow> {
  if let Some(phrase) = for_phrase {
    let start = span_start(phrase, now)?;
    return Ok(ReportWindow { kind, now, updated_after: start, events_since: start, new_since: start });
  }

  let start = now - kind.default_span();
  let events_since = match kind {
    ReportKind::Daily => local_midnight(now, tz).unwrap_or(start),
    ReportKind::Weekly => start,
  };

  Ok(ReportWindow { kind, now, updated_after: start, events_since, new_since: start })
}

/// Start of the span described by a phrase like "3 days" or "2 weeks ago".
fn span_start(phrase: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
  let interval = parse_duration(phrase.trim()).with_context(|| format!("parsing --for {:?}", phrase))?;

  let start = match interval {
    Interval::Seconds(secs) => now - Duration::seconds(i64::from(secs).abs()),
    Interval::Days(days) => now - Duration::days(i64::from(days).abs()),
    Interval::Months(months) => match now.checked_sub_months(Months::new(months.unsigned_abs())) {
      Some(dt) => dt,
      None => bail!("--for {:?} reaches before the representable calendar", phrase),
    },
  };

  if start >= now {
    bail!("--for {:?} describes an empty window", phrase);
  }

  Ok(start)
}

fn local_midnight(now: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
  now
    .with_timezone(&tz)
    .date_naive()
    .and_hms_opt(0, 0, 0)?
    .and_local_timezone(tz)
    .earliest()
    .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a `--now-override` string.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive UTC timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .map(|ndt| ndt.and_utc())
      })
  })
}
