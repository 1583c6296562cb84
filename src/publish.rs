// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Slack publisher: post rendered messages to chat.postMessage in order
// role: integration/slack
// inputs: Slack bot token, SlackMessage payloads (channel already set); env ATR_TEST_SLACK_RESPONSE_JSON in tests
// outputs: Ok(()) once every message was accepted
// side_effects: Network calls to slack.com
// invariants:
// - A response without `ok: true` is an error carrying Slack's `error` string
// - Messages are posted sequentially; the first failure stops the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::ext::serde_json::JsonFetch;
use crate::render::slack::SlackMessage;

pub const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

// --- Trait seam for the Slack Web API ---
pub trait SlackApi {
  fn post_message_json(&self, body: &serde_json::Value) -> Result<serde_json::Value>;
}

struct SlackHttpApi {
  token: String,
  agent: ureq::Agent,
}

impl SlackApi for SlackHttpApi {
  fn post_message_json(&self, body: &serde_json::Value) -> Result<serde_json::Value> {
    let resp = self
      .agent
      .post(SLACK_POST_MESSAGE_URL)
      .set("Authorization", &format!("Bearer {}", self.token))
      .set("Content-Type", "application/json; charset=utf-8")
      .send_json(body.clone())
      .with_context(|| format!("POST {}", SLACK_POST_MESSAGE_URL))?;

    resp.into_json::<serde_json::Value>().context("decoding Slack response")
  }
}

/// Canned response from the environment; defaults to success.
struct SlackEnvApi;

impl SlackApi for SlackEnvApi {
  fn post_message_json(&self, body: &serde_json::Value) -> Result<serde_json::Value> {
    debug!(text = ?body.fetch("text").as_str(), "mock Slack post");
    match std::env::var("ATR_TEST_SLACK_RESPONSE_JSON") {
      Ok(raw) => serde_json::from_str(&raw).context("parsing ATR_TEST_SLACK_RESPONSE_JSON"),
      Err(_) => Ok(serde_json::json!({ "ok": true })),
    }
  }
}

fn env_wants_mock() -> bool {
  std::env::var("ATR_TEST_SLACK_RESPONSE_JSON").is_ok()
}

pub fn make_http_api(token: String) -> Box<dyn SlackApi> {
  Box::new(SlackHttpApi { token, agent: ureq::AgentBuilder::new().build() })
}

#[cfg(any(test, feature = "testutil"))]
pub fn make_env_api() -> Box<dyn SlackApi> {
  Box::new(SlackEnvApi)
}

pub fn make_default_api(token: String) -> Box<dyn SlackApi> {
  if env_wants_mock() {
    return Box::new(SlackEnvApi);
  }
  make_http_api(token)
}

pub fn post_message(api: &dyn SlackApi, message: &SlackMessage) -> Result<()> {
  let body = serde_json::to_value(message)?;
  let resp = api.post_message_json(&body)?;

  if resp.fetch("ok").to::<bool>() != Some(true) {
    let reason = resp.fetch("error").as_str().unwrap_or("unknown error").to_string();
    bail!("Slack rejected message {:?}: {}", message.text, reason);
  }

  Ok(())
}

pub fn post_messages(api: &dyn SlackApi, messages: &[SlackMessage]) -> Result<()> {
  for message in messages {
    post_message(api, message)?;
  }
  info!(count = messages.len(), "posted Slack messages");
  Ok(())
}
