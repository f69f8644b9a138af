//! The join handshake. Everything after a successful join is a bare
//! `hx_types::command::Command` (already internally tagged by `"type"`);
//! only the one-time join message needs its own shape, so it is kept out
//! of that enum rather than bolted awkwardly onto it.

use serde::Deserialize;

use hx_types::Seat;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum JoinKind {
    Join,
}

#[derive(Debug, Deserialize)]
pub struct JoinMessage {
    #[allow(dead_code)]
    r#type: JoinKind,
    pub match_id: String,
    pub seat: Seat,
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Try to read `raw` as a join message. Any other shape (a `Command`, or
/// garbage) falls through so the caller can try the next interpretation.
pub fn try_parse_join(raw: &serde_json::Value) -> Option<JoinMessage> {
    serde_json::from_value(raw.clone()).ok()
}
