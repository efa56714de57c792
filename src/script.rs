//! Gesture scripts: a recorded sequence of edits replayed against a session.
//!
//! JSON shape (an array, applied in order):
//! [
//!   { "action": "header", "text": "Cell Prep #1" },
//!   { "action": "add", "operationId": 2, "before": 0 },
//!   { "action": "move", "instanceId": "step-2" },
//!   { "action": "drop", "payload": { "source": "left", "operationId": 7 } },
//!   { "action": "drop", "payload": "{\"source\":\"right\",\"instanceId\":\"step-1\"}", "before": 0 },
//!   { "action": "set", "instanceId": "step-1", "param": "temperature",
//!     "value": { "numericValue": "37", "unit": "°C" } },
//!   { "action": "remove", "instanceId": "step-2" }
//! ]
//!
//! `payload` may be the decoded object or the raw string a drag event carries.
//! `add` and `move` are shorthands that build the payload themselves.
//! Anything without `before` lands at the end of the list.

use crate::Result;
use crate::diagnostics;
use crate::session::Session;
use crate::steps::{DragPayload, DropTarget, InstanceId};

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::fs;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Gesture {
    Header {
        text: String,
    },
    Drop {
        payload: Value,
        #[serde(default)]
        before: Option<usize>,
    },
    Add {
        #[serde(rename = "operationId")]
        operation_id: u32,
        #[serde(default)]
        before: Option<usize>,
    },
    Move {
        #[serde(rename = "instanceId")]
        instance_id: InstanceId,
        #[serde(default)]
        before: Option<usize>,
    },
    Remove {
        #[serde(rename = "instanceId")]
        instance_id: InstanceId,
    },
    Set {
        #[serde(rename = "instanceId")]
        instance_id: InstanceId,
        param: String,
        #[serde(default)]
        value: Value,
    },
}

pub fn load_script(path: &str) -> Result<Vec<Gesture>> {
    let text = fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read gesture script {}", path)))?;
    serde_json::from_str(&text)
        .with_context(|| diagnostics::error_message(format!("parse gesture script {}", path)))
}

fn target(before: Option<usize>) -> DropTarget {
    before.map_or(DropTarget::End, DropTarget::Before)
}

/// Apply every gesture in order.
pub fn replay(session: &mut Session<'_>, gestures: &[Gesture]) {
    for (n, gesture) in gestures.iter().enumerate() {
        tracing::debug!(gesture = n + 1, ?gesture, "replaying");
        match gesture {
            Gesture::Header { text } => session.set_header(text.as_str()),
            Gesture::Drop { payload, before } => {
                if let Some(payload) = DragPayload::from_value(payload) {
                    session.drop_payload(&payload, target(*before));
                }
            }
            Gesture::Add {
                operation_id,
                before,
            } => {
                let raw = session.drag_operation(*operation_id);
                session.drop_raw(&raw, target(*before));
            }
            Gesture::Move {
                instance_id,
                before,
            } => {
                let raw = session.drag_step(instance_id);
                session.drop_raw(&raw, target(*before));
            }
            Gesture::Remove { instance_id } => session.remove(instance_id),
            Gesture::Set {
                instance_id,
                param,
                value,
            } => session.update_value(instance_id, param, value.clone()),
        }
    }
}
