//! Drag payloads: what is being dragged and where it is dropped.
//!
//! Wire shape (JSON, tagged on `source`):
//!   { "source": "left",  "operationId": 3 }          // catalog entry
//!   { "source": "right", "instanceId": "step-1" }    // existing step

use crate::steps::id::InstanceId;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum DragPayload {
    #[serde(rename = "left")]
    Operation {
        #[serde(rename = "operationId")]
        operation_id: u32,
    },
    #[serde(rename = "right")]
    Step {
        #[serde(rename = "instanceId")]
        instance_id: InstanceId,
    },
}

/// Where a payload is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropTarget {
    /// The empty area below the last step.
    #[default]
    End,
    /// Onto the step currently at this position.
    Before(usize),
}

impl DropTarget {
    pub fn index(self, len: usize) -> usize {
        match self {
            DropTarget::End => len,
            DropTarget::Before(i) => i,
        }
    }
}

impl DragPayload {
    /// Decode a payload string. Anything malformed yields `None` and the drop
    /// is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(raw) {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::debug!(%err, raw, "ignoring malformed drag payload");
                None
            }
        }
    }

    /// Same as `parse`, for payloads that arrive already decoded. A JSON string
    /// is treated as the serialized form.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Value::String(raw) = value {
            return Self::parse(raw);
        }
        match serde_json::from_value(value.clone()) {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::debug!(%err, %value, "ignoring malformed drag payload");
                None
            }
        }
    }

    /// Encode for the drag-start side.
    pub fn encode(&self) -> String {
        // A two-variant enum of plain fields always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}
