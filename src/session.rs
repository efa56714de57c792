//! Editing session: the protocol header plus its step list, driven by gestures.

use crate::catalog::Catalog;
use crate::steps::{DragPayload, DropTarget, IdGenerator, InstanceId, StepInstance, StepList};

use serde_json::Value;

/// Read-only view handed to the renderer at export time.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub header: &'a str,
    pub steps: &'a [StepInstance],
}

/// Single owner of the mutable protocol state. All edits go through `&mut self`.
#[derive(Debug)]
pub struct Session<'c> {
    catalog: &'c Catalog,
    header: String,
    steps: StepList,
}

impl<'c> Session<'c> {
    pub fn new(catalog: &'c Catalog, ids: IdGenerator) -> Self {
        Self {
            catalog,
            header: String::new(),
            steps: StepList::new(ids),
        }
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    /// Payload for dragging a catalog entry.
    pub fn drag_operation(&self, operation_id: u32) -> String {
        DragPayload::Operation { operation_id }.encode()
    }

    /// Payload for dragging an existing step.
    pub fn drag_step(&self, instance_id: &InstanceId) -> String {
        DragPayload::Step {
            instance_id: instance_id.clone(),
        }
        .encode()
    }

    /// Handle a raw drop event. Unparseable payloads are ignored.
    pub fn drop_raw(&mut self, raw: &str, target: DropTarget) {
        if let Some(payload) = DragPayload::parse(raw) {
            self.drop_payload(&payload, target);
        }
    }

    /// Catalog entries are inserted at the target; existing steps move there.
    pub fn drop_payload(&mut self, payload: &DragPayload, target: DropTarget) {
        let index = target.index(self.steps.len());
        match payload {
            DragPayload::Operation { operation_id } => {
                self.steps.add_at_index(self.catalog, *operation_id, index);
            }
            DragPayload::Step { instance_id } => {
                self.steps.move_to_index(instance_id, index);
            }
        }
    }

    pub fn remove(&mut self, instance_id: &InstanceId) {
        self.steps.remove_by_id(instance_id);
    }

    pub fn update_value(&mut self, instance_id: &InstanceId, param: &str, value: Value) {
        self.steps.update_value(instance_id, param, value);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            header: &self.header,
            steps: self.steps.steps(),
        }
    }
}
