//! The ordered step list.
//!
//! Every operation here is total: a stale or unknown reference leaves the list
//! untouched instead of failing, since drag sources can race with edits.

use crate::catalog::{Catalog, ParameterDefinition};
use crate::steps::id::{IdGenerator, InstanceId};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One occurrence of a catalog operation inside the protocol.
///
/// Operation fields and parameters are copied at creation, so later catalog
/// changes do not reach existing steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInstance {
    pub instance_id: InstanceId,
    pub operation_id: u32,
    pub operation_name: String,
    pub category: String,
    pub parameters: Vec<ParameterDefinition>,
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct StepList {
    steps: Vec<StepInstance>,
    ids: IdGenerator,
}

impl StepList {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            steps: Vec::new(),
            ids,
        }
    }

    pub fn steps(&self) -> &[StepInstance] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn index_of(&self, id: &InstanceId) -> Option<usize> {
        self.steps.iter().position(|s| &s.instance_id == id)
    }

    /// Insert a fresh instance of `operation_id` at `index` (clamped to append).
    /// Returns the new id, or `None` if the operation is not in the catalog.
    pub fn add_at_index(
        &mut self,
        catalog: &Catalog,
        operation_id: u32,
        index: usize,
    ) -> Option<InstanceId> {
        let Some(op) = catalog.get(operation_id) else {
            tracing::debug!(operation_id, "drop ignored: operation not in catalog");
            return None;
        };

        let step = StepInstance {
            instance_id: self.ids.next_id(),
            operation_id: op.id,
            operation_name: op.name.clone(),
            category: op.category.clone(),
            parameters: op.parameters.clone(),
            values: BTreeMap::new(),
        };
        let id = step.instance_id.clone();

        let index = index.min(self.steps.len());
        self.steps.insert(index, step);
        tracing::debug!(%id, operation_id, index, "step added");
        Some(id)
    }

    /// Move an existing step so that it lands at `target_index` as counted in
    /// the list before the move. Returns whether the list changed.
    pub fn move_to_index(&mut self, id: &InstanceId, target_index: usize) -> bool {
        let Some(current) = self.index_of(id) else {
            tracing::debug!(%id, "move ignored: unknown step");
            return false;
        };
        let target = target_index.min(self.steps.len());
        if current == target {
            return false;
        }

        let moved = self.steps.remove(current);
        // Removing an element ahead of the target shifts the target down by one.
        let insert_at = if current < target { target - 1 } else { target };
        self.steps.insert(insert_at, moved);
        tracing::debug!(%id, from = current, to = insert_at, "step moved");
        current != insert_at
    }

    pub fn remove_by_id(&mut self, id: &InstanceId) -> Option<StepInstance> {
        match self.index_of(id) {
            Some(index) => Some(self.steps.remove(index)),
            None => {
                tracing::debug!(%id, "remove ignored: unknown step");
                None
            }
        }
    }

    /// Store `value` under `param`. The name is not checked against the
    /// step's parameter list.
    pub fn update_value(&mut self, id: &InstanceId, param: &str, value: Value) -> bool {
        match self.steps.iter_mut().find(|s| &s.instance_id == id) {
            Some(step) => {
                step.values.insert(param.to_string(), value);
                true
            }
            None => {
                tracing::debug!(%id, param, "value update ignored: unknown step");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ops::tests::sample_catalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ids(list: &StepList) -> Vec<String> {
        list.steps()
            .iter()
            .map(|s| s.instance_id.to_string())
            .collect()
    }

    /// [A, B, C, D] as step-1..step-4.
    fn abcd() -> (Catalog, StepList) {
        let catalog = sample_catalog();
        let mut list = StepList::new(IdGenerator::sequential());
        for op in [1, 2, 7, 9] {
            let len = list.len();
            list.add_at_index(&catalog, op, len).unwrap();
        }
        (catalog, list)
    }

    fn find<'a>(list: &'a StepList, id: &InstanceId) -> Option<&'a StepInstance> {
        list.steps().iter().find(|s| &s.instance_id == id)
    }

    fn id(s: &str) -> InstanceId {
        InstanceId::from(s)
    }

    #[test]
    fn add_copies_operation_and_starts_empty() {
        let catalog = sample_catalog();
        let mut list = StepList::new(IdGenerator::sequential());
        let new_id = list.add_at_index(&catalog, 7, 0).unwrap();

        let step = find(&list, &new_id).unwrap();
        assert_eq!(step.operation_id, 7);
        assert_eq!(step.operation_name, "INCUBATE");
        assert_eq!(step.category, "INCUBATION_OPERATIONS");
        assert_eq!(step.parameters, catalog.get(7).unwrap().parameters);
        assert!(step.values.is_empty());
    }

    #[test]
    fn add_inserts_at_every_position() {
        for i in 0..=4 {
            let (catalog, mut list) = abcd();
            let before = ids(&list);
            let new_id = list.add_at_index(&catalog, 2, i).unwrap();

            assert_eq!(list.len(), 5);
            assert_eq!(list.index_of(&new_id), Some(i));

            let mut rest = ids(&list);
            rest.remove(i);
            assert_eq!(rest, before);
        }
    }

    #[test]
    fn add_past_the_end_appends() {
        let (catalog, mut list) = abcd();
        let new_id = list.add_at_index(&catalog, 1, 99).unwrap();
        assert_eq!(list.index_of(&new_id), Some(4));
    }

    #[test]
    fn add_unknown_operation_is_a_no_op() {
        let (catalog, mut list) = abcd();
        let before = ids(&list);
        assert_eq!(list.add_at_index(&catalog, 404, 0), None);
        assert_eq!(ids(&list), before);
    }

    #[test]
    fn move_forward_compensates_for_removal() {
        let (_, mut list) = abcd();
        assert!(list.move_to_index(&id("step-1"), 3));
        assert_eq!(ids(&list), vec!["step-2", "step-3", "step-1", "step-4"]);
    }

    #[test]
    fn move_backward() {
        let (_, mut list) = abcd();
        assert!(list.move_to_index(&id("step-4"), 1));
        assert_eq!(ids(&list), vec!["step-1", "step-4", "step-2", "step-3"]);
    }

    #[test]
    fn move_to_end() {
        let (_, mut list) = abcd();
        let len = list.len();
        assert!(list.move_to_index(&id("step-2"), len));
        assert_eq!(ids(&list), vec!["step-1", "step-3", "step-4", "step-2"]);
    }

    #[test]
    fn move_to_own_index_is_idempotent() {
        let (_, mut list) = abcd();
        let before = list.steps().to_vec();
        for s in ["step-1", "step-2", "step-3", "step-4"] {
            let current = list.index_of(&id(s)).unwrap();
            assert!(!list.move_to_index(&id(s), current));
        }
        assert_eq!(list.steps(), before.as_slice());
    }

    #[test]
    fn move_just_past_itself_keeps_order() {
        // Dropping onto the next step's "before" slot lands in the same place.
        let (_, mut list) = abcd();
        let before = ids(&list);
        assert!(!list.move_to_index(&id("step-2"), 2));
        assert_eq!(ids(&list), before);
    }

    #[test]
    fn unknown_references_leave_list_unchanged() {
        let (_, mut list) = abcd();
        let before = list.steps().to_vec();

        assert!(!list.move_to_index(&id("missing"), 0));
        assert_eq!(list.remove_by_id(&id("missing")), None);
        assert!(!list.update_value(&id("missing"), "volume", json!(1)));

        assert_eq!(list.steps(), before.as_slice());
    }

    #[test]
    fn ids_stay_stable_and_unique_under_edits() {
        let (catalog, mut list) = abcd();
        let original: Vec<StepInstance> = list.steps().to_vec();

        list.add_at_index(&catalog, 9, 2);
        list.move_to_index(&id("step-4"), 0);
        list.move_to_index(&id("step-1"), 5);
        list.add_at_index(&catalog, 7, 1);
        list.move_to_index(&id("step-3"), 2);

        let mut seen: Vec<String> = ids(&list);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), list.len());

        for step in &original {
            let now = find(&list, &step.instance_id).unwrap();
            assert_eq!(now, step);
        }
    }

    #[test]
    fn remove_and_update() {
        let (_, mut list) = abcd();

        assert!(list.update_value(
            &id("step-3"),
            "temperature",
            json!({"numericValue": "37", "unit": "°C"})
        ));
        // Names outside the parameter list are stored as well.
        assert!(list.update_value(&id("step-3"), "operator_note", json!("check")));
        let step = find(&list, &id("step-3")).unwrap();
        assert_eq!(step.values.len(), 2);
        assert_eq!(step.values["operator_note"], json!("check"));

        let removed = list.remove_by_id(&id("step-2")).unwrap();
        assert_eq!(removed.operation_id, 2);
        assert_eq!(ids(&list), vec!["step-1", "step-3", "step-4"]);
    }
}
