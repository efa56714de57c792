//! Step instance identity.
//!
//! An `InstanceId` is opaque: it is generated once when a step is created and
//! never derived from the step's position.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh instance ids.
#[derive(Debug, Clone, Default)]
pub enum IdGenerator {
    /// Random v4 UUIDs.
    #[default]
    Uuid,
    /// `step-1`, `step-2`, ... for reproducible gesture scripts.
    Sequential { next: u64 },
}

impl IdGenerator {
    pub fn sequential() -> Self {
        IdGenerator::Sequential { next: 1 }
    }

    pub fn next_id(&mut self) -> InstanceId {
        match self {
            IdGenerator::Uuid => InstanceId(Uuid::new_v4().to_string()),
            IdGenerator::Sequential { next } => {
                let id = InstanceId(format!("step-{}", next));
                *next += 1;
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = IdGenerator::sequential();
        assert_eq!(ids.next_id().as_str(), "step-1");
        assert_eq!(ids.next_id().as_str(), "step-2");
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = IdGenerator::default();
        let set: BTreeSet<InstanceId> = (0..64).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 64);
    }
}
