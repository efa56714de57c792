//! Step layer: instance identity, the ordered step list, and the drag payloads
//! that drive it.

pub mod id;
pub mod list;
pub mod payload;

pub use id::{IdGenerator, InstanceId};
pub use list::{StepInstance, StepList};
pub use payload::{DragPayload, DropTarget};
