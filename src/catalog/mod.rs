//! Catalog layer: the operations file schema and the validated, read-only
//! catalog the step list draws from.

pub mod kind;
pub mod ops;

pub use kind::NUMBER_WITH_UNIT;
pub use ops::{Catalog, ParameterDefinition};
