pub mod layout;
pub mod measure;
pub mod pdf;

pub use layout::layout;
pub use measure::{Helvetica, TextMeasure};
