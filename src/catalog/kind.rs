//! Semantic kinds for catalog parameter types.
//!
//! The catalog carries free-form type strings ("number + unit", "free text",
//! "percentage", ...). We classify them once so the rest of the crate can match
//! on an enum instead of comparing strings.

use std::fmt;

/// Raw type string that stores `{numericValue, unit}` objects.
pub const NUMBER_WITH_UNIT: &str = "number + unit";

/// Type fragments that call for a multi-line text value.
const MULTI_LINE_MARKERS: &[&str] = &[
    "array",
    "list",
    "dict",
    "expression",
    "free text",
    "estimated time",
    "additional tips",
    "string or dict",
    "reference image path",
    "reference video path",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Boolean,
    Text,
    MultiLineText,
    Number,
    NumberWithUnit,
    /// Number with a unit fixed by the type itself ("°C", "rpm").
    NumberFixedUnit(String),
    Percentage,
    Options,
    Duration,
}

impl ParamKind {
    /// Classify a raw type string. Order matters: options beat everything but
    /// booleans, and the multi-line markers beat the numeric forms.
    pub fn classify(raw_type: &str, has_options: bool) -> Self {
        let lower = raw_type.to_lowercase();

        if lower == "boolean" {
            return ParamKind::Boolean;
        }
        if has_options {
            return ParamKind::Options;
        }
        if MULTI_LINE_MARKERS.iter().any(|m| lower.contains(m)) {
            return ParamKind::MultiLineText;
        }

        match raw_type {
            NUMBER_WITH_UNIT => ParamKind::NumberWithUnit,
            "number + °C" => ParamKind::NumberFixedUnit("°C".to_string()),
            "number + rpm" => ParamKind::NumberFixedUnit("rpm".to_string()),
            "percentage" => ParamKind::Percentage,
            "number + unit or days" => ParamKind::Duration,
            "number" => ParamKind::Number,
            _ => ParamKind::Text,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Boolean => write!(f, "boolean"),
            ParamKind::Text => write!(f, "text"),
            ParamKind::MultiLineText => write!(f, "multi-line text"),
            ParamKind::Number => write!(f, "number"),
            ParamKind::NumberWithUnit => write!(f, "number + unit"),
            ParamKind::NumberFixedUnit(unit) => write!(f, "number ({})", unit),
            ParamKind::Percentage => write!(f, "percentage"),
            ParamKind::Options => write!(f, "options"),
            ParamKind::Duration => write!(f, "duration"),
        }
    }
}
