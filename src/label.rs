//! Human-readable labels for catalog identifiers and parameter values.

use crate::catalog::{NUMBER_WITH_UNIT, ParameterDefinition};
use serde_json::Value;

const CATEGORY_SUFFIX: &str = "_OPERATIONS";

/// Placeholder for a parameter without a value.
pub const EMPTY_VALUE: &str = "—";

/// "ADD_FRESH_MEDIUM" => "Add Fresh Medium"
pub fn from_snake_case(value: &str) -> String {
    value
        .to_lowercase()
        .split('_')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "LIQUID_HANDLING_OPERATIONS" => "Liquid Handling"
pub fn category_label(category: &str) -> String {
    let base = category.strip_suffix(CATEGORY_SUFFIX).unwrap_or(category);
    from_snake_case(base)
}

pub fn operation_label(name: &str) -> String {
    from_snake_case(name)
}

/// Required parameters get a trailing " *".
pub fn parameter_label(param: &ParameterDefinition) -> String {
    let base = from_snake_case(&param.name);
    if param.required {
        format!("{} *", base)
    } else {
        base
    }
}

/// Render a stored value for the document.
pub fn format_value(param: &ParameterDefinition, value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) => return EMPTY_VALUE.to_string(),
        Some(Value::String(s)) if s.is_empty() => return EMPTY_VALUE.to_string(),
        Some(v) => v,
    };

    match value {
        // Arrays carry no numericValue/unit and end up as the placeholder.
        Value::Object(_) | Value::Array(_) if param.type_name == NUMBER_WITH_UNIT => {
            let number = value.get("numericValue").map(plain_text).unwrap_or_default();
            let unit = value.get("unit").map(plain_text).unwrap_or_default();
            let text = format!("{} {}", number, unit);
            let text = text.trim();
            if text.is_empty() {
                EMPTY_VALUE.to_string()
            } else {
                text.to_string()
            }
        }
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => plain_text(other),
    }
}

/// Scalars as text; null becomes empty. Nested structures fall back to JSON.
fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        // Floats print without a trailing ".0" when they hold a whole number.
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
