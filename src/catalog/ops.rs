//! Operation catalog (operations.json): a flat list of operations plus the
//! ordered category list.
//!
//! JSON shape:
//! {
//!   "atomic_operations": [
//!     {
//!       "id": 3,
//!       "name": "CENTRIFUGE",                 // identifier, rendered via label.rs
//!       "category": "SEPARATION_OPERATIONS",
//!       "parameters": [
//!         { "name": "speed", "type": "number + rpm", "required": true },
//!         { "name": "volume", "type": "number + unit", "units": ["mL", "µL"] }
//!       ],
//!       "example": "..."                      // optional
//!     },
//!     ...
//!   ],
//!   "metadata": { "categories": ["SEPARATION_OPERATIONS", ...] }
//! }
//!
//! We validate ids and parameter names, index operations by id, and group them
//! by category (sorted by id).

use crate::Result;
use crate::catalog::kind::ParamKind;
use crate::diagnostics;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub atomic_operations: Vec<OperationDefinition>,

    #[serde(default)]
    pub metadata: CatalogMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogMetadata {
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OperationDefinition {
    pub id: u32,

    pub name: String,

    pub category: String,

    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParameterDefinition {
    pub name: String,

    /// Raw type string as written in the catalog.
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ParameterDefinition {
    pub fn kind(&self) -> ParamKind {
        let has_options = self.options.as_ref().is_some_and(|o| !o.is_empty());
        ParamKind::classify(&self.type_name, has_options)
    }
}

/// Operations of one category, sorted by id.
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub operations: Vec<&'a OperationDefinition>,
}

/// Validated, read-only catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<String>,
    by_id: BTreeMap<u32, OperationDefinition>,
}

impl CatalogFile {
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| {
            diagnostics::error_message(format!("read catalog file {}", path))
        })?;
        serde_json::from_str(&text)
            .with_context(|| diagnostics::error_message(format!("parse catalog file {}", path)))
    }

    /// Index operations by id and enforce:
    /// - unique operation ids
    /// - non-empty operation names
    /// - unique parameter names within an operation
    pub fn validate_and_build(self) -> Result<Catalog> {
        let mut by_id: BTreeMap<u32, OperationDefinition> = BTreeMap::new();
        // Categories in the order operations first use them.
        let mut seen_categories: Vec<(String, u32)> = Vec::new();

        for op in self.atomic_operations {
            if op.name.trim().is_empty() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("operation {} has an empty name", op.id))
                );
            }

            let mut seen = BTreeSet::new();
            for param in &op.parameters {
                if !seen.insert(param.name.as_str()) {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "operation {} ({}) declares parameter '{}' more than once",
                            op.id, op.name, param.name
                        ))
                    );
                }
            }

            if let Some(prev) = by_id.get(&op.id) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "duplicate operation id {} ({} and {})",
                        op.id, prev.name, op.name
                    ))
                );
            }
            if !seen_categories.iter().any(|(cat, _)| cat == &op.category) {
                seen_categories.push((op.category.clone(), op.id));
            }
            by_id.insert(op.id, op);
        }

        // Metadata order first, then categories only seen on operations.
        let mut categories: Vec<String> = Vec::new();
        for cat in self.metadata.categories {
            if !categories.contains(&cat) {
                categories.push(cat);
            }
        }
        for (cat, operation) in seen_categories {
            if !categories.contains(&cat) {
                tracing::warn!(
                    category = %cat,
                    operation,
                    "category is not listed in catalog metadata"
                );
                categories.push(cat);
            }
        }

        Ok(Catalog { categories, by_id })
    }
}

impl Catalog {
    pub fn load(path: &str) -> Result<Self> {
        CatalogFile::load(path)?.validate_and_build()
    }

    pub fn get(&self, id: u32) -> Option<&OperationDefinition> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Non-empty categories in display order, each sorted by operation id.
    pub fn grouped(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups = Vec::new();
        for cat in &self.categories {
            // by_id iterates in id order, so each group comes out sorted.
            let operations: Vec<&OperationDefinition> = self
                .by_id
                .values()
                .filter(|op| &op.category == cat)
                .collect();
            if operations.is_empty() {
                tracing::debug!(category = %cat, "skipping empty category");
                continue;
            }
            groups.push(CategoryGroup {
                category: cat.as_str(),
                operations,
            });
        }
        groups
    }
}
