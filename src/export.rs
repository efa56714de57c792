//! Export: snapshot -> PDF artifact plus the JSON protocol payload.

use crate::Result;
use crate::catalog::ParameterDefinition;
use crate::diagnostics;
use crate::render::{self, TextMeasure};
use crate::session::Snapshot;
use crate::steps::InstanceId;

use anyhow::Context;
use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_BASE_NAME: &str = "protocol";
const EXTENSION: &str = ".pdf";

/// Header -> file name: whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_-]` is dropped. Case is kept.
pub fn file_name(header: &str) -> Result<String> {
    let base = if header.is_empty() {
        DEFAULT_BASE_NAME
    } else {
        header
    };
    let spaces = Regex::new(r"\s+")?;
    let unsafe_chars = Regex::new(r"[^A-Za-z0-9_\-]")?;

    let name = spaces.replace_all(base, "_");
    let name = unsafe_chars.replace_all(&name, "");
    Ok(format!("{}{}", name, EXTENSION))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolPayload {
    pub header: String,
    pub steps: Vec<StepPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub instance_id: InstanceId,
    pub operation_id: u32,
    pub operation_name: String,
    pub category: String,
    pub parameters: Vec<ParameterPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub value: Value,
}

impl ParameterPayload {
    fn new(param: &ParameterDefinition, value: Option<&Value>) -> Self {
        Self {
            name: param.name.clone(),
            type_name: param.type_name.clone(),
            required: param.required,
            value: value.cloned().unwrap_or(Value::Null),
        }
    }
}

/// Describe the protocol for a future backend. Values the user never set are
/// `null`; values stored under names outside the parameter list are left out.
pub fn payload(snapshot: &Snapshot<'_>) -> ProtocolPayload {
    ProtocolPayload {
        header: snapshot.header.to_string(),
        steps: snapshot
            .steps
            .iter()
            .map(|step| StepPayload {
                instance_id: step.instance_id.clone(),
                operation_id: step.operation_id,
                operation_name: step.operation_name.clone(),
                category: step.category.clone(),
                parameters: step
                    .parameters
                    .iter()
                    .map(|p| ParameterPayload::new(p, step.values.get(&p.name)))
                    .collect(),
            })
            .collect(),
    }
}

/// What an export produced.
#[derive(Debug, Clone)]
pub struct Exported {
    pub pdf_path: PathBuf,
    pub pages: usize,
    pub payload: ProtocolPayload,
}

/// Render the snapshot into `out_dir` under the header-derived file name.
pub fn export(
    snapshot: &Snapshot<'_>,
    out_dir: &Path,
    measure: &dyn TextMeasure,
    now: DateTime<Local>,
) -> Result<Exported> {
    let payload = payload(snapshot);
    tracing::info!(
        payload = %serde_json::to_string(&payload)?,
        "protocol payload"
    );

    let generated_on = now.format("%d/%m/%Y, %H:%M:%S").to_string();
    let doc = render::layout(snapshot, &generated_on, measure);
    let bytes = render::pdf::encode(&doc, measure, now)?;

    let pdf_path = out_dir.join(file_name(snapshot.header)?);
    fs::write(&pdf_path, bytes).with_context(|| {
        diagnostics::error_message(format!("write pdf {}", pdf_path.display()))
    })?;

    tracing::info!(path = %pdf_path.display(), pages = doc.pages.len(), "document written");
    Ok(Exported {
        pdf_path,
        pages: doc.pages.len(),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ops::tests::sample_catalog;
    use crate::render::Helvetica;
    use crate::render::pdf::{tests::page_strings, win_ansi};
    use crate::session::Session;
    use crate::steps::{DropTarget, IdGenerator};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn file_names() {
        assert_eq!(file_name("Cell Prep #1!").unwrap(), "Cell_Prep_1.pdf");
        assert_eq!(file_name("").unwrap(), "protocol.pdf");
        assert_eq!(file_name("  HeLa\tsplit  ").unwrap(), "_HeLa_split_.pdf");
        assert_eq!(file_name("a-b_c (v2)").unwrap(), "a-b_c_v2.pdf");
        assert_eq!(file_name("Incubation 37°C").unwrap(), "Incubation_37C.pdf");
    }

    fn session_with_values(catalog: &crate::catalog::Catalog) -> Session<'_> {
        let mut session = Session::new(catalog, IdGenerator::sequential());
        session.set_header("Cell Prep #1!");
        session.drop_raw(r#"{"source":"left","operationId":7}"#, DropTarget::End);
        session.drop_raw(r#"{"source":"left","operationId":1}"#, DropTarget::End);
        session.update_value(
            &InstanceId::from("step-1"),
            "temperature",
            json!({"numericValue": "37", "unit": "°C"}),
        );
        session.update_value(&InstanceId::from("step-1"), "scratch", json!("kept out"));
        session
    }

    #[test]
    fn payload_lists_every_declared_parameter() {
        let catalog = sample_catalog();
        let session = session_with_values(&catalog);
        let payload = payload(&session.snapshot());

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "header": "Cell Prep #1!",
                "steps": [
                    {
                        "instanceId": "step-1",
                        "operationId": 7,
                        "operationName": "INCUBATE",
                        "category": "INCUBATION_OPERATIONS",
                        "parameters": [
                            {
                                "name": "temperature",
                                "type": "number + unit",
                                "required": true,
                                "value": {"numericValue": "37", "unit": "°C"}
                            },
                            {
                                "name": "duration",
                                "type": "number + unit or days",
                                "required": false,
                                "value": null
                            }
                        ]
                    },
                    {
                        "instanceId": "step-2",
                        "operationId": 1,
                        "operationName": "ASPIRATE_MEDIUM",
                        "category": "LIQUID_HANDLING_OPERATIONS",
                        "parameters": []
                    }
                ]
            })
        );
    }

    #[test]
    fn export_writes_named_pdf() {
        let catalog = sample_catalog();
        let session = session_with_values(&catalog);
        let dir = tempfile::tempdir().unwrap();

        let exported = export(&session.snapshot(), dir.path(), &Helvetica, Local::now()).unwrap();

        assert_eq!(exported.pdf_path, dir.path().join("Cell_Prep_1.pdf"));
        assert_eq!(exported.pages, 1);
        assert_eq!(exported.payload.steps.len(), 2);

        let bytes = fs::read(&exported.pdf_path).unwrap();
        let pages = page_strings(&bytes);
        assert_eq!(pages.len(), 1);

        let page = &pages[0];
        assert_eq!(page[0], b"Cell Prep #1!".to_vec());
        assert!(page.contains(&b"Number of steps: 2".to_vec()));
        assert!(page.contains(&b"Step 1: Incubate".to_vec()));
        assert!(page.contains(&b"Category: Incubation".to_vec()));
        assert!(page.contains(&win_ansi("• Temperature *: 37 °C")));
        assert!(page.contains(&win_ansi("• Duration: —")));
        assert!(page.contains(&b"Step 2: Aspirate Medium".to_vec()));
    }

    #[test]
    fn empty_protocol_still_exports() {
        let catalog = sample_catalog();
        let session = Session::new(&catalog, IdGenerator::sequential());
        let dir = tempfile::tempdir().unwrap();

        let exported = export(&session.snapshot(), dir.path(), &Helvetica, Local::now()).unwrap();
        assert_eq!(exported.pdf_path, dir.path().join("protocol.pdf"));

        let pages = page_strings(&fs::read(&exported.pdf_path).unwrap());
        assert_eq!(pages[0][0], b"Untitled protocol".to_vec());
        assert!(pages[0].contains(&b"Number of steps: 0".to_vec()));
    }
}
