#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::{
    config::{GradeRule, SubjectConfig},
    marks::StudentPartMarks,
    results::StudentAggregateInput,
};

/// Errors while loading a payload file. Validation of the payload's contents
/// (types, ranges, enum membership) belongs to the upstream collaborator;
/// only unreadable or unparseable files surface here.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload file could not be read
    #[error("could not read payload file `{path}`")]
    Io {
        /// Path of the offending file
        path:   String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The payload file was not valid JSON for the expected shape
    #[error("could not parse payload file `{path}`")]
    Json {
        /// Path of the offending file
        path:   String,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// The input envelope of a mark-calculation batch: one subject's grading
/// configuration plus the students who sat it.
pub struct MarkCalculationPayload {
    /// * `institute_id`: echoed through to the output envelope
    pub institute_id: String,
    /// * `subjects`: subject configurations; the first is evaluated
    pub subjects:     Vec<SubjectConfig>,
    /// * `students`: raw per-student part marks
    #[serde(default)]
    #[builder(default)]
    pub students:     Vec<StudentPartMarks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// The input envelope of a result-aggregation batch: the grade-rule table
/// plus each student's already-evaluated subject results.
pub struct ResultCalculationPayload {
    /// * `grade_rules`: the grading scheme shared by every lookup
    #[serde(default)]
    #[builder(default)]
    pub grade_rules: Vec<GradeRule>,
    /// * `students`: per-student evaluated subjects
    #[serde(default)]
    #[builder(default)]
    pub students:    Vec<StudentAggregateInput>,
}

/// Loads a mark-calculation payload from a JSON file.
pub fn load_marks_payload(path: &Path) -> Result<MarkCalculationPayload, PayloadError> {
    load(path)
}

/// Loads a result-aggregation payload from a JSON file.
pub fn load_results_payload(path: &Path) -> Result<ResultCalculationPayload, PayloadError> {
    load(path)
}

/// Reads and parses a JSON payload file into the requested shape.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T, PayloadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PayloadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PayloadError::Json {
        path: path.display().to_string(),
        source,
    })
}
