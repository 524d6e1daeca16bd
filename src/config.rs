#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use typed_builder::TypedBuilder;

use crate::constants::{
    DEFAULT_CONVERSION, DEFAULT_EXAM_NAME, DEFAULT_FAIL_THRESHOLD, DEFAULT_TOTAL_MARK,
    FAIL_MARK_MARGIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
/// How a computed mark is rounded at each conversion boundary
pub enum MethodOfEvaluation {
    /// Keep the mark as-is, fractions included
    #[default]
    #[serde(rename = "At Actual")]
    AtActual,
    /// Floor the mark
    #[serde(rename = "Always Down")]
    AlwaysDown,
    /// Ceil the mark
    #[serde(rename = "Always Up")]
    AlwaysUp,
    /// Round to the nearest integer, half-up at the 0.50 threshold
    #[serde(rename = "Without Fraction")]
    WithoutFraction,
}

impl MethodOfEvaluation {
    /// Parses a wire name into a method. Unknown names fall back to
    /// `AtActual`, matching the treatment of an absent method.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "At Actual" => Self::AtActual,
            "Always Down" => Self::AlwaysDown,
            "Always Up" => Self::AlwaysUp,
            "Without Fraction" => Self::WithoutFraction,
            _ => Self::AtActual,
        }
    }

    /// The wire name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtActual => "At Actual",
            Self::AlwaysDown => "Always Down",
            Self::AlwaysUp => "Always Up",
            Self::WithoutFraction => "Without Fraction",
        }
    }
}

impl Display for MethodOfEvaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for MethodOfEvaluation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// One row of a grading scheme: an inclusive mark range and the grade it maps
/// to. Ranges are expected non-overlapping and exhaustive over [0, 100] by
/// convention, but lookups never assume it; overlapping ranges are a
/// configuration hazard resolved by iteration order, not an error.
pub struct GradeRule {
    /// * `from_mark`: lower bound of the range, inclusive
    pub from_mark:   f64,
    /// * `to_mark`: upper bound of the range, inclusive
    pub to_mark:     f64,
    /// * `grade`: letter grade for marks in the range
    pub grade:       String,
    /// * `grade_point`: grade point for marks in the range
    pub grade_point: f64,
}

impl GradeRule {
    /// Whether a mark falls inside this rule's inclusive range.
    pub fn matches(&self, mark: f64) -> bool {
        mark >= self.from_mark && mark <= self.to_mark
    }
}

/// Scans `rules` in the order supplied and returns the first rule whose range
/// contains `mark`. First match wins; rule order is part of the contract.
pub fn lookup_grade(rules: &[GradeRule], mark: f64) -> Option<&GradeRule> {
    rules.iter().find(|rule| rule.matches(mark))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// One gradable component of a subject's exam (e.g. written, objective,
/// practical). Defaults are resolved here, at construction, never at read
/// sites.
pub struct ExamPartConfig {
    /// * `exam_code_title`: unique key of the part within the subject; raw
    ///   marks are looked up by it
    pub exam_code_title: String,
    /// * `total_mark`: maximum raw mark of the part
    #[serde(default = "default_total_mark")]
    #[builder(default = DEFAULT_TOTAL_MARK)]
    pub total_mark:      f64,
    /// * `conversion`: weight the part contributes after normalization
    #[serde(default = "default_conversion")]
    #[builder(default = DEFAULT_CONVERSION)]
    pub conversion:      f64,
    /// * `pass_mark`: converted mark the part must reach when it is an
    ///   individual-pass part
    #[serde(default)]
    #[builder(default)]
    pub pass_mark:       f64,
    /// * `is_individual`: the part must independently clear its own
    ///   `pass_mark`
    #[serde(default)]
    #[builder(default)]
    pub is_individual:   bool,
    /// * `is_overall`: the part is included in the overall-pass aggregate
    #[serde(default)]
    #[builder(default)]
    pub is_overall:      bool,
}

impl ExamPartConfig {
    /// Normalizes a raw mark against the part's total and scales it by the
    /// part's conversion weight.
    pub fn converted(&self, raw_mark: f64) -> f64 {
        (raw_mark / self.total_mark) * self.conversion
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// The full grading configuration for one subject's exam.
pub struct SubjectConfig {
    /// * `exam_name`: display name of the exam
    #[serde(default = "default_exam_name")]
    #[builder(default = DEFAULT_EXAM_NAME.to_string())]
    pub exam_name:            String,
    /// * `subject_name`: display name of the subject
    pub subject_name:         String,
    /// * `method_of_evaluation`: rounding policy applied at every conversion
    ///   boundary
    #[serde(default)]
    #[builder(default)]
    pub method_of_evaluation: MethodOfEvaluation,
    /// * `grace_mark`: remediation budget added to a failing final mark
    #[serde(default)]
    #[builder(default)]
    pub grace_mark:           f64,
    /// * `attendance_required`: whether an absent student fails outright
    #[serde(default)]
    #[builder(default)]
    pub attendance_required:  bool,
    /// * `highest_fail_mark`: highest mark that still fails; the pass
    ///   boundary sits just above it
    #[serde(default)]
    #[builder(default)]
    pub highest_fail_mark:    Option<f64>,
    /// * `overall_pass_mark`: aggregate the overall-flagged parts must reach,
    ///   if set
    #[serde(default)]
    #[builder(default)]
    pub overall_pass_mark:    Option<f64>,
    /// * `parts`: ordered exam parts (`exam_config` on the wire historically)
    #[serde(alias = "exam_config")]
    pub parts:                Vec<ExamPartConfig>,
    /// * `grade_points`: ordered grade rules, scanned first-match-wins
    #[serde(default)]
    #[builder(default)]
    pub grade_points:         Vec<GradeRule>,
}

impl SubjectConfig {
    /// The mark a student must reach to pass outright: just above the
    /// configured highest failing mark, or the conventional boundary of 33
    /// when none is configured.
    pub fn fail_threshold(&self) -> f64 {
        match self.highest_fail_mark {
            Some(highest) => highest + FAIL_MARK_MARGIN,
            None => DEFAULT_FAIL_THRESHOLD,
        }
    }
}

/// serde default for [`ExamPartConfig::total_mark`]
fn default_total_mark() -> f64 {
    DEFAULT_TOTAL_MARK
}

/// serde default for [`ExamPartConfig::conversion`]
fn default_conversion() -> f64 {
    DEFAULT_CONVERSION
}

/// serde default for [`SubjectConfig::exam_name`]
fn default_exam_name() -> String {
    DEFAULT_EXAM_NAME.to_string()
}
