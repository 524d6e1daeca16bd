//! # marksheet
//!
//! An exam mark calculator and result aggregator. Given a declarative grading
//! configuration (exam parts, pass marks, a grade-rule table) and raw
//! per-part marks, it computes per-subject results (obtained mark, pass/fail,
//! grace remediation, grade lookup) and aggregates them across subjects into
//! a final result (GPA, optional-subject bonus, letter grade), including
//! merged handling for combined subjects.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// For grading configuration: evaluation methods, exam parts, grade rules
pub mod config;
/// A module defining constant default values used throughout the grading rules
pub mod constants;
/// For evaluating one subject's marks for a batch of students
pub mod marks;
/// For payload envelopes consumed by the CLI and loading them from disk
pub mod payload;
/// For rendering batch outputs as human-readable tables
pub mod report;
/// For aggregating per-subject results into final student results
pub mod results;
/// Rounding helpers applied at every mark conversion boundary
pub mod util;
