#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::info;
use typed_builder::TypedBuilder;

use crate::{
    config::GradeRule,
    constants::{
        GPA_MARK_SCALE, OPTIONAL_GP_DEDUCTION, OPTIONAL_HIGH_BONUS, OPTIONAL_HIGH_MARK,
        OPTIONAL_LOW_BONUS, OPTIONAL_LOW_MARK, OPTIONAL_MIN_GRADE_POINT, OPTIONAL_MIN_MARK,
        PASS_GPA, UNCOUNTABLE_SUBJECT_TYPE,
    },
    marks::ResultStatus,
    util::round2,
};

/// An ordered grade-rule table for aggregation lookups.
///
/// Rules are stably sorted descending by `from_mark` at construction and
/// scanned first-match-wins; rules with equal `from_mark` keep their supplied
/// order. A mark matching no rule resolves to grade `F` / grade point 0 —
/// a configuration gap, not an error.
pub struct GradeRuleTable {
    /// The rules, sorted descending by `from_mark`
    rules: Vec<GradeRule>,
}

impl GradeRuleTable {
    /// Builds a table from rules in any order.
    pub fn new(mut rules: Vec<GradeRule>) -> Self {
        rules.sort_by(|a, b| b.from_mark.total_cmp(&a.from_mark));
        Self { rules }
    }

    /// The letter grade for a mark, `"F"` when no rule matches.
    pub fn grade_for(&self, mark: f64) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(mark))
            .map_or("F", |rule| rule.grade.as_str())
    }

    /// The grade point for a mark, 0 when no rule matches.
    pub fn grade_point_for(&self, mark: f64) -> f64 {
        self.rules
            .iter()
            .find(|rule| rule.matches(mark))
            .map_or(0.0, |rule| rule.grade_point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// One already-evaluated subject result, as handed to the aggregator.
pub struct SubjectMarkRecord {
    /// * `subject_id`: identifier of the subject
    pub subject_id:   String,
    /// * `subject_name`: display name of the subject
    pub subject_name: String,
    /// * `final_mark`: the evaluated final mark
    pub final_mark:   f64,
    /// * `grace_mark`: grace applied during evaluation
    #[serde(default)]
    #[builder(default)]
    pub grace_mark:   f64,
    /// * `subject_type`: `"Uncountable"` subjects are excluded from GPA
    #[serde(default)]
    #[builder(default)]
    pub subject_type: String,
    /// * `combined_id`: correlation key; records sharing one merge into a
    ///   single combined subject
    #[serde(default)]
    #[builder(default)]
    pub combined_id:  Option<String>,
}

impl SubjectMarkRecord {
    /// The grouping key: the combined correlation key if present, else the
    /// subject's own id.
    fn group_key(&self) -> &str {
        self.combined_id.as_deref().unwrap_or(&self.subject_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// One student's evaluated subjects, ready for aggregation.
pub struct StudentAggregateInput {
    /// * `student_id`: identifier of the student
    pub student_id:          String,
    /// * `student_name`: display name of the student
    pub student_name:        String,
    /// * `roll`: the student's roll number
    pub roll:                String,
    /// * `subjects`: evaluated subject records (`marks` on the wire
    ///   historically), in display order
    #[serde(default, alias = "marks")]
    #[builder(default)]
    pub subjects:            Vec<SubjectMarkRecord>,
    /// * `optional_subject_id`: the student's optional (4th) subject, if any
    #[serde(default)]
    #[builder(default)]
    pub optional_subject_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A resolved subject group: a single subject re-graded, or a combined group
/// merged into one reported subject.
pub struct MergedSubject {
    /// * `subject_id`: the subject's id, or member ids joined with `_`
    pub subject_id:     String,
    /// * `subject_name`: the subject's name, or member names joined with
    ///   ` + `
    pub subject_name:   String,
    /// * `final_mark`: the mark the group resolves to
    pub final_mark:     f64,
    /// * `grade_point`: grade point from the rule table
    pub grade_point:    f64,
    /// * `grade`: letter grade from the rule table
    pub grade:          String,
    /// * `grace_mark`: grace summed over the group's members
    pub grace_mark:     f64,
    /// * `is_uncountable`: excluded from GPA and subject count
    pub is_uncountable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A student's final aggregated result across all subjects.
pub struct StudentResult {
    /// * `student_id`: identifier of the student
    pub student_id:           String,
    /// * `student_name`: display name of the student
    pub student_name:         String,
    /// * `roll`: the student's roll number
    pub roll:                 String,
    /// * `subjects`: merged subject results, input grouping order preserved
    pub subjects:             Vec<MergedSubject>,
    /// * `gpa_without_optional`: GPA before the optional-subject deduction
    pub gpa_without_optional: f64,
    /// * `gpa`: final GPA, 0 when any subject failed
    pub gpa:                  f64,
    /// * `result_status`: overall pass/fail
    pub result_status:        ResultStatus,
    /// * `letter_grade`: letter grade of the GPA mapped back to the mark
    ///   scale
    pub letter_grade:         String,
    /// * `optional_bonus`: bonus earned by the optional subject
    pub optional_bonus:       f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The output of aggregating a batch of students.
pub struct AggregateOutcome {
    /// * `results`: one final result per student, in input order
    pub results:        Vec<StudentResult>,
    /// * `highest_marks`: highest merged final mark per subject id across
    ///   the batch
    pub highest_marks:  BTreeMap<String, f64>,
    /// * `total_students`: number of students aggregated
    pub total_students: usize,
}

/// Aggregates per-subject results into final student results: merges
/// combined subjects, computes GPA, applies the optional-subject (4th
/// subject) rule, and determines overall pass/fail and letter grade.
pub struct ResultAggregator {
    /// The grade-rule table shared by every lookup
    table: GradeRuleTable,
}

impl ResultAggregator {
    /// Creates an aggregator over a set of grade rules.
    pub fn new(grade_rules: Vec<GradeRule>) -> Self {
        Self { table: GradeRuleTable::new(grade_rules) }
    }

    /// Aggregates a batch of students, tracking the highest merged mark per
    /// subject across the whole batch in the same pass.
    pub fn aggregate(&self, students: &[StudentAggregateInput]) -> AggregateOutcome {
        info!(students = students.len(), "aggregating exam results");

        let mut results = Vec::with_capacity(students.len());
        let mut highest_marks: BTreeMap<String, f64> = BTreeMap::new();

        for student in students {
            let result = self.process_student(student);

            for subject in &result.subjects {
                let entry = highest_marks.entry(subject.subject_id.clone()).or_insert(0.0);
                if subject.final_mark > *entry {
                    *entry = subject.final_mark;
                }
            }

            results.push(result);
        }

        let total_students = results.len();
        AggregateOutcome { results, highest_marks, total_students }
    }

    /// Resolves one student's subject groups and computes their final GPA,
    /// status, and letter grade.
    fn process_student(&self, student: &StudentAggregateInput) -> StudentResult {
        let mut merged = Vec::new();
        let mut total_gp = 0.0;
        let mut subject_count = 0usize;
        let mut failed = false;

        for (_, group) in group_subjects(&student.subjects) {
            let subject = if group.len() > 1 {
                self.merge_combined(&group)
            } else {
                self.process_single(group[0])
            };

            if subject.grade == "F" {
                failed = true;
            }
            if !subject.is_uncountable {
                total_gp += subject.grade_point;
                subject_count += 1;
            }

            merged.push(subject);
        }

        let (optional_bonus, deduct_gp) = self.optional_subject_rule(student);

        let final_gp = if failed { 0.0 } else { (total_gp - deduct_gp).max(0.0) };
        let gpa = if subject_count > 0 { round2(final_gp / subject_count as f64) } else { 0.0 };
        let gpa_without_optional = if subject_count > 0 {
            round2(total_gp / subject_count as f64)
        } else {
            0.0
        };

        let result_status = if failed || gpa < PASS_GPA {
            ResultStatus::Fail
        } else {
            ResultStatus::Pass
        };
        let letter_grade = if failed {
            "F".to_string()
        } else {
            // 5.00 GPA = 100 marks, so the one rule table serves both scales
            self.table.grade_for(gpa * GPA_MARK_SCALE).to_string()
        };

        StudentResult {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            roll: student.roll.clone(),
            subjects: merged,
            gpa_without_optional,
            gpa,
            result_status,
            letter_grade,
            optional_bonus,
        }
    }

    /// Re-grades a single subject from its final mark, independent of any
    /// grade the evaluator already stamped on it.
    fn process_single(&self, record: &SubjectMarkRecord) -> MergedSubject {
        MergedSubject {
            subject_id: record.subject_id.clone(),
            subject_name: record.subject_name.clone(),
            final_mark: record.final_mark,
            grade_point: self.table.grade_point_for(record.final_mark),
            grade: self.table.grade_for(record.final_mark).to_string(),
            grace_mark: record.grace_mark,
            is_uncountable: record.subject_type == UNCOUNTABLE_SUBJECT_TYPE,
        }
    }

    /// Merges a combined group into one reported subject. If any member
    /// grades to F on its own, the merged mark is the SUM of all member
    /// marks with grade F — a deliberate penalty. Otherwise members are
    /// averaged and the average re-graded. Grace is summed either way.
    fn merge_combined(&self, members: &[&SubjectMarkRecord]) -> MergedSubject {
        let subject_id = members.iter().map(|m| m.subject_id.as_str()).join("_");
        let subject_name = members.iter().map(|m| m.subject_name.as_str()).join(" + ");
        let total_mark: f64 = members.iter().map(|m| m.final_mark).sum();
        let grace_mark: f64 = members.iter().map(|m| m.grace_mark).sum();

        let any_failed = members.iter().any(|m| self.table.grade_for(m.final_mark) == "F");
        if any_failed {
            return MergedSubject {
                subject_id,
                subject_name,
                final_mark: total_mark,
                grade_point: 0.0,
                grade: "F".to_string(),
                grace_mark,
                is_uncountable: false,
            };
        }

        let average = total_mark / members.len() as f64;
        MergedSubject {
            subject_id,
            subject_name,
            final_mark: round2(average),
            grade_point: self.table.grade_point_for(average),
            grade: self.table.grade_for(average).to_string(),
            grace_mark,
            is_uncountable: false,
        }
    }

    /// The 4th-subject rule: when the optional subject clears its gate
    /// (mark >= 40 and recomputed grade point >= 2), its grade point leaves
    /// the main average (a flat deduction of 2) and is replaced by a small
    /// mark bonus tiered on the optional subject's own mark.
    fn optional_subject_rule(&self, student: &StudentAggregateInput) -> (f64, f64) {
        let Some(optional_id) = &student.optional_subject_id else {
            return (0.0, 0.0);
        };
        let Some(optional) = student.subjects.iter().find(|s| &s.subject_id == optional_id) else {
            return (0.0, 0.0);
        };

        let recomputed_gp = self.table.grade_point_for(optional.final_mark);
        if optional.final_mark >= OPTIONAL_MIN_MARK && recomputed_gp >= OPTIONAL_MIN_GRADE_POINT {
            let bonus = if optional.final_mark >= OPTIONAL_HIGH_MARK {
                OPTIONAL_HIGH_BONUS
            } else if optional.final_mark >= OPTIONAL_LOW_MARK {
                OPTIONAL_LOW_BONUS
            } else {
                0.0
            };
            (bonus, OPTIONAL_GP_DEDUCTION)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Partitions records into groups keyed by `combined_id`-else-own-id,
/// preserving the order each key is first seen. An explicit ordered list so
/// the output subject order is deterministic.
fn group_subjects(subjects: &[SubjectMarkRecord]) -> Vec<(&str, Vec<&SubjectMarkRecord>)> {
    let mut groups: Vec<(&str, Vec<&SubjectMarkRecord>)> = Vec::new();
    for record in subjects {
        let key = record.group_key();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key, vec![record])),
        }
    }
    groups
}
