#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, fmt::Display};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};
use typed_builder::TypedBuilder;

use crate::{
    config::{SubjectConfig, lookup_grade},
    constants::SEMESTER_EXAM_TYPE,
    payload::MarkCalculationPayload,
    util::round_mark,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// A student's attendance for the exam
pub enum AttendanceStatus {
    /// The student sat the exam
    Present,
    /// The student did not sit the exam
    Absent,
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only a case-insensitive "absent" counts as absent; any other
        // status string is treated as present.
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("absent") {
            Ok(Self::Absent)
        } else {
            Ok(Self::Present)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Whether a student passed or failed
pub enum ResultStatus {
    /// The student passed
    Pass,
    /// The student failed
    Fail,
}

impl Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "Pass"),
            Self::Fail => write!(f, "Fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// One student's raw submission for a subject's exam.
pub struct StudentPartMarks {
    /// * `student_id`: identifier of the student
    pub student_id:        String,
    /// * `part_marks`: raw mark per exam part, keyed by `exam_code_title`;
    ///   missing parts count as 0
    #[serde(default)]
    #[builder(default)]
    pub part_marks:        BTreeMap<String, f64>,
    /// * `attendance_status`: attendance for the exam; missing defaults to
    ///   absent when attendance is required
    #[serde(default)]
    #[builder(default)]
    pub attendance_status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The evaluated result of one (student, subject) pair.
pub struct SubjectEvaluation {
    /// * `student_id`: identifier of the student
    pub student_id:        String,
    /// * `obtained_mark`: rounded sum of the converted part marks
    pub obtained_mark:     f64,
    /// * `final_mark`: obtained mark plus any applied grace
    pub final_mark:        f64,
    /// * `grace_mark`: grace actually applied (0 when none)
    pub grace_mark:        f64,
    /// * `result_status`: pass/fail after all checks and grace
    pub result_status:     ResultStatus,
    /// * `remark`: why the student failed, or how they passed by grace
    pub remark:            String,
    /// * `part_marks`: the raw marks, echoed back
    pub part_marks:        BTreeMap<String, f64>,
    /// * `exam_name`: echoed from the configuration
    pub exam_name:         String,
    /// * `subject_name`: echoed from the configuration
    pub subject_name:      String,
    /// * `grade`: letter grade looked up from the final mark alone
    pub grade:             String,
    /// * `grade_point`: grade point looked up from the final mark alone
    pub grade_point:       f64,
    /// * `attendance_status`: the attendance, echoed back
    pub attendance_status: Option<AttendanceStatus>,
}

/// Evaluates one subject's configured exam for individual students.
///
/// Stages, in order: absence short-circuit, obtained-mark accumulation,
/// individual-part checks, overall check, fail threshold, grace remediation,
/// grade lookup. The grade is derived purely from the final mark against the
/// subject's grade rules, independent of the pass flag, so a failing student
/// can still carry a non-F grade.
pub struct SubjectMarkEvaluator<'a> {
    /// The subject's grading configuration
    config: &'a SubjectConfig,
}

impl<'a> SubjectMarkEvaluator<'a> {
    /// Creates an evaluator over one subject's configuration.
    pub fn new(config: &'a SubjectConfig) -> Self {
        Self { config }
    }

    /// Evaluates a single student's part marks against the configuration.
    pub fn evaluate(&self, student: &StudentPartMarks) -> SubjectEvaluation {
        let config = self.config;

        let is_absent = config.attendance_required
            && student
                .attendance_status
                .is_none_or(|status| status == AttendanceStatus::Absent);
        if is_absent {
            return self.absent_result(student);
        }

        let method = config.method_of_evaluation;
        let calculated: f64 = config
            .parts
            .iter()
            .map(|part| part.converted(self.raw_mark(student, &part.exam_code_title)))
            .sum();
        let obtained_mark = round_mark(calculated, method);

        let individual_pass = config
            .parts
            .iter()
            .filter(|part| part.is_individual)
            .all(|part| {
                let converted = part.converted(self.raw_mark(student, &part.exam_code_title));
                round_mark(converted, method) >= part.pass_mark
            });

        let overall_pass = match config.overall_pass_mark {
            None => true,
            Some(overall_pass_mark) => {
                let aggregate: f64 = config
                    .parts
                    .iter()
                    .filter(|part| part.is_overall)
                    .map(|part| part.converted(self.raw_mark(student, &part.exam_code_title)))
                    .sum();
                round_mark(aggregate, method) >= overall_pass_mark
            }
        };

        let fail_threshold = config.fail_threshold();
        let mut final_mark = obtained_mark;
        let mut pass = individual_pass && overall_pass && final_mark >= fail_threshold;
        let mut remark = Self::remark(pass, individual_pass, overall_pass).to_string();

        let mut applied_grace = 0.0;
        if !pass && config.grace_mark > 0.0 && final_mark < fail_threshold {
            let needed = (fail_threshold - final_mark).ceil();
            applied_grace = needed.min(config.grace_mark);
            final_mark += applied_grace;
            if final_mark >= fail_threshold {
                pass = true;
                remark = format!("Pass by Grace ({applied_grace} marks)");
            }
        }

        let (grade, grade_point) = match lookup_grade(&config.grade_points, final_mark) {
            Some(rule) => (rule.grade.clone(), rule.grade_point),
            None => ("F".to_string(), 0.0),
        };

        debug!(
            student_id = %student.student_id,
            obtained_mark,
            final_mark,
            applied_grace,
            pass,
            "evaluated subject marks"
        );

        SubjectEvaluation {
            student_id: student.student_id.clone(),
            obtained_mark,
            final_mark,
            grace_mark: applied_grace,
            result_status: if pass { ResultStatus::Pass } else { ResultStatus::Fail },
            remark,
            part_marks: student.part_marks.clone(),
            exam_name: config.exam_name.clone(),
            subject_name: config.subject_name.clone(),
            grade,
            grade_point,
            attendance_status: student.attendance_status,
        }
    }

    /// The short-circuit result for an absent student: everything zeroed,
    /// failed, graded F.
    fn absent_result(&self, student: &StudentPartMarks) -> SubjectEvaluation {
        SubjectEvaluation {
            student_id: student.student_id.clone(),
            obtained_mark: 0.0,
            final_mark: 0.0,
            grace_mark: 0.0,
            result_status: ResultStatus::Fail,
            remark: "Absent".to_string(),
            part_marks: student.part_marks.clone(),
            exam_name: self.config.exam_name.clone(),
            subject_name: self.config.subject_name.clone(),
            grade: "F".to_string(),
            grade_point: 0.0,
            attendance_status: Some(AttendanceStatus::Absent),
        }
    }

    /// Looks up a raw part mark; missing parts count as 0.
    fn raw_mark(&self, student: &StudentPartMarks, exam_code_title: &str) -> f64 {
        student.part_marks.get(exam_code_title).copied().unwrap_or(0.0)
    }

    /// The failure remark, checked in precedence order: individual first,
    /// then overall, then the threshold.
    fn remark(pass: bool, individual_pass: bool, overall_pass: bool) -> &'static str {
        if pass {
            ""
        } else if !individual_pass {
            "Failed Individual"
        } else if !overall_pass {
            "Failed Overall"
        } else {
            "Below Threshold"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The output envelope of a mark-calculation batch: one evaluation per
/// student plus the identifying fields echoed for the downstream store.
pub struct MarkBatch {
    /// * `results`: one evaluation per student, in submission order
    pub results:      Vec<SubjectEvaluation>,
    /// * `institute_id`: echoed from the payload
    pub institute_id: String,
    /// * `exam_type`: always the semester exam type
    pub exam_type:    String,
    /// * `exam_name`: echoed from the subject configuration
    pub exam_name:    String,
    /// * `subject_name`: echoed from the subject configuration
    pub subject_name: String,
}

/// Evaluates every student in a mark-calculation payload against its first
/// subject configuration and wraps the results in the batch envelope.
pub fn calculate_marks(payload: &MarkCalculationPayload) -> Result<MarkBatch> {
    let subject = payload
        .subjects
        .first()
        .context("mark calculation payload contains no subject configuration")?;

    info!(
        institute_id = %payload.institute_id,
        subject_name = %subject.subject_name,
        students = payload.students.len(),
        "calculating exam marks"
    );

    let evaluator = SubjectMarkEvaluator::new(subject);
    let results = payload.students.iter().map(|s| evaluator.evaluate(s)).collect();

    Ok(MarkBatch {
        results,
        institute_id: payload.institute_id.clone(),
        exam_type: SEMESTER_EXAM_TYPE.to_string(),
        exam_name: subject.exam_name.clone(),
        subject_name: subject.subject_name.clone(),
    })
}
