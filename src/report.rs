#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use crate::{
    marks::{MarkBatch, ResultStatus, SubjectEvaluation},
    results::{AggregateOutcome, StudentResult},
};

/// Colors a pass/fail status for terminal display.
fn colored_status(status: ResultStatus) -> String {
    match status {
        ResultStatus::Pass => format!("{}", "Pass".green()),
        ResultStatus::Fail => format!("{}", "Fail".red()),
    }
}

#[derive(Tabled)]
/// A display row for one evaluated (student, subject) pair
struct MarkRow {
    #[tabled(rename = "Student")]
    /// * `student_id`: the student's identifier
    student_id: String,
    #[tabled(rename = "Obtained")]
    /// * `obtained_mark`: the rounded obtained mark
    obtained:   String,
    #[tabled(rename = "Final")]
    /// * `final_mark`: obtained plus applied grace
    final_mark: String,
    #[tabled(rename = "Grace")]
    /// * `grace`: grace applied, if any
    grace:      String,
    #[tabled(rename = "Grade")]
    /// * `grade`: the letter grade
    grade:      String,
    #[tabled(rename = "Status")]
    /// * `status`: pass/fail, colored
    status:     String,
    #[tabled(rename = "Remark")]
    /// * `remark`: the failure or grace remark
    remark:     String,
}

impl From<&SubjectEvaluation> for MarkRow {
    fn from(eval: &SubjectEvaluation) -> Self {
        Self {
            student_id: eval.student_id.clone(),
            obtained:   format!("{:.2}", eval.obtained_mark),
            final_mark: format!("{:.2}", eval.final_mark),
            grace:      format!("{:.2}", eval.grace_mark),
            grade:      eval.grade.clone(),
            status:     colored_status(eval.result_status),
            remark:     eval.remark.clone(),
        }
    }
}

/// Renders a mark-calculation batch as a table headed by the exam and
/// subject names.
pub fn render_marks_table(batch: &MarkBatch) -> String {
    let rows: Vec<MarkRow> = batch.results.iter().map(MarkRow::from).collect();
    Table::new(&rows)
        .with(Panel::header(format!("{} — {}", batch.exam_name, batch.subject_name)))
        .with(Panel::footer(format!("{} students", batch.results.len())))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(24).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

#[derive(Tabled)]
/// A display row for one student's final result
struct ResultRow {
    #[tabled(rename = "Roll")]
    /// * `roll`: the student's roll number
    roll:     String,
    #[tabled(rename = "Name")]
    /// * `name`: the student's name
    name:     String,
    #[tabled(rename = "GPA")]
    /// * `gpa`: the final GPA
    gpa:      String,
    #[tabled(rename = "Letter")]
    /// * `letter`: the overall letter grade
    letter:   String,
    #[tabled(rename = "Status")]
    /// * `status`: pass/fail, colored
    status:   String,
    #[tabled(rename = "Bonus")]
    /// * `bonus`: the optional-subject bonus
    bonus:    String,
    #[tabled(rename = "Subjects")]
    /// * `subjects`: merged subject grades, comma separated
    subjects: String,
}

impl From<&StudentResult> for ResultRow {
    fn from(result: &StudentResult) -> Self {
        let subjects = result
            .subjects
            .iter()
            .map(|s| format!("{}: {}", s.subject_name, s.grade))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            roll: result.roll.clone(),
            name: result.student_name.clone(),
            gpa: format!("{:.2}", result.gpa),
            letter: result.letter_grade.clone(),
            status: colored_status(result.result_status),
            bonus: format!("{:.0}", result.optional_bonus),
            subjects,
        }
    }
}

#[derive(Tabled)]
/// A display row for the batch-level highest mark of one subject
struct HighestRow {
    #[tabled(rename = "Subject")]
    /// * `subject_id`: the subject's identifier
    subject_id: String,
    #[tabled(rename = "Highest Mark")]
    /// * `highest`: the highest merged final mark across the batch
    highest:    String,
}

/// Renders an aggregation outcome: a per-student summary table followed by
/// the batch-level highest marks per subject.
pub fn render_results_table(outcome: &AggregateOutcome) -> String {
    let rows: Vec<ResultRow> = outcome.results.iter().map(ResultRow::from).collect();
    let results = Table::new(&rows)
        .with(Panel::header("Final Results"))
        .with(Panel::footer(format!("Total: {} students", outcome.total_students)))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(32).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string();

    let highest_rows: Vec<HighestRow> = outcome
        .highest_marks
        .iter()
        .map(|(subject_id, mark)| HighestRow {
            subject_id: subject_id.clone(),
            highest:    format!("{mark:.2}"),
        })
        .collect();
    let highest = Table::new(&highest_rows)
        .with(Panel::header("Highest Marks"))
        .with(Style::modern())
        .to_string();

    format!("{results}\n{highest}")
}
