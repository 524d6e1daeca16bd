use marksheet::{
    config::MethodOfEvaluation,
    marks::{AttendanceStatus, ResultStatus, SubjectMarkEvaluator},
    payload::{MarkCalculationPayload, ResultCalculationPayload},
};

#[test]
fn marks_payload_applies_defaults_at_construction() {
    let payload: MarkCalculationPayload = serde_json::from_str(
        r#"{
            "institute_id": "inst-1",
            "subjects": [{
                "subject_name": "Physics",
                "exam_config": [
                    {"exam_code_title": "CQ"},
                    {"exam_code_title": "MCQ", "total_mark": 30, "conversion": 30}
                ],
                "grade_points": [
                    {"from_mark": 33, "to_mark": 100, "grade": "P", "grade_point": 2},
                    {"from_mark": 0, "to_mark": 32, "grade": "F", "grade_point": 0}
                ]
            }],
            "students": [
                {"student_id": "s1", "part_marks": {"CQ": 50}, "attendance_status": "present"}
            ]
        }"#,
    )
    .expect("parse payload");

    let subject = &payload.subjects[0];
    assert_eq!(subject.exam_name, "Semester Exam");
    assert_eq!(subject.method_of_evaluation, MethodOfEvaluation::AtActual);
    assert_eq!(subject.grace_mark, 0.0);
    assert!(!subject.attendance_required);
    assert_eq!(subject.highest_fail_mark, None);
    assert_eq!(subject.overall_pass_mark, None);

    // `exam_config` is the historical wire name for `parts`.
    let cq = &subject.parts[0];
    assert_eq!(cq.total_mark, 100.0);
    assert_eq!(cq.conversion, 100.0);
    assert_eq!(cq.pass_mark, 0.0);
    assert!(!cq.is_individual);
    assert!(!cq.is_overall);

    let student = &payload.students[0];
    assert_eq!(student.attendance_status, Some(AttendanceStatus::Present));

    // The defaulted configuration evaluates cleanly end to end.
    let result = SubjectMarkEvaluator::new(subject).evaluate(student);
    assert_eq!(result.obtained_mark, 50.0);
    assert_eq!(result.result_status, ResultStatus::Pass);
    assert_eq!(result.grade, "P");
}

#[test]
fn unknown_evaluation_method_falls_back_to_at_actual() {
    assert_eq!(MethodOfEvaluation::parse("Always Down"), MethodOfEvaluation::AlwaysDown);
    assert_eq!(MethodOfEvaluation::parse("Banker's"), MethodOfEvaluation::AtActual);

    let method: MethodOfEvaluation =
        serde_json::from_str(r#""Without Fraction""#).expect("parse method");
    assert_eq!(method, MethodOfEvaluation::WithoutFraction);

    let method: MethodOfEvaluation =
        serde_json::from_str(r#""Nearest Even""#).expect("parse method");
    assert_eq!(method, MethodOfEvaluation::AtActual);
}

#[test]
fn attendance_status_parses_case_insensitively() {
    let status: AttendanceStatus = serde_json::from_str(r#""ABSENT""#).expect("parse status");
    assert_eq!(status, AttendanceStatus::Absent);

    let status: AttendanceStatus = serde_json::from_str(r#""Present""#).expect("parse status");
    assert_eq!(status, AttendanceStatus::Present);

    // Anything that is not "absent" counts as present.
    let status: AttendanceStatus = serde_json::from_str(r#""late""#).expect("parse status");
    assert_eq!(status, AttendanceStatus::Present);
}

#[test]
fn results_payload_accepts_the_marks_alias() {
    let payload: ResultCalculationPayload = serde_json::from_str(
        r#"{
            "grade_rules": [
                {"from_mark": 33, "to_mark": 100, "grade": "P", "grade_point": 3},
                {"from_mark": 0, "to_mark": 32, "grade": "F", "grade_point": 0}
            ],
            "students": [{
                "student_id": "s1",
                "student_name": "Rahim",
                "roll": "101",
                "marks": [
                    {"subject_id": "math", "subject_name": "Math", "final_mark": 75}
                ],
                "optional_subject_id": null
            }]
        }"#,
    )
    .expect("parse payload");

    let student = &payload.students[0];
    assert_eq!(student.subjects.len(), 1);
    assert_eq!(student.subjects[0].grace_mark, 0.0);
    assert_eq!(student.subjects[0].subject_type, "");
    assert_eq!(student.subjects[0].combined_id, None);
    assert_eq!(student.optional_subject_id, None);
}

#[test]
fn mark_batch_serializes_with_wire_field_names() {
    let payload: MarkCalculationPayload = serde_json::from_str(
        r#"{
            "institute_id": "inst-1",
            "subjects": [{
                "subject_name": "Physics",
                "parts": [{"exam_code_title": "CQ"}],
                "grade_points": [
                    {"from_mark": 33, "to_mark": 100, "grade": "P", "grade_point": 2}
                ]
            }],
            "students": [
                {"student_id": "s1", "part_marks": {"CQ": 40}}
            ]
        }"#,
    )
    .expect("parse payload");

    let batch = marksheet::marks::calculate_marks(&payload).expect("calculate");
    let json = serde_json::to_value(&batch).expect("serialize batch");

    assert_eq!(json["exam_type"], "semester");
    assert_eq!(json["results"][0]["result_status"], "Pass");
    assert_eq!(json["results"][0]["final_mark"], 40.0);
    assert_eq!(json["results"][0]["part_marks"]["CQ"], 40.0);
}
