#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Fallback pass boundary on a 0-100 scale, used when a subject's
/// `highest_fail_mark` is not configured.
pub const DEFAULT_FAIL_THRESHOLD: f64 = 33.0;

/// Margin added to a configured `highest_fail_mark` to turn the highest
/// failing mark into the lowest passing one.
pub const FAIL_MARK_MARGIN: f64 = 0.01;

/// Default total mark of an exam part when the configuration omits it.
pub const DEFAULT_TOTAL_MARK: f64 = 100.0;

/// Default conversion (weight) of an exam part when the configuration omits
/// it.
pub const DEFAULT_CONVERSION: f64 = 100.0;

/// Minimum GPA required for an overall Pass once no subject has failed.
pub const PASS_GPA: f64 = 2.00;

/// Scale factor mapping a GPA back onto the 0-100 mark scale for letter-grade
/// lookup (5.00 GPA = 100 marks).
pub const GPA_MARK_SCALE: f64 = 20.0;

/// Minimum final mark an optional subject must reach before any bonus or
/// grade-point deduction applies.
pub const OPTIONAL_MIN_MARK: f64 = 40.0;

/// Minimum recomputed grade point an optional subject must reach before any
/// bonus or grade-point deduction applies.
pub const OPTIONAL_MIN_GRADE_POINT: f64 = 2.0;

/// Final mark at which the optional subject earns the larger bonus.
pub const OPTIONAL_HIGH_MARK: f64 = 53.0;

/// Final mark at which the optional subject earns the smaller bonus.
pub const OPTIONAL_LOW_MARK: f64 = 41.0;

/// Bonus awarded when the optional subject's final mark reaches
/// [`OPTIONAL_HIGH_MARK`].
pub const OPTIONAL_HIGH_BONUS: f64 = 13.0;

/// Bonus awarded when the optional subject's final mark reaches
/// [`OPTIONAL_LOW_MARK`].
pub const OPTIONAL_LOW_BONUS: f64 = 1.0;

/// Grade points deducted from the total whenever the optional-subject gate
/// passes, regardless of the bonus tier.
pub const OPTIONAL_GP_DEDUCTION: f64 = 2.0;

/// Subject type excluded from GPA and subject-count accumulation.
pub const UNCOUNTABLE_SUBJECT_TYPE: &str = "Uncountable";

/// Exam type stamped on every mark-calculation batch envelope.
pub const SEMESTER_EXAM_TYPE: &str = "semester";

/// Exam name used when the subject configuration does not supply one.
pub const DEFAULT_EXAM_NAME: &str = "Semester Exam";
