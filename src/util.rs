#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::config::MethodOfEvaluation;

/// Rounds a mark according to the subject's method of evaluation.
///
/// * `AtActual` returns the mark unchanged.
/// * `AlwaysDown` floors, `AlwaysUp` ceils.
/// * `WithoutFraction` rounds half-up at the 0.50 threshold (2.49 → 2,
///   2.50 → 3). This is an explicit half-up rule, not banker's rounding.
///
/// Applied at every conversion boundary (obtained mark, per-part converted
/// marks, the overall-pass aggregate) so rounding stays consistent across
/// stages.
pub fn round_mark(mark: f64, method: MethodOfEvaluation) -> f64 {
    match method {
        MethodOfEvaluation::AtActual => mark,
        MethodOfEvaluation::AlwaysDown => mark.floor(),
        MethodOfEvaluation::AlwaysUp => mark.ceil(),
        MethodOfEvaluation::WithoutFraction => {
            if mark - mark.floor() >= 0.50 {
                mark.floor() + 1.0
            } else {
                mark.floor()
            }
        }
    }
}

/// Rounds to two decimal places, half away from zero. Used for GPA figures
/// and combined-subject averages.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_actual_is_identity() {
        assert_eq!(round_mark(2.49, MethodOfEvaluation::AtActual), 2.49);
        assert_eq!(round_mark(33.0, MethodOfEvaluation::AtActual), 33.0);
    }

    #[test]
    fn always_down_floors() {
        assert_eq!(round_mark(2.99, MethodOfEvaluation::AlwaysDown), 2.0);
        assert_eq!(round_mark(2.0, MethodOfEvaluation::AlwaysDown), 2.0);
    }

    #[test]
    fn always_up_ceils() {
        assert_eq!(round_mark(2.01, MethodOfEvaluation::AlwaysUp), 3.0);
        assert_eq!(round_mark(2.0, MethodOfEvaluation::AlwaysUp), 2.0);
    }

    #[test]
    fn without_fraction_rounds_half_up() {
        assert_eq!(round_mark(2.49, MethodOfEvaluation::WithoutFraction), 2.0);
        assert_eq!(round_mark(2.50, MethodOfEvaluation::WithoutFraction), 3.0);
        assert_eq!(round_mark(2.999, MethodOfEvaluation::WithoutFraction), 3.0);
    }

    #[test]
    fn round2_is_half_away_from_zero() {
        assert_eq!(round2(4.0 / 3.0), 1.33);
        assert_eq!(round2(5.0 / 3.0), 1.67);
        assert_eq!(round2(120.0 / 2.0), 60.0);
    }
}
