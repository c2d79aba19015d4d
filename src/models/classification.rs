use strum_macros::{Display, EnumIter};

/// Shape classification of a well's melt signal relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum WellClass {
    Typical,
    Undecided,
    Atypical,
}

/// Classify a well by its DTW distance from the reference curve.
///
/// At or below the lower threshold the shape counts as typical, at or above
/// the upper threshold as atypical; the band in between stays undecided for
/// manual review.
pub fn classify_by_distance(distance: f64, lower: f64, upper: f64) -> WellClass {
    if distance <= lower {
        WellClass::Typical
    } else if distance >= upper {
        WellClass::Atypical
    } else {
        WellClass::Undecided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_on_both_sides() {
        assert_eq!(classify_by_distance(0.5, 0.5, 1.5), WellClass::Typical);
        assert_eq!(classify_by_distance(1.5, 0.5, 1.5), WellClass::Atypical);
        assert_eq!(classify_by_distance(1.0, 0.5, 1.5), WellClass::Undecided);
        assert_eq!(classify_by_distance(0.0, 0.5, 1.5), WellClass::Typical);
        assert_eq!(classify_by_distance(7.3, 0.5, 1.5), WellClass::Atypical);
    }
}
