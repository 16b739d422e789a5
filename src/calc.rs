use crate::domain::{Enrollment, Grade};
use crate::error::Result;

/// Grade scale the 0-100 marks are normalized onto.
pub const GPA_SCALE: f64 = 4.0;

/// Resolves a course's credit weight. Implemented by storage.
pub trait CourseCatalog {
    fn course_credits(&self, course_id: i64) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpaSummary {
    pub gpa: f64,
    pub total_credits: i64,
    pub graded_count: usize,
    pub ungraded_count: usize,
}

/// Credit-weighted GPA over graded enrollments.
///
/// Each grade is normalized with `(grade / 100) * 4.0` and weighted by the
/// course credits. Ungraded enrollments contribute neither points nor
/// credits, and their course is not looked up. An empty input, or one
/// whose credits sum to zero, yields `0.0`. A failed credit lookup aborts
/// the whole computation.
pub fn gpa_summary<'a, I, C>(enrollments: I, catalog: &C) -> Result<GpaSummary>
where
    I: IntoIterator<Item = &'a Enrollment>,
    C: CourseCatalog + ?Sized,
{
    let mut total_points: f64 = 0.0;
    let mut total_credits: i64 = 0;
    let mut graded_count: usize = 0;
    let mut ungraded_count: usize = 0;

    for e in enrollments {
        match e.grade() {
            Grade::Ungraded => {
                ungraded_count += 1;
            }
            Grade::Scored(grade) => {
                let credits = catalog.course_credits(e.course_id())?;
                let normalized = (grade / 100.0) * GPA_SCALE;
                total_points += normalized * (credits as f64);
                total_credits += credits;
                graded_count += 1;
            }
        }
    }

    let gpa = if total_credits == 0 {
        0.0
    } else {
        total_points / (total_credits as f64)
    };

    Ok(GpaSummary {
        gpa,
        total_credits,
        graded_count,
        ungraded_count,
    })
}

pub fn calculate_gpa<'a, I, C>(enrollments: I, catalog: &C) -> Result<f64>
where
    I: IntoIterator<Item = &'a Enrollment>,
    C: CourseCatalog + ?Sized,
{
    Ok(gpa_summary(enrollments, catalog)?.gpa)
}

/// Unweighted mean of graded marks on the 0-100 scale; `0.0` when nothing
/// is graded.
pub fn semester_average<I>(grades: I) -> f64
where
    I: IntoIterator<Item = Grade>,
{
    let mut sum: f64 = 0.0;
    let mut count: usize = 0;
    for g in grades {
        if let Some(v) = g.value() {
            sum += v;
            count += 1;
        }
    }
    if count > 0 {
        sum / (count as f64)
    } else {
        0.0
    }
}

/// Half-up rounding to `places` decimals for report display.
pub fn round_half_up(x: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    ((x * factor) + 0.5).floor() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrarError;
    use std::collections::HashMap;

    struct Credits(HashMap<i64, i64>);

    impl CourseCatalog for Credits {
        fn course_credits(&self, course_id: i64) -> Result<i64> {
            self.0
                .get(&course_id)
                .copied()
                .ok_or_else(|| RegistrarError::not_found("course", course_id))
        }
    }

    fn catalog(pairs: &[(i64, i64)]) -> Credits {
        Credits(pairs.iter().copied().collect())
    }

    fn enrollment(course_id: i64, grade: f64) -> Enrollment {
        Enrollment::new(1, course_id, None, 1, grade).expect("enrollment")
    }

    #[test]
    fn empty_list_is_zero() {
        let none: Vec<Enrollment> = Vec::new();
        let gpa = calculate_gpa(&none, &catalog(&[])).expect("gpa");
        assert_eq!(gpa, 0.0);
    }

    #[test]
    fn zero_total_credits_is_zero_not_nan() {
        // Credits below 1 cannot pass Course validation, but storage is free
        // to report anything.
        let es = vec![enrollment(1, 90.0), enrollment(2, 50.0)];
        let gpa = calculate_gpa(&es, &catalog(&[(1, 0), (2, 0)])).expect("gpa");
        assert_eq!(gpa, 0.0);
    }

    #[test]
    fn single_enrollment() {
        let es = vec![enrollment(1, 80.0)];
        let gpa = calculate_gpa(&es, &catalog(&[(1, 3)])).expect("gpa");
        assert!((gpa - 3.2).abs() < 1e-12);
    }

    #[test]
    fn weighted_by_credits() {
        let es = vec![enrollment(1, 100.0), enrollment(2, 60.0)];
        let gpa = calculate_gpa(&es, &catalog(&[(1, 4), (2, 2)])).expect("gpa");
        let expected = (4.0 * 4.0 + 2.4 * 2.0) / 6.0;
        assert!((gpa - expected).abs() < 1e-9);
        assert!((gpa - 3.4667).abs() < 1e-4);
    }

    #[test]
    fn ungraded_enrollments_are_excluded() {
        // Course 9 is unknown; it must not be looked up for an ungraded row.
        let es = vec![enrollment(1, 80.0), enrollment(9, -1.0)];
        let summary = gpa_summary(&es, &catalog(&[(1, 3)])).expect("gpa");
        assert!((summary.gpa - 3.2).abs() < 1e-12);
        assert_eq!(summary.total_credits, 3);
        assert_eq!(summary.graded_count, 1);
        assert_eq!(summary.ungraded_count, 1);

        let only_ungraded = vec![enrollment(9, -1.0)];
        assert_eq!(calculate_gpa(&only_ungraded, &catalog(&[])).expect("gpa"), 0.0);
    }

    #[test]
    fn missing_course_aborts() {
        let es = vec![enrollment(1, 80.0), enrollment(2, 70.0)];
        let err = calculate_gpa(&es, &catalog(&[(1, 3)])).unwrap_err();
        assert!(matches!(err, RegistrarError::NotFound { entity: "course", .. }));
    }

    #[test]
    fn semester_average_skips_ungraded() {
        let avg = semester_average([Grade::Scored(70.0), Grade::Ungraded, Grade::Scored(90.0)]);
        assert_eq!(avg, 80.0);
        assert_eq!(semester_average([Grade::Ungraded]), 0.0);
    }

    #[test]
    fn rounding_for_display() {
        assert_eq!(round_half_up(3.466666, 2), 3.47);
        assert_eq!(round_half_up(3.2, 2), 3.2);
        assert_eq!(round_half_up(0.0, 2), 0.0);
    }
}
