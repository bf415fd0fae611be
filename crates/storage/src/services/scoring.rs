use crate::models::{CourseCategory, Student};

pub const INTRODUCTION_POINTS: i32 = 1200;
pub const DATA_STRUCTURES_POINTS: i32 = 1400;
pub const ALGORITHM_DESIGN_POINTS: i32 = 1600;
pub const PROGRAMMING_CHALLENGES_POINTS: i32 = 1800;
pub const PAST_REGIONAL_POINTS: i32 = 2000;
pub const NATIONAL_PRIZE_POINTS: i32 = 2200;
pub const INTERNATIONAL_PRIZE_POINTS: i32 = 2600;

fn course_points(course: CourseCategory) -> i32 {
    match course {
        CourseCategory::Introduction => INTRODUCTION_POINTS,
        CourseCategory::DataStructures => DATA_STRUCTURES_POINTS,
        CourseCategory::AlgorithmDesign => ALGORITHM_DESIGN_POINTS,
        CourseCategory::ProgrammingChallenges => PROGRAMMING_CHALLENGES_POINTS,
    }
}

fn has_text(text: &Option<String>) -> bool {
    text.as_deref().is_some_and(|t| !t.trim().is_empty())
}

/// Strongest single signal of a student's ability.
///
/// Every triggered rule yields a point value and the result is their maximum,
/// so a student's score is the best evidence available rather than a sum.
pub fn score_student(student: &Student) -> i32 {
    let rating = student.codeforces_rating.max(0);

    let courses = student
        .completed_courses
        .iter()
        .map(|&course| course_points(course))
        .max()
        .unwrap_or(0);

    let national = if has_text(&student.national_prizes) {
        NATIONAL_PRIZE_POINTS
    } else {
        0
    };

    let regional = if student.past_regional {
        PAST_REGIONAL_POINTS
    } else {
        0
    };

    let international = if has_text(&student.international_prizes) {
        INTERNATIONAL_PRIZE_POINTS
    } else {
        0
    };

    [rating, courses, national, regional, international]
        .into_iter()
        .max()
        .unwrap_or(0)
}

/// Writes `algorithm_point` for every student.
pub fn apply_scores(students: &mut [Student]) {
    for student in students {
        student.algorithm_point = score_student(student);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn student() -> Student {
        Student::unscored(Uuid::new_v4())
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        assert_eq!(score_student(&student()), 0);
    }

    #[test]
    fn test_rating_contributes_raw_value() {
        let mut s = student();
        s.codeforces_rating = 2431;
        assert_eq!(score_student(&s), 2431);
    }

    #[test]
    fn test_negative_rating_is_ignored() {
        let mut s = student();
        s.codeforces_rating = -50;
        assert_eq!(score_student(&s), 0);
    }

    #[test]
    fn test_course_tiers_increase_with_level() {
        let tiers: Vec<i32> = [
            CourseCategory::Introduction,
            CourseCategory::DataStructures,
            CourseCategory::AlgorithmDesign,
            CourseCategory::ProgrammingChallenges,
        ]
        .into_iter()
        .map(|course| {
            let mut s = student();
            s.completed_courses = vec![course];
            score_student(&s)
        })
        .collect();

        assert!(tiers.windows(2).all(|w| w[0] < w[1]), "{tiers:?}");
    }

    #[test]
    fn test_score_is_ceiling_not_sum() {
        let mut s = student();
        s.completed_courses = vec![CourseCategory::DataStructures];
        s.national_prizes = Some("NZPC 2nd place".to_string());
        assert_eq!(score_student(&s), NATIONAL_PRIZE_POINTS);
    }

    #[test]
    fn test_international_prize_beats_every_fixed_tier() {
        let mut s = student();
        s.completed_courses = vec![
            CourseCategory::Introduction,
            CourseCategory::ProgrammingChallenges,
        ];
        s.past_regional = true;
        s.national_prizes = Some("gold".to_string());
        s.international_prizes = Some("IOI bronze".to_string());
        assert_eq!(score_student(&s), INTERNATIONAL_PRIZE_POINTS);
    }

    #[test]
    fn test_high_rating_outranks_fixed_tiers() {
        let mut s = student();
        s.international_prizes = Some("IOI bronze".to_string());
        s.codeforces_rating = 3100;
        assert_eq!(score_student(&s), 3100);
    }

    #[test]
    fn test_blank_prize_text_does_not_trigger() {
        let mut s = student();
        s.national_prizes = Some("  ".to_string());
        s.international_prizes = Some(String::new());
        assert_eq!(score_student(&s), 0);
    }

    #[test]
    fn test_adding_attributes_never_lowers_score() {
        let mut s = student();
        s.codeforces_rating = 1500;
        let mut previous = score_student(&s);

        s.past_regional = true;
        let with_regional = score_student(&s);
        assert!(with_regional >= previous);
        previous = with_regional;

        s.completed_courses.push(CourseCategory::Introduction);
        let with_course = score_student(&s);
        assert!(with_course >= previous);
        previous = with_course;

        s.national_prizes = Some("3rd".to_string());
        assert!(score_student(&s) >= previous);
    }

    #[test]
    fn test_apply_scores_is_idempotent() {
        let mut students = vec![student(), student()];
        students[0].past_regional = true;
        students[1].codeforces_rating = 1750;

        apply_scores(&mut students);
        let first: Vec<i32> = students.iter().map(|s| s.algorithm_point).collect();
        apply_scores(&mut students);
        let second: Vec<i32> = students.iter().map(|s| s.algorithm_point).collect();

        assert_eq!(first, vec![PAST_REGIONAL_POINTS, 1750]);
        assert_eq!(first, second);
    }
}
